//! Core netlist API shared by library callers and the CLI.
//! No UI framework dependencies.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::drawing::{Drawing, DrawingError, DrawingLoadError, DrawingLoader, Point};
use crate::netlist::{
    Connectivity, ConnectivityResolver, DanglingPolicy, GroundPolicy, Netlist, NetlistBuilder,
};
use crate::probe::{ProbeTarget, ProbeTargetResolver};

/// Coordinate quantum used when none (or an unusable one) is configured.
/// Well below the editor's 20-unit snapping grid.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

#[derive(Debug, thiserror::Error)]
pub enum NetResolveError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid drawing: {0}")]
    InvalidDrawing(#[from] DrawingError),
}

impl From<DrawingLoadError> for NetResolveError {
    fn from(e: DrawingLoadError) -> Self {
        match e {
            DrawingLoadError::Io(io) => NetResolveError::Io(io),
            DrawingLoadError::Json(json) => NetResolveError::Parse(json.to_string()),
            DrawingLoadError::Invalid(invalid) => NetResolveError::InvalidDrawing(invalid),
        }
    }
}

/// Options for a resolution pass (CLI or embedding application).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Coordinates closer than this are the same electrical point.
    pub coordinate_tolerance: f64,
    pub ground_policy: GroundPolicy,
    /// Pick the topmost-leftmost node as ground when no marker is flagged.
    pub fallback_ground: bool,
    pub dangling: DanglingPolicy,
    /// Click-to-point distance for voltage probes (the wire snapping radius).
    pub probe_radius: f64,
    /// Half the body thickness of a component without an explicit outline.
    pub body_half_width: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            coordinate_tolerance: DEFAULT_TOLERANCE,
            ground_policy: GroundPolicy::MergeAll,
            fallback_ground: true,
            dangling: DanglingPolicy::Isolated,
            probe_radius: 10.0,
            body_half_width: 20.0,
        }
    }
}

impl EngineOptions {
    /// Effective coordinate tolerance, falling back to [`DEFAULT_TOLERANCE`].
    pub fn tolerance(&self) -> f64 {
        if self.coordinate_tolerance.is_finite() && self.coordinate_tolerance > 0.0 {
            self.coordinate_tolerance
        } else {
            tracing::warn!(
                "Ignoring coordinate tolerance {}, using {}",
                self.coordinate_tolerance,
                DEFAULT_TOLERANCE
            );
            DEFAULT_TOLERANCE
        }
    }
}

/// Netlist plus the connectivity it was built from.
#[derive(Debug, Clone)]
pub struct NetlistResult {
    pub file: Option<PathBuf>,
    pub connectivity: Connectivity,
    pub netlist: Netlist,
}

impl NetlistResult {
    pub fn is_empty(&self) -> bool {
        self.netlist.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.connectivity.len()
    }

    pub fn unconnected_terminals(&self) -> usize {
        self.netlist
            .elements()
            .map(|e| {
                [&e.node1, &e.node2]
                    .iter()
                    .filter(|n| n.as_str() == crate::netlist::UNCONNECTED)
                    .count()
            })
            .sum()
    }
}

const MAX_SCAN_DEPTH: usize = 20;

/// Candidate drawing snapshots (`*.json`) under a directory, sorted.
///
/// Hidden directories and build output are not descended into.
pub fn discover_drawing_files(dir: &Path) -> Result<Vec<PathBuf>, NetResolveError> {
    let mut files = Vec::new();
    let mut pending = vec![(dir.to_path_buf(), 0usize)];
    while let Some((current, depth)) = pending.pop() {
        for entry in std::fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                if depth < MAX_SCAN_DEPTH && !is_skipped_dir(&path) {
                    pending.push((path, depth + 1));
                }
            } else if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

fn is_skipped_dir(path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.starts_with('.') || name == "target" || name == "node_modules",
        None => false,
    }
}

/// Engine facade. Every call works on the snapshot it is given; nothing is
/// kept between calls.
pub struct NetlistEngine;

impl NetlistEngine {
    /// Resolve electrical nodes only.
    pub fn resolve(drawing: &Drawing, options: &EngineOptions) -> Connectivity {
        ConnectivityResolver::resolve(drawing, options)
    }

    /// Resolve and build the netlist for an in-memory drawing.
    pub fn generate(drawing: &Drawing, options: &EngineOptions) -> NetlistResult {
        let connectivity = ConnectivityResolver::resolve(drawing, options);
        let netlist = NetlistBuilder::build(&drawing.components, &connectivity);
        tracing::debug!(
            "Built netlist: {} records over {} nodes",
            netlist.records().len(),
            connectivity.len()
        );
        NetlistResult {
            file: None,
            connectivity,
            netlist,
        }
    }

    /// Load a drawing file and build its netlist.
    pub fn generate_file(path: &Path, options: &EngineOptions) -> Result<NetlistResult, NetResolveError> {
        let drawing = DrawingLoader::load(path)?;
        let mut result = Self::generate(&drawing, options);
        result.file = Some(path.to_path_buf());
        Ok(result)
    }

    /// Build netlists for every drawing under a directory.
    ///
    /// JSON files that are not drawings (unparseable, or with no components,
    /// markers or wires) are skipped. A drawing that parses but fails
    /// validation is still an error.
    pub fn generate_directory(dir: &Path, options: &EngineOptions) -> Result<Vec<NetlistResult>, NetResolveError> {
        let files = discover_drawing_files(dir)?;
        tracing::info!("Found {} JSON files under {}", files.len(), dir.display());
        let mut results = Vec::with_capacity(files.len());
        for path in files {
            let drawing = match DrawingLoader::load(&path) {
                Ok(drawing) => drawing,
                Err(DrawingLoadError::Json(e)) => {
                    tracing::warn!("Skipping {}: not a drawing ({})", path.display(), e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if drawing.is_empty() {
                tracing::debug!("Skipping {}: no drawing content", path.display());
                continue;
            }
            let mut result = Self::generate(&drawing, options);
            result.file = Some(path);
            results.push(result);
        }
        Ok(results)
    }

    /// Resolve what a click at `click` probes.
    pub fn probe(drawing: &Drawing, click: Point, options: &EngineOptions) -> Option<ProbeTarget> {
        let connectivity = ConnectivityResolver::resolve(drawing, options);
        ProbeTargetResolver::new(drawing, &connectivity, options).resolve(click)
    }
}
