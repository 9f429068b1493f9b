//! Probe Target Resolver
//!
//! Turns a click on the drawing into something the plotting side can ask
//! the solver for: the current through a component or the voltage of a
//! node. Component bodies are tested first, so a click that is both inside
//! a body and near one of its terminals probes the current.

use serde::Serialize;
use std::fmt;

use crate::core::EngineOptions;
use crate::drawing::{Drawing, Point};
use crate::netlist::Connectivity;

/// What a click resolved to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum ProbeTarget {
    /// Node voltage, by node name.
    Voltage(String),
    /// Branch current, by component name.
    Current(String),
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeTarget::Voltage(node) => f.write_str(node),
            ProbeTarget::Current(component) => write!(f, "I({})", component),
        }
    }
}

/// Read-only view over a drawing and the connectivity resolved from it.
///
/// Must be rebuilt whenever the drawing changes; it holds no state of its own.
pub struct ProbeTargetResolver<'a> {
    drawing: &'a Drawing,
    connectivity: &'a Connectivity,
    radius: f64,
    body_half_width: f64,
}

impl<'a> ProbeTargetResolver<'a> {
    pub fn new(drawing: &'a Drawing, connectivity: &'a Connectivity, options: &EngineOptions) -> Self {
        Self {
            drawing,
            connectivity,
            radius: options.probe_radius,
            body_half_width: options.body_half_width,
        }
    }

    pub fn resolve(&self, click: Point) -> Option<ProbeTarget> {
        self.component_at(&click)
            .map(ProbeTarget::Current)
            .or_else(|| self.node_near(&click).map(ProbeTarget::Voltage))
    }

    fn component_at(&self, click: &Point) -> Option<String> {
        self.drawing
            .components
            .iter()
            .find(|c| c.body_bounds(self.body_half_width).contains(click))
            .map(|c| c.name.clone())
    }

    /// Nearest resolved point strictly inside the probe radius.
    fn node_near(&self, click: &Point) -> Option<String> {
        let mut best: Option<(f64, &str)> = None;
        for (point, node) in self.connectivity.resolved_points() {
            let d = point.distance(click);
            if d >= self.radius {
                continue;
            }
            match best {
                Some((best_d, _)) if best_d <= d => {}
                _ => best = Some((d, node.name.as_str())),
            }
        }
        best.map(|(_, name)| name.to_string())
    }
}

/// Whether [`ProbeList::toggle`] added or removed the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeToggle {
    Added,
    Removed,
}

/// The user's probe selection, in the order probes were placed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProbeList {
    targets: Vec<ProbeTarget>,
}

impl ProbeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clicking an already probed target removes it.
    pub fn toggle(&mut self, target: ProbeTarget) -> ProbeToggle {
        if let Some(pos) = self.targets.iter().position(|t| *t == target) {
            self.targets.remove(pos);
            ProbeToggle::Removed
        } else {
            self.targets.push(target);
            ProbeToggle::Added
        }
    }

    pub fn targets(&self) -> &[ProbeTarget] {
        &self.targets
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// What to plot: the selection, or every node voltage when nothing is
    /// selected.
    pub fn plot_targets(&self, connectivity: &Connectivity) -> Vec<String> {
        if self.targets.is_empty() {
            connectivity.node_names().map(str::to_string).collect()
        } else {
            self.targets.iter().map(|t| t.to_string()).collect()
        }
    }
}
