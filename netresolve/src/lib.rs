//! netresolve - schematic drawing to netlist resolution
//!
//! Converts the geometry of a schematic drawing (component terminals, node
//! markers, orthogonal wires) into a solver-ready netlist: every component
//! bound to named electrical nodes, with a single ground reference.
//!
//! # Quick Start
//!
//! ```no_run
//! use netresolve::{EngineOptions, NetlistEngine};
//! use std::path::Path;
//!
//! let result = NetlistEngine::generate_file(
//!     Path::new("divider.json"),
//!     &EngineOptions::default(),
//! ).unwrap();
//!
//! for line in result.netlist.lines() {
//!     println!("{}", line);
//! }
//! ```
//!
//! # Pipeline
//!
//! - **Connectivity**: union-find over terminals, markers and wire vertices
//! - **Netlist**: per-family polarity, `{Code} {Name} {Node1} {Node2} {Value}` lines, trailing `GND`
//! - **Probing**: click -> `I(component)` or node name

pub mod core;
pub mod drawing;
pub mod netlist;
pub mod probe;

// Re-export main types
pub use crate::core::{
    discover_drawing_files, EngineOptions, NetResolveError, NetlistEngine, NetlistResult,
    DEFAULT_TOLERANCE,
};
pub use drawing::{
    Component, ComponentFamily, ComponentKind, Drawing, DrawingLoader, NodeMarker, Point, Rect, Wire,
};
pub use netlist::{
    Connectivity, ConnectivityResolver, DanglingPolicy, ElectricalNode, GroundPolicy, Netlist,
    NetlistBuilder, NetlistRecord, GROUND_NODE, UNCONNECTED,
};
pub use probe::{ProbeList, ProbeTarget, ProbeTargetResolver, ProbeToggle};

/// Load a drawing file (convenience wrapper).
pub fn load_drawing(path: &std::path::Path) -> Result<Drawing, NetResolveError> {
    DrawingLoader::load(path).map_err(NetResolveError::from)
}

/// Resolve and build the netlist for a drawing with default options.
pub fn generate_netlist(drawing: &Drawing) -> Netlist {
    NetlistEngine::generate(drawing, &EngineOptions::default()).netlist
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Component, ComponentKind, Drawing, EngineOptions, NetResolveError, NetlistEngine,
        NetlistResult, NodeMarker, Point, ProbeTarget, Wire,
    };
}
