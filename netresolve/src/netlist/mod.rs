//! Netlist resolution: drawing geometry -> electrical nodes -> solver lines.

pub mod builder;
pub mod connectivity;
pub mod record;

pub use builder::NetlistBuilder;
pub use connectivity::{
    Connectivity, ConnectivityResolver, DanglingPolicy, ElectricalNode, GroundPolicy, GROUND_NODE,
};
pub use record::{ElementRecord, Netlist, NetlistRecord, UNCONNECTED};
