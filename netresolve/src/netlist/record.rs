use serde::Serialize;
use std::fmt;

use crate::drawing::ComponentFamily;

/// Node name emitted for a terminal that has no resolved node.
pub const UNCONNECTED: &str = "UNCONNECTED";

/// One component line of the netlist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementRecord {
    pub family: ComponentFamily,
    pub name: String,
    pub node1: String,
    pub node2: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<f64>,
}

/// A single netlist line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NetlistRecord {
    Element(ElementRecord),
    Ground { node: String },
}

impl fmt::Display for NetlistRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetlistRecord::Element(e) => {
                write!(
                    f,
                    "{} {} {} {} {}",
                    e.family.code(),
                    e.name,
                    e.node1,
                    e.node2,
                    e.value
                )?;
                if let Some(phase) = e.phase {
                    write!(f, " {}", phase)?;
                }
                Ok(())
            }
            NetlistRecord::Ground { node } => write!(f, "GND {}", node),
        }
    }
}

/// Ordered netlist: component records in placement order, ground last.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Netlist {
    records: Vec<NetlistRecord>,
}

impl Netlist {
    pub(crate) fn from_records(records: Vec<NetlistRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[NetlistRecord] {
        &self.records
    }

    pub fn elements(&self) -> impl Iterator<Item = &ElementRecord> {
        self.records.iter().filter_map(|r| match r {
            NetlistRecord::Element(e) => Some(e),
            NetlistRecord::Ground { .. } => None,
        })
    }

    /// No component records. The caller should not invoke the solver.
    pub fn is_empty(&self) -> bool {
        self.elements().next().is_none()
    }

    pub fn ground_node(&self) -> Option<&str> {
        self.records.iter().find_map(|r| match r {
            NetlistRecord::Ground { node } => Some(node.as_str()),
            NetlistRecord::Element(_) => None,
        })
    }

    /// Names of AC sources, in placement order. An AC sweep needs one.
    pub fn ac_sources(&self) -> Vec<&str> {
        self.elements()
            .filter(|e| e.family == ComponentFamily::AcVoltageSource)
            .map(|e| e.name.as_str())
            .collect()
    }

    pub fn lines(&self) -> Vec<String> {
        self.records.iter().map(|r| r.to_string()).collect()
    }

    /// Newline-terminated text, one record per line.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for record in &self.records {
            text.push_str(&record.to_string());
            text.push('\n');
        }
        text
    }
}

impl fmt::Display for Netlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
