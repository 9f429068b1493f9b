//! Netlist Builder
//!
//! Binds each placed component to the nodes its terminals resolved to and
//! emits the solver's line format. Sources are written with their terminals
//! swapped: the editor draws the positive terminal as `terminal_a`, the
//! solver expects it second.

use crate::drawing::{family_code_from_name, Component, Point};
use crate::netlist::connectivity::Connectivity;
use crate::netlist::record::{ElementRecord, Netlist, NetlistRecord, UNCONNECTED};

pub struct NetlistBuilder;

impl NetlistBuilder {
    /// Build the netlist for `components` against a resolved connectivity map
    pub fn build(components: &[Component], connectivity: &Connectivity) -> Netlist {
        if components.is_empty() {
            return Netlist::default();
        }

        let mut records: Vec<NetlistRecord> = components
            .iter()
            .map(|component| NetlistRecord::Element(Self::element_record(component, connectivity)))
            .collect();

        if let Some(ground) = connectivity.ground_name() {
            records.push(NetlistRecord::Ground {
                node: ground.to_string(),
            });
        }

        Netlist::from_records(records)
    }

    fn element_record(component: &Component, connectivity: &Connectivity) -> ElementRecord {
        let family = component.family();

        let prefix = family_code_from_name(&component.name);
        if prefix != family.code() {
            tracing::warn!(
                "Component {} is a {:?} but its name prefix is {:?}; emitting family code {}",
                component.name,
                family,
                prefix,
                family.code()
            );
        }

        let node_a = Self::node_name(component, &component.terminal_a, connectivity);
        let node_b = Self::node_name(component, &component.terminal_b, connectivity);
        let (node1, node2) = if family.reverses_polarity() {
            (node_b, node_a)
        } else {
            (node_a, node_b)
        };

        ElementRecord {
            family,
            name: component.name.clone(),
            node1,
            node2,
            value: component.kind.value(),
            phase: component.kind.phase(),
        }
    }

    fn node_name(
        component: &Component,
        terminal: &Point,
        connectivity: &Connectivity,
    ) -> String {
        match connectivity.node_name_at(terminal) {
            Some(name) => name.to_string(),
            None => {
                tracing::debug!("Terminal {} of {} is unconnected", terminal, component.name);
                UNCONNECTED.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EngineOptions;
    use crate::drawing::{ComponentFamily, ComponentKind, Drawing, NodeMarker, Wire};
    use crate::netlist::connectivity::ConnectivityResolver;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn build(drawing: &Drawing, options: &EngineOptions) -> Netlist {
        let connectivity = ConnectivityResolver::resolve(drawing, options);
        NetlistBuilder::build(&drawing.components, &connectivity)
    }

    #[test]
    fn test_empty_component_set_is_empty_netlist() {
        let mut drawing = Drawing::new();
        drawing.add_marker(NodeMarker::ground(p(0.0, 0.0)));
        let netlist = build(&drawing, &EngineOptions::default());
        assert!(netlist.records().is_empty());
    }

    #[test]
    fn test_voltage_source_polarity_reversed() {
        // V1: terminal A on P, terminal B on the ground marker G
        let mut drawing = Drawing::new();
        drawing
            .add_component(Component::new(
                "V1",
                ComponentKind::VoltageSource { voltage: 5.0 },
                p(0.0, 0.0),
                p(0.0, 100.0),
            ))
            .add_marker(NodeMarker::new(p(0.0, -100.0)))
            .add_marker(NodeMarker::ground(p(0.0, 200.0)))
            .add_wire(Wire::between(p(0.0, 0.0), p(0.0, -100.0)))
            .add_wire(Wire::between(p(0.0, 100.0), p(0.0, 200.0)));

        let netlist = build(&drawing, &EngineOptions::default());
        assert_eq!(netlist.lines(), vec!["V V1 0 N1 5", "GND 0"]);
    }

    #[test]
    fn test_passives_keep_drawing_order() {
        let mut drawing = Drawing::new();
        drawing
            .add_component(Component::new(
                "D1",
                ComponentKind::Diode { saturation_current: 1e-12 },
                p(0.0, 0.0),
                p(100.0, 0.0),
            ))
            .add_marker(NodeMarker::ground(p(100.0, 0.0)));
        let netlist = build(&drawing, &EngineOptions::default());
        assert_eq!(netlist.lines()[0], "D D1 N1 0 0.000000000001");
    }

    #[test]
    fn test_missing_terminal_is_unconnected() {
        let mut drawing = Drawing::new();
        drawing.add_component(Component::new(
            "R1",
            ComponentKind::default_for(ComponentFamily::Resistor),
            p(0.0, 0.0),
            p(100.0, 0.0),
        ));
        // A map resolved from a different snapshot lacks R2's terminals
        let connectivity = ConnectivityResolver::resolve(&drawing, &EngineOptions::default());
        let stranger = vec![Component::new(
            "R2",
            ComponentKind::default_for(ComponentFamily::Resistor),
            p(500.0, 500.0),
            p(0.0, 0.0),
        )];
        let netlist = NetlistBuilder::build(&stranger, &connectivity);
        assert_eq!(netlist.lines(), vec!["R R2 UNCONNECTED 0 1000", "GND 0"]);
    }

    #[test]
    fn test_ac_source_appends_phase() {
        let mut drawing = Drawing::new();
        drawing
            .add_component(Component::new(
                "ACV1",
                ComponentKind::AcVoltageSource { magnitude: 10.0, phase: 45.0 },
                p(0.0, 0.0),
                p(0.0, 100.0),
            ))
            .add_marker(NodeMarker::ground(p(0.0, 100.0)));
        let netlist = build(&drawing, &EngineOptions::default());
        assert_eq!(netlist.lines(), vec!["ACV ACV1 0 N1 10 45", "GND 0"]);
        assert_eq!(netlist.ac_sources(), vec!["ACV1"]);
    }

    #[test]
    fn test_family_comes_from_kind_not_name() {
        let mut drawing = Drawing::new();
        drawing.add_component(Component::new(
            "X7",
            ComponentKind::CurrentSource { current: 0.5 },
            p(0.0, 0.0),
            p(100.0, 0.0),
        ));
        let netlist = build(&drawing, &EngineOptions::default());
        assert_eq!(netlist.lines()[0], "I X7 0 N1 0.5");
    }
}
