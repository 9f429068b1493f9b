//! Build a voltage divider in memory and print its netlist.

use netresolve::prelude::*;

fn main() {
    let mut drawing = Drawing::new();
    drawing
        .add_component(Component::new(
            "V1",
            ComponentKind::VoltageSource { voltage: 12.0 },
            Point::new(0.0, 0.0),
            Point::new(0.0, 200.0),
        ))
        .add_component(Component::new(
            "R1",
            ComponentKind::Resistor { resistance: 10_000.0 },
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
        ))
        .add_component(Component::new(
            "R2",
            ComponentKind::Resistor { resistance: 4_700.0 },
            Point::new(100.0, 100.0),
            Point::new(100.0, 200.0),
        ))
        .add_marker(NodeMarker::ground(Point::new(0.0, 200.0)))
        .add_wire(Wire::between(Point::new(0.0, 0.0), Point::new(100.0, 0.0)))
        .add_wire(Wire::between(Point::new(100.0, 200.0), Point::new(0.0, 200.0)));

    let result = NetlistEngine::generate(&drawing, &EngineOptions::default());

    println!("Nodes:");
    for node in result.connectivity.nodes() {
        let points: Vec<String> = node.points.iter().map(|p| p.to_string()).collect();
        println!("  {:<4} {}", node.name, points.join(" "));
    }

    println!("\nNetlist:");
    print!("{}", result.netlist);
}
