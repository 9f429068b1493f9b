use criterion::{black_box, criterion_group, criterion_main, Criterion};
use netresolve::prelude::*;

/// Resistor ladder: series rungs along the top, shunts down to a ground rail.
fn ladder(rungs: usize) -> Drawing {
    let mut drawing = Drawing::new();
    drawing.add_component(Component::new(
        "V1",
        ComponentKind::VoltageSource { voltage: 5.0 },
        Point::new(0.0, 0.0),
        Point::new(0.0, 100.0),
    ));
    for i in 0..rungs {
        let x = i as f64 * 100.0;
        drawing
            .add_component(Component::new(
                format!("R{}", 2 * i + 1),
                ComponentKind::Resistor { resistance: 1000.0 },
                Point::new(x, 0.0),
                Point::new(x + 100.0, 0.0),
            ))
            .add_component(Component::new(
                format!("R{}", 2 * i + 2),
                ComponentKind::Resistor { resistance: 2000.0 },
                Point::new(x + 100.0, 0.0),
                Point::new(x + 100.0, 100.0),
            ))
            .add_wire(Wire::between(Point::new(x, 100.0), Point::new(x + 100.0, 100.0)));
    }
    drawing.add_marker(NodeMarker::ground(Point::new(0.0, 100.0)));
    drawing
}

fn bench_resolve(c: &mut Criterion) {
    let drawing = ladder(1000);
    let options = EngineOptions::default();

    c.bench_function("resolve_ladder_1000", |b| {
        b.iter(|| NetlistEngine::resolve(black_box(&drawing), black_box(&options)));
    });
}

fn bench_generate(c: &mut Criterion) {
    let drawing = ladder(1000);
    let options = EngineOptions::default();

    c.bench_function("generate_ladder_1000", |b| {
        b.iter(|| NetlistEngine::generate(black_box(&drawing), black_box(&options)).netlist.to_text());
    });
}

criterion_group!(benches, bench_resolve, bench_generate);
criterion_main!(benches);
