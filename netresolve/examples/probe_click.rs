//! Resolve a few clicks on a drawing file into probe targets.
//!
//! Usage: cargo run --example probe_click -- <drawing.json>

use netresolve::prelude::*;
use netresolve::{ConnectivityResolver, ProbeList, ProbeTargetResolver};
use std::path::PathBuf;

fn main() -> Result<(), NetResolveError> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/voltage_divider.json")
        });

    let drawing = netresolve::load_drawing(&path)?;
    let options = EngineOptions::default();
    let connectivity = ConnectivityResolver::resolve(&drawing, &options);
    let resolver = ProbeTargetResolver::new(&drawing, &connectivity, &options);

    let mut probes = ProbeList::new();
    for click in [
        Point::new(100.0, 150.0),
        Point::new(106.0, -3.0),
        Point::new(50.0, 50.0),
    ] {
        match resolver.resolve(click) {
            Some(target) => {
                println!("{} -> {}", click, target);
                probes.toggle(target);
            }
            None => println!("{} -> nothing", click),
        }
    }

    println!("Plot: {}", probes.plot_targets(&connectivity).join(", "));
    Ok(())
}
