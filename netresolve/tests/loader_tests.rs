//! On-disk drawing loading

use netresolve::drawing::{DrawingError, DrawingLoadError, DrawingLoader};
use netresolve::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_drawing(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_saved_drawing() {
    let mut drawing = Drawing::new();
    drawing
        .add_component(Component::new(
            "L1",
            ComponentKind::Inductor { inductance: 0.01 },
            Point::new(0.0, 0.0),
            Point::new(0.0, 60.0),
        ))
        .add_marker(NodeMarker::ground(Point::new(0.0, 60.0)))
        .add_wire(Wire::new(Point::new(0.0, 0.0)).to(Point::new(40.0, 0.0)));

    let file = write_drawing(&DrawingLoader::to_json_string(&drawing).unwrap());
    let loaded = DrawingLoader::load(file.path()).unwrap();
    assert_eq!(loaded, drawing);

    let result = NetlistEngine::generate_file(file.path(), &EngineOptions::default()).unwrap();
    assert_eq!(result.netlist.lines(), vec!["L L1 N1 0 0.01", "GND 0"]);
}

#[test]
fn test_duplicate_names_rejected() {
    let file = write_drawing(
        r#"{"components": [
            {"name": "R1", "kind": {"family": "Resistor", "resistance": 1},
             "terminal_a": {"x": 0, "y": 0}, "terminal_b": {"x": 1, "y": 0}},
            {"name": "R1", "kind": {"family": "Resistor", "resistance": 2},
             "terminal_a": {"x": 2, "y": 0}, "terminal_b": {"x": 3, "y": 0}}
        ]}"#,
    );
    match DrawingLoader::load(file.path()) {
        Err(DrawingLoadError::Invalid(DrawingError::DuplicateComponentName(name))) => {
            assert_eq!(name, "R1")
        }
        other => panic!("expected duplicate name error, got {:?}", other),
    }

    let err = NetlistEngine::generate_file(file.path(), &EngineOptions::default()).unwrap_err();
    assert!(matches!(err, NetResolveError::InvalidDrawing(_)));
    assert!(err.to_string().contains("duplicate component name: R1"));
}

#[test]
fn test_unknown_family_is_parse_error() {
    let file = write_drawing(
        r#"{"components": [
            {"name": "Q1", "kind": {"family": "Transistor"},
             "terminal_a": {"x": 0, "y": 0}, "terminal_b": {"x": 1, "y": 0}}
        ]}"#,
    );
    let err = netresolve::load_drawing(file.path()).unwrap_err();
    assert!(matches!(err, NetResolveError::Parse(_)));
}

#[test]
fn test_nan_coordinates_rejected() {
    let mut drawing = Drawing::new();
    drawing.add_wire(Wire::between(Point::new(0.0, 0.0), Point::new(f64::NAN, 0.0)));
    assert!(matches!(
        drawing.validate(),
        Err(DrawingError::NonFiniteCoordinate { .. })
    ));
}
