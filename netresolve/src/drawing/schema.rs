use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// A coordinate on the drawing surface, in drawing units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Quantize onto the integer lattice whose pitch is `tolerance`.
    ///
    /// Two points that land on the same grid point are the same electrical
    /// point. `tolerance` must be positive and finite.
    pub fn to_grid(&self, tolerance: f64) -> GridPoint {
        GridPoint {
            x: (self.x / tolerance).round() as i64,
            y: (self.y / tolerance).round() as i64,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Quantized coordinate used for point identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i64,
    pub y: i64,
}

impl GridPoint {
    /// The eight surrounding cells. Two points closer than one pitch can
    /// round into adjacent cells when they straddle a half-cell boundary.
    pub fn neighbors(self) -> impl Iterator<Item = GridPoint> {
        (-1..=1i64)
            .flat_map(|dx| (-1..=1i64).map(move |dy| (dx, dy)))
            .filter(|&offset| offset != (0, 0))
            .map(move |(dx, dy)| GridPoint {
                x: self.x + dx,
                y: self.y + dy,
            })
    }
}

/// Axis-aligned rectangle, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn grow(&self, dx: f64, dy: f64) -> Self {
        Self {
            min: Point::new(self.min.x - dx, self.min.y - dy),
            max: Point::new(self.max.x + dx, self.max.y + dy),
        }
    }
}

/// Component family. The family code is what the solver sees first on each
/// netlist line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentFamily {
    Resistor,
    Capacitor,
    Inductor,
    Diode,
    CurrentSource,
    VoltageSource,
    #[serde(rename = "ACVoltageSource")]
    AcVoltageSource,
}

impl ComponentFamily {
    pub const ALL: [ComponentFamily; 7] = [
        ComponentFamily::Resistor,
        ComponentFamily::Capacitor,
        ComponentFamily::Inductor,
        ComponentFamily::Diode,
        ComponentFamily::CurrentSource,
        ComponentFamily::VoltageSource,
        ComponentFamily::AcVoltageSource,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Resistor => "R",
            Self::Capacitor => "C",
            Self::Inductor => "L",
            Self::Diode => "D",
            Self::CurrentSource => "I",
            Self::VoltageSource => "V",
            Self::AcVoltageSource => "ACV",
        }
    }

    /// Sources are drawn with their positive terminal on the opposite side
    /// from what the solver expects, so their terminals are swapped on output.
    pub fn reverses_polarity(&self) -> bool {
        matches!(self, Self::VoltageSource | Self::AcVoltageSource)
    }
}

impl fmt::Display for ComponentFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Leading alphabetic run of a component name (`"ACV1"` -> `"ACV"`).
pub fn family_code_from_name(name: &str) -> &str {
    let end = name
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(name.len());
    &name[..end]
}

/// Family plus the scalar parameters the netlist carries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family")]
pub enum ComponentKind {
    Resistor { resistance: f64 },
    Capacitor { capacitance: f64 },
    Inductor { inductance: f64 },
    Diode { saturation_current: f64 },
    CurrentSource { current: f64 },
    VoltageSource { voltage: f64 },
    #[serde(rename = "ACVoltageSource")]
    AcVoltageSource {
        magnitude: f64,
        #[serde(default)]
        phase: f64,
    },
}

impl ComponentKind {
    /// Parameters the editor assigns before the user edits anything.
    pub fn default_for(family: ComponentFamily) -> Self {
        match family {
            ComponentFamily::Resistor => Self::Resistor { resistance: 1000.0 },
            ComponentFamily::Capacitor => Self::Capacitor { capacitance: 1.0 },
            ComponentFamily::Inductor => Self::Inductor { inductance: 1.0 },
            ComponentFamily::Diode => Self::Diode { saturation_current: 1.0 },
            ComponentFamily::CurrentSource => Self::CurrentSource { current: 1.0 },
            ComponentFamily::VoltageSource => Self::VoltageSource { voltage: 5.0 },
            ComponentFamily::AcVoltageSource => Self::AcVoltageSource {
                magnitude: 1.0,
                phase: 0.0,
            },
        }
    }

    pub fn family(&self) -> ComponentFamily {
        match self {
            Self::Resistor { .. } => ComponentFamily::Resistor,
            Self::Capacitor { .. } => ComponentFamily::Capacitor,
            Self::Inductor { .. } => ComponentFamily::Inductor,
            Self::Diode { .. } => ComponentFamily::Diode,
            Self::CurrentSource { .. } => ComponentFamily::CurrentSource,
            Self::VoltageSource { .. } => ComponentFamily::VoltageSource,
            Self::AcVoltageSource { .. } => ComponentFamily::AcVoltageSource,
        }
    }

    /// Primary value: resistance, capacitance, DC level, AC magnitude, ...
    pub fn value(&self) -> f64 {
        match *self {
            Self::Resistor { resistance } => resistance,
            Self::Capacitor { capacitance } => capacitance,
            Self::Inductor { inductance } => inductance,
            Self::Diode { saturation_current } => saturation_current,
            Self::CurrentSource { current } => current,
            Self::VoltageSource { voltage } => voltage,
            Self::AcVoltageSource { magnitude, .. } => magnitude,
        }
    }

    /// Phase in degrees, AC sources only.
    pub fn phase(&self) -> Option<f64> {
        match *self {
            Self::AcVoltageSource { phase, .. } => Some(phase),
            _ => None,
        }
    }
}

/// A placed two-terminal component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub kind: ComponentKind,
    pub terminal_a: Point,
    pub terminal_b: Point,
    /// Explicit body outline. When absent the body is derived from the
    /// terminals, see [`Component::body_bounds`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Rect>,
}

impl Component {
    pub fn new(name: impl Into<String>, kind: ComponentKind, terminal_a: Point, terminal_b: Point) -> Self {
        Self {
            name: name.into(),
            kind,
            terminal_a,
            terminal_b,
            body: None,
        }
    }

    pub fn with_body(mut self, body: Rect) -> Self {
        self.body = Some(body);
        self
    }

    pub fn family(&self) -> ComponentFamily {
        self.kind.family()
    }

    pub fn terminals(&self) -> [Point; 2] {
        [self.terminal_a, self.terminal_b]
    }

    /// Body rectangle used for hit testing.
    ///
    /// Without an explicit body, the terminal bounding box is widened by
    /// `half_width` across the component's dominant direction.
    pub fn body_bounds(&self, half_width: f64) -> Rect {
        if let Some(body) = self.body {
            return body;
        }
        let span = Rect::from_corners(self.terminal_a, self.terminal_b);
        let dx = span.max.x - span.min.x;
        let dy = span.max.y - span.min.y;
        if dx >= dy {
            span.grow(0.0, half_width)
        } else {
            span.grow(half_width, 0.0)
        }
    }
}

/// A free-standing junction marker, optionally the ground reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeMarker {
    pub position: Point,
    #[serde(default)]
    pub ground: bool,
}

impl NodeMarker {
    pub fn new(position: Point) -> Self {
        Self { position, ground: false }
    }

    pub fn ground(position: Point) -> Self {
        Self { position, ground: true }
    }
}

/// An orthogonal polyline. Consecutive vertices form segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub start: Point,
    #[serde(default)]
    pub points: Vec<Point>,
}

impl Wire {
    pub fn new(start: Point) -> Self {
        Self { start, points: Vec::new() }
    }

    pub fn between(a: Point, b: Point) -> Self {
        Self::new(a).to(b)
    }

    /// Append a vertex.
    pub fn to(mut self, point: Point) -> Self {
        self.points.push(point);
        self
    }

    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.start).chain(self.points.iter().copied())
    }

    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.vertices().zip(self.points.iter().copied())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DrawingError {
    #[error("non-finite coordinate ({x}, {y}) on {element}")]
    NonFiniteCoordinate { element: String, x: f64, y: f64 },
    #[error("duplicate component name: {0}")]
    DuplicateComponentName(String),
    #[error("component #{0} has an empty name")]
    EmptyComponentName(usize),
    #[error("non-finite parameter on component {component}")]
    NonFiniteParameter { component: String },
}

/// Immutable snapshot of everything the engine needs from the editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub markers: Vec<NodeMarker>,
    #[serde(default)]
    pub wires: Vec<Wire>,
}

impl Drawing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_component(&mut self, component: Component) -> &mut Self {
        self.components.push(component);
        self
    }

    pub fn add_marker(&mut self, marker: NodeMarker) -> &mut Self {
        self.markers.push(marker);
        self
    }

    pub fn add_wire(&mut self, wire: Wire) -> &mut Self {
        self.wires.push(wire);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.markers.is_empty() && self.wires.is_empty()
    }

    pub fn ground_markers(&self) -> impl Iterator<Item = &NodeMarker> {
        self.markers.iter().filter(|m| m.ground)
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Check the preconditions the engine relies on but cannot repair.
    pub fn validate(&self) -> Result<(), DrawingError> {
        let mut names = HashSet::new();
        for (idx, component) in self.components.iter().enumerate() {
            if component.name.is_empty() {
                return Err(DrawingError::EmptyComponentName(idx));
            }
            if !names.insert(component.name.as_str()) {
                return Err(DrawingError::DuplicateComponentName(component.name.clone()));
            }
            for terminal in component.terminals() {
                check_finite(&terminal, || format!("component {}", component.name))?;
            }
            let kind = component.kind;
            if !kind.value().is_finite() || !kind.phase().unwrap_or(0.0).is_finite() {
                return Err(DrawingError::NonFiniteParameter {
                    component: component.name.clone(),
                });
            }
        }
        for (idx, marker) in self.markers.iter().enumerate() {
            check_finite(&marker.position, || format!("marker #{}", idx))?;
        }
        for (idx, wire) in self.wires.iter().enumerate() {
            for vertex in wire.vertices() {
                check_finite(&vertex, || format!("wire #{}", idx))?;
            }
        }
        Ok(())
    }
}

fn check_finite(point: &Point, element: impl FnOnce() -> String) -> Result<(), DrawingError> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(DrawingError::NonFiniteCoordinate {
            element: element(),
            x: point.x,
            y: point.y,
        })
    }
}
