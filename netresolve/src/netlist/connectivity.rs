//! Connectivity Resolver
//!
//! Partitions every electrical point of a drawing (component terminals,
//! node markers, wire vertices) into equivalence classes. Points are
//! identified by their grid point, wire segments join their endpoints, and
//! a union-find over the whole point universe yields the electrical nodes.
//! One class is renamed to the ground identifier.
//!
//! Nothing is cached between calls: every [`ConnectivityResolver::resolve`]
//! derives the map from the snapshot it is given.

use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::EngineOptions;
use crate::drawing::{Drawing, GridPoint, Point};

/// Name given to the ground node, both in component records and in the
/// trailing `GND` record.
pub const GROUND_NODE: &str = "0";

/// How to pick the ground node when several markers are flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroundPolicy {
    /// All flagged markers are the same reference and are joined.
    #[default]
    MergeAll,
    /// The first flagged marker in drawing order wins.
    FirstMarker,
    /// The last flagged marker in drawing order wins.
    LastMarker,
}

/// What to do with a terminal that touches nothing at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DanglingPolicy {
    /// It becomes a singleton node of its own.
    #[default]
    Isolated,
    /// It is left out of the map and surfaces as `UNCONNECTED`.
    Unconnected,
}

/// A resolved electrical node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectricalNode {
    pub name: String,
    /// Member points, first-seen coordinates, in discovery order.
    pub points: Vec<Point>,
    pub is_ground: bool,
}

/// Entry already stored for `point`: its own cell first, else the nearest
/// entry in a neighbouring cell that lies strictly within `tolerance`.
fn find_near<V: Copy>(
    map: &HashMap<GridPoint, V>,
    point: &Point,
    tolerance: f64,
    coord_of: impl Fn(V) -> Point,
) -> Option<V> {
    let key = point.to_grid(tolerance);
    if let Some(&found) = map.get(&key) {
        return Some(found);
    }
    key.neighbors()
        .filter_map(|cell| map.get(&cell).copied())
        .map(|candidate| (coord_of(candidate).distance(point), candidate))
        .filter(|(d, _)| *d < tolerance)
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, candidate)| candidate)
}

/// Output of one resolution pass: point -> node lookup plus the ground node.
#[derive(Debug, Clone)]
pub struct Connectivity {
    nodes: Vec<ElectricalNode>,
    /// Grid cell -> (stored coordinates, node index)
    lookup: HashMap<GridPoint, (Point, usize)>,
    ground: Option<usize>,
    tolerance: f64,
}

impl Connectivity {
    fn empty(tolerance: f64) -> Self {
        Self {
            nodes: Vec::new(),
            lookup: HashMap::new(),
            ground: None,
            tolerance,
        }
    }

    /// Nodes in first-discovery order.
    pub fn nodes(&self) -> &[ElectricalNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn node_index(&self, point: &Point) -> Option<usize> {
        find_near(&self.lookup, point, self.tolerance, |(coord, _)| coord).map(|(_, idx)| idx)
    }

    pub fn node_at(&self, point: &Point) -> Option<&ElectricalNode> {
        self.node_index(point).map(|idx| &self.nodes[idx])
    }

    pub fn node_name_at(&self, point: &Point) -> Option<&str> {
        self.node_at(point).map(|n| n.name.as_str())
    }

    pub fn ground(&self) -> Option<&ElectricalNode> {
        self.ground.map(|idx| &self.nodes[idx])
    }

    pub fn ground_name(&self) -> Option<&str> {
        self.ground().map(|n| n.name.as_str())
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.name.as_str())
    }

    /// Every mapped point with its node, node by node.
    pub fn resolved_points(&self) -> impl Iterator<Item = (&Point, &ElectricalNode)> {
        self.nodes
            .iter()
            .flat_map(|node| node.points.iter().map(move |p| (p, node)))
    }

    /// True when both points resolve to the same node.
    pub fn connected(&self, a: &Point, b: &Point) -> bool {
        match (self.node_index(a), self.node_index(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }
}

/// Deduplicated points in insertion order.
#[derive(Default)]
struct PointUniverse {
    grid: Vec<GridPoint>,
    coords: Vec<Point>,
    index: HashMap<GridPoint, usize>,
    /// Component terminals landing on each point.
    terminal_refs: Vec<usize>,
    /// A marker or a wire vertex sits on the point.
    touched: Vec<bool>,
}

impl PointUniverse {
    fn intern(&mut self, point: Point, tolerance: f64) -> usize {
        let coords = &self.coords;
        if let Some(idx) = find_near(&self.index, &point, tolerance, |idx| coords[idx]) {
            return idx;
        }
        let key = point.to_grid(tolerance);
        let idx = self.grid.len();
        self.grid.push(key);
        self.coords.push(point);
        self.terminal_refs.push(0);
        self.touched.push(false);
        self.index.insert(key, idx);
        idx
    }

    fn len(&self) -> usize {
        self.grid.len()
    }

    fn is_dangling(&self, class: &[usize]) -> bool {
        match class {
            [only] => self.terminal_refs[*only] == 1 && !self.touched[*only],
            _ => false,
        }
    }
}

/// Connectivity resolver
pub struct ConnectivityResolver;

impl ConnectivityResolver {
    /// Resolve a drawing snapshot into electrical nodes
    pub fn resolve(drawing: &Drawing, options: &EngineOptions) -> Connectivity {
        let tolerance = options.tolerance();
        let mut universe = PointUniverse::default();

        // Step 1: terminals in placement order, then markers
        for component in &drawing.components {
            for terminal in component.terminals() {
                let idx = universe.intern(terminal, tolerance);
                universe.terminal_refs[idx] += 1;
            }
        }

        let mut ground_points = Vec::new();
        for marker in &drawing.markers {
            let idx = universe.intern(marker.position, tolerance);
            universe.touched[idx] = true;
            if marker.ground {
                ground_points.push(idx);
            }
        }

        // Step 2: wire vertices join the universe, segments become edges
        let mut edges = Vec::new();
        for wire in &drawing.wires {
            let mut previous: Option<usize> = None;
            for vertex in wire.vertices() {
                let idx = universe.intern(vertex, tolerance);
                universe.touched[idx] = true;
                match previous {
                    Some(prev) if prev != idx => edges.push((prev, idx)),
                    _ => {}
                }
                previous = Some(idx);
            }
        }

        if universe.len() == 0 {
            return Connectivity::empty(tolerance);
        }

        // Step 3: union-find over the universe
        let mut sets = UnionFind::<usize>::new(universe.len());
        for &(a, b) in &edges {
            sets.union(a, b);
        }

        let explicit_ground = Self::select_ground_point(&mut sets, &ground_points, options);

        // Step 4: classes in order of their first-discovered member
        let mut class_of_root: HashMap<usize, usize> = HashMap::new();
        let mut classes: Vec<Vec<usize>> = Vec::new();
        for idx in 0..universe.len() {
            let root = sets.find_mut(idx);
            let class = *class_of_root.entry(root).or_insert_with(|| {
                classes.push(Vec::new());
                classes.len() - 1
            });
            classes[class].push(idx);
        }

        // Step 5: ground class, explicit or by heuristic
        let ground_class = match explicit_ground {
            Some(point) => class_of_root.get(&sets.find_mut(point)).copied(),
            None if options.fallback_ground => Self::fallback_ground_class(&universe, &classes),
            None => None,
        };

        let mut nodes = Vec::with_capacity(classes.len());
        let mut lookup = HashMap::with_capacity(universe.len());
        let mut ground = None;
        let mut counter = 0;
        let mut dangling = 0;

        for (class, members) in classes.iter().enumerate() {
            let is_ground = ground_class == Some(class);
            if !is_ground
                && options.dangling == DanglingPolicy::Unconnected
                && universe.is_dangling(members)
            {
                dangling += 1;
                continue;
            }

            let name = if is_ground {
                GROUND_NODE.to_string()
            } else {
                counter += 1;
                format!("N{}", counter)
            };

            let node_idx = nodes.len();
            if is_ground {
                ground = Some(node_idx);
            }
            for &member in members {
                lookup.insert(universe.grid[member], (universe.coords[member], node_idx));
            }
            nodes.push(ElectricalNode {
                name,
                points: members.iter().map(|&m| universe.coords[m]).collect(),
                is_ground,
            });
        }

        tracing::debug!(
            "Resolved {} points ({} wire edges) into {} nodes, {} dangling terminals left unconnected, ground: {:?}",
            universe.len(),
            edges.len(),
            nodes.len(),
            dangling,
            ground.map(|idx: usize| nodes[idx].name.as_str())
        );

        Connectivity {
            nodes,
            lookup,
            ground,
            tolerance,
        }
    }

    /// Point whose class becomes ground, when markers decide it.
    fn select_ground_point(
        sets: &mut UnionFind<usize>,
        ground_points: &[usize],
        options: &EngineOptions,
    ) -> Option<usize> {
        match ground_points {
            [] => None,
            [only] => Some(*only),
            [first, rest @ ..] => {
                tracing::warn!(
                    "{} ground markers flagged, applying {:?}",
                    ground_points.len(),
                    options.ground_policy
                );
                match options.ground_policy {
                    GroundPolicy::MergeAll => {
                        for &other in rest {
                            sets.union(*first, other);
                        }
                        Some(*first)
                    }
                    GroundPolicy::FirstMarker => Some(*first),
                    GroundPolicy::LastMarker => ground_points.last().copied(),
                }
            }
        }
    }

    /// Class owning the topmost point of the drawing, leftmost on ties.
    fn fallback_ground_class(universe: &PointUniverse, classes: &[Vec<usize>]) -> Option<usize> {
        let top_left = |a: &Point, b: &Point| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x));
        classes
            .iter()
            .enumerate()
            .filter_map(|(class, members)| {
                members
                    .iter()
                    .map(|&m| universe.coords[m])
                    .min_by(|a, b| top_left(a, b))
                    .map(|top| (class, top))
            })
            .min_by(|(_, a), (_, b)| top_left(a, b))
            .map(|(class, _)| class)
    }
}
