//! 2D soft bodies: closed rings of nodes joined by edge springs, optionally
//! inflated by an internal pressure.

use crate::config::{SpringDefaults, WorldConfig};
use crate::error::PhysicsError;
use crate::float::Float;
use crate::node::{Node, NodeId, PointStimulus};
use crate::spring::{ForceConstraint, Outcome, Spring};
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

/// Keeps the pressure finite when the ring collapses to zero area.
const AREA_EPSILON: f32 = 1e-6;

/// Edge length below which an edge is treated as degenerate.
const EDGE_EPSILON: f32 = 1e-10;

/// Parameters shared by every edge spring of a soft body.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeSpring<F: Float> {
    pub stiffness: F,
    pub damping: F,
    /// Rest length of every edge. `None` keeps each edge's initial length.
    pub rest_length: Option<F>,
    /// Break threshold of every edge. `None` makes the edges unbreakable.
    pub max_force: Option<F>,
}

impl<F: Float> EdgeSpring<F> {
    pub fn new(stiffness: F, damping: F) -> Self {
        EdgeSpring { stiffness, damping, rest_length: None, max_force: None }
    }

    pub fn from_defaults(defaults: &SpringDefaults<F>) -> Self {
        EdgeSpring::new(defaults.stiffness, defaults.damping)
    }

    pub fn with_rest_length(mut self, rest_length: F) -> Self {
        self.rest_length = Some(rest_length);
        self
    }

    /// Make every edge break once its force reaches `max_force`.
    pub fn with_max_force(mut self, max_force: F) -> Self {
        self.max_force = Some(max_force);
        self
    }
}

/// Internal gas pressure of a soft body.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pressure<F: Float> {
    /// Pressure per unit area is `constant / area`.
    pub constant: F,
    centroid: Vec2<F>,
    area: F,
}

impl<F: Float> Pressure<F> {
    pub fn new(constant: F) -> Self {
        Pressure { constant, centroid: Vec2::zero(), area: F::zero() }
    }

    /// Mean node position as of the last pressure step.
    pub fn centroid(&self) -> Vec2<F> {
        self.centroid
    }

    /// Enclosed area as of the last pressure step.
    pub fn area(&self) -> F {
        self.area
    }
}

/// A closed ring of nodes: edge `i` joins node `i` and node `(i + 1) % n`.
///
/// The body refers to nodes living in a [`Scene`](crate::scene::Scene) arena
/// and owns one spring per edge.
#[derive(Clone, Debug)]
pub struct SoftBody<F: Float> {
    nodes: AllocVec<NodeId>,
    springs: AllocVec<Spring<F>>,
    /// Let the external point stimulus grab this body's nodes.
    pub draggable_points: bool,
    pressure: Option<Pressure<F>>,
}

impl<F: Float> SoftBody<F> {
    /// Build a ring over `nodes` with one edge spring per cycle edge.
    pub fn new(
        nodes: AllocVec<NodeId>,
        edge: EdgeSpring<F>,
        arena: &[Node<F>],
    ) -> Result<Self, PhysicsError> {
        let n = nodes.len();
        if n < 3 {
            return Err(PhysicsError::InsufficientSegments);
        }
        for id in &nodes {
            if id.0 >= arena.len() {
                return Err(PhysicsError::NodeOutOfBounds { index: id.0, count: arena.len() });
            }
        }
        let mut sorted = nodes.clone();
        sorted.sort_unstable();
        if let Some(pair) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(PhysicsError::DuplicateNode { node: pair[0].0 });
        }

        let mut springs = AllocVec::with_capacity(n);
        for i in 0..n {
            let a = nodes[i];
            let b = nodes[(i + 1) % n];
            let rest = edge
                .rest_length
                .unwrap_or_else(|| arena[a.0].pos.distance(arena[b.0].pos));
            let mut spring = Spring::new(a, b, rest, edge.stiffness, edge.damping);
            if let Some(max_force) = edge.max_force {
                spring = spring.with_max_force(max_force);
            }
            spring.validate()?;
            springs.push(spring);
        }

        Ok(SoftBody { nodes, springs, draggable_points: false, pressure: None })
    }

    /// Build a ring that is inflated by `pressure` every substep.
    pub fn pressurized(
        nodes: AllocVec<NodeId>,
        edge: EdgeSpring<F>,
        pressure: F,
        arena: &[Node<F>],
    ) -> Result<Self, PhysicsError> {
        let mut body = SoftBody::new(nodes, edge, arena)?;
        body.pressure = Some(Pressure::new(pressure));
        Ok(body)
    }

    pub fn with_draggable_points(mut self, draggable_points: bool) -> Self {
        self.draggable_points = draggable_points;
        self
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn springs(&self) -> &[Spring<F>] {
        &self.springs
    }

    pub fn pressure(&self) -> Option<&Pressure<F>> {
        self.pressure.as_ref()
    }

    pub fn is_pressurized(&self) -> bool {
        self.pressure.is_some()
    }

    /// Number of edge springs that have broken.
    pub fn broken_edges(&self) -> usize {
        self.springs.iter().filter(|s| s.is_broken()).count()
    }

    /// Advance the body by one substep.
    ///
    /// Pressurized bodies push on their edges first, using the current shape,
    /// then run the edge springs, then integrate nodes. Plain bodies skip the
    /// pressure step. `on_break` gets the edge index and force magnitude of
    /// every edge that breaks during this substep.
    pub fn update<B>(
        &mut self,
        arena: &mut [Node<F>],
        dt: F,
        stimulus: PointStimulus<F>,
        config: &WorldConfig<F>,
        mut on_break: B,
    ) where
        B: FnMut(usize, F),
    {
        self.apply_pressure(arena, dt);

        for (edge, spring) in self.springs.iter_mut().enumerate() {
            if let Outcome::Broke(magnitude) = spring.update(arena, dt) {
                on_break(edge, magnitude);
            }
        }

        for id in &self.nodes {
            let node = &mut arena[id.0];
            if self.draggable_points {
                node.apply_external_point_force(stimulus, dt, config.drag_strength);
            }
            node.integrate(dt, config);
        }
    }

    /// Push every edge outwards along its normal.
    ///
    /// Each edge carries `constant / area` scaled by its share of the
    /// perimeter, and both of its endpoints receive that force.
    fn apply_pressure(&mut self, arena: &mut [Node<F>], dt: F) {
        let Some(pressure) = self.pressure.as_mut() else {
            return;
        };

        let signed = signed_area(&self.nodes, arena);
        let area = signed.abs();
        pressure.area = area;
        pressure.centroid = centroid(&self.nodes, arena);

        let total = perimeter(&self.nodes, arena);
        if total.is_near_zero(F::from_f32(EDGE_EPSILON)) {
            return;
        }

        let per_unit = pressure.constant / (area + F::from_f32(AREA_EPSILON));
        let orientation = signed.signum();
        let n = self.nodes.len();
        for i in 0..n {
            let a = self.nodes[i].0;
            let b = self.nodes[(i + 1) % n].0;
            let edge = arena[b].pos - arena[a].pos;
            let len = edge.length();
            if len.is_near_zero(F::from_f32(EDGE_EPSILON)) {
                continue;
            }
            let normal = Vec2::new(edge.y, -edge.x).scale(orientation / len);
            let force = normal.scale(per_unit * len / total);
            arena[a].apply_force(force, dt);
            arena[b].apply_force(force, dt);
        }
    }

    /// Enclosed area from the current node positions (shoelace formula).
    pub fn area(&self, arena: &[Node<F>]) -> F {
        signed_area(&self.nodes, arena).abs()
    }

    /// Sum of the current edge lengths.
    pub fn perimeter(&self, arena: &[Node<F>]) -> F {
        perimeter(&self.nodes, arena)
    }

    /// Mean node position.
    pub fn centroid(&self, arena: &[Node<F>]) -> Vec2<F> {
        centroid(&self.nodes, arena)
    }

    /// Nonzero winding test against the current ring. Works for either
    /// node order; points exactly on an edge may land on either side.
    pub fn contains(&self, arena: &[Node<F>], point: Vec2<F>) -> bool {
        let zero = F::zero();
        let mut winding = 0i32;
        for (a, b) in edges(&self.nodes, arena) {
            let side = (b - a).cross(point - a);
            if a.y <= point.y {
                if b.y > point.y && side > zero {
                    winding += 1;
                }
            } else if b.y <= point.y && side < zero {
                winding -= 1;
            }
        }
        winding != 0
    }

    /// Current node positions in ring order.
    pub fn positions(&self, arena: &[Node<F>]) -> AllocVec<Vec2<F>> {
        self.nodes.iter().map(|id| arena[id.0].pos).collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// `sides` points evenly spaced on a circle, counter-clockwise from +x
/// (in y-up terms).
pub fn regular_polygon<F: Float>(center: Vec2<F>, radius: F, sides: usize) -> AllocVec<Vec2<F>> {
    let two_pi = F::two() * F::pi();
    (0..sides)
        .map(|i| {
            let angle = two_pi * F::from_usize(i) / F::from_usize(sides);
            Vec2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

/// Consecutive position pairs around the ring, closing edge included.
fn edges<'a, F: Float>(
    ids: &'a [NodeId],
    arena: &'a [Node<F>],
) -> impl Iterator<Item = (Vec2<F>, Vec2<F>)> + 'a {
    ids.iter()
        .zip(ids.iter().cycle().skip(1))
        .map(move |(a, b)| (arena[a.0].pos, arena[b.0].pos))
}

fn signed_area<F: Float>(ids: &[NodeId], arena: &[Node<F>]) -> F {
    if ids.len() < 3 {
        return F::zero();
    }
    edges(ids, arena).fold(F::zero(), |sum, (a, b)| sum + a.cross(b)) * F::half()
}

fn perimeter<F: Float>(ids: &[NodeId], arena: &[Node<F>]) -> F {
    edges(ids, arena).fold(F::zero(), |sum, (a, b)| sum + a.distance(b))
}

fn centroid<F: Float>(ids: &[NodeId], arena: &[Node<F>]) -> Vec2<F> {
    if ids.is_empty() {
        return Vec2::zero();
    }
    let sum = ids.iter().fold(Vec2::zero(), |sum, id| sum + arena[id.0].pos);
    sum.scale(F::one() / F::from_usize(ids.len()))
}
