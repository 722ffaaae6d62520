//! Scene storage: the node arena plus free-standing springs and soft bodies.

use crate::config::{SpringDefaults, WorldConfig};
use crate::error::PhysicsError;
use crate::float::Float;
use crate::node::{Node, NodeId, PointStimulus};
use crate::observer::StepObserver;
use crate::softbody::{regular_polygon, EdgeSpring, SoftBody};
use crate::spring::{Outcome, Spring, SpringId};
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Index of a soft body inside a [`Scene`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub usize);

impl BodyId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Everything a simulation moves.
///
/// All nodes live in one arena. Springs and bodies refer to them by
/// [`NodeId`], so a node shared by a free-standing spring and a body is one
/// logical node. A node belongs to at most one body; body nodes are
/// integrated by their body and skipped by the free-standing node pass.
#[derive(Clone, Debug, Default)]
pub struct Scene<F: Float> {
    nodes: AllocVec<Node<F>>,
    springs: AllocVec<Spring<F>>,
    bodies: AllocVec<SoftBody<F>>,
    owner: AllocVec<Option<BodyId>>,
}

impl<F: Float> Scene<F> {
    pub fn new() -> Self {
        Scene {
            nodes: AllocVec::new(),
            springs: AllocVec::new(),
            bodies: AllocVec::new(),
            owner: AllocVec::new(),
        }
    }

    pub fn add_node(&mut self, node: Node<F>) -> Result<NodeId, PhysicsError> {
        node.validate()?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.owner.push(None);
        Ok(id)
    }

    pub fn add_spring(&mut self, spring: Spring<F>) -> Result<SpringId, PhysicsError> {
        self.check_node(spring.a)?;
        self.check_node(spring.b)?;
        if spring.a == spring.b {
            return Err(PhysicsError::DegenerateSpring);
        }
        spring.validate()?;
        let id = SpringId(self.springs.len());
        self.springs.push(spring);
        Ok(id)
    }

    /// Spring between `a` and `b` resting at their current distance.
    pub fn connect(
        &mut self,
        a: NodeId,
        b: NodeId,
        defaults: &SpringDefaults<F>,
    ) -> Result<SpringId, PhysicsError> {
        self.check_node(a)?;
        self.check_node(b)?;
        let rest = self.nodes[a.0].pos.distance(self.nodes[b.0].pos);
        self.add_spring(Spring::with_defaults(a, b, rest, defaults))
    }

    /// Register a body and claim its nodes.
    pub fn add_body(&mut self, body: SoftBody<F>) -> Result<BodyId, PhysicsError> {
        for &id in body.nodes() {
            self.check_node(id)?;
            if let Some(owner) = self.owner[id.0] {
                return Err(PhysicsError::NodeAlreadyOwned { node: id.0, body: owner.0 });
            }
        }
        let id = BodyId(self.bodies.len());
        for node in body.nodes() {
            self.owner[node.0] = Some(id);
        }
        self.bodies.push(body);
        Ok(id)
    }

    /// Lay out `sides` copies of `template` on a circle and ring them into a
    /// body. Pass `pressure` to inflate it.
    pub fn add_regular_polygon(
        &mut self,
        center: Vec2<F>,
        radius: F,
        sides: usize,
        template: &Node<F>,
        edge: EdgeSpring<F>,
        pressure: Option<F>,
    ) -> Result<BodyId, PhysicsError> {
        if sides < 3 {
            return Err(PhysicsError::InsufficientSegments);
        }
        template.validate()?;

        let first = self.nodes.len();
        let mut ids = AllocVec::with_capacity(sides);
        for pos in regular_polygon(center, radius, sides) {
            let mut node = template.clone();
            node.pos = pos;
            ids.push(self.add_node(node)?);
        }

        let body = match pressure {
            Some(p) => SoftBody::pressurized(ids, edge, p, &self.nodes),
            None => SoftBody::new(ids, edge, &self.nodes),
        };
        match body.and_then(|b| self.add_body(b)) {
            Ok(id) => Ok(id),
            Err(e) => {
                self.nodes.truncate(first);
                self.owner.truncate(first);
                Err(e)
            }
        }
    }

    /// Drop broken springs. Returns how many were removed.
    ///
    /// Spring ids after the first removed spring shift down.
    pub fn prune_broken_springs(&mut self) -> usize {
        let before = self.springs.len();
        self.springs.retain(|s| !s.is_broken());
        before - self.springs.len()
    }

    pub fn nodes(&self) -> &[Node<F>] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node<F>] {
        &mut self.nodes
    }

    pub fn node(&self, id: NodeId) -> &Node<F> {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<F> {
        &mut self.nodes[id.0]
    }

    pub fn springs(&self) -> &[Spring<F>] {
        &self.springs
    }

    pub fn spring(&self, id: SpringId) -> &Spring<F> {
        &self.springs[id.0]
    }

    pub fn bodies(&self) -> &[SoftBody<F>] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> &SoftBody<F> {
        &self.bodies[id.0]
    }

    /// Body that integrates `node`, if any.
    pub fn owner_of(&self, node: NodeId) -> Option<BodyId> {
        self.owner.get(node.0).copied().flatten()
    }

    /// Nodes not owned by any body.
    pub fn free_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.owner
            .iter()
            .enumerate()
            .filter(|(_, owner)| owner.is_none())
            .map(|(i, _)| NodeId(i))
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn spring_count(&self) -> usize { self.springs.len() }
    pub fn body_count(&self) -> usize { self.bodies.len() }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.springs.is_empty() && self.bodies.is_empty()
    }

    fn check_node(&self, id: NodeId) -> Result<(), PhysicsError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(PhysicsError::NodeOutOfBounds { index: id.0, count: self.nodes.len() })
        }
    }

    pub(crate) fn update_bodies<O: StepObserver>(
        &mut self,
        dt: F,
        stimulus: PointStimulus<F>,
        config: &WorldConfig<F>,
        observer: &mut O,
    ) {
        for (i, body) in self.bodies.iter_mut().enumerate() {
            body.update(&mut self.nodes, dt, stimulus, config, |edge, magnitude| {
                debug!(body = i, edge, magnitude = ?magnitude, "edge spring broke");
                observer.on_edge_broken(BodyId(i), edge);
            });
        }
    }

    #[cfg(not(feature = "parallel"))]
    pub(crate) fn update_springs<O: StepObserver>(&mut self, dt: F, observer: &mut O) {
        for (i, spring) in self.springs.iter_mut().enumerate() {
            let outcome = spring.evaluate(&self.nodes, dt);
            match outcome {
                Outcome::Applied(force) => spring.apply(&mut self.nodes, force, dt),
                Outcome::Broke(magnitude) => report_break(i, spring, magnitude, observer),
                Outcome::Inactive => {}
            }
        }
    }

    /// Evaluate every spring against the same node snapshot in parallel, then
    /// apply the forces serially in spring order.
    #[cfg(feature = "parallel")]
    pub(crate) fn update_springs<O: StepObserver>(&mut self, dt: F, observer: &mut O) {
        let nodes = &self.nodes;
        let outcomes: AllocVec<Outcome<F>> = self
            .springs
            .par_iter_mut()
            .map(|spring| spring.evaluate(nodes, dt))
            .collect();

        for (i, (spring, outcome)) in self.springs.iter().zip(outcomes).enumerate() {
            match outcome {
                Outcome::Applied(force) => spring.apply(&mut self.nodes, force, dt),
                Outcome::Broke(magnitude) => report_break(i, spring, magnitude, observer),
                Outcome::Inactive => {}
            }
        }
    }

    pub(crate) fn update_free_nodes(
        &mut self,
        dt: F,
        stimulus: PointStimulus<F>,
        config: &WorldConfig<F>,
    ) {
        for (node, owner) in self.nodes.iter_mut().zip(&self.owner) {
            if owner.is_some() {
                continue;
            }
            node.apply_external_point_force(stimulus, dt, config.drag_strength);
            node.integrate(dt, config);
        }
    }
}

fn report_break<F: Float, O: StepObserver>(
    index: usize,
    spring: &Spring<F>,
    magnitude: F,
    observer: &mut O,
) {
    debug!(
        spring = index,
        magnitude = ?magnitude,
        max_force = ?spring.limit().map(|l| l.max_force),
        "spring broke"
    );
    observer.on_spring_broken(SpringId(index));
}
