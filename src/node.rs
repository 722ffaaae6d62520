//! Point masses integrated with explicit velocities.

use core::array;
use core::iter::Flatten;

use crate::config::{Bounds, WorldConfig};
use crate::error::PhysicsError;
use crate::float::Float;
use crate::vec::Vec2;

/// Index of a node inside a [`Scene`](crate::scene::Scene) arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An external point stimulus: a target point and whether it is active.
///
/// Hosts fill this from whatever input they poll (a mouse, a touch, a script).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointStimulus<F: Float> {
    pub point: Vec2<F>,
    pub pressed: bool,
}

impl<F: Float> PointStimulus<F> {
    pub fn new(point: Vec2<F>, pressed: bool) -> Self {
        PointStimulus { point, pressed }
    }

    /// Active stimulus at `point`.
    pub fn pressed_at(point: Vec2<F>) -> Self {
        PointStimulus { point, pressed: true }
    }

    /// Inactive stimulus. Releases any node currently being dragged.
    pub fn released() -> Self {
        PointStimulus { point: Vec2::zero(), pressed: false }
    }
}

/// A wall contact: how far the node's circle overlaps a boundary and the unit
/// normal pointing back into the arena.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Collision<F: Float> {
    pub depth: F,
    pub normal: Vec2<F>,
}

/// Wall contacts of one node, in left, right, top, bottom order.
pub type Collisions<F> = Flatten<array::IntoIter<Option<Collision<F>>, 4>>;

/// A point mass with explicit position and velocity.
#[derive(Clone, Debug)]
pub struct Node<F: Float> {
    pub pos: Vec2<F>,
    pub vel: Vec2<F>,
    pub mass: F,
    /// Acceleration along +y. Negative values invert gravity for this node.
    pub gravity: F,
    pub radius: F,
    pub elasticity: F,
    pub friction: F,
    /// Static nodes ignore forces and integration.
    pub is_static: bool,
    pub draggable: bool,
    dragging: bool,
}

impl<F: Float> Node<F> {
    /// Unit-mass, draggable node using the material defaults of `config`.
    pub fn new(pos: Vec2<F>, config: &WorldConfig<F>) -> Self {
        Node {
            pos,
            vel: Vec2::zero(),
            mass: F::one(),
            gravity: config.gravity,
            radius: config.node_radius,
            elasticity: config.elasticity,
            friction: config.friction,
            is_static: false,
            draggable: true,
            dragging: false,
        }
    }

    /// Static node: an anchor that only moves when dragged or moved explicitly.
    pub fn fixed(pos: Vec2<F>, config: &WorldConfig<F>) -> Self {
        Node { is_static: true, ..Node::new(pos, config) }
    }

    /// Set the mass. Must be positive for dynamic nodes.
    pub fn with_mass(mut self, mass: F) -> Self {
        self.mass = mass;
        self
    }

    /// Set the initial velocity.
    pub fn with_velocity(mut self, vel: Vec2<F>) -> Self {
        self.vel = vel;
        self
    }

    /// Override the configured gravity for this node.
    pub fn with_gravity(mut self, gravity: F) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the collision and pick radius.
    pub fn with_radius(mut self, radius: F) -> Self {
        self.radius = radius;
        self
    }

    /// Set the wall bounce factor.
    pub fn with_elasticity(mut self, elasticity: F) -> Self {
        self.elasticity = elasticity;
        self
    }

    /// Set the tangential wall friction.
    pub fn with_friction(mut self, friction: F) -> Self {
        self.friction = friction;
        self
    }

    /// Allow or forbid grabbing by the point stimulus.
    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    /// Check mass and material values before the node enters a scene.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.is_static && !(self.mass > F::zero() && self.mass.is_finite()) {
            return Err(PhysicsError::InvalidMass);
        }
        if !(self.radius >= F::zero()) {
            return Err(PhysicsError::InvalidConfig { field: "radius" });
        }
        if !(self.elasticity >= F::zero() && self.elasticity <= F::one()) {
            return Err(PhysicsError::InvalidConfig { field: "elasticity" });
        }
        if !(self.friction >= F::zero()) {
            return Err(PhysicsError::InvalidConfig { field: "friction" });
        }
        Ok(())
    }

    /// Whether an external point stimulus currently holds this node.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Toggle static. Becoming static drops any velocity.
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
        if is_static {
            self.vel = Vec2::zero();
        }
    }

    /// Allow or forbid grabbing. Forbidding also releases a current grab.
    pub fn set_draggable(&mut self, draggable: bool) {
        self.draggable = draggable;
        if !draggable {
            self.dragging = false;
        }
    }

    /// Reposition a static node. Dynamic nodes are left alone.
    pub fn move_to(&mut self, pos: Vec2<F>) {
        if self.is_static {
            self.pos = pos;
        }
    }

    /// Change velocity by `force * dt / mass`. The only path external forces take.
    pub fn apply_force(&mut self, force: Vec2<F>, dt: F) {
        if self.is_static {
            return;
        }
        self.vel += force.scale(dt / self.mass);
    }

    /// Gravity, air drag, position update and wall response for one substep.
    pub fn integrate(&mut self, dt: F, config: &WorldConfig<F>) {
        if self.is_static || !(dt > F::zero()) {
            return;
        }

        self.vel.y = self.vel.y + self.gravity * dt;
        self.vel = self.vel.scale((-config.air_friction * dt).exp());
        self.pos += self.vel.scale(dt);

        for collision in self.find_collisions(&config.bounds) {
            self.resolve_collision(collision, dt);
        }
    }

    /// Walls the node's circle currently overlaps.
    ///
    /// Each side is tested on its own, so a node in a corner yields two
    /// contacts. Depths are always positive.
    pub fn find_collisions(&self, bounds: &Bounds<F>) -> Collisions<F> {
        let zero = F::zero();
        let one = F::one();
        let r = self.radius;
        let p = self.pos;

        let left = (p.x - r < zero).then(|| Collision {
            depth: -(p.x - r),
            normal: Vec2::new(one, zero),
        });
        let right = (p.x + r > bounds.width).then(|| Collision {
            depth: p.x + r - bounds.width,
            normal: Vec2::new(-one, zero),
        });
        let top = (p.y - r < zero).then(|| Collision {
            depth: -(p.y - r),
            normal: Vec2::new(zero, one),
        });
        let bottom = (p.y + r > bounds.height).then(|| Collision {
            depth: p.y + r - bounds.height,
            normal: Vec2::new(zero, -one),
        });

        [left, right, top, bottom].into_iter().flatten()
    }

    fn resolve_collision(&mut self, collision: Collision<F>, dt: F) {
        if collision.depth < F::zero() {
            return;
        }
        let n = collision.normal;
        self.pos += n.scale(collision.depth);

        let normal_vel = n.scale(self.vel.dot(n));
        let tangential_vel = self.vel - normal_vel;
        self.vel = normal_vel.scale(-self.elasticity)
            + tangential_vel.scale((-self.friction * dt).exp());
    }

    /// Let an external point stimulus grab and pull this node.
    ///
    /// The grab latches while `pressed` stays true, even if the point moves
    /// outside the node's radius. Static nodes teleport to the point; dynamic
    /// nodes lose their velocity and get pulled towards it.
    pub fn apply_external_point_force(
        &mut self,
        stimulus: PointStimulus<F>,
        dt: F,
        drag_strength: F,
    ) {
        if !self.draggable {
            return;
        }

        if !stimulus.pressed {
            self.dragging = false;
            return;
        }

        let grabbed = self.pos.distance_sq(stimulus.point) <= self.radius * self.radius;
        if !(self.dragging || grabbed) {
            return;
        }

        if self.is_static {
            self.pos = stimulus.point;
        } else {
            self.vel = Vec2::zero();
            let pull = (stimulus.point - self.pos).scale(drag_strength * self.mass);
            self.apply_force(pull, dt);
        }
        self.dragging = true;
    }
}
