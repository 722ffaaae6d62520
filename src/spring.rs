//! Damped elastic constraints between two nodes, optionally breakable.

use crate::config::SpringDefaults;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::node::{Node, NodeId};
use crate::vec::Vec2;

/// Index of a free-standing spring inside a [`Scene`](crate::scene::Scene).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpringId(pub usize);

impl SpringId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a constraint did during one update.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Outcome<F: Float> {
    /// Nothing applied: both endpoints static, or already broken.
    Inactive,
    /// Force applied to the second endpoint (its negation went to the first).
    Applied(Vec2<F>),
    /// The constraint broke this update. Carries the force magnitude that broke it.
    Broke(F),
}

/// Common interface of constraints that push nodes around by applying forces.
pub trait ForceConstraint<F: Float> {
    /// Compute and apply this constraint's force for one substep.
    fn update(&mut self, nodes: &mut [Node<F>], dt: F) -> Outcome<F>;

    /// `false` once the constraint can never apply force again.
    fn is_active(&self) -> bool;
}

/// Breaking threshold composed into a [`Spring`].
///
/// Once broken a spring stays broken; it is never removed from its collection
/// automatically.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BreakLimit<F: Float> {
    pub max_force: F,
    broken: bool,
    last_force: F,
}

impl<F: Float> BreakLimit<F> {
    pub fn new(max_force: F) -> Self {
        BreakLimit { max_force, broken: false, last_force: F::zero() }
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Magnitude of the most recently computed force.
    pub fn last_force(&self) -> F {
        self.last_force
    }

    /// `last_force / max_force`, the value a renderer maps to a color ramp.
    pub fn stress(&self) -> F {
        self.last_force / self.max_force
    }
}

/// A damped spring pulling two nodes towards `rest_length` apart.
#[derive(Clone, Debug)]
pub struct Spring<F: Float> {
    pub a: NodeId,
    pub b: NodeId,
    pub stiffness: F,
    /// Exponential decay rate of the relative velocity along the spring.
    pub damping: F,
    pub rest_length: F,
    last_direction: Vec2<F>,
    limit: Option<BreakLimit<F>>,
}

impl<F: Float> Spring<F> {
    pub fn new(a: NodeId, b: NodeId, rest_length: F, stiffness: F, damping: F) -> Self {
        Spring {
            a,
            b,
            stiffness,
            damping,
            rest_length,
            last_direction: Vec2::zero(),
            limit: None,
        }
    }

    /// Spring using the configured default stiffness and damping.
    pub fn with_defaults(a: NodeId, b: NodeId, rest_length: F, defaults: &SpringDefaults<F>) -> Self {
        Spring::new(a, b, rest_length, defaults.stiffness, defaults.damping)
    }

    /// Breakable spring using the configured defaults, threshold included.
    pub fn breakable(a: NodeId, b: NodeId, rest_length: F, defaults: &SpringDefaults<F>) -> Self {
        Spring::with_defaults(a, b, rest_length, defaults).with_max_force(defaults.max_force)
    }

    /// Make this spring break once its force magnitude reaches `max_force`.
    pub fn with_max_force(mut self, max_force: F) -> Self {
        self.limit = Some(BreakLimit::new(max_force));
        self
    }

    /// Reject negative or non-finite parameters and non-positive break thresholds.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let zero = F::zero();
        let check = |ok: bool, field: &'static str| {
            if ok { Ok(()) } else { Err(PhysicsError::InvalidSpring { field }) }
        };
        check(self.stiffness >= zero && self.stiffness.is_finite(), "stiffness")?;
        check(self.damping >= zero && self.damping.is_finite(), "damping")?;
        check(self.rest_length >= zero && self.rest_length.is_finite(), "rest_length")?;
        if let Some(limit) = &self.limit {
            check(limit.max_force > zero && limit.max_force.is_finite(), "max_force")?;
        }
        Ok(())
    }

    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.a, self.b)
    }

    pub fn limit(&self) -> Option<&BreakLimit<F>> {
        self.limit.as_ref()
    }

    pub fn is_broken(&self) -> bool {
        self.limit.map_or(false, |l| l.is_broken())
    }

    /// Normalized stress of breakable springs, `None` for plain ones.
    pub fn stress(&self) -> Option<F> {
        self.limit.map(|l| l.stress())
    }

    /// Direction used when the endpoints coincide.
    pub fn last_direction(&self) -> Vec2<F> {
        self.last_direction
    }

    /// Force on the second endpoint: elastic restoring term plus damping.
    ///
    /// The damping term is the change in relative velocity along the spring
    /// that an `exp(-damping * dt)` decay would cause, split evenly between the
    /// endpoints unless one of them is static.
    pub fn compute_force(&mut self, nodes: &[Node<F>], dt: F) -> Vec2<F> {
        let p1 = &nodes[self.a.0];
        let p2 = &nodes[self.b.0];

        let delta = p2.pos - p1.pos;
        let distance = delta.length();
        let direction = if distance > F::zero() {
            let direction = delta.scale(F::one() / distance);
            self.last_direction = direction;
            direction
        } else {
            self.last_direction
        };

        let required_delta = direction.scale(self.rest_length);
        let elastic = (required_delta - delta).scale(self.stiffness);

        let relative_vel = (p2.vel - p1.vel).dot(direction);
        let decayed = relative_vel * (-self.damping * dt).exp();
        let share = if p1.is_static || p2.is_static { F::one() } else { F::half() };
        let damping = direction.scale((decayed - relative_vel) * share);

        elastic + damping
    }

    /// Compute this substep's force without touching the nodes.
    ///
    /// Records the force magnitude on breakable springs and breaks them when
    /// it reaches the threshold. A breaking evaluation transmits no force.
    pub fn evaluate(&mut self, nodes: &[Node<F>], dt: F) -> Outcome<F> {
        if self.is_broken() || (nodes[self.a.0].is_static && nodes[self.b.0].is_static) {
            return Outcome::Inactive;
        }

        let force = self.compute_force(nodes, dt);
        if let Some(limit) = self.limit.as_mut() {
            let magnitude = force.length();
            limit.last_force = magnitude;
            if magnitude >= limit.max_force {
                limit.broken = true;
                return Outcome::Broke(magnitude);
            }
        }
        Outcome::Applied(force)
    }

    /// Push `-force` into the first endpoint and `force` into the second.
    pub fn apply(&self, nodes: &mut [Node<F>], force: Vec2<F>, dt: F) {
        nodes[self.a.0].apply_force(-force, dt);
        nodes[self.b.0].apply_force(force, dt);
    }
}

impl<F: Float> ForceConstraint<F> for Spring<F> {
    fn update(&mut self, nodes: &mut [Node<F>], dt: F) -> Outcome<F> {
        let outcome = self.evaluate(nodes, dt);
        if let Outcome::Applied(force) = outcome {
            self.apply(nodes, force, dt);
        }
        outcome
    }

    fn is_active(&self) -> bool {
        !self.is_broken()
    }
}
