//! Configuration types for the simulation.

use crate::error::PhysicsError;
use crate::float::Float;

/// Axis-aligned arena `[0, width] x [0, height]` that nodes collide with.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds<F: Float> {
    pub width: F,
    pub height: F,
}

impl<F: Float> Bounds<F> {
    pub fn new(width: F, height: F) -> Self {
        Bounds { width, height }
    }
}

/// Defaults used for springs created without explicit parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringDefaults<F: Float> {
    /// Spring constant. Default: 1.
    pub stiffness: F,
    /// Damping rate constant. Default: 2.
    pub damping: F,
    /// Breaking threshold for breakable springs. Default: 25.
    pub max_force: F,
}

impl<F: Float> Default for SpringDefaults<F> {
    fn default() -> Self {
        SpringDefaults {
            stiffness: F::one(),
            damping: F::two(),
            max_force: F::from_f32(25.0),
        }
    }
}

/// World tuning shared by every node, spring and body of a simulation.
///
/// Per-node material values (`gravity`, `elasticity`, `friction`,
/// `node_radius`) are defaults copied into nodes at construction; the rest is
/// read on every substep.
///
/// # Builder Pattern
/// ```
/// use boing::config::{Bounds, WorldConfig};
///
/// let config: WorldConfig<f32> = WorldConfig::new()
///     .with_bounds(Bounds::new(1024.0, 768.0))
///     .with_gravity(0.5)
///     .with_air_friction(0.0)
///     .with_substeps(4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldConfig<F: Float> {
    /// Arena nodes are confined to. Default: 800 x 600.
    pub bounds: Bounds<F>,
    /// Default gravity acceleration along +y. Negative inverts. Default: 0.981.
    pub gravity: F,
    /// Exponential air drag rate. Default: 0.02.
    pub air_friction: F,
    /// Default collision elasticity in [0, 1]. Default: 0.3.
    pub elasticity: F,
    /// Default tangential wall friction. Default: 0.4.
    pub friction: F,
    /// Default collision/pick radius. Default: 6.
    pub node_radius: F,
    /// Pull strength of the external point stimulus. Default: 1.
    pub drag_strength: F,
    /// Substeps per frame. Higher = more stable. Default: 8.
    pub substeps: usize,
    /// Frame deltas handed to `Simulation::tick` are clamped to this. Default: 1.
    pub max_frame_delta: F,
    /// Default spring parameters.
    pub spring: SpringDefaults<F>,
    /// Default pressure constant for pressurized bodies. Default: 10000.
    pub pressure: F,
}

impl<F: Float> WorldConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        WorldConfig {
            bounds: Bounds::new(F::from_f32(800.0), F::from_f32(600.0)),
            gravity: F::from_f32(0.981),
            air_friction: F::from_f32(0.02),
            elasticity: F::from_f32(0.3),
            friction: F::from_f32(0.4),
            node_radius: F::from_f32(6.0),
            drag_strength: F::one(),
            substeps: 8,
            max_frame_delta: F::one(),
            spring: SpringDefaults::default(),
            pressure: F::from_f32(10000.0),
        }
    }

    /// Set the arena nodes collide with.
    pub fn with_bounds(mut self, bounds: Bounds<F>) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the default per-node gravity.
    pub fn with_gravity(mut self, gravity: F) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the air drag rate.
    pub fn with_air_friction(mut self, air_friction: F) -> Self {
        self.air_friction = air_friction;
        self
    }

    /// Set the default collision elasticity.
    pub fn with_elasticity(mut self, elasticity: F) -> Self {
        self.elasticity = elasticity;
        self
    }

    /// Set the default tangential wall friction.
    pub fn with_friction(mut self, friction: F) -> Self {
        self.friction = friction;
        self
    }

    /// Set the default node radius.
    pub fn with_node_radius(mut self, radius: F) -> Self {
        self.node_radius = radius;
        self
    }

    /// Set the pull strength of the point stimulus.
    pub fn with_drag_strength(mut self, drag_strength: F) -> Self {
        self.drag_strength = drag_strength;
        self
    }

    /// Set the number of substeps (at least 1).
    pub fn with_substeps(mut self, substeps: usize) -> Self {
        self.substeps = substeps.max(1);
        self
    }

    /// Set the clamp applied to `Simulation::tick` deltas.
    pub fn with_max_frame_delta(mut self, max_frame_delta: F) -> Self {
        self.max_frame_delta = max_frame_delta;
        self
    }

    /// Set the defaults used by `Spring::with_defaults` and `Spring::breakable`.
    pub fn with_spring_defaults(mut self, spring: SpringDefaults<F>) -> Self {
        self.spring = spring;
        self
    }

    /// Set the default pressure constant.
    pub fn with_pressure(mut self, pressure: F) -> Self {
        self.pressure = pressure;
        self
    }

    /// Check every knob for a physically meaningful range.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let zero = F::zero();
        let check = |ok: bool, field: &'static str| {
            if ok { Ok(()) } else { Err(PhysicsError::InvalidConfig { field }) }
        };
        check(self.bounds.width > zero && self.bounds.width.is_finite(), "bounds.width")?;
        check(self.bounds.height > zero && self.bounds.height.is_finite(), "bounds.height")?;
        check(self.gravity.is_finite(), "gravity")?;
        check(self.air_friction >= zero, "air_friction")?;
        check(self.elasticity >= zero && self.elasticity <= F::one(), "elasticity")?;
        check(self.friction >= zero, "friction")?;
        check(self.node_radius > zero, "node_radius")?;
        check(self.drag_strength >= zero, "drag_strength")?;
        check(self.substeps >= 1, "substeps")?;
        check(self.max_frame_delta > zero, "max_frame_delta")?;
        check(self.spring.stiffness >= zero, "spring.stiffness")?;
        check(self.spring.damping >= zero, "spring.damping")?;
        check(self.spring.max_force > zero, "spring.max_force")?;
        check(self.pressure.is_finite(), "pressure")?;
        Ok(())
    }
}

impl<F: Float> Default for WorldConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}
