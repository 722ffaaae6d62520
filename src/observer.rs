//! Step observer trait for monitoring simulation progress.

use crate::scene::BodyId;
use crate::spring::SpringId;

/// Trait for observing simulation steps.
///
/// Implement this trait to react to simulation events (breakage feedback,
/// debugging, profiling). All methods have default no-op implementations.
pub trait StepObserver {
    /// Called after each substep completes.
    fn on_substep(&mut self, _substep: usize) {}

    /// Called when a free-standing breakable spring breaks.
    fn on_spring_broken(&mut self, _spring: SpringId) {}

    /// Called when edge `edge` of soft body `body` breaks.
    fn on_edge_broken(&mut self, _body: BodyId, _edge: usize) {}

    /// Called when a full step is complete.
    fn on_step_complete(&mut self) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
