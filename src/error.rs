//! Error types for scene construction and configuration.
//!
//! The stepping path never fails; these errors only surface while building
//! a scene, validating a configuration, or installing a rebuilt scene.

use thiserror::Error;

/// Errors that can occur while building or resetting a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Mass must be positive and finite for non-static nodes.
    #[error("mass must be positive and finite")]
    InvalidMass,
    /// A configuration value is out of range.
    #[error("invalid configuration value for `{field}`")]
    InvalidConfig { field: &'static str },
    /// Node index is out of bounds.
    #[error("node index {index} out of bounds (count: {count})")]
    NodeOutOfBounds { index: usize, count: usize },
    /// Spring stiffness, damping, rest length or break threshold is out of range.
    #[error("invalid spring parameter `{field}`")]
    InvalidSpring { field: &'static str },
    /// A spring must connect two distinct nodes.
    #[error("spring endpoints must be distinct nodes")]
    DegenerateSpring,
    /// Soft body must have at least 3 segments.
    #[error("soft body needs at least 3 segments")]
    InsufficientSegments,
    /// A soft body lists the same node more than once.
    #[error("node {node} appears more than once in a soft body")]
    DuplicateNode { node: usize },
    /// A node can belong to at most one soft body.
    #[error("node {node} is already part of body {body}")]
    NodeAlreadyOwned { node: usize, body: usize },
    /// The scene rebuild callback produced no usable scene.
    #[error("reset callback did not return a valid scene")]
    MalformedReset,
}
