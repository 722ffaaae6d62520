//! 2D mass-spring physics for games and toys.
//!
//! `boing` simulates point masses ("nodes") joined by damped springs, closed
//! soft bodies that can be inflated by an internal pressure, breakable
//! springs, wall collisions, and dragging nodes around with an external point
//! stimulus. A [`Simulation`] advances everything in fixed substeps.
//!
//! # Features
//!
//! - **Damped springs**: elastic restoring force plus exponential damping of
//!   the relative velocity along the spring
//! - **Breakable springs**: permanently switch off past a force threshold,
//!   with a stress ratio for renderers; soft-body edges can break too
//! - **Soft bodies**: rings of nodes with edge springs, optionally pressurized
//!   with a pressure inversely proportional to the enclosed area
//! - **Arena storage**: nodes live in one [`Scene`] and are shared by index
//! - **Observable**: breakage and step events through the [`StepObserver`] trait
//! - **`no_std` compatible**: needs only `alloc`
//!
//! # Example
//!
//! ```
//! use boing::{NoOpStepObserver, Node, PointStimulus, Scene, Simulation, Spring, Vec2, WorldConfig};
//!
//! let config: WorldConfig<f32> = WorldConfig::new();
//! let mut scene = Scene::new();
//! let anchor = scene.add_node(Node::fixed(Vec2::new(400.0, 100.0), &config)).unwrap();
//! let bob = scene.add_node(Node::new(Vec2::new(400.0, 200.0), &config)).unwrap();
//! scene.add_spring(Spring::new(anchor, bob, 100.0, 1.0, 2.0)).unwrap();
//!
//! let mut sim = Simulation::new(config, scene).unwrap();
//! for _ in 0..60 {
//!     sim.tick(1.0, PointStimulus::released(), &mut NoOpStepObserver);
//! }
//! assert!(sim.scene().node(bob).pos.y > 200.0);
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod node;
pub mod spring;
pub mod softbody;
pub mod scene;
pub mod simulation;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec2;
pub use node::{Collision, Node, NodeId, PointStimulus};
pub use spring::{BreakLimit, ForceConstraint, Outcome, Spring, SpringId};
pub use softbody::{EdgeSpring, Pressure, SoftBody};
pub use scene::{BodyId, Scene};
pub use simulation::{RebuildFn, Simulation};
pub use config::{Bounds, SpringDefaults, WorldConfig};
pub use observer::{NoOpStepObserver, StepObserver};
pub use error::PhysicsError;
