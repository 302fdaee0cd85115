//! A 2D rigid-body physics engine built around one pipeline: broad-phase
//! pair generation, narrow-phase contact manifolds with persistent caching
//! and warm-starting, an iterative projected Gauss-Seidel impulse solver
//! for contacts and joints, and symplectic Euler integration.
//!
//! The entry point is [`Space`]: populate it with [`RigidBody`]s carrying
//! [`Shape`]s, optionally wire up [`ConstraintEnum`] joints and a
//! [`ContactListener`], then call [`Space::step`] with your frame delta.
//!
//! ```
//! use glam::{dvec2, DVec2};
//! use rigid2d::{RigidBody, RigidBodyInit, RigidBodyType, Shape, Space};
//!
//! let mut space = Space::new();
//!
//! let mut ground = RigidBody::new(RigidBodyInit {
//!     position: dvec2(0.0, 10.0),
//!     ..Default::default()
//! });
//! ground.add_shape(Shape::rect(100.0, 2.0, DVec2::ZERO)?)?;
//! space.add_body(ground);
//!
//! let mut ball = RigidBody::new(RigidBodyInit {
//!     body_type: RigidBodyType::Dynamic,
//!     position: dvec2(0.0, 0.0),
//!     ..Default::default()
//! });
//! ball.add_shape(Shape::circle(DVec2::ZERO, 1.0)?)?;
//! let ball = space.add_body(ball);
//!
//! for _ in 0..60 {
//!     space.step(1.0 / 60.0);
//! }
//! assert!(space.body(ball).unwrap().position().y > 0.0);
//! # Ok::<(), rigid2d::PhysicsError>(())
//! ```

pub mod body;
pub mod broadphase;
pub mod collision;
pub mod constraint;
pub mod contact;
pub mod error;
pub mod events;
pub mod math;
pub mod profiler;
pub mod scenarios;
pub mod shape;
mod solver;
pub mod space;

pub use body::{BodyId, Material, RigidBody, RigidBodyInit, RigidBodyType};
pub use broadphase::BroadphaseAlgorithm;
pub use constraint::{
    Constraint, ConstraintEnum, ConstraintId, DistanceJoint, HingeJoint, SplineJoint, Spring,
};
pub use contact::{Contact, FeatureId, PersistentContactPair};
pub use error::PhysicsError;
pub use events::{ContactEvent, ContactListener};
pub use math::{Aabb, CoefficientMix, Transform};
pub use profiler::Profiler;
pub use shape::{Shape, ShapeId, ShapeKind, MAX_POLYGON_VERTICES};
pub use space::{ContactPositionCorrection, Space, SpaceSettings};
