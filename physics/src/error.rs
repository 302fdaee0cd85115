//! Error type shared by all fallible operations of the crate.

use thiserror::Error;

use crate::body::BodyId;
use crate::constraint::ConstraintId;
use crate::shape::ShapeId;

/// Everything a public operation can fail with.
///
/// Numerical degeneracies (zero-length normals, zero effective masses) are
/// deliberately *not* represented here; the solvers treat them as no-impulse
/// situations and log them at `warn` level instead of failing the step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("circle radius must be positive, got {0}")]
    InvalidRadius(f64),

    #[error("convex polygon needs 3 to 16 vertices, got {0}")]
    InvalidVertexCount(usize),

    #[error("mass must be positive, got {0}")]
    InvalidMass(f64),

    #[error("no body with id {0} in this space")]
    UnknownBody(BodyId),

    #[error("no constraint with id {0} in this space")]
    UnknownConstraint(ConstraintId),

    #[error("no shape with id {0} attached to this body")]
    UnknownShape(ShapeId),

    #[error("shape {0} is already attached to a body")]
    DuplicateShape(ShapeId),

    #[error("constraint references no body at all")]
    ConstraintWithoutBodies,
}
