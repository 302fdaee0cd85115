use glam::{dvec2, DVec2};

use super::Scenario;
use crate::body::{RigidBody, RigidBodyInit, RigidBodyType};
use crate::constraint::{ConstraintEnum, DistanceJoint};
use crate::shape::Shape;
use crate::space::Space;

/// A chain of discs hanging from a world anchor through distance joints.
pub struct Pendulum {
    pub links: usize,
}

impl Default for Pendulum {
    fn default() -> Self {
        Pendulum { links: 5 }
    }
}

impl Scenario for Pendulum {
    fn name(&self) -> &str {
        "Pendulum"
    }

    fn create(&self) -> Space {
        let mut space = Space::new();
        let anchor = dvec2(64.0, 10.0);
        let spacing = 4.0;

        let mut previous = None;
        for link in 0..self.links {
            // Start the chain horizontal so it swings.
            let mut body = RigidBody::new(RigidBodyInit {
                body_type: RigidBodyType::Dynamic,
                position: anchor + dvec2(spacing * (link + 1) as f64, 0.0),
                ..Default::default()
            });
            body.add_shape(Shape::circle(DVec2::ZERO, 1.0).expect("valid circle"))
                .expect("fresh shape");
            let id = space.add_body(body);

            let joint = match previous {
                None => DistanceJoint::new(None, anchor, Some(id), DVec2::ZERO, spacing),
                Some(previous) => {
                    DistanceJoint::new(Some(previous), DVec2::ZERO, Some(id), DVec2::ZERO, spacing)
                }
            };
            space
                .add_constraint(ConstraintEnum::Distance(joint))
                .expect("bodies were just added");
            previous = Some(id);
        }

        space
    }
}
