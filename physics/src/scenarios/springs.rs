use glam::{dvec2, DVec2};

use super::Scenario;
use crate::body::{RigidBody, RigidBodyInit, RigidBodyType};
use crate::constraint::{ConstraintEnum, Spring};
use crate::shape::Shape;
use crate::space::Space;

/// A row of discs dangling from world anchors on damped springs.
pub struct Springs {
    pub count: usize,
    pub stiffness: f64,
    pub damping: f64,
}

impl Default for Springs {
    fn default() -> Self {
        Springs {
            count: 6,
            stiffness: 60.0,
            damping: 3.0,
        }
    }
}

impl Scenario for Springs {
    fn name(&self) -> &str {
        "Springs"
    }

    fn create(&self) -> Space {
        let mut space = Space::new();

        for i in 0..self.count {
            let x = 34.0 + 12.0 * i as f64;
            let anchor = dvec2(x, 10.0);

            let mut body = RigidBody::new(RigidBodyInit {
                body_type: RigidBodyType::Dynamic,
                // Offset from rest length so every spring starts stretched.
                position: anchor + dvec2(0.0, 14.0 + i as f64),
                ..Default::default()
            });
            body.add_shape(Shape::circle(DVec2::ZERO, 1.5).expect("valid circle"))
                .expect("fresh shape");
            let id = space.add_body(body);

            space
                .add_constraint(ConstraintEnum::Spring(Spring::new(
                    None,
                    anchor,
                    Some(id),
                    DVec2::ZERO,
                    10.0,
                    self.stiffness,
                    self.damping,
                )))
                .expect("body was just added");
        }

        space
    }
}
