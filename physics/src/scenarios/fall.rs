use glam::{dvec2, DVec2};

use super::Scenario;
use crate::body::{RigidBody, RigidBodyInit, RigidBodyType};
use crate::shape::Shape;
use crate::space::Space;

/// A handful of discs and boxes dropping onto a ground slab.
pub struct Fall;

impl Scenario for Fall {
    fn name(&self) -> &str {
        "Fall"
    }

    fn create(&self) -> Space {
        let mut space = Space::new();

        let mut ground = RigidBody::new(RigidBodyInit {
            position: dvec2(64.0, 69.5),
            ..Default::default()
        });
        ground
            .add_shape(Shape::rect(128.0, 5.0, DVec2::ZERO).expect("valid box"))
            .expect("fresh shape");
        space.add_body(ground);

        for i in 0..8 {
            let x = 22.0 + 12.0 * i as f64;
            let mut body = RigidBody::new(RigidBodyInit {
                body_type: RigidBodyType::Dynamic,
                position: dvec2(x, 8.0 + (i % 3) as f64 * 6.0),
                ..Default::default()
            });
            let shape = if i % 2 == 0 {
                Shape::circle(DVec2::ZERO, 1.5).expect("valid circle")
            } else {
                Shape::rect(3.0, 3.0, DVec2::ZERO).expect("valid box")
            };
            body.add_shape(shape).expect("fresh shape");
            space.add_body(body);
        }

        space
    }
}
