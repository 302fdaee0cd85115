use glam::{dvec2, DVec2};

use super::Scenario;
use crate::body::{Material, RigidBody, RigidBodyInit, RigidBodyType};
use crate::shape::Shape;
use crate::space::Space;

/// A pyramid of boxes resting on the ground; the classic warm-starting
/// stress test.
pub struct Stack {
    pub base: usize,
}

impl Default for Stack {
    fn default() -> Self {
        Stack { base: 8 }
    }
}

impl Scenario for Stack {
    fn name(&self) -> &str {
        "Stack"
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

        let size = 2.0;
        let material = Material {
            friction: 0.6,
            ..Default::default()
        };
        for row in 0..self.base {
            let count = self.base - row;
            let y = 67.0 - size / 2.0 - size * row as f64;
            for column in 0..count {
                let x = 64.0 + size * (column as f64 - count as f64 / 2.0 + 0.5);
                let mut body = RigidBody::new(RigidBodyInit {
                    body_type: RigidBodyType::Dynamic,
                    position: dvec2(x, y),
                    material,
                    ..Default::default()
                });
                body.add_shape(Shape::rect(size, size, DVec2::ZERO).expect("valid box"))
                    .expect("fresh shape");
                space.add_body(body);
            }
        }

        space
    }
}
