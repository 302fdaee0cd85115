use glam::{dvec2, DVec2};

use super::Scenario;
use crate::body::{Material, RigidBody, RigidBodyInit, RigidBodyType};
use crate::shape::Shape;
use crate::space::Space;

/// A heavy attractor star with planets given a sideways kick; gravity off.
pub struct Orbit;

impl Scenario for Orbit {
    fn name(&self) -> &str {
        "Orbit"
    }

    fn create(&self) -> Space {
        let mut space = Space::new();
        space.set_gravity(DVec2::ZERO);

        let star_material = Material {
            density: 15.0,
            restitution: 0.5,
            friction: 0.0,
        };
        let mut star = RigidBody::new(RigidBodyInit {
            body_type: RigidBodyType::Dynamic,
            position: dvec2(64.0, 36.0),
            material: star_material,
            ..Default::default()
        });
        star.add_shape(Shape::circle(DVec2::ZERO, 3.0).expect("valid circle"))
            .expect("fresh shape");
        star.set_attractor(true);
        space.add_body(star);

        let planet_material = Material {
            density: 2.0,
            restitution: 0.5,
            friction: 0.0,
        };
        for (position, kick) in [
            (dvec2(85.0, 28.0), dvec2(0.0, 8.0e3)),
            (dvec2(30.0, 35.0), dvec2(0.0, -8.0e3)),
            (dvec2(64.0, 55.0), dvec2(6.0e3, 0.0)),
        ] {
            let mut planet = RigidBody::new(RigidBodyInit {
                body_type: RigidBodyType::Dynamic,
                position,
                material: planet_material,
                ..Default::default()
            });
            planet
                .add_shape(Shape::circle(DVec2::ZERO, 1.5).expect("valid circle"))
                .expect("fresh shape");
            let id = space.add_body(planet);
            space.body_mut(id).expect("just added").apply_force(kick);
        }

        space
    }
}
