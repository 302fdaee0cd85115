//! Step-level behavior of the full pipeline: resting contacts, stacks,
//! elastic collisions, joints, and the solver invariants that must hold at
//! every step.

use glam::{dvec2, DVec2};
use rigid2d::{
    ConstraintEnum, ContactPositionCorrection, DistanceJoint, Material, RigidBody, RigidBodyInit,
    RigidBodyType, Shape, Space,
};

const DT: f64 = 1.0 / 60.0;

fn static_ground(space: &mut Space, center: DVec2, width: f64, height: f64) -> u64 {
    let mut ground = RigidBody::new(RigidBodyInit {
        position: center,
        ..Default::default()
    });
    ground
        .add_shape(Shape::rect(width, height, DVec2::ZERO).unwrap())
        .unwrap();
    space.add_body(ground)
}

fn dynamic_disc(space: &mut Space, position: DVec2, radius: f64, material: Material) -> u64 {
    let mut body = RigidBody::new(RigidBodyInit {
        body_type: RigidBodyType::Dynamic,
        position,
        material,
        ..Default::default()
    });
    body.add_shape(Shape::circle(DVec2::ZERO, radius).unwrap())
        .unwrap();
    space.add_body(body)
}

/// The §invariants that must hold after any step.
fn check_invariants(space: &Space) {
    for body in space.bodies() {
        assert_eq!(
            body.invmass() > 0.0,
            body.body_type() == RigidBodyType::Dynamic,
            "invmass must be positive exactly for dynamic bodies"
        );
    }
    for pcp in space.contacts() {
        let (a, b) = pcp.key();
        assert!(a < b, "manifold keys are ordered by shape id");
        assert!(pcp.contact_count <= 2);

        let material_a = space.body(pcp.body_a).unwrap().material;
        let material_b = space.body(pcp.body_b).unwrap().material;
        let friction = (material_a.friction * material_b.friction).sqrt();
        for contact in pcp.contacts() {
            assert!(contact.normal_impulse() >= 0.0);
            assert!(
                contact.tangent_impulse().abs() <= friction * contact.normal_impulse() + 1e-9,
                "friction impulse outside the cone"
            );
        }
    }
}

#[test]
fn dropped_disc_rests_on_the_ground() {
    let mut space = Space::new();
    space.set_gravity(dvec2(0.0, -9.81));
    // Ground slab spanning x 0..100, y -1..0.
    let ground = static_ground(&mut space, dvec2(50.0, -0.5), 100.0, 1.0);
    let disc = dynamic_disc(&mut space, dvec2(50.0, 50.0), 1.0, Material::default());

    let ground_position = space.body(ground).unwrap().position();

    for _ in 0..600 {
        space.step(DT);
        check_invariants(&space);
    }

    let body = space.body(disc).unwrap();
    assert!(
        body.position().y > 0.95 && body.position().y < 1.05,
        "disc should rest one radius above the ground, got y = {}",
        body.position().y
    );
    assert!((body.position().x - 50.0).abs() < 0.01);
    assert!(body.linear_velocity().length() < 0.2);

    // Static bodies never move, bit for bit.
    let ground = space.body(ground).unwrap();
    assert_eq!(ground.position(), ground_position);
    assert_eq!(ground.angle(), 0.0);
}

#[test]
fn dropped_disc_rests_with_ngs_correction() {
    let mut space = Space::new();
    space.set_gravity(dvec2(0.0, -9.81));
    space.settings.contact_position_correction = ContactPositionCorrection::Ngs;
    static_ground(&mut space, dvec2(50.0, -0.5), 100.0, 1.0);
    let disc = dynamic_disc(&mut space, dvec2(50.0, 10.0), 1.0, Material::default());

    for _ in 0..600 {
        space.step(DT);
    }

    let y = space.body(disc).unwrap().position().y;
    assert!(y > 0.9 && y < 1.1, "got y = {y}");
}

#[test]
fn stack_of_three_boxes_holds() {
    let mut space = Space::new();
    space.set_gravity(dvec2(0.0, -9.81));
    static_ground(&mut space, dvec2(0.0, -0.5), 100.0, 1.0);

    let mut boxes = Vec::new();
    for level in 0..3 {
        let mut body = RigidBody::new(RigidBodyInit {
            body_type: RigidBodyType::Dynamic,
            position: dvec2(0.0, 0.5 + level as f64),
            ..Default::default()
        });
        body.add_shape(Shape::rect(1.0, 1.0, DVec2::ZERO).unwrap())
            .unwrap();
        boxes.push(space.add_body(body));
    }

    for _ in 0..120 {
        space.step(DT);
        check_invariants(&space);
    }

    let top = space.body(boxes[2]).unwrap();
    assert!(
        top.position().y > 2.49 && top.position().y < 2.51,
        "top box should stay put, got y = {}",
        top.position().y
    );
    assert!(top.linear_velocity().length() < 0.05);

    // The ground interface carries the weight of all three boxes: steady
    // per-step impulse = 3 m g dt, split over its contact points.
    let box_mass = space.body(boxes[0]).unwrap().mass();
    let expected = 3.0 * box_mass * 9.81 * DT;
    let ground_shape = space.bodies()[0].shapes()[0].id();
    let bottom: f64 = space
        .contacts()
        .filter(|pcp| pcp.key().0 == ground_shape)
        .flat_map(|pcp| pcp.contacts())
        .map(|c| c.normal_impulse())
        .sum();
    assert!(
        (bottom - expected).abs() < expected * 0.25,
        "bottom impulse {bottom} vs expected {expected}"
    );
}

#[test]
fn resting_contacts_persist_with_stable_features() {
    let mut space = Space::new();
    space.set_gravity(dvec2(0.0, -9.81));
    static_ground(&mut space, dvec2(0.0, -0.5), 20.0, 1.0);
    dynamic_disc(&mut space, dvec2(0.0, 1.0), 1.0, Material::default());

    for _ in 0..120 {
        space.step(DT);
    }
    let before: Vec<_> = space
        .contacts()
        .flat_map(|pcp| pcp.contacts())
        .map(|c| c.id)
        .collect();
    assert!(!before.is_empty());

    space.step(DT);
    let after: Vec<_> = space
        .contacts()
        .flat_map(|pcp| pcp.contacts())
        .map(|c| (c.id, c.is_persisted))
        .collect();
    assert_eq!(before.len(), after.len());
    for (id, (new_id, persisted)) in before.iter().zip(&after) {
        assert_eq!(id, new_id, "feature ids must survive a step at rest");
        assert!(persisted);
    }
}

#[test]
fn head_on_elastic_collision_swaps_velocities() {
    let mut space = Space::new();
    space.set_gravity(DVec2::ZERO);
    let material = Material {
        restitution: 1.0,
        friction: 0.0,
        ..Default::default()
    };
    let left = dynamic_disc(&mut space, dvec2(-1.2, 0.0), 1.0, material);
    let right = dynamic_disc(&mut space, dvec2(1.2, 0.0), 1.0, material);
    space.body_mut(left).unwrap().set_linear_velocity(dvec2(1.0, 0.0));
    space.body_mut(right).unwrap().set_linear_velocity(dvec2(-1.0, 0.0));

    let energy_before: f64 = space.bodies().iter().map(|b| b.kinetic_energy()).sum();

    for _ in 0..120 {
        space.step(DT);
        check_invariants(&space);

        // Elastic bounce must never create energy (1% numerical headroom).
        let energy: f64 = space
            .bodies()
            .iter()
            .map(|b| b.kinetic_energy() + b.rotational_energy())
            .sum();
        assert!(energy <= energy_before * 1.01, "energy grew to {energy}");
    }

    let v_left = space.body(left).unwrap().linear_velocity();
    let v_right = space.body(right).unwrap().linear_velocity();
    assert!((v_left.x + 1.0).abs() < 0.005, "left velocity {v_left}");
    assert!((v_right.x - 1.0).abs() < 0.005, "right velocity {v_right}");
    assert!(v_left.y.abs() < 1e-9 && v_right.y.abs() < 1e-9);
}

#[test]
fn distance_joint_holds_its_length() {
    let mut space = Space::new();
    space.set_gravity(DVec2::ZERO);

    let a = dynamic_disc(&mut space, dvec2(0.0, 0.0), 1.0, Material::default());
    let b = dynamic_disc(&mut space, dvec2(2.0, 0.0), 1.0, Material::default());
    // The discs touch at rest length; filter their contact out so the test
    // sees the joint alone.
    space.body_mut(a).unwrap().collision_group = 1;
    space.body_mut(b).unwrap().collision_group = 1;

    space
        .add_constraint(ConstraintEnum::Distance(DistanceJoint::new(
            Some(a),
            DVec2::ZERO,
            Some(b),
            DVec2::ZERO,
            2.0,
        )))
        .unwrap();

    space
        .body_mut(a)
        .unwrap()
        .apply_impulse(dvec2(0.0, 5.0), DVec2::ZERO);

    for _ in 0..60 {
        space.step(DT);
    }

    let distance = space
        .body(a)
        .unwrap()
        .position()
        .distance(space.body(b).unwrap().position());
    assert!(
        (distance - 2.0).abs() <= 1e-3,
        "joint stretched to {distance}"
    );
}

#[test]
fn falling_body_is_removed_at_the_kill_bounds() {
    let mut space = Space::new();
    space.set_gravity(dvec2(0.0, -9.81));
    space.kill_bounds = rigid2d::Aabb::new(-10.0, -10.0, 10.0, 10.0);
    let disc = dynamic_disc(&mut space, dvec2(0.0, 5.0), 1.0, Material::default());

    let mut removed_at = None;
    for step in 0..240 {
        space.step(DT);
        if space.body(disc).is_none() {
            removed_at = Some(step);
            break;
        }
    }
    // Free fall crosses y = -10 within ~1.8 s.
    let step = removed_at.expect("body should fall out of the kill bounds");
    assert!(step > 30, "removed too early, step {step}");
}
