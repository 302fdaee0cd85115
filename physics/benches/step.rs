use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{dvec2, DVec2};
use rand::Rng;
use rigid2d::scenarios::{Scenario, Stack};
use rigid2d::{
    BroadphaseAlgorithm, Material, RigidBody, RigidBodyInit, RigidBodyType, Shape, Space,
};

/// A closed box of perfectly elastic discs; nothing ever comes to rest, so
/// every step keeps doing narrow-phase and solver work.
fn bouncing_discs(count: usize) -> Space {
    let mut space = Space::new();
    space.set_gravity(DVec2::ZERO);

    let extent = 50.0;
    for (position, size) in [
        (dvec2(0.0, -extent), (2.0 * extent, 2.0)),
        (dvec2(0.0, extent), (2.0 * extent, 2.0)),
        (dvec2(-extent, 0.0), (2.0, 2.0 * extent)),
        (dvec2(extent, 0.0), (2.0, 2.0 * extent)),
    ] {
        let mut wall = RigidBody::new(RigidBodyInit {
            position,
            ..Default::default()
        });
        wall.add_shape(Shape::rect(size.0, size.1, DVec2::ZERO).unwrap())
            .unwrap();
        space.add_body(wall);
    }

    let material = Material {
        restitution: 1.0,
        friction: 0.0,
        ..Default::default()
    };
    let mut rng = rand::thread_rng();
    for _ in 0..count {
        let mut body = RigidBody::new(RigidBodyInit {
            body_type: RigidBodyType::Dynamic,
            position: dvec2(
                rng.gen_range(-extent + 5.0..extent - 5.0),
                rng.gen_range(-extent + 5.0..extent - 5.0),
            ),
            linear_velocity: dvec2(rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0)),
            material,
            ..Default::default()
        });
        body.add_shape(Shape::circle(DVec2::ZERO, 1.0).unwrap()).unwrap();
        space.add_body(body);
    }
    space
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let dt = 1.0 / 60.0;

    let mut group = c.benchmark_group("bouncing_discs");
    for count in [32, 64, 128, 256] {
        let mut space = bouncing_discs(count);
        group.bench_with_input(BenchmarkId::new("brute_force", count), &count, |b, _| {
            b.iter(|| space.step(black_box(dt)))
        });

        let mut space = bouncing_discs(count);
        space.set_broadphase(BroadphaseAlgorithm::SpatialHashGrid { cell_size: 4.0 });
        group.bench_with_input(BenchmarkId::new("spatial_hash", count), &count, |b, _| {
            b.iter(|| space.step(black_box(dt)))
        });
    }
    group.finish();

    let mut group = c.benchmark_group("box_stack");
    for base in [4, 8, 12] {
        let mut space = Stack { base }.create();
        group.bench_with_input(BenchmarkId::new("step", base), &base, |b, _| {
            b.iter(|| space.step(black_box(dt)))
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
