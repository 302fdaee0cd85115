//! Broad-phase pair generation.
//!
//! Both backends produce the same multiset of candidate shape pairs for the
//! same world: every pair of AABB-overlapping shapes whose bodies pass the
//! early-out filters, canonically ordered by shape id. The pairs land in a
//! per-step arena the space reuses between steps.

use std::collections::{BTreeSet, HashMap};

use crate::body::{RigidBody, RigidBodyType};
use crate::math::Aabb;
use crate::shape::ShapeId;

/// Algorithm used to find possibly-colliding pairs before the narrow phase.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum BroadphaseAlgorithm {
    /// Check every body against every other. Fine up to a few hundred
    /// bodies and the reference for the other backends.
    #[default]
    BruteForce,
    /// Hash body AABBs into a uniform grid and only test cell-mates.
    SpatialHashGrid { cell_size: f64 },
}

/// One candidate shape pair, referencing bodies by dense index and shapes by
/// id + per-body index. Invariant: `shape_a < shape_b`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ShapePair {
    pub index_a: usize,
    pub index_b: usize,
    pub shape_a: ShapeId,
    pub shape_b: ShapeId,
    pub shape_index_a: usize,
    pub shape_index_b: usize,
}

/// Body-level rejection shared by all backends. The caller guarantees
/// `a.id < b.id` through its iteration order.
fn early_out(a: &RigidBody, b: &RigidBody, sleeping_enabled: bool) -> bool {
    if !a.collision_enabled() || !b.collision_enabled() {
        return true;
    }
    if a.body_type() == RigidBodyType::Static && b.body_type() == RigidBodyType::Static {
        return true;
    }
    if sleeping_enabled {
        if a.is_sleeping() && b.is_sleeping() {
            return true;
        }
        if (a.is_sleeping() && b.body_type() == RigidBodyType::Static)
            || (b.is_sleeping() && a.body_type() == RigidBodyType::Static)
        {
            return true;
        }
    }
    if a.collision_group == b.collision_group && a.collision_group != 0 {
        return true;
    }
    if a.collision_mask & b.collision_category == 0 || b.collision_mask & a.collision_category == 0 {
        return true;
    }
    false
}

/// Refresh and collect the body and per-shape AABBs in one pass; this also
/// warms the polygon world-vertex caches the narrow phase reads.
fn collect_aabbs(bodies: &mut [RigidBody]) -> (Vec<Aabb>, Vec<Vec<Aabb>>) {
    let mut body_boxes = Vec::with_capacity(bodies.len());
    let mut shape_boxes = Vec::with_capacity(bodies.len());
    for body in bodies.iter_mut() {
        let transform = body.transform();
        shape_boxes.push(
            body.shapes_mut()
                .iter_mut()
                .map(|shape| shape.aabb(transform))
                .collect::<Vec<_>>(),
        );
        body_boxes.push(body.aabb());
    }
    (body_boxes, shape_boxes)
}

/// Emit every overlapping shape pair of two AABB-overlapping bodies.
fn emit_shape_pairs(
    bodies: &[RigidBody],
    shape_boxes: &[Vec<Aabb>],
    i: usize,
    j: usize,
    pairs: &mut Vec<ShapePair>,
) {
    for (k, box_a) in shape_boxes[i].iter().enumerate() {
        for (l, box_b) in shape_boxes[j].iter().enumerate() {
            if !box_a.overlaps(box_b) {
                continue;
            }
            let shape_a = bodies[i].shapes()[k].id();
            let shape_b = bodies[j].shapes()[l].id();
            pairs.push(if shape_a < shape_b {
                ShapePair {
                    index_a: i,
                    index_b: j,
                    shape_a,
                    shape_b,
                    shape_index_a: k,
                    shape_index_b: l,
                }
            } else {
                ShapePair {
                    index_a: j,
                    index_b: i,
                    shape_a: shape_b,
                    shape_b: shape_a,
                    shape_index_a: l,
                    shape_index_b: k,
                }
            });
        }
    }
}

/// Outer loop over bodies A, inner over bodies B with `A.id < B.id`; bodies
/// sit in the space in ascending-id order, so index order is id order.
pub(crate) fn brute_force(
    bodies: &mut [RigidBody],
    sleeping_enabled: bool,
    pairs: &mut Vec<ShapePair>,
) {
    let (body_boxes, shape_boxes) = collect_aabbs(bodies);

    for i in 0..bodies.len() {
        for j in i + 1..bodies.len() {
            if early_out(&bodies[i], &bodies[j], sleeping_enabled) {
                continue;
            }
            if !body_boxes[i].overlaps(&body_boxes[j]) {
                continue;
            }
            emit_shape_pairs(bodies, &shape_boxes, i, j, pairs);
        }
    }
}

/// Uniform-grid variant: bodies register in every cell their AABB touches
/// and only cell-mates are tested. Two overlapping AABBs always share at
/// least one cell, so the emitted pair multiset matches brute force.
pub(crate) fn spatial_hash_grid(
    bodies: &mut [RigidBody],
    sleeping_enabled: bool,
    cell_size: f64,
    pairs: &mut Vec<ShapePair>,
) {
    let cell_size = if cell_size > 0.0 { cell_size } else { 1.0 };
    let (body_boxes, shape_boxes) = collect_aabbs(bodies);

    let mut cells: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, aabb) in body_boxes.iter().enumerate() {
        let x0 = (aabb.min_x / cell_size).floor() as i64;
        let y0 = (aabb.min_y / cell_size).floor() as i64;
        let x1 = (aabb.max_x / cell_size).floor() as i64;
        let y1 = (aabb.max_y / cell_size).floor() as i64;
        for x in x0..=x1 {
            for y in y0..=y1 {
                cells.entry((x, y)).or_default().push(i);
            }
        }
    }

    // Ordered set: dedups pairs found in several cells and fixes the
    // emission order independently of hash iteration.
    let mut candidates = BTreeSet::new();
    for members in cells.values() {
        for (n, &i) in members.iter().enumerate() {
            for &j in &members[n + 1..] {
                candidates.insert((i.min(j), i.max(j)));
            }
        }
    }

    for (i, j) in candidates {
        if early_out(&bodies[i], &bodies[j], sleeping_enabled) {
            continue;
        }
        if !body_boxes[i].overlaps(&body_boxes[j]) {
            continue;
        }
        emit_shape_pairs(bodies, &shape_boxes, i, j, pairs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{RigidBody, RigidBodyInit, RigidBodyType};
    use crate::shape::Shape;
    use glam::{dvec2, DVec2};

    fn disc_at(x: f64, y: f64, body_type: RigidBodyType) -> RigidBody {
        let mut body = RigidBody::new(RigidBodyInit {
            body_type,
            position: dvec2(x, y),
            ..Default::default()
        });
        body.add_shape(Shape::circle(DVec2::ZERO, 1.0).unwrap()).unwrap();
        body
    }

    fn with_ids(mut bodies: Vec<RigidBody>) -> Vec<RigidBody> {
        for (i, body) in bodies.iter_mut().enumerate() {
            body.id = i as u64 + 1;
        }
        bodies
    }

    #[test]
    fn overlapping_discs_pair_up() {
        let mut bodies = with_ids(vec![
            disc_at(0.0, 0.0, RigidBodyType::Dynamic),
            disc_at(1.0, 0.0, RigidBodyType::Dynamic),
            disc_at(10.0, 0.0, RigidBodyType::Dynamic),
        ]);
        let mut pairs = Vec::new();
        brute_force(&mut bodies, false, &mut pairs);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].index_a, pairs[0].index_b), (0, 1));
        assert!(pairs[0].shape_a < pairs[0].shape_b);
    }

    #[test]
    fn static_static_and_disabled_are_rejected() {
        let mut bodies = with_ids(vec![
            disc_at(0.0, 0.0, RigidBodyType::Static),
            disc_at(1.0, 0.0, RigidBodyType::Static),
        ]);
        let mut pairs = Vec::new();
        brute_force(&mut bodies, false, &mut pairs);
        assert!(pairs.is_empty());

        let mut bodies = with_ids(vec![
            disc_at(0.0, 0.0, RigidBodyType::Dynamic),
            disc_at(1.0, 0.0, RigidBodyType::Dynamic),
        ]);
        bodies[0].disable_collisions();
        pairs.clear();
        brute_force(&mut bodies, false, &mut pairs);
        assert!(pairs.is_empty());
    }

    #[test]
    fn shared_nonzero_group_never_pairs() {
        let mut bodies = with_ids(vec![
            disc_at(0.0, 0.0, RigidBodyType::Dynamic),
            disc_at(0.5, 0.0, RigidBodyType::Dynamic),
        ]);
        bodies[0].collision_group = 7;
        bodies[1].collision_group = 7;
        let mut pairs = Vec::new();
        brute_force(&mut bodies, false, &mut pairs);
        assert!(pairs.is_empty());
    }

    #[test]
    fn category_mask_filters_both_ways() {
        let mut bodies = with_ids(vec![
            disc_at(0.0, 0.0, RigidBodyType::Dynamic),
            disc_at(0.5, 0.0, RigidBodyType::Dynamic),
        ]);
        bodies[0].collision_category = 0b01;
        bodies[1].collision_mask = 0b10;
        let mut pairs = Vec::new();
        brute_force(&mut bodies, false, &mut pairs);
        assert!(pairs.is_empty());
    }

    #[test]
    fn grid_matches_brute_force() {
        let mut bodies = Vec::new();
        for i in 0..8 {
            for j in 0..4 {
                bodies.push(disc_at(i as f64 * 1.4, j as f64 * 1.4, RigidBodyType::Dynamic));
            }
        }
        let mut bodies_grid = with_ids(bodies);
        let mut bodies_brute = bodies_grid.clone();

        let mut brute_pairs = Vec::new();
        brute_force(&mut bodies_brute, false, &mut brute_pairs);
        let mut grid_pairs = Vec::new();
        spatial_hash_grid(&mut bodies_grid, false, 2.0, &mut grid_pairs);

        let key = |p: &ShapePair| (p.shape_a, p.shape_b);
        let mut brute_keys: Vec<_> = brute_pairs.iter().map(key).collect();
        let mut grid_keys: Vec<_> = grid_pairs.iter().map(key).collect();
        brute_keys.sort_unstable();
        grid_keys.sort_unstable();
        assert_eq!(brute_keys, grid_keys);
        assert!(!brute_keys.is_empty());
    }
}
