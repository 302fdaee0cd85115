//! Velocity-level contact solving: Projected Gauss-Seidel over the contact
//! store with accumulated impulses, plus the optional non-linear
//! Gauss-Seidel position pass.
//!
//! For a contact with normal `n` and arms `r_a`, `r_b` from each center of
//! mass, the velocity constraint along the normal is
//!
//! `v_n = (v_b + w_b x r_b - v_a - w_a x r_a) . n`
//!
//! Applying an impulse `lambda n` changes `v_n` by `lambda * K` with the
//! effective mass term
//!
//! `K = 1/m_a + 1/m_b + (r_a x n)^2 / I_a + (r_b x n)^2 / I_b`
//!
//! so each iteration solves `lambda = (bias - v_n) / K`, projects the
//! accumulated total onto the valid set (non-negative along the normal,
//! inside the friction cone along the tangent) and applies only the delta.

use glam::DVec2;
use tracing::trace;

use crate::body::{body_pair_mut, RigidBody, RigidBodyType};
use crate::collision;
use crate::contact::PersistentContactPair;
use crate::math::mix_coefficients;
use crate::space::{ContactPositionCorrection, SpaceSettings};

/// Approach speeds below this don't bounce, no matter the restitution;
/// keeps resting stacks from jittering on numerical noise.
pub(crate) const RESTITUTION_VELOCITY_THRESHOLD: f64 = 1.0;

/// Hard cap on the positional correction one NGS iteration may apply.
const MAX_POSITION_CORRECTION: f64 = 0.2;

#[inline]
fn velocity_at(body: &RigidBody, r: DVec2) -> DVec2 {
    body.linear_velocity() + r.perp() * body.angular_velocity()
}

/// Compute effective masses, mixed coefficients and the velocity bias for
/// every contact of the manifold. Runs once per substep, before
/// warm-starting.
pub(crate) fn presolve(
    pcp: &mut PersistentContactPair,
    bodies: &mut [RigidBody],
    settings: &SpaceSettings,
    inv_dt: f64,
) {
    let (a, b) = body_pair_mut(bodies, pcp.index_a, pcp.index_b);

    pcp.solve_enabled = (a.body_type() == RigidBodyType::Dynamic && !a.is_sleeping())
        || (b.body_type() == RigidBodyType::Dynamic && !b.is_sleeping());
    if !pcp.solve_enabled {
        return;
    }

    pcp.restitution = mix_coefficients(
        a.material.restitution,
        b.material.restitution,
        settings.restitution_mix,
    );
    pcp.friction = mix_coefficients(a.material.friction, b.material.friction, settings.friction_mix);

    let normal = pcp.normal;
    let tangent = normal.perp();
    let restitution = pcp.restitution;
    let baumgarte = match settings.contact_position_correction {
        ContactPositionCorrection::Baumgarte => settings.baumgarte,
        ContactPositionCorrection::Ngs => 0.0,
    };
    let slop = settings.penetration_slop;

    for contact in pcp.contacts_mut() {
        let r_a = contact.anchor_a;
        let r_b = contact.anchor_b;

        let rn_a = r_a.perp_dot(normal);
        let rn_b = r_b.perp_dot(normal);
        let k_normal = a.invmass()
            + b.invmass()
            + rn_a * rn_a * a.invinertia()
            + rn_b * rn_b * b.invinertia();
        contact.solver.mass_normal = if k_normal > 0.0 { 1.0 / k_normal } else { 0.0 };

        let rt_a = r_a.perp_dot(tangent);
        let rt_b = r_b.perp_dot(tangent);
        let k_tangent = a.invmass()
            + b.invmass()
            + rt_a * rt_a * a.invinertia()
            + rt_b * rt_b * b.invinertia();
        contact.solver.mass_tangent = if k_tangent > 0.0 { 1.0 / k_tangent } else { 0.0 };

        let v_rel = velocity_at(b, r_b) - velocity_at(a, r_a);
        let vn = v_rel.dot(normal);

        // Restitution only above the approach-speed threshold.
        let mut bias = if vn < -RESTITUTION_VELOCITY_THRESHOLD {
            -restitution * vn
        } else {
            0.0
        };
        // Baumgarte: feed a slop-adjusted share of the position error back
        // into the velocity target.
        bias += baumgarte * inv_dt * (-contact.separation - slop).max(0.0);
        contact.solver.velocity_bias = bias;
    }
}

/// Re-apply the impulses accumulated in the previous frame so the iterative
/// solve starts from last frame's solution instead of zero.
pub(crate) fn warmstart(
    pcp: &mut PersistentContactPair,
    bodies: &mut [RigidBody],
    settings: &SpaceSettings,
) {
    if !settings.warmstarting || !pcp.solve_enabled {
        return;
    }
    let (a, b) = body_pair_mut(bodies, pcp.index_a, pcp.index_b);
    let normal = pcp.normal;
    let tangent = normal.perp();

    for contact in pcp.contacts_mut() {
        if !contact.is_persisted {
            continue;
        }
        let impulse =
            normal * contact.solver.normal_impulse + tangent * contact.solver.tangent_impulse;
        if impulse == DVec2::ZERO {
            continue;
        }
        a.apply_impulse_internal(-impulse, contact.anchor_a);
        b.apply_impulse_internal(impulse, contact.anchor_b);
    }
}

/// One Gauss-Seidel sweep over the manifold's contacts: friction first,
/// clamped to the cone of the *accumulated* normal impulse, then the normal
/// impulse clamped non-negative.
pub(crate) fn solve_velocity(pcp: &mut PersistentContactPair, bodies: &mut [RigidBody]) {
    if !pcp.solve_enabled {
        return;
    }
    let (a, b) = body_pair_mut(bodies, pcp.index_a, pcp.index_b);
    let normal = pcp.normal;
    let tangent = normal.perp();
    let friction = pcp.friction;

    for contact in pcp.contacts_mut() {
        let r_a = contact.anchor_a;
        let r_b = contact.anchor_b;

        // Friction impulse.
        let v_rel = velocity_at(b, r_b) - velocity_at(a, r_a);
        let vt = v_rel.dot(tangent);
        let lambda = -vt * contact.solver.mass_tangent;

        let max_friction = friction * contact.solver.normal_impulse;
        let total = (contact.solver.tangent_impulse + lambda).clamp(-max_friction, max_friction);
        let delta = total - contact.solver.tangent_impulse;
        contact.solver.tangent_impulse = total;

        let impulse = tangent * delta;
        a.apply_impulse_internal(-impulse, r_a);
        b.apply_impulse_internal(impulse, r_b);

        // Normal impulse; velocities changed above, so re-evaluate.
        let v_rel = velocity_at(b, r_b) - velocity_at(a, r_a);
        let vn = v_rel.dot(normal);
        let lambda = (contact.solver.velocity_bias - vn) * contact.solver.mass_normal;

        let total = (contact.solver.normal_impulse + lambda).max(0.0);
        let delta = total - contact.solver.normal_impulse;
        contact.solver.normal_impulse = total;

        let impulse = normal * delta;
        a.apply_impulse_internal(-impulse, r_a);
        b.apply_impulse_internal(impulse, r_b);

        trace!(
            vn,
            normal_impulse = contact.solver.normal_impulse,
            tangent_impulse = contact.solver.tangent_impulse,
            "contact impulse"
        );
    }
}

/// One NGS iteration: re-collide the pair at its current placement and push
/// the bodies apart directly through their positions with pseudo-impulses.
/// Velocities are untouched.
pub(crate) fn solve_position(
    pcp: &mut PersistentContactPair,
    bodies: &mut [RigidBody],
    settings: &SpaceSettings,
) {
    if !pcp.solve_enabled {
        return;
    }
    let (a, b) = body_pair_mut(bodies, pcp.index_a, pcp.index_b);
    let (transform_a, transform_b) = (a.transform(), b.transform());
    let (position_a, position_b) = (a.position(), b.position());
    let (inv_mass_a, inv_inertia_a) = (a.invmass(), a.invinertia());
    let (inv_mass_b, inv_inertia_b) = (b.invmass(), b.invinertia());

    let (shape_a_id, shape_b_id) = (pcp.shape_a, pcp.shape_b);
    let Some(shape_a) = a.shapes_mut().iter_mut().find(|s| s.id() == shape_a_id) else {
        return;
    };
    let Some(shape_b) = b.shapes_mut().iter_mut().find(|s| s.id() == shape_b_id) else {
        return;
    };

    let fresh = collision::collide(shape_a, transform_a, shape_b, transform_b);
    if fresh.point_count == 0 {
        return;
    }
    let normal = fresh.normal;

    for point in fresh.points() {
        let error =
            (point.separation + settings.penetration_slop).clamp(-MAX_POSITION_CORRECTION, 0.0);
        if error == 0.0 {
            continue;
        }

        let r_a = point.position - position_a;
        let r_b = point.position - position_b;
        let rn_a = r_a.perp_dot(normal);
        let rn_b = r_b.perp_dot(normal);
        let k = inv_mass_a + inv_mass_b + rn_a * rn_a * inv_inertia_a + rn_b * rn_b * inv_inertia_b;
        if k <= 0.0 {
            continue;
        }

        let lambda = -settings.baumgarte * error / k;
        let impulse = normal * lambda;

        a.shift(-impulse * inv_mass_a, -r_a.perp_dot(impulse) * inv_inertia_a);
        b.shift(impulse * inv_mass_b, r_b.perp_dot(impulse) * inv_inertia_b);
    }
}
