//! Hydrodynamic mobility: forces -> velocities through the viscous fluid
//!
//! Implements the far-field Stokes-flow coupling between granules. A point
//! force at granule `j` induces a velocity contribution at granule `i`
//! through a Rotne–Prager-style 3x3 mobility tensor; a granule's own force
//! maps to velocity through the single-sphere Stokes drag `1/(6 pi mu r)`.
//!
//! The pass is non-local: every granule's velocity depends on every other
//! granule's body force. The body-force array from the force pass is
//! therefore treated as a frozen snapshot for the whole N x N sweep and
//! couplings are summed into a separate running total, so no entry is read
//! after being mutated. Each outer index `i` writes only `out[i]`, which
//! keeps the sweep embarrassingly parallel across `i`.

use std::f64::consts::PI;

use crate::simulation::params::Parameters;
use crate::simulation::states::{Ensemble, NMat3, NVec3};

/// Rotne–Prager mobility tensor for a point force at `j` sensed across the
/// displacement `r` (pointing from `j` to the observation granule), with
/// `dist` the (already clamped) separation and `radius_j` the source radius:
///
/// `J = [I + rr/dist^2 + (2/3)(radius_j/dist)^2 (I - 3 rr/dist^2)] / dist`
///
/// where `rr` is the outer product `r r^T`. Symmetric for any non-degenerate
/// `r`
pub fn mobility_tensor(r: &NVec3, dist: f64, radius_j: f64) -> NMat3 {
    let eye = NMat3::identity();
    let rr = r * r.transpose();
    let d2 = dist * dist;

    let near = (radius_j / dist) * (radius_j / dist);
    (eye + rr / d2 + 2.0 / 3.0 * near * (eye - 3.0 * rr / d2)) / dist
}

/// Convert the body-force field into granule velocities
///
/// `body_forces` is the frozen output of the force pass; it is never written
/// here. For each granule `i` the couplings from every other granule's force
/// are superposed onto `i`'s own body force, then the total is divided by
/// `i`'s Stokes drag:
///
/// - coupling from `j`:  `(J * f_j) * (6 pi mu r_i) / (8 pi mu)`
/// - own velocity:       `v_i = total_i / (6 pi mu r_i)`
///
/// The coupling prefactor reduces to `(3/4) r_i`; it is kept in the written
/// form to match the model it was taken from.
pub fn resolve_velocities(
    sys: &Ensemble,
    body_forces: &[NVec3],
    params: &Parameters,
    out: &mut [NVec3],
) {
    let n = sys.granules.len();
    let mu = params.viscosity;

    for i in 0..n {
        let gi = &sys.granules[i];

        // Start from i's own body force, then superpose the hydrodynamic
        // couplings from every other granule's force
        let mut total = body_forces[i];

        for j in 0..n {
            if i == j { // no self-coupling
                continue;
            }
            let gj = &sys.granules[j];

            // r points from j to i
            let r = gi.x - gj.x;

            // Same degeneracy guard as the contact term: clamp the
            // separation so coincident granules stay finite
            let dist = r.norm().max(params.min_dist);

            let jt = mobility_tensor(&r, dist, gj.radius);
            total += jt * body_forces[j] * (6.0 * PI * mu * gi.radius) / (8.0 * PI * mu);
        }

        // Single-sphere Stokes mobility applied to the coupled total
        out[i] = total / (6.0 * PI * mu * gi.radius);
    }
}
