//! Force contributors for the granular suspension
//!
//! Defines the [`Force`] trait plus the two body-force terms of the model:
//! buoyant gravity (Archimedes) and pairwise elastic contact repulsion.
//! Terms are collected in a [`ForceSet`] and their contributions summed into
//! a single force vector per granule.

use crate::simulation::states::{Ensemble, NVec3};

/// Collection of force terms (gravity, contact, etc.)
/// Each term implements [`Force`] and their contributions are summed
/// into a single force vector per granule
pub struct ForceSet {
    terms: Vec<Box<dyn Force + Send + Sync>>,
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self {
            terms: Vec::new(),
        }
    }

    /// Add a force term
    pub fn with(mut self, term: impl Force + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute total body forces at time `t` for all granules in `sys`
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_forces(&self, t: f64, sys: &Ensemble, out: &mut [NVec3]) {
        // Zero buffer
        for f in out.iter_mut() {
            *f = NVec3::zeros();
        }
        // Iterate over all force contributors
        for term in &self.terms {
            term.force(t, sys, out);
        }
    }
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for force sources operating on [`Ensemble`]
/// Implementations add their contribution into `out[i]` for each granule
pub trait Force {
    fn force(&self, t: f64, sys: &Ensemble, out: &mut [NVec3]);
}

/// Buoyant gravity per Archimedes' principle
/// Each granule feels `g * volume * (density - fluid_density)`: positive along
/// gravity when the granule is denser than the fluid (it sinks), negative when
/// lighter (it floats)
pub struct BuoyantGravity {
    pub gravity: NVec3,
    pub fluid_density: f64,
}

impl Force for BuoyantGravity {
    fn force(&self, _t: f64, sys: &Ensemble, out: &mut [NVec3]) {
        for (g, f) in sys.granules.iter().zip(out.iter_mut()) {
            *f += self.gravity * g.volume() * (g.density - self.fluid_density);
        }
    }
}

/// Pairwise linear contact repulsion (soft spring)
/// Active only when two granules interpenetrate: the force magnitude is
/// `spring_k * overlap` with `overlap = max(r_i + r_j - dist, 0)`, directed
/// along the pair axis so the granules are pushed apart
pub struct ContactRepulsion {
    pub spring_k: f64, // spring stiffness
    pub min_dist: f64, // separation clamp for near-coincident pairs
}

impl Force for ContactRepulsion {
    fn force(&self, _t: f64, sys: &Ensemble, out: &mut [NVec3]) {
        let n = sys.granules.len();
        if n == 0 { // no granules, return
            return;
        }

        // Loop over each unordered pair (i, j) with i < j
        for i in 0..n {
            // gi: granule i (left side of the pair)
            let gi = &sys.granules[i];

            for j in (i + 1)..n {
                // gj: granule j (right side of the pair)
                let gj = &sys.granules[j];

                // r points from i to j
                let r = gj.x - gi.x;
                let dist = r.norm();

                // Geometric overlap: zero when the spheres do not touch,
                // including the exact-touch boundary dist == r_i + r_j
                let overlap = (gi.radius + gj.radius - dist).max(0.0);
                if overlap == 0.0 {
                    continue;
                }

                // Clamp the divisor so coincident granules (dist == 0) stay
                // finite: the zero displacement then yields a zero direction
                // and the pair contributes nothing
                let d = dist.max(self.min_dist);
                let dir = r / d;

                // -------------------------
                // Equal and opposite:
                // f_i += -k * overlap * dir   (pushed away from j)
                // f_j +=  k * overlap * dir   (pushed away from i)
                // -------------------------
                let f = self.spring_k * overlap * dir;
                out[i] -= f;
                out[j] += f;
            }
        }
    }
}
