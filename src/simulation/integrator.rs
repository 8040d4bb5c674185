//! Fixed-step time integration for the granule ensemble
//!
//! One step is: accumulate body forces, resolve velocities through the
//! mobility pass, then advance positions with a first-order explicit Euler
//! update driven by `params.h0`. No adaptive step-size control and no
//! stability check — the caller picks `h0` small relative to the spring
//! stiffness and viscosity scale.

use anyhow::{bail, Result};

use super::forces::ForceSet;
use super::mobility::resolve_velocities;
use super::params::Parameters;
use super::states::{Ensemble, NVec3};

/// Advance the ensemble by one step using explicit Euler
/// Updates positions, velocities, and `sys.t` in-place
pub fn euler_step(sys: &mut Ensemble, forces: &ForceSet, params: &Parameters) {
    let n = sys.granules.len();
    if n == 0 { // no granules, return
        return;
    }

    let dt = params.h0; // time step dt

    // Body forces at time t_n from x_n. This buffer is frozen once filled:
    // the mobility pass reads it as a snapshot and never writes it
    let mut body_forces = vec![NVec3::zeros(); n];
    forces.accumulate_forces(sys.t, &*sys, &mut body_forces);

    // Velocities from the mobility pass: v_n = M(x_n) f_n
    let mut velocities = vec![NVec3::zeros(); n];
    resolve_velocities(&*sys, &body_forces, params, &mut velocities);

    // Euler update: x_n+1 = x_n + dt * v_n
    // All reads of x_n are done (both passes above), so writing positions
    // here cannot alias anything within the step
    for (g, v) in sys.granules.iter_mut().zip(velocities.iter()) {
        g.v = *v;
        g.x += dt * *v;
    }

    // Increment the system time by one full step
    sys.t += dt;
}

/// Post-step sanity check: reject non-finite positions
/// An unstable `h0` shows up as runaway coordinates long before anything
/// else; this turns that into a hard error instead of a silent blow-up
pub fn check_finite(sys: &Ensemble) -> Result<()> {
    for (i, g) in sys.granules.iter().enumerate() {
        if !g.x.iter().all(|c| c.is_finite()) {
            bail!(
                "granule {} has non-finite position {:?} at t = {} (time step too large?)",
                i,
                g.x,
                sys.t
            );
        }
    }
    Ok(())
}
