use std::time::Instant;

use crate::simulation::forces::{BuoyantGravity, ContactRepulsion, ForceSet};
use crate::simulation::integrator::euler_step;
use crate::simulation::mobility::resolve_velocities;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Ensemble, Granule, NVec3};

/// Helper to build a manual Ensemble of size `n`
fn make_ensemble(n: usize) -> Ensemble {
    let mut granules = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let x = NVec3::new(
            (i_f * 0.37).sin() * 5.0,
            (i_f * 0.13).cos() * 5.0,
            (i_f * 0.07).sin() * 5.0,
        );

        granules.push(Granule {
            radius: 0.05,
            density: 20.0,
            x,
            v: NVec3::zeros(),
        });
    }

    Ensemble { granules, t: 0.0 }
}

/// Default parameters for benchmarking
fn make_params() -> Parameters {
    Parameters {
        t_end: 100.0,
        h0: 0.001,
        seed: 42,
        gravity: NVec3::new(0.0, -9.81, 0.0),
        fluid_density: 1.2,
        spring_k: 500.0,
        viscosity: 5.0,
        min_dist: 1e-9,
    }
}

fn make_forces(params: &Parameters) -> ForceSet {
    ForceSet::new()
        .with(BuoyantGravity {
            gravity: params.gravity,
            fluid_density: params.fluid_density,
        })
        .with(ContactRepulsion {
            spring_k: params.spring_k,
            min_dist: params.min_dist,
        })
}

/// Time the two O(N^2) passes separately over a range of system sizes
pub fn bench_passes() {
    // Different system sizes to test
    let ns = [200, 400, 800, 1600, 3200];

    for n in ns {
        let sys = make_ensemble(n);
        let params = make_params();
        let forces = make_forces(&params);

        let mut body_forces = vec![NVec3::zeros(); n];
        let mut velocities = vec![NVec3::zeros(); n];

        // Warm up
        forces.accumulate_forces(0.0, &sys, &mut body_forces);
        resolve_velocities(&sys, &body_forces, &params, &mut velocities);

        // Time the force pass
        let t0 = Instant::now();
        forces.accumulate_forces(0.0, &sys, &mut body_forces);
        let dt_forces = t0.elapsed().as_secs_f64();

        // Time the mobility pass
        let t1 = Instant::now();
        resolve_velocities(&sys, &body_forces, &params, &mut velocities);
        let dt_mobility = t1.elapsed().as_secs_f64();

        println!(
            "N = {n:5}, forces = {:8.6} s, mobility = {:8.6} s",
            dt_forces, dt_mobility
        );
    }
}

/// Benchmark the full Euler step for a range of n
/// Paste output directly into a spreadsheet to graph
pub fn bench_step_curve() {
    println!("N,step_ms");

    // Steps of 200 to give a smoother graph
    for n in (200..=3200).step_by(200) {
        // Small n: average over a few steps to smooth noise
        // Large n: only 1 step to avoid minutes of runtime
        let steps = if n <= 800 { 5 } else { 1 };

        let mut sys = make_ensemble(n);
        let params = make_params();
        let forces = make_forces(&params);

        // Warm-up one step
        euler_step(&mut sys, &forces, &params);

        let t0 = Instant::now();
        for _ in 0..steps {
            euler_step(&mut sys, &forces, &params);
        }
        let elapsed = t0.elapsed().as_secs_f64() * 1000.0; // ms total
        let ms_step = elapsed / steps as f64;

        println!("{},{:.6}", n, ms_step);
    }
}
