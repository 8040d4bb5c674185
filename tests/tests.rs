use granuflow::simulation::forces::{BuoyantGravity, ContactRepulsion, ForceSet};
use granuflow::simulation::integrator::{check_finite, euler_step};
use granuflow::simulation::mobility::{mobility_tensor, resolve_velocities};
use granuflow::simulation::params::Parameters;
use granuflow::simulation::poses::PoseBuffer;
use granuflow::simulation::scenario::Scenario;
use granuflow::simulation::states::{Ensemble, Granule, NVec3};
use granuflow::ScenarioConfig;

use std::f64::consts::PI;

/// Build a single granule at the origin
pub fn single_granule(radius: f64, density: f64) -> Ensemble {
    Ensemble {
        granules: vec![Granule {
            radius,
            density,
            x: NVec3::zeros(),
            v: NVec3::zeros(),
        }],
        t: 0.0,
    }
}

/// Build a 2-granule Ensemble separated by `dist` along the x-axis
pub fn pair_ensemble(dist: f64, r1: f64, r2: f64) -> Ensemble {
    let g1 = Granule {
        radius: r1,
        density: 20.0,
        x: [-dist / 2.0, 0.0, 0.0].into(),
        v: NVec3::zeros(),
    };
    let g2 = Granule {
        radius: r2,
        density: 20.0,
        x: [dist / 2.0, 0.0, 0.0].into(),
        v: NVec3::zeros(),
    };
    Ensemble {
        granules: vec![g1, g2],
        t: 0.0,
    }
}

/// Default physics parameters for tests
pub fn test_params() -> Parameters {
    Parameters {
        t_end: 1.0,
        h0: 0.001,
        seed: 42,
        gravity: NVec3::new(0.0, -9.81, 0.0),
        fluid_density: 1.2,
        spring_k: 500.0,
        viscosity: 5.0,
        min_dist: 1e-9,
    }
}

/// Build the full force set (gravity + contact) from parameters
pub fn full_force_set(p: &Parameters) -> ForceSet {
    ForceSet::new()
        .with(BuoyantGravity {
            gravity: p.gravity,
            fluid_density: p.fluid_density,
        })
        .with(ContactRepulsion {
            spring_k: p.spring_k,
            min_dist: p.min_dist,
        })
}

/// Contact-only force set, to test the spring term in isolation
pub fn contact_set(p: &Parameters) -> ForceSet {
    ForceSet::new().with(ContactRepulsion {
        spring_k: p.spring_k,
        min_dist: p.min_dist,
    })
}

// ==================================================================================
// Force tests
// ==================================================================================

#[test]
fn single_granule_zero_gravity_is_at_rest() {
    let mut p = test_params();
    p.gravity = NVec3::zeros();

    let mut sys = single_granule(0.05, 20.0);
    let forces = full_force_set(&p);

    let x0 = sys.granules[0].x;
    for _ in 0..10 {
        euler_step(&mut sys, &forces, &p);
        assert_eq!(sys.granules[0].v, NVec3::zeros(), "Velocity not exactly zero");
        assert_eq!(sys.granules[0].x, x0, "Position drifted with no forces");
    }
}

#[test]
fn single_granule_gets_no_pairwise_contribution() {
    let p = test_params();
    let sys = single_granule(0.05, 20.0);
    let forces = contact_set(&p);

    let mut out = vec![NVec3::zeros(); 1];
    forces.accumulate_forces(sys.t, &sys, &mut out);

    assert_eq!(out[0], NVec3::zeros(), "Self-interaction leaked into forces");
}

#[test]
fn stokes_settling_velocity_matches_analytic() {
    let p = test_params();
    let (radius, density) = (0.05, 20.0);

    let mut sys = single_granule(radius, density);
    let forces = full_force_set(&p);

    euler_step(&mut sys, &forces, &p);

    // v = volume * (density - fluid) * g / (6 pi mu r), straight Stokes drag
    let volume = 4.0 / 3.0 * PI * radius * radius * radius;
    let expected = volume * (density - p.fluid_density) * p.gravity.norm()
        / (6.0 * PI * p.viscosity * radius);

    let speed = sys.granules[0].v.norm();
    assert!(
        (speed - expected).abs() < 1e-12 * expected,
        "Expected settling speed {expected}, got {speed}"
    );
    // Denser than the fluid: sinks along gravity
    assert!(sys.granules[0].v.dot(&p.gravity) > 0.0, "Granule is not sinking");
}

#[test]
fn lighter_granule_rises_against_gravity() {
    let mut p = test_params();
    p.fluid_density = 1000.0; // much denser fluid

    let mut sys = single_granule(0.05, 20.0);
    let forces = full_force_set(&p);

    euler_step(&mut sys, &forces, &p);

    assert!(
        sys.granules[0].v.dot(&p.gravity) < 0.0,
        "Buoyant granule should rise against gravity"
    );
}

#[test]
fn contact_repulsion_newton_third_law() {
    let p = test_params();
    // Overlapping pair: dist 0.06 < r1 + r2 = 0.1
    let sys = pair_ensemble(0.06, 0.05, 0.05);
    let forces = contact_set(&p);

    let mut out = vec![NVec3::zeros(); 2];
    forces.accumulate_forces(sys.t, &sys, &mut out);

    let net = out[0] + out[1];
    assert!(net.norm() < 1e-12, "Net contact force not zero: {:?}", net);

    // Magnitude: spring_k * overlap
    let overlap = 0.05 + 0.05 - 0.06;
    let expected = p.spring_k * overlap;
    assert!(
        (out[0].norm() - expected).abs() < 1e-12,
        "Expected |f| = {expected}, got {}",
        out[0].norm()
    );

    // Pushed apart: granule 0 (left) goes further left
    assert!(out[0].x < 0.0, "Left granule not pushed left");
    assert!(out[1].x > 0.0, "Right granule not pushed right");
}

#[test]
fn separated_pair_feels_no_contact_force() {
    let p = test_params();
    let sys = pair_ensemble(0.3, 0.05, 0.05);
    let forces = contact_set(&p);

    let mut out = vec![NVec3::zeros(); 2];
    forces.accumulate_forces(sys.t, &sys, &mut out);

    assert_eq!(out[0], NVec3::zeros());
    assert_eq!(out[1], NVec3::zeros());
}

#[test]
fn exact_touch_contributes_no_contact_force() {
    let p = test_params();
    // dist == r1 + r2 exactly: the max(.., 0) clamp yields zero overlap
    let sys = pair_ensemble(1.0, 0.5, 0.5);
    let forces = contact_set(&p);

    let mut out = vec![NVec3::zeros(); 2];
    forces.accumulate_forces(sys.t, &sys, &mut out);

    assert_eq!(out[0], NVec3::zeros(), "Boundary contact should be silent");
    assert_eq!(out[1], NVec3::zeros(), "Boundary contact should be silent");
}

// ==================================================================================
// Mobility tests
// ==================================================================================

#[test]
fn mobility_tensor_is_symmetric() {
    let vecs = [
        NVec3::new(1.0, 0.0, 0.0),
        NVec3::new(0.3, -0.7, 1.1),
        NVec3::new(-2.0, 0.5, 0.25),
    ];

    for r in vecs {
        let dist = r.norm();
        let j = mobility_tensor(&r, dist, 0.05);
        let diff = j - j.transpose();
        assert!(
            diff.norm() < 1e-12,
            "Mobility tensor not symmetric for r = {:?}",
            r
        );
    }
}

#[test]
fn hydrodynamic_coupling_drags_neighbor_along() {
    let p = test_params();
    // Two separated granules sinking: the coupling means each one's velocity
    // is larger in magnitude than the isolated Stokes velocity
    let mut sys = pair_ensemble(0.5, 0.05, 0.05);
    for g in &mut sys.granules {
        g.density = 20.0;
    }
    let forces = full_force_set(&p);

    let mut body_forces = vec![NVec3::zeros(); 2];
    forces.accumulate_forces(sys.t, &sys, &mut body_forces);

    let mut velocities = vec![NVec3::zeros(); 2];
    resolve_velocities(&sys, &body_forces, &p, &mut velocities);

    let isolated = body_forces[0].norm() / (6.0 * PI * p.viscosity * 0.05);
    assert!(
        velocities[0].norm() > isolated,
        "Coupling should speed up co-sedimenting granules: {} vs {}",
        velocities[0].norm(),
        isolated
    );

    // Identical pair in an identical force field: velocities match
    assert!((velocities[0] - velocities[1]).norm() < 1e-12);
}

#[test]
fn mobility_reads_frozen_force_snapshot() {
    let p = test_params();
    let sys = pair_ensemble(0.5, 0.05, 0.08);
    let forces = full_force_set(&p);

    let mut body_forces = vec![NVec3::zeros(); 2];
    forces.accumulate_forces(sys.t, &sys, &mut body_forces);
    let snapshot = body_forces.clone();

    let mut velocities = vec![NVec3::zeros(); 2];
    resolve_velocities(&sys, &body_forces, &p, &mut velocities);

    // The body-force array is an input, never mutated by the resolver
    assert_eq!(body_forces, snapshot);

    // Swapping granule processing order must not change the result, since
    // every coupling reads the same frozen snapshot
    let mut sys_rev = sys.clone();
    sys_rev.granules.reverse();
    let mut forces_rev = vec![NVec3::zeros(); 2];
    full_force_set(&p).accumulate_forces(sys_rev.t, &sys_rev, &mut forces_rev);
    let mut velocities_rev = vec![NVec3::zeros(); 2];
    resolve_velocities(&sys_rev, &forces_rev, &p, &mut velocities_rev);

    assert!((velocities[0] - velocities_rev[1]).norm() < 1e-12);
    assert!((velocities[1] - velocities_rev[0]).norm() < 1e-12);
}

#[test]
fn coincident_granules_stay_finite() {
    let p = test_params();
    // Two granules at the same point: the min_dist clamp caps both passes
    let mut sys = pair_ensemble(0.0, 0.05, 0.05);
    let forces = full_force_set(&p);

    for _ in 0..5 {
        euler_step(&mut sys, &forces, &p);
        assert!(check_finite(&sys).is_ok(), "Degenerate pair produced non-finite state");
    }
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn runs_are_deterministic() {
    let p = test_params();

    let mut sys_a = pair_ensemble(0.08, 0.05, 0.05);
    let mut sys_b = sys_a.clone();

    let forces_a = full_force_set(&p);
    let forces_b = full_force_set(&p);

    for _ in 0..50 {
        euler_step(&mut sys_a, &forces_a, &p);
        euler_step(&mut sys_b, &forces_b, &p);
    }

    for (ga, gb) in sys_a.granules.iter().zip(sys_b.granules.iter()) {
        assert_eq!(ga.x, gb.x, "Positions diverged between identical runs");
        assert_eq!(ga.v, gb.v, "Velocities diverged between identical runs");
    }
}

#[test]
fn euler_step_advances_time() {
    let p = test_params();
    let mut sys = single_granule(0.05, 20.0);
    let forces = full_force_set(&p);

    euler_step(&mut sys, &forces, &p);
    assert!((sys.t - p.h0).abs() < 1e-15);
}

#[test]
fn check_finite_flags_nan_positions() {
    let mut sys = single_granule(0.05, 20.0);
    assert!(check_finite(&sys).is_ok());

    sys.granules[0].x.y = f64::NAN;
    assert!(check_finite(&sys).is_err(), "NaN position slipped through");
}

// ==================================================================================
// Pose tests
// ==================================================================================

#[test]
fn poses_track_granules_exactly() {
    let p = test_params();
    let mut sys = pair_ensemble(0.3, 0.05, 0.08);
    let forces = full_force_set(&p);
    let mut poses = PoseBuffer::new(&sys);

    for _ in 0..10 {
        euler_step(&mut sys, &forces, &p);
        poses.refresh(&sys);

        assert_eq!(poses.poses().len(), sys.granules.len());
        for (pose, g) in poses.poses().iter().zip(sys.granules.iter()) {
            assert_eq!(pose.translation, g.x, "Pose translation != granule position");
            assert_eq!(pose.scale, 2.0 * g.radius, "Pose scale != diameter");
        }
    }
}

// ==================================================================================
// Scenario / configuration tests
// ==================================================================================

fn parse(yaml: &str) -> ScenarioConfig {
    serde_yaml::from_str(yaml).expect("test yaml should parse")
}

const BASE_PARAMS: &str = "
engine:
  check_finite: true
parameters:
  t_end: 1.0
  h0: 0.001
  seed: 7
  gravity: [0.0, -9.81, 0.0]
  fluid_density: 1.2
  spring_k: 500.0
  viscosity: 5.0
";

#[test]
fn placement_scenario_builds_and_is_reproducible() {
    let yaml = format!(
        "{BASE_PARAMS}
placement:
  count: 16
  radius: 0.05
  density: 20.0
  center: [0.0, 2.0, 0.0]
  half_extents: [0.85, 0.1, 0.005]
"
    );

    let a = Scenario::build_scenario(parse(&yaml)).expect("valid scenario");
    let b = Scenario::build_scenario(parse(&yaml)).expect("valid scenario");

    assert_eq!(a.ensemble.granules.len(), 16);
    for (ga, gb) in a.ensemble.granules.iter().zip(b.ensemble.granules.iter()) {
        assert_eq!(ga.x, gb.x, "Same seed should give same placement");
    }

    // Sampled positions stay inside the box
    for g in &a.ensemble.granules {
        assert!((g.x.x - 0.0).abs() <= 0.85);
        assert!((g.x.y - 2.0).abs() <= 0.1);
        assert!((g.x.z - 0.0).abs() <= 0.005);
    }
}

#[test]
fn zero_count_placement_is_rejected() {
    let yaml = format!(
        "{BASE_PARAMS}
placement:
  count: 0
  radius: 0.05
  density: 20.0
  center: [0.0, 0.0, 0.0]
  half_extents: [1.0, 1.0, 1.0]
"
    );
    assert!(Scenario::build_scenario(parse(&yaml)).is_err());
}

#[test]
fn negative_viscosity_is_rejected() {
    let yaml = "
engine:
  check_finite: true
parameters:
  t_end: 1.0
  h0: 0.001
  seed: 7
  gravity: [0.0, -9.81, 0.0]
  fluid_density: 1.2
  spring_k: 500.0
  viscosity: -5.0
placement:
  count: 4
  radius: 0.05
  density: 20.0
  center: [0.0, 0.0, 0.0]
  half_extents: [1.0, 1.0, 1.0]
";
    assert!(Scenario::build_scenario(parse(yaml)).is_err());
}

#[test]
fn coincident_explicit_granules_are_rejected() {
    let yaml = format!(
        "{BASE_PARAMS}
granules:
  - radius: 0.05
    density: 20.0
    x: [0.0, 0.0, 0.0]
  - radius: 0.05
    density: 20.0
    x: [0.0, 0.0, 0.0]
"
    );
    assert!(Scenario::build_scenario(parse(&yaml)).is_err());
}

#[test]
fn scenario_with_both_sources_is_rejected() {
    let yaml = format!(
        "{BASE_PARAMS}
placement:
  count: 4
  radius: 0.05
  density: 20.0
  center: [0.0, 0.0, 0.0]
  half_extents: [1.0, 1.0, 1.0]
granules:
  - radius: 0.05
    density: 20.0
    x: [0.0, 0.0, 0.0]
"
    );
    assert!(Scenario::build_scenario(parse(&yaml)).is_err());
}

#[test]
fn headless_run_reaches_t_end() {
    let yaml = format!(
        "{BASE_PARAMS}
granules:
  - radius: 0.05
    density: 20.0
    x: [0.0, 0.0, 0.0]
  - radius: 0.05
    density: 20.0
    x: [0.3, 0.0, 0.0]
"
    );

    let mut scenario = Scenario::build_scenario(parse(&yaml)).expect("valid scenario");
    scenario.run_headless().expect("run should stay finite");

    assert!(scenario.ensemble.t >= scenario.parameters.t_end);
    assert_eq!(scenario.poses.poses().len(), 2);
}
