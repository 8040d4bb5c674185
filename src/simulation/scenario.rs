//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! (`Scenario`) containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - ensemble state (`Ensemble` with granules at t = 0)
//! - active force set (`ForceSet`)
//! - pose snapshot for rendering (`PoseBuffer`)
//!
//! Construction validates the configuration: a scenario that would divide by
//! zero or run with nonsensical constants is rejected here, before the first
//! step. The scenario is inserted into Bevy as a `Resource` and consumed by
//! the integration and visualization systems, or driven headless via
//! [`Scenario::run_headless`].

use anyhow::{bail, ensure, Result};
use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::configuration::config::{GranuleConfig, PlacementConfig, ScenarioConfig};
use crate::simulation::engine::Engine;
use crate::simulation::forces::{BuoyantGravity, ContactRepulsion, ForceSet};
use crate::simulation::integrator::{check_finite, euler_step};
use crate::simulation::params::Parameters;
use crate::simulation::poses::PoseBuffer;
use crate::simulation::states::{Ensemble, Granule, NVec3};

/// Default pair-distance clamp when the config leaves `min_dist` unset
const DEFAULT_MIN_DIST: f64 = 1e-9;

/// Bevy resource representing a fully-initialized simulation scenario
///
/// This is the main "runtime bundle" constructed from a [`ScenarioConfig`]:
/// it contains the engine settings, parameters, current ensemble state, the
/// set of active force terms, and the pose snapshot handed to the renderer
#[derive(Resource)]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub ensemble: Ensemble,
    pub forces: ForceSet,
    pub poses: PoseBuffer,
}

impl Scenario {
    /// Validate `cfg` and build the runtime scenario
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        let parameters = build_parameters(&cfg)?;

        // Granules: an explicit list and box placement are mutually exclusive
        let granules = match (&cfg.granules, &cfg.placement) {
            (Some(list), None) => explicit_granules(list, parameters.min_dist)?,
            (None, Some(placement)) => sampled_granules(placement, parameters.seed)?,
            (Some(_), Some(_)) => bail!("scenario has both `granules` and `placement`; pick one"),
            (None, None) => bail!("scenario needs either `granules` or `placement`"),
        };

        // Initial ensemble state: granules at t = 0
        let ensemble = Ensemble { granules, t: 0.0 };

        // Engine (runtime) from EngineConfig
        let engine = Engine {
            check_finite: cfg.engine.check_finite,
        };

        // Forces: buoyant gravity plus soft contact repulsion
        let forces = ForceSet::new()
            .with(BuoyantGravity {
                gravity: parameters.gravity,
                fluid_density: parameters.fluid_density,
            })
            .with(ContactRepulsion {
                spring_k: parameters.spring_k,
                min_dist: parameters.min_dist,
            });

        let poses = PoseBuffer::new(&ensemble);

        Ok(Self {
            engine,
            parameters,
            ensemble,
            forces,
            poses,
        })
    }

    /// Advance the scenario by one tick: forces -> velocities -> positions,
    /// then refresh the pose snapshot
    pub fn step(&mut self) -> Result<()> {
        euler_step(&mut self.ensemble, &self.forces, &self.parameters);
        if self.engine.check_finite {
            check_finite(&self.ensemble)?;
        }
        self.poses.refresh(&self.ensemble);
        Ok(())
    }

    /// Run without a viewer until `t_end` is reached
    pub fn run_headless(&mut self) -> Result<()> {
        while self.ensemble.t < self.parameters.t_end {
            self.step()?;
        }
        Ok(())
    }
}

/// Parameters (runtime) from ParametersConfig, with validation
fn build_parameters(cfg: &ScenarioConfig) -> Result<Parameters> {
    let p = &cfg.parameters;
    ensure!(p.h0 > 0.0, "time step h0 must be positive, got {}", p.h0);
    ensure!(p.t_end >= 0.0, "t_end must be non-negative, got {}", p.t_end);
    ensure!(
        p.viscosity > 0.0,
        "viscosity must be positive, got {}",
        p.viscosity
    );
    ensure!(
        p.fluid_density >= 0.0,
        "fluid density must be non-negative, got {}",
        p.fluid_density
    );
    ensure!(
        p.spring_k >= 0.0,
        "spring stiffness must be non-negative, got {}",
        p.spring_k
    );
    let min_dist = p.min_dist.unwrap_or(DEFAULT_MIN_DIST);
    ensure!(min_dist > 0.0, "min_dist must be positive, got {min_dist}");

    Ok(Parameters {
        t_end: p.t_end,
        h0: p.h0,
        seed: p.seed,
        gravity: vec3(&p.gravity, "parameters.gravity")?,
        fluid_density: p.fluid_density,
        spring_k: p.spring_k,
        viscosity: p.viscosity,
        min_dist,
    })
}

/// Map an explicit granule list, rejecting bad radii/densities and
/// coincident pairs (closer than `min_dist`)
fn explicit_granules(list: &[GranuleConfig], min_dist: f64) -> Result<Vec<Granule>> {
    ensure!(!list.is_empty(), "granule list is empty");

    let granules: Vec<Granule> = list
        .iter()
        .enumerate()
        .map(|(i, gc)| {
            ensure!(
                gc.radius > 0.0,
                "granule {i}: radius must be positive, got {}",
                gc.radius
            );
            ensure!(
                gc.density > 0.0,
                "granule {i}: density must be positive, got {}",
                gc.density
            );
            Ok(Granule {
                radius: gc.radius,
                density: gc.density,
                x: vec3(&gc.x, "granule position")?,
                v: NVec3::zeros(),
            })
        })
        .collect::<Result<_>>()?;

    // Enforce minimum separation up front so the per-step clamp only ever
    // has to cover drift during the run
    for i in 0..granules.len() {
        for j in (i + 1)..granules.len() {
            let dist = (granules[j].x - granules[i].x).norm();
            ensure!(
                dist >= min_dist,
                "granules {i} and {j} are coincident (separation {dist:e} < {min_dist:e})"
            );
        }
    }

    Ok(granules)
}

/// Sample granule positions uniformly in the placement box, seeded for
/// reproducibility
fn sampled_granules(placement: &PlacementConfig, seed: u64) -> Result<Vec<Granule>> {
    ensure!(placement.count > 0, "placement.count must be positive");
    ensure!(
        placement.radius > 0.0,
        "placement.radius must be positive, got {}",
        placement.radius
    );
    ensure!(
        placement.density > 0.0,
        "placement.density must be positive, got {}",
        placement.density
    );

    let center = vec3(&placement.center, "placement.center")?;
    let half = vec3(&placement.half_extents, "placement.half_extents")?;
    ensure!(
        half.iter().all(|h| *h >= 0.0),
        "placement.half_extents must be non-negative"
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let granules = (0..placement.count)
        .map(|_| {
            let offset = NVec3::new(
                sample_axis(&mut rng, half.x),
                sample_axis(&mut rng, half.y),
                sample_axis(&mut rng, half.z),
            );
            Granule {
                radius: placement.radius,
                density: placement.density,
                x: center + offset,
                v: NVec3::zeros(),
            }
        })
        .collect();

    Ok(granules)
}

/// Uniform sample in [-h, h]; a zero half-extent collapses the axis
fn sample_axis(rng: &mut StdRng, h: f64) -> f64 {
    if h > 0.0 {
        rng.gen_range(-h..h)
    } else {
        0.0
    }
}

/// Convert a YAML 3-component list into an `NVec3`
fn vec3(components: &[f64], what: &str) -> Result<NVec3> {
    ensure!(
        components.len() == 3,
        "{what} must have exactly 3 components, got {}",
        components.len()
    );
    Ok(NVec3::new(components[0], components[1], components[2]))
}
