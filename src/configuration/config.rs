//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – runtime options (finite-position check)
//! - [`ParametersConfig`] – numerical parameters and physical constants
//! - [`PlacementConfig`]  – uniform random placement in an axis-aligned box
//! - [`GranuleConfig`]    – explicit initial state for one granule
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! engine:
//!   check_finite: true      # abort if a step produces non-finite positions
//!
//! parameters:
//!   t_end: 10.0             # total simulation time
//!   h0: 0.001               # fixed step size
//!   seed: 42                # deterministic placement seed
//!   gravity: [0.0, -9.81, 0.0]
//!   fluid_density: 1.2      # ambient fluid density
//!   spring_k: 500.0         # contact spring stiffness
//!   viscosity: 5.0          # fluid dynamic viscosity
//!   min_dist: 1.0e-9        # optional pair-distance clamp
//!
//! placement:
//!   count: 128
//!   radius: 0.05
//!   density: 20.0
//!   center: [0.0, 2.0, 0.0]
//!   half_extents: [0.85, 0.1, 0.005]
//!
//! # Alternatively, list every granule explicitly (per-granule radius and
//! # density allowed):
//! # granules:
//! #   - radius: 0.05
//! #     density: 20.0
//! #     x: [0.0, 0.0, 0.0]
//! ```
//!
//! The scenario builder maps this configuration into its internal runtime
//! representation, validating it along the way.

use serde::Deserialize;

/// Runtime engine options
#[derive(Deserialize, Debug)]
pub struct EngineConfig {
    pub check_finite: bool, // true = reject non-finite positions after each step
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub t_end: f64,            // time end
    pub h0: f64,               // time step size
    pub seed: u64,             // deterministic seed to make runs reproducable
    pub gravity: Vec<f64>,     // gravitational acceleration vector [x, y, z]
    pub fluid_density: f64,    // ambient fluid density
    pub spring_k: f64,         // contact spring stiffness
    pub viscosity: f64,        // fluid dynamic viscosity
    pub min_dist: Option<f64>, // pair-distance clamp, defaults to 1e-9
}

/// Uniform random placement inside an axis-aligned box
/// The box is a center plus half-extents; how it was derived (camera framing,
/// container geometry, ...) is the caller's concern
#[derive(Deserialize, Debug, Clone)]
pub struct PlacementConfig {
    pub count: usize,          // number of granules N
    pub radius: f64,           // uniform granule radius
    pub density: f64,          // uniform granule density
    pub center: Vec<f64>,      // box center [x, y, z]
    pub half_extents: Vec<f64>, // box half-extents [x, y, z]
}

/// Configuration for a single granule's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct GranuleConfig {
    pub radius: f64,  // sphere radius
    pub density: f64, // material density
    pub x: Vec<f64>,  // initial position [x, y, z]
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug)]
pub struct ScenarioConfig {
    pub engine: EngineConfig, // runtime options
    pub parameters: ParametersConfig, // global numerical and physical parameters
    pub placement: Option<PlacementConfig>, // random box placement
    pub granules: Option<Vec<GranuleConfig>>, // explicit granule list
}
