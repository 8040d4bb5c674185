//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - integration step size and end time,
//! - gravity vector and ambient fluid density,
//! - contact spring stiffness and fluid dynamic viscosity,
//! - minimum pair separation (`min_dist`) used to clamp degenerate geometry,
//! - random seed for reproducible placement sampling
//!
//! All of these are fixed before the first step; changing them mid-run is
//! not supported.

use super::states::NVec3;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub t_end: f64, // time end
    pub h0: f64, // step size
    pub seed: u64, // deterministic seed for placement sampling
    pub gravity: NVec3, // gravitational acceleration vector
    pub fluid_density: f64, // ambient fluid density
    pub spring_k: f64, // contact spring stiffness
    pub viscosity: f64, // fluid dynamic viscosity
    pub min_dist: f64, // pair-distance clamp, caps forces for near-coincident granules
}
