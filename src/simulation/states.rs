//! Core state types for the granular suspension simulation.
//!
//! Defines the granule/ensemble structs:
//! - `Granule` – one spherical particle (radius, density, position, velocity)
//! - `Ensemble` – the full swarm plus the current simulation time `t`
//!
//! Radius and density are fixed after construction; only position and
//! velocity change between steps. Granules live in a fixed-size `Vec` and
//! are identified by index for the lifetime of the run — nothing is ever
//! inserted or removed while the simulation is running.

use nalgebra::{Matrix3, Vector3};
pub type NVec3 = Vector3<f64>;
pub type NMat3 = Matrix3<f64>;

#[derive(Debug, Clone)]
pub struct Granule {
    pub radius: f64, // sphere radius, constant
    pub density: f64, // material density, constant
    pub x: NVec3, // position
    pub v: NVec3, // velocity (derived from the force field each step)
}

impl Granule {
    /// Sphere volume, 4/3 pi r^3
    pub fn volume(&self) -> f64 {
        4.0 / 3.0 * std::f64::consts::PI * self.radius * self.radius * self.radius
    }
}

#[derive(Debug, Clone)]
pub struct Ensemble {
    pub granules: Vec<Granule>, // collection of granules, index-stable
    pub t: f64, // time
}
