pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{Granule, Ensemble, NVec3, NMat3};
pub use simulation::params::Parameters;
pub use simulation::engine::Engine;
pub use simulation::forces::{Force, ForceSet, BuoyantGravity, ContactRepulsion};
pub use simulation::mobility::{mobility_tensor, resolve_velocities};
pub use simulation::integrator::{euler_step, check_finite};
pub use simulation::poses::{Pose, PoseBuffer};
pub use simulation::scenario::Scenario;

pub use configuration::config::{EngineConfig, ParametersConfig, PlacementConfig, GranuleConfig, ScenarioConfig};

pub use visualization::granuflow_vis3d::run_3d;

pub use benchmark::benchmark::{bench_passes, bench_step_curve};
