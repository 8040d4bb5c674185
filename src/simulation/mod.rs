pub mod states;
pub mod params;
pub mod engine;
pub mod forces;
pub mod mobility;
pub mod integrator;
pub mod poses;
pub mod scenario;
