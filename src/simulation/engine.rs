//! High-level runtime engine settings
//!
//! Options that shape how a `Scenario` is run, as opposed to the physical
//! constants in `Parameters`

#[derive(Debug, Clone)]
pub struct Engine {
    pub check_finite: bool, // true = abort the run if a step produces non-finite positions
}
