//! Renderable poses derived from the ensemble state
//!
//! A [`Pose`] is the transform a renderer needs for one granule: translation
//! at the granule's position, identity rotation, uniform scale equal to the
//! diameter. [`PoseBuffer`] caches one pose per granule and is rebuilt in
//! full once per tick, so consumers always see a complete snapshot — never a
//! partially updated frame. The buffer length equals the granule count for
//! the lifetime of the run and indices line up with the granule array.

use super::states::{Ensemble, NVec3};

/// Rigid transform for one granule: translation + uniform scale, rotation is
/// always identity (spheres have no visible orientation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub translation: NVec3,
    pub scale: f64, // diameter, 2 * radius
}

/// Per-tick snapshot of all granule poses
#[derive(Debug, Default)]
pub struct PoseBuffer {
    poses: Vec<Pose>,
}

impl PoseBuffer {
    /// Build a buffer sized for `sys`, already refreshed once
    pub fn new(sys: &Ensemble) -> Self {
        let mut buf = Self {
            poses: Vec::with_capacity(sys.granules.len()),
        };
        buf.refresh(sys);
        buf
    }

    /// Rebuild every pose from the current ensemble state
    pub fn refresh(&mut self, sys: &Ensemble) {
        self.poses.clear();
        self.poses.extend(sys.granules.iter().map(|g| Pose {
            translation: g.x,
            scale: 2.0 * g.radius,
        }));
    }

    /// Read-only view of the current snapshot
    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }
}
