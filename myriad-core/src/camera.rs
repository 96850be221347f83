//! Camera state consumed by the resolution pass.
//!
//! The engine only reads this; the input/control layer owns mutation and
//! reports changes to the scheduler through [`crate::Engine::notify_camera_changed`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Snapshot of the viewing camera for one frame.
///
/// Invariants: `far > near > 0`, `fov_y` in `(0, PI)`, `position != target`,
/// all fields finite. [`CameraState::validate`] enforces them; the per-entity
/// visibility test assumes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Elapsed time in seconds, drives radius animation.
    pub time: f32,
}

impl CameraState {
    pub fn new(position: Vec3, target: Vec3, fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target,
            fov_y,
            aspect,
            near,
            far,
            time: 0.0,
        }
    }

    /// Unit vector from the eye toward the look target.
    ///
    /// Precondition: `position != target` (checked by [`Self::validate`],
    /// not re-checked here).
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Check the invariants the resolution pass depends on.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.position.is_finite() || !self.target.is_finite() {
            return Err(EngineError::invalid_camera("non-finite position or target"));
        }
        if !self.fov_y.is_finite() || !self.aspect.is_finite() {
            return Err(EngineError::invalid_camera("non-finite fov or aspect"));
        }
        if self.position == self.target {
            return Err(EngineError::invalid_camera(
                "position equals target, forward direction undefined",
            ));
        }
        if !(self.fov_y > 0.0 && self.fov_y < std::f32::consts::PI) {
            return Err(EngineError::invalid_camera("fov_y outside (0, PI)"));
        }
        if !(self.far > self.near && self.near > 0.0) {
            return Err(EngineError::invalid_camera("requires far > near > 0"));
        }
        Ok(())
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(
            Vec3::new(0.0, 0.0, -50.0),
            Vec3::ZERO,
            std::f32::consts::FRAC_PI_4,
            16.0 / 9.0,
            0.1,
            1000.0,
        )
    }
}
