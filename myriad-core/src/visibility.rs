//! Distance-and-cone visibility classification.
//!
//! This is an approximation of the view frustum, not an exact clip: a hard
//! distance cutoff inside the true far plane plus a widened acceptance cone
//! around the forward axis. The cone half-angle is `fov_y * 0.6`, wider than
//! the true half-FOV, which tolerates the missing aspect-ratio correction
//! and keeps entities straddling the exact frustum edge from popping.

use glam::Vec3;

use crate::camera::CameraState;

/// Fraction of the far plane beyond which entities are always culled.
pub const FAR_CUTOFF_FRACTION: f32 = 0.8;

/// Cone widening applied to the vertical half-FOV.
pub const CONE_WIDEN_FACTOR: f32 = 0.6;

/// Classify one entity position against the camera.
///
/// Pure and total over finite inputs. Precondition: the camera passed
/// [`CameraState::validate`]; in particular `position != target`, otherwise
/// the forward direction is undefined.
pub fn is_visible(entity_pos: Vec3, camera: &CameraState) -> bool {
    let offset = entity_pos - camera.position;
    let distance = offset.length();

    if distance > camera.far * FAR_CUTOFF_FRACTION {
        return false;
    }

    if distance > 0.0 {
        let to_entity = offset / distance;
        let cos_angle = to_entity.dot(camera.forward());
        if cos_angle < (camera.fov_y * CONE_WIDEN_FACTOR).cos() {
            return false;
        }
    }

    // distance == 0: entity sits on the eye point, always visible
    true
}
