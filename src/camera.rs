/// Camera follow with transient shake.
///
/// The camera is derived from the player every frame; its only memory is
/// the eased position and the decaying shake magnitude.

use rand::Rng;

use crate::config::Tuning;
use crate::entities::{Camera, Player};

/// Below this the shake is considered over and snapped to zero.
const SHAKE_EPSILON: f32 = 0.05;

/// Shake triggers raised during one frame, folded with `max`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShakeRequest(f32);

impl ShakeRequest {
    pub fn raise(&mut self, severity: f32) {
        self.0 = self.0.max(severity);
    }

    pub fn severity(&self) -> f32 {
        self.0
    }

    /// Hand the strongest trigger over and reset for the next frame.
    pub fn take(&mut self) -> Option<f32> {
        let severity = std::mem::take(&mut self.0);
        (severity > 0.0).then_some(severity)
    }
}

/// Where the camera wants to be: the player centered, clamped to the level.
pub fn target(player: &Player, level_width: f32, level_height: f32, tuning: &Tuning) -> (f32, f32) {
    let max_x = (level_width - tuning.viewport_width).max(0.0);
    let max_y = (level_height - tuning.viewport_height).max(0.0);
    (
        (player.x - tuning.viewport_width / 2.0).clamp(0.0, max_x),
        (player.y - tuning.viewport_height / 2.0).clamp(0.0, max_y),
    )
}

/// Ease toward the target, then jitter by the current shake and decay it.
///
/// A pending shake request *replaces* the current magnitude.
pub fn update(
    camera: &mut Camera,
    target: (f32, f32),
    shake: &mut ShakeRequest,
    tuning: &Tuning,
    rng: &mut impl Rng,
) {
    if let Some(severity) = shake.take() {
        camera.shake = severity;
    }

    camera.x += (target.0 - camera.x) * tuning.camera_follow;
    camera.y += (target.1 - camera.y) * tuning.camera_follow;

    if camera.shake > 0.0 {
        camera.x += (rng.gen::<f32>() - 0.5) * camera.shake;
        camera.y += (rng.gen::<f32>() - 0.5) * camera.shake;
        camera.shake *= tuning.shake_decay;
        if camera.shake < SHAKE_EPSILON {
            camera.shake = 0.0;
        }
    }
}
