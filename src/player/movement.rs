//! Player movement driven by the logical control store.
//!
//! Reads the forward/backward/left/right/sprint flags each frame and
//! translates the player horizontally along the camera's flattened forward
//! and right vectors. Horizontal collision is intentionally absent; the only
//! physical constraint on the player is the vertical pass in
//! `crate::player::physics`.

use crate::controls::{Control, ControlState};
use crate::player::Player;
use bevy::prelude::*;

pub const BASE_SPEED: f32 = 5.0;
pub const SPRINT_MULTIPLIER: f32 = 1.6;

/// Apply one frame of horizontal movement to `tf` from the active controls.
///
/// Extracted helper so the system and benchmarks exercise identical logic.
pub fn movement_step(tf: &mut Transform, controls: &ControlState, dt: f32) {
    let forward_raw = tf.forward();
    let fwd = Vec3::new(forward_raw.x, 0.0, forward_raw.z).normalize_or_zero();
    let right_raw = tf.right();
    let right = Vec3::new(right_raw.x, 0.0, right_raw.z).normalize_or_zero();

    let mut dir = Vec3::ZERO;
    if controls.is_active(Control::Forward) {
        dir += fwd;
    }
    if controls.is_active(Control::Backward) {
        dir -= fwd;
    }
    if controls.is_active(Control::Left) {
        dir -= right;
    }
    if controls.is_active(Control::Right) {
        dir += right;
    }

    if dir.length_squared() < 0.0001 {
        return;
    }

    let speed = if controls.is_active(Control::Sprint) {
        BASE_SPEED * SPRINT_MULTIPLIER
    } else {
        BASE_SPEED
    };
    tf.translation += dir.normalize() * speed * dt;
}

/// Handle player movement each frame.
///
/// # Arguments
/// * `controls` - current logical control activation
/// * `time` - delta time resource used to scale movement
/// * `query` - query for the player transform to apply movement to
#[allow(clippy::needless_pass_by_value)]
pub fn player_movement(
    controls: Res<ControlState>,
    time: Res<Time>,
    mut query: Query<&mut Transform, (With<Player>, With<Camera3d>)>,
) {
    let Ok(mut transform) = query.get_single_mut() else { return };
    movement_step(&mut transform, &controls, time.delta_seconds());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_moves_along_flattened_view() {
        let mut tf = Transform::from_xyz(0.0, 10.0, 0.0);
        // Pitch down 45 degrees; horizontal movement must ignore pitch
        tf.rotation = Quat::from_euler(EulerRot::YXZ, 0.0, -std::f32::consts::FRAC_PI_4, 0.0);

        let mut controls = ControlState::default();
        controls.set(Control::Forward, true);
        movement_step(&mut tf, &controls, 1.0);

        assert!((tf.translation.z + BASE_SPEED).abs() < 1e-4);
        assert!((tf.translation.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn opposing_controls_cancel() {
        let mut tf = Transform::from_xyz(0.0, 0.0, 0.0);
        let mut controls = ControlState::default();
        controls.set(Control::Left, true);
        controls.set(Control::Right, true);
        movement_step(&mut tf, &controls, 1.0);
        assert_eq!(tf.translation, Vec3::ZERO);
    }

    #[test]
    fn sprint_scales_speed() {
        let mut walk = Transform::default();
        let mut sprint = Transform::default();
        let mut controls = ControlState::default();
        controls.set(Control::Forward, true);
        movement_step(&mut walk, &controls, 1.0);
        controls.set(Control::Sprint, true);
        movement_step(&mut sprint, &controls, 1.0);

        let ratio = sprint.translation.length() / walk.translation.length();
        assert!((ratio - SPRINT_MULTIPLIER).abs() < 1e-4);
    }
}
