//! Input capture: physical keys and mouse buttons to logical controls.
//!
//! Runs once per frame before movement/interaction and writes the current
//! activation of every logical control into `ControlState`. Keyboard binds
//! are resolved from `Settings` on every frame so keybind hot-reloads take
//! effect immediately; mine/place map to the mouse buttons and only count
//! while the cursor is locked to the window.

use crate::controls::{Control, ControlState};
use crate::settings::Settings;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

/// Keyboard-bound controls and their fallback keys when the settings file
/// carries no (or an unparseable) bind.
pub const KEYBOARD_CONTROLS: [(Control, KeyCode); 7] = [
    (Control::Forward, KeyCode::KeyW),
    (Control::Backward, KeyCode::KeyS),
    (Control::Left, KeyCode::KeyA),
    (Control::Right, KeyCode::KeyD),
    (Control::Jump, KeyCode::Space),
    (Control::Sprint, KeyCode::ShiftLeft),
    (Control::Inventory, KeyCode::KeyE),
];

/// Per-frame system translating raw input state into the control store.
///
/// # Arguments
/// * `keyboard` - current keyboard state
/// * `mouse` - current mouse button state
/// * `settings` - keybind configuration
/// * `window_query` - primary window, for the cursor-lock check
/// * `controls` - control store receiving the activation flags
#[allow(clippy::needless_pass_by_value)]
pub fn capture_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    settings: Res<Settings>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut controls: ResMut<ControlState>,
) {
    let map_key = |control: Control, default: KeyCode| {
        settings
            .controls
            .keybinds
            .get(control.name())
            .and_then(|s| Settings::keycode_from_str(s))
            .unwrap_or(default)
    };

    for (control, default) in KEYBOARD_CONTROLS {
        controls.set(control, keyboard.pressed(map_key(control, default)));
    }

    // Mouse clicks aimed at an unfocused window must not mine or place.
    let locked = window_query
        .get_single()
        .is_ok_and(|w| w.cursor.grab_mode == CursorGrabMode::Locked);
    controls.set(Control::Mine, locked && mouse.pressed(MouseButton::Left));
    controls.set(Control::Place, locked && mouse.pressed(MouseButton::Right));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_keyboard_control_has_exactly_one_entry() {
        let mouse_bound = [Control::Mine, Control::Place];
        for control in Control::ALL {
            let entries = KEYBOARD_CONTROLS.iter().filter(|(c, _)| *c == control).count();
            if mouse_bound.contains(&control) {
                assert_eq!(entries, 0);
            } else {
                assert_eq!(entries, 1);
            }
        }
    }
}
