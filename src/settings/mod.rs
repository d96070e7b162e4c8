//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are hot-reloadable
//! using the existing RON watcher utilities (see `ron::setup_ron_watcher`).
use crate::terrain::TerrainParams;
use bevy::prelude::{KeyCode, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// World generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSettings {
    #[serde(default = "WorldSettings::default_bootstrap_radius")]
    pub bootstrap_radius: i32, // Radius (in chunks) generated around the origin at startup.
    #[serde(default)]
    pub terrain: TerrainParams, // Height curve, material thresholds and seed for the generator.
}

impl WorldSettings {
    fn default_bootstrap_radius() -> i32 { 2 }
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            bootstrap_radius: Self::default_bootstrap_radius(),
            terrain: TerrainParams::default(),
        }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default)]
    pub invert_y: bool, // Invert mouse Y axis
    #[serde(default)]
    pub invert_x: bool, // Invert mouse X axis
    #[serde(default = "ControlsSettings::default_sensitivity")]
    pub mouse_sensitivity: f32, // Mouse sensitivity multiplier
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Map of logical control names to key identifiers (editable by user)
}

impl ControlsSettings {
    fn default_sensitivity() -> f32 { 1.0 }

    fn default_keybinds() -> HashMap<String, String> {
        let mut m = HashMap::new();
        m.insert("forward".to_string(), "W".to_string());
        m.insert("backward".to_string(), "S".to_string());
        m.insert("left".to_string(), "A".to_string());
        m.insert("right".to_string(), "D".to_string());
        m.insert("jump".to_string(), "Space".to_string());
        m.insert("sprint".to_string(), "LShift".to_string());
        m.insert("inventory".to_string(), "E".to_string());
        m.insert("pause".to_string(), "Escape".to_string());
        m.insert("dump_debug".to_string(), "F3".to_string());
        m
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            invert_y: false,
            invert_x: false,
            mouse_sensitivity: Self::default_sensitivity(),
            keybinds: Self::default_keybinds(),
        }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub world: WorldSettings,
    #[serde(default)]
    pub controls: ControlsSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world: WorldSettings::default(),
            controls: ControlsSettings::default(),
        }
    }
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Convert a string key identifier (e.g., from `controls.keybinds`) into a `KeyCode` that
    /// can be used with Bevy's input system.
    ///
    /// # Arguments
    /// * `name` - The string key identifier to convert (e.g., "W", "Space", "F1").
    ///
    /// # Returns
    /// An `Option<KeyCode>` corresponding to the provided string, or `None` if the string
    /// does not match any known key.
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        let s = name.to_ascii_uppercase();
        if s.len() == 1 {
            let c = s.chars().next().unwrap();
            if ('A'..='Z').contains(&c) {
                return Some(match c {
                    'A' => KeyCode::KeyA,
                    'B' => KeyCode::KeyB,
                    'C' => KeyCode::KeyC,
                    'D' => KeyCode::KeyD,
                    'E' => KeyCode::KeyE,
                    'F' => KeyCode::KeyF,
                    'G' => KeyCode::KeyG,
                    'H' => KeyCode::KeyH,
                    'I' => KeyCode::KeyI,
                    'J' => KeyCode::KeyJ,
                    'K' => KeyCode::KeyK,
                    'L' => KeyCode::KeyL,
                    'M' => KeyCode::KeyM,
                    'N' => KeyCode::KeyN,
                    'O' => KeyCode::KeyO,
                    'P' => KeyCode::KeyP,
                    'Q' => KeyCode::KeyQ,
                    'R' => KeyCode::KeyR,
                    'S' => KeyCode::KeyS,
                    'T' => KeyCode::KeyT,
                    'U' => KeyCode::KeyU,
                    'V' => KeyCode::KeyV,
                    'W' => KeyCode::KeyW,
                    'X' => KeyCode::KeyX,
                    'Y' => KeyCode::KeyY,
                    'Z' => KeyCode::KeyZ,
                    _ => return None,
                });
            }
            if c.is_ascii_digit() {
                return Some(match c {
                    '0' => KeyCode::Digit0,
                    '1' => KeyCode::Digit1,
                    '2' => KeyCode::Digit2,
                    '3' => KeyCode::Digit3,
                    '4' => KeyCode::Digit4,
                    '5' => KeyCode::Digit5,
                    '6' => KeyCode::Digit6,
                    '7' => KeyCode::Digit7,
                    '8' => KeyCode::Digit8,
                    '9' => KeyCode::Digit9,
                    _ => return None,
                });
            }
        }

        Some(match s.as_str() {
            // Function keys
            "F1" => KeyCode::F1,
            "F2" => KeyCode::F2,
            "F3" => KeyCode::F3,
            "F4" => KeyCode::F4,
            "F5" => KeyCode::F5,
            "F6" => KeyCode::F6,
            "F7" => KeyCode::F7,
            "F8" => KeyCode::F8,
            "F9" => KeyCode::F9,
            "F10" => KeyCode::F10,
            "F11" => KeyCode::F11,
            "F12" => KeyCode::F12,

            // Arrows / navigation
            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,
            "HOME" => KeyCode::Home,
            "END" => KeyCode::End,
            "PAGEUP" => KeyCode::PageUp,
            "PAGEDOWN" => KeyCode::PageDown,
            "INSERT" => KeyCode::Insert,
            "DELETE" | "DEL" => KeyCode::Delete,

            // Whitespace / control
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "BACKSPACE" | "BACK" => KeyCode::Backspace,

            // Modifiers
            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,

            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keybinds_cover_every_logical_control() {
        let settings = Settings::defaults();
        // Mine/place are mouse-bound; every keyboard control needs a bind.
        for name in ["forward", "backward", "left", "right", "jump", "sprint", "inventory"] {
            let key = settings.controls.keybinds.get(name).expect("bind present");
            assert!(Settings::keycode_from_str(key).is_some(), "unmapped key for {name}");
        }
    }

    #[test]
    fn keycode_parsing_handles_letters_digits_and_names() {
        assert_eq!(Settings::keycode_from_str("w"), Some(KeyCode::KeyW));
        assert_eq!(Settings::keycode_from_str("3"), Some(KeyCode::Digit3));
        assert_eq!(Settings::keycode_from_str("lshift"), Some(KeyCode::ShiftLeft));
        assert_eq!(Settings::keycode_from_str("not-a-key"), None);
    }
}

pub mod loader;
