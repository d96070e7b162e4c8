//! Logical control state.
//!
//! This module tracks which abstract controls (forward, mine, place, ...)
//! are currently active. The input layer writes flags through
//! `ControlState::set` / `set_control`; movement and the interaction
//! resolver only ever read. The set of control names is closed; an
//! unrecognized name is a programmer error and is rejected.
//!
//! # Example
//! ```
//! use regolith::controls::{Control, ControlState};
//!
//! let mut controls = ControlState::default();
//! controls.set(Control::Forward, true);
//! controls.set_control("mine", true).unwrap();
//! assert_eq!(controls.active_controls(), &[Control::Forward, Control::Mine]);
//! ```

use bevy::prelude::Resource;
use thiserror::Error;

/// A named logical action, decoupled from the physical key or button that
/// triggers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    Sprint,
    Mine,
    Place,
    Inventory,
}

impl Control {
    /// Every control, in the stable order used for the derived active list.
    pub const ALL: [Control; 9] = [
        Control::Forward,
        Control::Backward,
        Control::Left,
        Control::Right,
        Control::Jump,
        Control::Sprint,
        Control::Mine,
        Control::Place,
        Control::Inventory,
    ];

    /// The control's canonical lowercase name (the keybind/settings key).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Control::Forward => "forward",
            Control::Backward => "backward",
            Control::Left => "left",
            Control::Right => "right",
            Control::Jump => "jump",
            Control::Sprint => "sprint",
            Control::Mine => "mine",
            Control::Place => "place",
            Control::Inventory => "inventory",
        }
    }

    /// Resolve a canonical name back to its control.
    ///
    /// # Errors
    /// Returns `ControlError::UnknownControl` for any name outside the
    /// closed set.
    pub fn from_name(name: &str) -> Result<Self, ControlError> {
        Control::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| ControlError::UnknownControl(name.to_string()))
    }
}

/// Failures surfaced by the control store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("unrecognized control name '{0}'")]
    UnknownControl(String),
}

/// Current activation of every logical control plus the derived list of
/// active control names.
///
/// The derived list is recomputed on every write, so it is always exactly
/// the set of flags currently true, ordered by `Control::ALL`.
#[derive(Resource, Default)]
pub struct ControlState {
    flags: [bool; Control::ALL.len()],
    active: Vec<Control>,
}

impl ControlState {
    /// Set one control's activation. This is the typed hot path used by the
    /// input layer every frame.
    pub fn set(&mut self, control: Control, active: bool) {
        self.flags[control as usize] = active;
        self.recompute_active();
    }

    /// Name-keyed variant of `set` for callers outside the crate boundary.
    ///
    /// # Errors
    /// Returns `ControlError::UnknownControl` when `name` is not one of the
    /// closed set of control names; no state changes in that case.
    pub fn set_control(&mut self, name: &str, active: bool) -> Result<(), ControlError> {
        let control = Control::from_name(name)?;
        self.set(control, active);
        Ok(())
    }

    /// Whether the control is currently active.
    #[must_use]
    pub fn is_active(&self, control: Control) -> bool {
        self.flags[control as usize]
    }

    /// The currently-active controls in stable (`Control::ALL`) order.
    #[must_use]
    pub fn active_controls(&self) -> &[Control] {
        &self.active
    }

    /// Clear every flag (session start).
    pub fn reset(&mut self) {
        self.flags = [false; Control::ALL.len()];
        self.active.clear();
    }

    fn recompute_active(&mut self) {
        self.active.clear();
        self.active
            .extend(Control::ALL.into_iter().filter(|c| self.flags[*c as usize]));
    }
}
