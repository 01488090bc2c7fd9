//! Input vocabulary shared by host events and seat routing.

use bitflags::bitflags;

/// Button/Key state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyState {
    #[default]
    Released = 0,
    Pressed = 1,
}

impl KeyState {
    pub fn is_pressed(&self) -> bool {
        matches!(self, KeyState::Pressed)
    }

    pub fn is_released(&self) -> bool {
        matches!(self, KeyState::Released)
    }
}

pub type ButtonState = KeyState;

/// Pointer axis (scroll direction)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerAxis {
    #[default]
    Vertical,
    Horizontal,
}

/// Axis source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisSource {
    #[default]
    Wheel,
    Finger,
    Continuous,
    WheelTilt,
}

/// A scroll event, forwarded untouched to the pointer-focused client.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisEvent {
    pub orientation: PointerAxis,
    pub delta: f64,
    pub delta_discrete: i32,
    pub source: AxisSource,
}

bitflags! {
    /// Keyboard modifier mask, bit values as in `wlr_keyboard_modifier`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u32 {
        const SHIFT = 1;
        const CAPS = 2;
        const CTRL = 4;
        const ALT = 8;
        const MOD2 = 16;
        const MOD3 = 32;
        const LOGO = 64;
        const MOD5 = 128;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::empty()
    }
}

/// Linux input event codes for the buttons the compositor binds.
pub mod buttons {
    pub const BTN_LEFT: u32 = 0x110;
    pub const BTN_RIGHT: u32 = 0x111;
    pub const BTN_MIDDLE: u32 = 0x112;
}

/// Keysyms the compositor binds. The host translates keycodes to keysyms.
pub mod keysyms {
    pub const KEY_ESCAPE: u32 = 0xff1b;
    pub const KEY_J: u32 = 0x006a;
    pub const KEY_K: u32 = 0x006b;
}
