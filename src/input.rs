//! Controller Input Snapshot
//!
//! Shared table of raw input values sampled by the port devices. The
//! frontend (or whatever drives the emulator) fills it in; the devices
//! only ever read from it, except for the stick centring done on reset.
//!
//! ## Slot Layout
//!
//! Each physical port owns [`SLOTS_PER_PORT`] device slots. For an XE-1AP
//! on port `p` (`base = 4 * p`):
//!
//! | Slot       | analog[0]          | analog[1]          | pad            |
//! |:-----------|:-------------------|:-------------------|:---------------|
//! | `base`     | Left stick X       | Left stick Y       | Button bits    |
//! | `base + 1` | Right stick (Z)    | unused             | unused         |

/// Total number of device slots (two ports, four slots each)
pub const MAX_DEVICES: usize = 8;

/// Device slots owned by one physical port
pub const SLOTS_PER_PORT: usize = 4;

/// Neutral analog position
pub const AXIS_CENTER: u8 = 128;

/// Raw button bits (active high: 1 = pressed)
pub mod buttons {
    pub const E1: u16 = 0x0800;
    pub const E2: u16 = 0x0400;
    pub const START: u16 = 0x0200;
    pub const SELECT: u16 = 0x0100;
    pub const A: u16 = 0x0080;
    pub const B: u16 = 0x0040;
    pub const C: u16 = 0x0020;
    pub const D: u16 = 0x0010;

    /// Every bit the XE-1AP reports
    pub const ALL: u16 = E1 | E2 | START | SELECT | A | B | C | D;
}

/// Raw input values for every device slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSnapshot {
    /// Analog axes, two per slot
    pub analog: [[u8; 2]; MAX_DEVICES],
    /// Button bitmask per slot (active high)
    pub pad: [u16; MAX_DEVICES],
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSnapshot {
    /// Create a snapshot with all sticks centred and no buttons pressed
    pub fn new() -> Self {
        Self {
            analog: [[AXIS_CENTER; 2]; MAX_DEVICES],
            pad: [0; MAX_DEVICES],
        }
    }

    /// First device slot owned by a physical port (0 or 1)
    pub fn port_slot(port: usize) -> usize {
        port * SLOTS_PER_PORT
    }

    /// Set the bidirectional (left) stick position
    pub fn set_stick(&mut self, port: usize, x: u8, y: u8) {
        if let Some(axes) = self.analog.get_mut(Self::port_slot(port)) {
            *axes = [x, y];
        }
    }

    /// Set the unidirectional (right) stick position
    pub fn set_throttle(&mut self, port: usize, z: u8) {
        if let Some(axes) = self.analog.get_mut(Self::port_slot(port) + 1) {
            axes[0] = z;
        }
    }

    /// Current (x, y, z) of a port's sticks
    pub fn axes(&self, port: usize) -> Option<(u8, u8, u8)> {
        let slot = Self::port_slot(port);
        let stick = self.analog.get(slot)?;
        let throttle = self.analog.get(slot + 1)?;
        Some((stick[0], stick[1], throttle[0]))
    }

    /// Button bitmask for a port
    pub fn buttons(&self, port: usize) -> u16 {
        self.pad.get(Self::port_slot(port)).copied().unwrap_or(0)
    }

    /// Set button state by name (for scripting/testing)
    pub fn set_button(&mut self, port: usize, button: &str, pressed: bool) {
        let bit = match button.to_lowercase().as_str() {
            "e1" => buttons::E1,
            "e2" => buttons::E2,
            "start" => buttons::START,
            "select" => buttons::SELECT,
            "a" => buttons::A,
            "b" => buttons::B,
            "c" => buttons::C,
            "d" => buttons::D,
            _ => return,
        };

        if let Some(pad) = self.pad.get_mut(Self::port_slot(port)) {
            if pressed {
                *pad |= bit;
            } else {
                *pad &= !bit;
            }
        }
    }

    /// Release all buttons and centre all sticks of a port
    pub fn clear(&mut self, port: usize) {
        let slot = Self::port_slot(port);
        for s in slot..(slot + SLOTS_PER_PORT).min(MAX_DEVICES) {
            self.analog[s] = [AXIS_CENTER; 2];
            self.pad[s] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_default_centered() {
        let input = InputSnapshot::default();
        assert_eq!(input.axes(0), Some((128, 128, 128)));
        assert_eq!(input.axes(1), Some((128, 128, 128)));
        assert_eq!(input.buttons(0), 0);
    }

    #[test]
    fn test_port_slots() {
        assert_eq!(InputSnapshot::port_slot(0), 0);
        assert_eq!(InputSnapshot::port_slot(1), 4);
    }

    #[test]
    fn test_set_stick_and_throttle() {
        let mut input = InputSnapshot::new();
        input.set_stick(1, 0x12, 0xEF);
        input.set_throttle(1, 0x80);

        assert_eq!(input.analog[4], [0x12, 0xEF]);
        assert_eq!(input.analog[5][0], 0x80);
        // Port 0 untouched
        assert_eq!(input.axes(0), Some((128, 128, 128)));
    }

    #[test]
    fn test_set_button() {
        let mut input = InputSnapshot::new();
        input.set_button(0, "A", true);
        input.set_button(0, "start", true);
        input.set_button(0, "bogus", true);

        assert_eq!(input.buttons(0), buttons::A | buttons::START);

        input.set_button(0, "a", false);
        assert_eq!(input.buttons(0), buttons::START);
        assert_eq!(input.buttons(1), 0);
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut input = InputSnapshot::new();
        input.set_stick(2, 0, 0);
        input.set_button(2, "a", true);

        assert_eq!(input, InputSnapshot::new());
        assert_eq!(input.axes(2), None);
        assert_eq!(input.buttons(2), 0);
    }

    #[test]
    fn test_clear() {
        let mut input = InputSnapshot::new();
        input.set_stick(0, 1, 2);
        input.set_throttle(0, 3);
        input.set_button(0, "e1", true);
        input.set_button(1, "d", true);

        input.clear(0);

        assert_eq!(input.axes(0), Some((128, 128, 128)));
        assert_eq!(input.buttons(0), 0);
        assert_eq!(input.buttons(1), buttons::D);
    }
}
