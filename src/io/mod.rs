//! Sega Genesis I/O Controller Support
//!
//! This module implements the controller ports of the Sega Genesis/Mega
//! Drive with an XE-1AP analog controller attached.
//!
//! ## I/O Port Addresses (0xA10001-0xA1001F)
//!
//! | Address   | Description                        |
//! |:----------|:-----------------------------------|
//! | 0xA10001  | Version register                   |
//! | 0xA10003  | Controller 1 data                  |
//! | 0xA10005  | Controller 2 data                  |
//! | 0xA10009  | Controller 1 control               |
//! | 0xA1000B  | Controller 2 control               |
//!
//! Other addresses in the range read as 0xFF and ignore writes.

pub mod xe_1ap;

#[cfg(test)]
mod tests_xe_1ap_properties;

use crate::config::IoConfig;
use crate::debugger::Debuggable;
use crate::input::InputSnapshot;
use serde::{Deserialize, Serialize};
use serde_json::Value;
pub use xe_1ap::{PortData, Xe1ap, Xe1apFrame};

/// Number of physical controller ports
pub const PORT_COUNT: usize = 2;

/// Value read from an empty port (all inputs pulled high)
const DISCONNECTED: u8 = 0x7F;

/// Controller type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControllerType {
    /// No controller connected
    None,
    /// XE-1AP analog joypad
    #[default]
    Xe1ap,
}

/// A controller port
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerPort {
    /// Type of controller connected
    pub controller_type: ControllerType,
    /// Control register (direction: 0=input, 1=output)
    pub control: u8,
    /// Last value written to the data register
    pub data: u8,
    /// Protocol state of the attached XE-1AP
    pub xe_1ap: Xe1ap,
}

impl ControllerPort {
    /// Create a controller port (0 or 1)
    pub fn new(port: usize, controller_type: ControllerType) -> Self {
        Self {
            controller_type,
            control: 0x00,
            data: 0x00,
            xe_1ap: Xe1ap::new(port),
        }
    }

    /// Reset the port
    pub fn reset(&mut self, input: &mut InputSnapshot) {
        self.control = 0x00;
        self.data = 0x00;
        // Reset regardless of type so a later reconnect starts clean
        self.xe_1ap.reset(input);
    }

    /// Read the device side of the data port
    pub fn read_device(&mut self, input: &InputSnapshot) -> u8 {
        match self.controller_type {
            ControllerType::None => DISCONNECTED,
            ControllerType::Xe1ap => self.xe_1ap.read(input),
        }
    }

    /// Present host output to the device
    pub fn write_device(&mut self, data: u8, mask: u8) {
        if self.controller_type == ControllerType::Xe1ap {
            self.xe_1ap.write(data, mask);
        }
    }

    /// Read from the data port
    ///
    /// Bits configured as outputs return the last written value, the rest
    /// come from the device. Bit 7 always reads back the latch.
    pub fn read_data(&mut self, input: &InputSnapshot) -> u8 {
        let mask = 0x80 | self.control;
        let device = self.read_device(input);
        (self.data & mask) | (device & !mask)
    }

    /// Write to the data port
    pub fn write_data(&mut self, value: u8) {
        self.data = value;
        self.write_device(value, self.control);
    }

    /// Write to the control register
    pub fn write_control(&mut self, value: u8) {
        if value != self.control {
            self.control = value;
            // Newly configured outputs drive the latched data
            self.write_device(self.data, value);
        }
    }
}

/// I/O subsystem managing both controller ports
#[derive(Debug, Serialize, Deserialize)]
pub struct Io {
    /// Controller ports 1 and 2
    pub ports: [ControllerPort; PORT_COUNT],
    /// Version register
    pub version: u8,
    /// Live input sampled by the controllers
    #[serde(skip)]
    pub input: InputSnapshot,
}

impl Io {
    /// Create a new I/O subsystem
    pub fn new() -> Self {
        Self::with_config(&IoConfig::default())
    }

    /// Create an I/O subsystem with the given port setup
    pub fn with_config(config: &IoConfig) -> Self {
        Self {
            ports: [
                ControllerPort::new(0, config.port1),
                ControllerPort::new(1, config.port2),
            ],
            version: config.version,
            input: InputSnapshot::new(),
        }
    }

    /// Reset all ports
    pub fn reset(&mut self) {
        let Self { ports, input, .. } = self;
        for port in ports.iter_mut() {
            port.reset(input);
        }
    }

    /// Reset a single controller (port 0 or 1)
    pub fn reset_port(&mut self, port: usize) {
        let Self { ports, input, .. } = self;
        match ports.get_mut(port) {
            Some(p) => p.reset(input),
            None => log::warn!("reset of invalid controller port {}", port),
        }
    }

    /// Read a controller directly, bypassing the data/control registers
    pub fn read_port(&mut self, port: usize) -> u8 {
        let Self { ports, input, .. } = self;
        match ports.get_mut(port) {
            Some(p) => p.read_device(input),
            None => {
                log::warn!("read of invalid controller port {}", port);
                0xFF
            }
        }
    }

    /// Write a controller directly with an explicit output mask
    ///
    /// The masked bits also update the data latch, so a later control
    /// register change presents the same value to the device.
    pub fn write_port(&mut self, port: usize, data: u8, mask: u8) {
        match self.ports.get_mut(port) {
            Some(p) => {
                p.data = (p.data & !mask) | (data & mask);
                p.write_device(data, mask);
            }
            None => log::warn!("write of invalid controller port {}", port),
        }
    }

    /// Read from an I/O address
    pub fn read(&mut self, address: u32) -> u8 {
        let Self {
            ports,
            version,
            input,
        } = self;
        match address & 0x1F {
            0x01 => *version,
            0x03 => ports[0].read_data(input),
            0x05 => ports[1].read_data(input),
            0x09 => ports[0].control,
            0x0B => ports[1].control,
            _ => 0xFF,
        }
    }

    /// Write to an I/O address
    pub fn write(&mut self, address: u32, value: u8) {
        match address & 0x1F {
            0x03 => self.ports[0].write_data(value),
            0x05 => self.ports[1].write_data(value),
            0x09 => self.ports[0].write_control(value),
            0x0B => self.ports[1].write_control(value),
            _ => {}
        }
    }

    /// Set controller type for a port
    pub fn set_controller_type(&mut self, port: usize, controller_type: ControllerType) {
        if let Some(p) = self.ports.get_mut(port) {
            p.controller_type = controller_type;
        }
    }

    /// Get mutable access to the input sampled by the controllers
    pub fn controller_input(&mut self) -> &mut InputSnapshot {
        &mut self.input
    }
}

impl Default for Io {
    fn default() -> Self {
        Self::new()
    }
}

impl Debuggable for Io {
    fn read_state(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn write_state(&mut self, state: &Value) {
        let mut new_io: Io = match serde_json::from_value(state.clone()) {
            Ok(io) => io,
            Err(e) => {
                log::warn!("Error deserializing I/O state: {}", e);
                return;
            }
        };

        // Live input is owned by the frontend, not the saved state
        new_io.input = self.input;
        *self = new_io;
    }
}
