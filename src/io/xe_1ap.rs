//! XE-1AP Analog Controller
//!
//! The XE-1AP streams its state as a sequence of 4-bit nibbles on D0-D3.
//! The host drives TH to restart or advance the stream and polls TL/TR to
//! tell the nibbles apart.
//!
//! ## Acquisition Sequence
//!
//! A frame is five sequences of eight internal cycles. The first four
//! cycles of a sequence return one nibble, the next four the next nibble:
//!
//! | Sequence | Cycles 0-3           | Cycles 4-7        |
//! |:---------|:---------------------|:------------------|
//! | 0        | E1 E2 Start Select   | A B C D           |
//! | 1        | X (high)             | Y (high)          |
//! | 2        | 0                    | Z (high)          |
//! | 3        | X (low)              | Y (low)           |
//! | 4        | 0                    | Z (low)           |
//!
//! ## Read Value
//!
//! | Bit | Meaning                                          |
//! |:----|:-------------------------------------------------|
//! | 0-3 | Data nibble (buttons active low)                 |
//! | 4   | TL: 0 = first nibble, 1 = second nibble          |
//! | 5   | TR: 1 on the first read of a nibble, 0 after     |
//! | 6   | Always 1                                         |

use crate::input::{buttons, InputSnapshot, AXIS_CENTER};
use serde::{Deserialize, Serialize};

/// TH line (bit 6)
pub const TH: u8 = 0x40;
/// TL status bit
pub const TL: u8 = 0x10;
/// TR status bit
pub const TR: u8 = 0x20;

/// Reads the host must issue after a TH falling edge before a write advances
/// the sequence
const LATENCY_THRESHOLD: u32 = 3;

/// Start of the last acquisition sequence (5 sequences of 8 cycles)
const MAX_SEQUENCE: u8 = 32;

/// Nibbles in a complete acquisition frame
pub const FRAME_NIBBLES: usize = 10;

/// Redundant reads returning the same nibble
pub const READS_PER_NIBBLE: usize = 4;

/// Reads in a complete acquisition frame
pub const FRAME_READS: usize = FRAME_NIBBLES * READS_PER_NIBBLE;

/// One read from the controller, before packing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortData {
    /// Data nibble (D0-D3)
    pub nibble: u8,
    /// Second half of the current sequence
    pub tl: bool,
    /// First read of the current nibble
    pub not_ready: bool,
    /// Idle marker carried on bit 6
    pub idle: bool,
}

impl PortData {
    /// Pack into the byte seen on the data port
    pub fn to_byte(self) -> u8 {
        let mut data = self.nibble & 0x0F;
        if self.tl {
            data |= TL;
        }
        if self.not_ready {
            data |= TR;
        }
        if self.idle {
            data |= TH;
        }
        data
    }
}

/// Protocol state for one XE-1AP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Xe1ap {
    /// Last value written by the host (bit 6 = TH)
    state: u8,
    /// Sequence start (multiple of 8) plus internal cycle (0-7)
    counter: u8,
    /// Reads since the last TH falling edge
    latency: u32,
    /// First input slot owned by this controller
    slot: usize,
}

impl Xe1ap {
    /// Create the controller for a physical port (0 or 1)
    pub fn new(port: usize) -> Self {
        Self {
            state: TH,
            counter: 0,
            latency: 0,
            slot: InputSnapshot::port_slot(port),
        }
    }

    /// Reset protocol state and centre the sticks
    pub fn reset(&mut self, input: &mut InputSnapshot) {
        if let Some(stick) = input.analog.get_mut(self.slot) {
            stick[0] = AXIS_CENTER;
            stick[1] = AXIS_CENTER;
        }
        // The right stick lives in the next slot
        if let Some(throttle) = input.analog.get_mut(self.slot + 1) {
            throttle[0] = AXIS_CENTER;
        }

        self.state = TH;
        self.counter = 0;
        self.latency = 0;
    }

    /// Last value written by the host
    pub fn state(&self) -> u8 {
        self.state
    }

    /// Current position in the frame (sequence start + internal cycle)
    pub fn cycle(&self) -> u8 {
        self.counter
    }

    /// Reads since the last TH falling edge
    pub fn latency(&self) -> u32 {
        self.latency
    }

    /// Compute the current read value without advancing
    pub fn sample(&self, input: &InputSnapshot) -> PortData {
        let [x, y] = input
            .analog
            .get(self.slot)
            .copied()
            .unwrap_or([AXIS_CENTER; 2]);
        let z = input.analog.get(self.slot + 1).map_or(AXIS_CENTER, |a| a[0]);

        // Buttons are reported active low
        let pad = !input.pad.get(self.slot).copied().unwrap_or(0);

        let cycle = self.counter & 7;

        let nibble = match self.counter >> 2 {
            0 => (pad >> 8) as u8, // E1 E2 Start Select
            1 => (pad >> 4) as u8, // A B C D
            2 => x >> 4,
            3 => y >> 4,
            4 => 0,
            5 => z >> 4,
            6 => x,
            7 => y,
            8 => 0,
            9 => z,
            _ => 0,
        } & 0x0F;

        PortData {
            nibble,
            tl: cycle & 4 != 0,
            // Some input routines wait for TR to toggle, so it is only
            // raised on the first read of each nibble
            not_ready: cycle & 3 == 0,
            idle: true,
        }
    }

    /// Read the data port, stepping to the next internal cycle
    pub fn read(&mut self, input: &InputSnapshot) -> u8 {
        let data = self.sample(input);

        let cycle = (self.counter + 1) & 7;
        self.counter = (self.counter & !7) | cycle;
        self.latency = self.latency.saturating_add(1);

        data.to_byte()
    }

    /// Write the data port. Only bits set in `mask` are driven by the host.
    pub fn write(&mut self, data: u8, mask: u8) {
        let data = (self.state & !mask) | (data & mask);

        if data & TH == 0 && self.state & TH != 0 {
            // TH 1->0 restarts acquisition
            log::trace!("XE-1AP slot {}: frame reset", self.slot);
            self.counter = 0;
            self.latency = 0;
        } else if self.latency > LATENCY_THRESHOLD {
            self.counter = ((self.counter & !7) + 8).min(MAX_SEQUENCE);
            log::trace!(
                "XE-1AP slot {}: sequence {}",
                self.slot,
                self.counter >> 3
            );
        } else {
            // Written before the first sequence was read
            log::trace!(
                "XE-1AP slot {}: early TH write ignored (latency {})",
                self.slot,
                self.latency
            );
        }

        self.state = data;
    }
}

/// One decoded acquisition frame, as a host input routine sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Xe1apFrame {
    /// Pressed buttons (active high, see [`buttons`])
    pub buttons: u16,
    /// Left stick X
    pub x: u8,
    /// Left stick Y
    pub y: u8,
    /// Right stick (unidirectional)
    pub z: u8,
}

impl Xe1apFrame {
    /// Assemble a frame from the ten nibbles in transfer order
    pub fn from_nibbles(nibbles: [u8; FRAME_NIBBLES]) -> Self {
        let n = nibbles.map(|v| v & 0x0F);
        let released = ((n[0] as u16) << 8) | ((n[1] as u16) << 4);

        Self {
            buttons: !released & buttons::ALL,
            x: (n[2] << 4) | n[6],
            y: (n[3] << 4) | n[7],
            z: (n[5] << 4) | n[9],
        }
    }

    /// Assemble a frame from the raw reads of a whole acquisition
    pub fn from_reads(reads: &[u8]) -> Option<Self> {
        if reads.len() != FRAME_READS {
            return None;
        }

        let mut nibbles = [0u8; FRAME_NIBBLES];
        for (nibble, chunk) in nibbles.iter_mut().zip(reads.chunks(READS_PER_NIBBLE)) {
            *nibble = chunk[0] & 0x0F;
        }
        Some(Self::from_nibbles(nibbles))
    }
}
