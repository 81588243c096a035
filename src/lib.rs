//! XE-1AP - Analog controller port emulation for the Sega Mega Drive/Genesis
//!
//! This library provides the controller ports and the XE-1AP protocol state
//! machine, driven by host reads and writes of the I/O area.

pub mod config;
pub mod debugger;
pub mod input;
pub mod io;

pub use config::IoConfig;
pub use input::InputSnapshot;
pub use io::{Io, Xe1ap, Xe1apFrame};
