//! Port Configuration
//!
//! Selects what is plugged into each controller port and the region
//! reported by the version register. Stored as JSON.

use crate::io::ControllerType;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Maximum config size in bytes (64KB)
const MAX_CONFIG_SIZE: u64 = 64 * 1024;

/// Controller port setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Device on controller port 1
    pub port1: ControllerType,
    /// Device on controller port 2
    pub port2: ControllerType,
    /// Version register (0xA0 = overseas, 0x00 = Japan)
    pub version: u8,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            port1: ControllerType::Xe1ap,
            port2: ControllerType::Xe1ap,
            version: 0xA0,
        }
    }
}

impl IoConfig {
    /// Load a config from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let file = File::open(path).map_err(|e| format!("Failed to open config: {}", e))?;

        let mut buffer = Vec::new();
        file.take(MAX_CONFIG_SIZE + 1)
            .read_to_end(&mut buffer)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        if buffer.len() as u64 > MAX_CONFIG_SIZE {
            return Err(format!("Config too large: exceeds {} bytes", MAX_CONFIG_SIZE));
        }

        Self::parse(&buffer)
    }

    /// Parse a config from JSON
    pub fn parse(content: &[u8]) -> Result<Self, String> {
        serde_json::from_slice(content).map_err(|e| format!("Invalid config: {}", e))
    }

    /// Load a config, falling back to defaults if it is missing or invalid
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::debug!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save config to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write config: {}", e))
    }
}
