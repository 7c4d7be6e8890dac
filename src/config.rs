//! Configuration for the demo driver.
//!
//! Configuration is loaded from multiple sources in priority order:
//! 1. Environment variables (`INFEED_BASE_ADDR`, etc.)
//! 2. Project-local config file (`./infeed-emu.toml`)
//! 3. User config file (`~/.config/infeed-emu/config.toml`)
//! 4. Built-in defaults
//!
//! Only the driver is configurable. The scan and memory geometry are
//! fixed properties of the modeled hardware and have no knobs here.
//!
//! # Config File Format
//!
//! ```toml
//! # infeed-emu.toml
//!
//! # First window address of the scan (decimal or 0x hex)
//! base_addr = 0x0000
//!
//! # Clock cycles to run
//! cycles = 2000
//!
//! # Cycles between advance pulses (1 = every cycle)
//! advance_period = 1
//!
//! # Raw byte image loaded at address 0 (a ramp pattern when unset)
//! # image = "input.bin"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// First window address of the scan.
    pub base_addr: Option<u32>,

    /// Clock cycles to run.
    pub cycles: Option<u64>,

    /// Cycles between advance pulses.
    pub advance_period: Option<u32>,

    /// Path to a raw byte image loaded at address 0.
    pub image: Option<String>,
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Project-local `infeed-emu.toml`
    /// 3. User config `~/.config/infeed-emu/config.toml`
    /// 4. Defaults
    pub fn load() -> Self {
        let mut config = Self::default();

        // User config first, so the locals can override it.
        if let Some(user_config) = Self::load_user_config() {
            config.merge(user_config);
        }

        if let Some(local_config) = Self::load_local_config() {
            config.merge(local_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Base address, defaulting to 0.
    pub fn base_addr(&self) -> u32 {
        self.base_addr.unwrap_or(0)
    }

    /// Cycles to run, defaulting to 2000.
    pub fn cycles(&self) -> u64 {
        self.cycles.unwrap_or(2000)
    }

    /// Advance cadence, defaulting to every cycle. Never below 1.
    pub fn advance_period(&self) -> u32 {
        self.advance_period.unwrap_or(1).max(1)
    }

    /// Image path, if one was configured.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Load user configuration from `~/.config/infeed-emu/config.toml`.
    fn load_user_config() -> Option<Self> {
        let config_dir = dirs::config_dir()?;
        let config_path = config_dir.join("infeed-emu").join("config.toml");
        Self::load_from_file(&config_path)
    }

    /// Load project-local configuration from `./infeed-emu.toml`.
    fn load_local_config() -> Option<Self> {
        let local_path = Path::new("infeed-emu.toml");
        if let Some(config) = Self::load_from_file(local_path) {
            return Some(config);
        }

        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let project_path = Path::new(&manifest_dir).join("infeed-emu.toml");
            if let Some(config) = Self::load_from_file(&project_path) {
                return Some(config);
            }
        }

        None
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Merge another config into this one.
    /// Only overrides fields that are Some in the other config.
    fn merge(&mut self, other: Self) {
        if other.base_addr.is_some() {
            self.base_addr = other.base_addr;
        }
        if other.cycles.is_some() {
            self.cycles = other.cycles;
        }
        if other.advance_period.is_some() {
            self.advance_period = other.advance_period;
        }
        if other.image.is_some() {
            self.image = other.image;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("INFEED_BASE_ADDR") {
            match parse_int(&value) {
                Some(addr) => self.base_addr = Some(addr as u32),
                None => log::warn!("Ignoring unparsable INFEED_BASE_ADDR: {}", value),
            }
        }
        if let Ok(value) = std::env::var("INFEED_CYCLES") {
            match parse_int(&value) {
                Some(cycles) => self.cycles = Some(cycles),
                None => log::warn!("Ignoring unparsable INFEED_CYCLES: {}", value),
            }
        }
        if let Ok(value) = std::env::var("INFEED_ADVANCE_PERIOD") {
            match parse_int(&value) {
                Some(period) => self.advance_period = Some(period as u32),
                None => log::warn!("Ignoring unparsable INFEED_ADVANCE_PERIOD: {}", value),
            }
        }
        if let Ok(path) = std::env::var("INFEED_IMAGE") {
            self.image = Some(path);
        }
    }

    /// Path of the user config file (for display in help text).
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("infeed-emu").join("config.toml"))
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal integer.
pub fn parse_int(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accessors() {
        let config = Config::default();
        assert_eq!(config.base_addr(), 0);
        assert_eq!(config.cycles(), 2000);
        assert_eq!(config.advance_period(), 1);
        assert!(config.image().is_none());
    }

    #[test]
    fn test_advance_period_clamped_to_one() {
        let config = Config {
            advance_period: Some(0),
            ..Default::default()
        };
        assert_eq!(config.advance_period(), 1);
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config {
            base_addr: Some(0x100),
            cycles: None,
            advance_period: Some(2),
            image: None,
        };

        let overlay = Config {
            base_addr: None,
            cycles: Some(500),
            advance_period: Some(4),
            image: Some("frame.bin".to_string()),
        };

        base.merge(overlay);

        // base_addr unchanged (overlay was None).
        assert_eq!(base.base_addr, Some(0x100));
        // cycles set from overlay.
        assert_eq!(base.cycles, Some(500));
        // advance_period overridden by overlay.
        assert_eq!(base.advance_period, Some(4));
        assert_eq!(base.image, Some("frame.bin".to_string()));
    }

    #[test]
    fn test_toml_parse_with_hex_literal() {
        let text = "base_addr = 0x1234\ncycles = 100\n";
        let config: Config = toml::from_str(text).expect("config should parse");
        assert_eq!(config.base_addr, Some(0x1234));
        assert_eq!(config.cycles, Some(100));
        assert_eq!(config.advance_period, None);
    }

    #[test]
    fn test_parse_int_forms() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("0x2e"), Some(0x2E));
        assert_eq!(parse_int("0X10"), Some(0x10));
        assert_eq!(parse_int(" 7 "), Some(7));
        assert_eq!(parse_int("banana"), None);
        assert_eq!(parse_int("0x"), None);
    }
}
