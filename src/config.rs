//! Configuration file. Every setting is optional; the defaults match how the
//! remote was first wired up.
//!
//! ```toml
//! chip = "gpiochip0"
//! ir_line = 34
//! power_state_line = 132
//! volume_file = "/home/chip/ir/volume.txt"
//!
//! [timing]
//! offset = 53
//! settle = "5s"
//! ```

use crate::encode::Timing;
use crate::protocol::ADDRESS;
use crate::sniff;
use serde::{Deserialize, Deserializer};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Read when no configuration file is given, if it exists
pub const DEFAULT_PATH: &str = "/etc/ampir.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// GPIO chip name in /dev, or path to it
    pub chip: String,
    /// Line offset of the IR output
    pub ir_line: u32,
    /// Line offset of the power state input
    pub power_state_line: u32,
    /// Consumer label for requested lines
    pub consumer: String,
    pub volume_file: PathBuf,
    pub max_volume: u8,
    pub default_volume: u8,
    pub address: u8,
    /// SCHED_FIFO priority, 0 to leave scheduling alone
    pub realtime_priority: i32,
    pub sniff_samples: usize,
    pub timing: TimingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chip: "gpiochip0".into(),
            ir_line: 34,
            power_state_line: 132,
            consumer: "IR".into(),
            volume_file: PathBuf::from("/home/chip/ir/volume.txt"),
            max_volume: 30,
            default_volume: 15,
            address: ADDRESS,
            realtime_priority: 99,
            sniff_samples: sniff::SAMPLES,
            timing: TimingConfig::default(),
        }
    }
}

/// Nominal protocol timing in microseconds. `offset` is the time it takes to
/// toggle the line, and is taken off the lead-in, burst and bit spaces.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub offset: u32,
    pub lead: u32,
    pub burst: u32,
    pub zero: u32,
    pub one: u32,
    pub end: u32,
    pub repeat: u32,
    #[serde(deserialize_with = "duration")]
    pub settle: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            offset: 53,
            lead: 2400,
            burst: 600,
            zero: 600,
            one: 1200,
            end: 20000,
            repeat: 70000,
            settle: Duration::from_secs(5),
        }
    }
}

fn duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let s = String::deserialize(deserializer)?;

    humantime::parse_duration(&s).map_err(serde::de::Error::custom)
}

impl TimingConfig {
    /// Apply the offset and check the result is usable
    pub fn timing(&self) -> Result<Timing, String> {
        let corrected = |name: &str, value: u32| {
            value.checked_sub(self.offset).ok_or_else(|| {
                format!("offset {}µs larger than {name} {value}µs", self.offset)
            })
        };

        let timing = Timing {
            lead: corrected("lead", self.lead)?,
            burst: corrected("burst", self.burst)?,
            zero: corrected("zero", self.zero)?,
            one: corrected("one", self.one)?,
            end: self.end,
            repeat: self.repeat,
            settle: self.settle,
        };

        timing.validate()?;

        Ok(timing)
    }
}

impl Config {
    pub fn parse(s: &str) -> Result<Config, String> {
        let config: Config = toml::from_str(s).map_err(|e| e.to_string())?;

        config.validate()?;

        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Config, String> {
        let s = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;

        Config::parse(&s).map_err(|e| format!("{}: {e}", path.display()))
    }

    /// Load the given file, or the default file if it exists, or use the
    /// built-in defaults
    pub fn find(path: Option<&Path>) -> Result<Config, String> {
        match path {
            Some(path) => Config::load(path),
            None => {
                let path = Path::new(DEFAULT_PATH);

                if path.exists() {
                    Config::load(path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.default_volume > self.max_volume {
            return Err(format!(
                "default volume {} exceeds maximum volume {}",
                self.default_volume, self.max_volume
            ));
        }

        self.timing.timing()?;

        Ok(())
    }
}
