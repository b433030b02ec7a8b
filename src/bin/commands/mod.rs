pub mod send;
pub mod sniff;

#[cfg(target_os = "linux")]
use ampir::{config::Config, gpio::Gpio};

#[cfg(target_os = "linux")]
pub fn open_chip(config: &Config) -> Result<Gpio, String> {
    Gpio::open(&config.chip, &config.consumer).map_err(|e| format!("open chip failed: {e}"))
}
