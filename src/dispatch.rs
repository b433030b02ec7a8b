//! Map command names and their argument to volume and power changes

use crate::line::{InputLine, OutputLine};
use crate::power::{set_power, PowerChange};
use crate::remote::Remote;
use crate::volume::{Volume, VolumeChange, VolumeStore};
use log::{debug, info};
use std::{fmt, io};

/// Lowest volume of the shairport-sync scale. Its loudest is 0.
pub const SHAIRPORT_MIN: f32 = -30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Set absolute volume
    Volume(i64),
    /// Switch on or off
    Power(bool),
    /// Volume from shairport-sync, and what it converts to
    ShairportVolume { volume: f32, raw: i64 },
}

impl Action {
    /// Parse the command name. Unknown names, and values which are not
    /// finite, give `None`.
    pub fn parse(name: &str, value: f32, max_volume: u8) -> Option<Action> {
        if !value.is_finite() {
            return None;
        }

        match name {
            "vol" => Some(Action::Volume(value as i64)),
            "power" => Some(Action::Power(value as i64 != 0)),
            "shair_vol" => Some(Action::ShairportVolume {
                volume: value,
                raw: shairport_volume(value, max_volume),
            }),
            _ => None,
        }
    }
}

/// Parse a command argument. `NaN` and infinities are refused, since they
/// would silently convert to 0 or saturate.
pub fn parse_value(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|e| format!("{e}"))?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("‘{s}’ is not a finite number"))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Volume(v) => write!(f, "set volume to: {v}"),
            Action::Power(on) => write!(f, "power: {}", u8::from(*on)),
            Action::ShairportVolume { volume, raw } => {
                write!(f, "shairport-sync volume: {volume}, {raw}")
            }
        }
    }
}

/// Convert shairport-sync's -30 (mute) to 0 (loudest) scale to 0 to
/// `max_volume`. Only the lower end is clamped; anything above 0 converts to
/// more than `max_volume`, which setting the volume refuses.
pub fn shairport_volume(value: f32, max_volume: u8) -> i64 {
    let raw = ((value - SHAIRPORT_MIN) * f32::from(max_volume) / -SHAIRPORT_MIN) as i64;

    raw.max(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Volume(VolumeChange),
    Power(PowerChange),
}

pub fn dispatch<O: OutputLine, I: InputLine, S: VolumeStore>(
    remote: &mut Remote<O, I>,
    volume: &mut Volume<S>,
    action: Action,
) -> io::Result<Outcome> {
    info!("{action}");

    let outcome = match action {
        Action::Volume(v) | Action::ShairportVolume { raw: v, .. } => {
            Outcome::Volume(volume.set_volume(remote, v)?)
        }
        Action::Power(on) => Outcome::Power(set_power(remote, on)?),
    };

    debug!("{outcome:?}");

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::Timing;
    use crate::line::{Constant, Recorder};
    use crate::protocol::{Command, ADDRESS};
    use crate::volume::FileStore;

    #[test]
    fn shairport() {
        assert_eq!(shairport_volume(0.0, 30), 30);
        assert_eq!(shairport_volume(-30.0, 30), 0);
        assert_eq!(shairport_volume(-15.0, 30), 15);
        assert_eq!(shairport_volume(-14.5, 30), 15);
        assert_eq!(shairport_volume(-144.0, 30), 0);
        assert_eq!(shairport_volume(-31.0, 30), 0);
        // not clamped at the top
        assert_eq!(shairport_volume(3.0, 30), 33);
        assert_eq!(shairport_volume(-15.0, 60), 30);
    }

    #[test]
    fn parse() {
        assert_eq!(Action::parse("vol", 12.9, 30), Some(Action::Volume(12)));
        assert_eq!(Action::parse("vol", -0.5, 30), Some(Action::Volume(0)));
        assert_eq!(Action::parse("power", 1.0, 30), Some(Action::Power(true)));
        assert_eq!(Action::parse("power", 0.0, 30), Some(Action::Power(false)));
        assert_eq!(Action::parse("power", 0.7, 30), Some(Action::Power(false)));
        assert_eq!(Action::parse("power", -2.0, 30), Some(Action::Power(true)));
        assert_eq!(
            Action::parse("shair_vol", -15.0, 30),
            Some(Action::ShairportVolume {
                volume: -15.0,
                raw: 15
            })
        );
        assert_eq!(Action::parse("mute", 1.0, 30), None);
        assert_eq!(Action::parse("VOL", 1.0, 30), None);
    }

    #[test]
    fn non_finite() {
        assert_eq!(parse_value("-15"), Ok(-15.0));
        assert_eq!(parse_value("12.5"), Ok(12.5));
        assert_eq!(
            parse_value("NaN"),
            Err("‘NaN’ is not a finite number".to_string())
        );
        assert!(parse_value("inf").is_err());
        assert!(parse_value("-infinity").is_err());
        assert!(parse_value("loud").is_err());

        for name in ["vol", "power", "shair_vol"] {
            assert_eq!(Action::parse(name, f32::NAN, 30), None);
            assert_eq!(Action::parse(name, f32::INFINITY, 30), None);
            assert_eq!(Action::parse(name, f32::NEG_INFINITY, 30), None);
        }
    }

    #[test]
    fn display() {
        assert_eq!(Action::Volume(12).to_string(), "set volume to: 12");
        assert_eq!(Action::Power(true).to_string(), "power: 1");
        assert_eq!(
            Action::ShairportVolume {
                volume: -15.5,
                raw: 14
            }
            .to_string(),
            "shairport-sync volume: -15.5, 14"
        );
    }

    #[test]
    fn dispatch_actions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("volume.txt");

        let mut remote = Remote::new(Recorder::new(), Constant(1), Timing::default(), ADDRESS);
        let mut volume = Volume::new(FileStore::new(&path), 30, 15);

        assert_eq!(
            dispatch(&mut remote, &mut volume, Action::Volume(10)).unwrap(),
            Outcome::Volume(VolumeChange::Changed {
                command: Command::VolumeDown,
                steps: 5
            })
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "10");

        let action = Action::parse("shair_vol", 0.0, volume.max_volume()).unwrap();
        assert_eq!(
            dispatch(&mut remote, &mut volume, action).unwrap(),
            Outcome::Volume(VolumeChange::Changed {
                command: Command::VolumeUp,
                steps: 20
            })
        );

        // overshoot is dropped, not clamped
        let action = Action::parse("shair_vol", 1.0, volume.max_volume()).unwrap();
        assert_eq!(
            dispatch(&mut remote, &mut volume, action).unwrap(),
            Outcome::Volume(VolumeChange::OutOfRange)
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "30");

        assert_eq!(
            dispatch(&mut remote, &mut volume, Action::Power(true)).unwrap(),
            Outcome::Power(PowerChange::AlreadySet)
        );
        assert_eq!(
            dispatch(&mut remote, &mut volume, Action::Power(false)).unwrap(),
            Outcome::Power(PowerChange::Toggled)
        );
    }
}
