//! Command codes and device address understood by the amplifier.

use std::fmt;

/// Address of the amplifier on the protocol
pub const ADDRESS: u8 = 48;

/// Number of significant bits in a command code
pub const COMMAND_BITS: u32 = 7;

/// Number of bits in the device address
pub const ADDRESS_BITS: u32 = 8;

/// Remote control command. Only the lower 7 bits are transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    VolumeUp = 18,
    VolumeDown = 19,
    Power = 21,
    Video1 = 34,
    Sc = 66,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::VolumeUp,
        Command::VolumeDown,
        Command::Power,
        Command::Video1,
        Command::Sc,
    ];

    /// The code sent on the wire
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Command::VolumeUp => "volume-up",
            Command::VolumeDown => "volume-down",
            Command::Power => "power",
            Command::Video1 => "video-1",
            Command::Sc => "sc",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

#[test]
fn codes_fit_in_command_bits() {
    for cmd in Command::ALL {
        assert!(u32::from(cmd.code()) < (1 << COMMAND_BITS), "{cmd}");
    }

    assert_eq!(Command::VolumeUp.code(), 18);
    assert_eq!(Command::VolumeDown.code(), 19);
    assert_eq!(Command::Power.code(), 21);
    assert_eq!(format!("{}", Command::Power), "power (21)");
}
