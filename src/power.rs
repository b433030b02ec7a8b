//! Power state sensing and the power toggle

use crate::line::{InputLine, OutputLine};
use crate::protocol::Command;
use crate::remote::Remote;
use log::{debug, info};
use std::io;

/// Reads the line which reports whether the amplifier is switched on
pub struct PowerGate<I: InputLine> {
    line: I,
}

impl<I: InputLine> PowerGate<I> {
    pub fn new(line: I) -> Self {
        PowerGate { line }
    }

    /// Is the device on. This is read from the line every time, never cached
    pub fn is_on(&self) -> io::Result<bool> {
        Ok(self.line.get_value()? != 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerChange {
    Toggled,
    AlreadySet,
}

/// Switch the device on or off. There is only a power toggle command, so it
/// is only sent if the device is not already in the requested state. Always
/// waits for the device to settle before returning.
pub fn set_power<O: OutputLine, I: InputLine>(
    remote: &mut Remote<O, I>,
    on: bool,
) -> io::Result<PowerChange> {
    let change = if remote.is_on()? != on {
        info!("switching device {}", if on { "on" } else { "off" });

        remote.send(Command::Power)?;

        PowerChange::Toggled
    } else {
        debug!("device already {}", if on { "on" } else { "off" });

        PowerChange::AlreadySet
    };

    remote.settle();

    Ok(change)
}
