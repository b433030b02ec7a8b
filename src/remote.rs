//! The amplifier, reached through its IR line and power state line

use crate::encode::{Timing, Transmitter};
use crate::line::{InputLine, OutputLine};
use crate::power::PowerGate;
use crate::protocol::Command;
use log::debug;
use std::io;

/// The amplifier as seen from here: the IR line to send commands on and the
/// line telling us whether it is on.
pub struct Remote<O: OutputLine, I: InputLine> {
    transmitter: Transmitter<O>,
    gate: PowerGate<I>,
    address: u8,
}

impl<O: OutputLine, I: InputLine> Remote<O, I> {
    pub fn new(output: O, power_state: I, timing: Timing, address: u8) -> Self {
        Remote {
            transmitter: Transmitter::new(output, timing),
            gate: PowerGate::new(power_state),
            address,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn timing(&self) -> &Timing {
        self.transmitter.timing()
    }

    pub fn is_on(&self) -> io::Result<bool> {
        self.gate.is_on()
    }

    /// Send one frame for the command
    pub fn send(&mut self, command: Command) -> io::Result<()> {
        debug!("sending {command} to address {}", self.address);

        self.transmitter.transmit(command.code(), self.address)
    }

    /// Silence between repeated commands, long enough for the receiver not
    /// to take them as a held button
    pub fn pause(&mut self) {
        let repeat = std::time::Duration::from_micros(self.timing().repeat.into());

        self.transmitter.pause(repeat);
    }

    /// Wait for the power rail and power state line to settle
    pub fn settle(&mut self) {
        let settle = self.timing().settle;

        self.transmitter.pause(settle);
    }

    pub fn line(&self) -> &O {
        self.transmitter.line()
    }

    /// Give back the IR line, e.g. to release it
    pub fn into_line(self) -> O {
        self.transmitter.into_line()
    }
}
