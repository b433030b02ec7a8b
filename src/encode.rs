//! Encode commands into line levels and play them out on the IR line.
//!
//! A frame is sent three times. Each repetition starts with a long low lead-in
//! followed by a burst, then the 7 command bits and the 8 address bits, least
//! significant bit first. Every bit is a low space followed by a burst; the
//! length of the space tells a 0 from a 1. The line is held high between
//! repetitions.

use crate::line::{Level, OutputLine};
use crate::protocol::{ADDRESS_BITS, COMMAND_BITS};
use itertools::Itertools;
use log::trace;
use std::{io, time::Duration};

/// Number of times a frame is repeated per transmission
pub const REPETITIONS: usize = 3;

/// Durations of the protocol phases in microseconds, after correcting for
/// the latency of toggling the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timing {
    pub lead: u32,
    pub burst: u32,
    pub zero: u32,
    pub one: u32,
    /// Silence after each repetition
    pub end: u32,
    /// Silence between repeated transmissions of a command
    pub repeat: u32,
    /// Time for the amplifier to settle after a power command
    pub settle: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            lead: 2400 - 53,
            burst: 600 - 53,
            zero: 600 - 53,
            one: 1200 - 53,
            end: 20000,
            repeat: 70000,
            settle: Duration::from_secs(5),
        }
    }
}

impl Timing {
    /// Check the phases can be told apart by the receiver
    pub fn validate(&self) -> Result<(), String> {
        if self.burst == 0 {
            return Err("burst must be longer than 0µs".into());
        }
        if self.zero < self.burst {
            return Err(format!(
                "zero space {}µs shorter than burst {}µs",
                self.zero, self.burst
            ));
        }
        if self.one <= self.zero {
            return Err(format!(
                "one space {}µs must be longer than zero space {}µs",
                self.one, self.zero
            ));
        }
        if self.lead <= self.one {
            return Err(format!(
                "lead-in {}µs must be longer than one space {}µs",
                self.lead, self.one
            ));
        }
        if self.end <= self.lead {
            return Err(format!(
                "end of frame {}µs must be longer than lead-in {}µs",
                self.end, self.lead
            ));
        }
        if self.repeat < self.end {
            return Err(format!(
                "repeat gap {}µs shorter than end of frame {}µs",
                self.repeat, self.end
            ));
        }

        Ok(())
    }
}

/// A single period where the line is held at one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub level: Level,
    /// Length in microseconds
    pub duration: u32,
}

/// Encoded levels for the IR line
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Message {
    pub phases: Vec<Phase>,
}

impl Message {
    pub fn new() -> Self {
        Message::default()
    }

    fn push(&mut self, level: Level, duration: u32) {
        self.phases.push(Phase { level, duration });
    }

    /// Total time it takes to play the message
    pub fn duration(&self) -> Duration {
        self.phases
            .iter()
            .map(|p| Duration::from_micros(p.duration.into()))
            .sum()
    }

    /// Print the levels as raw ir, `-` for low and `+` for high, e.g.
    /// `-2347 +547 -1147 +547`
    pub fn print_rawir(&self) -> String {
        self.phases
            .iter()
            .map(|p| match p.level {
                Level::Low => format!("-{}", p.duration),
                Level::High => format!("+{}", p.duration),
            })
            .join(" ")
    }
}

/// Encode a full frame (all repetitions) for the command and address
pub fn encode(command: u8, address: u8, timing: &Timing) -> Message {
    let mut message = Message::new();

    for _ in 0..REPETITIONS {
        message.push(Level::Low, timing.lead);
        message.push(Level::High, timing.burst);

        encode_bits(&mut message, command, COMMAND_BITS, timing);
        encode_bits(&mut message, address, ADDRESS_BITS, timing);

        message.push(Level::High, timing.end);
    }

    message
}

fn encode_bits(message: &mut Message, value: u8, bits: u32, timing: &Timing) {
    for bit in 0..bits {
        let space = if value & (1 << bit) != 0 {
            timing.one
        } else {
            timing.zero
        };

        message.push(Level::Low, space);
        message.push(Level::High, timing.burst);
    }
}

/// Owns the IR line and plays encoded frames on it
pub struct Transmitter<O: OutputLine> {
    line: O,
    timing: Timing,
    level: Level,
}

impl<O: OutputLine> Transmitter<O> {
    /// The line must already be idle (high)
    pub fn new(line: O, timing: Timing) -> Self {
        Transmitter {
            line,
            timing,
            level: Level::High,
        }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn line(&self) -> &O {
        &self.line
    }

    pub fn into_line(self) -> O {
        self.line
    }

    /// Send the frame for the command and address. Blocks until the whole
    /// frame has been played.
    pub fn transmit(&mut self, command: u8, address: u8) -> io::Result<()> {
        let message = encode(command, address, &self.timing);

        trace!("rawir: {}", message.print_rawir());

        self.play(&message)
    }

    /// Play out the levels, only touching the line when the level changes
    pub fn play(&mut self, message: &Message) -> io::Result<()> {
        for phase in &message.phases {
            if phase.level != self.level {
                self.line.set_value(phase.level.value())?;
                self.level = phase.level;
            }

            self.line.sleep(Duration::from_micros(phase.duration.into()));
        }

        Ok(())
    }

    /// Keep the line idle for a while
    pub fn pause(&mut self, duration: Duration) {
        self.line.sleep(duration);
    }
}
