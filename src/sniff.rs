//! Raw capture of the IR line, for checking the wiring and timing with
//! nothing more than a terminal.

use crate::line::InputLine;
use itertools::Itertools;
use std::io;

/// Number of samples taken by default
pub const SAMPLES: usize = 4096 * 10;

/// Wait for the line to leave idle (high), then read `samples` values as
/// fast as possible.
pub fn sniff<I: InputLine>(line: &I, samples: usize) -> io::Result<Vec<u8>> {
    while line.get_value()? == 1 {}

    (0..samples).map(|_| line.get_value()).collect()
}

/// Format samples as `v, ` with a line break after every 8 values
pub fn format_samples(samples: &[u8]) -> String {
    samples
        .chunks(8)
        .map(|chunk| {
            let mut line = chunk.iter().map(|v| format!("{v}, ")).join("");
            if chunk.len() == 8 {
                line.push('\n');
            }
            line
        })
        .join("")
}
