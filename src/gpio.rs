//! Lines on a Linux GPIO character device

use crate::line::{InputLine, OutputLine};
use gpio_cdev::{Chip, Line, LineHandle, LineRequestFlags};
use std::{
    fmt, io,
    path::{Path, PathBuf},
};

fn gpio_error(context: impl fmt::Display, err: impl fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{context}: {err}"))
}

/// Opened GPIO chip
pub struct Gpio {
    chip: Chip,
    path: PathBuf,
    consumer: String,
}

impl Gpio {
    /// Open chip by name (e.g. `gpiochip0`) or by path
    pub fn open(chip: &str, consumer: &str) -> io::Result<Gpio> {
        let path = if chip.contains('/') {
            PathBuf::from(chip)
        } else {
            Path::new("/dev").join(chip)
        };

        let chip = Chip::new(&path).map_err(|e| gpio_error(path.display(), e))?;

        Ok(Gpio {
            chip,
            path,
            consumer: consumer.to_owned(),
        })
    }

    fn line(&mut self, offset: u32) -> io::Result<Line> {
        self.chip
            .get_line(offset)
            .map_err(|e| gpio_error(format!("{}: line {offset}", self.path.display()), e))
    }

    /// Request the line as output, initially driven high
    pub fn output(&mut self, offset: u32) -> io::Result<GpioOutput> {
        let line = self.line(offset)?;

        let handle = line
            .request(LineRequestFlags::OUTPUT, 1, &self.consumer)
            .map_err(|e| gpio_error(format!("{}: line {offset}", self.path.display()), e))?;

        Ok(GpioOutput {
            line,
            handle,
            consumer: self.consumer.clone(),
        })
    }

    pub fn input(&mut self, offset: u32) -> io::Result<GpioInput> {
        let line = self.line(offset)?;

        let handle = line
            .request(LineRequestFlags::INPUT, 0, &self.consumer)
            .map_err(|e| gpio_error(format!("{}: line {offset}", self.path.display()), e))?;

        Ok(GpioInput { handle })
    }
}

impl fmt::Display for Gpio {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Requested output line. The request is released when dropped.
pub struct GpioOutput {
    line: Line,
    handle: LineHandle,
    consumer: String,
}

impl GpioOutput {
    /// Release the output and request the line as input, so it is no longer
    /// driven once we exit
    pub fn park(self) -> io::Result<()> {
        let GpioOutput {
            line,
            handle,
            consumer,
        } = self;

        drop(handle);

        line.request(LineRequestFlags::INPUT, 0, &consumer)
            .map(drop)
            .map_err(|e| gpio_error(format!("line {}", line.offset()), e))
    }
}

impl OutputLine for GpioOutput {
    fn set_value(&mut self, value: u8) -> io::Result<()> {
        self.handle
            .set_value(value)
            .map_err(|e| gpio_error(format!("line {}", self.line.offset()), e))
    }
}

/// Requested input line. The request is released when dropped.
pub struct GpioInput {
    handle: LineHandle,
}

impl InputLine for GpioInput {
    fn get_value(&self) -> io::Result<u8> {
        self.handle
            .get_value()
            .map_err(|e| gpio_error(format!("line {}", self.handle.line().offset()), e))
    }
}
