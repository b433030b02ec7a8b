//! Digital lines the remote is wired to. The hardware implementation lives
//! in [`crate::gpio`]; the [`Recorder`] stands in for it when nothing should
//! be driven.

use crate::encode::{Message, Phase};
use std::{io, thread, time::Duration};

/// Logic level of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn value(self) -> u8 {
        match self {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

impl From<u8> for Level {
    fn from(value: u8) -> Self {
        if value == 0 {
            Level::Low
        } else {
            Level::High
        }
    }
}

/// A line we can drive
pub trait OutputLine {
    fn set_value(&mut self, value: u8) -> io::Result<()>;

    /// Hold the current level for the given duration
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

impl<T: OutputLine + ?Sized> OutputLine for &mut T {
    fn set_value(&mut self, value: u8) -> io::Result<()> {
        (**self).set_value(value)
    }

    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// A line we can sample
pub trait InputLine {
    fn get_value(&self) -> io::Result<u8>;
}

/// Input line which always reads the same value
#[derive(Debug, Clone, Copy)]
pub struct Constant(pub u8);

impl InputLine for Constant {
    fn get_value(&self) -> io::Result<u8> {
        Ok(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Set(u8),
    Sleep(Duration),
}

/// Output line which records what would have happened rather than driving
/// anything. Sleeping returns immediately.
#[derive(Debug, Default)]
pub struct Recorder {
    events: Vec<Event>,
}

impl Recorder {
    pub fn new() -> Self {
        Recorder::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of transitions to the given level
    pub fn count_set(&self, value: u8) -> usize {
        self.events
            .iter()
            .filter(|e| **e == Event::Set(value))
            .count()
    }

    /// Fold the recorded events into the levels seen on the line. The line
    /// is assumed to start out idle (high); consecutive holds of the same
    /// level are merged.
    pub fn message(&self) -> Message {
        let mut level = Level::High;
        let mut phases: Vec<Phase> = Vec::new();

        for event in &self.events {
            match event {
                Event::Set(value) => level = Level::from(*value),
                Event::Sleep(duration) => {
                    let duration = u32::try_from(duration.as_micros()).unwrap_or(u32::MAX);

                    match phases.last_mut() {
                        Some(last) if last.level == level => {
                            last.duration = last.duration.saturating_add(duration);
                        }
                        _ => phases.push(Phase { level, duration }),
                    }
                }
            }
        }

        Message { phases }
    }
}

impl OutputLine for Recorder {
    fn set_value(&mut self, value: u8) -> io::Result<()> {
        self.events.push(Event::Set(value));
        Ok(())
    }

    fn sleep(&mut self, duration: Duration) {
        self.events.push(Event::Sleep(duration));
    }
}

#[test]
fn recorder_message() {
    let mut rec = Recorder::new();

    rec.sleep(Duration::from_micros(10));
    rec.set_value(0).unwrap();
    rec.sleep(Duration::from_micros(100));
    rec.set_value(1).unwrap();
    rec.sleep(Duration::from_micros(50));
    rec.sleep(Duration::from_micros(25));

    assert_eq!(rec.count_set(0), 1);
    assert_eq!(rec.count_set(1), 1);
    assert_eq!(rec.message().print_rawir(), "+10 -100 +75");

    rec.clear();
    assert!(rec.events().is_empty());
    assert_eq!(rec.message().print_rawir(), "");
}
