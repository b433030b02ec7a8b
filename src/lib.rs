//! Control an amplifier through its infrared remote protocol, with the IR
//! transmitter and the amplifier's power state wired to GPIO lines.
//!
//! ## Sending a command
//!
//! Commands are encoded as three repetitions of a frame, each holding a 7 bit
//! command and an 8 bit address. The encoded levels can be inspected without
//! any hardware:
//!
//! ```
//! use ampir::{encode::{encode, Timing}, protocol::{Command, ADDRESS}};
//!
//! let message = encode(Command::Power.code(), ADDRESS, &Timing::default());
//!
//! println!("rawir: {}", message.print_rawir());
//! ```
//!
//! ## Absolute volume
//!
//! The amplifier only has volume up and down commands. [`volume::Volume`]
//! remembers the last volume set and sends the right number of steps to reach
//! a new one. Here a [`line::Recorder`] stands in for the IR line, and the
//! amplifier is reported as switched on:
//!
//! ```
//! use ampir::{
//!     encode::Timing,
//!     line::{Constant, Recorder},
//!     protocol::ADDRESS,
//!     remote::Remote,
//!     volume::{FileStore, ReadOnly, Volume, VolumeChange},
//! };
//!
//! let mut remote = Remote::new(Recorder::new(), Constant(1), Timing::default(), ADDRESS);
//! let mut volume = Volume::new(ReadOnly(FileStore::new("/nonexistent")), 30, 15);
//!
//! let change = volume.set_volume(&mut remote, 18).unwrap();
//!
//! assert!(matches!(change, VolumeChange::Changed { steps: 3, .. }));
//! ```

pub mod config;
pub mod dispatch;
pub mod encode;
#[cfg(target_os = "linux")]
pub mod gpio;
pub mod line;
pub mod power;
pub mod protocol;
pub mod remote;
pub mod sched;
pub mod sniff;
pub mod volume;
