//! Absolute volume on top of relative volume up/down commands.
//!
//! The amplifier only understands volume up and volume down, so the last volume
//! we set is kept in a store, and moving to a new volume means sending the
//! difference as individual steps.

use crate::line::{InputLine, OutputLine};
use crate::protocol::Command;
use crate::remote::Remote;
use log::{debug, info};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Where the last volume is kept between runs
pub trait VolumeStore {
    fn load(&self) -> io::Result<u8>;

    fn save(&mut self, volume: u8) -> io::Result<()>;
}

/// Volume stored as decimal text in a file
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VolumeStore for FileStore {
    fn load(&self) -> io::Result<u8> {
        let s = fs::read_to_string(&self.path)?;
        let s = s.trim();

        s.parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: ‘{s}’: {e}", self.path.display()),
            )
        })
    }

    fn save(&mut self, volume: u8) -> io::Result<()> {
        fs::write(&self.path, volume.to_string())
    }
}

/// Store which can be read but silently ignores any writes
pub struct ReadOnly<S: VolumeStore>(pub S);

impl<S: VolumeStore> VolumeStore for ReadOnly<S> {
    fn load(&self) -> io::Result<u8> {
        self.0.load()
    }

    fn save(&mut self, volume: u8) -> io::Result<()> {
        debug!("not saving volume {volume}");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeChange {
    /// Requested volume outside of 0 to maximum volume
    OutOfRange,
    /// Already at requested volume
    Unchanged,
    /// Device is switched off so nothing was sent
    DeviceOff,
    Changed { command: Command, steps: u8 },
}

pub struct Volume<S: VolumeStore> {
    store: S,
    max_volume: u8,
    default_volume: u8,
}

impl<S: VolumeStore> Volume<S> {
    pub fn new(store: S, max_volume: u8, default_volume: u8) -> Self {
        debug_assert!(default_volume <= max_volume);

        Volume {
            store,
            max_volume,
            default_volume,
        }
    }

    pub fn max_volume(&self) -> u8 {
        self.max_volume
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Last volume set, or the default if there is none or it cannot be read
    pub fn current(&self) -> u8 {
        match self.store.load() {
            Ok(volume) if volume <= self.max_volume => volume,
            Ok(volume) => {
                debug!(
                    "stored volume {volume} exceeds maximum {}, assuming {}",
                    self.max_volume, self.default_volume
                );
                self.default_volume
            }
            Err(e) => {
                debug!("{e}, assuming volume {}", self.default_volume);
                self.default_volume
            }
        }
    }

    /// Move the volume to the requested level. Requests outside the range are
    /// dropped, not clamped. Nothing is sent while the device is off.
    pub fn set_volume<O: OutputLine, I: InputLine>(
        &mut self,
        remote: &mut Remote<O, I>,
        requested: i64,
    ) -> io::Result<VolumeChange> {
        let Some(requested) = u8::try_from(requested)
            .ok()
            .filter(|v| *v <= self.max_volume)
        else {
            debug!(
                "volume {requested} outside of range 0 to {}",
                self.max_volume
            );
            return Ok(VolumeChange::OutOfRange);
        };

        let current = self.current();

        if requested == current {
            debug!("volume already {current}");
            return Ok(VolumeChange::Unchanged);
        }

        if !remote.is_on()? {
            info!("device is off");
            return Ok(VolumeChange::DeviceOff);
        }

        let (command, steps) = if requested > current {
            (Command::VolumeUp, requested - current)
        } else {
            (Command::VolumeDown, current - requested)
        };

        debug!("volume {current} to {requested}: {steps} × {command}");

        for _ in 0..steps {
            remote.send(command)?;
            remote.pause();
        }

        if let Err(e) = self.store.save(requested) {
            debug!("failed to save volume {requested}: {e}");
        }

        Ok(VolumeChange::Changed { command, steps })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::Timing;
    use crate::line::{Constant, Recorder};
    use crate::protocol::ADDRESS;
    use std::time::Duration;

    #[derive(Default)]
    struct Memory {
        volume: Option<u8>,
        saves: usize,
    }

    impl VolumeStore for Memory {
        fn load(&self) -> io::Result<u8> {
            self.volume
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no volume"))
        }

        fn save(&mut self, volume: u8) -> io::Result<()> {
            self.volume = Some(volume);
            self.saves += 1;
            Ok(())
        }
    }

    fn volume(current: Option<u8>) -> Volume<Memory> {
        Volume::new(
            Memory {
                volume: current,
                saves: 0,
            },
            30,
            15,
        )
    }

    fn remote(state: u8) -> Remote<Recorder, Constant> {
        Remote::new(Recorder::new(), Constant(state), Timing::default(), ADDRESS)
    }

    /// Number of frames sent, three repetitions of 16 low periods each
    fn frames(remote: &Remote<Recorder, Constant>) -> usize {
        remote.line().count_set(0) / (3 * 16)
    }

    #[test]
    fn up() {
        let mut vol = volume(Some(10));
        let mut remote = remote(1);

        assert_eq!(
            vol.set_volume(&mut remote, 15).unwrap(),
            VolumeChange::Changed {
                command: Command::VolumeUp,
                steps: 5
            }
        );
        assert_eq!(frames(&remote), 5);
        assert_eq!(vol.store().volume, Some(15));

        // every frame is followed by the repeat gap
        let repeat = Duration::from_micros(Timing::default().repeat.into());
        let gaps = remote
            .line()
            .events()
            .iter()
            .filter(|e| **e == crate::line::Event::Sleep(repeat))
            .count();
        assert_eq!(gaps, 5);
    }

    #[test]
    fn down() {
        let mut vol = volume(Some(15));
        let mut remote = remote(1);

        assert_eq!(
            vol.set_volume(&mut remote, 3).unwrap(),
            VolumeChange::Changed {
                command: Command::VolumeDown,
                steps: 12
            }
        );
        assert_eq!(frames(&remote), 12);
        assert_eq!(vol.store().volume, Some(3));
    }

    #[test]
    fn idempotent() {
        let mut vol = volume(Some(10));
        let mut remote = remote(1);

        vol.set_volume(&mut remote, 20).unwrap();
        assert_eq!(frames(&remote), 10);

        remote = self::remote(1);

        assert_eq!(
            vol.set_volume(&mut remote, 20).unwrap(),
            VolumeChange::Unchanged
        );
        assert!(remote.line().events().is_empty());
        assert_eq!(vol.store().saves, 1);
    }

    #[test]
    fn out_of_range() {
        let mut vol = volume(Some(10));
        let mut remote = remote(1);

        for v in [-1, 31, 255, 256, i64::MAX, i64::MIN] {
            assert_eq!(
                vol.set_volume(&mut remote, v).unwrap(),
                VolumeChange::OutOfRange
            );
        }

        assert!(remote.line().events().is_empty());
        assert_eq!(vol.store().volume, Some(10));
        assert_eq!(vol.store().saves, 0);

        // limits themselves are fine
        assert!(matches!(
            vol.set_volume(&mut remote, 30).unwrap(),
            VolumeChange::Changed { steps: 20, .. }
        ));
        assert!(matches!(
            vol.set_volume(&mut remote, 0).unwrap(),
            VolumeChange::Changed { steps: 30, .. }
        ));
    }

    #[test]
    fn device_off() {
        for v in 0..=30 {
            let mut vol = volume(Some(10));
            let mut remote = remote(0);

            let change = vol.set_volume(&mut remote, v).unwrap();

            if v == 10 {
                assert_eq!(change, VolumeChange::Unchanged);
            } else {
                assert_eq!(change, VolumeChange::DeviceOff);
            }

            assert!(remote.line().events().is_empty());
            assert_eq!(vol.store().saves, 0);
        }
    }

    #[test]
    fn default_volume() {
        let mut vol = volume(None);
        let mut remote = remote(1);

        assert_eq!(vol.current(), 15);
        assert_eq!(
            vol.set_volume(&mut remote, 15).unwrap(),
            VolumeChange::Unchanged
        );

        // stored value above the maximum is not trusted
        let vol = volume(Some(200));
        assert_eq!(vol.current(), 15);
    }

    #[test]
    fn file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("volume.txt");

        let mut store = FileStore::new(&path);

        assert_eq!(store.load().unwrap_err().kind(), io::ErrorKind::NotFound);

        store.save(23).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "23");
        assert_eq!(store.load().unwrap(), 23);

        fs::write(&path, "7\n").unwrap();
        assert_eq!(store.load().unwrap(), 7);

        fs::write(&path, "loud").unwrap();
        assert_eq!(store.load().unwrap_err().kind(), io::ErrorKind::InvalidData);

        let vol = Volume::new(FileStore::new(&path), 30, 15);
        assert_eq!(vol.current(), 15);

        let vol = Volume::new(FileStore::new(dir.path().join("missing")), 30, 12);
        assert_eq!(vol.current(), 12);
    }

    #[test]
    fn unwritable_store() {
        let dir = tempfile::tempdir().unwrap();

        // a directory cannot be written as a file
        let mut vol = Volume::new(FileStore::new(dir.path()), 30, 15);
        let mut remote = remote(1);

        assert!(matches!(
            vol.set_volume(&mut remote, 16).unwrap(),
            VolumeChange::Changed { steps: 1, .. }
        ));
        assert_eq!(frames(&remote), 1);
    }

    #[test]
    fn read_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("volume.txt");

        fs::write(&path, "10").unwrap();

        let mut vol = Volume::new(ReadOnly(FileStore::new(&path)), 30, 15);
        let mut remote = remote(1);

        vol.set_volume(&mut remote, 12).unwrap();

        assert_eq!(frames(&remote), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "10");
    }
}
