//! One-shot process setup before any timing sensitive work

use nix::unistd::{setuid, Uid};
use std::io;

/// Switch to real-time FIFO scheduling with the given priority, so pulse
/// widths are not stretched by preemption.
pub fn set_realtime(priority: i32) -> io::Result<()> {
    let param = libc::sched_param {
        sched_priority: priority,
    };

    // SAFETY: param is a valid sched_param which outlives the call
    if unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) } == -1 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

/// Become root, for when the binary is installed set-uid
pub fn become_root() -> io::Result<()> {
    setuid(Uid::from_raw(0)).map_err(io::Error::from)
}
