//! Event notification via a cgroup's `cgroup.event_control` file and an
//! `eventfd`. A cgroup control file like `memory.pressure_level` can be
//! registered with an eventfd so that the kernel posts a notification to
//! it when the condition named by `args` (if any) occurs.
//!
//! Cancellation is implicit: dropping the returned future before it
//! resolves drops the underlying `AsyncFd`/`EventFd`, closing the
//! eventfd and releasing the kernel-side registration, the same thing
//! the source's explicit `closeNotifier` does.

use std::os::fd::AsRawFd;

use nix::sys::eventfd::{EfdFlags, EventFd};
use tokio::io::unix::AsyncFd;

use crate::cgroup::check_control;
use crate::error::{CgroupsError, Result};
use crate::hierarchy::Hierarchy;

/// Registers for notifications on `control_file` within `cgroup` and
/// waits for the first one, returning the 8-byte counter value the
/// kernel writes to the eventfd. `args`, if non-empty, is appended to
/// the registration line written to `cgroup.event_control` (e.g. a
/// `memory.pressure_level` threshold).
pub async fn listen_event(
    hierarchy: &Hierarchy,
    cgroup: &str,
    control_file: &str,
    args: Option<&str>,
) -> Result<u64> {
    check_control(hierarchy, cgroup, control_file)?;

    let event_fd = EventFd::from_flags(EfdFlags::EFD_NONBLOCK | EfdFlags::EFD_CLOEXEC)
        .map_err(|e| CgroupsError::io("eventfd", std::io::Error::from(e)))?;

    let cgroup_dir = hierarchy.root().join(cgroup.trim_start_matches('/'));
    let control_path = cgroup_dir.join(control_file);
    let control_handle = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(&control_path)
        .map_err(|e| CgroupsError::io(&control_path, e))?;

    let registration = registration_line(event_fd.as_raw_fd(), control_handle.as_raw_fd(), args);
    let event_control_path = cgroup_dir.join("cgroup.event_control");
    crate::gateway::write_control(&event_control_path, &registration)?;
    // the kernel keeps the registration alive via the eventfd; cfd can close now.
    drop(control_handle);

    let async_fd = AsyncFd::new(event_fd)
        .map_err(|e| CgroupsError::io(&event_control_path, e))?;

    loop {
        let mut guard = async_fd
            .readable()
            .await
            .map_err(|e| CgroupsError::io(&event_control_path, e))?;
        let mut buf = [0u8; 8];
        match guard.try_io(|inner| {
            nix::unistd::read(inner.get_ref().as_raw_fd(), &mut buf)
                .map_err(std::io::Error::from)
        }) {
            Ok(Ok(8)) => return Ok(u64::from_ne_bytes(buf)),
            Ok(Ok(n)) => {
                return Err(CgroupsError::Invariant(format!(
                    "short read on eventfd: {n} bytes"
                )))
            }
            Ok(Err(e)) => return Err(CgroupsError::io(&event_control_path, e)),
            Err(_would_block) => continue,
        }
    }
}

/// Builds the `"<eventfd> <control fd>[ <args>]"` line the kernel expects
/// written to `cgroup.event_control`.
fn registration_line(event_fd: i32, control_fd: i32, args: Option<&str>) -> String {
    match args {
        Some(args) => format!("{event_fd} {control_fd} {args}"),
        None => format!("{event_fd} {control_fd}"),
    }
}
