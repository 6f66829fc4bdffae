//! Thin wrappers over the syscalls and file I/O that every other module
//! builds on: mount/unmount a hierarchy, mkdir/rmdir a cgroup directory,
//! read/write a control file. Nothing here knows about hierarchies,
//! subsystems or validation; it just turns a `nix`/`std::fs` error into a
//! [`CgroupsError`] with the failing path attached.

use std::fs;
use std::io::Write;
use std::path::Path;

use nix::mount::{mount, umount, MsFlags};
use nix::sys::stat::Mode;
use nix::unistd::mkdir as nix_mkdir;

use crate::error::{CgroupsError, Result};

/// Mounts a cgroup v1 hierarchy at `target`, attaching the comma-separated
/// `subsystems` list via the mount options, matching `mount -t cgroup -o
/// <subsystems> cgroup <target>`.
pub fn mount_hierarchy(target: &Path, subsystems: &str) -> Result<()> {
    mount(
        Some("cgroup"),
        target,
        Some("cgroup"),
        MsFlags::empty(),
        Some(subsystems),
    )
    .map_err(|e| CgroupsError::io(target, std::io::Error::from(e)))
}

pub fn unmount_hierarchy(target: &Path) -> Result<()> {
    umount(target).map_err(|e| CgroupsError::io(target, std::io::Error::from(e)))
}

/// Non-recursive directory creation, mirroring `mkdir(path, 0755)` (the
/// kernel cgroupfs enforces its own permission model on top of this).
pub fn create_dir(path: &Path) -> Result<()> {
    nix_mkdir(path, Mode::from_bits_truncate(0o755))
        .map_err(|e| CgroupsError::io(path, std::io::Error::from(e)))
}

/// Non-recursive directory removal.
pub fn remove_dir(path: &Path) -> Result<()> {
    nix::unistd::rmdir(path).map_err(|e| CgroupsError::io(path, std::io::Error::from(e)))
}

/// Reads a control file's full contents as a `String`. Control files
/// don't support `lseek`/pread semantics reliably, so this always opens
/// and reads the whole file rather than reusing an open handle.
pub fn read_control(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| CgroupsError::io(path, e))
}

/// Writes `value` to a control file, newline-terminated, matching the
/// original implementation's `file << value << std::endl`.
pub fn write_control(path: &Path, value: &str) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| CgroupsError::io(path, e))?;
    writeln!(file, "{value}").map_err(|e| CgroupsError::io(path, e))
}
