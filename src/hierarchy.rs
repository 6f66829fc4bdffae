//! Discovery and lifecycle of cgroup v1 *hierarchies* — the mount points
//! a set of subsystems is attached to. Corresponds to the Enumeration,
//! Validation and the hierarchy half of Lifecycle.

use std::path::{Path, PathBuf};

use crate::error::{CgroupsError, Result};
use crate::gateway;
use crate::proc::{cgroups as proc_cgroups, mounts as proc_mounts};

const PROC_CGROUPS: &str = "/proc/cgroups";
const PROC_MOUNTS: &str = "/proc/mounts";

/// Whether cgroups are supported by the running kernel, i.e. whether
/// `/proc/cgroups` exists.
pub fn enabled() -> bool {
    proc_cgroups::supported(Path::new(PROC_CGROUPS))
}

/// All cgroup v1 hierarchies currently mounted, canonicalized.
pub fn hierarchies() -> Result<Vec<PathBuf>> {
    let entries = proc_mounts::read(Path::new(PROC_MOUNTS))?;
    proc_mounts::cgroup_hierarchies(&entries)
}

/// Parses the comma-separated `subsystems` argument used throughout this
/// module, rejecting an empty list.
fn split_subsystems(subsystems: &str) -> Result<Vec<&str>> {
    let names: Vec<&str> = subsystems.split(',').map(str::trim).collect();
    if names.is_empty() || names.iter().any(|n| n.is_empty()) {
        return Err(CgroupsError::InvalidArgument(format!(
            "empty subsystem name in {subsystems:?}"
        )));
    }
    Ok(names)
}

/// Whether every subsystem in the comma-separated `subsystems` list is
/// enabled in the running kernel. Fails if any name is unknown.
pub fn subsystems_enabled(subsystems: &str) -> Result<bool> {
    let names = split_subsystems(subsystems)?;
    let table = proc_cgroups::read(Path::new(PROC_CGROUPS))?;
    for name in &names {
        if !table.iter().any(|row| &row.name == name) {
            return Err(CgroupsError::NotFound(format!("unknown subsystem {name:?}")));
        }
    }
    Ok(names
        .iter()
        .all(|name| table.iter().any(|row| &row.name == name && row.enabled)))
}

/// Whether any subsystem in the comma-separated `subsystems` list is
/// already attached to a hierarchy (`hierarchy != 0`). Fails if any name
/// is unknown.
pub fn subsystems_busy(subsystems: &str) -> Result<bool> {
    let names = split_subsystems(subsystems)?;
    let table = proc_cgroups::read(Path::new(PROC_CGROUPS))?;
    for name in &names {
        if !table.iter().any(|row| &row.name == name) {
            return Err(CgroupsError::NotFound(format!("unknown subsystem {name:?}")));
        }
    }
    Ok(names
        .iter()
        .any(|name| table.iter().any(|row| &row.name == name && row.hierarchy != 0)))
}

/// Names of every subsystem currently enabled in the kernel.
pub fn all_subsystems() -> Result<Vec<String>> {
    let table = proc_cgroups::read(Path::new(PROC_CGROUPS))?;
    Ok(table.into_iter().filter(|r| r.enabled).map(|r| r.name).collect())
}

/// Names of the subsystems attached to the hierarchy mounted at `path`.
/// Intersects the globally enabled subsystem names with the mount
/// options of the *last* matching `/proc/mounts` row for `path`.
pub fn subsystems_of(hierarchy: &Path) -> Result<Vec<String>> {
    let entries = proc_mounts::read(Path::new(PROC_MOUNTS))?;
    let mount = proc_mounts::find_cgroup_mount(&entries, hierarchy)?;
    let all = all_subsystems()?;
    Ok(all.into_iter().filter(|name| mount.has_option(name)).collect())
}

/// Creates a new hierarchy at `path`, mounting the given comma-separated
/// `subsystems`. Fails if `path` already exists, if any subsystem is
/// unknown/disabled, or if any subsystem is already attached elsewhere.
/// On a mount failure the just-created directory is removed, best
/// effort, before the mount error is returned.
pub fn create_hierarchy(path: &Path, subsystems: &str) -> Result<()> {
    if path.exists() {
        return Err(CgroupsError::Busy(format!(
            "hierarchy path already exists: {}",
            path.display()
        )));
    }
    if !subsystems_enabled(subsystems)? {
        return Err(CgroupsError::NotSupported(format!(
            "not all of {subsystems:?} are enabled"
        )));
    }
    if subsystems_busy(subsystems)? {
        return Err(CgroupsError::Busy(format!(
            "one of {subsystems:?} is already attached to a hierarchy"
        )));
    }
    gateway::create_dir(path)?;
    if let Err(mount_err) = gateway::mount_hierarchy(path, subsystems) {
        let _ = gateway::remove_dir(path);
        return Err(mount_err);
    }
    Ok(())
}

/// Unmounts and removes the hierarchy at `path`.
pub fn remove_hierarchy(path: &Path) -> Result<()> {
    check_hierarchy(path)?;
    gateway::unmount_hierarchy(path)?;
    gateway::remove_dir(path)
}

/// Succeeds iff some subsystem is attached to the hierarchy at `path`,
/// i.e. iff [`subsystems_of`] does not fail.
pub fn check_hierarchy(path: &Path) -> Result<()> {
    subsystems_of(path)?;
    Ok(())
}

/// Succeeds iff every name in the comma-separated `subsystems` list is
/// both enabled in the kernel and attached to the hierarchy at `path`.
pub fn check_hierarchy_subsystems(path: &Path, subsystems: &str) -> Result<()> {
    if !subsystems_enabled(subsystems)? {
        return Err(CgroupsError::NotSupported(format!(
            "not all of {subsystems:?} are enabled"
        )));
    }
    let attached = subsystems_of(path)?;
    let names = split_subsystems(subsystems)?;
    if names.iter().all(|n| attached.iter().any(|a| a == n)) {
        Ok(())
    } else {
        Err(CgroupsError::InvalidArgument(format!(
            "{subsystems:?} not all attached to {}",
            path.display()
        )))
    }
}

/// A hierarchy that has already been validated once, so downstream
/// operations (cgroup creation, task I/O, the freezer/killer/destroyer
/// drivers) don't need to re-read `/proc/mounts` on every call the way
/// the functions above do.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    root: PathBuf,
    /// Whether this handle is backed by a real `/proc/mounts` entry.
    /// `false` for [`Hierarchy::manually_unchecked`] handles, which point
    /// at test fixtures that have no mount to re-check.
    real: bool,
}

impl Hierarchy {
    /// Validates that a cgroup v1 hierarchy is mounted at `root` (some
    /// subsystem must be attached) and returns a handle to it.
    pub fn discover(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        check_hierarchy(&root)?;
        Ok(Self { root, real: true })
    }

    /// Builds a handle without checking `/proc/mounts`, for tests that
    /// operate against a fixture directory tree instead of a real
    /// cgroupfs mount.
    #[cfg(feature = "manually")]
    pub fn manually_unchecked(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            real: false,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Succeeds iff every name in the comma-separated `subsystems` list
    /// is attached to this hierarchy. This always re-reads `/proc/mounts`,
    /// so a handle built via [`Hierarchy::manually_unchecked`] against a
    /// fixture directory will fail here; tests that exercise the
    /// freezer/killer drivers need a real mount or should call the free
    /// function [`check_hierarchy_subsystems`] directly against a stub.
    pub fn check_subsystems(&self, subsystems: &str) -> Result<()> {
        check_hierarchy_subsystems(&self.root, subsystems)
    }

    /// Re-validates that this hierarchy is still mounted: `/proc/mounts`
    /// is never cached, so every operation that funnels through
    /// [`crate::cgroup::check_cgroup`] re-checks rather than trusting the
    /// one-time validation done at [`Hierarchy::discover`]. A
    /// `manually_unchecked` handle has no real mount to check and is a
    /// no-op here.
    pub(crate) fn revalidate(&self) -> Result<()> {
        if self.real {
            check_hierarchy(&self.root)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_rejects_empty() {
        assert!(split_subsystems("").is_err());
        assert!(split_subsystems("cpu,,memory").is_err());
    }

    #[test]
    fn split_trims_whitespace() {
        assert_eq!(split_subsystems("cpu, memory").unwrap(), vec!["cpu", "memory"]);
    }

    #[cfg(feature = "manually")]
    #[test]
    fn manually_unchecked_roundtrips_root() {
        let h = Hierarchy::manually_unchecked("/tmp/fixture");
        assert_eq!(h.root(), std::path::Path::new("/tmp/fixture"));
    }
}
