//! Discovery and lifecycle of individual cgroups within a hierarchy:
//! create/remove a cgroup directory, enumerate descendants, validate that
//! a cgroup or control file exists.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{CgroupsError, Result};
use crate::gateway;
use crate::hierarchy::Hierarchy;

/// Joins a hierarchy root with a cgroup path that is always given
/// relative to the hierarchy root and starts with `/` (e.g. `/web/api`).
fn full_path(hierarchy_root: &Path, cgroup: &str) -> PathBuf {
    let relative = cgroup.trim_start_matches('/');
    hierarchy_root.join(relative)
}

/// The parent cgroup path of `cgroup`, computed the same way the source
/// does: the dirname of the path joined under `/`. The root's parent is
/// the root itself.
fn parent_of(cgroup: &str) -> String {
    let joined = format!("/{}", cgroup.trim_start_matches('/'));
    match Path::new(&joined).parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_string_lossy().into_owned(),
        _ => "/".to_string(),
    }
}

/// Copies `cpuset.cpus` and `cpuset.mems` from the parent cgroup to the
/// newly created child, only when the `cpuset` subsystem is attached to
/// this hierarchy. This lets a child cgroup actually schedule tasks:
/// without inherited cpuset masks, an empty child cpuset would refuse
/// every task assignment.
fn clone_cpuset_cpus_mems(hierarchy: &Hierarchy, cgroup: &str) -> Result<()> {
    if hierarchy.check_subsystems("cpuset").is_err() {
        return Ok(());
    }
    let parent = parent_of(cgroup);
    for file in ["cpuset.cpus", "cpuset.mems"] {
        let parent_file = full_path(hierarchy.root(), &parent).join(file);
        let child_file = full_path(hierarchy.root(), cgroup).join(file);
        let value = gateway::read_control(&parent_file)?;
        gateway::write_control(&child_file, value.trim())?;
    }
    Ok(())
}

/// Creates cgroup `cgroup` (a `/`-rooted path relative to the hierarchy
/// root) non-recursively; its parent must already exist. Inherits
/// cpuset masks from the parent when `cpuset` is attached.
pub fn create_cgroup(hierarchy: &Hierarchy, cgroup: &str) -> Result<()> {
    let path = full_path(hierarchy.root(), cgroup);
    gateway::create_dir(&path)?;
    clone_cpuset_cpus_mems(hierarchy, cgroup)
}

/// Removes cgroup `cgroup`. Fails if it still has sub-cgroups; the
/// caller must remove descendants first (or use the destroyer).
pub fn remove_cgroup(hierarchy: &Hierarchy, cgroup: &str) -> Result<()> {
    check_cgroup(hierarchy, cgroup)?;
    if !get_cgroups(hierarchy, cgroup)?.is_empty() {
        return Err(CgroupsError::Busy(format!(
            "cgroup {cgroup:?} still has sub-cgroups"
        )));
    }
    gateway::remove_dir(&full_path(hierarchy.root(), cgroup))
}

/// Succeeds iff `hierarchy` is still mounted and `cgroup` exists as a
/// directory within it. The hierarchy check is a fresh `/proc/mounts`
/// read, not cached from when the `Hierarchy` handle was built, since a
/// subsystem can be detached or the mount torn down after discovery.
pub fn check_cgroup(hierarchy: &Hierarchy, cgroup: &str) -> Result<()> {
    hierarchy.revalidate()?;
    let path = full_path(hierarchy.root(), cgroup);
    if path.is_dir() {
        Ok(())
    } else {
        Err(CgroupsError::NotFound(format!(
            "cgroup directory not found: {}",
            path.display()
        )))
    }
}

/// Succeeds iff `cgroup` exists and `control_file` exists within it.
pub fn check_control(hierarchy: &Hierarchy, cgroup: &str, control_file: &str) -> Result<()> {
    check_cgroup(hierarchy, cgroup)?;
    let path = full_path(hierarchy.root(), cgroup).join(control_file);
    if path.is_file() {
        Ok(())
    } else {
        Err(CgroupsError::NotFound(format!(
            "control file not found: {}",
            path.display()
        )))
    }
}

/// All descendant cgroups of `cgroup` (not including `cgroup` itself),
/// returned in post-order (children before their own parent), as paths
/// relative to the hierarchy root starting with `/`. This is a direct
/// analogue of an `FTS_DP` walk filtered to `fts_level > 0`.
pub fn get_cgroups(hierarchy: &Hierarchy, cgroup: &str) -> Result<Vec<String>> {
    check_cgroup(hierarchy, cgroup)?;
    let root = full_path(hierarchy.root(), cgroup);
    let canon_hierarchy =
        std::fs::canonicalize(hierarchy.root()).map_err(|e| CgroupsError::io(hierarchy.root(), e))?;

    let mut out = Vec::new();
    // contents_first walks bottom-up, equivalent to FTS_DP post-order.
    for entry in WalkDir::new(&root).contents_first(true).min_depth(1) {
        let entry = entry.map_err(|e| {
            CgroupsError::io(
                e.path().unwrap_or(&root),
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walkdir error")),
            )
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let canon = std::fs::canonicalize(entry.path()).map_err(|e| CgroupsError::io(entry.path(), e))?;
        let relative = canon
            .strip_prefix(&canon_hierarchy)
            .map_err(|_| CgroupsError::Invariant("cgroup escaped its hierarchy".into()))?;
        out.push(format!("/{}", relative.to_string_lossy()));
    }
    Ok(out)
}
