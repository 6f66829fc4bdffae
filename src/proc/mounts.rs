use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CgroupsError, Result};

/// One row of `/proc/mounts` that we care about: device, mount point,
/// filesystem type and the comma-separated mount options (which, for a
/// cgroup v1 mount, name the attached subsystems).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    pub device: String,
    pub mount_point: PathBuf,
    pub fs_type: String,
    pub options: Vec<String>,
}

impl MountEntry {
    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|o| o == name)
    }
}

pub fn read(path: &Path) -> Result<Vec<MountEntry>> {
    let content = fs::read_to_string(path).map_err(|e| CgroupsError::io(path, e))?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<Vec<MountEntry>> {
    let mut out = Vec::new();
    for line in content.lines() {
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(CgroupsError::Parse(format!(
                "malformed /proc/mounts line: {line:?}"
            )));
        }
        out.push(MountEntry {
            device: fields[0].to_string(),
            mount_point: PathBuf::from(fields[1]),
            fs_type: fields[2].to_string(),
            options: fields[3].split(',').map(|s| s.to_string()).collect(),
        });
    }
    Ok(out)
}

/// All mount points of filesystem type `cgroup`, canonicalized.
pub fn cgroup_hierarchies(entries: &[MountEntry]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in entries {
        if entry.fs_type != "cgroup" {
            continue;
        }
        let canon = std::fs::canonicalize(&entry.mount_point)
            .map_err(|e| CgroupsError::io(&entry.mount_point, e))?;
        out.push(canon);
    }
    Ok(out)
}

/// The last `/proc/mounts` row of type `cgroup` whose mount point
/// canonicalizes to `hierarchy`. The kernel can list a mount point more
/// than once across remounts; the source takes the last, most recent, row.
pub fn find_cgroup_mount<'a>(
    entries: &'a [MountEntry],
    hierarchy: &Path,
) -> Result<&'a MountEntry> {
    let target = std::fs::canonicalize(hierarchy).map_err(|e| CgroupsError::io(hierarchy, e))?;
    entries
        .iter()
        .filter(|e| e.fs_type == "cgroup")
        .filter(|e| std::fs::canonicalize(&e.mount_point).map(|p| p == target).unwrap_or(false))
        .last()
        .ok_or_else(|| CgroupsError::NotFound(format!("no cgroup mount at {}", hierarchy.display())))
}
