use std::fs;
use std::path::Path;

use crate::error::{CgroupsError, Result};

/// One row of `/proc/cgroups`: a subsystem name, the id of the hierarchy it
/// is currently attached to (0 means "not attached"), the number of cgroups
/// in that hierarchy, and whether the subsystem is compiled in and enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsystemInfo {
    pub name: String,
    pub hierarchy: u32,
    pub num_cgroups: u32,
    pub enabled: bool,
}

/// Reads and parses `/proc/cgroups`. Lines starting with `#` and blank
/// lines are skipped, matching the kernel's documented format:
/// `subsys_name\thierarchy\tnum_cgroups\tenabled`.
pub fn read(path: &Path) -> Result<Vec<SubsystemInfo>> {
    let content = fs::read_to_string(path).map_err(|e| CgroupsError::io(path, e))?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<Vec<SubsystemInfo>> {
    let mut out = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(CgroupsError::Parse(format!(
                "malformed /proc/cgroups line: {line:?}"
            )));
        }
        let hierarchy = fields[1]
            .parse()
            .map_err(|_| CgroupsError::Parse(format!("bad hierarchy id in: {line:?}")))?;
        let num_cgroups = fields[2]
            .parse()
            .map_err(|_| CgroupsError::Parse(format!("bad cgroup count in: {line:?}")))?;
        let enabled = match fields[3] {
            "0" => false,
            "1" => true,
            other => {
                return Err(CgroupsError::Parse(format!(
                    "bad enabled flag {other:?} in: {line:?}"
                )))
            }
        };
        out.push(SubsystemInfo {
            name: fields[0].to_string(),
            hierarchy,
            num_cgroups,
            enabled,
        });
    }
    Ok(out)
}

/// Whether `enabled()` would succeed: i.e. `/proc/cgroups` exists at all.
pub fn supported(path: &Path) -> bool {
    path.exists()
}
