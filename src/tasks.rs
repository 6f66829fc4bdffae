//! Task (PID) membership I/O: reading and writing a cgroup's `tasks`
//! control file.

use std::collections::BTreeSet;

use nix::unistd::Pid;

use crate::cgroup::check_cgroup;
use crate::error::{CgroupsError, Result};
use crate::gateway;
use crate::hierarchy::Hierarchy;

const TASKS_FILE: &str = "tasks";

fn tasks_path(hierarchy: &Hierarchy, cgroup: &str) -> std::path::PathBuf {
    hierarchy.root().join(cgroup.trim_start_matches('/')).join(TASKS_FILE)
}

/// The set of tasks currently in `cgroup`'s `tasks` file, deduplicated
/// (the kernel can report the same pid more than once across racing
/// reads) and sorted.
pub fn get_tasks(hierarchy: &Hierarchy, cgroup: &str) -> Result<BTreeSet<Pid>> {
    check_cgroup(hierarchy, cgroup)?;
    let path = tasks_path(hierarchy, cgroup);
    let content = gateway::read_control(&path)?;
    parse_tasks(&content)
}

fn parse_tasks(content: &str) -> Result<BTreeSet<Pid>> {
    content
        .split_whitespace()
        .map(|tok| {
            tok.parse::<i32>()
                .map(Pid::from_raw)
                .map_err(|_| CgroupsError::Parse(format!("bad pid in tasks file: {tok:?}")))
        })
        .collect()
}

/// Assigns `pid` to `cgroup` by writing its decimal value to `tasks`.
pub fn assign_task(hierarchy: &Hierarchy, cgroup: &str, pid: Pid) -> Result<()> {
    check_cgroup(hierarchy, cgroup)?;
    let path = tasks_path(hierarchy, cgroup);
    gateway::write_control(&path, &pid.as_raw().to_string())
}
