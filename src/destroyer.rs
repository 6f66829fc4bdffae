//! Recursive teardown: kill every task in a cgroup's subtree, then
//! remove the now-empty directories leaf-first.

use std::time::Duration;

use futures::future::join_all;

use crate::cgroup::{check_cgroup, get_cgroups};
use crate::error::{CgroupsError, Result};
use crate::gateway;
use crate::hierarchy::Hierarchy;
use crate::killer::kill_tasks;

/// Destroys `cgroup` and everything beneath it: every descendant (and
/// `cgroup` itself, unless it is the hierarchy root `/`) gets its tasks
/// killed in parallel, then the directories are removed leaf-first.
///
/// `cgroup == "/"` is a deliberate exception carried over unchanged:
/// every descendant still gets killed, but the root directory itself is
/// never removed (unmounting a hierarchy is a separate operation).
pub async fn destroy_cgroup(hierarchy: &Hierarchy, cgroup: &str, interval: Duration) -> Result<()> {
    check_cgroup(hierarchy, cgroup)?;

    // post-order: deepest descendants first, cgroup itself last (unless root)
    let mut targets = get_cgroups(hierarchy, cgroup)?;
    if cgroup != "/" {
        targets.push(cgroup.to_string());
    }

    let killers = targets.iter().map(|target| kill_tasks(hierarchy, target, interval));
    for result in join_all(killers).await {
        result.map_err(|e| CgroupsError::step_context("kill", e))?;
    }

    for target in &targets {
        let path = hierarchy.root().join(target.trim_start_matches('/'));
        gateway::remove_dir(&path).map_err(|e| CgroupsError::step_context("rmdir", e))?;
    }
    Ok(())
}
