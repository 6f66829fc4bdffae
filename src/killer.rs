//! The task killer: freeze a cgroup, `SIGKILL` everything in it, thaw it
//! so the killed tasks can actually exit, then wait for `tasks` to drain.
//! Each phase runs strictly after the previous one completes.

use std::time::Duration;

use nix::sys::signal::{kill, Signal};

use crate::cgroup::check_cgroup;
use crate::error::{CgroupsError, Result};
use crate::freezer::{freeze_cgroup, thaw_cgroup};
use crate::gateway;
use crate::hierarchy::Hierarchy;
use crate::tasks::get_tasks;

/// Kills every task in `cgroup`: freeze, SIGKILL, thaw, wait for empty.
/// Each phase's error is wrapped with a context prefix naming the phase
/// that failed, so a caller can tell freeze/signal/thaw/drain apart.
pub async fn kill_tasks(hierarchy: &Hierarchy, cgroup: &str, interval: Duration) -> Result<()> {
    hierarchy.check_subsystems("freezer")?;
    check_cgroup(hierarchy, cgroup)?;

    freeze_cgroup(hierarchy, cgroup, interval)
        .await
        .map_err(|e| CgroupsError::step_context("freeze", e))?;
    send_sigkill(hierarchy, cgroup).map_err(|e| CgroupsError::step_context("sigkill", e))?;
    thaw_cgroup(hierarchy, cgroup, interval)
        .await
        .map_err(|e| CgroupsError::step_context("thaw", e))?;
    wait_until_empty(hierarchy, cgroup, interval)
        .await
        .map_err(|e| CgroupsError::step_context("drain", e))
}

fn send_sigkill(hierarchy: &Hierarchy, cgroup: &str) -> Result<()> {
    for pid in get_tasks(hierarchy, cgroup)? {
        kill(pid, Signal::SIGKILL)?;
    }
    Ok(())
}

async fn wait_until_empty(hierarchy: &Hierarchy, cgroup: &str, interval: Duration) -> Result<()> {
    let path = hierarchy.root().join(cgroup.trim_start_matches('/')).join("tasks");
    loop {
        let content = gateway::read_control(&path)?;
        if content.trim().is_empty() {
            return Ok(());
        }
        tokio::time::sleep(interval).await;
    }
}
