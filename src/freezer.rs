//! The freezer driver: `freeze_cgroup`/`thaw_cgroup` write the target
//! state to `freezer.state` and then poll until the kernel confirms the
//! transition, nudging stopped/traced tasks along the way.

use std::time::Duration;

use nix::sys::signal::{kill, Signal};

use crate::cgroup::check_control;
use crate::error::{CgroupsError, Result};
use crate::gateway;
use crate::hierarchy::Hierarchy;
use crate::proc::stat;
use crate::tasks::get_tasks;

const FREEZER_STATE: &str = "freezer.state";
const FROZEN: &str = "FROZEN";
const FREEZING: &str = "FREEZING";
const THAWED: &str = "THAWED";

/// Freezes every task in `cgroup`. Idempotent: if `freezer.state` already
/// reads `FROZEN`, returns immediately without writing anything.
pub async fn freeze_cgroup(hierarchy: &Hierarchy, cgroup: &str, interval: Duration) -> Result<()> {
    drive(hierarchy, cgroup, interval, FROZEN).await
}

/// Thaws every task in `cgroup`. Idempotent: if `freezer.state` already
/// reads `THAWED`, returns immediately without writing anything.
pub async fn thaw_cgroup(hierarchy: &Hierarchy, cgroup: &str, interval: Duration) -> Result<()> {
    drive(hierarchy, cgroup, interval, THAWED).await
}

fn state_path(hierarchy: &Hierarchy, cgroup: &str) -> std::path::PathBuf {
    hierarchy.root().join(cgroup.trim_start_matches('/')).join(FREEZER_STATE)
}

/// What to do next, given the state we're driving towards and the state
/// `freezer.state` currently reports. Pulled out of [`drive`] as a pure
/// function so the transition table can be unit tested without needing a
/// real or fake kernel to produce the intermediate states.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Done,
    NudgeAndRetry,
    RetryOnly,
    Invariant,
}

fn next_step(target: &str, state: &str) -> Step {
    if state == target {
        return Step::Done;
    }
    match (target, state) {
        (FROZEN, FREEZING) => Step::NudgeAndRetry,
        (THAWED, FROZEN) => Step::RetryOnly,
        _ => Step::Invariant,
    }
}

async fn drive(hierarchy: &Hierarchy, cgroup: &str, interval: Duration, target: &str) -> Result<()> {
    check_control(hierarchy, cgroup, FREEZER_STATE)?;
    let path = state_path(hierarchy, cgroup);

    let current = gateway::read_control(&path)?;
    if current.trim() == target {
        return Ok(());
    }

    gateway::write_control(&path, target)?;
    log::debug!("freezer: wrote {target} to {}", path.display());

    loop {
        let state = gateway::read_control(&path)?;
        let state = state.trim();
        match next_step(target, state) {
            Step::Done => {
                log::debug!("freezer: {} reached {target}", path.display());
                return Ok(());
            }
            Step::NudgeAndRetry => {
                // Stopped/traced tasks block the transition to FROZEN
                // until they're resumed enough to observe the freeze.
                nudge_stopped_tasks(hierarchy, cgroup)?;
                gateway::write_control(&path, target)?;
            }
            Step::RetryOnly => {
                // nothing to nudge; just keep polling until the kernel catches up
            }
            Step::Invariant => {
                return Err(CgroupsError::Invariant(format!(
                    "unexpected {FREEZER_STATE} value {state:?} while driving towards {target}"
                )))
            }
        }
        tokio::time::sleep(interval).await;
    }
}

fn nudge_stopped_tasks(hierarchy: &Hierarchy, cgroup: &str) -> Result<()> {
    for pid in get_tasks(hierarchy, cgroup)? {
        match stat::state_char(pid) {
            Ok('T') => {
                if let Err(e) = kill(pid, Signal::SIGCONT) {
                    log::warn!("freezer: SIGCONT to {pid} failed: {e}");
                }
            }
            Ok(_) => {}
            Err(e) => log::warn!("freezer: could not read state of {pid}: {e}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaching_target_is_done() {
        assert_eq!(next_step(FROZEN, FROZEN), Step::Done);
        assert_eq!(next_step(THAWED, THAWED), Step::Done);
    }

    #[test]
    fn freezing_towards_frozen_nudges() {
        assert_eq!(next_step(FROZEN, FREEZING), Step::NudgeAndRetry);
    }

    #[test]
    fn frozen_towards_thawed_just_retries() {
        assert_eq!(next_step(THAWED, FROZEN), Step::RetryOnly);
    }

    #[test]
    fn anything_else_is_an_invariant_violation() {
        assert_eq!(next_step(FROZEN, "BOGUS"), Step::Invariant);
        assert_eq!(next_step(THAWED, FREEZING), Step::Invariant);
    }
}
