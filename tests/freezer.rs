//! Exercises the freezer driver's idempotent short-circuit against a
//! fixture hierarchy. The FREEZING/SIGCONT remediation transition table
//! itself is unit tested directly in `src/freezer.rs`, since reproducing
//! it here would need a real kernel to advance `freezer.state` through
//! its intermediate values.

use std::fs;
use std::time::Duration;

use cgroups_control::freezer::{freeze_cgroup, thaw_cgroup};
use cgroups_control::Hierarchy;
use tempfile::tempdir;

fn make_cgroup(hierarchy: &Hierarchy, cgroup: &str, initial_state: &str) {
    let dir = hierarchy.root().join(cgroup.trim_start_matches('/'));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("freezer.state"), initial_state).unwrap();
    fs::write(dir.join("tasks"), "").unwrap();
}

#[tokio::test]
async fn freeze_already_frozen_is_a_noop() {
    let dir = tempdir().unwrap();
    let hierarchy = Hierarchy::manually_unchecked(dir.path());
    make_cgroup(&hierarchy, "/web", "FROZEN\n");

    freeze_cgroup(&hierarchy, "/web", Duration::from_millis(1))
        .await
        .unwrap();

    let state = fs::read_to_string(dir.path().join("web/freezer.state")).unwrap();
    assert_eq!(state, "FROZEN\n");
}

#[tokio::test]
async fn thaw_already_thawed_is_a_noop() {
    let dir = tempdir().unwrap();
    let hierarchy = Hierarchy::manually_unchecked(dir.path());
    make_cgroup(&hierarchy, "/web", "THAWED\n");

    thaw_cgroup(&hierarchy, "/web", Duration::from_millis(1))
        .await
        .unwrap();
}

#[tokio::test]
async fn freeze_writes_target_and_converges_on_plain_file() {
    // Without a real kernel advancing freezer.state through FREEZING, a
    // plain fixture file reflects our own write on the very next read, so
    // this only exercises the write-then-observe path, not the nudge.
    let dir = tempdir().unwrap();
    let hierarchy = Hierarchy::manually_unchecked(dir.path());
    make_cgroup(&hierarchy, "/web", "THAWED\n");

    freeze_cgroup(&hierarchy, "/web", Duration::from_millis(1))
        .await
        .unwrap();

    let state = fs::read_to_string(dir.path().join("web/freezer.state")).unwrap();
    assert_eq!(state, "FROZEN\n");
}
