//! Integration tests for cgroup directory lifecycle and task I/O against
//! a hand-built fixture tree, not a real cgroupfs mount. Built with
//! `Hierarchy::manually_unchecked`, which skips the `/proc/mounts` check
//! `Hierarchy::discover` would otherwise require.

use std::fs;

use cgroups_control::gateway;
use cgroups_control::tasks::{assign_task, get_tasks};
use cgroups_control::Hierarchy;
use nix::unistd::Pid;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn make_cgroup(hierarchy: &Hierarchy, cgroup: &str) {
    let dir = hierarchy.root().join(cgroup.trim_start_matches('/'));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("tasks"), "").unwrap();
}

#[test]
fn assign_and_read_back_task() {
    // A real kernel `tasks` file treats every write as "add this pid",
    // accumulating membership; a plain fixture file doesn't reproduce
    // that kernel-side behavior; it just reflects the bytes of the last
    // write, so this checks a single assignment rather than accumulation.
    let dir = tempdir().unwrap();
    let hierarchy = Hierarchy::manually_unchecked(dir.path());
    make_cgroup(&hierarchy, "/web");

    assign_task(&hierarchy, "/web", Pid::from_raw(111)).unwrap();

    let tasks = get_tasks(&hierarchy, "/web").unwrap();
    assert_eq!(tasks.into_iter().collect::<Vec<_>>(), vec![Pid::from_raw(111)]);
}

#[test]
fn get_tasks_dedups_and_sorts_existing_membership() {
    let dir = tempdir().unwrap();
    let hierarchy = Hierarchy::manually_unchecked(dir.path());
    make_cgroup(&hierarchy, "/web");
    fs::write(dir.path().join("web/tasks"), "222 111 222\n").unwrap();

    let tasks = get_tasks(&hierarchy, "/web").unwrap();
    assert_eq!(
        tasks.into_iter().collect::<Vec<_>>(),
        vec![Pid::from_raw(111), Pid::from_raw(222)]
    );
}

#[test]
fn tasks_file_written_newline_terminated() {
    let dir = tempdir().unwrap();
    let hierarchy = Hierarchy::manually_unchecked(dir.path());
    make_cgroup(&hierarchy, "/web");
    let tasks_file = hierarchy.root().join("web/tasks");

    gateway::write_control(&tasks_file, "42").unwrap();
    let content = fs::read_to_string(&tasks_file).unwrap();
    assert_eq!(content, "42\n");
}

#[test]
fn missing_cgroup_is_not_found() {
    let dir = tempdir().unwrap();
    let hierarchy = Hierarchy::manually_unchecked(dir.path());
    let err = get_tasks(&hierarchy, "/does-not-exist").unwrap_err();
    assert!(matches!(err, cgroups_control::CgroupsError::NotFound(_)));
}
