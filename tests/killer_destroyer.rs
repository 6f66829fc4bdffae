//! The task killer and destroyer both require a hierarchy with the
//! `freezer` subsystem actually attached (`Hierarchy::check_subsystems`
//! reads real `/proc/mounts` data), so they can't run against a bare
//! fixture directory the way the other integration tests do. These are
//! `#[ignore]`d and meant to be run manually on a machine with cgroup v1
//! mounted and CAP_SYS_ADMIN, the same way the source's own Mesos test
//! suite gates its cgroup tests behind a real mount.

use std::time::Duration;

use cgroups_control::destroyer::destroy_cgroup;
use cgroups_control::hierarchy::Hierarchy;
use cgroups_control::killer::kill_tasks;

#[ignore = "requires a real cgroup v1 freezer hierarchy mounted with CAP_SYS_ADMIN"]
#[tokio::test]
async fn kill_tasks_drains_an_empty_cgroup() {
    let hierarchy = Hierarchy::discover("/sys/fs/cgroup/freezer").unwrap();
    kill_tasks(&hierarchy, "/cgroups-control-test", Duration::from_millis(10))
        .await
        .unwrap();
}

#[ignore = "requires a real cgroup v1 freezer hierarchy mounted with CAP_SYS_ADMIN"]
#[tokio::test]
async fn destroy_cgroup_removes_subtree() {
    let hierarchy = Hierarchy::discover("/sys/fs/cgroup/freezer").unwrap();
    destroy_cgroup(&hierarchy, "/cgroups-control-test", Duration::from_millis(10))
        .await
        .unwrap();
}
