//! Exercises post-order enumeration and non-recursive create/remove
//! against a fixture hierarchy tree.

use std::fs;

use cgroups_control::cgroup::{create_cgroup, get_cgroups, remove_cgroup};
use cgroups_control::Hierarchy;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn touch_tasks(hierarchy: &Hierarchy, cgroup: &str) {
    fs::write(
        hierarchy.root().join(cgroup.trim_start_matches('/')).join("tasks"),
        "",
    )
    .unwrap();
}

#[test]
fn get_cgroups_is_post_order_and_excludes_root() {
    let dir = tempdir().unwrap();
    let hierarchy = Hierarchy::manually_unchecked(dir.path());
    fs::create_dir_all(dir.path().join("web/api")).unwrap();
    fs::create_dir_all(dir.path().join("web/worker")).unwrap();
    touch_tasks(&hierarchy, "/");
    touch_tasks(&hierarchy, "/web");
    touch_tasks(&hierarchy, "/web/api");
    touch_tasks(&hierarchy, "/web/worker");

    let found = get_cgroups(&hierarchy, "/").unwrap();

    // "web" must come after both of its children, and "/" itself is never listed.
    assert!(!found.contains(&"/".to_string()));
    let web_pos = found.iter().position(|p| p == "/web").unwrap();
    let api_pos = found.iter().position(|p| p == "/web/api").unwrap();
    let worker_pos = found.iter().position(|p| p == "/web/worker").unwrap();
    assert!(api_pos < web_pos);
    assert!(worker_pos < web_pos);
}

#[test]
fn create_then_remove_leaf_cgroup() {
    let dir = tempdir().unwrap();
    let hierarchy = Hierarchy::manually_unchecked(dir.path());
    fs::create_dir_all(dir.path()).unwrap();
    touch_tasks(&hierarchy, "/");

    create_cgroup(&hierarchy, "/web").unwrap();
    assert!(dir.path().join("web").is_dir());
    touch_tasks(&hierarchy, "/web");

    remove_cgroup(&hierarchy, "/web").unwrap();
    assert!(!dir.path().join("web").exists());
}

#[test]
fn remove_fails_while_children_exist() {
    let dir = tempdir().unwrap();
    let hierarchy = Hierarchy::manually_unchecked(dir.path());
    fs::create_dir_all(dir.path().join("web/api")).unwrap();
    touch_tasks(&hierarchy, "/web");
    touch_tasks(&hierarchy, "/web/api");

    let err = remove_cgroup(&hierarchy, "/web").unwrap_err();
    assert!(matches!(err, cgroups_control::CgroupsError::Busy(_)));
}
