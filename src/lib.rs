//! Asynchronous control plane for Linux cgroups v1.
//!
//! This crate talks directly to the cgroups v1 pseudo filesystem
//! (`/sys/fs/cgroup/...`, `/proc/cgroups`, `/proc/mounts`) to discover
//! hierarchies and subsystems, create and tear down cgroups, move tasks
//! in and out of them, wait on kernel event notifications, and drive the
//! freezer/killer/destroyer state machines that need to poll a control
//! file until the kernel confirms a transition.
//!
//! Synchronous operations (everything in [`hierarchy`], [`cgroup`] and
//! [`tasks`]) are plain blocking filesystem calls — they're a handful of
//! `read`/`write`/`mkdir` syscalls, not worth an executor. The four
//! operations that must poll or block on an external signal
//! ([`events::listen_event`], [`freezer::freeze_cgroup`],
//! [`freezer::thaw_cgroup`], [`killer::kill_tasks`],
//! [`destroyer::destroy_cgroup`]) are `async fn`s driven by Tokio;
//! dropping their future is the only cancellation signal they need, since
//! all of their state (open fds, pending retries) lives in the future
//! itself.

#[cfg(not(target_os = "linux"))]
compile_error!("cgroups-control only supports Linux");

pub mod cgroup;
pub mod destroyer;
pub mod error;
pub mod events;
pub mod freezer;
pub mod gateway;
pub mod hierarchy;
pub mod killer;
mod proc;
pub mod tasks;

pub use error::{CgroupsError, Result};
pub use hierarchy::Hierarchy;
