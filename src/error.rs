use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CgroupsError>;

/// Everything that can go wrong while talking to the cgroups v1 pseudo
/// filesystem, or while driving one of the asynchronous state machines
/// built on top of it.
#[derive(Debug, Error)]
pub enum CgroupsError {
    /// cgroups are not compiled into the running kernel, or `/proc/cgroups`
    /// could not be read at all.
    #[error("cgroups not supported: {0}")]
    NotSupported(String),

    /// A caller-supplied argument was malformed (empty subsystem list,
    /// unknown subsystem name, path escaping its hierarchy, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A hierarchy, cgroup or control file that was expected to exist does
    /// not.
    #[error("not found: {0}")]
    NotFound(String),

    /// The requested operation conflicts with the current state (a
    /// subsystem already attached elsewhere, a cgroup with children still
    /// present, ...).
    #[error("busy: {0}")]
    Busy(String),

    /// A filesystem operation on a real path failed.
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A control file, `/proc/cgroups` or `/proc/mounts` held content that
    /// did not parse the way the format requires.
    #[error("parse error: {0}")]
    Parse(String),

    /// The operation's future/promise was discarded before it completed.
    #[error("cancelled")]
    Cancelled,

    /// An invariant the driver relies on was violated (e.g. an
    /// unrecognised `freezer.state` value). This never happens unless the
    /// kernel or a concurrent process is doing something the protocol does
    /// not account for.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl CgroupsError {
    /// Wraps `cause` with a short prefix naming the driver step that failed,
    /// matching the "child step errors get a context prefix" contract.
    pub fn step_context(step: &str, cause: CgroupsError) -> CgroupsError {
        match cause {
            CgroupsError::Io { path, source } => CgroupsError::Io {
                path,
                source: io::Error::new(source.kind(), format!("{step}: {source}")),
            },
            other => CgroupsError::Invariant(format!("{step}: {other}")),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> CgroupsError {
        CgroupsError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<nix::Error> for CgroupsError {
    fn from(e: nix::Error) -> Self {
        CgroupsError::Io {
            path: PathBuf::new(),
            source: io::Error::from(e),
        }
    }
}
