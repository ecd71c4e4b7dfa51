/*!
 * Process Inspector
 * Observes process-table state for verification
 *
 * The inspector is an outside observer: nothing in the reaping logic depends
 * on it. `ProcfsInspector` reads `/proc/<pid>/status` directly instead of
 * shelling out, so no command string is ever built from an identity.
 */

use crate::core::errors::{LifecycleError, LifecycleResult};
use crate::core::types::ProcessIdentity;
use nix::errno::Errno;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Scheduler state as reported by the OS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcState {
    Running,
    Sleeping,
    DiskSleep,
    Stopped,
    TracingStop,
    Zombie,
    Dead,
    Idle,
    /// State letter this inspector does not know
    Other(char),
    /// No record: never existed, or reclaimed
    NotFound,
}

impl ProcState {
    /// Decode the single-letter code used by procfs and `ps`
    #[must_use]
    pub fn from_code(code: char) -> Self {
        match code {
            'R' => ProcState::Running,
            'S' => ProcState::Sleeping,
            'D' => ProcState::DiskSleep,
            'T' => ProcState::Stopped,
            't' => ProcState::TracingStop,
            'Z' => ProcState::Zombie,
            'X' | 'x' => ProcState::Dead,
            'I' => ProcState::Idle,
            other => ProcState::Other(other),
        }
    }

    #[must_use]
    pub const fn code(&self) -> Option<char> {
        match self {
            ProcState::Running => Some('R'),
            ProcState::Sleeping => Some('S'),
            ProcState::DiskSleep => Some('D'),
            ProcState::Stopped => Some('T'),
            ProcState::TracingStop => Some('t'),
            ProcState::Zombie => Some('Z'),
            ProcState::Dead => Some('X'),
            ProcState::Idle => Some('I'),
            ProcState::Other(c) => Some(*c),
            ProcState::NotFound => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_zombie(&self) -> bool {
        matches!(self, ProcState::Zombie)
    }

    /// True while the record still occupies a table slot
    #[inline]
    #[must_use]
    pub const fn exists(&self) -> bool {
        !matches!(self, ProcState::NotFound)
    }
}

/// Snapshot of one process-table entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStateReport {
    pub identity: ProcessIdentity,
    pub state: ProcState,
    /// Current parent; `None` when the record is gone
    pub parent: Option<ProcessIdentity>,
    /// The `State:` value verbatim, e.g. `Z (zombie)`
    pub raw_state: Option<String>,
}

impl ProcessStateReport {
    #[must_use]
    pub fn not_found(identity: ProcessIdentity) -> Self {
        Self {
            identity,
            state: ProcState::NotFound,
            parent: None,
            raw_state: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_zombie(&self) -> bool {
        self.state.is_zombie()
    }
}

impl fmt::Display for ProcessStateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.raw_state, self.state.code()) {
            (Some(raw), _) => write!(f, "State:\t{}", raw),
            (None, Some(code)) => write!(f, "State:\t{}", code),
            (None, None) => write!(f, "no such process"),
        }
    }
}

/// Reports the OS state of a process
pub trait ProcessInspector {
    /// Inspect `identity`; a missing record is a report, not an error
    fn inspect(&self, identity: ProcessIdentity) -> LifecycleResult<ProcessStateReport>;
}

/// Inspector backed by a procfs mount
#[derive(Debug, Clone)]
pub struct ProcfsInspector {
    root: PathBuf,
}

impl ProcfsInspector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for ProcfsInspector {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl ProcessInspector for ProcfsInspector {
    fn inspect(&self, identity: ProcessIdentity) -> LifecycleResult<ProcessStateReport> {
        let path = self.root.join(identity.to_string()).join("status");
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(parse_status(identity, &contents)),
            // ESRCH shows up when the record vanishes mid-read
            Err(e)
                if e.kind() == ErrorKind::NotFound
                    || e.raw_os_error() == Some(Errno::ESRCH as i32) =>
            {
                Ok(ProcessStateReport::not_found(identity))
            }
            Err(source) => Err(LifecycleError::Inspect {
                pid: identity,
                source,
            }),
        }
    }
}

/// Parse the `State:` and `PPid:` lines of a procfs status file
#[must_use]
pub fn parse_status(identity: ProcessIdentity, contents: &str) -> ProcessStateReport {
    let mut report = ProcessStateReport::not_found(identity);

    for line in contents.lines() {
        if let Some(value) = line.strip_prefix("State:") {
            let value = value.trim();
            if let Some(code) = value.chars().next() {
                report.state = ProcState::from_code(code);
                report.raw_state = Some(value.to_string());
            }
        } else if let Some(value) = line.strip_prefix("PPid:") {
            report.parent = value.trim().parse().ok().map(ProcessIdentity::from_raw);
        }
    }

    report
}
