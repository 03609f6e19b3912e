use std::fmt;

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

use crate::manager::Manager;
use crate::process::SnapshotProvider;

/// What the OS reported for one signal delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalOutcome {
    Delivered,
    NoSuchProcess,
    PermissionDenied,
    Other(String),
}

/// Sends the graceful termination signal. Injected so fan-out can be tested
/// without touching real processes.
pub trait Signaller {
    fn terminate(&self, pid: u32) -> SignalOutcome;
}

//Terminate (Graceful stop)
//Sends SIGTERM, giving process a chance to shut down cleanly. No escalation to SIGKILL.
#[derive(Debug, Clone, Copy, Default)]
pub struct NixSignaller;

impl Signaller for NixSignaller {
    fn terminate(&self, pid: u32) -> SignalOutcome {
        //pid 0 and negatives address process groups, never send those
        let raw = match i32::try_from(pid) {
            Ok(raw) if raw > 0 => raw,
            _ => return SignalOutcome::NoSuchProcess,
        };

        match signal::kill(Pid::from_raw(raw), Signal::SIGTERM) {
            Ok(()) => SignalOutcome::Delivered,
            Err(Errno::ESRCH) => SignalOutcome::NoSuchProcess,
            Err(Errno::EPERM) => SignalOutcome::PermissionDenied,
            Err(e) => SignalOutcome::Other(format!("Failed to send SIGTERM to PID {}: {}", pid, e)),
        }
    }
}

/// Per-pid result of a termination attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationOutcome {
    Terminated,
    NotFound,
    Denied,
    Failed(String),
}

impl From<SignalOutcome> for TerminationOutcome {
    fn from(outcome: SignalOutcome) -> Self {
        match outcome {
            SignalOutcome::Delivered => TerminationOutcome::Terminated,
            SignalOutcome::NoSuchProcess => TerminationOutcome::NotFound,
            SignalOutcome::PermissionDenied => TerminationOutcome::Denied,
            SignalOutcome::Other(msg) => TerminationOutcome::Failed(msg),
        }
    }
}

impl TerminationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TerminationOutcome::Terminated)
    }
}

impl fmt::Display for TerminationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationOutcome::Terminated => f.write_str("terminated"),
            TerminationOutcome::NotFound => f.write_str("process not found"),
            TerminationOutcome::Denied => f.write_str("permission denied"),
            TerminationOutcome::Failed(msg) => f.write_str(msg),
        }
    }
}

impl<P: SnapshotProvider, S: Signaller> Manager<P, S> {
    /// Signals exactly one pid. The delivery result is the answer; whether the
    /// process actually exits afterwards is not checked.
    pub fn terminate_pid(&self, pid: u32) -> TerminationOutcome {
        let outcome = TerminationOutcome::from(self.signaller.terminate(pid));
        if !outcome.is_success() {
            log::warn!("Termination of PID {} failed: {}", pid, outcome);
        }
        outcome
    }
}
