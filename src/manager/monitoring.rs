use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::error::ProcessError;
use crate::manager::Manager;
use crate::manager::operations::Signaller;
use crate::process::{ProcessRecord, SnapshotProvider, Target};

//Longest stretch the wait goes without looking at the cancel flag
const CANCEL_POLL: Duration = Duration::from_millis(50);

/// Operator stop request, shared with whatever observes the interrupt.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    /// The underlying flag, for registering with a signal handler.
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSample {
    pub timestamp: DateTime<Local>,
    pub pid: u32,
    pub cpu_percent: Option<f32>,
    pub memory_percent: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    Started { pid: u32, name: String },
    Sample(MonitorSample),
    ProcessEnded { pid: u32 },
    Cancelled,
}

/// How a monitor run stopped. Both are normal endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorExit {
    Cancelled,
    ProcessEnded,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    Sample(MonitorSample),
    Ended,
}

/// A monitor bound to one pid, resolved once when the session starts.
///
/// The pid is never re-resolved: if it is recycled by the kernel, later
/// ticks describe whatever process now owns it.
#[derive(Debug, Clone)]
pub struct MonitorSession {
    target: ProcessRecord,
}

impl MonitorSession {
    pub fn pid(&self) -> u32 {
        self.target.pid()
    }

    pub fn name(&self) -> &str {
        self.target.name()
    }

    /// Re-samples the session's pid once.
    pub fn tick<P: SnapshotProvider>(&self, provider: &P) -> Result<Tick, ProcessError> {
        match provider.get_process(self.pid()) {
            Ok(record) => Ok(Tick::Sample(MonitorSample {
                timestamp: Local::now(),
                pid: record.pid(),
                cpu_percent: record.cpu_percent(),
                memory_percent: record.memory_percent(),
            })),
            Err(e) if e.is_not_found() => Ok(Tick::Ended),
            Err(e) => Err(e),
        }
    }
}

/// Blocks for `interval`, returning false as soon as `cancel` is set.
fn wait_interval(interval: Duration, cancel: &CancelToken) -> bool {
    let deadline = Instant::now() + interval;
    loop {
        if cancel.is_cancelled() {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep((deadline - now).min(CANCEL_POLL));
    }
}

impl<P: SnapshotProvider, S: Signaller> Manager<P, S> {
    /// Resolves the target to a single pid: the pid itself, or the first name match.
    pub fn start_monitor(&self, target: &Target) -> Result<MonitorSession, ProcessError> {
        let record = self.resolve_first(target)?;
        log::info!("Monitoring process: PID={}, Name={}", record.pid(), record.name());
        Ok(MonitorSession { target: record })
    }

    /// Samples the target every `interval` until it exits or `cancel` is set.
    ///
    /// `sink` receives `Started` once the target is resolved, then each sample,
    /// then exactly one `ProcessEnded` or `Cancelled`.
    /// Errors are only returned for failures to resolve the target or for
    /// unexpected read failures; the target disappearing is a normal exit.
    pub fn monitor<F>(
        &self,
        target: &Target,
        interval: Duration,
        cancel: &CancelToken,
        mut sink: F,
    ) -> Result<MonitorExit, ProcessError>
    where
        F: FnMut(MonitorEvent),
    {
        if interval.is_zero() {
            return Err(ProcessError::InvalidInput(
                "monitor interval must be positive".to_string(),
            ));
        }

        let session = self.start_monitor(target)?;
        sink(MonitorEvent::Started {
            pid: session.pid(),
            name: session.name().to_string(),
        });

        loop {
            if !wait_interval(interval, cancel) {
                log::info!("Monitoring of PID {} cancelled", session.pid());
                sink(MonitorEvent::Cancelled);
                return Ok(MonitorExit::Cancelled);
            }

            match session.tick(&self.provider)? {
                Tick::Sample(sample) => sink(MonitorEvent::Sample(sample)),
                Tick::Ended => {
                    log::info!("Monitored PID {} ended", session.pid());
                    sink(MonitorEvent::ProcessEnded { pid: session.pid() });
                    return Ok(MonitorExit::ProcessEnded);
                }
            }
        }
    }
}

/// Converts an operator-supplied number of seconds into an interval.
pub fn interval_from_secs(secs: f64) -> Result<Duration, ProcessError> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ProcessError::InvalidInput(format!(
            "interval must be a positive number of seconds, got {}",
            secs
        )));
    }
    Duration::try_from_secs_f64(secs)
        .map_err(|e| ProcessError::InvalidInput(format!("interval {}: {}", secs, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_returns_early_when_cancelled() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let started = Instant::now();
        assert!(!wait_interval(Duration::from_secs(10), &cancel));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn wait_completes_without_cancel() {
        let cancel = CancelToken::new();
        assert!(wait_interval(Duration::from_millis(10), &cancel));
    }

    #[test]
    fn cancel_token_resets() {
        let cancel = CancelToken::new();
        let shared = cancel.clone();
        shared.cancel();
        assert!(cancel.is_cancelled());
        cancel.reset();
        assert!(!shared.is_cancelled());
    }

    #[test]
    fn intervals_must_be_positive() {
        assert_eq!(interval_from_secs(1.5).unwrap(), Duration::from_millis(1500));
        assert!(interval_from_secs(0.0).is_err());
        assert!(interval_from_secs(-1.0).is_err());
        assert!(interval_from_secs(f64::NAN).is_err());
    }
}
