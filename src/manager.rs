use crate::manager::operations::Signaller;
use crate::process::SnapshotProvider;

pub mod batch;
pub mod monitoring;
pub mod operations;
pub mod query;

pub use batch::TerminationReport;
pub use monitoring::{CancelToken, MonitorEvent, MonitorExit, MonitorSample, MonitorSession, Tick};
pub use operations::{NixSignaller, SignalOutcome, TerminationOutcome};

//Manager struct declaration
//Holds no process data between calls: every operation re-reads the provider.
#[derive(Debug)]
pub struct Manager<P, S> {
    provider: P,
    signaller: S,
}

impl<P: SnapshotProvider, S: Signaller> Manager<P, S> {
    pub fn new(provider: P, signaller: S) -> Self {
        Manager { provider, signaller }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn signaller(&self) -> &S {
        &self.signaller
    }
}
