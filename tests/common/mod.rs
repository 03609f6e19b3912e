#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use procman::manager::operations::{SignalOutcome, Signaller};
use procman::{Manager, Metric, ProcessError, ProcessRecord, ProcessState, SnapshotProvider};

struct FakeProcess {
    record: ProcessRecord,
    owner: Option<u32>,
    //None = never exits; Some(n) = n more successful lookups
    lookups_left: Option<usize>,
}

/// A fabricated process table, listed in insertion order.
#[derive(Default)]
pub struct FakeProvider {
    processes: RefCell<Vec<FakeProcess>>,
    lookups: RefCell<HashMap<u32, usize>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, pid: u32, name: &str, cpu: Option<f32>, memory: Option<f32>) -> Self {
        let record = ProcessRecord::new(pid, name, ProcessState::Running)
            .with_cpu(cpu)
            .with_memory(memory);
        self.processes.borrow_mut().push(FakeProcess {
            record,
            owner: Some(1000),
            lookups_left: None,
        });
        self
    }

    pub fn owned_by(self, pid: u32, owner: Option<u32>) -> Self {
        for p in self.processes.borrow_mut().iter_mut() {
            if p.record.pid() == pid {
                p.owner = owner;
            }
        }
        self
    }

    /// The pid answers `get_process` this many more times, then is gone.
    /// It keeps showing up in listings, like a process that exits between
    /// enumeration and inspection.
    pub fn alive_for(self, pid: u32, lookups: usize) -> Self {
        for p in self.processes.borrow_mut().iter_mut() {
            if p.record.pid() == pid {
                p.lookups_left = Some(lookups);
            }
        }
        self
    }

    pub fn lookups(&self, pid: u32) -> usize {
        self.lookups.borrow().get(&pid).copied().unwrap_or(0)
    }
}

impl SnapshotProvider for FakeProvider {
    fn list_processes(
        &self,
        fields: &[Metric],
    ) -> Result<Box<dyn Iterator<Item = ProcessRecord> + '_>, ProcessError> {
        let want_cpu = fields.contains(&Metric::Cpu);
        let want_memory = fields.contains(&Metric::Memory);
        let records: Vec<ProcessRecord> = self
            .processes
            .borrow()
            .iter()
            .map(|p| {
                let r = &p.record;
                ProcessRecord::new(r.pid(), r.name(), r.status())
                    .with_cpu(if want_cpu { r.cpu_percent() } else { None })
                    .with_memory(if want_memory { r.memory_percent() } else { None })
            })
            .collect();
        Ok(Box::new(records.into_iter()))
    }

    fn get_process(&self, pid: u32) -> Result<ProcessRecord, ProcessError> {
        *self.lookups.borrow_mut().entry(pid).or_insert(0) += 1;
        let mut processes = self.processes.borrow_mut();
        let process = processes
            .iter_mut()
            .find(|p| p.record.pid() == pid)
            .ok_or(ProcessError::NotFound(pid))?;
        match process.lookups_left {
            Some(0) => Err(ProcessError::NotFound(pid)),
            Some(ref mut left) => {
                *left -= 1;
                Ok(process.record.clone())
            }
            None => Ok(process.record.clone()),
        }
    }

    fn owner_of(&self, pid: u32) -> Result<Option<u32>, ProcessError> {
        self.processes
            .borrow()
            .iter()
            .find(|p| p.record.pid() == pid)
            .map(|p| p.owner)
            .ok_or(ProcessError::NotFound(pid))
    }
}

/// Records every pid it is asked to signal; outcomes default to delivered.
#[derive(Default)]
pub struct FakeSignaller {
    outcomes: HashMap<u32, SignalOutcome>,
    signalled: RefCell<Vec<u32>>,
}

impl FakeSignaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, pid: u32, outcome: SignalOutcome) -> Self {
        self.outcomes.insert(pid, outcome);
        self
    }

    pub fn signalled(&self) -> Vec<u32> {
        self.signalled.borrow().clone()
    }
}

impl Signaller for FakeSignaller {
    fn terminate(&self, pid: u32) -> SignalOutcome {
        self.signalled.borrow_mut().push(pid);
        self.outcomes
            .get(&pid)
            .cloned()
            .unwrap_or(SignalOutcome::Delivered)
    }
}

/// The three-process table used across the tests.
pub fn worker_table() -> FakeProvider {
    FakeProvider::new()
        .with(100, "worker", Some(5.0), Some(1.5))
        .with(101, "worker", Some(2.0), Some(3.0))
        .with(200, "idle", Some(0.1), Some(0.2))
}

pub fn manager(provider: FakeProvider) -> Manager<FakeProvider, FakeSignaller> {
    Manager::new(provider, FakeSignaller::new())
}
