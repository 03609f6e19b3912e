use std::fmt;
use std::str::FromStr;

use crate::error::ProcessError;

//1. Declare submodules
pub mod procfs_source;
pub mod target;

pub use procfs_source::ProcfsSource;
pub use target::Target;


//Process state

/// OS-reported scheduling state. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Sleeping,
    DiskSleep,
    Zombie,
    Stopped,
    TracingStop,
    Dead,
    Idle,
    Unknown,
}

impl ProcessState {
    /// Parse state from the /proc/[pid]/stat state character
    pub fn from_stat_char(c: char) -> Self {
        match c {
            'R' => ProcessState::Running,
            'S' => ProcessState::Sleeping,
            'D' => ProcessState::DiskSleep,
            'Z' => ProcessState::Zombie,
            'T' => ProcessState::Stopped,
            't' => ProcessState::TracingStop,
            'X' | 'x' => ProcessState::Dead,
            'I' => ProcessState::Idle,
            _ => ProcessState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessState::Running => "running",
            ProcessState::Sleeping => "sleeping",
            ProcessState::DiskSleep => "disk-sleep",
            ProcessState::Zombie => "zombie",
            ProcessState::Stopped => "stopped",
            ProcessState::TracingStop => "tracing-stop",
            ProcessState::Dead => "dead",
            ProcessState::Idle => "idle",
            ProcessState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


//Metrics

/// A rankable per-process metric. Also used as the field selector for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Cpu,
    Memory,
}

impl Metric {
    pub fn value(&self, record: &ProcessRecord) -> Option<f32> {
        match self {
            Metric::Cpu => record.cpu_percent,
            Metric::Memory => record.memory_percent,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Cpu => "CPU%",
            Metric::Memory => "MEM%",
        }
    }
}

impl FromStr for Metric {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(Metric::Cpu),
            "mem" | "memory" => Ok(Metric::Memory),
            other => Err(ProcessError::InvalidInput(format!(
                "unknown metric '{}', expected cpu or mem",
                other
            ))),
        }
    }
}


//Main snapshot structure

/// Point-in-time snapshot of one process.
///
/// Metric fields are `None` when the OS refused access or no sampling window
/// elapsed; they are never defaulted to zero. A record is never updated after
/// construction: re-sampling a pid yields a new record. Pids are recycled by
/// the kernel and a record makes no attempt to detect that.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRecord {
    pid: u32,
    name: String,
    status: ProcessState,
    cpu_percent: Option<f32>,
    memory_percent: Option<f32>,
    owner_id: Option<u32>,
}

impl ProcessRecord {
    pub fn new(pid: u32, name: impl Into<String>, status: ProcessState) -> Self {
        ProcessRecord {
            pid,
            name: name.into(),
            status,
            cpu_percent: None,
            memory_percent: None,
            owner_id: None,
        }
    }

    pub fn with_cpu(mut self, cpu_percent: Option<f32>) -> Self {
        self.cpu_percent = cpu_percent;
        self
    }

    pub fn with_memory(mut self, memory_percent: Option<f32>) -> Self {
        self.memory_percent = memory_percent;
        self
    }

    pub fn with_owner(mut self, owner_id: Option<u32>) -> Self {
        self.owner_id = owner_id;
        self
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> ProcessState {
        self.status
    }

    pub fn cpu_percent(&self) -> Option<f32> {
        self.cpu_percent
    }

    pub fn memory_percent(&self) -> Option<f32> {
        self.memory_percent
    }

    pub fn owner_id(&self) -> Option<u32> {
        self.owner_id
    }

    /// Case-insensitive containment match used by search, kill and monitor.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}


//Provider capability

/// Source of process snapshots.
///
/// Injected into the manager so queries and lifecycle actions can run
/// against a fabricated process table.
pub trait SnapshotProvider {
    /// Enumerates every visible process. Only the enumeration itself can fail;
    /// a process that cannot be read (usually because it exited) is skipped.
    /// Each call re-enumerates and the order is whatever the OS yields.
    fn list_processes(
        &self,
        fields: &[Metric],
    ) -> Result<Box<dyn Iterator<Item = ProcessRecord> + '_>, ProcessError>;

    /// Samples one process, blocking for the CPU measurement window.
    /// Returns `NotFound` if the pid is gone before the window completes.
    fn get_process(&self, pid: u32) -> Result<ProcessRecord, ProcessError>;

    /// Real uid of the owning account, `None` when access is refused.
    fn owner_of(&self, pid: u32) -> Result<Option<u32>, ProcessError>;
}
