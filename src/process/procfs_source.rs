use std::collections::HashMap;
use std::thread;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use procfs::process::{Process as ProcfsProcess, Stat};
use procfs::{Current, Meminfo, ProcError};

use crate::error::ProcessError;
use crate::process::{Metric, ProcessRecord, ProcessState, SnapshotProvider};

/// CPU time of one process at one instant, the baseline for a rate.
#[derive(Debug, Clone, Copy)]
struct CpuSample {
    total_ticks: u64, //utime + stime
    taken_at: Instant,
}

/// Snapshot provider backed by the Linux /proc filesystem.
#[derive(Debug, Clone)]
pub struct ProcfsSource {
    cpu_window: Duration,
    ticks_per_second: f64,
    page_size: u64,
}

impl ProcfsSource {
    pub fn new(cpu_window: Duration) -> Self {
        ProcfsSource {
            cpu_window,
            ticks_per_second: procfs::ticks_per_second() as f64,
            page_size: procfs::page_size(),
        }
    }

    fn sample_cpu(pid: i32) -> Result<CpuSample, ProcError> {
        let stat = ProcfsProcess::new(pid)?.stat()?;
        Ok(CpuSample {
            total_ticks: total_ticks(&stat),
            taken_at: Instant::now(),
        })
    }

    fn cpu_since(&self, stat: &Stat, baseline: &CpuSample) -> Option<f32> {
        let delta = total_ticks(stat).saturating_sub(baseline.total_ticks);
        cpu_percent(delta, self.ticks_per_second, baseline.taken_at.elapsed())
    }

    fn memory_of(&self, stat: &Stat, mem_total: Option<u64>) -> Option<f32> {
        let rss_bytes = stat.rss * self.page_size;
        mem_total.and_then(|total| memory_percent(rss_bytes, total))
    }

    //Reads one record for a listing. Any error means "skip this process".
    fn read_listed(
        &self,
        pid: i32,
        baseline: Option<&CpuSample>,
        mem_total: Option<u64>,
    ) -> Result<ProcessRecord, ProcError> {
        let stat = ProcfsProcess::new(pid)?.stat()?;
        let cpu = baseline.and_then(|b| self.cpu_since(&stat, b));
        Ok(ProcessRecord::new(pid as u32, stat.comm.clone(), ProcessState::from_stat_char(stat.state))
            .with_cpu(cpu)
            .with_memory(self.memory_of(&stat, mem_total)))
    }
}

impl Default for ProcfsSource {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

impl SnapshotProvider for ProcfsSource {
    fn list_processes(
        &self,
        fields: &[Metric],
    ) -> Result<Box<dyn Iterator<Item = ProcessRecord> + '_>, ProcessError> {
        let procfs_processes = procfs::process::all_processes()
            .map_err(|e| ProcessError::ProcTable(e.to_string()))?;

        //Only the pid is kept from enumeration; everything else is re-read per record
        let pids: Vec<i32> = procfs_processes
            .filter_map(|p| p.ok())
            .map(|p| p.pid)
            .collect();

        //One shared measurement window for the whole listing
        let baselines: HashMap<i32, CpuSample> = if fields.contains(&Metric::Cpu) {
            let primed = pids
                .iter()
                .filter_map(|&pid| Self::sample_cpu(pid).ok().map(|s| (pid, s)))
                .collect();
            thread::sleep(self.cpu_window);
            primed
        } else {
            HashMap::new()
        };

        let mem_total = if fields.contains(&Metric::Memory) {
            current_mem_total()
        } else {
            None
        };

        Ok(Box::new(pids.into_iter().filter_map(move |pid| {
            match self.read_listed(pid, baselines.get(&pid), mem_total) {
                Ok(record) => Some(record),
                Err(e) => {
                    //Ignore processes that vanished between listing and reading their data
                    if !is_gone(&e) {
                        log::debug!("Skipping PID {}: {}", pid, e);
                    }
                    None
                }
            }
        })))
    }

    fn get_process(&self, pid: u32) -> Result<ProcessRecord, ProcessError> {
        let raw_pid = i32::try_from(pid).map_err(|_| ProcessError::NotFound(pid))?;
        let process = ProcfsProcess::new(raw_pid).map_err(|e| classify(pid, e))?;

        let first = process.stat().map_err(|e| classify(pid, e))?;
        let baseline = CpuSample {
            total_ticks: total_ticks(&first),
            taken_at: Instant::now(),
        };

        thread::sleep(self.cpu_window);

        //A process that exits inside the window is reported as gone, not as 0% CPU
        let (cpu, latest) = match process.stat() {
            Ok(second) => (self.cpu_since(&second, &baseline), second),
            Err(e) => match classify(pid, e) {
                ProcessError::PermissionDenied(_) => (None, first),
                other => return Err(other),
            },
        };

        Ok(ProcessRecord::new(pid, latest.comm.clone(), ProcessState::from_stat_char(latest.state))
            .with_cpu(cpu)
            .with_memory(self.memory_of(&latest, current_mem_total())))
    }

    fn owner_of(&self, pid: u32) -> Result<Option<u32>, ProcessError> {
        let raw_pid = i32::try_from(pid).map_err(|_| ProcessError::NotFound(pid))?;
        let status = ProcfsProcess::new(raw_pid).and_then(|p| p.status());
        match status {
            Ok(status) => Ok(Some(status.ruid)),
            Err(e) => match classify(pid, e) {
                ProcessError::PermissionDenied(_) => Ok(None),
                other => Err(other),
            },
        }
    }
}

fn total_ticks(stat: &Stat) -> u64 {
    stat.utime + stat.stime
}

fn current_mem_total() -> Option<u64> {
    match Meminfo::current() {
        Ok(meminfo) => Some(meminfo.mem_total),
        Err(e) => {
            log::debug!("Could not read /proc/meminfo: {}", e);
            None
        }
    }
}

/// Rate of CPU use between two readings, in percent of one core.
/// A multi-threaded process can exceed 100.
pub(crate) fn cpu_percent(delta_ticks: u64, ticks_per_second: f64, elapsed: Duration) -> Option<f32> {
    let wall = elapsed.as_secs_f64();
    if wall <= 0.0 || ticks_per_second <= 0.0 {
        return None;
    }
    let cpu_seconds = delta_ticks as f64 / ticks_per_second;
    Some((cpu_seconds / wall * 100.0) as f32)
}

pub(crate) fn memory_percent(rss_bytes: u64, mem_total: u64) -> Option<f32> {
    if mem_total == 0 {
        return None;
    }
    Some((rss_bytes as f64 / mem_total as f64 * 100.0) as f32)
}

//A vanished process shows up as a missing file, a short read, or ESRCH on the held directory fd
fn is_gone(err: &ProcError) -> bool {
    match err {
        ProcError::NotFound(_) | ProcError::Incomplete(_) => true,
        ProcError::Io(e, _) => e.raw_os_error() == Some(Errno::ESRCH as i32),
        _ => false,
    }
}

fn classify(pid: u32, err: ProcError) -> ProcessError {
    if is_gone(&err) {
        return ProcessError::NotFound(pid);
    }
    match err {
        ProcError::PermissionDenied(_) => ProcessError::PermissionDenied(pid),
        other => ProcessError::ProcTable(format!("PID {}: {}", pid, other)),
    }
}
