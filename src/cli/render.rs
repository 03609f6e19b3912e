//! Plain-text rendering of engine results.

use std::io::{self, Write};

use crate::error::ProcessError;
use crate::manager::batch::TerminationReport;
use crate::manager::MonitorEvent;
use crate::process::{Metric, ProcessRecord};
use crate::user::Owner;

fn pct(value: Option<f32>) -> String {
    match value {
        Some(v) => format!("{:.1}", v),
        None => "n/a".to_string(),
    }
}

pub fn top<W: Write>(out: &mut W, metric: Metric, limit: usize, records: &[ProcessRecord]) -> io::Result<()> {
    writeln!(out, "\nTop {} processes by {} usage:", limit, metric.label())?;
    if records.is_empty() {
        writeln!(out, "No processes report {}.", metric.label())?;
    }
    for record in records {
        writeln!(
            out,
            "PID: {}, Name: {}, {}: {}",
            record.pid(),
            record.name(),
            metric.label(),
            pct(metric.value(record))
        )?;
    }
    Ok(())
}

pub fn search<W: Write>(out: &mut W, needle: &str, records: &[ProcessRecord]) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "{}", ProcessError::NoMatch(needle.to_string()));
    }
    for record in records {
        writeln!(out, "Found Process - PID: {}, Name: {}", record.pid(), record.name())?;
    }
    Ok(())
}

pub fn info<W: Write>(out: &mut W, record: &ProcessRecord, owner: Option<&Owner>) -> io::Result<()> {
    writeln!(out, "\nProcess Information:")?;
    writeln!(out, "PID: {}", record.pid())?;
    writeln!(out, "Name: {}", record.name())?;
    writeln!(out, "Status: {}", record.status())?;
    match owner {
        Some(Owner { id, name: Some(name) }) => writeln!(out, "uid: {} ({})", id, name)?,
        Some(Owner { id, name: None }) => writeln!(out, "uid: {}", id)?,
        None => writeln!(out, "uid: n/a")?,
    }
    writeln!(out, "CPU%: {}", pct(record.cpu_percent()))?;
    writeln!(out, "Memory%: {}", pct(record.memory_percent()))
}

pub fn termination<W: Write>(out: &mut W, report: &TerminationReport) -> io::Result<()> {
    if report.is_empty() {
        return writeln!(out, "No process found matching {}.", report.target);
    }
    for entry in &report.outcomes {
        let label = match &entry.name {
            Some(name) => format!("Process {} (PID: {})", name, entry.pid),
            None => format!("Process with PID {}", entry.pid),
        };
        if entry.outcome.is_success() {
            writeln!(out, "{} has been terminated.", label)?;
        } else {
            writeln!(out, "{}: {}", label, entry.outcome)?;
        }
    }
    Ok(())
}

pub fn monitor_event<W: Write>(out: &mut W, event: &MonitorEvent) -> io::Result<()> {
    match event {
        MonitorEvent::Started { pid, name } => {
            writeln!(out, "Monitoring process: PID={}, Name={}", pid, name)?;
            writeln!(out, "Press Ctrl+C to stop monitoring.")
        }
        MonitorEvent::Sample(sample) => writeln!(
            out,
            "[{}] CPU%: {}, Memory%: {}",
            sample.timestamp.format("%H:%M:%S"),
            pct(sample.cpu_percent),
            pct(sample.memory_percent)
        ),
        MonitorEvent::ProcessEnded { pid } => writeln!(out, "Process ended (PID {}).", pid),
        MonitorEvent::Cancelled => writeln!(out, "Monitoring stopped."),
    }
}

pub fn error<W: Write>(out: &mut W, err: &ProcessError) -> io::Result<()> {
    writeln!(out, "{}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessState;

    #[test]
    fn absent_metric_renders_as_na() {
        let record = ProcessRecord::new(12, "kworker", ProcessState::Idle).with_owner(Some(0));
        let mut out = Vec::new();
        info(&mut out, &record, None).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("CPU%: n/a"));
        assert!(text.contains("Status: idle"));
    }

    #[test]
    fn empty_search_is_reported() {
        let mut out = Vec::new();
        search(&mut out, "xyz", &[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "No process found with name containing: xyz\n"
        );
    }
}
