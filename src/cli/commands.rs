//! Verb implementations shared by the menu and the one-shot subcommands.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;

use crate::cli::interrupt::Interrupts;
use crate::cli::render;
use crate::manager::operations::Signaller;
use crate::manager::{Manager, MonitorExit};
use crate::process::{Metric, SnapshotProvider, Target};
use crate::user::Owner;

pub fn top<P, S, W>(manager: &Manager<P, S>, out: &mut W, metric: Metric, limit: usize) -> Result<()>
where
    P: SnapshotProvider,
    S: Signaller,
    W: Write,
{
    let records = manager.top_by_metric(metric, limit)?;
    render::top(out, metric, limit, &records)?;
    Ok(())
}

pub fn search<P, S, W>(manager: &Manager<P, S>, out: &mut W, target: &Target) -> Result<()>
where
    P: SnapshotProvider,
    S: Signaller,
    W: Write,
{
    match target {
        Target::Name(needle) => {
            let records = manager.search_by_name(needle)?;
            render::search(out, needle, &records)?;
        }
        Target::Pid(pid) => {
            let record = manager.search_by_pid(*pid)?;
            render::search(out, &pid.to_string(), std::slice::from_ref(&record))?;
        }
    }
    Ok(())
}

pub fn info<P, S, W>(manager: &Manager<P, S>, out: &mut W, pid: u32) -> Result<()>
where
    P: SnapshotProvider,
    S: Signaller,
    W: Write,
{
    let record = manager.info_for(pid)?;
    let owner = record.owner_id().map(Owner::resolve);
    render::info(out, &record, owner.as_ref())?;
    Ok(())
}

pub fn kill<P, S, W>(manager: &Manager<P, S>, out: &mut W, target: &Target) -> Result<()>
where
    P: SnapshotProvider,
    S: Signaller,
    W: Write,
{
    let report = manager.terminate(target)?;
    render::termination(out, &report)?;
    Ok(())
}

/// Runs a monitor until the target ends or Ctrl+C. Ctrl+C only stops the
/// monitor; the caller keeps running.
pub fn monitor<P, S, W>(
    manager: &Manager<P, S>,
    out: &mut W,
    target: &Target,
    interval: Duration,
    interrupts: &Interrupts,
) -> Result<MonitorExit>
where
    P: SnapshotProvider,
    S: Signaller,
    W: Write,
{
    let _guard = interrupts.monitoring();
    let mut write_error = None;

    let exit = manager.monitor(target, interval, interrupts.cancel_token(), |event| {
        if write_error.is_none() {
            if let Err(e) = render::monitor_event(out, &event).and_then(|_| out.flush()) {
                write_error = Some(e);
                interrupts.cancel_token().cancel();
            }
        }
    })?;

    if let Some(e) = write_error {
        return Err(e.into());
    }
    Ok(exit)
}
