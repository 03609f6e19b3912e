//! Operator surface: argument parsing, the interactive menu and text output.

pub mod args;
pub mod commands;
pub mod interrupt;
pub mod menu;
pub mod render;

use std::io::{self, Write};

use anyhow::Result;

use crate::config::Config;
use crate::manager::Manager;
use crate::manager::monitoring::interval_from_secs;
use crate::manager::operations::Signaller;
use crate::process::SnapshotProvider;
use crate::process::target::checked_pid;

pub use args::{Command, CommandArgs};
pub use interrupt::Interrupts;
pub use menu::Menu;

/// Runs one subcommand, or the interactive menu when none was given.
pub fn run<P, S>(
    command: Option<&Command>,
    config: &Config,
    manager: &Manager<P, S>,
    interrupts: &Interrupts,
) -> Result<()>
where
    P: SnapshotProvider,
    S: Signaller,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        None => {
            let stdin = io::stdin();
            Menu::new(manager, config, interrupts, stdin.lock(), &mut out).run()?;
        }
        Some(Command::Top { by, limit }) => {
            let limit = limit.unwrap_or(config.query.default_limit);
            commands::top(manager, &mut out, *by, limit)?;
        }
        Some(Command::Search(target)) => commands::search(manager, &mut out, &target.target()?)?,
        Some(Command::Info { pid }) => commands::info(manager, &mut out, checked_pid(*pid)?)?,
        Some(Command::Kill(target)) => commands::kill(manager, &mut out, &target.target()?)?,
        Some(Command::Monitor { target, interval }) => {
            let interval = interval_from_secs(interval.unwrap_or(config.monitor.interval_secs))?;
            commands::monitor(manager, &mut out, &target.target()?, interval, interrupts)?;
        }
    }

    out.flush()?;
    Ok(())
}
