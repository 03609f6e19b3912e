use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::ProcessError;
use crate::process::{Metric, Target};

/// procman - inspect, search, signal and watch local processes
///
/// Without a subcommand an interactive menu is started.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Path to a TOML config file
    #[arg(short, long, env = "PROCMAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the busiest processes by CPU or memory
    Top {
        /// Metric to rank by (cpu, mem)
        #[arg(short, long, default_value = "cpu")]
        by: Metric,

        /// Number of processes to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Search by name substring or by PID
    Search(TargetArgs),

    /// Show details for one PID
    Info {
        pid: u32,
    },

    /// Send SIGTERM to a PID or to every process whose name matches
    Kill(TargetArgs),

    /// Sample a process repeatedly until it exits or Ctrl+C
    Monitor {
        #[command(flatten)]
        target: TargetArgs,

        /// Seconds between samples
        #[arg(short, long)]
        interval: Option<f64>,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct TargetArgs {
    /// Case-insensitive name substring
    #[arg(long)]
    pub name: Option<String>,

    /// Process ID
    #[arg(long)]
    pub pid: Option<u32>,
}

impl TargetArgs {
    pub fn target(&self) -> Result<Target, ProcessError> {
        match (&self.name, self.pid) {
            (_, Some(pid)) => Target::from_pid(pid),
            (Some(name), None) => Ok(Target::name(name)),
            (None, None) => Err(ProcessError::InvalidInput(
                "either --name or --pid is required".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_top_with_memory() {
        let args = CommandArgs::try_parse_from(["procman", "top", "--by", "mem", "-n", "3"]).unwrap();
        match args.command {
            Some(Command::Top { by, limit }) => {
                assert_eq!(by, Metric::Memory);
                assert_eq!(limit, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn kill_requires_exactly_one_selector() {
        assert!(CommandArgs::try_parse_from(["procman", "kill"]).is_err());
        assert!(CommandArgs::try_parse_from(["procman", "kill", "--name", "a", "--pid", "1"]).is_err());

        let args = CommandArgs::try_parse_from(["procman", "kill", "--name", "worker"]).unwrap();
        match args.command {
            Some(Command::Kill(target)) => {
                assert_eq!(target.target().unwrap(), Target::Name("worker".into()))
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn no_subcommand_means_menu() {
        let args = CommandArgs::try_parse_from(["procman"]).unwrap();
        assert!(args.command.is_none());
    }
}
