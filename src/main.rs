use anyhow::Context;
use clap::Parser;

use procman::cli::{self, CommandArgs, Interrupts};
use procman::manager::NixSignaller;
use procman::{Config, Manager, ProcfsSource};

fn main() -> anyhow::Result<()> {
    let args = CommandArgs::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = Config::resolve(args.config.as_deref()).context("Failed to load configuration")?;
    log::debug!("Using configuration: {:?}", config);

    //The engine only ever talks to /proc and kill(2) through these two
    let manager = Manager::new(ProcfsSource::new(config.sampling.cpu_window()), NixSignaller);

    let interrupts = Interrupts::install().context("Failed to install Ctrl+C handler")?;

    cli::run(args.command.as_ref(), &config, &manager, &interrupts)
}
