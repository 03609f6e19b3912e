use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::Result;

use crate::cli::commands;
use crate::cli::interrupt::Interrupts;
use crate::cli::render;
use crate::config::Config;
use crate::error::ProcessError;
use crate::manager::Manager;
use crate::manager::monitoring::interval_from_secs;
use crate::manager::operations::Signaller;
use crate::process::target::pid_from_input;
use crate::process::{Metric, SnapshotProvider, Target};

const MENU: &str = "\n--- Process Manager ---
1. Get top CPU processes
2. Get top memory processes
3. Get process info by PID
4. Search process by name or PID
5. Kill process by PID or name
6. Monitor a process
7. Exit";

/// Interactive text menu. Reads one request at a time and never exits on a
/// bad request; only the exit choice, end of input or Ctrl+C while idle end it.
pub struct Menu<'a, P, S, R, W> {
    manager: &'a Manager<P, S>,
    config: &'a Config,
    interrupts: &'a Interrupts,
    input: R,
    out: W,
}

impl<'a, P, S, R, W> Menu<'a, P, S, R, W>
where
    P: SnapshotProvider,
    S: Signaller,
    R: BufRead,
    W: Write,
{
    pub fn new(
        manager: &'a Manager<P, S>,
        config: &'a Config,
        interrupts: &'a Interrupts,
        input: R,
        out: W,
    ) -> Self {
        Menu {
            manager,
            config,
            interrupts,
            input,
            out,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.out, "{}", MENU)?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return Ok(());
            };

            let handled = match choice.as_str() {
                "1" => self.top(Metric::Cpu),
                "2" => self.top(Metric::Memory),
                "3" => self.info(),
                "4" => self.search(),
                "5" => self.kill(),
                "6" => self.monitor(),
                "7" => {
                    writeln!(self.out, "Exiting Process Manager. Goodbye!")?;
                    return Ok(());
                }
                _ => {
                    writeln!(self.out, "Invalid choice. Please try again.")?;
                    Ok(Step::Continue)
                }
            };

            match handled {
                Ok(Step::Continue) => {}
                Ok(Step::EndOfInput) => return Ok(()),
                //Engine errors are reported and the menu carries on; I/O errors end it
                Err(e) => match e.downcast_ref::<ProcessError>() {
                    Some(err) => render::error(&mut self.out, err)?,
                    None => return Err(e),
                },
            }
        }
    }

    /// Returns the trimmed line, or `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}", label)?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    //Asks "by name/pid" and then for the value; `None` at end of input
    fn prompt_target(&mut self, verb: &str) -> Result<Option<Target>> {
        let Some(kind) = self.prompt(&format!("{} by (name/pid): ", verb))? else {
            return Ok(None);
        };
        let label = match kind.to_lowercase().as_str() {
            "name" => "Enter process name: ",
            "pid" => "Enter PID: ",
            _ => return Err(ProcessError::InvalidInput(format!("unknown selector '{}'", kind)).into()),
        };
        let Some(value) = self.prompt(label)? else {
            return Ok(None);
        };
        Ok(Some(Target::from_selector(&kind, &value)?))
    }

    fn top(&mut self, metric: Metric) -> Result<Step> {
        commands::top(self.manager, &mut self.out, metric, self.config.query.default_limit)?;
        Ok(Step::Continue)
    }

    fn info(&mut self) -> Result<Step> {
        let Some(value) = self.prompt("Enter PID: ")? else {
            return Ok(Step::EndOfInput);
        };
        let pid = pid_from_input(&value)?;
        commands::info(self.manager, &mut self.out, pid)?;
        Ok(Step::Continue)
    }

    fn search(&mut self) -> Result<Step> {
        let Some(target) = self.prompt_target("Search")? else {
            return Ok(Step::EndOfInput);
        };
        commands::search(self.manager, &mut self.out, &target)?;
        Ok(Step::Continue)
    }

    fn kill(&mut self) -> Result<Step> {
        let Some(target) = self.prompt_target("Kill")? else {
            return Ok(Step::EndOfInput);
        };
        commands::kill(self.manager, &mut self.out, &target)?;
        Ok(Step::Continue)
    }

    //Blank input keeps the configured interval
    fn prompt_interval(&mut self) -> Result<Option<Duration>> {
        let default = self.config.monitor.interval_secs;
        let Some(value) = self.prompt(&format!("Interval in seconds [{}]: ", default))? else {
            return Ok(None);
        };
        let secs = if value.is_empty() {
            default
        } else {
            value
                .parse::<f64>()
                .map_err(|_| ProcessError::InvalidInput(format!("'{}' is not a valid interval", value)))?
        };
        Ok(Some(interval_from_secs(secs)?))
    }

    fn monitor(&mut self) -> Result<Step> {
        let Some(target) = self.prompt_target("Monitor")? else {
            return Ok(Step::EndOfInput);
        };
        let Some(interval) = self.prompt_interval()? else {
            return Ok(Step::EndOfInput);
        };
        commands::monitor(self.manager, &mut self.out, &target, interval, self.interrupts)?;
        Ok(Step::Continue)
    }
}

enum Step {
    Continue,
    EndOfInput,
}
