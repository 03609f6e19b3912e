use crate::error::ProcessError;
use crate::manager::Manager;
use crate::manager::operations::{Signaller, TerminationOutcome};
use crate::manager::query::required_name;
use crate::process::{SnapshotProvider, Target};

/// One (pid, outcome) pair of a termination request.
#[derive(Debug, Clone, PartialEq)]
pub struct PidOutcome {
    pub pid: u32,
    pub name: Option<String>,
    pub outcome: TerminationOutcome,
}

/// Result of `terminate`: one entry for a pid target, one per match for a
/// name target (possibly none). An empty name is rejected before anything
/// is signalled.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminationReport {
    pub target: Target,
    pub outcomes: Vec<PidOutcome>,
}

impl TerminationReport {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl<P: SnapshotProvider, S: Signaller> Manager<P, S> {
    pub fn terminate(&self, target: &Target) -> Result<TerminationReport, ProcessError> {
        let outcomes = match target {
            Target::Pid(pid) => vec![PidOutcome {
                pid: *pid,
                name: None,
                outcome: self.terminate_pid(*pid),
            }],
            Target::Name(needle) => self.terminate_matching(needle)?,
        };

        Ok(TerminationReport {
            target: target.clone(),
            outcomes,
        })
    }

    //Signals every current match independently; a failure is recorded and the rest still get signalled
    fn terminate_matching(&self, needle: &str) -> Result<Vec<PidOutcome>, ProcessError> {
        let own_pid = std::process::id();
        let needle = required_name(needle)?;
        let matches = self.resolve_all(needle)?;

        let mut outcomes = Vec::with_capacity(matches.len());
        let mut failed_kills = 0;

        for record in matches {
            if record.pid() == own_pid {
                log::info!("Not signalling own process (PID {})", own_pid);
                continue;
            }
            let outcome = self.terminate_pid(record.pid());
            if !outcome.is_success() {
                failed_kills += 1;
            }
            outcomes.push(PidOutcome {
                pid: record.pid(),
                name: Some(record.name().to_string()),
                outcome,
            });
        }

        if failed_kills > 0 {
            log::warn!(
                "Signalled {} of {} processes matching '{}'",
                outcomes.len() - failed_kills,
                outcomes.len(),
                needle
            );
        }

        Ok(outcomes)
    }
}
