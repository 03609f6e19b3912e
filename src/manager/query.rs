use crate::error::ProcessError;
use crate::manager::Manager;
use crate::manager::operations::Signaller;
use crate::process::{Metric, ProcessRecord, SnapshotProvider, Target};

impl<P: SnapshotProvider, S: Signaller> Manager<P, S> {
    /// Highest `limit` processes by `metric`, descending.
    ///
    /// Processes without a value for the metric are dropped before ranking.
    /// The sort is stable, so equal values keep enumeration order; no
    /// secondary key is applied.
    pub fn top_by_metric(
        &self,
        metric: Metric,
        limit: usize,
    ) -> Result<Vec<ProcessRecord>, ProcessError> {
        let mut ranked: Vec<(f32, ProcessRecord)> = self
            .provider
            .list_processes(&[metric])?
            .filter_map(|record| metric.value(&record).map(|value| (value, record)))
            .collect();

        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
        ranked.truncate(limit);

        Ok(ranked.into_iter().map(|(_, record)| record).collect())
    }

    /// Every process whose name contains `needle`, ignoring case.
    /// No match is an empty result, not an error.
    pub fn search_by_name(&self, needle: &str) -> Result<Vec<ProcessRecord>, ProcessError> {
        self.resolve_all(needle)
    }

    pub fn search_by_pid(&self, pid: u32) -> Result<ProcessRecord, ProcessError> {
        self.provider.get_process(pid)
    }

    /// Single-process lookup including the owning uid.
    ///
    /// `NotFound` when the pid does not exist or exits during sampling.
    /// Refused metrics come back as absent fields on an otherwise valid record.
    pub fn info_for(&self, pid: u32) -> Result<ProcessRecord, ProcessError> {
        let record = self.provider.get_process(pid)?;
        let owner = self.provider.owner_of(pid)?;
        Ok(record.with_owner(owner))
    }

    /// Resolution policy for bulk actions: all current name matches.
    pub fn resolve_all(&self, needle: &str) -> Result<Vec<ProcessRecord>, ProcessError> {
        let needle = needle.to_lowercase();
        Ok(self
            .provider
            .list_processes(&[])?
            .filter(|record| record.name_contains(&needle))
            .collect())
    }

    /// Resolution policy for single-target actions: the first match in
    /// enumeration order, or `NotFound` / `NoMatch`. An empty name is
    /// `InvalidInput`.
    pub fn resolve_first(&self, target: &Target) -> Result<ProcessRecord, ProcessError> {
        match target {
            Target::Pid(pid) => self.provider.get_process(*pid),
            Target::Name(needle) => {
                let needle = required_name(needle)?;
                self.provider
                    .list_processes(&[])?
                    .find(|record| record.name_contains(needle))
                    .ok_or_else(|| ProcessError::NoMatch(needle.to_string()))
            }
        }
    }
}

//An empty name matches everything: fine for a search, never for a kill or a monitor
pub(crate) fn required_name(needle: &str) -> Result<&str, ProcessError> {
    if needle.trim().is_empty() {
        return Err(ProcessError::InvalidInput(
            "a process name or PID is required".to_string(),
        ));
    }
    Ok(needle)
}
