use std::fmt;

use crate::error::ProcessError;

/// Operator selection: a concrete pid or a case-insensitive name substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Pid(u32),
    Name(String),
}

impl Target {
    pub fn parse_pid(input: &str) -> Result<Self, ProcessError> {
        pid_from_input(input).map(Target::Pid)
    }

    pub fn from_pid(pid: u32) -> Result<Self, ProcessError> {
        checked_pid(pid).map(Target::Pid)
    }

    /// Names are taken as typed, minus surrounding whitespace. An empty name
    /// matches every process in a search; kill and monitor refuse it.
    pub fn name(input: &str) -> Self {
        Target::Name(input.trim().to_string())
    }

    /// Builds a target from a "name"/"pid" selector and its value, as the menu asks for them.
    pub fn from_selector(kind: &str, value: &str) -> Result<Self, ProcessError> {
        match kind.trim().to_lowercase().as_str() {
            "name" => Ok(Target::name(value)),
            "pid" => Target::parse_pid(value),
            other => Err(ProcessError::InvalidInput(format!(
                "expected 'name' or 'pid', got '{}'",
                other
            ))),
        }
    }
}

/// Parses a pid typed by the operator. Zero, negatives and values the
/// kernel cannot address are rejected rather than passed to `kill(2)`,
/// where they would select process groups.
pub fn pid_from_input(input: &str) -> Result<u32, ProcessError> {
    let trimmed = input.trim();
    let pid: u32 = trimmed
        .parse()
        .map_err(|_| ProcessError::InvalidInput(format!("'{}' is not a valid PID", trimmed)))?;
    checked_pid(pid)
}

pub fn checked_pid(pid: u32) -> Result<u32, ProcessError> {
    if pid == 0 || i32::try_from(pid).is_err() {
        return Err(ProcessError::InvalidInput(format!("PID {} is out of range", pid)));
    }
    Ok(pid)
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Pid(pid) => write!(f, "PID {}", pid),
            Target::Name(name) => write!(f, "name containing '{}'", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pids() {
        assert_eq!(Target::parse_pid(" 42 ").unwrap(), Target::Pid(42));
        assert!(matches!(Target::parse_pid("0"), Err(ProcessError::InvalidInput(_))));
        assert!(matches!(Target::parse_pid("-1"), Err(ProcessError::InvalidInput(_))));
        assert!(matches!(Target::parse_pid("abc"), Err(ProcessError::InvalidInput(_))));
        assert!(matches!(
            Target::parse_pid("4294967295"),
            Err(ProcessError::InvalidInput(_))
        ));
    }

    #[test]
    fn selector_dispatch() {
        assert_eq!(
            Target::from_selector("NAME", " nginx ").unwrap(),
            Target::Name("nginx".into())
        );
        assert_eq!(Target::from_selector("pid", "7").unwrap(), Target::Pid(7));
        assert!(Target::from_selector("uid", "7").is_err());
    }
}
