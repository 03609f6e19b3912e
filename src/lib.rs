//! Inspect, rank, search, signal and poll the processes of the local host.
//!
//! The engine reads the process table through a [`process::SnapshotProvider`]
//! and signals through a [`manager::operations::Signaller`], so everything in
//! [`manager`] can run against a fabricated process set.

pub mod cli;
pub mod config;
pub mod error;
pub mod manager;
pub mod process;
pub mod user;

pub use config::Config;
pub use error::{ConfigError, ProcessError};
pub use manager::Manager;
pub use process::{Metric, ProcessRecord, ProcessState, ProcfsSource, SnapshotProvider, Target};
