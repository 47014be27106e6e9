//! Training diagnostics for the DDPG agent.
//!
//! ## Summaries
//!
//! - [`TensorSummary`]: min/max/mean/std of one tensor
//! - [`VariableSummary`]: per-parameter summary of a network
//!
//! ## Loggers
//!
//! - [`ConsoleLogger`]: tabular console output
//! - [`CSVLogger`]: CSV file logging for analysis
//! - [`MultiLogger`]: combine multiple loggers

pub mod logger;
pub mod summaries;

pub use logger::{CSVLogger, ConsoleLogger, MetricsLogger, MultiLogger};
pub use summaries::{parameter_values, variable_summaries, TensorSummary, VariableSummary};
