//! Core types shared across the agent: errors, specs, batched environment
//! records, and target network updates.

pub mod error;
pub mod spec;
pub mod target_network;
pub mod time_step;

pub use error::DdpgError;
pub use spec::{ActionSpec, TimeStepSpec};
pub use target_network::{hard_copy, soft_update, TargetUpdater};
pub use time_step::{StepType, TimeStepBatch, Trajectory};
