//! Batched environment records.
//!
//! The environment side of the agent speaks in *time steps*: per-step tuples
//! of (step type, reward, discount, observation). Training consumes a
//! [`Trajectory`], a batch of recorded time steps with a time axis plus the
//! actions the collect policy took, and the transition extractor slices it
//! into aligned [`TimeStepBatch`] pairs.
//!
//! Discounts carry episode termination: a terminal step has discount 0 so the
//! bootstrapped value is excluded downstream. That is a contract on the data
//! produced by the caller, not something these types compute.

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};

use super::error::DdpgError;

// ============================================================================
// StepType
// ============================================================================

/// Position of a time step within its episode.
///
/// Stored as integers (0/1/2) inside batched tensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepType {
    /// First step of an episode.
    First,
    /// Any step that is neither first nor last.
    Mid,
    /// Final step of an episode.
    Last,
}

impl StepType {
    /// Integer encoding used in step-type tensors.
    pub fn as_i32(self) -> i32 {
        match self {
            StepType::First => 0,
            StepType::Mid => 1,
            StepType::Last => 2,
        }
    }

    /// Decode from the integer encoding. Unknown values map to `Mid`.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => StepType::First,
            2 => StepType::Last,
            _ => StepType::Mid,
        }
    }

    /// Whether this step ends an episode.
    pub fn is_last(self) -> bool {
        matches!(self, StepType::Last)
    }
}

// ============================================================================
// TimeStepBatch
// ============================================================================

/// A batch of environment records without a time axis.
///
/// Shapes: `step_types`/`rewards`/`discounts` are `[batch]`, `observations`
/// is `[batch, obs_dim]`. Produced externally (or by the transition
/// extractor); consumed read-only by the loss evaluators and policies.
#[derive(Debug, Clone)]
pub struct TimeStepBatch<B: Backend> {
    /// Step type per sample, encoded per [`StepType::as_i32`].
    pub step_types: Tensor<B, 1, Int>,
    /// Reward received on entering this step.
    pub rewards: Tensor<B, 1>,
    /// Discount applied to values bootstrapped from this step.
    /// Zero at terminal steps.
    pub discounts: Tensor<B, 1>,
    /// Observation features.
    pub observations: Tensor<B, 2>,
}

impl<B: Backend> TimeStepBatch<B> {
    /// Create a batch, checking that all fields agree on the batch size.
    pub fn new(
        step_types: Tensor<B, 1, Int>,
        rewards: Tensor<B, 1>,
        discounts: Tensor<B, 1>,
        observations: Tensor<B, 2>,
    ) -> Result<Self, DdpgError> {
        let batch = observations.dims()[0];
        for (name, size) in [
            ("step_types", step_types.dims()[0]),
            ("rewards", rewards.dims()[0]),
            ("discounts", discounts.dims()[0]),
        ] {
            if size != batch {
                return Err(DdpgError::InvalidInput(format!(
                    "time step batch size mismatch: observations has {}, {} has {}",
                    batch, name, size
                )));
            }
        }
        Ok(Self {
            step_types,
            rewards,
            discounts,
            observations,
        })
    }

    /// Number of samples in the batch.
    pub fn batch_size(&self) -> usize {
        self.observations.dims()[0]
    }

    /// Number of observation features.
    pub fn observation_dim(&self) -> usize {
        self.observations.dims()[1]
    }
}

// ============================================================================
// Trajectory
// ============================================================================

/// A batch of recorded experience spanning consecutive time steps.
///
/// Shapes: `step_types`/`rewards`/`discounts` are `[batch, time]`,
/// `observations` is `[batch, time, obs_dim]` and `actions` is
/// `[batch, time, action_dim]`. `actions[:, t]` is the action the collect
/// policy recorded at step `t`. The agent trains on windows with
/// `time == 2`.
#[derive(Debug, Clone)]
pub struct Trajectory<B: Backend> {
    /// Step types, `[batch, time]`.
    pub step_types: Tensor<B, 2, Int>,
    /// Observations, `[batch, time, obs_dim]`.
    pub observations: Tensor<B, 3>,
    /// Recorded actions, `[batch, time, action_dim]`.
    pub actions: Tensor<B, 3>,
    /// Rewards, `[batch, time]`.
    pub rewards: Tensor<B, 2>,
    /// Discounts, `[batch, time]`.
    pub discounts: Tensor<B, 2>,
}

impl<B: Backend> Trajectory<B> {
    /// Create a trajectory, checking that all fields agree on the batch and
    /// time dimensions.
    pub fn new(
        step_types: Tensor<B, 2, Int>,
        observations: Tensor<B, 3>,
        actions: Tensor<B, 3>,
        rewards: Tensor<B, 2>,
        discounts: Tensor<B, 2>,
    ) -> Result<Self, DdpgError> {
        let [batch, time, _] = observations.dims();
        for (name, dims) in [
            ("step_types", step_types.dims()),
            ("rewards", rewards.dims()),
            ("discounts", discounts.dims()),
        ] {
            if dims != [batch, time] {
                return Err(DdpgError::InvalidInput(format!(
                    "trajectory field {} has shape {:?}, expected [{}, {}]",
                    name, dims, batch, time
                )));
            }
        }
        let action_dims = actions.dims();
        if action_dims[0] != batch || action_dims[1] != time {
            return Err(DdpgError::InvalidInput(format!(
                "trajectory actions have shape {:?}, expected [{}, {}, _]",
                action_dims, batch, time
            )));
        }
        Ok(Self {
            step_types,
            observations,
            actions,
            rewards,
            discounts,
        })
    }

    /// Number of samples in the batch.
    pub fn batch_size(&self) -> usize {
        self.observations.dims()[0]
    }

    /// Number of consecutive time steps per sample.
    pub fn time_extent(&self) -> usize {
        self.observations.dims()[1]
    }

    /// Number of observation features.
    pub fn observation_dim(&self) -> usize {
        self.observations.dims()[2]
    }

    /// Number of action components.
    pub fn action_dim(&self) -> usize {
        self.actions.dims()[2]
    }
}
