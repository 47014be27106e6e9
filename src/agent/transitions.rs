//! Experience-to-transition conversion.
//!
//! Training consumes trajectory windows of exactly two consecutive time
//! steps per sample. This module splits such a window into the aligned
//! triple (current time steps, recorded actions, next time steps) the loss
//! evaluators work with, removing the now-redundant time axis.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::core::error::DdpgError;
use crate::core::time_step::{TimeStepBatch, Trajectory};

/// Temporal extent the agent trains on. The actor and critic are
/// feed-forward, so longer sequences carry no extra information.
pub const TRAIN_SEQUENCE_LENGTH: usize = 2;

/// Split a two-step trajectory window into aligned transitions.
///
/// Time index 0 becomes the current step, index 1 the next step, and the
/// recorded action is taken from the current step (not recomputed). All
/// outputs drop the time axis: `[batch, 2, ...]` becomes `[batch, ...]`.
///
/// Fails with [`DdpgError::InvalidInput`] when the window does not span
/// exactly [`TRAIN_SEQUENCE_LENGTH`] steps.
pub fn to_transitions<B: Backend>(
    trajectory: &Trajectory<B>,
) -> Result<(TimeStepBatch<B>, Tensor<B, 2>, TimeStepBatch<B>), DdpgError> {
    let time = trajectory.time_extent();
    if time != TRAIN_SEQUENCE_LENGTH {
        return Err(DdpgError::InvalidInput(format!(
            "experience must span exactly {} consecutive time steps, got {}",
            TRAIN_SEQUENCE_LENGTH, time
        )));
    }

    let batch = trajectory.batch_size();
    let action_dim = trajectory.action_dim();

    let time_steps = slice_step(trajectory, 0);
    let next_time_steps = slice_step(trajectory, 1);
    let actions = trajectory
        .actions
        .clone()
        .slice([0..batch, 0..1, 0..action_dim])
        .reshape([batch, action_dim]);

    Ok((time_steps, actions, next_time_steps))
}

/// Extract the batch at one time index, squeezing the time axis.
fn slice_step<B: Backend>(trajectory: &Trajectory<B>, index: usize) -> TimeStepBatch<B> {
    let batch = trajectory.batch_size();
    let obs_dim = trajectory.observation_dim();

    TimeStepBatch {
        step_types: trajectory
            .step_types
            .clone()
            .slice([0..batch, index..index + 1])
            .reshape([batch]),
        rewards: trajectory
            .rewards
            .clone()
            .slice([0..batch, index..index + 1])
            .reshape([batch]),
        discounts: trajectory
            .discounts
            .clone()
            .slice([0..batch, index..index + 1])
            .reshape([batch]),
        observations: trajectory
            .observations
            .clone()
            .slice([0..batch, index..index + 1, 0..obs_dim])
            .reshape([batch, obs_dim]),
    }
}
