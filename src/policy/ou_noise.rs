//! Ornstein-Uhlenbeck exploration noise.
//!
//! The collect policy perturbs the deterministic actor output with
//! temporally correlated noise:
//!
//! ```text
//! x_{t+1} = (1 - damping) * x_t + N(0, stddev)
//! action  = clip(actor(obs) + x_{t+1})
//! ```
//!
//! With damping 1 the process degenerates to independent Gaussian noise;
//! smaller damping keeps successive samples correlated, which explores
//! more coherently in environments with momentum.

use burn::tensor::backend::Backend;
use burn::tensor::{Distribution, Tensor};

use crate::agent::ActorNetwork;
use crate::core::spec::ActionSpec;

use super::actor_policy::{clip_to_spec, ActorPolicy};

// ============================================================================
// OuProcess
// ============================================================================

/// Stateful Ornstein-Uhlenbeck process over one action vector.
#[derive(Debug, Clone)]
pub struct OuProcess<B: Backend> {
    state: Tensor<B, 1>,
    stddev: f32,
    damping: f32,
}

impl<B: Backend> OuProcess<B> {
    /// Create a process starting at zero.
    pub fn new(action_dim: usize, stddev: f32, damping: f32, device: &B::Device) -> Self {
        Self {
            state: Tensor::zeros([action_dim], device),
            stddev,
            damping,
        }
    }

    /// Advance the process one step and return the new noise vector.
    pub fn sample(&mut self) -> Tensor<B, 1> {
        let device = self.state.device();
        let dims = self.state.dims();
        let noise = if self.stddev > 0.0 {
            Tensor::random(dims, Distribution::Normal(0.0, self.stddev as f64), &device)
        } else {
            Tensor::zeros(dims, &device)
        };
        self.state = self.state.clone().mul_scalar(1.0 - self.damping) + noise;
        self.state.clone()
    }

    /// Reset the process to zero, for use at episode boundaries.
    pub fn reset(&mut self) {
        self.state = Tensor::zeros(self.state.dims(), &self.state.device());
    }

    /// Current noise state.
    pub fn state(&self) -> &Tensor<B, 1> {
        &self.state
    }
}

// ============================================================================
// OuNoisePolicy
// ============================================================================

/// Exploration policy: actor output plus OU noise, clipped to the spec.
///
/// Holds the noise state, so callers keep one instance per collection
/// stream and call [`reset`](Self::reset) when an episode ends. The inner
/// policy runs unclipped; clipping happens once, after the noise is added.
#[derive(Debug, Clone)]
pub struct OuNoisePolicy<B: Backend, A: ActorNetwork<B>> {
    policy: ActorPolicy<B, A>,
    noise: OuProcess<B>,
}

impl<B, A> OuNoisePolicy<B, A>
where
    B: Backend,
    A: ActorNetwork<B>,
{
    /// Wrap an actor policy with an OU process sized to its action spec.
    pub fn new(policy: ActorPolicy<B, A>, stddev: f32, damping: f32, device: &B::Device) -> Self {
        let action_dim = policy.action_spec().action_dim();
        Self {
            policy,
            noise: OuProcess::new(action_dim, stddev, damping, device),
        }
    }

    /// Compute noisy actions for a batch of observations.
    ///
    /// The same noise vector perturbs every row of the batch; collection
    /// typically runs with batch size 1 per stream.
    ///
    /// # Arguments
    /// * `observations` - Observation features [batch_size, obs_dim]
    ///
    /// # Returns
    /// Actions [batch_size, action_dim] within the spec bounds.
    pub fn action(&mut self, observations: Tensor<B, 2>) -> Tensor<B, 2> {
        let actions = self.policy.action(observations);
        let noise: Tensor<B, 2> = self.noise.sample().unsqueeze_dim(0);
        clip_to_spec(actions + noise, self.policy.action_spec())
    }

    /// Reset the noise state at an episode boundary.
    pub fn reset(&mut self) {
        self.noise.reset();
    }

    /// The action spec actions are clipped to.
    pub fn action_spec(&self) -> &ActionSpec {
        self.policy.action_spec()
    }

    /// The underlying OU process.
    pub fn noise(&self) -> &OuProcess<B> {
        &self.noise
    }
}
