//! Network contracts for the actor and critic.
//!
//! The agent does not define architectures; it consumes anything that
//! implements these traits. Both traits are usable on an autodiff backend
//! (training) or on the inference backend: policies take a snapshot of the
//! online actor via `AutodiffModule::valid()` and run it without gradient
//! tracking.
//!
//! Four instances exist inside the agent: online and target actor, online
//! and target critic. Targets are clones of the same type kept in sync by
//! the soft updater, so implementations need no target-specific logic.

use burn::module::{AutodiffModule, Module};
use burn::tensor::backend::{AutodiffBackend, Backend};
use burn::tensor::Tensor;

// ============================================================================
// Actor
// ============================================================================

/// Deterministic policy network: observations in, actions out.
pub trait ActorNetwork<B: Backend>: Module<B> + Clone + Send + 'static {
    /// Forward pass through the actor.
    ///
    /// # Arguments
    /// - `observations`: Observation features [batch, obs_dim]
    ///
    /// # Returns
    /// Actions [batch, action_dim]. Outputs are not clipped here; policies
    /// apply the action spec bounds.
    fn forward(&self, observations: Tensor<B, 2>) -> Tensor<B, 2>;

    /// Number of observation features consumed.
    fn observation_dim(&self) -> usize;

    /// Number of action components produced.
    fn action_dim(&self) -> usize;
}

/// Actor usable for training: adds gradient support on an autodiff backend.
pub trait ActorNetworkTraining<B>: ActorNetwork<B> + AutodiffModule<B>
where
    B: AutodiffBackend,
{
}

impl<M, B> ActorNetworkTraining<B> for M
where
    M: ActorNetwork<B> + AutodiffModule<B>,
    B: AutodiffBackend,
{
}

// ============================================================================
// Critic
// ============================================================================

/// State-action value network.
pub trait CriticNetwork<B: Backend>: Module<B> + Clone + Send + 'static {
    /// Forward pass through the critic.
    ///
    /// # Arguments
    /// - `observations`: Observation features [batch, obs_dim]
    /// - `actions`: Action components [batch, action_dim]
    ///
    /// # Returns
    /// Q-value estimates [batch].
    fn forward(&self, observations: Tensor<B, 2>, actions: Tensor<B, 2>) -> Tensor<B, 1>;

    /// Number of observation features consumed.
    fn observation_dim(&self) -> usize;

    /// Number of action components consumed.
    fn action_dim(&self) -> usize;
}

/// Critic usable for training: adds gradient support on an autodiff backend.
pub trait CriticNetworkTraining<B>: CriticNetwork<B> + AutodiffModule<B>
where
    B: AutodiffBackend,
{
}

impl<M, B> CriticNetworkTraining<B> for M
where
    M: CriticNetwork<B> + AutodiffModule<B>,
    B: AutodiffBackend,
{
}
