//! # DDPG: Deep Deterministic Policy Gradient
//!
//! Off-policy actor-critic agent for continuous control, built on the
//! `burn` tensor framework.
//!
//! ## Architecture Overview
//!
//! ```text
//! Trajectory [batch, 2 steps]
//!     |  to_transitions
//!     v
//! (time_steps, actions, next_time_steps)
//!     |
//!     |--> critic loss: huber(y, Q(s, a))
//!     |       y = scale * r' + gamma * d' * Q_target(s', mu_target(s'))
//!     |--> actor loss: squared regression whose gradient is the
//!     |       deterministic policy gradient dQ/da (optionally clipped)
//!     v
//! Adam step (critic first, then actor)
//!     v
//! gated soft target update (tau blend every `period` calls)
//! ```
//!
//! The agent owns online and target copies of both networks. Exploration
//! and evaluation run through lightweight policy snapshots on the inner
//! (gradient-free) backend: [`DdpgAgent::policy`] clips the greedy actor
//! output to the action spec, [`DdpgAgent::collect_policy`] adds
//! Ornstein-Uhlenbeck noise before clipping.
//!
//! ## Data Contract
//!
//! Training consumes [`Trajectory`] windows spanning exactly two
//! consecutive time steps per batch entry. Terminal transitions are encoded
//! by `discount = 0` at the next step, which drops the bootstrap term from
//! the TD target; no masking happens inside the agent.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ddpg_rl::{
//!     create_optimizers, ActionSpec, DdpgAgent, DdpgConfig, MlpActorConfig,
//!     MlpCriticConfig, TimeStepSpec,
//! };
//!
//! let spec = ActionSpec::symmetric(action_dim, 1.0);
//! let actor = MlpActorConfig::new(obs_dim, spec.clone()).init::<B>(&device);
//! let critic = MlpCriticConfig::new(obs_dim, action_dim).init::<B>(&device);
//!
//! let config = DdpgConfig::soft_updates().with_gamma(0.99);
//! let (actor_opt, critic_opt) = create_optimizers(&config);
//! let mut agent = DdpgAgent::new(
//!     TimeStepSpec::new(obs_dim), spec, actor, critic,
//!     actor_opt, critic_opt, config, &device,
//! )?;
//!
//! agent.initialize();
//! let info = agent.train(&experience)?;
//! println!("{}", info.format());
//!
//! let mut explorer = agent.collect_policy();
//! let actions = explorer.action(observations);
//! ```

pub mod agent;
pub mod core;
pub mod metrics;
pub mod nn;
pub mod policy;

// Re-export commonly used types
pub use agent::{
    create_optimizers, to_transitions, ActorNetwork, CriticNetwork, DdpgAgent, DdpgConfig,
    DdpgLossInfo, DebugSummaries, TdErrorsLossFn, TRAIN_SEQUENCE_LENGTH,
};

pub use core::error::DdpgError;
pub use core::spec::{ActionSpec, TimeStepSpec};
pub use core::target_network::{hard_copy, soft_update, TargetUpdater};
pub use core::time_step::{StepType, TimeStepBatch, Trajectory};

// Network building blocks
pub use nn::{MlpActor, MlpActorConfig, MlpCritic, MlpCriticConfig};

// Deployment and exploration policies
pub use policy::{ActorPolicy, OuNoisePolicy, OuProcess};

// Training diagnostics
pub use metrics::{
    parameter_values, variable_summaries, CSVLogger, ConsoleLogger, MetricsLogger, MultiLogger,
    TensorSummary, VariableSummary,
};
