//! DDPG (Deep Deterministic Policy Gradient) agent implementation.
//!
//! DDPG is an off-policy actor-critic algorithm for continuous action
//! spaces:
//! - A deterministic actor maps observations to actions
//! - A Q critic regresses onto bootstrapped TD targets
//! - Slow-moving target copies of both networks stabilize the targets
//!
//! # Architecture
//!
//! ```text
//! DdpgAgent
//! ├── actor:         mu(s)          trained by the policy gradient
//! ├── target_actor:  frozen copy    produces a' for the TD target
//! ├── critic:        Q(s, a)        trained by TD regression
//! ├── target_critic: frozen copy    produces Q(s', a') for the TD target
//! └── TargetUpdater: periodic Polyak blend of both pairs
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use ddpg_rl::agent::{create_optimizers, DdpgAgent, DdpgConfig};
//!
//! let config = DdpgConfig::soft_updates();
//! let (actor_opt, critic_opt) = create_optimizers(&config);
//! let mut agent = DdpgAgent::new(
//!     time_step_spec, action_spec, actor, critic,
//!     actor_opt, critic_opt, config, &device,
//! )?;
//! agent.initialize();
//! let loss_info = agent.train(&experience)?;
//! ```

mod config;
mod ddpg;
mod losses;
mod networks;
mod transitions;

// Re-exports
pub use config::DdpgConfig;
pub use ddpg::{create_optimizers, DdpgAgent, DdpgLossInfo, DebugSummaries};
pub use losses::{
    dpg_actor_loss, element_wise_huber_loss, element_wise_squared_loss, td_targets,
    TdErrorsLossFn,
};
pub use networks::{ActorNetwork, ActorNetworkTraining, CriticNetwork, CriticNetworkTraining};
pub use transitions::{to_transitions, TRAIN_SEQUENCE_LENGTH};
