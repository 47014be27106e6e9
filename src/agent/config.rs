//! DDPG configuration.
//!
//! Hyperparameters for the agent, with presets for the two common target
//! update regimes:
//! - **Hard updates**: full parameter copy every training call (tau=1.0,
//!   period=1), paired with an undiscounted objective. This is the
//!   constructor default.
//! - **Soft updates**: small Polyak blend every call (tau=0.001) with the
//!   discounting and noise values commonly used on continuous-control
//!   benchmarks.
//!
//! Use `DdpgConfig::new()` or `DdpgConfig::soft_updates()` and adjust with
//! the `with_*` builders.

use serde::{Deserialize, Serialize};

use crate::agent::losses::TdErrorsLossFn;
use crate::core::error::DdpgError;

// ============================================================================
// DDPG Configuration
// ============================================================================

/// Configuration for the DDPG agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DdpgConfig {
    // ========================================================================
    // Optimizer Settings
    // ========================================================================
    /// Actor network learning rate.
    pub actor_learning_rate: f64,

    /// Critic network learning rate.
    pub critic_learning_rate: f64,

    /// Maximum global gradient norm before an optimizer step.
    /// None = no clipping.
    pub gradient_clipping: Option<f32>,

    // ========================================================================
    // Exploration Noise Settings
    // ========================================================================
    /// Standard deviation of the Ornstein-Uhlenbeck noise added by the
    /// collect policy.
    pub ou_stddev: f32,

    /// Damping factor of the Ornstein-Uhlenbeck process. 1.0 makes the
    /// noise white (no memory between steps).
    pub ou_damping: f32,

    // ========================================================================
    // Target Network Settings
    // ========================================================================
    /// Blend factor for soft target updates.
    /// 1.0 = hard copy, small values (e.g. 0.001) = slow Polyak averaging.
    pub target_update_tau: f32,

    /// Number of training calls between target updates.
    pub target_update_period: usize,

    // ========================================================================
    // Loss Settings
    // ========================================================================
    /// Symmetric clip bound applied element-wise to the action gradient
    /// dQ/da in the actor loss. None or 0.0 disables clipping.
    pub dqda_clipping: Option<f32>,

    /// Elementwise regression loss between TD targets and Q estimates.
    pub td_errors_loss: TdErrorsLossFn,

    /// Discount factor for future rewards.
    pub gamma: f32,

    /// Multiplier applied to rewards before bootstrapping.
    pub reward_scale_factor: f32,

    // ========================================================================
    // Diagnostics Settings
    // ========================================================================
    /// Attach distribution summaries of TD errors, TD targets and Q values
    /// to the returned loss info. No effect on training.
    pub debug_summaries: bool,

    /// Attach per-parameter summaries of the online networks to the
    /// returned loss info. No effect on training.
    pub summarize_grads_and_vars: bool,
}

impl Default for DdpgConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DdpgConfig {
    /// Create the default configuration: hard target copy every training
    /// call, undiscounted returns, white exploration noise of unit scale.
    pub fn new() -> Self {
        Self {
            // Optimizers
            actor_learning_rate: 1e-4,
            critic_learning_rate: 1e-3,
            gradient_clipping: None,

            // Exploration noise
            ou_stddev: 1.0,
            ou_damping: 1.0,

            // Target networks
            target_update_tau: 1.0,
            target_update_period: 1,

            // Losses
            dqda_clipping: None,
            td_errors_loss: TdErrorsLossFn::default(),
            gamma: 1.0,
            reward_scale_factor: 1.0,

            // Diagnostics
            debug_summaries: false,
            summarize_grads_and_vars: false,
        }
    }

    /// Create a configuration with slow Polyak target updates.
    ///
    /// Uses the values common on continuous-control benchmarks: tau=0.001,
    /// gamma=0.99, and temporally correlated exploration noise
    /// (stddev=0.2, damping=0.15).
    pub fn soft_updates() -> Self {
        Self {
            // Optimizers
            actor_learning_rate: 1e-4,
            critic_learning_rate: 1e-3,
            gradient_clipping: None,

            // Exploration noise
            ou_stddev: 0.2,
            ou_damping: 0.15,

            // Target networks
            target_update_tau: 0.001,
            target_update_period: 1,

            // Losses
            dqda_clipping: None,
            td_errors_loss: TdErrorsLossFn::default(),
            gamma: 0.99,
            reward_scale_factor: 1.0,

            // Diagnostics
            debug_summaries: false,
            summarize_grads_and_vars: false,
        }
    }

    /// The dqda clip bound with the "0.0 disables" convention applied.
    pub fn effective_dqda_clipping(&self) -> Option<f32> {
        self.dqda_clipping.filter(|clip| *clip > 0.0)
    }

    /// Check hyperparameters are in range.
    pub fn validate(&self) -> Result<(), DdpgError> {
        if !self.actor_learning_rate.is_finite() || self.actor_learning_rate <= 0.0 {
            return Err(DdpgError::Configuration(format!(
                "actor learning rate must be positive, got {}",
                self.actor_learning_rate
            )));
        }
        if !self.critic_learning_rate.is_finite() || self.critic_learning_rate <= 0.0 {
            return Err(DdpgError::Configuration(format!(
                "critic learning rate must be positive, got {}",
                self.critic_learning_rate
            )));
        }
        if !self.target_update_tau.is_finite()
            || !(0.0..=1.0).contains(&self.target_update_tau)
        {
            return Err(DdpgError::Configuration(format!(
                "target update tau must lie in [0, 1], got {}",
                self.target_update_tau
            )));
        }
        if self.target_update_period == 0 {
            return Err(DdpgError::Configuration(
                "target update period must be at least 1".to_string(),
            ));
        }
        if !self.gamma.is_finite() || !(0.0..=1.0).contains(&self.gamma) {
            return Err(DdpgError::Configuration(format!(
                "gamma must lie in [0, 1], got {}",
                self.gamma
            )));
        }
        if !self.ou_stddev.is_finite() || self.ou_stddev < 0.0 {
            return Err(DdpgError::Configuration(format!(
                "ou_stddev must be non-negative, got {}",
                self.ou_stddev
            )));
        }
        if !self.ou_damping.is_finite() || self.ou_damping < 0.0 {
            return Err(DdpgError::Configuration(format!(
                "ou_damping must be non-negative, got {}",
                self.ou_damping
            )));
        }
        if !self.reward_scale_factor.is_finite() {
            return Err(DdpgError::Configuration(format!(
                "reward scale factor must be finite, got {}",
                self.reward_scale_factor
            )));
        }
        if let Some(clip) = self.dqda_clipping {
            if !clip.is_finite() || clip < 0.0 {
                return Err(DdpgError::Configuration(format!(
                    "dqda clipping must be non-negative, got {}",
                    clip
                )));
            }
        }
        if let Some(norm) = self.gradient_clipping {
            if !norm.is_finite() || norm <= 0.0 {
                return Err(DdpgError::Configuration(format!(
                    "gradient clipping norm must be positive, got {}",
                    norm
                )));
            }
        }
        if let TdErrorsLossFn::Huber { delta } = self.td_errors_loss {
            if !delta.is_finite() || delta <= 0.0 {
                return Err(DdpgError::Configuration(format!(
                    "huber delta must be positive, got {}",
                    delta
                )));
            }
        }
        Ok(())
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set the actor learning rate.
    pub fn with_actor_learning_rate(mut self, lr: f64) -> Self {
        self.actor_learning_rate = lr;
        self
    }

    /// Set the critic learning rate.
    pub fn with_critic_learning_rate(mut self, lr: f64) -> Self {
        self.critic_learning_rate = lr;
        self
    }

    /// Set the maximum global gradient norm.
    pub fn with_gradient_clipping(mut self, norm: f32) -> Self {
        self.gradient_clipping = Some(norm);
        self
    }

    /// Set the exploration noise standard deviation.
    pub fn with_ou_stddev(mut self, stddev: f32) -> Self {
        self.ou_stddev = stddev;
        self
    }

    /// Set the exploration noise damping.
    pub fn with_ou_damping(mut self, damping: f32) -> Self {
        self.ou_damping = damping;
        self
    }

    /// Set the target update blend factor.
    pub fn with_target_update_tau(mut self, tau: f32) -> Self {
        self.target_update_tau = tau;
        self
    }

    /// Set the number of training calls between target updates.
    pub fn with_target_update_period(mut self, period: usize) -> Self {
        self.target_update_period = period;
        self
    }

    /// Set the symmetric action-gradient clip bound.
    pub fn with_dqda_clipping(mut self, clip: f32) -> Self {
        self.dqda_clipping = Some(clip);
        self
    }

    /// Set the elementwise TD regression loss.
    pub fn with_td_errors_loss(mut self, loss: TdErrorsLossFn) -> Self {
        self.td_errors_loss = loss;
        self
    }

    /// Set the discount factor.
    pub fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the reward scale factor.
    pub fn with_reward_scale_factor(mut self, scale: f32) -> Self {
        self.reward_scale_factor = scale;
        self
    }

    /// Enable or disable debug summaries in the loss info.
    pub fn with_debug_summaries(mut self, enabled: bool) -> Self {
        self.debug_summaries = enabled;
        self
    }

    /// Enable or disable per-parameter summaries in the loss info.
    pub fn with_summarize_grads_and_vars(mut self, enabled: bool) -> Self {
        self.summarize_grads_and_vars = enabled;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DdpgConfig::new();
        assert_eq!(config.target_update_tau, 1.0);
        assert_eq!(config.target_update_period, 1);
        assert_eq!(config.gamma, 1.0);
        assert_eq!(config.reward_scale_factor, 1.0);
        assert_eq!(config.dqda_clipping, None);
        assert_eq!(config.td_errors_loss, TdErrorsLossFn::Huber { delta: 1.0 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_soft_updates_config() {
        let config = DdpgConfig::soft_updates();
        assert_eq!(config.target_update_tau, 0.001);
        assert_eq!(config.gamma, 0.99);
        assert_eq!(config.ou_stddev, 0.2);
        assert_eq!(config.ou_damping, 0.15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = DdpgConfig::new()
            .with_gamma(0.9)
            .with_target_update_tau(0.05)
            .with_target_update_period(5)
            .with_dqda_clipping(0.5)
            .with_td_errors_loss(TdErrorsLossFn::SquaredError);

        assert_eq!(config.gamma, 0.9);
        assert_eq!(config.target_update_tau, 0.05);
        assert_eq!(config.target_update_period, 5);
        assert_eq!(config.dqda_clipping, Some(0.5));
        assert_eq!(config.td_errors_loss, TdErrorsLossFn::SquaredError);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_dqda_clipping_disables() {
        let config = DdpgConfig::new();
        assert_eq!(config.effective_dqda_clipping(), None);

        let config = config.with_dqda_clipping(0.0);
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_dqda_clipping(), None);

        let config = config.with_dqda_clipping(0.5);
        assert_eq!(config.effective_dqda_clipping(), Some(0.5));
    }

    #[test]
    fn test_validate_rejects_out_of_range_tau() {
        let config = DdpgConfig::new().with_target_update_tau(1.5);
        assert!(matches!(
            config.validate(),
            Err(DdpgError::Configuration(_))
        ));

        let config = DdpgConfig::new().with_target_update_tau(-0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_period() {
        let config = DdpgConfig::new().with_target_update_period(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_gamma() {
        let config = DdpgConfig::new().with_gamma(1.2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_learning_rate() {
        let config = DdpgConfig::new().with_actor_learning_rate(0.0);
        assert!(config.validate().is_err());

        let config = DdpgConfig::new().with_critic_learning_rate(-1e-3);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_dqda_clipping() {
        let config = DdpgConfig::new().with_dqda_clipping(-0.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_huber_delta() {
        let config =
            DdpgConfig::new().with_td_errors_loss(TdErrorsLossFn::Huber { delta: 0.0 });
        assert!(config.validate().is_err());
    }
}
