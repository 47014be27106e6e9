//! Loss functions for DDPG training.
//!
//! The critic regresses its Q estimates onto bootstrapped TD targets built
//! from the target networks; the actor minimizes a squared error whose
//! gradient equals the deterministic policy gradient. Everything here is a
//! pure tensor computation; the agent decides what to differentiate and
//! when to step.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use serde::{Deserialize, Serialize};

// ============================================================================
// Elementwise regression losses
// ============================================================================

/// Elementwise regression loss applied between TD targets and Q estimates.
///
/// Huber is the default: quadratic near zero, linear beyond `delta`, which
/// keeps single outlier transitions from dominating the critic update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TdErrorsLossFn {
    /// Smooth L1 loss with the given quadratic/linear crossover.
    Huber {
        /// Error magnitude where the loss switches from quadratic to linear.
        delta: f32,
    },
    /// Plain squared error.
    SquaredError,
}

impl Default for TdErrorsLossFn {
    fn default() -> Self {
        TdErrorsLossFn::Huber { delta: 1.0 }
    }
}

impl TdErrorsLossFn {
    /// Apply the elementwise loss. Shapes: `[batch]` in, `[batch]` out.
    pub fn evaluate<B: Backend>(
        &self,
        targets: Tensor<B, 1>,
        predictions: Tensor<B, 1>,
    ) -> Tensor<B, 1> {
        match *self {
            TdErrorsLossFn::Huber { delta } => {
                element_wise_huber_loss(targets, predictions, delta)
            }
            TdErrorsLossFn::SquaredError => element_wise_squared_loss(targets, predictions),
        }
    }
}

/// Elementwise Huber (smooth L1) loss.
///
/// ```text
/// err       = target - prediction
/// quadratic = min(|err|, delta)
/// linear    = |err| - quadratic
/// loss      = 0.5 * quadratic² + delta * linear
/// ```
///
/// # Arguments
/// - `targets`: Regression targets [batch]
/// - `predictions`: Estimates [batch]
/// - `delta`: Quadratic/linear crossover, must be positive
pub fn element_wise_huber_loss<B: Backend>(
    targets: Tensor<B, 1>,
    predictions: Tensor<B, 1>,
    delta: f32,
) -> Tensor<B, 1> {
    let abs_err = (targets - predictions).abs();
    let quadratic = abs_err.clone().clamp(0.0, delta);
    let linear = abs_err - quadratic.clone();
    quadratic.powf_scalar(2.0).mul_scalar(0.5) + linear.mul_scalar(delta)
}

/// Elementwise squared error: `(target - prediction)²`.
pub fn element_wise_squared_loss<B: Backend>(
    targets: Tensor<B, 1>,
    predictions: Tensor<B, 1>,
) -> Tensor<B, 1> {
    (targets - predictions).powf_scalar(2.0)
}

// ============================================================================
// TD targets
// ============================================================================

/// Compute bootstrapped TD targets for the critic.
///
/// ```text
/// y = reward_scale * r' + gamma * discount' * Q_target(s', a')
/// ```
///
/// The result is detached: it is a fixed regression target and no gradient
/// flows back through the target networks. Terminal transitions are handled
/// by the data contract `discount' = 0`, which drops the bootstrap term.
///
/// # Arguments
/// - `next_rewards`: Rewards at the next step [batch]
/// - `next_discounts`: Discounts at the next step [batch]
/// - `target_q`: Target critic values for the next step [batch]
/// - `gamma`: Discount factor for future rewards
/// - `reward_scale_factor`: Reward multiplier before bootstrapping
pub fn td_targets<B: Backend>(
    next_rewards: Tensor<B, 1>,
    next_discounts: Tensor<B, 1>,
    target_q: Tensor<B, 1>,
    gamma: f32,
    reward_scale_factor: f32,
) -> Tensor<B, 1> {
    let scaled_rewards = next_rewards.mul_scalar(reward_scale_factor);
    let bootstrapped = next_discounts.mul_scalar(gamma) * target_q;
    (scaled_rewards + bootstrapped).detach()
}

// ============================================================================
// Actor regression loss
// ============================================================================

/// Squared-error actor loss against the shifted action targets.
///
/// ```text
/// loss = Σ_components mean_batch((target - action)²)
/// ```
///
/// With `target = stop_gradient(dqda + action)` this has gradient
/// `-2 * dqda / batch` w.r.t. each action element, pushing actions in the
/// direction that increases Q without differentiating the critic a second
/// time. Targets must already be detached; gradients flow only through
/// `actions`.
///
/// # Arguments
/// - `targets`: Shifted action targets [batch, action_dim]
/// - `actions`: Online actor outputs [batch, action_dim]
pub fn dpg_actor_loss<B: Backend>(
    targets: Tensor<B, 2>,
    actions: Tensor<B, 2>,
) -> Tensor<B, 1> {
    (targets - actions).powf_scalar(2.0).mean_dim(0).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type B = NdArray<f32>;

    fn device() -> <B as burn::tensor::backend::Backend>::Device {
        Default::default()
    }

    fn values(tensor: Tensor<B, 1>) -> Vec<f32> {
        tensor.into_data().as_slice::<f32>().unwrap().to_vec()
    }

    #[test]
    fn test_huber_quadratic_zone() {
        let device = device();
        let targets = Tensor::from_floats([1.0, 2.0], &device);
        let predictions = Tensor::from_floats([0.5, 2.0], &device);

        let loss = values(element_wise_huber_loss(targets, predictions, 1.0));

        // |err| = 0.5 <= delta: loss = 0.5 * 0.25 = 0.125
        assert!((loss[0] - 0.125).abs() < 1e-6);
        assert!((loss[1] - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_huber_linear_zone() {
        let device = device();
        let targets = Tensor::from_floats([3.0], &device);
        let predictions = Tensor::from_floats([0.0], &device);

        let loss = values(element_wise_huber_loss(targets, predictions, 1.0));

        // |err| = 3 > delta: loss = 0.5 * 1² + 1 * (3 - 1) = 2.5
        assert!((loss[0] - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_huber_matches_squared_below_delta() {
        let device = device();
        let targets = Tensor::from_floats([0.3, -0.7], &device);
        let predictions = Tensor::from_floats([0.0, 0.0], &device);

        let huber = values(element_wise_huber_loss(
            targets.clone(),
            predictions.clone(),
            1.0,
        ));
        let squared = values(element_wise_squared_loss(targets, predictions));

        for (h, s) in huber.iter().zip(squared.iter()) {
            assert!((h - s / 2.0).abs() < 1e-6, "huber = squared/2 inside delta");
        }
    }

    #[test]
    fn test_squared_loss() {
        let device = device();
        let targets = Tensor::from_floats([2.0, -1.0], &device);
        let predictions = Tensor::from_floats([0.0, 1.0], &device);

        let loss = values(element_wise_squared_loss(targets, predictions));
        assert!((loss[0] - 4.0).abs() < 1e-6);
        assert!((loss[1] - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_td_targets_bootstraps_through_discount() {
        let device = device();
        let rewards = Tensor::from_floats([1.0, 1.0], &device);
        let discounts = Tensor::from_floats([1.0, 0.0], &device);
        let target_q = Tensor::from_floats([5.0, 5.0], &device);

        let y = values(td_targets(rewards, discounts, target_q, 0.9, 1.0));

        // Non-terminal: 1 + 0.9 * 1 * 5 = 5.5
        assert!((y[0] - 5.5).abs() < 1e-6);
        // Terminal (discount 0): bootstrap drops, y = reward
        assert!((y[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_td_targets_scales_rewards() {
        let device = device();
        let rewards = Tensor::from_floats([1.0], &device);
        let discounts = Tensor::from_floats([1.0], &device);
        let target_q = Tensor::from_floats([5.0], &device);

        let y = values(td_targets(rewards, discounts, target_q, 0.9, 2.0));

        // 2 * 1 + 0.9 * 5 = 6.5
        assert!((y[0] - 6.5).abs() < 1e-6);
    }

    #[test]
    fn test_default_loss_is_huber() {
        assert_eq!(TdErrorsLossFn::default(), TdErrorsLossFn::Huber { delta: 1.0 });
    }

    #[test]
    fn test_loss_fn_dispatch() {
        let device = device();
        let targets = Tensor::from_floats([2.0], &device);
        let predictions = Tensor::from_floats([0.0], &device);

        let huber = values(
            TdErrorsLossFn::Huber { delta: 1.0 }.evaluate(targets.clone(), predictions.clone()),
        );
        let squared = values(TdErrorsLossFn::SquaredError.evaluate(targets, predictions));

        // Huber: 0.5 + 1 * (2 - 1) = 1.5; squared: 4.0
        assert!((huber[0] - 1.5).abs() < 1e-6);
        assert!((squared[0] - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_dpg_actor_loss_sums_components() {
        let device = device();
        let targets: Tensor<B, 2> = Tensor::from_floats([[1.0, 2.0], [3.0, 4.0]], &device);
        let actions: Tensor<B, 2> = Tensor::from_floats([[0.0, 0.0], [0.0, 0.0]], &device);

        let loss = values(dpg_actor_loss(targets, actions));

        // Component means: (1 + 9)/2 = 5 and (4 + 16)/2 = 10; summed = 15.
        assert!((loss[0] - 15.0).abs() < 1e-5);
    }
}
