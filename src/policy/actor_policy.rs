//! Deterministic actor policy.
//!
//! Wraps an actor network and optionally clips its output to the action
//! spec. Clipping is done in normalized space: actions are mapped to
//! `[-1, 1]` per component, clamped, and mapped back, so every component
//! respects its own bounds.

use std::marker::PhantomData;

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::agent::ActorNetwork;
use crate::core::spec::ActionSpec;

// ============================================================================
// Bound scaling
// ============================================================================

/// Per-component `scale = (high - low) / 2` and `offset = (high + low) / 2`
/// as `[1, action_dim]` tensors ready to broadcast over a batch.
fn bound_tensors<B: Backend>(
    spec: &ActionSpec,
    device: &B::Device,
) -> (Tensor<B, 2>, Tensor<B, 2>) {
    let scale: Vec<f32> = spec
        .low
        .iter()
        .zip(spec.high.iter())
        .map(|(l, h)| (h - l) / 2.0)
        .collect();
    let offset: Vec<f32> = spec
        .low
        .iter()
        .zip(spec.high.iter())
        .map(|(l, h)| (h + l) / 2.0)
        .collect();
    (
        Tensor::<B, 1>::from_floats(scale.as_slice(), device).unsqueeze_dim(0),
        Tensor::<B, 1>::from_floats(offset.as_slice(), device).unsqueeze_dim(0),
    )
}

/// Scale normalized actions from [-1, 1] to [low, high].
///
/// # Arguments
/// * `normalized` - Actions in [-1, 1]: [batch_size, action_dim]
/// * `spec` - Per-component bounds
pub fn scale_to_spec<B: Backend>(normalized: Tensor<B, 2>, spec: &ActionSpec) -> Tensor<B, 2> {
    let device = normalized.device();
    assert_eq!(spec.action_dim(), normalized.dims()[1]);

    let (scale, offset) = bound_tensors(spec, &device);
    normalized * scale + offset
}

/// Unscale actions from [low, high] to [-1, 1].
///
/// # Arguments
/// * `actions` - Actions in [low, high]: [batch_size, action_dim]
/// * `spec` - Per-component bounds
pub fn unscale_from_spec<B: Backend>(actions: Tensor<B, 2>, spec: &ActionSpec) -> Tensor<B, 2> {
    let device = actions.device();
    assert_eq!(spec.action_dim(), actions.dims()[1]);

    let (scale, offset) = bound_tensors(spec, &device);
    (actions - offset) / scale
}

/// Clip actions to the spec bounds, per component.
pub fn clip_to_spec<B: Backend>(actions: Tensor<B, 2>, spec: &ActionSpec) -> Tensor<B, 2> {
    let normalized = unscale_from_spec(actions, spec).clamp(-1.0, 1.0);
    scale_to_spec(normalized, spec)
}

// ============================================================================
// ActorPolicy
// ============================================================================

/// Deterministic policy over an actor network.
///
/// With `clip` enabled the output respects the action spec bounds; without
/// it the raw network output passes through (used as the inner policy of
/// the exploration wrapper, which clips after adding noise).
#[derive(Debug, Clone)]
pub struct ActorPolicy<B: Backend, A: ActorNetwork<B>> {
    actor: A,
    action_spec: ActionSpec,
    clip: bool,
    _backend: PhantomData<B>,
}

impl<B, A> ActorPolicy<B, A>
where
    B: Backend,
    A: ActorNetwork<B>,
{
    /// Create a policy over the given actor snapshot.
    pub fn new(actor: A, action_spec: ActionSpec, clip: bool) -> Self {
        Self {
            actor,
            action_spec,
            clip,
            _backend: PhantomData,
        }
    }

    /// Compute actions for a batch of observations.
    ///
    /// # Arguments
    /// * `observations` - Observation features [batch_size, obs_dim]
    ///
    /// # Returns
    /// Actions [batch_size, action_dim], clipped to the spec when enabled.
    pub fn action(&self, observations: Tensor<B, 2>) -> Tensor<B, 2> {
        let actions = self.actor.forward(observations);
        if self.clip {
            clip_to_spec(actions, &self.action_spec)
        } else {
            actions
        }
    }

    /// The action spec this policy clips to.
    pub fn action_spec(&self) -> &ActionSpec {
        &self.action_spec
    }

    /// Whether this policy clips its output.
    pub fn clip(&self) -> bool {
        self.clip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::module::{Module, Param};
    use burn::nn::{Initializer, Linear, LinearConfig};

    type B = NdArray<f32>;

    fn device() -> <B as Backend>::Device {
        <B as Backend>::Device::default()
    }

    /// Zero-weight linear with a fixed bias: outputs the bias row for any
    /// observation.
    #[derive(Module, Debug)]
    struct ConstantActor<B: Backend> {
        linear: Linear<B>,
    }

    impl<B: Backend> ConstantActor<B> {
        fn new(obs_dim: usize, actions: &[f32], device: &B::Device) -> Self {
            let mut linear = LinearConfig::new(obs_dim, actions.len())
                .with_initializer(Initializer::Zeros)
                .init(device);
            linear.bias = linear.bias.take().map(|bias| {
                Param::initialized(bias.id.clone(), Tensor::from_floats(actions, device))
            });
            Self { linear }
        }
    }

    impl<B: Backend> ActorNetwork<B> for ConstantActor<B> {
        fn forward(&self, observations: Tensor<B, 2>) -> Tensor<B, 2> {
            self.linear.forward(observations)
        }

        fn observation_dim(&self) -> usize {
            self.linear.weight.val().dims()[0]
        }

        fn action_dim(&self) -> usize {
            self.linear.weight.val().dims()[1]
        }
    }

    fn rows(tensor: Tensor<B, 2>) -> Vec<f32> {
        tensor.into_data().as_slice::<f32>().unwrap().to_vec()
    }

    #[test]
    fn test_scale_unscale_round_trip() {
        let device = device();
        let normalized: Tensor<B, 2> = Tensor::from_floats([[0.5, -0.5], [0.0, 1.0]], &device);
        let spec = ActionSpec::new(vec![-2.0, 0.0], vec![2.0, 10.0]);

        let scaled = scale_to_spec(normalized.clone(), &spec);
        let scaled_vals = rows(scaled.clone());
        // 0.5 in [-2, 2]: scale 2, offset 0 -> 1.0
        assert!((scaled_vals[0] - 1.0).abs() < 1e-5);
        // -0.5 in [0, 10]: scale 5, offset 5 -> 2.5
        assert!((scaled_vals[1] - 2.5).abs() < 1e-5);

        let recovered = rows(unscale_from_spec(scaled, &spec));
        for (original, back) in rows(normalized).iter().zip(recovered.iter()) {
            assert!((original - back).abs() < 1e-5);
        }
    }

    #[test]
    fn test_clip_to_spec_bounds_each_component() {
        let device = device();
        let actions: Tensor<B, 2> = Tensor::from_floats([[5.0, -3.0], [0.5, 0.2]], &device);
        let spec = ActionSpec::new(vec![-1.0, -0.5], vec![1.0, 0.5]);

        let clipped = rows(clip_to_spec(actions, &spec));

        assert!((clipped[0] - 1.0).abs() < 1e-5, "5.0 clips to high");
        assert!((clipped[1] - (-0.5)).abs() < 1e-5, "-3.0 clips to low");
        assert!((clipped[2] - 0.5).abs() < 1e-5, "in-range value unchanged");
        assert!((clipped[3] - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_clipped_policy_respects_spec() {
        let device = device();
        let actor = ConstantActor::new(3, &[2.0, -2.0], &device);
        let spec = ActionSpec::symmetric(2, 1.0);
        let policy = ActorPolicy::new(actor, spec, true);

        let observations = Tensor::zeros([4, 3], &device);
        let actions = rows(policy.action(observations));

        for (i, a) in actions.iter().enumerate() {
            assert!(
                (-1.0..=1.0).contains(a),
                "action {} out of bounds: {}",
                i,
                a
            );
        }
        assert!((actions[0] - 1.0).abs() < 1e-5);
        assert!((actions[1] + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_unclipped_policy_passes_through() {
        let device = device();
        let actor = ConstantActor::new(3, &[2.0, -2.0], &device);
        let spec = ActionSpec::symmetric(2, 1.0);
        let policy = ActorPolicy::new(actor, spec, false);

        let observations = Tensor::zeros([1, 3], &device);
        let actions = rows(policy.action(observations));

        assert!((actions[0] - 2.0).abs() < 1e-5);
        assert!((actions[1] + 2.0).abs() < 1e-5);
    }
}
