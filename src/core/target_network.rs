//! Target network soft updates.
//!
//! DDPG bootstraps its critic from slow-moving copies of both networks. The
//! online actor and critic train by gradient descent; the target actor and
//! critic only ever move by Polyak averaging toward their online
//! counterparts:
//!
//! ```text
//! w_target = tau * w_online + (1 - tau) * w_target
//! ```
//!
//! `tau = 1.0` is a hard copy and is what agent initialization uses to make
//! the targets exactly equal the online weights before any training. During
//! training a small `tau` (or a larger one applied every `period` calls)
//! keeps the regression targets from chasing their own updates.
//!
//! [`soft_update`] and [`hard_copy`] work on any pair of [`Module`]s with the
//! same architecture; [`TargetUpdater`] adds the call counter that gates
//! updates to every `period`-th training call and applies the blend to the
//! critic pair and the actor pair under a single gate.

use burn::module::{Module, ModuleMapper, Param};
use burn::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

// ============================================================================
// Parameter traversal
// ============================================================================

/// Collects every float parameter of a module, flattened to rank 1 so
/// tensors of varying rank fit in one Vec. Traversal order is deterministic
/// for two modules of the same architecture, which is how online and target
/// parameters are matched without relying on shared parameter ids.
struct ParamCollector<B: Backend> {
    params: Vec<Tensor<B, 1>>,
}

impl<B: Backend> ModuleMapper<B> for ParamCollector<B> {
    fn map_float<const D: usize>(&mut self, param: Param<Tensor<B, D>>) -> Param<Tensor<B, D>> {
        let value = param.val();
        let numel: usize = value.dims().iter().product();
        self.params.push(value.reshape([numel]));
        param
    }
}

/// Writes the Polyak blend of collected online parameters into a target
/// module, matching parameters by traversal order.
struct PolyakMapper<B: Backend> {
    online_params: Vec<Tensor<B, 1>>,
    tau: f32,
    next: usize,
}

impl<B: Backend> ModuleMapper<B> for PolyakMapper<B> {
    fn map_float<const D: usize>(&mut self, param: Param<Tensor<B, D>>) -> Param<Tensor<B, D>> {
        let target_value = param.val();
        let shape = target_value.dims();
        let numel: usize = shape.iter().product();

        let idx = self.next;
        self.next += 1;

        match self.online_params.get(idx) {
            Some(online) => {
                let blended = online.clone().mul_scalar(self.tau)
                    + target_value.reshape([numel]).mul_scalar(1.0 - self.tau);
                Param::initialized(param.id.clone(), blended.reshape(shape))
            }
            // Architectures disagree on parameter count; leave the tail
            // of the target untouched.
            None => param,
        }
    }
}

// ============================================================================
// Free update functions
// ============================================================================

/// Blend online parameters into a target module.
///
/// For every parameter pair: `w_target = tau * w_online + (1 - tau) * w_target`.
/// `tau` close to 1 short-circuits to a clone of the online module and `tau`
/// close to 0 returns the target unchanged.
///
/// # Arguments
/// * `online` - Module holding the trained weights
/// * `target` - Module to move toward the online weights
/// * `tau` - Blend factor in `[0, 1]`
/// * `_device` - Unused; tensors carry their device
pub fn soft_update<B, M>(online: &M, target: M, tau: f32, _device: &B::Device) -> M
where
    B: Backend,
    M: Module<B>,
{
    // The endpoints collapse to a copy or a no-op; resolving them here keeps
    // tau=1 an exact copy instead of a blend with rounding error.
    if tau >= 1.0 - 1e-6 {
        return online.clone();
    }
    if tau <= 1e-6 {
        return target;
    }

    let mut collector = ParamCollector { params: Vec::new() };
    let _ = online.clone().map(&mut collector);

    let mut mapper = PolyakMapper {
        online_params: collector.params,
        tau,
        next: 0,
    };
    target.map(&mut mapper)
}

/// Replace target weights with the online weights (`tau = 1.0`).
pub fn hard_copy<B, M>(online: &M, _device: &B::Device) -> M
where
    B: Backend,
    M: Module<B>,
{
    online.clone()
}

// ============================================================================
// TargetUpdater
// ============================================================================

/// Periodic target update component.
///
/// Owns the blend factor, the update period, and the call counter that gates
/// execution. One counter gates both network pairs: the agent's training
/// step hands over the critic pair and the actor pair together, and on a
/// firing call both are blended (critic first). Skipped calls hand the
/// target modules back unchanged, so callers compose the result identically
/// either way.
///
/// The counter is an `AtomicUsize` so gating takes `&self`. It is not a
/// concurrency guarantee; training calls must be serialized by the owner.
#[derive(Debug)]
pub struct TargetUpdater {
    tau: f32,
    period: usize,
    calls: AtomicUsize,
}

impl Clone for TargetUpdater {
    fn clone(&self) -> Self {
        Self {
            tau: self.tau,
            period: self.period,
            calls: AtomicUsize::new(self.calls.load(Ordering::Relaxed)),
        }
    }
}

impl TargetUpdater {
    /// Create an updater that blends with `tau` every `period` calls.
    ///
    /// A period of 0 behaves as 1 (update on every call).
    pub fn new(tau: f32, period: usize) -> Self {
        Self {
            tau,
            period: period.max(1),
            calls: AtomicUsize::new(0),
        }
    }

    /// Count this call and, when the call count is a multiple of the period,
    /// blend both target networks toward their online counterparts.
    ///
    /// Returns `(target_critic, target_actor)`, updated or unchanged.
    pub fn maybe_update<B, C, A>(
        &self,
        online_critic: &C,
        target_critic: C,
        online_actor: &A,
        target_actor: A,
        device: &B::Device,
    ) -> (C, A)
    where
        B: Backend,
        C: Module<B>,
        A: Module<B>,
    {
        let call = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        if call % self.period == 0 {
            (
                soft_update(online_critic, target_critic, self.tau, device),
                soft_update(online_actor, target_actor, self.tau, device),
            )
        } else {
            (target_critic, target_actor)
        }
    }

    /// Blend factor.
    pub fn tau(&self) -> f32 {
        self.tau
    }

    /// Call interval between updates.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Number of calls observed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Reset the call counter.
    pub fn reset(&mut self) {
        self.calls.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::nn::{Linear, LinearConfig};

    type TestBackend = NdArray<f32>;

    fn device() -> <TestBackend as Backend>::Device {
        <TestBackend as Backend>::Device::default()
    }

    fn linear(inputs: usize, outputs: usize) -> Linear<TestBackend> {
        LinearConfig::new(inputs, outputs).init::<TestBackend>(&device())
    }

    fn weights(module: &Linear<TestBackend>) -> Vec<f32> {
        module
            .weight
            .val()
            .into_data()
            .as_slice::<f32>()
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_soft_update_tau_zero_is_noop() {
        let device = device();
        let online = linear(4, 4);
        let target = linear(4, 4);
        let before = weights(&target);

        let updated = soft_update::<TestBackend, _>(&online, target, 0.0, &device);

        for (b, u) in before.iter().zip(weights(&updated).iter()) {
            assert!((b - u).abs() < 1e-6, "tau=0 must leave the target unchanged");
        }
    }

    #[test]
    fn test_soft_update_tau_one_copies_online() {
        let device = device();
        let online = linear(4, 4);
        let target = linear(4, 4);

        let updated = soft_update::<TestBackend, _>(&online, target, 1.0, &device);

        for (o, u) in weights(&online).iter().zip(weights(&updated).iter()) {
            assert!((o - u).abs() < 1e-6, "tau=1 must copy the online weights");
        }
    }

    #[test]
    fn test_soft_update_interpolates() {
        let device = device();
        let online = linear(4, 4);
        let target = linear(4, 4);
        let online_w = weights(&online);
        let target_w = weights(&target);

        let tau = 0.5f32;
        let updated = soft_update::<TestBackend, _>(&online, target, tau, &device);
        let updated_w = weights(&updated);

        for i in 0..online_w.len() {
            let expected = tau * online_w[i] + (1.0 - tau) * target_w[i];
            assert!(
                (updated_w[i] - expected).abs() < 1e-5,
                "expected {} at index {}, got {}",
                expected,
                i,
                updated_w[i]
            );
        }
    }

    #[test]
    fn test_soft_update_small_tau() {
        let device = device();
        let online = linear(8, 4);
        let target = linear(8, 4);
        let online_w = weights(&online);
        let target_w = weights(&target);

        let tau = 0.005f32;
        let updated = soft_update::<TestBackend, _>(&online, target, tau, &device);
        let updated_w = weights(&updated);

        for i in 0..online_w.len() {
            let expected = tau * online_w[i] + (1.0 - tau) * target_w[i];
            assert!((updated_w[i] - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_soft_update_covers_bias() {
        let device = device();
        let online = LinearConfig::new(4, 4).with_bias(true).init::<TestBackend>(&device);
        let target = LinearConfig::new(4, 4).with_bias(true).init::<TestBackend>(&device);

        let online_b: Vec<f32> = online
            .bias
            .as_ref()
            .unwrap()
            .val()
            .into_data()
            .as_slice::<f32>()
            .unwrap()
            .to_vec();
        let target_b: Vec<f32> = target
            .bias
            .as_ref()
            .unwrap()
            .val()
            .into_data()
            .as_slice::<f32>()
            .unwrap()
            .to_vec();

        let tau = 0.3f32;
        let updated = soft_update::<TestBackend, _>(&online, target, tau, &device);
        let updated_b: Vec<f32> = updated
            .bias
            .as_ref()
            .unwrap()
            .val()
            .into_data()
            .as_slice::<f32>()
            .unwrap()
            .to_vec();

        for i in 0..online_b.len() {
            let expected = tau * online_b[i] + (1.0 - tau) * target_b[i];
            assert!((updated_b[i] - expected).abs() < 1e-5, "bias index {}", i);
        }
    }

    #[test]
    fn test_hard_copy_matches_online() {
        let device = device();
        let online = linear(3, 2);
        let copied = hard_copy::<TestBackend, _>(&online, &device);

        for (o, c) in weights(&online).iter().zip(weights(&copied).iter()) {
            assert!((o - c).abs() < 1e-6);
        }
    }

    #[test]
    fn test_updater_fires_on_period_multiples() {
        let device = device();
        let online_critic = linear(4, 1);
        let online_actor = linear(4, 2);
        let updater = TargetUpdater::new(1.0, 3);

        // Calls 1 and 2 skip; call 3 fires.
        let (critic1, actor1) = updater.maybe_update::<TestBackend, _, _>(
            &online_critic,
            linear(4, 1),
            &online_actor,
            linear(4, 2),
            &device,
        );
        assert_eq!(updater.calls(), 1);
        // Fresh random targets almost surely differ from online.
        assert!(weights(&critic1) != weights(&online_critic));
        assert!(weights(&actor1) != weights(&online_actor));

        let (critic2, actor2) = updater.maybe_update::<TestBackend, _, _>(
            &online_critic,
            critic1,
            &online_actor,
            actor1,
            &device,
        );
        assert_eq!(updater.calls(), 2);
        assert!(weights(&critic2) != weights(&online_critic));

        let (critic3, actor3) = updater.maybe_update::<TestBackend, _, _>(
            &online_critic,
            critic2,
            &online_actor,
            actor2,
            &device,
        );
        assert_eq!(updater.calls(), 3);
        for (o, u) in weights(&online_critic).iter().zip(weights(&critic3).iter()) {
            assert!((o - u).abs() < 1e-6, "critic must sync on call 3 with tau=1");
        }
        for (o, u) in weights(&online_actor).iter().zip(weights(&actor3).iter()) {
            assert!((o - u).abs() < 1e-6, "actor must sync on call 3 with tau=1");
        }
    }

    #[test]
    fn test_updater_clone_keeps_counter() {
        let device = device();
        let online = linear(2, 2);
        let updater = TargetUpdater::new(0.5, 4);

        let _ = updater.maybe_update::<TestBackend, _, _>(
            &online,
            linear(2, 2),
            &online,
            linear(2, 2),
            &device,
        );
        let _ = updater.maybe_update::<TestBackend, _, _>(
            &online,
            linear(2, 2),
            &online,
            linear(2, 2),
            &device,
        );

        let cloned = updater.clone();
        assert_eq!(cloned.calls(), 2);
        assert_eq!(cloned.period(), 4);
        assert_eq!(cloned.tau(), 0.5);
    }

    #[test]
    fn test_updater_zero_period_behaves_as_one() {
        let updater = TargetUpdater::new(0.1, 0);
        assert_eq!(updater.period(), 1);
    }
}
