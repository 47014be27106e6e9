//! DDPG agent.
//!
//! Deep Deterministic Policy Gradient couples a deterministic actor with a
//! Q critic and trains both off-policy from two-step trajectory windows:
//!
//! ```text
//! critic:  y    = scale * r' + gamma * d' * Q_target(s', mu_target(s'))
//!          L_Q  = mean(huber(y, Q(s, a)))
//! actor:   dqda = dQ(s, mu(s)) / da              (optionally clipped)
//!          L_mu = mse(stop_gradient(dqda + mu(s)), mu(s))
//! ```
//!
//! One `train` call steps the critic first, then evaluates the actor loss
//! against a pre-update snapshot of the critic, steps the actor, and finally
//! nudges both target networks toward their online counterparts under the
//! periodic gate. Each loss is backpropagated as soon as it is built, so
//! every backward pass consumes exactly one autodiff graph.
//!
//! The agent owns four networks (online and target copies of actor and
//! critic), one optimizer per online network, and the soft target updater.
//! [`DdpgAgent::initialize`] performs the hard target sync and must run
//! before training.

use burn::grad_clipping::GradientClippingConfig;
use burn::module::AutodiffModule;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::Tensor;

use crate::agent::config::DdpgConfig;
use crate::agent::losses::{dpg_actor_loss, td_targets};
use crate::agent::networks::{ActorNetwork, CriticNetwork};
use crate::agent::transitions::to_transitions;
use crate::core::error::DdpgError;
use crate::core::spec::{ActionSpec, TimeStepSpec};
use crate::core::target_network::{hard_copy, TargetUpdater};
use crate::core::time_step::{TimeStepBatch, Trajectory};
use crate::metrics::summaries::{variable_summaries, TensorSummary, VariableSummary};
use crate::policy::{ActorPolicy, OuNoisePolicy};

// ============================================================================
// DdpgLossInfo
// ============================================================================

/// Training loss information for one DDPG step.
#[derive(Debug, Clone, Default)]
pub struct DdpgLossInfo {
    /// Sum of actor and critic loss values.
    pub total_loss: f32,
    /// Actor loss value.
    pub actor_loss: f32,
    /// Critic loss value.
    pub critic_loss: f32,
    /// Distribution summaries of the critic's TD quantities.
    /// Present when `debug_summaries` is enabled.
    pub debug: Option<DebugSummaries>,
    /// Per-parameter summaries of the online actor after its step.
    /// Present when `summarize_grads_and_vars` is enabled.
    pub actor_variables: Option<Vec<VariableSummary>>,
    /// Per-parameter summaries of the online critic after its step.
    /// Present when `summarize_grads_and_vars` is enabled.
    pub critic_variables: Option<Vec<VariableSummary>>,
}

impl DdpgLossInfo {
    /// Format losses for logging.
    pub fn format(&self) -> String {
        format!(
            "total_loss={:.4} | actor_loss={:.4} | critic_loss={:.4}",
            self.total_loss, self.actor_loss, self.critic_loss
        )
    }
}

/// Distribution summaries of the quantities entering the critic loss.
#[derive(Debug, Clone)]
pub struct DebugSummaries {
    /// `td_target - q`, per batch element.
    pub td_errors: TensorSummary,
    /// Bootstrapped regression targets.
    pub td_targets: TensorSummary,
    /// Online critic estimates for the batch actions.
    pub q_values: TensorSummary,
}

// ============================================================================
// DdpgAgent
// ============================================================================

/// A DDPG agent: four networks, two optimizers, one target updater.
///
/// Generic over the backend, the network implementations, and the optimizer
/// implementations, so any [`ActorNetwork`]/[`CriticNetwork`] pair trains
/// with any `burn` optimizer. [`create_optimizers`] builds the standard Adam
/// pair from the config.
///
/// Training calls must be serialized by the owner; the agent performs no
/// internal locking.
pub struct DdpgAgent<B, A, C, OA, OC>
where
    B: AutodiffBackend,
{
    config: DdpgConfig,
    time_step_spec: TimeStepSpec,
    action_spec: ActionSpec,
    actor: A,
    target_actor: A,
    critic: C,
    target_critic: C,
    actor_optimizer: OA,
    critic_optimizer: OC,
    target_updater: TargetUpdater,
    initialized: bool,
    train_steps: usize,
    device: B::Device,
}

impl<B, A, C, OA, OC> DdpgAgent<B, A, C, OA, OC>
where
    B: AutodiffBackend,
    A: ActorNetwork<B> + AutodiffModule<B>,
    C: CriticNetwork<B> + AutodiffModule<B>,
    OA: Optimizer<A, B>,
    OC: Optimizer<C, B>,
{
    /// Create an agent from networks, optimizers, and configuration.
    ///
    /// Validates the config and specs and checks that both networks agree
    /// with the spec dimensions. Target networks start as copies of the
    /// online networks; the agent still requires [`initialize`] before
    /// [`train`] so the hard sync point is explicit.
    ///
    /// [`initialize`]: DdpgAgent::initialize
    /// [`train`]: DdpgAgent::train
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        time_step_spec: TimeStepSpec,
        action_spec: ActionSpec,
        actor: A,
        critic: C,
        actor_optimizer: OA,
        critic_optimizer: OC,
        config: DdpgConfig,
        device: &B::Device,
    ) -> Result<Self, DdpgError> {
        config.validate()?;
        time_step_spec.validate()?;
        action_spec.validate()?;

        if actor.observation_dim() != time_step_spec.observation_dim {
            return Err(DdpgError::Configuration(format!(
                "actor consumes {} observation features, time step spec has {}",
                actor.observation_dim(),
                time_step_spec.observation_dim
            )));
        }
        if actor.action_dim() != action_spec.action_dim() {
            return Err(DdpgError::Configuration(format!(
                "actor produces {} action components, action spec has {}",
                actor.action_dim(),
                action_spec.action_dim()
            )));
        }
        if critic.observation_dim() != time_step_spec.observation_dim {
            return Err(DdpgError::Configuration(format!(
                "critic consumes {} observation features, time step spec has {}",
                critic.observation_dim(),
                time_step_spec.observation_dim
            )));
        }
        if critic.action_dim() != action_spec.action_dim() {
            return Err(DdpgError::Configuration(format!(
                "critic consumes {} action components, action spec has {}",
                critic.action_dim(),
                action_spec.action_dim()
            )));
        }

        let target_actor = hard_copy(&actor, device);
        let target_critic = hard_copy(&critic, device);
        let target_updater =
            TargetUpdater::new(config.target_update_tau, config.target_update_period);

        Ok(Self {
            config,
            time_step_spec,
            action_spec,
            actor,
            target_actor,
            critic,
            target_critic,
            actor_optimizer,
            critic_optimizer,
            target_updater,
            initialized: false,
            train_steps: 0,
            device: device.clone(),
        })
    }

    /// Hard-sync both target networks with their online counterparts and
    /// mark the agent ready for training.
    pub fn initialize(&mut self) {
        self.target_actor = hard_copy(&self.actor, &self.device);
        self.target_critic = hard_copy(&self.critic, &self.device);
        self.initialized = true;
    }

    /// Train on one batch of experience.
    ///
    /// The experience must span exactly two consecutive time steps per
    /// sample. One call runs the full update sequence: transition
    /// extraction, critic loss + critic optimizer step, actor loss (against
    /// a pre-update snapshot of the critic) + actor optimizer step, gated
    /// target update. Each backward pass runs immediately after its loss is
    /// built and owns its graph outright; the snapshot is re-registered via
    /// `fork` so the actor pass never shares graph nodes with the critic
    /// pass.
    ///
    /// Numeric failures are not caught: a NaN loss is returned as-is and
    /// detection is the caller's responsibility.
    pub fn train(&mut self, experience: &Trajectory<B>) -> Result<DdpgLossInfo, DdpgError> {
        if !self.initialized {
            return Err(DdpgError::Configuration(
                "agent must be initialized before training".to_string(),
            ));
        }
        self.check_experience(experience)?;

        let (time_steps, actions, next_time_steps) = to_transitions(experience)?;

        // Pre-update critic for the actor pass, taken before the optimizer
        // moves the online weights.
        let critic_snapshot = self.critic.clone().fork(&self.device);

        let (critic_loss, debug) = self.critic_loss(&time_steps, actions, &next_time_steps);
        let critic_loss_val = tensor_to_scalar(&critic_loss);
        let critic_grads = critic_loss.backward();
        let critic_grads = GradientsParams::from_grads(critic_grads, &self.critic);
        let critic = self.critic.clone();
        self.critic =
            self.critic_optimizer
                .step(self.config.critic_learning_rate, critic, critic_grads);

        let actor_loss = self.actor_loss(&critic_snapshot, &time_steps)?;
        let actor_loss_val = tensor_to_scalar(&actor_loss);
        let actor_grads = actor_loss.backward();
        let actor_grads = GradientsParams::from_grads(actor_grads, &self.actor);
        let actor = self.actor.clone();
        self.actor = self
            .actor_optimizer
            .step(self.config.actor_learning_rate, actor, actor_grads);

        let (target_critic, target_actor) = self.target_updater.maybe_update(
            &self.critic,
            self.target_critic.clone(),
            &self.actor,
            self.target_actor.clone(),
            &self.device,
        );
        self.target_critic = target_critic;
        self.target_actor = target_actor;

        self.train_steps += 1;

        let (actor_variables, critic_variables) = if self.config.summarize_grads_and_vars {
            (
                Some(variable_summaries(&self.actor)),
                Some(variable_summaries(&self.critic)),
            )
        } else {
            (None, None)
        };

        Ok(DdpgLossInfo {
            total_loss: actor_loss_val + critic_loss_val,
            actor_loss: actor_loss_val,
            critic_loss: critic_loss_val,
            debug,
            actor_variables,
            critic_variables,
        })
    }

    /// Critic loss over aligned transitions.
    ///
    /// Builds `y = scale * r' + gamma * d' * Q_target(s', mu_target(s'))` as
    /// a detached regression target, evaluates the configured elementwise
    /// loss against `Q(s, a)`, and reduces by the batch mean.
    fn critic_loss(
        &self,
        time_steps: &TimeStepBatch<B>,
        actions: Tensor<B, 2>,
        next_time_steps: &TimeStepBatch<B>,
    ) -> (Tensor<B, 1>, Option<DebugSummaries>) {
        let next_actions = self
            .target_actor
            .forward(next_time_steps.observations.clone());
        let target_q = self
            .target_critic
            .forward(next_time_steps.observations.clone(), next_actions);
        let targets = td_targets(
            next_time_steps.rewards.clone(),
            next_time_steps.discounts.clone(),
            target_q,
            self.config.gamma,
            self.config.reward_scale_factor,
        );

        let q = self.critic.forward(time_steps.observations.clone(), actions);
        let per_sample = self.config.td_errors_loss.evaluate(targets.clone(), q.clone());
        let loss = per_sample.mean();

        let debug = if self.config.debug_summaries {
            Some(DebugSummaries {
                td_errors: TensorSummary::of(&(targets.clone() - q.clone())),
                td_targets: TensorSummary::of(&targets),
                q_values: TensorSummary::of(&q),
            })
        } else {
            None
        };

        (loss, debug)
    }

    /// Actor loss over the current time steps, evaluated against the given
    /// critic (the pre-update snapshot during training).
    ///
    /// Computes `dqda`, the gradient of the summed critic output w.r.t. the
    /// actor's actions, through a detached leaf so the critic itself is not
    /// differentiated a second time. The loss is a squared error against the
    /// fixed targets `dqda + mu(s)`, whose actor gradient moves each action
    /// component in the direction that increases Q.
    fn actor_loss(
        &self,
        critic: &C,
        time_steps: &TimeStepBatch<B>,
    ) -> Result<Tensor<B, 1>, DdpgError> {
        let observations = time_steps.observations.clone();
        let actions = self.actor.forward(observations.clone());

        // Each sample's Q depends only on its own action row, so the
        // gradient of the sum recovers per-sample dQ/da.
        let action_leaf = actions.clone().detach().require_grad();
        let q = critic.forward(observations, action_leaf.clone());
        let grads = q.sum().backward();
        let dqda = action_leaf.grad(&grads).ok_or_else(|| {
            DdpgError::Configuration(
                "critic output does not depend on its action input".to_string(),
            )
        })?;

        // Rebuild on the training backend with no history; the targets are
        // fixed and gradients flow only through `actions`.
        let dqda = Tensor::<B, 2>::from_data(dqda.into_data(), &self.device);
        let dqda = match self.config.effective_dqda_clipping() {
            Some(clip) => dqda.clamp(-clip, clip),
            None => dqda,
        };

        let targets = (dqda + actions.clone()).detach();
        Ok(dpg_actor_loss(targets, actions))
    }

    fn check_experience(&self, experience: &Trajectory<B>) -> Result<(), DdpgError> {
        if experience.observation_dim() != self.time_step_spec.observation_dim {
            return Err(DdpgError::InvalidInput(format!(
                "experience observations carry {} features, agent expects {}",
                experience.observation_dim(),
                self.time_step_spec.observation_dim
            )));
        }
        if experience.action_dim() != self.action_spec.action_dim() {
            return Err(DdpgError::InvalidInput(format!(
                "experience actions carry {} components, agent expects {}",
                experience.action_dim(),
                self.action_spec.action_dim()
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Policies
    // ========================================================================

    /// Evaluation policy: deterministic actor output, clipped to the action
    /// spec. Runs a gradient-free snapshot of the online actor.
    pub fn policy(&self) -> ActorPolicy<B::InnerBackend, A::InnerModule>
    where
        A::InnerModule: ActorNetwork<B::InnerBackend>,
    {
        ActorPolicy::new(self.actor.valid(), self.action_spec.clone(), true)
    }

    /// Collect policy: unclipped actor output plus Ornstein-Uhlenbeck
    /// exploration noise, with the sum clipped to the action spec.
    pub fn collect_policy(&self) -> OuNoisePolicy<B::InnerBackend, A::InnerModule>
    where
        A::InnerModule: ActorNetwork<B::InnerBackend>,
    {
        OuNoisePolicy::new(
            ActorPolicy::new(self.actor.valid(), self.action_spec.clone(), false),
            self.config.ou_stddev,
            self.config.ou_damping,
            &self.device,
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Online actor network.
    pub fn actor(&self) -> &A {
        &self.actor
    }

    /// Target actor network.
    pub fn target_actor(&self) -> &A {
        &self.target_actor
    }

    /// Online critic network.
    pub fn critic(&self) -> &C {
        &self.critic
    }

    /// Target critic network.
    pub fn target_critic(&self) -> &C {
        &self.target_critic
    }

    /// Agent configuration.
    pub fn config(&self) -> &DdpgConfig {
        &self.config
    }

    /// Action spec the agent was built with.
    pub fn action_spec(&self) -> &ActionSpec {
        &self.action_spec
    }

    /// Time step spec the agent was built with.
    pub fn time_step_spec(&self) -> &TimeStepSpec {
        &self.time_step_spec
    }

    /// Whether `initialize` has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of completed training calls.
    pub fn train_steps(&self) -> usize {
        self.train_steps
    }

    /// Number of target update calls observed (fired or skipped).
    pub fn target_update_calls(&self) -> usize {
        self.target_updater.calls()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Create configured Adam optimizers for the actor and critic.
///
/// Both use epsilon 1e-5 and share the config's gradient clipping norm.
/// Returns (actor_optimizer, critic_optimizer).
pub fn create_optimizers<B, A, C>(
    config: &DdpgConfig,
) -> (impl Optimizer<A, B>, impl Optimizer<C, B>)
where
    B: AutodiffBackend,
    A: AutodiffModule<B>,
    C: AutodiffModule<B>,
{
    let mut actor_config = AdamConfig::new().with_epsilon(1e-5);
    let mut critic_config = AdamConfig::new().with_epsilon(1e-5);

    if let Some(max_norm) = config.gradient_clipping {
        actor_config =
            actor_config.with_grad_clipping(Some(GradientClippingConfig::Norm(max_norm)));
        critic_config =
            critic_config.with_grad_clipping(Some(GradientClippingConfig::Norm(max_norm)));
    }

    (actor_config.init(), critic_config.init())
}

/// Extract scalar from 1D tensor.
fn tensor_to_scalar<B: AutodiffBackend>(tensor: &Tensor<B, 1>) -> f32 {
    let data = tensor.clone().into_data();
    data.as_slice::<f32>().unwrap()[0]
}
