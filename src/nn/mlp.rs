//! Reference MLP actor and critic networks.
//!
//! The agent trains any [`ActorNetwork`]/[`CriticNetwork`] pair; these are
//! the stock feed-forward architectures continuous-control tasks start from:
//!
//! ```text
//! actor:   obs -> Linear -> relu -> Linear -> relu -> Linear -> tanh -> bounds
//! critic:  cat(obs, action) -> Linear -> relu -> Linear -> relu -> Linear -> Q
//! ```
//!
//! The actor's tanh head is rescaled to the action spec, so its output always
//! respects the per-component bounds. Output layers use a small uniform
//! initialization; hidden layers keep the default fan-in scaled init.
//!
//! # Usage
//!
//! ```ignore
//! let actor: MlpActor<B> =
//!     MlpActorConfig::new(obs_dim, action_spec.clone()).init(&device);
//! let critic: MlpCritic<B> =
//!     MlpCriticConfig::new(obs_dim, action_spec.action_dim()).init(&device);
//! ```
//!
//! [`ActorNetwork`]: crate::agent::ActorNetwork
//! [`CriticNetwork`]: crate::agent::CriticNetwork

use burn::module::{Ignored, Module};
use burn::nn::{Initializer, Linear, LinearConfig};
use burn::tensor::activation::relu;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::agent::{ActorNetwork, CriticNetwork};
use crate::core::spec::ActionSpec;
use crate::policy::scale_to_spec;

/// Uniform bound for output layer weights and biases. Keeps initial actions
/// near the midpoint of the action bounds and initial Q estimates near zero.
const HEAD_INIT_BOUND: f64 = 3e-3;

// ============================================================================
// MlpActor
// ============================================================================

/// Configuration for the reference MLP actor.
#[derive(Debug, Clone)]
pub struct MlpActorConfig {
    /// Number of observation features.
    pub observation_dim: usize,
    /// Action bounds; the tanh head is rescaled to these.
    pub action_spec: ActionSpec,
    /// First hidden layer width.
    pub d_hidden_0: usize,
    /// Second hidden layer width.
    pub d_hidden_1: usize,
}

impl MlpActorConfig {
    /// Create a configuration with 400/300 hidden layers.
    pub fn new(observation_dim: usize, action_spec: ActionSpec) -> Self {
        Self {
            observation_dim,
            action_spec,
            d_hidden_0: 400,
            d_hidden_1: 300,
        }
    }

    /// Set the hidden layer widths.
    pub fn with_hidden_sizes(mut self, d_hidden_0: usize, d_hidden_1: usize) -> Self {
        self.d_hidden_0 = d_hidden_0;
        self.d_hidden_1 = d_hidden_1;
        self
    }

    /// Initialize the network.
    pub fn init<B: Backend>(&self, device: &B::Device) -> MlpActor<B> {
        MlpActor {
            hidden_0: LinearConfig::new(self.observation_dim, self.d_hidden_0).init(device),
            hidden_1: LinearConfig::new(self.d_hidden_0, self.d_hidden_1).init(device),
            head: LinearConfig::new(self.d_hidden_1, self.action_spec.action_dim())
                .with_initializer(Initializer::Uniform {
                    min: -HEAD_INIT_BOUND,
                    max: HEAD_INIT_BOUND,
                })
                .init(device),
            observation_dim: self.observation_dim,
            action_spec: Ignored(self.action_spec.clone()),
        }
    }
}

/// Feed-forward deterministic actor: two ReLU hidden layers and a tanh head
/// scaled to the action spec bounds.
///
/// The spec is carried as [`Ignored`] state: it is part of the module but
/// holds no parameters.
#[derive(Module, Debug)]
pub struct MlpActor<B: Backend> {
    hidden_0: Linear<B>,
    hidden_1: Linear<B>,
    head: Linear<B>,
    #[module(skip)]
    observation_dim: usize,
    action_spec: Ignored<ActionSpec>,
}

impl<B: Backend> ActorNetwork<B> for MlpActor<B> {
    fn forward(&self, observations: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.hidden_0.forward(observations));
        let x = relu(self.hidden_1.forward(x));
        let normalized = self.head.forward(x).tanh();
        scale_to_spec(normalized, &self.action_spec.0)
    }

    fn observation_dim(&self) -> usize {
        self.observation_dim
    }

    fn action_dim(&self) -> usize {
        self.action_spec.0.action_dim()
    }
}

// ============================================================================
// MlpCritic
// ============================================================================

/// Configuration for the reference MLP critic.
#[derive(Debug, Clone)]
pub struct MlpCriticConfig {
    /// Number of observation features.
    pub observation_dim: usize,
    /// Number of action components.
    pub action_dim: usize,
    /// First hidden layer width.
    pub d_hidden_0: usize,
    /// Second hidden layer width.
    pub d_hidden_1: usize,
}

impl MlpCriticConfig {
    /// Create a configuration with 400/300 hidden layers.
    pub fn new(observation_dim: usize, action_dim: usize) -> Self {
        Self {
            observation_dim,
            action_dim,
            d_hidden_0: 400,
            d_hidden_1: 300,
        }
    }

    /// Set the hidden layer widths.
    pub fn with_hidden_sizes(mut self, d_hidden_0: usize, d_hidden_1: usize) -> Self {
        self.d_hidden_0 = d_hidden_0;
        self.d_hidden_1 = d_hidden_1;
        self
    }

    /// Initialize the network.
    pub fn init<B: Backend>(&self, device: &B::Device) -> MlpCritic<B> {
        let d_input = self.observation_dim + self.action_dim;
        MlpCritic {
            hidden_0: LinearConfig::new(d_input, self.d_hidden_0).init(device),
            hidden_1: LinearConfig::new(self.d_hidden_0, self.d_hidden_1).init(device),
            head: LinearConfig::new(self.d_hidden_1, 1)
                .with_initializer(Initializer::Uniform {
                    min: -HEAD_INIT_BOUND,
                    max: HEAD_INIT_BOUND,
                })
                .init(device),
            observation_dim: self.observation_dim,
            action_dim: self.action_dim,
        }
    }
}

/// Feed-forward Q critic over concatenated observation and action features.
#[derive(Module, Debug)]
pub struct MlpCritic<B: Backend> {
    hidden_0: Linear<B>,
    hidden_1: Linear<B>,
    head: Linear<B>,
    #[module(skip)]
    observation_dim: usize,
    #[module(skip)]
    action_dim: usize,
}

impl<B: Backend> CriticNetwork<B> for MlpCritic<B> {
    fn forward(&self, observations: Tensor<B, 2>, actions: Tensor<B, 2>) -> Tensor<B, 1> {
        let x = Tensor::cat(vec![observations, actions], 1);
        let x = relu(self.hidden_0.forward(x));
        let x = relu(self.hidden_1.forward(x));
        // Q head: [batch, 1] -> [batch]
        self.head.forward(x).flatten(0, 1)
    }

    fn observation_dim(&self) -> usize {
        self.observation_dim
    }

    fn action_dim(&self) -> usize {
        self.action_dim
    }
}
