//! Reference network architectures.
//!
//! The agent accepts any implementation of the network traits in
//! [`crate::agent`]; this module ships the stock feed-forward pair most
//! continuous-control tasks start from.
//!
//! - [`mlp`]: MLP actor (tanh head scaled to the action bounds) and MLP
//!   critic (concatenated observation/action input)

pub mod mlp;

pub use mlp::{MlpActor, MlpActorConfig, MlpCritic, MlpCriticConfig};
