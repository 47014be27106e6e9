//! Policies derived from the agent's actor network.
//!
//! Two flavors:
//! - [`ActorPolicy`]: deterministic, greedy. Used for evaluation and
//!   deployment, clipped to the action spec.
//! - [`OuNoisePolicy`]: the collect policy. Adds Ornstein-Uhlenbeck noise
//!   to unclipped actor output, then clips once.
//!
//! Both operate on inference-mode network snapshots; the agent hands out
//! fresh instances reflecting its current weights.

mod actor_policy;
mod ou_noise;

pub use actor_policy::{clip_to_spec, scale_to_spec, unscale_from_spec, ActorPolicy};
pub use ou_noise::{OuNoisePolicy, OuProcess};
