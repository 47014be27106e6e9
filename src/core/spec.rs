//! Structural specs for actions and time steps.
//!
//! Specs describe the *shape* of the data the agent exchanges with its
//! networks and policies: how many observation features a time step carries,
//! and how many components an action has together with its per-component
//! bounds. They are immutable, defined once at agent construction, and
//! validated there.

use serde::{Deserialize, Serialize};

use super::error::DdpgError;

// ============================================================================
// ActionSpec
// ============================================================================

/// Description of a bounded continuous action space.
///
/// Each action component `i` lives in `[low[i], high[i]]`. Policies use the
/// bounds for clipping and the reference actor network uses them to scale
/// its tanh head.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Per-component lower bounds.
    pub low: Vec<f32>,
    /// Per-component upper bounds.
    pub high: Vec<f32>,
}

impl ActionSpec {
    /// Create a spec from explicit per-component bounds.
    pub fn new(low: Vec<f32>, high: Vec<f32>) -> Self {
        Self { low, high }
    }

    /// Create a spec where every component lives in `[-bound, bound]`.
    pub fn symmetric(action_dim: usize, bound: f32) -> Self {
        Self {
            low: vec![-bound; action_dim],
            high: vec![bound; action_dim],
        }
    }

    /// Number of action components.
    pub fn action_dim(&self) -> usize {
        self.low.len()
    }

    /// Check the spec is well formed: matching bound lengths, finite values,
    /// and strictly positive width per component (action scaling divides by
    /// the component width, so zero-width components are rejected).
    pub fn validate(&self) -> Result<(), DdpgError> {
        if self.low.is_empty() {
            return Err(DdpgError::Configuration(
                "action spec must have at least one component".to_string(),
            ));
        }
        if self.low.len() != self.high.len() {
            return Err(DdpgError::Configuration(format!(
                "action spec bounds disagree on dimension: low has {}, high has {}",
                self.low.len(),
                self.high.len()
            )));
        }
        for (i, (l, h)) in self.low.iter().zip(self.high.iter()).enumerate() {
            if !l.is_finite() || !h.is_finite() {
                return Err(DdpgError::Configuration(format!(
                    "action spec bounds must be finite (component {})",
                    i
                )));
            }
            if l >= h {
                return Err(DdpgError::Configuration(format!(
                    "action spec requires low < high per component, got [{}, {}] at component {}",
                    l, h, i
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// TimeStepSpec
// ============================================================================

/// Description of the per-step record the environment produces.
///
/// Rewards, discounts and step types are scalars per sample; only the
/// observation carries a feature dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeStepSpec {
    /// Number of observation features.
    pub observation_dim: usize,
}

impl TimeStepSpec {
    /// Create a spec for flat observations of the given dimension.
    pub fn new(observation_dim: usize) -> Self {
        Self { observation_dim }
    }

    /// Check the spec is well formed.
    pub fn validate(&self) -> Result<(), DdpgError> {
        if self.observation_dim == 0 {
            return Err(DdpgError::Configuration(
                "time step spec requires a non-zero observation dimension".to_string(),
            ));
        }
        Ok(())
    }
}
