//! Distribution summaries for tensors and network parameters.
//!
//! Training diagnostics reduce to two shapes: a [`TensorSummary`] of one
//! rank-1 tensor (TD errors, TD targets, Q values) and a [`VariableSummary`]
//! per network parameter. Both are plain data, cheap to clone, and carried
//! inside the loss info; computing them never touches the autodiff graph.

use burn::module::{Module, ModuleMapper, Param};
use burn::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// TensorSummary
// ============================================================================

/// Min/max/mean/std of one tensor, as plain floats.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TensorSummary {
    /// Smallest element.
    pub min: f32,
    /// Largest element.
    pub max: f32,
    /// Arithmetic mean.
    pub mean: f32,
    /// Population standard deviation.
    pub std: f32,
}

impl TensorSummary {
    /// Summarize a rank-1 tensor.
    pub fn of<B: Backend>(tensor: &Tensor<B, 1>) -> Self {
        let data = tensor.clone().into_data();
        Self::from_values(data.as_slice::<f32>().unwrap())
    }

    /// Summarize a slice of values. Empty input yields the zero summary.
    pub fn from_values(values: &[f32]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f64;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v as f64;
        }
        let mean = sum / values.len() as f64;

        let variance = values
            .iter()
            .map(|&v| {
                let delta = v as f64 - mean;
                delta * delta
            })
            .sum::<f64>()
            / values.len() as f64;

        Self {
            min,
            max,
            mean: mean as f32,
            std: variance.sqrt() as f32,
        }
    }

    /// Format for logging.
    pub fn format(&self) -> String {
        format!(
            "mean={:.4} std={:.4} min={:.4} max={:.4}",
            self.mean, self.std, self.min, self.max
        )
    }
}

// ============================================================================
// VariableSummary
// ============================================================================

/// Summary of one network parameter tensor.
///
/// Parameters are numbered in module traversal order, the same order the
/// target updater matches them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSummary {
    /// Position in traversal order.
    pub index: usize,
    /// Parameter tensor shape.
    pub shape: Vec<usize>,
    /// Value distribution.
    pub summary: TensorSummary,
}

impl VariableSummary {
    /// Format for logging.
    pub fn format(&self) -> String {
        format!("var[{}] shape={:?} {}", self.index, self.shape, self.summary.format())
    }
}

/// Collects a [`VariableSummary`] for every float parameter.
struct SummaryCollector {
    summaries: Vec<VariableSummary>,
}

impl<B: Backend> ModuleMapper<B> for SummaryCollector {
    fn map_float<const D: usize>(&mut self, param: Param<Tensor<B, D>>) -> Param<Tensor<B, D>> {
        let value = param.val();
        let shape = value.dims().to_vec();
        let numel: usize = shape.iter().product();
        let flat: Tensor<B, 1> = value.reshape([numel]);

        self.summaries.push(VariableSummary {
            index: self.summaries.len(),
            shape,
            summary: TensorSummary::of(&flat),
        });
        param
    }
}

/// Summarize every float parameter of a module, in traversal order.
pub fn variable_summaries<B, M>(module: &M) -> Vec<VariableSummary>
where
    B: Backend,
    M: Module<B>,
{
    let mut collector = SummaryCollector {
        summaries: Vec::new(),
    };
    let _ = module.clone().map(&mut collector);
    collector.summaries
}

/// Collects the raw values of every float parameter.
struct ValueCollector {
    values: Vec<Vec<f32>>,
}

impl<B: Backend> ModuleMapper<B> for ValueCollector {
    fn map_float<const D: usize>(&mut self, param: Param<Tensor<B, D>>) -> Param<Tensor<B, D>> {
        let data = param.val().into_data();
        self.values.push(data.as_slice::<f32>().unwrap().to_vec());
        param
    }
}

/// Raw values of every float parameter of a module, flattened per parameter,
/// in the same traversal order as [`variable_summaries`] and the target
/// updater. Useful for exact parameter comparisons between network copies.
pub fn parameter_values<B, M>(module: &M) -> Vec<Vec<f32>>
where
    B: Backend,
    M: Module<B>,
{
    let mut collector = ValueCollector { values: Vec::new() };
    let _ = module.clone().map(&mut collector);
    collector.values
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::nn::{Initializer, LinearConfig};

    type TestBackend = NdArray<f32>;

    fn device() -> <TestBackend as Backend>::Device {
        <TestBackend as Backend>::Device::default()
    }

    #[test]
    fn test_summary_of_known_tensor() {
        let device = device();
        let tensor: Tensor<TestBackend, 1> = Tensor::from_floats([1.0, 2.0, 3.0, 4.0], &device);

        let summary = TensorSummary::of(&tensor);

        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 4.0);
        assert!((summary.mean - 2.5).abs() < 1e-6);
        // variance = (2.25 + 0.25 + 0.25 + 2.25) / 4 = 1.25
        assert!((summary.std - 1.25f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_summary_of_constant_tensor() {
        let summary = TensorSummary::from_values(&[3.0, 3.0, 3.0]);

        assert_eq!(summary.min, 3.0);
        assert_eq!(summary.max, 3.0);
        assert!((summary.mean - 3.0).abs() < 1e-6);
        assert!(summary.std.abs() < 1e-6);
    }

    #[test]
    fn test_summary_of_empty_slice() {
        let summary = TensorSummary::from_values(&[]);
        assert_eq!(summary, TensorSummary::default());
    }

    #[test]
    fn test_summary_format() {
        let summary = TensorSummary::from_values(&[1.0, 3.0]);
        let rendered = summary.format();

        assert!(rendered.contains("mean=2.0000"));
        assert!(rendered.contains("min=1.0000"));
        assert!(rendered.contains("max=3.0000"));
    }

    #[test]
    fn test_parameter_values_match_traversal_order() {
        let device = device();
        let linear = LinearConfig::new(2, 2)
            .with_initializer(Initializer::Zeros)
            .init::<TestBackend>(&device);

        let values = parameter_values(&linear);

        // Weight [2, 2] first, then bias [2], both all-zero.
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], vec![0.0; 4]);
        assert_eq!(values[1], vec![0.0; 2]);
    }

    #[test]
    fn test_variable_summaries_cover_weight_and_bias() {
        let device = device();
        let linear = LinearConfig::new(3, 2)
            .with_initializer(Initializer::Zeros)
            .init::<TestBackend>(&device);

        let summaries = variable_summaries(&linear);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].index, 0);
        assert_eq!(summaries[0].shape, vec![3, 2]);
        assert_eq!(summaries[1].index, 1);
        assert_eq!(summaries[1].shape, vec![2]);
        for entry in &summaries {
            assert_eq!(entry.summary.mean, 0.0);
            assert_eq!(entry.summary.std, 0.0);
        }
    }
}
