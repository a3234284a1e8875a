use serde::{Deserialize, Serialize};

use super::types::Chromatogram;

/// Intensity smoothing kernels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SmoothingMethod {
    /// Uniform weights over the window
    SimpleMovingAverage,
    /// Weights decreasing linearly from the window centre
    #[default]
    LinearWeightedMovingAverage,
    /// Binomial coefficients of order `2 * level`
    BinomialFilter,
}

/// Smoothing configuration: kernel plus half window size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingParameter {
    /// Kernel
    pub method: SmoothingMethod,
    /// Half window size in points; 0 disables smoothing
    pub level: usize,
}

impl Default for SmoothingParameter {
    fn default() -> Self {
        Self {
            method: SmoothingMethod::LinearWeightedMovingAverage,
            level: 3,
        }
    }
}

impl SmoothingMethod {
    /// Kernel weights for offsets `-level..=level`
    fn weights(&self, level: usize) -> Vec<f64> {
        let width = 2 * level + 1;
        match self {
            SmoothingMethod::SimpleMovingAverage => vec![1.0; width],
            SmoothingMethod::LinearWeightedMovingAverage => (0..width)
                .map(|i| (level + 1) as f64 - (i as f64 - level as f64).abs())
                .collect(),
            SmoothingMethod::BinomialFilter => {
                let order = 2 * level;
                let mut row = vec![1.0f64; 1];
                for _ in 0..order {
                    let mut next = vec![1.0; row.len() + 1];
                    for k in 1..row.len() {
                        next[k] = row[k - 1] + row[k];
                    }
                    row = next;
                }
                row
            }
        }
    }
}

/// Smooth a sequence of intensities.
///
/// Near the edges the kernel is truncated and renormalised by the weights
/// actually used, so the output always has the input length.
pub fn smooth_intensities(intensities: &[f64], parameter: &SmoothingParameter) -> Vec<f64> {
    let level = parameter.level;
    if level == 0 || intensities.len() < 2 {
        return intensities.to_vec();
    }
    let weights = parameter.method.weights(level);
    let n = intensities.len();
    (0..n)
        .map(|i| {
            let mut sum = 0.0;
            let mut weight_sum = 0.0;
            for (k, &w) in weights.iter().enumerate() {
                let Some(j) = (i + k).checked_sub(level) else {
                    continue;
                };
                if j >= n {
                    break;
                }
                sum += intensities[j] * w;
                weight_sum += w;
            }
            if weight_sum > 0.0 {
                sum / weight_sum
            } else {
                intensities[i]
            }
        })
        .collect()
}

/// Smooth a chromatogram, keeping ids, masses and axis values.
pub fn smooth(chromatogram: &Chromatogram, parameter: &SmoothingParameter) -> Chromatogram {
    if parameter.level == 0 {
        return chromatogram.clone();
    }
    let smoothed = smooth_intensities(&chromatogram.intensities(), parameter);
    chromatogram.with_intensities(&smoothed)
}
