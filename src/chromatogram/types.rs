use serde::{Deserialize, Serialize};

use crate::spectrum::{ChromXType, ChromXUnit};

/// One point of a chromatogram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuePeak {
    /// Raw spectrum index of the scan this point was taken from
    pub id: usize,
    /// Representative m/z of the point (base peak of the scan or window)
    pub mass: f64,
    /// Intensity of the point
    pub intensity: f64,
    /// Axis value (retention or drift time)
    pub time: f64,
}

impl ValuePeak {
    /// Create a new chromatogram point
    pub fn new(id: usize, mass: f64, intensity: f64, time: f64) -> Self {
        Self {
            id,
            mass,
            intensity,
            time,
        }
    }
}

/// An ordered trace of intensities over one chromatographic axis.
///
/// Points are non-decreasing in [`ValuePeak::time`], which is what makes
/// binary searches over a chromatogram valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromatogram {
    peaks: Vec<ValuePeak>,
    axis: ChromXType,
    unit: ChromXUnit,
}

impl Chromatogram {
    /// Create a chromatogram from points already ordered by axis value.
    pub(crate) fn new(peaks: Vec<ValuePeak>, axis: ChromXType, unit: ChromXUnit) -> Self {
        debug_assert!(peaks.windows(2).all(|w| w[0].time <= w[1].time));
        Self { peaks, axis, unit }
    }

    /// Build a chromatogram from arbitrary points, sorting them by axis value.
    pub fn from_unsorted(
        mut peaks: Vec<ValuePeak>,
        axis: ChromXType,
        unit: ChromXUnit,
    ) -> Self {
        peaks.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { peaks, axis, unit }
    }

    /// An empty chromatogram on the given axis
    pub fn empty(axis: ChromXType, unit: ChromXUnit) -> Self {
        Self::new(Vec::new(), axis, unit)
    }

    /// Points of the chromatogram
    pub fn peaks(&self) -> &[ValuePeak] {
        &self.peaks
    }

    /// Point at position `i`
    pub fn get(&self, i: usize) -> Option<&ValuePeak> {
        self.peaks.get(i)
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    /// Whether the chromatogram has no points
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// Axis type
    pub fn axis(&self) -> ChromXType {
        self.axis
    }

    /// Axis unit
    pub fn unit(&self) -> ChromXUnit {
        self.unit
    }

    /// Intensities in axis order
    pub fn intensities(&self) -> Vec<f64> {
        self.peaks.iter().map(|p| p.intensity).collect()
    }

    /// Axis values in order
    pub fn times(&self) -> Vec<f64> {
        self.peaks.iter().map(|p| p.time).collect()
    }

    /// Maximum intensity, 0.0 for an empty chromatogram
    pub fn max_intensity(&self) -> f64 {
        self.peaks.iter().map(|p| p.intensity).fold(0.0, f64::max)
    }

    /// Copy of this chromatogram with intensities replaced.
    ///
    /// `intensities` must have one value per point.
    pub(crate) fn with_intensities(&self, intensities: &[f64]) -> Self {
        debug_assert_eq!(intensities.len(), self.peaks.len());
        let peaks = self
            .peaks
            .iter()
            .zip(intensities)
            .map(|(p, &i)| ValuePeak { intensity: i, ..*p })
            .collect();
        Self {
            peaks,
            axis: self.axis,
            unit: self.unit,
        }
    }
}
