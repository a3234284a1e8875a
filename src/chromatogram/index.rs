use std::collections::HashMap;

use log::debug;

use crate::spectrum::{ChromXType, ChromXUnit, IonMode, RawSpectrum, ScanPolarity};

use super::error::IndexError;
use super::types::{Chromatogram, ValuePeak};

/// Read-only view over the scans of one analysis file, sorted by axis value.
///
/// The index is built once (one sort) and afterwards answers range queries
/// with a binary search plus a linear walk over the scans inside the range.
/// It is never mutated after [`RawSpectraIndex::build`] returns, so a shared
/// reference can be handed to any number of reader threads.
#[derive(Debug, Clone)]
pub struct RawSpectraIndex {
    spectra: Vec<RawSpectrum>,
    axis_values: Vec<f64>,
    positions: HashMap<usize, usize>,
    axis: ChromXType,
    unit: ChromXUnit,
    ion_mode: IonMode,
    polarity: ScanPolarity,
}

impl RawSpectraIndex {
    /// Build an index over `spectra` for one axis and ion mode.
    ///
    /// Fails immediately for ion modes that do not map onto a single scan
    /// polarity and for axis/unit combinations that raw scans cannot supply.
    /// An empty scan list is valid and yields empty chromatograms. Peaks of
    /// every scan are put in ascending m/z order before indexing.
    pub fn build(
        spectra: Vec<RawSpectrum>,
        axis: ChromXType,
        unit: ChromXUnit,
        ion_mode: IonMode,
    ) -> Result<Self, IndexError> {
        let polarity = ion_mode
            .scan_polarity()
            .ok_or(IndexError::UnsupportedIonMode(ion_mode))?;
        if !Self::supports(axis, unit) {
            return Err(IndexError::UnsupportedAxis { axis, unit });
        }

        let mut keyed = Vec::with_capacity(spectra.len());
        for mut spectrum in spectra {
            // Deserialized scans may carry peaks in any order
            spectrum.sort_peaks();
            let value = spectrum
                .axis_value(axis, unit)
                .ok_or(IndexError::UnsupportedAxis { axis, unit })?;
            if !value.is_finite() {
                return Err(IndexError::InvalidAxisValue {
                    index: spectrum.index,
                });
            }
            keyed.push((value, spectrum));
        }
        // Stable: scans sharing an axis value keep their acquisition order
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut positions = HashMap::with_capacity(keyed.len());
        let mut axis_values = Vec::with_capacity(keyed.len());
        let mut sorted = Vec::with_capacity(keyed.len());
        for (position, (value, spectrum)) in keyed.into_iter().enumerate() {
            if positions.insert(spectrum.index, position).is_some() {
                return Err(IndexError::DuplicateSpectrumIndex(spectrum.index));
            }
            axis_values.push(value);
            sorted.push(spectrum);
        }

        debug!(
            "Indexed {} scans on {} ({}) for {:?}",
            sorted.len(),
            axis,
            unit,
            ion_mode
        );

        Ok(Self {
            spectra: sorted,
            axis_values,
            positions,
            axis,
            unit,
            ion_mode,
            polarity,
        })
    }

    /// Whether an axis/unit combination can be derived from raw scans
    pub fn supports(axis: ChromXType, unit: ChromXUnit) -> bool {
        matches!(
            (axis, unit),
            (ChromXType::RT, ChromXUnit::Min)
                | (ChromXType::RT, ChromXUnit::Sec)
                | (ChromXType::Drift, ChromXUnit::Msec)
        )
    }

    /// Axis type of the index
    pub fn axis(&self) -> ChromXType {
        self.axis
    }

    /// Axis unit of the index
    pub fn unit(&self) -> ChromXUnit {
        self.unit
    }

    /// Ion mode the index was built for
    pub fn ion_mode(&self) -> IonMode {
        self.ion_mode
    }

    /// Number of indexed scans (all MS levels and polarities)
    pub fn len(&self) -> usize {
        self.spectra.len()
    }

    /// Whether the index holds no scans
    pub fn is_empty(&self) -> bool {
        self.spectra.is_empty()
    }

    /// Scans in axis order
    pub fn spectra(&self) -> &[RawSpectrum] {
        &self.spectra
    }

    /// Look up a scan by its raw spectrum index
    pub fn spectrum(&self, id: usize) -> Option<&RawSpectrum> {
        self.positions.get(&id).map(|&p| &self.spectra[p])
    }

    /// Axis value of a scan by raw spectrum index
    pub fn axis_value_of(&self, id: usize) -> Option<f64> {
        self.positions.get(&id).map(|&p| self.axis_values[p])
    }

    /// First and last axis value, `None` for an empty index
    pub fn axis_range(&self) -> Option<(f64, f64)> {
        match (self.axis_values.first(), self.axis_values.last()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        }
    }

    /// Total-ion chromatogram over `[start, end]`.
    ///
    /// Each point carries the summed intensity of one MS1 scan of the index
    /// polarity; its mass is the base peak m/z of that scan.
    pub fn total_ion_chromatogram(&self, start: f64, end: f64) -> Chromatogram {
        let peaks = self
            .ms1_in_range(start, end)
            .map(|(time, spectrum)| {
                let mass = spectrum.base_peak().map(|p| p.mz).unwrap_or(0.0);
                ValuePeak::new(spectrum.index, mass, spectrum.total_ion_current(), time)
            })
            .collect();
        Chromatogram::new(peaks, self.axis, self.unit)
    }

    /// Base-peak chromatogram over `[start, end]`
    pub fn base_peak_chromatogram(&self, start: f64, end: f64) -> Chromatogram {
        let peaks = self
            .ms1_in_range(start, end)
            .map(|(time, spectrum)| match spectrum.base_peak() {
                Some(base) => ValuePeak::new(spectrum.index, base.mz, base.intensity, time),
                None => ValuePeak::new(spectrum.index, 0.0, 0.0, time),
            })
            .collect();
        Chromatogram::new(peaks, self.axis, self.unit)
    }

    /// Mass-extracted chromatogram for `mass ± tolerance` over `[start, end]`.
    ///
    /// Within each scan the window start is found by binary search and peaks
    /// are summed until one exceeds `mass + tolerance`. The point mass is the
    /// most intense peak inside the window, or `mass` if the window is empty.
    pub fn extracted_ion_chromatogram(
        &self,
        mass: f64,
        tolerance: f64,
        start: f64,
        end: f64,
    ) -> Chromatogram {
        let lower = mass - tolerance;
        let upper = mass + tolerance;
        let peaks = self
            .ms1_in_range(start, end)
            .map(|(time, spectrum)| {
                let mut sum = 0.0;
                let mut base_mz = mass;
                let mut base_intensity = f64::MIN;
                for peak in &spectrum.peaks[spectrum.lower_bound(lower)..] {
                    if peak.mz > upper {
                        break;
                    }
                    sum += peak.intensity;
                    if peak.intensity > base_intensity {
                        base_intensity = peak.intensity;
                        base_mz = peak.mz;
                    }
                }
                ValuePeak::new(spectrum.index, base_mz, sum, time)
            })
            .collect();
        Chromatogram::new(peaks, self.axis, self.unit)
    }

    /// Find the MS2 scan acquired for `mass ± tolerance` within `[start, end]`
    /// whose axis value is closest to `top`. Returns its raw spectrum index.
    pub fn find_ms2_spectrum(
        &self,
        mass: f64,
        tolerance: f64,
        start: f64,
        end: f64,
        top: f64,
    ) -> Option<usize> {
        let (from, to) = self.position_range(start, end);
        let mut best: Option<(f64, usize)> = None;
        for position in from..to {
            let spectrum = &self.spectra[position];
            if spectrum.ms_level < 2 || spectrum.polarity != self.polarity {
                continue;
            }
            let Some(precursor) = spectrum.precursor_mz else {
                continue;
            };
            if (precursor - mass).abs() > tolerance {
                continue;
            }
            let distance = (self.axis_values[position] - top).abs();
            match best {
                Some((d, _)) if d <= distance => {}
                _ => best = Some((distance, spectrum.index)),
            }
        }
        best.map(|(_, id)| id)
    }

    /// Positions `[from, to)` of scans with axis value in `[start, end]`
    fn position_range(&self, start: f64, end: f64) -> (usize, usize) {
        if start > end {
            return (0, 0);
        }
        let from = self.axis_values.partition_point(|&v| v < start);
        let to = self.axis_values.partition_point(|&v| v <= end);
        (from, to.max(from))
    }

    /// MS1 scans of the index polarity in `[start, end]`, with axis values.
    ///
    /// Filtered scans are skipped rather than reported as zero points.
    fn ms1_in_range(&self, start: f64, end: f64) -> impl Iterator<Item = (f64, &RawSpectrum)> {
        let (from, to) = self.position_range(start, end);
        let polarity = self.polarity;
        self.axis_values[from..to]
            .iter()
            .zip(&self.spectra[from..to])
            .filter(move |(_, s)| s.ms_level == 1 && s.polarity == polarity)
            .map(|(&v, s)| (v, s))
    }
}
