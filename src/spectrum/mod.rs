//! # Raw Spectrum Model
//!
//! Scan-level data handed to the engine by the file readers of the surrounding
//! application. A [`RawSpectrum`] is immutable once loaded; everything
//! downstream (chromatogram index, peak detection, feature building) only
//! borrows it.
//!
//! ## Axis model
//!
//! Chromatograms can be built over several chromatographic dimensions
//! ([`ChromXType`]). The value of one scan on an axis is resolved by
//! [`RawSpectrum::axis_value`], which also performs unit conversion.

mod chrom_x;


pub use chrom_x::{ChromX, ChromXType, ChromXUnit};

use serde::{Deserialize, Serialize};

/// Polarity of a single instrument scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanPolarity {
    /// Positive ion scan
    Positive,
    /// Negative ion scan
    Negative,
}

/// Acquisition ion mode of an analysis file or processing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum IonMode {
    /// Positive ionization
    #[default]
    Positive,
    /// Negative ionization
    Negative,
    /// Polarity switching; never valid for building a single chromatogram
    Both,
}

impl IonMode {
    /// Scan polarity a chromatogram in this ion mode is built from.
    ///
    /// Returns `None` for [`IonMode::Both`].
    pub fn scan_polarity(&self) -> Option<ScanPolarity> {
        match self {
            IonMode::Positive => Some(ScanPolarity::Positive),
            IonMode::Negative => Some(ScanPolarity::Negative),
            IonMode::Both => None,
        }
    }
}

/// One centroided peak of a raw scan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPeak {
    /// Mass-to-charge ratio
    pub mz: f64,
    /// Signal intensity
    pub intensity: f64,
}

impl RawPeak {
    /// Create a new peak
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }
}

/// One instrument scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSpectrum {
    /// Zero-based position of the scan in its source file; used as raw spectrum id
    pub index: usize,
    /// Native scan number
    pub scan_number: i64,
    /// MS level (1, 2, ...)
    pub ms_level: u8,
    /// Scan polarity
    pub polarity: ScanPolarity,
    /// Scan start time in minutes
    pub scan_start_time: f64,
    /// Ion-mobility drift time in milliseconds
    #[serde(default)]
    pub drift_time: f64,
    /// Precursor m/z for MSn scans
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precursor_mz: Option<f64>,
    /// Peaks ordered by ascending m/z
    pub peaks: Vec<RawPeak>,
}

impl RawSpectrum {
    /// Create an MS1 scan
    pub fn new_ms1(
        index: usize,
        scan_start_time: f64,
        polarity: ScanPolarity,
        peaks: Vec<RawPeak>,
    ) -> Self {
        let mut spectrum = Self {
            index,
            scan_number: index as i64 + 1,
            ms_level: 1,
            polarity,
            scan_start_time,
            drift_time: 0.0,
            precursor_mz: None,
            peaks,
        };
        spectrum.sort_peaks();
        spectrum
    }

    /// Create an MS2 scan for a given precursor
    pub fn new_ms2(
        index: usize,
        scan_start_time: f64,
        polarity: ScanPolarity,
        precursor_mz: f64,
        peaks: Vec<RawPeak>,
    ) -> Self {
        let mut spectrum = Self::new_ms1(index, scan_start_time, polarity, peaks);
        spectrum.ms_level = 2;
        spectrum.precursor_mz = Some(precursor_mz);
        spectrum
    }

    /// Order peaks by ascending m/z. Mass lookups rely on this ordering.
    pub fn sort_peaks(&mut self) {
        self.peaks.sort_by(|a, b| a.mz.total_cmp(&b.mz));
    }

    /// Sum of all peak intensities
    pub fn total_ion_current(&self) -> f64 {
        self.peaks.iter().map(|p| p.intensity).sum()
    }

    /// Most intense peak, first one wins on ties
    pub fn base_peak(&self) -> Option<RawPeak> {
        let mut best: Option<RawPeak> = None;
        for peak in &self.peaks {
            match best {
                Some(b) if b.intensity >= peak.intensity => {}
                _ => best = Some(*peak),
            }
        }
        best
    }

    /// Position of the first peak whose m/z is not below `mz`
    pub fn lower_bound(&self, mz: f64) -> usize {
        self.peaks.partition_point(|p| p.mz < mz)
    }

    /// Value of this scan on a chromatographic axis, or `None` if the
    /// axis/unit combination cannot be derived from a raw scan.
    pub fn axis_value(&self, axis: ChromXType, unit: ChromXUnit) -> Option<f64> {
        match (axis, unit) {
            (ChromXType::RT, ChromXUnit::Min) => Some(self.scan_start_time),
            (ChromXType::RT, ChromXUnit::Sec) => Some(self.scan_start_time * 60.0),
            (ChromXType::Drift, ChromXUnit::Msec) => Some(self.drift_time),
            _ => None,
        }
    }
}
