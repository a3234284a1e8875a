use super::*;
use crate::chromatogram::{Chromatogram, SmoothingMethod, SmoothingParameter, ValuePeak};
use crate::spectrum::{ChromXType, ChromXUnit};

fn trace(intensities: &[f64]) -> Chromatogram {
    trace_with_mass(intensities, 400.0)
}

fn trace_with_mass(intensities: &[f64], mass: f64) -> Chromatogram {
    let peaks = intensities
        .iter()
        .enumerate()
        .map(|(i, &v)| ValuePeak::new(i, mass, v, i as f64 * 0.1))
        .collect();
    Chromatogram::from_unsorted(peaks, ChromXType::RT, ChromXUnit::Min)
}

fn no_smoothing() -> SmoothingParameter {
    SmoothingParameter {
        method: SmoothingMethod::SimpleMovingAverage,
        level: 0,
    }
}

#[test]
fn test_single_gaussian_like_peak() {
    let chromatogram = trace(&[0.0, 10.0, 50.0, 100.0, 50.0, 10.0, 0.0]);
    let results = detect_peaks(&chromatogram, 3, 20.0);
    assert_eq!(results.len(), 1);

    let peak = &results[0];
    assert_eq!(peak.scan_num_at_left, 0);
    assert_eq!(peak.scan_num_at_top, 3);
    assert_eq!(peak.scan_num_at_right, 6);
    assert_eq!(peak.intensity_at_top, 100.0);
    assert_eq!(peak.mass, 400.0);
    assert!((peak.chrom_x_at_top - 0.3).abs() < 1e-12);
    assert!((peak.peak_width - 0.6).abs() < 1e-12);
    // trapezoid: 0.1 * (0+10+50+100+50+10+0) = 22
    assert!((peak.area_above_zero - 22.0).abs() < 1e-9);
    assert!((peak.area_above_baseline - 22.0).abs() < 1e-9);
    assert_eq!(peak.height_above_baseline, 100.0);
    assert!(peak.is_valid());
}

#[test]
fn test_two_peaks_share_valley() {
    let chromatogram = trace(&[0.0, 50.0, 100.0, 40.0, 5.0, 60.0, 120.0, 60.0, 0.0]);
    let results = detect_peaks(&chromatogram, 3, 20.0);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].scan_num_at_right, 4);
    assert_eq!(results[1].scan_num_at_left, 4);
    assert_eq!(results[1].scan_num_at_top, 6);
    assert_eq!(results[0].peak_id, 0);
    assert_eq!(results[1].peak_id, 1);
    for r in &results {
        assert!(r.scan_num_at_left <= r.scan_num_at_top && r.scan_num_at_top <= r.scan_num_at_right);
    }
}

#[test]
fn test_minimum_amplitude_filters_small_peaks() {
    let chromatogram = trace(&[0.0, 5.0, 10.0, 5.0, 0.0]);
    assert!(detect_peaks(&chromatogram, 3, 20.0).is_empty());
    assert_eq!(detect_peaks(&chromatogram, 3, 5.0).len(), 1);
}

#[test]
fn test_minimum_datapoints_filters_narrow_peaks() {
    let chromatogram = trace(&[0.0, 100.0, 0.0, 100.0, 0.0]);
    assert!(detect_peaks(&chromatogram, 4, 1.0).is_empty());
    assert_eq!(detect_peaks(&chromatogram, 3, 1.0).len(), 2);
}

#[test]
fn test_flat_and_short_traces_have_no_peaks() {
    assert!(detect_peaks(&trace(&[5.0; 10]), 1, 0.0).is_empty());
    assert!(detect_peaks(&trace(&[0.0, 1.0]), 1, 0.0).is_empty());
    assert!(detect_peaks(&trace(&[]), 1, 0.0).is_empty());
}

#[test]
fn test_baseline_is_subtracted() {
    let chromatogram = trace(&[20.0, 60.0, 100.0, 60.0, 20.0, 30.0]);
    let results = detect_peaks(&chromatogram, 3, 10.0);
    let peak = &results[0];
    assert_eq!(peak.scan_num_at_right, 4);
    assert_eq!(peak.height_above_baseline, 80.0);
    let expected_total = 0.1 * ((20.0 + 60.0) + (60.0 + 100.0) + (100.0 + 60.0) + (60.0 + 20.0)) / 2.0;
    assert!((peak.area_above_zero - expected_total).abs() < 1e-9);
    assert!((peak.area_above_baseline - (expected_total - 0.4 * 20.0)).abs() < 1e-9);
}

#[test]
fn test_noise_estimate() {
    assert_eq!(estimate_noise(&[]), 1.0);
    assert_eq!(estimate_noise(&[3.0, 3.0, 3.0]), 1.0);
    assert_eq!(estimate_noise(&[0.0, 10.0, 30.0, 60.0]), 20.0);
    assert_eq!(estimate_noise(&[0.0, 10.0, 30.0]), 15.0);
}

#[test]
fn test_excluded_masses_remove_peaks() {
    let chromatogram = trace_with_mass(&[0.0, 50.0, 100.0, 50.0, 0.0], 391.2843);
    let detector = PeakDetector::new(PeakDetectionParameter {
        smoothing: no_smoothing(),
        minimum_datapoints: 3,
        minimum_amplitude: 10.0,
        excluded_masses: vec![ExcludedMass::new(391.28, 0.01)],
    });
    let (_, results) = detector.detect(&chromatogram);
    assert!(results.is_empty());

    let detector = PeakDetector::new(PeakDetectionParameter {
        excluded_masses: vec![ExcludedMass::new(500.0, 0.01)],
        ..detector.parameter().clone()
    });
    let (_, results) = detector.detect(&chromatogram);
    assert_eq!(results.len(), 1);
}

#[test]
fn test_non_positive_apex_is_dropped() {
    let chromatogram = trace(&[-100.0, -50.0, 0.0, -50.0, -100.0]);
    assert_eq!(detect_peaks(&chromatogram, 3, 10.0).len(), 1);

    let detector = PeakDetector::new(PeakDetectionParameter {
        smoothing: no_smoothing(),
        minimum_datapoints: 3,
        minimum_amplitude: 10.0,
        excluded_masses: Vec::new(),
    });
    let (_, results) = detector.detect(&chromatogram);
    assert!(results.is_empty());
}

#[test]
fn test_detector_smooths_before_detection() {
    // noisy shoulder splits the raw trace into two peaks
    let raw = [0.0, 20.0, 60.0, 55.0, 100.0, 60.0, 20.0, 0.0, 0.0];
    assert_eq!(detect_peaks(&trace(&raw), 2, 1.0).len(), 2);

    let detector = PeakDetector::new(PeakDetectionParameter {
        smoothing: SmoothingParameter {
            method: SmoothingMethod::LinearWeightedMovingAverage,
            level: 1,
        },
        minimum_datapoints: 2,
        minimum_amplitude: 1.0,
        excluded_masses: Vec::new(),
    });
    let (smoothed, results) = detector.detect(&trace(&raw));
    assert_eq!(smoothed.len(), raw.len());
    assert_eq!(results.len(), 1);
}
