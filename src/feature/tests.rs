use super::spotting::collapse_slice_duplicates;
use super::*;
use crate::chromatogram::{RawSpectraIndex, SmoothingMethod, SmoothingParameter};
use crate::peak_detection::{PeakDetectionParameter, PeakDetector};
use crate::spectrum::{ChromXType, ChromXUnit, IonMode, RawPeak, RawSpectrum, ScanPolarity};

const PROFILE: [f64; 11] = [
    0.0, 100.0, 500.0, 2000.0, 6000.0, 10000.0, 6000.0, 2000.0, 500.0, 100.0, 0.0,
];

/// Eleven MS1 scans with one peak at 400.03 plus an MS2 scan near its apex
fn scans() -> Vec<RawSpectrum> {
    let mut scans: Vec<RawSpectrum> = PROFILE
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            RawSpectrum::new_ms1(
                i,
                i as f64 * 0.1,
                ScanPolarity::Positive,
                vec![RawPeak::new(250.0, 50.0), RawPeak::new(400.03, v)],
            )
        })
        .collect();
    scans.push(RawSpectrum::new_ms2(
        11,
        0.52,
        ScanPolarity::Positive,
        400.031,
        vec![RawPeak::new(184.07, 900.0)],
    ));
    scans
}

fn index() -> RawSpectraIndex {
    RawSpectraIndex::build(scans(), ChromXType::RT, ChromXUnit::Min, IonMode::Positive).unwrap()
}

fn detection() -> PeakDetectionParameter {
    PeakDetectionParameter {
        smoothing: SmoothingParameter {
            method: SmoothingMethod::SimpleMovingAverage,
            level: 0,
        },
        minimum_datapoints: 5,
        minimum_amplitude: 1000.0,
        excluded_masses: Vec::new(),
    }
}

fn feature(top_id: usize, mass: f64, height: f64) -> ChromatogramPeakFeature {
    ChromatogramPeakFeature {
        ms1_raw_spectrum_id_top: top_id,
        mass,
        peak_height_top: height,
        ..ChromatogramPeakFeature::default()
    }
}

// ==================== Builder ====================

#[test]
fn test_builder_links_raw_spectra() {
    let index = index();
    let chromatogram = index.extracted_ion_chromatogram(400.0, 0.05, 0.0, 1.0);
    let (smoothed, results) = PeakDetector::new(detection()).detect(&chromatogram);
    let features = FeatureBuilder::new(&index).build(&results, &smoothed);

    assert_eq!(features.len(), 1);
    let feature = &features[0];
    assert_eq!(feature.ms1_raw_spectrum_id_left, 0);
    assert_eq!(feature.ms1_raw_spectrum_id_top, 5);
    assert_eq!(feature.ms1_raw_spectrum_id_right, 10);
    assert_eq!(feature.chrom_scan_id_top, 5);
    assert_eq!(feature.data_points(), 11);
    assert_eq!(feature.mass, 400.03);
    assert_eq!(feature.peak_height_top, 10000.0);
    assert!((feature.chrom_x_top.value - 0.5).abs() < 1e-12);
    assert_eq!(feature.chrom_x_top.axis, ChromXType::RT);
    assert_eq!(feature.ms2_raw_spectrum_id, Some(11));
    assert!(feature.match_results.is_unknown());
    assert!(feature.molecule.is_empty());
}

#[test]
fn test_builder_skips_results_outside_chromatogram() {
    let index = index();
    let chromatogram = index.extracted_ion_chromatogram(400.0, 0.05, 0.0, 1.0);
    let (smoothed, mut results) = PeakDetector::new(detection()).detect(&chromatogram);
    results[0].scan_num_at_right = 99;
    assert!(FeatureBuilder::new(&index).build(&results, &smoothed).is_empty());
}

#[test]
fn test_builder_without_ms2() {
    let index = index();
    let chromatogram = index.extracted_ion_chromatogram(400.0, 0.05, 0.0, 1.0);
    let (smoothed, results) = PeakDetector::new(detection()).detect(&chromatogram);
    let features = FeatureBuilder::new(&index)
        .with_ms2_tolerance(0.0001)
        .build(&results, &smoothed);
    assert!(!features[0].has_ms2());
}

// ==================== Spotting ====================

#[test]
fn test_slice_centres() {
    let parameter = PeakPickParameter {
        mass_range_begin: 100.0,
        mass_range_end: 100.3,
        mass_slice_width: 0.1,
        ..PeakPickParameter::default()
    };
    let centres = parameter.slice_centres();
    assert_eq!(centres.len(), 4);
    assert!((centres[3] - 100.3).abs() < 1e-9);

    let invalid = PeakPickParameter {
        mass_slice_width: 0.0,
        ..PeakPickParameter::default()
    };
    assert!(invalid.slice_centres().is_empty());
}

#[test]
fn test_spotting_finds_single_feature() {
    let parameter = PeakPickParameter {
        mass_range_begin: 399.9,
        mass_range_end: 400.1,
        mass_slice_width: 0.1,
        detection: detection(),
        ..PeakPickParameter::default()
    };
    let features = PeakSpotting::new(parameter).run(&index());
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].peak_id, 0);
    assert_eq!(features[0].mass, 400.03);
    assert_eq!(features[0].ion_mode, IonMode::Positive);
}

#[test]
fn test_spotting_empty_index() {
    let index =
        RawSpectraIndex::build(Vec::new(), ChromXType::RT, ChromXUnit::Min, IonMode::Positive)
            .unwrap();
    assert!(PeakSpotting::default().run(&index).is_empty());
}

#[test]
fn test_spotting_orders_by_mass_and_renumbers() {
    let scans = PROFILE
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            RawSpectrum::new_ms1(
                i,
                i as f64 * 0.1,
                ScanPolarity::Positive,
                vec![RawPeak::new(300.0, v * 2.0), RawPeak::new(500.0, v)],
            )
        })
        .collect();
    let index =
        RawSpectraIndex::build(scans, ChromXType::RT, ChromXUnit::Min, IonMode::Positive).unwrap();
    let parameter = PeakPickParameter {
        mass_range_begin: 200.0,
        mass_range_end: 600.0,
        mass_slice_width: 0.5,
        detection: detection(),
        ..PeakPickParameter::default()
    };
    let features = PeakSpotting::new(parameter).run(&index);
    let masses: Vec<f64> = features.iter().map(|f| f.mass).collect();
    assert_eq!(masses, vec![300.0, 500.0]);
    let ids: Vec<usize> = features.iter().map(|f| f.peak_id).collect();
    assert_eq!(ids, vec![0, 1]);
}

#[test]
fn test_collapse_keeps_highest_per_apex_scan() {
    let kept = collapse_slice_duplicates(
        vec![
            feature(5, 400.00, 10.0),
            feature(5, 400.05, 20.0),
            feature(6, 400.00, 5.0),
            feature(5, 401.00, 1.0),
        ],
        0.1,
    );
    let summary: Vec<(usize, f64)> = kept
        .iter()
        .map(|f| (f.ms1_raw_spectrum_id_top, f.peak_height_top))
        .collect();
    assert_eq!(summary, vec![(5, 20.0), (5, 1.0), (6, 5.0)]);
}
