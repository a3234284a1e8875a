use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use msalign::chromatogram::{smooth, RawSpectraIndex, SmoothingParameter};
use msalign::feature::{PeakPickParameter, PeakSpotting};
use msalign::spectrum::{ChromXType, ChromXUnit, IonMode, RawPeak, RawSpectrum, ScanPolarity};

/// MS1 scans with a ladder of Gaussian features every 50 m/z
fn create_scans(num_scans: usize, peaks_per_scan: usize) -> Vec<RawSpectrum> {
    (0..num_scans)
        .map(|i| {
            let rt = i as f64 * 0.01;
            let peaks = (0..peaks_per_scan)
                .map(|j| {
                    let apex = (j % 20) as f64 * (num_scans as f64 * 0.01 / 20.0);
                    let height = 1.0e5 * (-((rt - apex).powi(2)) / 0.002).exp() + 50.0;
                    RawPeak::new(150.0 + j as f64 * 50.0, height)
                })
                .collect();
            RawSpectrum::new_ms1(i, rt, ScanPolarity::Positive, peaks)
        })
        .collect()
}

fn build_index(num_scans: usize, peaks_per_scan: usize) -> RawSpectraIndex {
    RawSpectraIndex::build(
        create_scans(num_scans, peaks_per_scan),
        ChromXType::RT,
        ChromXUnit::Min,
        IonMode::Positive,
    )
    .unwrap()
}

/// Benchmark XIC extraction over growing scan counts
fn bench_extracted_ion_chromatogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("extracted_ion_chromatogram");

    for num_scans in [500, 2000, 8000] {
        let index = build_index(num_scans, 20);
        let (start, end) = index.axis_range().unwrap();

        group.throughput(Throughput::Elements(num_scans as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}scans", num_scans)),
            &index,
            |b, index| {
                b.iter(|| {
                    let xic = index.extracted_ion_chromatogram(
                        black_box(500.0),
                        black_box(0.01),
                        start,
                        end,
                    );
                    black_box(xic);
                });
            },
        );
    }

    group.finish();
}

/// Benchmark TIC and BPC, which touch every peak of every scan
fn bench_summary_chromatograms(c: &mut Criterion) {
    let mut group = c.benchmark_group("summary_chromatograms");
    let index = build_index(2000, 20);
    let (start, end) = index.axis_range().unwrap();

    group.bench_function("tic", |b| {
        b.iter(|| black_box(index.total_ion_chromatogram(start, end)));
    });
    group.bench_function("bpc", |b| {
        b.iter(|| black_box(index.base_peak_chromatogram(start, end)));
    });

    group.finish();
}

/// Benchmark smoothing of one chromatogram
fn bench_smoothing(c: &mut Criterion) {
    let index = build_index(4000, 20);
    let (start, end) = index.axis_range().unwrap();
    let xic = index.extracted_ion_chromatogram(500.0, 0.01, start, end);
    let parameter = SmoothingParameter::default();

    c.bench_function("smooth_xic", |b| {
        b.iter(|| black_box(smooth(black_box(&xic), &parameter)));
    });
}

/// Benchmark full peak spotting across all mass slices
fn bench_peak_spotting(c: &mut Criterion) {
    let mut group = c.benchmark_group("peak_spotting");
    group.sample_size(10);

    let index = build_index(1000, 20);
    let parameter = PeakPickParameter {
        mass_range_begin: 100.0,
        mass_range_end: 1200.0,
        ..PeakPickParameter::default()
    };
    let spotting = PeakSpotting::new(parameter);

    group.bench_function("1000scans_20features", |b| {
        b.iter(|| black_box(spotting.run(&index)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_extracted_ion_chromatogram,
    bench_summary_chromatograms,
    bench_smoothing,
    bench_peak_spotting
);
criterion_main!(benches);
