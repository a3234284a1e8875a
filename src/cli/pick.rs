use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use msalign::chromatogram::RawSpectraIndex;
use msalign::feature::PeakSpotting;
use msalign::spectrum::{ChromXType, ChromXUnit, IonMode, RawSpectrum};

use super::Config;

/// Pick features from a JSON scan list and write them as JSON
pub fn run(
    scans: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    ion_mode: IonMode,
    (axis, unit): (ChromXType, ChromXUnit),
) -> Result<()> {
    let config = Config::load(config.as_deref())?;
    let start = Instant::now();

    let file = File::open(&scans)
        .with_context(|| format!("Failed to open scan file: {}", scans.display()))?;
    let spectra: Vec<RawSpectrum> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse scans: {}", scans.display()))?;
    info!("Read {} scans from {}", spectra.len(), scans.display());

    let index = RawSpectraIndex::build(spectra, axis, unit, ion_mode)
        .context("Failed to index scans")?;
    let features = PeakSpotting::new(config.peak_pick).run(&index);

    let mut writer = BufWriter::new(
        File::create(&output)
            .with_context(|| format!("Failed to create output: {}", output.display()))?,
    );
    serde_json::to_writer_pretty(&mut writer, &features).context("Failed to write features")?;
    writer.flush()?;

    println!(
        "Picked {} features in {:.2}s -> {}",
        features.len(),
        start.elapsed().as_secs_f64(),
        output.display()
    );
    Ok(())
}
