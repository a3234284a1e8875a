use anyhow::{Context, Result};
use log::info;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use msalign::alignment::{
    AlignmentRefiner, AlignmentSpotProperty, AnalysisFileBean, LcmsAlignmentRefiner,
};
use msalign::storage::{DataBaseMapper, DataBaseStorage};

use super::Config;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Refine aligned spots and write the survivors as JSON
pub fn run(
    spots: PathBuf,
    files: PathBuf,
    storage: Option<PathBuf>,
    output: PathBuf,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load(config.as_deref())?;
    let spots: Vec<AlignmentSpotProperty> = read_json(&spots)?;
    let files: Vec<AnalysisFileBean> = read_json(&files)?;

    // Without an archive every annotation counts as unannotated
    let storage = match storage {
        Some(path) => DataBaseStorage::load(&path)
            .with_context(|| format!("Failed to load storage: {}", path.display()))?,
        None => DataBaseStorage::new(),
    };
    let mapper = DataBaseMapper::from_storage(&storage);
    info!(
        "Refining {} spots over {} files with {} annotators",
        spots.len(),
        files.len(),
        mapper.len()
    );

    let incoming = spots.len();
    let refiner = LcmsAlignmentRefiner::new(config.alignment, files, &mapper);
    let refined = refiner.refine(spots).context("Refinement failed")?;

    let mut writer = BufWriter::new(
        File::create(&output)
            .with_context(|| format!("Failed to create output: {}", output.display()))?,
    );
    serde_json::to_writer_pretty(&mut writer, &refined).context("Failed to write spots")?;
    writer.flush()?;

    println!(
        "Kept {}/{} spots -> {}",
        refined.len(),
        incoming,
        output.display()
    );
    Ok(())
}
