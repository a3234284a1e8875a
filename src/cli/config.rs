//! TOML configuration file support.
//!
//! Every section is optional and every missing key keeps its default:
//!
//! ```toml
//! # msalign.toml
//! [peak_pick]
//! mass_range_begin = 100.0
//! mass_range_end = 1200.0
//! mass_slice_width = 0.1
//!
//! [peak_pick.detection]
//! minimum_amplitude = 1000.0
//!
//! [alignment]
//! is_remove_feature_based_on_blank_peak_height_fold_change = true
//! fold_change_for_blank_filtering = 5.0
//! blank_filtering = "sample-max-over-blank-average"
//!
//! [project]
//! project_folder = "/data/project"
//! num_threads = 4
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use msalign::alignment::AlignmentParameter;
use msalign::feature::PeakPickParameter;
use msalign::project::ProjectParameter;

/// Root configuration structure for msalign.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Peak picking settings.
    #[serde(default)]
    pub peak_pick: PeakPickParameter,

    /// Spot refinement settings.
    #[serde(default)]
    pub alignment: AlignmentParameter,

    /// Project dataset settings.
    #[serde(default)]
    pub project: ProjectParameter,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Load from `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map(Self::from_file).unwrap_or_else(|| Ok(Self::default()))
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
