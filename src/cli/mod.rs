use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use msalign::spectrum::{ChromXType, ChromXUnit, IonMode};

mod config;
mod pick;
mod project;
mod refine;
mod storage;

pub use config::Config;

/// msalign - LC-MS feature picking, spot refinement and annotation storage
#[derive(Parser)]
#[command(name = "msalign")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Ion mode of the scans to pick
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum IonModeArg {
    /// Positive scans
    #[default]
    Positive,
    /// Negative scans
    Negative,
}

impl From<IonModeArg> for IonMode {
    fn from(arg: IonModeArg) -> Self {
        match arg {
            IonModeArg::Positive => IonMode::Positive,
            IonModeArg::Negative => IonMode::Negative,
        }
    }
}

/// Chromatographic axis to build chromatograms over
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum AxisArg {
    /// Retention time in minutes
    #[default]
    RtMin,
    /// Retention time in seconds
    RtSec,
    /// Ion mobility drift time in milliseconds
    Drift,
}

impl From<AxisArg> for (ChromXType, ChromXUnit) {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::RtMin => (ChromXType::RT, ChromXUnit::Min),
            AxisArg::RtSec => (ChromXType::RT, ChromXUnit::Sec),
            AxisArg::Drift => (ChromXType::Drift, ChromXUnit::Msec),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Pick chromatographic features from a JSON scan list
    Pick {
        /// Raw scans (JSON array)
        #[arg(long, value_name = "FILE")]
        scans: PathBuf,

        /// Output features (JSON array)
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Ion mode of the scans to use
        #[arg(long, default_value = "positive", value_enum)]
        ion_mode: IonModeArg,

        /// Chromatographic axis
        #[arg(long, default_value = "rt-min", value_enum)]
        axis: AxisArg,
    },

    /// Deduplicate, blank-filter and link aligned spots
    Refine {
        /// Aligned spots (JSON array)
        #[arg(long, value_name = "FILE")]
        spots: PathBuf,

        /// Analysis files in spot slot order (JSON array)
        #[arg(long, value_name = "FILE")]
        files: PathBuf,

        /// Database storage archive resolving annotators
        #[arg(long, value_name = "FILE")]
        storage: Option<PathBuf>,

        /// Output spots (JSON array)
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// List the databases and annotators of a storage archive
    StorageInfo {
        /// Storage archive
        #[arg(value_name = "ARCHIVE")]
        archive: PathBuf,
    },

    /// Build a storage archive from reference library files
    StorageCreate {
        /// Output storage archive
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// MSP spectral libraries
        #[arg(long, value_name = "FILE")]
        msp: Vec<PathBuf>,

        /// Tab-delimited text libraries
        #[arg(long = "text-db", value_name = "FILE")]
        text_db: Vec<PathBuf>,
    },

    /// Load the storages of several project datasets
    ProjectInfo {
        /// Dataset names below the project folder
        #[arg(value_name = "DATASET", required = true)]
        datasets: Vec<String>,

        /// Project folder (overrides the config file)
        #[arg(long, value_name = "DIR")]
        project_folder: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Pick {
            scans,
            output,
            config,
            ion_mode,
            axis,
        } => pick::run(scans, output, config, IonMode::from(ion_mode), axis.into()),
        Commands::Refine {
            spots,
            files,
            storage,
            output,
            config,
        } => refine::run(spots, files, storage, output, config),
        Commands::StorageInfo { archive } => storage::info(archive),
        Commands::StorageCreate {
            output,
            msp,
            text_db,
        } => storage::create(output, msp, text_db),
        Commands::ProjectInfo {
            datasets,
            project_folder,
            config,
        } => project::run(datasets, project_folder, config),
    }
}
