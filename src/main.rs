//! # msalign
//!
//! Command-line front end for feature picking, spot refinement and
//! annotation database storage.
//!
//! ## Usage
//!
//! ```bash
//! # Pick features from scans exported as JSON
//! msalign pick --scans scans.json -o features.json
//!
//! # Refine aligned spots against a storage archive
//! msalign refine --spots spots.json --files files.json --storage databases.zip -o refined.json
//!
//! # Build and inspect a storage archive
//! msalign storage-create -o databases.zip --msp library.msp --text-db targets.txt
//! msalign storage-info databases.zip
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{dispatch, init_logging, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());
    dispatch(cli)
}
