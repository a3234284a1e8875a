//! # Reference Libraries
//!
//! Library entries the annotators score features against:
//!
//! - [`read_msp`] reads MSP spectral libraries.
//! - [`read_text_db`] reads tab-delimited m/z and retention-time libraries.
//! - [`GeneratedLipidDatabase`] builds lipid spectra on demand from a class
//!   table and keeps them for later lookups.
//!
//! Peptide entries ([`PeptideMsReference`]) arrive already generated; this
//! crate does not digest proteins.

mod adduct;
mod error;
mod lipid;
mod msp;
mod text_db;
mod types;

#[cfg(test)]
mod tests;

pub use adduct::{AdductIon, PROTON};
pub use error::ReferenceError;
pub use lipid::{generate_reference, GeneratedLipidDatabase, Lipid, LipidClass};
pub use msp::{read_msp, read_msp_file};
pub use text_db::{read_text_db, read_text_db_file};
pub use types::{MoleculeMsReference, PeptideMsReference, SpectrumPeak};
