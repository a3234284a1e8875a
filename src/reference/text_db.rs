use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::spectrum::ChromX;

use super::adduct::AdductIon;
use super::error::ReferenceError;
use super::types::MoleculeMsReference;

/// One row of a tab-delimited text library
#[derive(Debug, Deserialize)]
struct TextDbRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "m/z")]
    mz: f64,
    #[serde(rename = "RT", default)]
    rt: Option<f64>,
    #[serde(rename = "Adduct", default)]
    adduct: Option<String>,
    #[serde(rename = "InChIKey", default)]
    inchikey: Option<String>,
    #[serde(rename = "Formula", default)]
    formula: Option<String>,
    #[serde(rename = "SMILES", default)]
    smiles: Option<String>,
    #[serde(rename = "Ontology", default)]
    ontology: Option<String>,
    #[serde(rename = "CCS", default)]
    ccs: Option<f64>,
}

/// Read a text library from a file
pub fn read_text_db_file<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<MoleculeMsReference>, ReferenceError> {
    let path = path.as_ref();
    let references = read_text_db(BufReader::new(File::open(path)?))?;
    info!("Read {} text library rows from {}", references.len(), path.display());
    Ok(references)
}

/// Read a tab-delimited text library with a header row.
///
/// Only `Name` and `m/z` are required; the adduct defaults to `[M+H]+` and
/// a missing retention time is stored as -1.
pub fn read_text_db<R: Read>(reader: R) -> Result<Vec<MoleculeMsReference>, ReferenceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut references = Vec::new();
    for row in csv_reader.deserialize::<TextDbRow>() {
        let row = row?;
        let precursor_type = row
            .adduct
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| "[M+H]+".to_string());
        let ion_mode = AdductIon::parse(&precursor_type)
            .map(|a| a.ion_mode)
            .unwrap_or_default();
        references.push(MoleculeMsReference {
            scan_id: references.len(),
            name: row.name,
            precursor_mz: row.mz,
            precursor_type,
            chrom_x: ChromX::rt(row.rt.unwrap_or(-1.0)),
            formula: row.formula.unwrap_or_default(),
            ontology: row.ontology.unwrap_or_default(),
            smiles: row.smiles.unwrap_or_default(),
            inchikey: row.inchikey.unwrap_or_default(),
            ion_mode,
            collision_cross_section: row.ccs.unwrap_or(0.0),
            ..MoleculeMsReference::default()
        });
    }
    Ok(references)
}
