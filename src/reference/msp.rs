use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};

use crate::spectrum::{ChromX, IonMode};

use super::adduct::AdductIon;
use super::error::ReferenceError;
use super::types::{MoleculeMsReference, SpectrumPeak};

/// Read an MSP spectral library from a file
pub fn read_msp_file<P: AsRef<Path>>(path: P) -> Result<Vec<MoleculeMsReference>, ReferenceError> {
    let path = path.as_ref();
    let references = read_msp(BufReader::new(File::open(path)?))?;
    info!("Read {} MSP records from {}", references.len(), path.display());
    Ok(references)
}

/// Read an MSP spectral library.
///
/// Records are `KEY: value` header lines followed by `m/z intensity` peak
/// lines; a blank line ends a record. Keys are case-insensitive and unknown
/// keys are ignored. Records get sequential scan ids in file order.
pub fn read_msp<R: BufRead>(reader: R) -> Result<Vec<MoleculeMsReference>, ReferenceError> {
    let mut references = Vec::new();
    let mut current = RecordBuilder::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = i + 1;
        let line = line.trim();
        if line.is_empty() {
            current.flush_into(&mut references);
            continue;
        }
        if let Some((key, value)) = header(line) {
            current.set(&key, value.trim(), line_number)?;
        } else if starts_numeric(line) {
            current.add_peaks(line, line_number)?;
        } else {
            debug!("Ignoring MSP line {}: {}", line_number, line);
        }
    }
    current.flush_into(&mut references);
    Ok(references)
}

/// `KEY: value` with an upper-cased key; peak lines never qualify
fn header(line: &str) -> Option<(String, &str)> {
    if starts_numeric(line) {
        return None;
    }
    let (key, value) = line.split_once(':')?;
    Some((key.trim().to_ascii_uppercase(), value))
}

fn starts_numeric(line: &str) -> bool {
    line.chars()
        .next()
        .map_or(false, |c| c.is_ascii_digit() || c == '.' || c == '-')
}

fn parse_f64(value: &str, field: &str, line: usize) -> Result<f64, ReferenceError> {
    value.parse::<f64>().map_err(|_| ReferenceError::InvalidValue {
        line,
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_ion_mode(value: &str) -> Option<IonMode> {
    match value.to_ascii_lowercase().as_str() {
        "positive" | "pos" | "p" | "+" => Some(IonMode::Positive),
        "negative" | "neg" | "n" | "-" => Some(IonMode::Negative),
        _ => None,
    }
}

#[derive(Default)]
struct RecordBuilder {
    reference: MoleculeMsReference,
    ion_mode: Option<IonMode>,
    retention_time: Option<f64>,
    has_content: bool,
}

impl RecordBuilder {
    fn set(&mut self, key: &str, value: &str, line: usize) -> Result<(), ReferenceError> {
        self.has_content = true;
        let reference = &mut self.reference;
        match key {
            "NAME" => reference.name = value.to_string(),
            "PRECURSORMZ" | "PRECURSOR_MZ" | "PEPMASS" => {
                reference.precursor_mz = parse_f64(value, "PRECURSORMZ", line)?
            }
            "PRECURSORTYPE" | "ADDUCT" => reference.precursor_type = value.to_string(),
            "RETENTIONTIME" | "RT" => {
                self.retention_time = Some(parse_f64(value, "RETENTIONTIME", line)?)
            }
            "FORMULA" => reference.formula = value.to_string(),
            "ONTOLOGY" | "COMPOUNDCLASS" => reference.ontology = value.to_string(),
            "INCHIKEY" => reference.inchikey = value.to_string(),
            "SMILES" => reference.smiles = value.to_string(),
            "IONMODE" | "ION_MODE" => self.ion_mode = parse_ion_mode(value),
            "CCS" | "COLLISIONCROSSSECTION" => {
                reference.collision_cross_section = parse_f64(value, "CCS", line)?
            }
            "COMMENT" | "COMMENTS" => reference.comment = value.to_string(),
            // NUM PEAKS is implied by the peak block that follows
            _ => {}
        }
        Ok(())
    }

    /// One line may hold several `m/z intensity` pairs separated by `;`
    fn add_peaks(&mut self, line: &str, line_number: usize) -> Result<(), ReferenceError> {
        self.has_content = true;
        for pair in line.split(';') {
            let mut tokens = pair.split_whitespace();
            let (Some(mz), Some(intensity)) = (tokens.next(), tokens.next()) else {
                continue;
            };
            let comment = tokens.collect::<Vec<_>>().join(" ");
            self.reference.spectrum.push(SpectrumPeak::with_comment(
                parse_f64(mz, "m/z", line_number)?,
                parse_f64(intensity, "intensity", line_number)?,
                comment.trim_matches('"'),
            ));
        }
        Ok(())
    }

    fn flush_into(&mut self, references: &mut Vec<MoleculeMsReference>) {
        if !self.has_content {
            return;
        }
        let mut builder = std::mem::take(self);
        let reference = &mut builder.reference;

        let adduct = AdductIon::parse(&reference.precursor_type).ok();
        reference.ion_mode = builder
            .ion_mode
            .or_else(|| adduct.as_ref().map(|a| a.ion_mode))
            .unwrap_or_default();
        if reference.precursor_type.is_empty() {
            reference.precursor_type = AdductIon::default_for(reference.ion_mode).name;
        }
        reference.chrom_x = ChromX::rt(builder.retention_time.unwrap_or(-1.0));
        reference
            .spectrum
            .sort_by(|a, b| a.mass.total_cmp(&b.mass));
        reference.scan_id = references.len();
        references.push(builder.reference);
    }
}
