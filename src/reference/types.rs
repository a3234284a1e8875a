use serde::{Deserialize, Serialize};

use crate::spectrum::{ChromX, IonMode};

/// One peak of a reference spectrum
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpectrumPeak {
    /// m/z
    pub mass: f64,
    /// Relative intensity
    pub intensity: f64,
    /// Annotation of the peak (fragment name, neutral loss)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl SpectrumPeak {
    /// Create a peak without annotation
    pub fn new(mass: f64, intensity: f64) -> Self {
        Self {
            mass,
            intensity,
            comment: String::new(),
        }
    }

    /// Create an annotated peak
    pub fn with_comment(mass: f64, intensity: f64, comment: impl Into<String>) -> Self {
        Self {
            mass,
            intensity,
            comment: comment.into(),
        }
    }
}

/// Small-molecule library entry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoleculeMsReference {
    /// Sequential id within its library
    pub scan_id: usize,
    /// Compound name
    pub name: String,
    /// Precursor m/z
    pub precursor_mz: f64,
    /// Adduct notation, e.g. `[M+H]+`
    pub precursor_type: String,
    /// Reference retention time (or other axis value); negative when unknown
    pub chrom_x: ChromX,
    /// Molecular formula
    pub formula: String,
    /// Compound class
    pub ontology: String,
    /// SMILES
    pub smiles: String,
    /// InChIKey
    pub inchikey: String,
    /// Ion mode the spectrum was acquired in
    pub ion_mode: IonMode,
    /// Collision cross section, 0 when unknown
    pub collision_cross_section: f64,
    /// Reference spectrum, ascending m/z
    pub spectrum: Vec<SpectrumPeak>,
    /// Free text comment
    pub comment: String,
}

/// Peptide library entry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PeptideMsReference {
    /// Sequential id within its library
    pub scan_id: usize,
    /// Plain amino-acid sequence
    pub sequence: String,
    /// Sequence with modification notation
    pub modified_sequence: String,
    /// Precursor m/z
    pub precursor_mz: f64,
    /// Precursor charge
    pub charge: i32,
    /// Accession of the source protein
    pub protein_accession: String,
    /// Theoretical fragment spectrum
    pub spectrum: Vec<SpectrumPeak>,
}
