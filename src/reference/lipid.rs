use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::spectrum::{ChromX, IonMode};

use super::adduct::AdductIon;
use super::error::ReferenceError;
use super::types::{MoleculeMsReference, SpectrumPeak};

/// CH2 increment per acyl carbon
const CH2: f64 = 14.01565;
/// H2 decrement per double bond
const H2: f64 = 2.01565;

/// Lipid classes the generator knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LipidClass {
    /// Phosphatidylcholine
    PC,
    /// Phosphatidylethanolamine
    PE,
    /// Phosphatidylglycerol
    PG,
    /// Phosphatidylinositol
    PI,
    /// Phosphatidylserine
    PS,
    /// Lysophosphatidylcholine
    LPC,
    /// Diacylglycerol
    DG,
    /// Triacylglycerol
    TG,
}

impl LipidClass {
    const ALL: [LipidClass; 8] = [
        Self::PC,
        Self::PE,
        Self::PG,
        Self::PI,
        Self::PS,
        Self::LPC,
        Self::DG,
        Self::TG,
    ];

    /// Class abbreviation
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::PC => "PC",
            Self::PE => "PE",
            Self::PG => "PG",
            Self::PI => "PI",
            Self::PS => "PS",
            Self::LPC => "LPC",
            Self::DG => "DG",
            Self::TG => "TG",
        }
    }

    /// Neutral mass with zero acyl carbons and double bonds
    fn backbone_mass(self) -> f64 {
        match self {
            Self::PC => 285.06135,
            Self::PE => 243.01445,
            Self::PG => 274.00895,
            Self::PI => 362.02505,
            Self::PS => 287.00425,
            Self::LPC => 271.08205,
            Self::DG => 120.00585,
            Self::TG => 133.9851,
        }
    }

    /// Diagnostic fragments (m/z) and neutral losses of the class
    fn signature(self, ion_mode: IonMode) -> &'static [Signature] {
        use Signature::{Fragment, NeutralLoss};
        match (self, ion_mode) {
            (Self::PC, IonMode::Positive) => &[Fragment(184.07332, 999.0)],
            (Self::PC, _) => &[NeutralLoss(60.02113, 999.0)],
            (Self::PE, IonMode::Positive) => &[NeutralLoss(141.01909, 999.0)],
            (Self::PE, _) => &[Fragment(140.01179, 200.0)],
            (Self::PG, IonMode::Positive) => &[NeutralLoss(189.04023, 999.0)],
            (Self::PG, _) => &[Fragment(152.99583, 300.0)],
            (Self::PI, IonMode::Positive) => &[NeutralLoss(277.05628, 999.0)],
            (Self::PI, _) => &[Fragment(241.01188, 500.0)],
            (Self::PS, IonMode::Positive) => &[NeutralLoss(185.00892, 999.0)],
            (Self::PS, _) => &[NeutralLoss(87.03203, 999.0)],
            (Self::LPC, IonMode::Positive) => {
                &[Fragment(184.07332, 999.0), NeutralLoss(18.01056, 300.0)]
            }
            (Self::LPC, _) => &[NeutralLoss(60.02113, 999.0)],
            (Self::DG, _) => &[NeutralLoss(35.03711, 999.0)],
            (Self::TG, _) => &[NeutralLoss(17.02655, 999.0)],
        }
    }
}

impl FromStr for LipidClass {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.abbreviation().eq_ignore_ascii_case(s))
            .ok_or_else(|| ReferenceError::InvalidLipid(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
enum Signature {
    /// Product ion at a fixed m/z
    Fragment(f64, f64),
    /// Product ion at precursor m/z minus a loss
    NeutralLoss(f64, f64),
}

/// Sum-composition lipid, e.g. `PC 34:1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lipid {
    /// Lipid class
    pub class: LipidClass,
    /// Total acyl carbons
    pub carbons: u32,
    /// Total acyl double bonds
    pub double_bonds: u32,
}

impl Lipid {
    /// Create a lipid
    pub fn new(class: LipidClass, carbons: u32, double_bonds: u32) -> Self {
        Self {
            class,
            carbons,
            double_bonds,
        }
    }

    /// Monoisotopic neutral mass
    pub fn mass(&self) -> f64 {
        self.class.backbone_mass() + CH2 * f64::from(self.carbons)
            - H2 * f64::from(self.double_bonds)
    }
}

impl fmt::Display for Lipid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{}",
            self.class.abbreviation(),
            self.carbons,
            self.double_bonds
        )
    }
}

impl FromStr for Lipid {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReferenceError::InvalidLipid(s.to_string());
        let (class, chains) = s.trim().split_once(' ').ok_or_else(invalid)?;
        let (carbons, double_bonds) = chains.trim().split_once(':').ok_or_else(invalid)?;
        Ok(Self {
            class: class.parse()?,
            carbons: carbons.parse().map_err(|_| invalid())?,
            double_bonds: double_bonds.parse().map_err(|_| invalid())?,
        })
    }
}

/// Build the reference spectrum of one lipid ion
pub fn generate_reference(lipid: &Lipid, adduct: &AdductIon, scan_id: usize) -> MoleculeMsReference {
    let precursor_mz = adduct.precursor_mz(lipid.mass());
    let mut spectrum = vec![SpectrumPeak::with_comment(precursor_mz, 100.0, "precursor")];
    for signature in lipid.class.signature(adduct.ion_mode) {
        let peak = match *signature {
            Signature::Fragment(mz, intensity) => {
                SpectrumPeak::with_comment(mz, intensity, "class fragment")
            }
            Signature::NeutralLoss(loss, intensity) => {
                SpectrumPeak::with_comment(precursor_mz - loss, intensity, "class neutral loss")
            }
        };
        if peak.mass > 0.0 {
            spectrum.push(peak);
        }
    }
    spectrum.sort_by(|a, b| a.mass.total_cmp(&b.mass));

    MoleculeMsReference {
        scan_id,
        name: lipid.to_string(),
        precursor_mz,
        precursor_type: adduct.name.clone(),
        chrom_x: ChromX::rt(-1.0),
        ontology: lipid.class.abbreviation().to_string(),
        ion_mode: adduct.ion_mode,
        spectrum,
        ..MoleculeMsReference::default()
    }
}

#[derive(Debug, Default)]
struct LipidStore {
    references: Vec<MoleculeMsReference>,
    by_key: HashMap<(Lipid, String), usize>,
}

/// Lipid references generated on demand and kept for later lookups.
///
/// All access goes through one mutex scoped to the instance, so concurrent
/// annotation workers generating overlapping classes never hand out the same
/// scan id twice and never lose an entry.
#[derive(Debug, Default)]
pub struct GeneratedLipidDatabase {
    id: String,
    store: Mutex<LipidStore>,
}

impl GeneratedLipidDatabase {
    /// Empty database
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            store: Mutex::default(),
        }
    }

    /// Database rebuilt from previously generated references.
    ///
    /// Scan ids are reassigned sequentially in the given order.
    pub fn from_references(id: impl Into<String>, references: Vec<MoleculeMsReference>) -> Self {
        let mut store = LipidStore::default();
        for mut reference in references {
            let scan_id = store.references.len();
            reference.scan_id = scan_id;
            if let Ok(lipid) = reference.name.parse::<Lipid>() {
                store
                    .by_key
                    .insert((lipid, reference.precursor_type.clone()), scan_id);
            }
            store.references.push(reference);
        }
        Self {
            id: id.into(),
            store: Mutex::new(store),
        }
    }

    /// Database id
    pub fn id(&self) -> &str {
        &self.id
    }

    fn lock(&self) -> MutexGuard<'_, LipidStore> {
        // Insertions push and index in one step, a poisoned store is consistent
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// References for every lipid as `adduct`, generating the missing ones
    pub fn generate(&self, lipids: &[Lipid], adduct: &AdductIon) -> Vec<MoleculeMsReference> {
        let mut store = self.lock();
        let mut generated = 0usize;
        let references = lipids
            .iter()
            .map(|lipid| {
                let key = (*lipid, adduct.name.clone());
                let existing = store.by_key.get(&key).copied();
                let scan_id = match existing {
                    Some(scan_id) => scan_id,
                    None => {
                        let scan_id = store.references.len();
                        store
                            .references
                            .push(generate_reference(lipid, adduct, scan_id));
                        store.by_key.insert(key, scan_id);
                        generated += 1;
                        scan_id
                    }
                };
                store.references[scan_id].clone()
            })
            .collect();
        if generated > 0 {
            debug!(
                "Generated {} lipid references as {} ({} total)",
                generated,
                adduct,
                store.references.len()
            );
        }
        references
    }

    /// Look up a generated reference by scan id
    pub fn refer(&self, scan_id: usize) -> Option<MoleculeMsReference> {
        self.lock().references.get(scan_id).cloned()
    }

    /// Snapshot of all generated references in scan-id order
    pub fn references(&self) -> Vec<MoleculeMsReference> {
        self.lock().references.clone()
    }

    /// Number of generated references
    pub fn len(&self) -> usize {
        self.lock().references.len()
    }

    /// Whether nothing was generated yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
