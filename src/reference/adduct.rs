use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::spectrum::IonMode;

use super::error::ReferenceError;

/// Proton mass
pub const PROTON: f64 = 1.007276;

/// (notation, mass shift of a singly charged ion, ion mode)
const ADDUCT_TABLE: [(&str, f64, IonMode); 6] = [
    ("[M+H]+", PROTON, IonMode::Positive),
    ("[M+NH4]+", 18.033823, IonMode::Positive),
    ("[M+Na]+", 22.989218, IonMode::Positive),
    ("[M-H]-", -PROTON, IonMode::Negative),
    ("[M+HCOO]-", 44.998201, IonMode::Negative),
    ("[M+CH3COO]-", 59.013851, IonMode::Negative),
];

/// Singly charged adduct ion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdductIon {
    /// Notation, e.g. `[M+H]+`
    pub name: String,
    /// Mass added to the neutral molecule
    pub adduct_mass: f64,
    /// Ion mode the adduct forms in
    pub ion_mode: IonMode,
}

impl AdductIon {
    /// Parse a supported notation; surrounding whitespace is ignored
    pub fn parse(notation: &str) -> Result<Self, ReferenceError> {
        let compact: String = notation.chars().filter(|c| !c.is_whitespace()).collect();
        ADDUCT_TABLE
            .iter()
            .find(|(name, _, _)| *name == compact)
            .map(|&(name, adduct_mass, ion_mode)| Self {
                name: name.to_string(),
                adduct_mass,
                ion_mode,
            })
            .ok_or_else(|| ReferenceError::UnsupportedAdduct(notation.to_string()))
    }

    /// Default adduct of an ion mode: `[M-H]-` for negative, `[M+H]+` otherwise
    pub fn default_for(ion_mode: IonMode) -> Self {
        match ion_mode {
            IonMode::Negative => Self {
                name: "[M-H]-".to_string(),
                adduct_mass: -PROTON,
                ion_mode: IonMode::Negative,
            },
            _ => Self {
                name: "[M+H]+".to_string(),
                adduct_mass: PROTON,
                ion_mode: IonMode::Positive,
            },
        }
    }

    /// m/z of the ion formed from a neutral molecule
    pub fn precursor_mz(&self, neutral_mass: f64) -> f64 {
        neutral_mass + self.adduct_mass
    }

    /// Neutral mass of an ion observed at `mz`
    pub fn neutral_mass(&self, mz: f64) -> f64 {
        mz - self.adduct_mass
    }
}

impl FromStr for AdductIon {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AdductIon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
