use std::cmp::Ordering;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Origin of a match result, as combinable bit flags.
///
/// The numeric values are part of the archive format. Never renumber.
///
/// Ordering defines the representative tie-break: any value carrying
/// [`MANUAL`](Self::MANUAL) outranks every automatic source, including the
/// library flags numbered above it; otherwise the larger raw value wins.
/// Over `UNKNOWN`, `MSP_DB`, `TEXT_DB` and `MANUAL` combinations this is
/// exactly the raw numeric order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceType(u32);

impl SourceType {
    /// No annotation source
    pub const UNKNOWN: Self = Self(0);
    /// Spectral library (MSP) search
    pub const MSP_DB: Self = Self(1);
    /// Text library (m/z, RT) search
    pub const TEXT_DB: Self = Self(2);
    /// Manual curation
    pub const MANUAL: Self = Self(4);
    /// Peptide (FASTA-derived) library search
    pub const FASTA_DB: Self = Self(8);
    /// Generated lipid library search
    pub const GENERATED_LIPID: Self = Self(16);

    const NAMED: [(SourceType, &'static str); 5] = [
        (Self::MSP_DB, "MspDB"),
        (Self::TEXT_DB, "TextDB"),
        (Self::MANUAL, "Manual"),
        (Self::FASTA_DB, "FastaDB"),
        (Self::GENERATED_LIPID, "GeneratedLipid"),
    ];

    /// Raw flag value
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build from a raw flag value; unknown bits are kept
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Whether no flag is set
    pub const fn is_unknown(self) -> bool {
        self.0 == 0
    }

    /// Whether every flag of `other` is set in `self`.
    ///
    /// Like a flags `HasFlag`, `contains(UNKNOWN)` is always true.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl SourceType {
    fn rank(self) -> (bool, u32) {
        (self.contains(Self::MANUAL), self.0)
    }
}

impl Ord for SourceType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for SourceType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl BitOr for SourceType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for SourceType {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for SourceType {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceType({self})")
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            return f.write_str("Unknown");
        }
        let mut rest = self.0;
        let mut first = true;
        for (flag, name) in Self::NAMED {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
                rest &= !flag.0;
            }
        }
        if rest != 0 {
            if !first {
                f.write_str(" | ")?;
            }
            write!(f, "{rest:#x}")?;
        }
        Ok(())
    }
}
