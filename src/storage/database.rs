use std::io::{Read, Write};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::matching::SourceType;
use crate::reference::{GeneratedLipidDatabase, MoleculeMsReference, PeptideMsReference};

use super::error::StorageError;
use super::record::{RecordReader, RecordWriter};

/// A reference library that can live inside a storage archive.
///
/// `save` and `load` stream the library as record frames so large libraries
/// never need a single in-memory blob.
pub trait DataBase: Sized {
    /// Archive directory of this database family
    const KIND: &'static str;

    /// Unique id inside a storage
    fn id(&self) -> &str;

    /// Number of references
    fn len(&self) -> usize;

    /// Whether the library holds no references
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the library as record frames
    fn save<W: Write>(&self, writer: W) -> Result<(), StorageError>;

    /// Read a library written by [`DataBase::save`]
    fn load<R: Read>(reader: R, id: &str) -> Result<Self, StorageError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct DataBaseHeader {
    id: String,
    source_type: SourceType,
    count: usize,
}

fn read_library<T, R>(reader: R, id: &str) -> Result<(DataBaseHeader, Vec<T>), StorageError>
where
    T: serde::de::DeserializeOwned,
    R: Read,
{
    let mut records = RecordReader::new(reader);
    let header: DataBaseHeader = records.read_header()?;
    let references: Vec<T> = records.read_records()?;
    if references.len() != header.count {
        return Err(StorageError::CorruptEntry {
            entry: id.to_string(),
            reason: format!(
                "header announces {} references, found {}",
                header.count,
                references.len()
            ),
        });
    }
    if header.id != id {
        warn!("Database stored as '{}' was saved with id '{}'", id, header.id);
    }
    Ok((header, references))
}

fn write_library<T: Serialize, W: Write>(
    writer: W,
    id: &str,
    source_type: SourceType,
    references: &[T],
) -> Result<(), StorageError> {
    let mut records = RecordWriter::new(writer);
    records.write_frame(&DataBaseHeader {
        id: id.to_string(),
        source_type,
        count: references.len(),
    })?;
    records.write_records(references)?;
    records.finish()?;
    Ok(())
}

/// Small-molecule library loaded from MSP or text files
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeDataBase {
    /// Unique id
    pub id: String,
    /// Source flag of results scored against this library
    pub source_type: SourceType,
    /// Entries in scan-id order
    pub references: Vec<MoleculeMsReference>,
}

impl MoleculeDataBase {
    /// Create a library
    pub fn new(
        id: impl Into<String>,
        source_type: SourceType,
        references: Vec<MoleculeMsReference>,
    ) -> Self {
        Self {
            id: id.into(),
            source_type,
            references,
        }
    }

    /// Entry with `scan_id`
    pub fn reference(&self, scan_id: usize) -> Option<&MoleculeMsReference> {
        match self.references.get(scan_id) {
            Some(reference) if reference.scan_id == scan_id => Some(reference),
            _ => self.references.iter().find(|r| r.scan_id == scan_id),
        }
    }
}

impl DataBase for MoleculeDataBase {
    const KIND: &'static str = "MetabolomicsDataBase";

    fn id(&self) -> &str {
        &self.id
    }

    fn len(&self) -> usize {
        self.references.len()
    }

    fn save<W: Write>(&self, writer: W) -> Result<(), StorageError> {
        write_library(writer, &self.id, self.source_type, &self.references)
    }

    fn load<R: Read>(reader: R, id: &str) -> Result<Self, StorageError> {
        let (header, references) = read_library(reader, id)?;
        Ok(Self::new(id, header.source_type, references))
    }
}

/// Peptide library
#[derive(Debug, Clone, PartialEq)]
pub struct ProteomicsDataBase {
    /// Unique id
    pub id: String,
    /// Entries in scan-id order
    pub references: Vec<PeptideMsReference>,
}

impl ProteomicsDataBase {
    /// Create a library
    pub fn new(id: impl Into<String>, references: Vec<PeptideMsReference>) -> Self {
        Self {
            id: id.into(),
            references,
        }
    }

    /// Entry with `scan_id`
    pub fn reference(&self, scan_id: usize) -> Option<&PeptideMsReference> {
        match self.references.get(scan_id) {
            Some(reference) if reference.scan_id == scan_id => Some(reference),
            _ => self.references.iter().find(|r| r.scan_id == scan_id),
        }
    }
}

impl DataBase for ProteomicsDataBase {
    const KIND: &'static str = "ProteomicsDataBase";

    fn id(&self) -> &str {
        &self.id
    }

    fn len(&self) -> usize {
        self.references.len()
    }

    fn save<W: Write>(&self, writer: W) -> Result<(), StorageError> {
        write_library(writer, &self.id, SourceType::FASTA_DB, &self.references)
    }

    fn load<R: Read>(reader: R, id: &str) -> Result<Self, StorageError> {
        let (_, references) = read_library(reader, id)?;
        Ok(Self::new(id, references))
    }
}

impl DataBase for GeneratedLipidDatabase {
    const KIND: &'static str = "GeneratedLipidDataBase";

    fn id(&self) -> &str {
        GeneratedLipidDatabase::id(self)
    }

    fn len(&self) -> usize {
        GeneratedLipidDatabase::len(self)
    }

    fn save<W: Write>(&self, writer: W) -> Result<(), StorageError> {
        let references = self.references();
        write_library(writer, self.id(), SourceType::GENERATED_LIPID, &references)
    }

    fn load<R: Read>(reader: R, id: &str) -> Result<Self, StorageError> {
        let (_, references) = read_library(reader, id)?;
        Ok(GeneratedLipidDatabase::from_references(id, references))
    }
}
