use std::io::{Read, Seek, Write};

use log::{debug, warn};
use zip::{ZipArchive, ZipWriter};

use super::annotator::AnnotatorParameterPair;
use super::database::DataBase;
use super::error::StorageError;
use super::layout::{CurrentLayout, ItemLayout, LegacyLayout};

/// A reference database with the annotators searching it
#[derive(Debug, Clone, PartialEq)]
pub struct DataBaseItem<D> {
    /// The library
    pub database: D,
    /// Annotators bound to it, in priority order as added
    pub pairs: Vec<AnnotatorParameterPair>,
}

impl<D: DataBase> DataBaseItem<D> {
    /// Bind `pairs` to `database`
    pub fn new(database: D, pairs: Vec<AnnotatorParameterPair>) -> Self {
        Self { database, pairs }
    }

    /// Database id
    pub fn id(&self) -> &str {
        self.database.id()
    }

    /// Ids of the bound annotators, in order
    pub fn annotator_ids(&self) -> Vec<String> {
        self.pairs.iter().map(|p| p.id().to_string()).collect()
    }

    /// Bind one more annotator
    pub fn add_pair(&mut self, pair: AnnotatorParameterPair) {
        self.pairs.push(pair);
    }

    /// Write the item in the current layout
    pub fn save<W: Write + Seek>(&self, zip: &mut ZipWriter<W>) -> Result<(), StorageError> {
        CurrentLayout::write_item(zip, self)
    }

    /// Read the item `id`, trying the current layout first and the legacy
    /// nested archive second.
    ///
    /// Returns `Ok(None)` when neither layout holds the item.
    pub fn load<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        id: &str,
        annotator_ids: &[String],
    ) -> Result<Option<Self>, StorageError> {
        if let Some(item) = CurrentLayout::read_item(archive, id, annotator_ids)? {
            debug!("Loaded database '{}' ({} layout)", id, CurrentLayout::NAME);
            return Ok(Some(item));
        }
        if let Some(item) = LegacyLayout::read_item(archive, id, annotator_ids)? {
            debug!("Loaded database '{}' ({} layout)", id, LegacyLayout::NAME);
            return Ok(Some(item));
        }
        warn!("Database '{}' is listed in the manifest but has no entries", id);
        Ok(None)
    }
}
