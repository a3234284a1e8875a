//! On-disk layouts of one database item.
//!
//! Current layout, flat entries of the storage archive:
//!
//! ```text
//! <Id>/DataBase
//! <Id>/Annotators/<AnnotatorId>
//! ```
//!
//! Legacy layout, a nested archive stored at `<Id>`:
//!
//! ```text
//! <Id>            (zip)
//!   DataBase
//!   Annotators/<AnnotatorId>
//! ```

use std::io::{Cursor, Read, Seek, Write};

use log::warn;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::annotator::{AnnotatorDescriptor, AnnotatorParameterPair, MsRefSearchParameter};
use super::database::DataBase;
use super::error::StorageError;
use super::item::DataBaseItem;
use super::record::{RecordReader, RecordWriter};

const DATABASE_ENTRY: &str = "DataBase";
const ANNOTATORS_DIR: &str = "Annotators";

pub(super) fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// One way of laying out a database item inside an archive
pub trait ItemLayout {
    /// Layout name used in log messages
    const NAME: &'static str;

    /// Write `item` into `zip`
    fn write_item<D: DataBase, W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        item: &DataBaseItem<D>,
    ) -> Result<(), StorageError>;

    /// Read the item `id` with the listed annotators; `None` when this
    /// layout has no entry for it
    fn read_item<D: DataBase, R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        id: &str,
        annotator_ids: &[String],
    ) -> Result<Option<DataBaseItem<D>>, StorageError>;
}

/// `<Id>/DataBase` and `<Id>/Annotators/<AnnotatorId>` entries
pub struct CurrentLayout;

/// Nested archive at `<Id>`
pub struct LegacyLayout;

impl ItemLayout for CurrentLayout {
    const NAME: &'static str = "current";

    fn write_item<D: DataBase, W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        item: &DataBaseItem<D>,
    ) -> Result<(), StorageError> {
        let id = item.id();
        zip.start_file(format!("{id}/{DATABASE_ENTRY}"), entry_options())?;
        item.database.save(&mut *zip)?;
        for pair in &item.pairs {
            zip.start_file(
                format!("{id}/{ANNOTATORS_DIR}/{}", pair.id()),
                entry_options(),
            )?;
            write_annotator(&mut *zip, pair)?;
        }
        Ok(())
    }

    fn read_item<D: DataBase, R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        id: &str,
        annotator_ids: &[String],
    ) -> Result<Option<DataBaseItem<D>>, StorageError> {
        let database_entry = format!("{id}/{DATABASE_ENTRY}");
        let database = match archive.by_name(&database_entry) {
            Ok(file) => D::load(file, id)?,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let prefix = format!("{id}/{ANNOTATORS_DIR}/");
        let pairs = read_annotators(archive, &prefix, annotator_ids)?;
        Ok(Some(DataBaseItem::new(database, pairs)))
    }
}

impl ItemLayout for LegacyLayout {
    const NAME: &'static str = "legacy";

    fn write_item<D: DataBase, W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        item: &DataBaseItem<D>,
    ) -> Result<(), StorageError> {
        let mut nested = ZipWriter::new(Cursor::new(Vec::new()));
        nested.start_file(DATABASE_ENTRY, entry_options())?;
        item.database.save(&mut nested)?;
        for pair in &item.pairs {
            nested.start_file(format!("{ANNOTATORS_DIR}/{}", pair.id()), entry_options())?;
            write_annotator(&mut nested, pair)?;
        }
        let bytes = nested.finish()?.into_inner();

        // Already compressed
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file(item.id(), options)?;
        zip.write_all(&bytes)?;
        Ok(())
    }

    fn read_item<D: DataBase, R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        id: &str,
        annotator_ids: &[String],
    ) -> Result<Option<DataBaseItem<D>>, StorageError> {
        let bytes = match archive.by_name(id) {
            Ok(mut file) => {
                // Declared size is untrusted
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes)?;
                bytes
            }
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut nested = ZipArchive::new(Cursor::new(bytes))?;
        let database = match nested.by_name(DATABASE_ENTRY) {
            Ok(file) => D::load(file, id)?,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let prefix = format!("{ANNOTATORS_DIR}/");
        let pairs = read_annotators(&mut nested, &prefix, annotator_ids)?;
        Ok(Some(DataBaseItem::new(database, pairs)))
    }
}

fn write_annotator<W: Write>(writer: W, pair: &AnnotatorParameterPair) -> Result<(), StorageError> {
    let mut records = RecordWriter::new(writer);
    records.write_frame(&pair.annotator)?;
    records.write_records(std::slice::from_ref(&pair.parameter))?;
    records.finish()?;
    Ok(())
}

fn read_annotator<R: Read>(reader: R, entry: &str) -> Result<AnnotatorParameterPair, StorageError> {
    let mut records = RecordReader::new(reader);
    let annotator: AnnotatorDescriptor = records.read_header()?;
    let parameter = records
        .read_records::<MsRefSearchParameter>()?
        .into_iter()
        .next()
        .ok_or_else(|| StorageError::CorruptEntry {
            entry: entry.to_string(),
            reason: "annotator without search parameter".to_string(),
        })?;
    Ok(AnnotatorParameterPair::new(annotator, parameter))
}

fn read_annotators<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    prefix: &str,
    annotator_ids: &[String],
) -> Result<Vec<AnnotatorParameterPair>, StorageError> {
    let mut pairs = Vec::with_capacity(annotator_ids.len());
    for annotator_id in annotator_ids {
        let entry = format!("{prefix}{annotator_id}");
        match archive.by_name(&entry) {
            Ok(file) => pairs.push(read_annotator(file, &entry)?),
            Err(ZipError::FileNotFound) => warn!("Annotator entry {} is missing", entry),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(pairs)
}
