use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use log::{info, warn};
use tempfile::NamedTempFile;
use zip::result::ZipError;
use zip::{ZipArchive, ZipWriter};

use crate::reference::GeneratedLipidDatabase;

use super::database::{DataBase, MoleculeDataBase, ProteomicsDataBase};
use super::error::StorageError;
use super::item::DataBaseItem;
use super::layout::entry_options;
use super::manifest::{
    DataBaseSummary, ManifestEntry, StorageManifest, FORMAT_VERSION, MANIFEST_ENTRY,
};

/// All reference databases of a project with their annotators
#[derive(Debug, Default)]
pub struct DataBaseStorage {
    /// Small-molecule libraries
    pub metabolomics_databases: Vec<DataBaseItem<MoleculeDataBase>>,
    /// Peptide libraries
    pub proteomics_databases: Vec<DataBaseItem<ProteomicsDataBase>>,
    /// Generated lipid libraries
    pub lipid_databases: Vec<DataBaseItem<GeneratedLipidDatabase>>,
    missing_items: Vec<String>,
}

impl DataBaseStorage {
    /// Empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of databases
    pub fn len(&self) -> usize {
        self.metabolomics_databases.len()
            + self.proteomics_databases.len()
            + self.lipid_databases.len()
    }

    /// Whether no database is configured
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Database ids in save order
    pub fn ids(&self) -> Vec<&str> {
        self.metabolomics_databases
            .iter()
            .map(DataBaseItem::id)
            .chain(self.proteomics_databases.iter().map(DataBaseItem::id))
            .chain(self.lipid_databases.iter().map(DataBaseItem::id))
            .collect()
    }

    /// Ids listed in the loaded manifest whose entries could not be found
    pub fn missing_items(&self) -> &[String] {
        &self.missing_items
    }

    /// Manifest describing the current content
    pub fn manifest(&self) -> StorageManifest {
        let mut databases = Vec::with_capacity(self.len());
        databases.extend(self.metabolomics_databases.iter().map(manifest_entry));
        databases.extend(self.proteomics_databases.iter().map(manifest_entry));
        databases.extend(self.lipid_databases.iter().map(manifest_entry));
        StorageManifest {
            format_version: FORMAT_VERSION,
            created: chrono::Utc::now().to_rfc3339(),
            databases,
        }
    }

    /// Database ids name top-level entries and annotator ids name entries
    /// below them, so both must be usable as a single path segment. Annotator
    /// ids are unique across the whole storage since match results refer to
    /// them without their database.
    fn validate_ids(&self) -> Result<(), StorageError> {
        let mut seen = HashSet::new();
        for id in self.ids() {
            if !is_entry_segment(id) || id == MANIFEST_ENTRY {
                return Err(StorageError::InvalidId(id.to_string()));
            }
            if !seen.insert(id) {
                return Err(StorageError::DuplicateId(id.to_string()));
            }
        }

        let mut annotators = HashSet::new();
        let pairs = self
            .metabolomics_databases
            .iter()
            .flat_map(|item| &item.pairs)
            .chain(self.proteomics_databases.iter().flat_map(|item| &item.pairs))
            .chain(self.lipid_databases.iter().flat_map(|item| &item.pairs));
        for pair in pairs {
            let id = pair.id();
            if !is_entry_segment(id) {
                return Err(StorageError::InvalidId(id.to_string()));
            }
            if !annotators.insert(id) {
                return Err(StorageError::DuplicateId(id.to_string()));
            }
        }
        Ok(())
    }

    /// Save to `path`, replacing any existing file only once the archive is
    /// complete
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StorageError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir)?;
        {
            let writer = BufWriter::new(temp.as_file_mut());
            self.save_to(writer)?;
        }
        temp.persist(path).map_err(|e| e.error)?;
        info!("Saved {} databases to {}", self.len(), path.display());
        Ok(())
    }

    /// Write the archive into `writer` and return it
    pub fn save_to<W: Write + Seek>(&self, writer: W) -> Result<W, StorageError> {
        self.validate_ids()?;
        let mut zip = ZipWriter::new(writer);

        zip.start_file(MANIFEST_ENTRY, entry_options())?;
        serde_json::to_writer_pretty(&mut zip, &self.manifest())?;

        for item in &self.metabolomics_databases {
            write_item(&mut zip, item)?;
        }
        for item in &self.proteomics_databases {
            write_item(&mut zip, item)?;
        }
        for item in &self.lipid_databases {
            write_item(&mut zip, item)?;
        }

        let mut inner = zip.finish()?;
        inner.flush()?;
        Ok(inner)
    }

    /// Load the archive at `path`.
    ///
    /// An archive that is not a readable storage yields an empty storage and
    /// a warning; a file that cannot be opened is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let storage = Self::load_from(BufReader::new(file))?;
        info!("Loaded {} databases from {}", storage.len(), path.display());
        Ok(storage)
    }

    /// Load an archive from `reader`, see [`DataBaseStorage::load`]
    pub fn load_from<R: Read + Seek>(reader: R) -> Result<Self, StorageError> {
        match Self::read_archive(reader) {
            Ok(storage) => Ok(storage),
            Err(e) if e.is_corruption() => {
                warn!("Storage archive is unreadable, starting empty: {}", e);
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    fn read_archive<R: Read + Seek>(reader: R) -> Result<Self, StorageError> {
        let mut archive = ZipArchive::new(reader)?;
        let manifest = read_manifest(&mut archive)?;

        let mut storage = Self::default();
        for entry in &manifest.databases {
            let kind = entry.kind.as_str();
            let loaded = if kind == MoleculeDataBase::KIND {
                load_item(&mut archive, entry, &mut storage.metabolomics_databases)?
            } else if kind == ProteomicsDataBase::KIND {
                load_item(&mut archive, entry, &mut storage.proteomics_databases)?
            } else if kind == GeneratedLipidDatabase::KIND {
                load_item(&mut archive, entry, &mut storage.lipid_databases)?
            } else {
                warn!("Database '{}' has unknown kind '{}'", entry.id, kind);
                false
            };
            if !loaded {
                storage.missing_items.push(entry.id.clone());
            }
        }
        Ok(storage)
    }

    /// Read the manifest and the per-database summaries without loading any
    /// references
    pub fn read_summaries<R: Read + Seek>(reader: R) -> Result<Vec<DataBaseSummary>, StorageError> {
        let mut archive = ZipArchive::new(reader)?;
        let manifest = read_manifest(&mut archive)?;
        let mut summaries = Vec::with_capacity(manifest.databases.len());
        for entry in &manifest.databases {
            let name = format!("{}/{}", entry.kind, entry.id);
            match archive.by_name(&name) {
                Ok(file) => summaries.push(serde_json::from_reader(file)?),
                Err(ZipError::FileNotFound) => warn!("Summary entry {} is missing", name),
                Err(e) => return Err(e.into()),
            }
        }
        Ok(summaries)
    }
}

fn is_entry_segment(id: &str) -> bool {
    !id.is_empty() && !id.contains(['/', '\\'])
}

fn manifest_entry<D: DataBase>(item: &DataBaseItem<D>) -> ManifestEntry {
    ManifestEntry {
        id: item.id().to_string(),
        kind: D::KIND.to_string(),
        annotators: item.annotator_ids(),
    }
}

fn read_manifest<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<StorageManifest, StorageError> {
    let manifest: StorageManifest = serde_json::from_reader(archive.by_name(MANIFEST_ENTRY)?)?;
    if manifest.format_version > FORMAT_VERSION {
        warn!(
            "Storage manifest version {} is newer than supported version {}",
            manifest.format_version, FORMAT_VERSION
        );
    }
    Ok(manifest)
}

fn write_item<D: DataBase, W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    item: &DataBaseItem<D>,
) -> Result<(), StorageError> {
    let summary = DataBaseSummary {
        id: item.id().to_string(),
        kind: D::KIND.to_string(),
        references: item.database.len(),
        annotators: item.pairs.iter().map(|p| p.annotator.clone()).collect(),
    };
    zip.start_file(format!("{}/{}", D::KIND, item.id()), entry_options())?;
    serde_json::to_writer(&mut *zip, &summary)?;
    item.save(zip)
}

fn load_item<D: DataBase, R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    entry: &ManifestEntry,
    items: &mut Vec<DataBaseItem<D>>,
) -> Result<bool, StorageError> {
    match DataBaseItem::load(archive, &entry.id, &entry.annotators)? {
        Some(item) => {
            items.push(item);
            Ok(true)
        }
        None => Ok(false),
    }
}
