use std::collections::HashMap;

use log::warn;

use crate::matching::{MatchResultEvaluator, MatchResultRefer, MsScanMatchResult};
use crate::reference::{MoleculeMsReference, PeptideMsReference};

use super::annotator::AnnotatorDescriptor;
use super::archive::DataBaseStorage;
use super::database::DataBase;
use super::item::DataBaseItem;

#[derive(Debug, Clone, Copy)]
enum Slot {
    Metabolomics(usize),
    Proteomics(usize),
    Lipid(usize),
}

/// Resolves annotator ids of match results to their annotator and library
#[derive(Debug)]
pub struct DataBaseMapper<'a> {
    storage: &'a DataBaseStorage,
    annotators: HashMap<String, (AnnotatorDescriptor, Slot)>,
}

impl<'a> DataBaseMapper<'a> {
    /// Index every annotator bound in `storage`.
    ///
    /// When two databases bind the same annotator id the first one wins.
    /// Such a storage cannot be saved, but older archives may still hold one.
    pub fn from_storage(storage: &'a DataBaseStorage) -> Self {
        let mut annotators = HashMap::new();
        register(&mut annotators, &storage.metabolomics_databases, Slot::Metabolomics);
        register(&mut annotators, &storage.proteomics_databases, Slot::Proteomics);
        register(&mut annotators, &storage.lipid_databases, Slot::Lipid);
        Self {
            storage,
            annotators,
        }
    }

    /// Number of registered annotators
    pub fn len(&self) -> usize {
        self.annotators.len()
    }

    /// Whether no annotator is registered
    pub fn is_empty(&self) -> bool {
        self.annotators.is_empty()
    }

    /// Descriptor of `annotator_id`
    pub fn annotator(&self, annotator_id: &str) -> Option<&AnnotatorDescriptor> {
        self.annotators.get(annotator_id).map(|(descriptor, _)| descriptor)
    }

    /// Id of the database `annotator_id` searches
    pub fn database_id(&self, annotator_id: &str) -> Option<&'a str> {
        let storage = self.storage;
        match self.annotators.get(annotator_id)?.1 {
            Slot::Metabolomics(i) => storage.metabolomics_databases.get(i).map(DataBaseItem::id),
            Slot::Proteomics(i) => storage.proteomics_databases.get(i).map(DataBaseItem::id),
            Slot::Lipid(i) => storage.lipid_databases.get(i).map(DataBaseItem::id),
        }
    }

    /// Small-molecule reference a result points at
    pub fn molecule_reference(&self, result: &MsScanMatchResult) -> Option<MoleculeMsReference> {
        let scan_id = usize::try_from(result.library_id).ok()?;
        match self.annotators.get(&result.annotator_id)?.1 {
            Slot::Metabolomics(i) => self
                .storage
                .metabolomics_databases
                .get(i)?
                .database
                .reference(scan_id)
                .cloned(),
            Slot::Lipid(i) => self.storage.lipid_databases.get(i)?.database.refer(scan_id),
            Slot::Proteomics(_) => None,
        }
    }

    /// Peptide reference a result points at
    pub fn peptide_reference(&self, result: &MsScanMatchResult) -> Option<&'a PeptideMsReference> {
        let scan_id = usize::try_from(result.library_id).ok()?;
        match self.annotators.get(&result.annotator_id)?.1 {
            Slot::Proteomics(i) => self
                .storage
                .proteomics_databases
                .get(i)?
                .database
                .reference(scan_id),
            _ => None,
        }
    }
}

fn register<D: DataBase>(
    annotators: &mut HashMap<String, (AnnotatorDescriptor, Slot)>,
    items: &[DataBaseItem<D>],
    slot: fn(usize) -> Slot,
) {
    for (i, item) in items.iter().enumerate() {
        for pair in &item.pairs {
            if annotators.contains_key(pair.id()) {
                warn!(
                    "Annotator '{}' of database '{}' is already bound elsewhere",
                    pair.id(),
                    item.id()
                );
                continue;
            }
            annotators.insert(pair.id().to_string(), (pair.annotator.clone(), slot(i)));
        }
    }
}

impl MatchResultRefer for DataBaseMapper<'_> {
    fn evaluator(&self, annotator_id: &str) -> Option<&dyn MatchResultEvaluator> {
        self.annotator(annotator_id)
            .map(|descriptor| descriptor as &dyn MatchResultEvaluator)
    }
}
