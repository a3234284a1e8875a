//! # Database/Annotator Storage
//!
//! A [`DataBaseStorage`] binds reference libraries to the annotators that
//! search them and persists the binding as one ZIP archive:
//!
//! ```text
//! Storage                              manifest (JSON)
//! <Kind>/<Id>                          database summary (JSON)
//! <Id>/DataBase                        library, record frames
//! <Id>/Annotators/<AnnotatorId>        annotator + parameters, record frames
//! ```
//!
//! The `<Kind>/<Id>` entry only describes its database (id, kind, reference
//! count and annotators) so an archive can be listed without loading any
//! library. References themselves are read from `<Id>/DataBase`.
//!
//! Archives written by older versions keep each database as a nested ZIP at
//! `<Id>`; those still load. See [`CurrentLayout`] and [`LegacyLayout`].
//!
//! ## Example
//!
//! ```rust
//! use std::io::Cursor;
//! use msalign::matching::SourceType;
//! use msalign::storage::{
//!     AnnotatorDescriptor, AnnotatorKind, AnnotatorParameterPair, DataBaseItem,
//!     DataBaseStorage, MoleculeDataBase, MsRefSearchParameter,
//! };
//!
//! let mut storage = DataBaseStorage::new();
//! storage.metabolomics_databases.push(DataBaseItem::new(
//!     MoleculeDataBase::new("msp", SourceType::MSP_DB, Vec::new()),
//!     vec![AnnotatorParameterPair::new(
//!         AnnotatorDescriptor::new("msp-search", AnnotatorKind::MspSearch, 1),
//!         MsRefSearchParameter::default(),
//!     )],
//! ));
//!
//! let bytes = storage.save_to(Cursor::new(Vec::new())).unwrap().into_inner();
//! let loaded = DataBaseStorage::load_from(Cursor::new(bytes)).unwrap();
//! assert_eq!(loaded.ids(), vec!["msp"]);
//! ```

mod annotator;
mod archive;
mod database;
mod error;
mod item;
mod layout;
mod manifest;
mod mapper;
mod record;


pub use annotator::{AnnotatorDescriptor, AnnotatorKind, AnnotatorParameterPair, MsRefSearchParameter};
pub use archive::DataBaseStorage;
pub use database::{DataBase, MoleculeDataBase, ProteomicsDataBase};
pub use error::StorageError;
pub use item::DataBaseItem;
pub use layout::{CurrentLayout, ItemLayout, LegacyLayout};
pub use manifest::{DataBaseSummary, ManifestEntry, StorageManifest, FORMAT_VERSION, MANIFEST_ENTRY};
pub use mapper::DataBaseMapper;
pub use record::{RecordReader, RecordWriter, DEFAULT_CHUNK_SIZE, MAX_FRAME_LEN};
