//! # Project Datasets
//!
//! A project keeps one [`DataBaseStorage`](crate::storage::DataBaseStorage)
//! archive per dataset. [`ProjectStorage`] saves and loads them together and
//! isolates failures per dataset; [`ProjectStorage::load_with_relocation`]
//! finds datasets of projects that were moved.

mod batch;
mod dataset;
mod error;


pub use batch::{ChooseLocation, ProjectStorage};
pub use dataset::{LoadedDataset, ProjectDataset, ProjectParameter, DEFAULT_STORAGE_FILE};
pub use error::ProjectError;
