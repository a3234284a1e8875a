use std::fs;
use std::path::{Path, PathBuf};

use crossbeam_channel::{unbounded, Sender};
use log::{info, warn};
use rayon::prelude::*;

use crate::storage::DataBaseStorage;

use super::dataset::{LoadedDataset, ProjectDataset, ProjectParameter};
use super::error::ProjectError;

/// Callback choosing a new project folder for a dataset that could not be
/// found; `None` gives up
pub type ChooseLocation<'a> = &'a dyn Fn(&ProjectDataset) -> Option<PathBuf>;

type Fault = (usize, String, ProjectError);

/// The storages of every dataset in a project.
///
/// Datasets are saved and loaded in parallel, one task each. A failing
/// dataset never stops the others: its error goes to the fault callback and
/// the dataset is left out of the result.
#[derive(Debug, Default)]
pub struct ProjectStorage {
    parameter: ProjectParameter,
    datasets: Vec<LoadedDataset>,
}

impl ProjectStorage {
    /// Empty project
    pub fn new(parameter: ProjectParameter) -> Self {
        Self {
            parameter,
            datasets: Vec::new(),
        }
    }

    /// Project settings
    pub fn parameter(&self) -> &ProjectParameter {
        &self.parameter
    }

    /// Loaded datasets, in load order
    pub fn datasets(&self) -> &[LoadedDataset] {
        &self.datasets
    }

    /// Add a dataset
    pub fn push(&mut self, dataset: ProjectDataset, storage: DataBaseStorage) {
        self.datasets.push(LoadedDataset { dataset, storage });
    }

    fn thread_pool(&self) -> Result<rayon::ThreadPool, ProjectError> {
        Ok(rayon::ThreadPoolBuilder::new()
            .num_threads(self.parameter.num_threads)
            .build()?)
    }

    /// Save every dataset; returns how many were written.
    ///
    /// `on_fault` runs on the calling thread once all tasks finished, in
    /// dataset order.
    pub fn save_all(
        &self,
        mut on_fault: impl FnMut(&str, &ProjectError),
    ) -> Result<usize, ProjectError> {
        let (sender, receiver) = unbounded::<Fault>();
        let saved = self.thread_pool()?.install(|| {
            self.datasets
                .par_iter()
                .enumerate()
                .filter(|(i, loaded)| match save_one(loaded) {
                    Ok(()) => true,
                    Err(e) => {
                        report(&sender, *i, &loaded.dataset, e);
                        false
                    }
                })
                .count()
        });
        drop(sender);
        drain_faults(receiver.try_iter().collect(), &mut on_fault);
        info!("Saved {}/{} dataset storages", saved, self.datasets.len());
        Ok(saved)
    }

    /// Load every dataset that can be loaded
    pub fn load_all(
        parameter: ProjectParameter,
        datasets: Vec<ProjectDataset>,
        mut on_fault: impl FnMut(&str, &ProjectError),
    ) -> Result<Self, ProjectError> {
        let mut project = Self::new(parameter);
        let requested = datasets.len();
        let (sender, receiver) = unbounded::<Fault>();
        let loaded: Vec<Option<LoadedDataset>> = project.thread_pool()?.install(|| {
            datasets
                .into_par_iter()
                .enumerate()
                .map(|(i, dataset)| match load_one(&dataset) {
                    Ok(storage) => Some(LoadedDataset { dataset, storage }),
                    Err(e) => {
                        report(&sender, i, &dataset, e);
                        None
                    }
                })
                .collect()
        });
        drop(sender);
        drain_faults(receiver.try_iter().collect(), &mut on_fault);

        project.datasets = loaded.into_iter().flatten().collect();
        info!("Loaded {}/{} dataset storages", project.datasets.len(), requested);
        Ok(project)
    }

    /// Load one dataset whose project may have moved.
    ///
    /// Tries the recorded project folder, then `new_project_folder`, then the
    /// folder returned by `choose_new_location`. Every failed attempt is
    /// reported to `on_fault` before the next one; when all fail the error of
    /// the first attempt is returned.
    pub fn load_with_relocation(
        dataset: &ProjectDataset,
        new_project_folder: &Path,
        choose_new_location: Option<ChooseLocation<'_>>,
        mut on_fault: impl FnMut(&str, &ProjectError),
    ) -> Result<LoadedDataset, ProjectError> {
        let original = match load_one(dataset) {
            Ok(storage) => {
                return Ok(LoadedDataset {
                    dataset: dataset.clone(),
                    storage,
                })
            }
            Err(e) => e,
        };
        warn!(
            "Dataset '{}' not loadable from its recorded folder: {}",
            dataset.name, original
        );
        on_fault(&dataset.name, &original);

        let relocated = dataset.relocated(new_project_folder);
        match load_one(&relocated) {
            Ok(storage) => {
                return Ok(LoadedDataset {
                    dataset: relocated,
                    storage,
                })
            }
            Err(e) => {
                warn!(
                    "Dataset '{}' not loadable from {}: {}",
                    dataset.name,
                    new_project_folder.display(),
                    e
                );
                on_fault(&dataset.name, &e);
            }
        }

        if let Some(folder) = choose_new_location.and_then(|choose| choose(dataset)) {
            let chosen = dataset.relocated(&folder);
            match load_one(&chosen) {
                Ok(storage) => {
                    return Ok(LoadedDataset {
                        dataset: chosen,
                        storage,
                    })
                }
                Err(e) => {
                    warn!(
                        "Dataset '{}' not loadable from {}: {}",
                        dataset.name,
                        folder.display(),
                        e
                    );
                    on_fault(&dataset.name, &e);
                }
            }
        }
        Err(original)
    }
}

fn save_one(loaded: &LoadedDataset) -> Result<(), ProjectError> {
    let path = loaded.dataset.storage_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    loaded.storage.save(&path)?;
    Ok(())
}

fn load_one(dataset: &ProjectDataset) -> Result<DataBaseStorage, ProjectError> {
    let path = dataset.storage_path();
    if !path.is_file() {
        return Err(ProjectError::NotFound(path));
    }
    Ok(DataBaseStorage::load(&path)?)
}

fn report(sender: &Sender<Fault>, index: usize, dataset: &ProjectDataset, error: ProjectError) {
    warn!("Dataset '{}' failed: {}", dataset.name, error);
    // The receiver outlives every task
    let _ = sender.send((index, dataset.name.clone(), error));
}

fn drain_faults(mut faults: Vec<Fault>, on_fault: &mut impl FnMut(&str, &ProjectError)) {
    faults.sort_by_key(|(index, _, _)| *index);
    for (_, name, error) in &faults {
        on_fault(name, error);
    }
}
