use anyhow::Result;
use std::path::PathBuf;

use msalign::project::ProjectStorage;

use super::Config;

/// Load the storage of each dataset and report what each one holds
pub fn run(
    datasets: Vec<String>,
    project_folder: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let mut parameter = Config::load(config.as_deref())?.project;
    if let Some(folder) = project_folder {
        parameter.project_folder = folder;
    }
    let requested: Vec<_> = datasets.iter().map(|name| parameter.dataset(name)).collect();

    let mut failed = Vec::new();
    let project = ProjectStorage::load_all(parameter, requested, |name, error| {
        failed.push(format!("{name}: {error}"))
    })?;

    println!(
        "Project: {}",
        project.parameter().project_folder.display()
    );
    for loaded in project.datasets() {
        let storage = &loaded.storage;
        println!(
            "  {:<20} {} databases [{}]",
            loaded.dataset.name,
            storage.len(),
            storage.ids().join(", ")
        );
        for missing in storage.missing_items() {
            println!("    missing: {missing}");
        }
    }
    for fault in &failed {
        println!("  FAILED {fault}");
    }

    if project.datasets().is_empty() {
        anyhow::bail!("No dataset storage could be loaded");
    }
    Ok(())
}
