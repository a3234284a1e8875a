use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[cfg(feature = "colorized_output")]
use console::style;

use msalign::matching::SourceType;
use msalign::reference::{read_msp_file, read_text_db_file};
use msalign::storage::{
    AnnotatorDescriptor, AnnotatorKind, AnnotatorParameterPair, DataBaseItem, DataBaseStorage,
    DataBaseSummary, MoleculeDataBase, MsRefSearchParameter,
};

/// Print the databases and annotators of an archive
pub fn info(archive: PathBuf) -> Result<()> {
    if !archive.exists() {
        anyhow::bail!("File does not exist: {}", archive.display());
    }
    let file = File::open(&archive).context("Failed to open archive")?;
    let summaries = DataBaseStorage::read_summaries(BufReader::new(file))
        .context("Failed to read storage manifest")?;

    println!("{}", title("Database Storage"));
    println!("================");
    println!("File: {}", archive.display());
    println!("Databases: {}", summaries.len());
    println!();
    for summary in &summaries {
        print_summary(summary);
    }
    Ok(())
}

#[cfg(feature = "colorized_output")]
fn title(text: &str) -> String {
    style(text).bold().cyan().to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn title(text: &str) -> String {
    text.to_string()
}

fn print_summary(summary: &DataBaseSummary) {
    println!(
        "{} ({}, {} references)",
        title(&summary.id),
        summary.kind,
        summary.references
    );
    if summary.annotators.is_empty() {
        println!("  no annotators");
    }
    for annotator in &summary.annotators {
        println!(
            "  {:<24} {:?} priority={} source={}",
            annotator.id, annotator.kind, annotator.priority, annotator.source_type
        );
    }
    println!();
}

/// Build an archive with one database and one default annotator per library file
pub fn create(output: PathBuf, msp: Vec<PathBuf>, text_db: Vec<PathBuf>) -> Result<()> {
    if msp.is_empty() && text_db.is_empty() {
        anyhow::bail!("No library files given (use --msp or --text-db)");
    }

    let mut storage = DataBaseStorage::new();
    let mut used = HashSet::new();
    let mut priority = 0;

    for path in &msp {
        let references = read_msp_file(path)
            .with_context(|| format!("Failed to read MSP library: {}", path.display()))?;
        let id = unique_id(path, &mut used);
        priority += 1;
        storage.metabolomics_databases.push(library_item(
            &id,
            SourceType::MSP_DB,
            AnnotatorKind::MspSearch,
            priority,
            references,
        ));
    }
    for path in &text_db {
        let references = read_text_db_file(path)
            .with_context(|| format!("Failed to read text library: {}", path.display()))?;
        let id = unique_id(path, &mut used);
        priority += 1;
        storage.metabolomics_databases.push(library_item(
            &id,
            SourceType::TEXT_DB,
            AnnotatorKind::TextDbSearch,
            priority,
            references,
        ));
    }

    storage
        .save(&output)
        .with_context(|| format!("Failed to save storage: {}", output.display()))?;
    println!(
        "Stored {} databases ({}) -> {}",
        storage.len(),
        storage.ids().join(", "),
        output.display()
    );
    Ok(())
}

fn library_item(
    id: &str,
    source_type: SourceType,
    kind: AnnotatorKind,
    priority: i32,
    references: Vec<msalign::reference::MoleculeMsReference>,
) -> DataBaseItem<MoleculeDataBase> {
    let annotator = AnnotatorDescriptor::new(format!("{id}_annotator"), kind, priority);
    DataBaseItem::new(
        MoleculeDataBase::new(id, source_type, references),
        vec![AnnotatorParameterPair::new(
            annotator,
            MsRefSearchParameter::default(),
        )],
    )
}

/// File stem, suffixed until it is unused
fn unique_id(path: &Path, used: &mut HashSet<String>) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().replace(['/', '\\'], "_"))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "library".to_string());
    let mut id = stem.clone();
    let mut n = 1;
    while !used.insert(id.clone()) {
        n += 1;
        id = format!("{stem}_{n}");
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_id() {
        let mut used = HashSet::new();
        assert_eq!(unique_id(Path::new("/a/lib.msp"), &mut used), "lib");
        assert_eq!(unique_id(Path::new("/b/lib.msp"), &mut used), "lib_2");
        assert_eq!(unique_id(Path::new("/c/lib.txt"), &mut used), "lib_3");
    }

    #[test]
    fn test_create_and_info() {
        let dir = tempfile::tempdir().unwrap();
        let msp = dir.path().join("lib.msp");
        std::fs::write(
            &msp,
            "NAME: Alanine\nPRECURSORMZ: 90.055\nNum Peaks: 1\n44.05 100\n\n",
        )
        .unwrap();
        let output = dir.path().join("db.zip");

        create(output.clone(), vec![msp], Vec::new()).unwrap();
        let storage = DataBaseStorage::load(&output).unwrap();
        assert_eq!(storage.ids(), vec!["lib"]);
        assert_eq!(
            storage.metabolomics_databases[0].annotator_ids(),
            vec!["lib_annotator"]
        );
        info(output).unwrap();
    }

    #[test]
    fn test_create_requires_libraries() {
        let dir = tempfile::tempdir().unwrap();
        assert!(create(dir.path().join("db.zip"), Vec::new(), Vec::new()).is_err());
    }
}
