use std::collections::HashSet;
use std::io::Cursor;
use std::sync::Arc;
use std::thread;

use super::*;
use crate::spectrum::IonMode;

const MSP: &str = "NAME: Caffeine
PRECURSORMZ: 195.0877
PRECURSORTYPE: [M+H]+
RETENTIONTIME: 3.25
FORMULA: C8H10N4O2
ONTOLOGY: Xanthines
INCHIKEY: RYYVLZVUVIJVGH-UHFFFAOYSA-N
SMILES: CN1C=NC2=C1C(=O)N(C(=O)N2C)C
CCS: 140.2
Num Peaks: 3
138.0662\t999
110.0713\t120 \"C5H6N2O+\"
195.0877\t300

Name: Taurine
PrecursorMZ: 124.0074
IonMode: Negative
Num Peaks: 2
79.9568 999; 106.9972 80
";

// ==================== MSP ====================

#[test]
fn test_read_msp_records() {
    let references = read_msp(Cursor::new(MSP)).unwrap();
    assert_eq!(references.len(), 2);

    let caffeine = &references[0];
    assert_eq!(caffeine.scan_id, 0);
    assert_eq!(caffeine.name, "Caffeine");
    assert_eq!(caffeine.precursor_mz, 195.0877);
    assert_eq!(caffeine.precursor_type, "[M+H]+");
    assert_eq!(caffeine.chrom_x.value, 3.25);
    assert_eq!(caffeine.ion_mode, IonMode::Positive);
    assert_eq!(caffeine.collision_cross_section, 140.2);
    assert_eq!(caffeine.ontology, "Xanthines");
    let masses: Vec<f64> = caffeine.spectrum.iter().map(|p| p.mass).collect();
    assert_eq!(masses, vec![110.0713, 138.0662, 195.0877]);
    assert_eq!(caffeine.spectrum[0].comment, "C5H6N2O+");

    let taurine = &references[1];
    assert_eq!(taurine.scan_id, 1);
    assert_eq!(taurine.ion_mode, IonMode::Negative);
    assert_eq!(taurine.precursor_type, "[M-H]-");
    assert_eq!(taurine.chrom_x.value, -1.0);
    assert_eq!(taurine.spectrum.len(), 2);
}

#[test]
fn test_read_msp_reports_bad_number() {
    let err = read_msp(Cursor::new("NAME: x\nPRECURSORMZ: abc\n")).unwrap_err();
    match err {
        ReferenceError::InvalidValue { line, field, .. } => {
            assert_eq!(line, 2);
            assert_eq!(field, "PRECURSORMZ");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_read_msp_empty_input() {
    assert!(read_msp(Cursor::new("\n\n")).unwrap().is_empty());
}

#[test]
fn test_read_msp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.msp");
    std::fs::write(&path, MSP).unwrap();
    assert_eq!(read_msp_file(&path).unwrap().len(), 2);
    assert!(read_msp_file(dir.path().join("missing.msp")).is_err());
}

// ==================== Text library ====================

#[test]
fn test_read_text_db() {
    let text = "Name\tm/z\tRT\tAdduct\tInChIKey\tFormula\tSMILES\tOntology\tCCS
Glucose\t203.0526\t1.2\t[M+Na]+\tWQZGKKKJIJFFOK-GASJEMHNSA-N\tC6H12O6\t\tHexoses\t
Lactate\t89.0244\t\t[M-H]-\t\t\t\t\t
";
    let references = read_text_db(Cursor::new(text)).unwrap();
    assert_eq!(references.len(), 2);
    assert_eq!(references[0].name, "Glucose");
    assert_eq!(references[0].precursor_type, "[M+Na]+");
    assert_eq!(references[0].chrom_x.value, 1.2);
    assert_eq!(references[0].ontology, "Hexoses");
    assert_eq!(references[1].scan_id, 1);
    assert_eq!(references[1].ion_mode, IonMode::Negative);
    assert_eq!(references[1].chrom_x.value, -1.0);
}

#[test]
fn test_read_text_db_minimal_columns() {
    let references = read_text_db(Cursor::new("Name\tm/z\nAlanine\t90.0550\n")).unwrap();
    assert_eq!(references[0].precursor_type, "[M+H]+");
    assert_eq!(references[0].ion_mode, IonMode::Positive);
}

#[test]
fn test_read_text_db_requires_mass() {
    assert!(read_text_db(Cursor::new("Name\tm/z\nAlanine\tnot-a-number\n")).is_err());
}

// ==================== Adducts and lipids ====================

#[test]
fn test_adduct_parse() {
    let adduct = AdductIon::parse(" [M+NH4]+ ").unwrap();
    assert_eq!(adduct.name, "[M+NH4]+");
    assert!((adduct.precursor_mz(100.0) - 118.033823).abs() < 1e-9);
    assert_eq!(AdductIon::parse("[M+HCOO]-").unwrap().ion_mode, IonMode::Negative);
    assert!(matches!(
        AdductIon::parse("[M+K]+"),
        Err(ReferenceError::UnsupportedAdduct(_))
    ));
    assert_eq!(AdductIon::default_for(IonMode::Negative).name, "[M-H]-");
}

#[test]
fn test_lipid_mass_and_notation() {
    let lipid: Lipid = "PC 34:1".parse().unwrap();
    assert_eq!(lipid, Lipid::new(LipidClass::PC, 34, 1));
    assert_eq!(lipid.to_string(), "PC 34:1");
    assert!((lipid.mass() - 759.5778).abs() < 1e-3);
    assert!((Lipid::new(LipidClass::TG, 54, 3).mass() - 884.7833).abs() < 1e-3);
    assert!("PC34:1".parse::<Lipid>().is_err());
    assert!("XY 34:1".parse::<Lipid>().is_err());
}

#[test]
fn test_generated_reference_spectrum() {
    let adduct = AdductIon::parse("[M+H]+").unwrap();
    let reference = generate_reference(&Lipid::new(LipidClass::PC, 34, 1), &adduct, 7);
    assert_eq!(reference.scan_id, 7);
    assert!((reference.precursor_mz - 760.5851).abs() < 1e-3);
    assert_eq!(reference.spectrum.len(), 2);
    assert!((reference.spectrum[0].mass - 184.07332).abs() < 1e-9);
}

#[test]
fn test_generate_reuses_existing_entries() {
    let database = GeneratedLipidDatabase::new("lipids");
    let adduct = AdductIon::parse("[M+H]+").unwrap();
    let first = database.generate(
        &[Lipid::new(LipidClass::PC, 34, 1), Lipid::new(LipidClass::PE, 36, 2)],
        &adduct,
    );
    let second = database.generate(&[Lipid::new(LipidClass::PE, 36, 2)], &adduct);
    assert_eq!(database.len(), 2);
    assert_eq!(second[0].scan_id, first[1].scan_id);

    let sodium = AdductIon::parse("[M+Na]+").unwrap();
    let third = database.generate(&[Lipid::new(LipidClass::PE, 36, 2)], &sodium);
    assert_eq!(third[0].scan_id, 2);
    assert_eq!(database.refer(2).unwrap().precursor_type, "[M+Na]+");
    assert!(database.refer(3).is_none());
}

#[test]
fn test_from_references_restores_index() {
    let database = GeneratedLipidDatabase::new("lipids");
    let adduct = AdductIon::parse("[M+NH4]+").unwrap();
    database.generate(&[Lipid::new(LipidClass::TG, 52, 2)], &adduct);

    let restored = GeneratedLipidDatabase::from_references("lipids", database.references());
    let again = restored.generate(&[Lipid::new(LipidClass::TG, 52, 2)], &adduct);
    assert_eq!(restored.len(), 1);
    assert_eq!(again[0].scan_id, 0);
}

#[test]
fn test_concurrent_generation_assigns_unique_ids() {
    let database = Arc::new(GeneratedLipidDatabase::new("lipids"));
    let workers: Vec<_> = (0..8u32)
        .map(|worker| {
            let database = Arc::clone(&database);
            thread::spawn(move || {
                let adduct = AdductIon::parse("[M+H]+").unwrap();
                // Overlapping windows of PC species across workers
                let lipids: Vec<Lipid> = (0..20)
                    .map(|i| Lipid::new(LipidClass::PC, 30 + (worker + i) % 12, i % 4))
                    .collect();
                database.generate(&lipids, &adduct)
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let references = database.references();
    let ids: HashSet<usize> = references.iter().map(|r| r.scan_id).collect();
    assert_eq!(ids.len(), references.len());
    assert_eq!(ids, (0..references.len()).collect());

    let names: HashSet<&str> = references.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names.len(), references.len());
    // 12 carbon counts x 4 double-bond counts cover every combination generated
    assert_eq!(references.len(), 48);
}
