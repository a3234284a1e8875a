use std::collections::HashMap;
use std::sync::Arc;

use super::*;
use proptest::prelude::*;

fn result(library_id: i64, source: SourceType, score: f32) -> MsScanMatchResult {
    MsScanMatchResult::new(library_id, source, score)
}

/// Evaluator that matches on the precursor flag only
struct PrecursorEvaluator;

impl MatchResultEvaluator for PrecursorEvaluator {
    fn is_reference_matched(&self, result: &MsScanMatchResult) -> bool {
        result.is_precursor_mz_match && result.is_spectrum_match
    }

    fn is_annotation_suggested(&self, result: &MsScanMatchResult) -> bool {
        result.is_precursor_mz_match && !result.is_spectrum_match
    }
}

struct Refer(HashMap<String, PrecursorEvaluator>);

impl Refer {
    fn with(annotator_id: &str) -> Self {
        Self(HashMap::from([(annotator_id.to_string(), PrecursorEvaluator)]))
    }
}

impl MatchResultRefer for Refer {
    fn evaluator(&self, annotator_id: &str) -> Option<&dyn MatchResultEvaluator> {
        self.0
            .get(annotator_id)
            .map(|e| e as &dyn MatchResultEvaluator)
    }
}

// ==================== SourceType ====================

#[test]
fn test_source_type_values_are_fixed() {
    assert_eq!(SourceType::UNKNOWN.bits(), 0);
    assert_eq!(SourceType::MSP_DB.bits(), 1);
    assert_eq!(SourceType::TEXT_DB.bits(), 2);
    assert_eq!(SourceType::MANUAL.bits(), 4);
    assert_eq!(SourceType::FASTA_DB.bits(), 8);
    assert_eq!(SourceType::GENERATED_LIPID.bits(), 16);
}

#[test]
fn test_manual_source_outranks_every_library_source() {
    for automatic in [
        SourceType::MSP_DB,
        SourceType::TEXT_DB,
        SourceType::FASTA_DB,
        SourceType::GENERATED_LIPID,
        SourceType::MSP_DB | SourceType::TEXT_DB | SourceType::FASTA_DB | SourceType::GENERATED_LIPID,
    ] {
        assert!(SourceType::MANUAL > automatic, "{automatic}");
    }
    assert!(SourceType::GENERATED_LIPID > SourceType::FASTA_DB);
    assert!(SourceType::FASTA_DB > SourceType::TEXT_DB);
    assert!(SourceType::MANUAL | SourceType::MSP_DB > SourceType::MANUAL);
}

#[test]
fn test_manual_result_beats_higher_scoring_library_hits() {
    let mut container = MsScanMatchResultContainer::new();
    container.add_result(result(1, SourceType::MANUAL, 0.1));
    container.add_result(result(2, SourceType::GENERATED_LIPID, 0.9));
    container.add_result(result(3, SourceType::FASTA_DB, 0.9));

    let representative = container.representative();
    assert_eq!(representative.source, SourceType::MANUAL);
    assert_eq!(representative.library_id, 1);
}

#[test]
fn test_source_type_flags_combine() {
    let combined = SourceType::MSP_DB | SourceType::MANUAL;
    assert!(combined.contains(SourceType::MANUAL));
    assert!(combined.contains(SourceType::MSP_DB));
    assert!(!combined.contains(SourceType::TEXT_DB));
    assert!(combined > SourceType::MANUAL);
    assert_eq!(combined.to_string(), "MspDB | Manual");
    assert_eq!(SourceType::UNKNOWN.to_string(), "Unknown");
    assert_eq!(serde_json::to_string(&combined).unwrap(), "5");
}

// ==================== Representative ====================

#[test]
fn test_new_container_holds_unknown() {
    let container = MsScanMatchResultContainer::new();
    assert_eq!(container.match_results().len(), 1);
    assert!(Arc::ptr_eq(
        container.representative(),
        &MsScanMatchResult::unknown_result()
    ));
}

#[test]
fn test_larger_source_wins_over_score() {
    let mut container = MsScanMatchResultContainer::new();
    container.add_result(result(1, SourceType::MSP_DB, 100.0));
    container.add_result(result(2, SourceType::TEXT_DB, 0.5));
    assert_eq!(container.representative().library_id, 2);

    container.add_result(result(3, SourceType::MANUAL, 0.0));
    assert_eq!(container.representative().library_id, 3);
}

#[test]
fn test_equal_source_higher_score_wins() {
    let mut container = MsScanMatchResultContainer::new();
    container.add_results([
        result(1, SourceType::MSP_DB, 0.4),
        result(2, SourceType::MSP_DB, 0.8),
        result(3, SourceType::MSP_DB, 0.6),
    ]);
    assert_eq!(container.representative().library_id, 2);
}

#[test]
fn test_full_tie_keeps_first() {
    let mut container = MsScanMatchResultContainer::new();
    container.add_result(result(1, SourceType::TEXT_DB, 0.5));
    container.add_result(result(2, SourceType::TEXT_DB, 0.5));
    assert_eq!(container.representative().library_id, 1);
}

#[test]
fn test_mutation_invalidates_cache() {
    let mut container = MsScanMatchResultContainer::new();
    container.add_result(result(1, SourceType::MSP_DB, 0.5));
    assert_eq!(container.representative().library_id, 1);
    assert!(container.is_representative_cached());

    container.add_result(result(2, SourceType::MSP_DB, 0.9));
    assert!(!container.is_representative_cached());
    assert_eq!(container.representative().library_id, 2);
}

#[test]
fn test_clear_results_reinserts_unknown() {
    let mut container = MsScanMatchResultContainer::new();
    container.add_msp_result(10, result(1, SourceType::MSP_DB, 0.5)).unwrap();
    container.add_text_db_result(result(2, SourceType::TEXT_DB, 0.5));
    let _ = container.representative();

    container.clear_results();
    assert_eq!(container.match_results().len(), 1);
    assert!(container.msp_results().is_empty());
    assert!(container.text_db_results().is_empty());
    assert!(container.is_unknown());
}

#[test]
fn test_remove_manually_results() {
    let mut container = MsScanMatchResultContainer::new();
    container.add_result(result(1, SourceType::MSP_DB | SourceType::MANUAL, 0.1));
    container.add_result(result(2, SourceType::MSP_DB, 0.5));
    assert_eq!(container.representative().library_id, 1);

    container.remove_manually_results();
    assert_eq!(container.representative().library_id, 2);
    assert!(container
        .match_results()
        .iter()
        .all(|r| !r.is_manually_modified()));
}

// ==================== Source views ====================

#[test]
fn test_msp_view_shares_flat_entries() {
    let mut container = MsScanMatchResultContainer::new();
    container
        .add_msp_results([
            (4, result(1, SourceType::MSP_DB, 0.3)),
            (9, result(2, SourceType::MSP_DB, 0.7)),
        ])
        .unwrap();
    assert_eq!(container.match_results().len(), 3);
    for entry in container.msp_results().values() {
        assert!(container
            .match_results()
            .iter()
            .any(|r| Arc::ptr_eq(r, entry)));
    }
    assert_eq!(container.msp_id(), 2);
    assert_eq!(container.text_db_id(), -1);
}

#[test]
fn test_duplicate_msp_key_is_rejected() {
    let mut container = MsScanMatchResultContainer::new();
    container.add_msp_result(4, result(1, SourceType::MSP_DB, 0.3)).unwrap();

    let err = container.add_msp_result(4, result(2, SourceType::MSP_DB, 0.3));
    assert!(matches!(err, Err(MatchError::DuplicateMspKey(4))));

    let err = container.add_msp_results([
        (5, result(3, SourceType::MSP_DB, 0.3)),
        (5, result(4, SourceType::MSP_DB, 0.3)),
    ]);
    assert!(matches!(err, Err(MatchError::DuplicateMspKey(5))));
    assert_eq!(container.msp_results().len(), 1);
    assert_eq!(container.match_results().len(), 2);
}

#[test]
fn test_clear_msp_results_removes_by_identity() {
    let mut container = MsScanMatchResultContainer::new();
    let twin = result(1, SourceType::MSP_DB, 0.3);
    container.add_result(twin.clone());
    container.add_msp_result(4, twin).unwrap();
    assert_eq!(container.match_results().len(), 3);

    container.clear_msp_results();
    // The equal but separately added value stays
    assert_eq!(container.match_results().len(), 2);
    assert!(container.msp_results().is_empty());
    assert_eq!(container.representative().library_id, 1);
}

#[test]
fn test_clear_text_db_results() {
    let mut container = MsScanMatchResultContainer::new();
    container.add_text_db_results([
        result(1, SourceType::TEXT_DB, 0.3),
        result(2, SourceType::TEXT_DB, 0.9),
    ]);
    assert_eq!(container.text_db_id(), 2);
    assert_eq!(container.representative().library_id, 2);

    container.clear_text_db_results();
    assert!(container.text_db_results().is_empty());
    assert!(container.is_unknown());
}

#[test]
fn test_merge_containers() {
    let mut a = MsScanMatchResultContainer::new();
    a.add_msp_result(1, result(1, SourceType::MSP_DB, 0.3)).unwrap();
    let mut b = MsScanMatchResultContainer::new();
    b.add_msp_result(2, result(2, SourceType::MSP_DB, 0.9)).unwrap();
    b.add_text_db_result(result(3, SourceType::TEXT_DB, 0.1));

    a.merge_containers(&b).unwrap();
    // No deduplication: both unknown placeholders are kept
    assert_eq!(a.match_results().len(), 5);
    assert_eq!(a.msp_results().len(), 2);
    assert_eq!(a.text_db_results().len(), 1);
    assert_eq!(a.representative().library_id, 3);

    assert!(matches!(
        a.merge_containers(&b),
        Err(MatchError::DuplicateMspKey(2))
    ));
}

// ==================== Evaluation ====================

#[test]
fn test_reference_matched_delegates_to_annotator() {
    let mut matched = result(1, SourceType::MSP_DB, 0.9);
    matched.annotator_id = "msp".into();
    matched.is_precursor_mz_match = true;
    matched.is_spectrum_match = true;

    let mut container = MsScanMatchResultContainer::new();
    container.add_msp_result(0, matched).unwrap();
    let refer = Refer::with("msp");
    assert!(container.is_reference_matched(&refer));
    assert!(!container.is_annotation_suggested(&refer));

    let unknown_annotator = Refer::with("other");
    assert!(!container.is_reference_matched(&unknown_annotator));
}

#[test]
fn test_suggested_annotation() {
    let mut suggested = result(1, SourceType::TEXT_DB, 0.9);
    suggested.annotator_id = "text".into();
    suggested.is_precursor_mz_match = true;

    let mut container = MsScanMatchResultContainer::new();
    container.add_text_db_result(suggested);
    let refer = Refer::with("text");
    assert!(!container.is_reference_matched(&refer));
    assert!(container.is_annotation_suggested(&refer));
}

#[test]
fn test_manual_representative_short_circuits() {
    let mut manual = result(1, SourceType::MANUAL, 0.0);
    manual.annotator_id = "nobody".into();
    manual.is_spectrum_match = true;

    let mut container = MsScanMatchResultContainer::new();
    container.add_result(manual);
    let refer = Refer::with("msp");
    assert!(container.is_reference_matched(&refer));
    assert!(!container.is_annotation_suggested(&refer));
}

// ==================== Serialization ====================

#[test]
fn test_serde_keeps_view_identity() {
    let mut container = MsScanMatchResultContainer::new();
    container.add_msp_result(12, result(1, SourceType::MSP_DB, 0.3)).unwrap();
    container.add_text_db_result(result(2, SourceType::TEXT_DB, 0.1));

    let json = serde_json::to_string(&container).unwrap();
    let mut restored: MsScanMatchResultContainer = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.match_results().len(), 3);
    assert!(Arc::ptr_eq(
        &restored.match_results()[0],
        &MsScanMatchResult::unknown_result()
    ));
    let msp = Arc::clone(&restored.msp_results()[&12]);
    assert!(restored.match_results().iter().any(|r| Arc::ptr_eq(r, &msp)));

    restored.clear_msp_results();
    assert_eq!(restored.match_results().len(), 2);
    assert_eq!(restored.representative().library_id, 2);
}

#[test]
fn test_deserialize_rejects_out_of_range_view() {
    let json = r#"{"match_results":[],"msp_results":[[1,4]],"text_db_results":[]}"#;
    assert!(serde_json::from_str::<MsScanMatchResultContainer>(json).is_err());
}

// ==================== Properties ====================

fn arb_source() -> impl Strategy<Value = SourceType> {
    (1u32..32).prop_map(SourceType::from_bits)
}

proptest! {
    /// A strictly larger source always wins; equal sources fall back to score
    #[test]
    fn test_representative_tie_break(
        a_source in arb_source(),
        b_source in arb_source(),
        a_score in -10.0f32..10.0,
        b_score in -10.0f32..10.0,
    ) {
        let mut container = MsScanMatchResultContainer::new();
        container.add_result(result(1, a_source, a_score));
        container.add_result(result(2, b_source, b_score));
        let representative = container.representative();
        if a_source > b_source {
            prop_assert_eq!(representative.source, a_source);
            prop_assert_eq!(representative.library_id, 1);
        } else if b_source > a_source {
            prop_assert_eq!(representative.library_id, 2);
        } else if a_score > b_score {
            prop_assert_eq!(representative.library_id, 1);
        } else if b_score > a_score {
            prop_assert_eq!(representative.library_id, 2);
        }
    }

    /// Clearing always leaves exactly the unknown placeholder
    #[test]
    fn test_clear_always_unknown(scores in prop::collection::vec((arb_source(), 0.0f32..1.0), 0..10)) {
        let mut container = MsScanMatchResultContainer::new();
        for (i, (source, score)) in scores.into_iter().enumerate() {
            container.add_result(result(i as i64, source, score));
        }
        let _ = container.representative();
        container.clear_results();
        prop_assert!(Arc::ptr_eq(container.representative(), &MsScanMatchResult::unknown_result()));
    }
}
