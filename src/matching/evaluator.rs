use super::result::MsScanMatchResult;

/// Judges the annotation level of results produced by one annotator
pub trait MatchResultEvaluator {
    /// Whether the result is a confident reference match
    fn is_reference_matched(&self, result: &MsScanMatchResult) -> bool;

    /// Whether the result is only a suggestion (e.g. precursor-only match)
    fn is_annotation_suggested(&self, result: &MsScanMatchResult) -> bool;

    /// Whether the result is either matched or suggested
    fn is_annotated_successfully(&self, result: &MsScanMatchResult) -> bool {
        self.is_reference_matched(result) || self.is_annotation_suggested(result)
    }
}

/// Resolves the evaluator responsible for an annotator id
pub trait MatchResultRefer {
    /// Evaluator registered for `annotator_id`
    fn evaluator(&self, annotator_id: &str) -> Option<&dyn MatchResultEvaluator>;
}
