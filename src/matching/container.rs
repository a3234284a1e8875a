use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::MatchError;
use super::evaluator::MatchResultRefer;
use super::result::MsScanMatchResult;
use super::source_type::SourceType;

/// Candidate annotations of one feature or spot.
///
/// Holds a flat result list that is never empty (the shared unknown result
/// stands in when nothing else is present), a view of MSP-based results keyed
/// by raw scan id, and a view of text-library results. Both views share their
/// entries with the flat list.
///
/// The representative result is computed lazily and cached; every mutating
/// method resets the cache. Not meant for concurrent mutation: one container
/// belongs to one feature, processed by one annotation worker at a time.
#[derive(Debug, Clone)]
pub struct MsScanMatchResultContainer {
    match_results: Vec<Arc<MsScanMatchResult>>,
    msp_results: BTreeMap<usize, Arc<MsScanMatchResult>>,
    text_db_results: Vec<Arc<MsScanMatchResult>>,
    representative: OnceLock<Arc<MsScanMatchResult>>,
}

impl Default for MsScanMatchResultContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl MsScanMatchResultContainer {
    /// Container holding only the unknown result
    pub fn new() -> Self {
        Self {
            match_results: vec![MsScanMatchResult::unknown_result()],
            msp_results: BTreeMap::new(),
            text_db_results: Vec::new(),
            representative: OnceLock::new(),
        }
    }

    /// All candidate results, never empty
    pub fn match_results(&self) -> &[Arc<MsScanMatchResult>] {
        &self.match_results
    }

    /// MSP-based results keyed by raw scan id
    pub fn msp_results(&self) -> &BTreeMap<usize, Arc<MsScanMatchResult>> {
        &self.msp_results
    }

    /// Text-library results
    pub fn text_db_results(&self) -> &[Arc<MsScanMatchResult>] {
        &self.text_db_results
    }

    /// The representative result: the maximum of `(source, total_score)`.
    ///
    /// Sources compare first (see [`SourceType`]'s ordering: manual curation
    /// outranks every automatic source), so a higher-ranked source wins
    /// whatever its score. Among equal sources the
    /// higher total score wins; the first of several equal maxima is kept.
    pub fn representative(&self) -> &Arc<MsScanMatchResult> {
        self.representative.get_or_init(|| {
            select_representative(&self.match_results)
                .unwrap_or_else(MsScanMatchResult::unknown_result)
        })
    }

    /// Whether the cached representative is currently set
    pub fn is_representative_cached(&self) -> bool {
        self.representative.get().is_some()
    }

    /// Add one candidate
    pub fn add_result(&mut self, result: impl Into<Arc<MsScanMatchResult>>) {
        self.match_results.push(result.into());
        self.invalidate();
    }

    /// Add several candidates
    pub fn add_results<I>(&mut self, results: I)
    where
        I: IntoIterator,
        I::Item: Into<Arc<MsScanMatchResult>>,
    {
        self.match_results
            .extend(results.into_iter().map(Into::into));
        self.invalidate();
    }

    /// Remove every result, then re-insert the unknown result.
    ///
    /// The MSP and text-library views are emptied too, since their entries
    /// are no longer part of the flat list.
    pub fn clear_results(&mut self) {
        self.match_results.clear();
        self.msp_results.clear();
        self.text_db_results.clear();
        self.match_results.push(MsScanMatchResult::unknown_result());
        self.invalidate();
    }

    /// Remove every result carrying the manual flag
    pub fn remove_manually_results(&mut self) {
        self.match_results.retain(|r| !r.is_manually_modified());
        self.msp_results.retain(|_, r| !r.is_manually_modified());
        self.text_db_results.retain(|r| !r.is_manually_modified());
        self.ensure_not_empty();
        self.invalidate();
    }

    /// Add an MSP-based result for raw scan `scan_id`
    pub fn add_msp_result(
        &mut self,
        scan_id: usize,
        result: impl Into<Arc<MsScanMatchResult>>,
    ) -> Result<(), MatchError> {
        if self.msp_results.contains_key(&scan_id) {
            return Err(MatchError::DuplicateMspKey(scan_id));
        }
        let result = result.into();
        self.match_results.push(Arc::clone(&result));
        self.msp_results.insert(scan_id, result);
        self.invalidate();
        Ok(())
    }

    /// Add MSP-based results keyed by raw scan id.
    ///
    /// Nothing is added if any key is already present or repeated.
    pub fn add_msp_results<I, R>(&mut self, results: I) -> Result<(), MatchError>
    where
        I: IntoIterator<Item = (usize, R)>,
        R: Into<Arc<MsScanMatchResult>>,
    {
        let mut incoming = BTreeMap::new();
        for (scan_id, result) in results {
            if self.msp_results.contains_key(&scan_id)
                || incoming.insert(scan_id, result.into()).is_some()
            {
                return Err(MatchError::DuplicateMspKey(scan_id));
            }
        }
        self.match_results.extend(incoming.values().cloned());
        self.msp_results.extend(incoming);
        self.invalidate();
        Ok(())
    }

    /// Remove the MSP-based results from the flat list (by identity), then
    /// empty the MSP view
    pub fn clear_msp_results(&mut self) {
        let msp = std::mem::take(&mut self.msp_results);
        self.match_results
            .retain(|r| !msp.values().any(|m| Arc::ptr_eq(r, m)));
        self.ensure_not_empty();
        self.invalidate();
    }

    /// Add one text-library result
    pub fn add_text_db_result(&mut self, result: impl Into<Arc<MsScanMatchResult>>) {
        let result = result.into();
        self.match_results.push(Arc::clone(&result));
        self.text_db_results.push(result);
        self.invalidate();
    }

    /// Add several text-library results
    pub fn add_text_db_results<I>(&mut self, results: I)
    where
        I: IntoIterator,
        I::Item: Into<Arc<MsScanMatchResult>>,
    {
        for result in results {
            let result = result.into();
            self.match_results.push(Arc::clone(&result));
            self.text_db_results.push(result);
        }
        self.invalidate();
    }

    /// Remove the text-library results from the flat list (by identity), then
    /// empty the text-library view
    pub fn clear_text_db_results(&mut self) {
        let text_db = std::mem::take(&mut self.text_db_results);
        self.match_results
            .retain(|r| !text_db.iter().any(|t| Arc::ptr_eq(r, t)));
        self.ensure_not_empty();
        self.invalidate();
    }

    /// Append every result and view entry of `other`.
    ///
    /// Results are not deduplicated. A raw scan id present in both MSP views
    /// is a caller error and leaves `self` unchanged.
    pub fn merge_containers(&mut self, other: &MsScanMatchResultContainer) -> Result<(), MatchError> {
        if let Some(&scan_id) = other
            .msp_results
            .keys()
            .find(|k| self.msp_results.contains_key(k))
        {
            return Err(MatchError::DuplicateMspKey(scan_id));
        }
        self.match_results
            .extend(other.match_results.iter().cloned());
        self.msp_results.extend(
            other
                .msp_results
                .iter()
                .map(|(&k, v)| (k, Arc::clone(v))),
        );
        self.text_db_results
            .extend(other.text_db_results.iter().cloned());
        self.invalidate();
        Ok(())
    }

    /// Best MSP-based result by total score
    pub fn top_msp_result(&self) -> Option<&Arc<MsScanMatchResult>> {
        best_by_score(self.msp_results.values())
    }

    /// Best text-library result by total score
    pub fn top_text_db_result(&self) -> Option<&Arc<MsScanMatchResult>> {
        best_by_score(self.text_db_results.iter())
    }

    /// Library id of the best MSP-based result, -1 if none
    pub fn msp_id(&self) -> i64 {
        self.top_msp_result().map(|r| r.library_id).unwrap_or(-1)
    }

    /// Library id of the best text-library result, -1 if none
    pub fn text_db_id(&self) -> i64 {
        self.top_text_db_result().map(|r| r.library_id).unwrap_or(-1)
    }

    /// Whether the representative is a confident reference match.
    ///
    /// A manually curated representative always counts as matched; everything
    /// else is delegated to the evaluator of the annotator that produced the
    /// representative.
    pub fn is_reference_matched(&self, refer: &dyn MatchResultRefer) -> bool {
        let representative = self.representative();
        if representative.is_manually_modified() && !representative.is_unknown() {
            return true;
        }
        refer
            .evaluator(&representative.annotator_id)
            .map(|e| e.is_reference_matched(representative))
            .unwrap_or(false)
    }

    /// Whether the representative is only a suggested annotation.
    ///
    /// A manually curated representative is never a suggestion.
    pub fn is_annotation_suggested(&self, refer: &dyn MatchResultRefer) -> bool {
        let representative = self.representative();
        if representative.is_manually_modified() && !representative.is_unknown() {
            return false;
        }
        refer
            .evaluator(&representative.annotator_id)
            .map(|e| e.is_annotation_suggested(representative))
            .unwrap_or(false)
    }

    /// Whether the representative is unknown
    pub fn is_unknown(&self) -> bool {
        self.representative().is_unknown()
    }

    fn ensure_not_empty(&mut self) {
        if self.match_results.is_empty() {
            self.match_results.push(MsScanMatchResult::unknown_result());
        }
    }

    fn invalidate(&mut self) {
        self.representative = OnceLock::new();
    }
}

/// Ordering key of the representative rule; NaN scores rank lowest
fn representative_key(result: &MsScanMatchResult) -> (SourceType, f32) {
    let score = if result.total_score.is_nan() {
        f32::NEG_INFINITY
    } else {
        result.total_score
    };
    (result.source, score)
}

fn compare_keys(a: (SourceType, f32), b: (SourceType, f32)) -> Ordering {
    a.0.cmp(&b.0).then_with(|| a.1.total_cmp(&b.1))
}

fn select_representative(results: &[Arc<MsScanMatchResult>]) -> Option<Arc<MsScanMatchResult>> {
    let mut best: Option<&Arc<MsScanMatchResult>> = None;
    for result in results {
        match best {
            Some(b)
                if compare_keys(representative_key(result), representative_key(b))
                    != Ordering::Greater => {}
            _ => best = Some(result),
        }
    }
    best.cloned()
}

fn best_by_score<'a>(
    results: impl Iterator<Item = &'a Arc<MsScanMatchResult>>,
) -> Option<&'a Arc<MsScanMatchResult>> {
    let mut best: Option<&Arc<MsScanMatchResult>> = None;
    for result in results {
        match best {
            Some(b) if b.total_score >= result.total_score => {}
            _ => best = Some(result),
        }
    }
    best
}

// =============================================================================
// Serialization
// =============================================================================

/// On-disk shape: views refer to the flat list by position, which keeps the
/// shared identity of view entries across a round trip.
#[derive(Serialize, Deserialize)]
struct ContainerRecord {
    match_results: Vec<MsScanMatchResult>,
    #[serde(default)]
    msp_results: Vec<(usize, usize)>,
    #[serde(default)]
    text_db_results: Vec<usize>,
}

fn position_of(
    results: &[Arc<MsScanMatchResult>],
    entry: &Arc<MsScanMatchResult>,
) -> Option<usize> {
    results.iter().position(|r| Arc::ptr_eq(r, entry))
}

impl Serialize for MsScanMatchResultContainer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut msp_results = Vec::with_capacity(self.msp_results.len());
        for (&scan_id, entry) in &self.msp_results {
            let position = position_of(&self.match_results, entry)
                .ok_or_else(|| S::Error::custom("MSP view entry missing from result list"))?;
            msp_results.push((scan_id, position));
        }
        let mut text_db_results = Vec::with_capacity(self.text_db_results.len());
        for entry in &self.text_db_results {
            let position = position_of(&self.match_results, entry)
                .ok_or_else(|| S::Error::custom("text view entry missing from result list"))?;
            text_db_results.push(position);
        }
        ContainerRecord {
            match_results: self.match_results.iter().map(|r| (**r).clone()).collect(),
            msp_results,
            text_db_results,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MsScanMatchResultContainer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = ContainerRecord::deserialize(deserializer)?;
        let unknown = MsScanMatchResult::unknown_result();
        let match_results: Vec<Arc<MsScanMatchResult>> = record
            .match_results
            .into_iter()
            .map(|r| {
                if r == *unknown {
                    Arc::clone(&unknown)
                } else {
                    Arc::new(r)
                }
            })
            .collect();
        let lookup = |position: usize| {
            match_results
                .get(position)
                .cloned()
                .ok_or_else(|| D::Error::custom(format!("result position {position} out of range")))
        };
        let mut msp_results = BTreeMap::new();
        for (scan_id, position) in record.msp_results {
            if msp_results.insert(scan_id, lookup(position)?).is_some() {
                return Err(D::Error::custom(format!("duplicate MSP scan id {scan_id}")));
            }
        }
        let text_db_results = record
            .text_db_results
            .into_iter()
            .map(lookup)
            .collect::<Result<Vec<_>, _>>()?;
        let mut container = Self {
            match_results,
            msp_results,
            text_db_results,
            representative: OnceLock::new(),
        };
        container.ensure_not_empty();
        Ok(container)
    }
}
