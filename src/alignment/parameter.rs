use serde::{Deserialize, Serialize};

/// Spot names carrying this marker were annotated without MS2 evidence
pub const OFF_TARGET_MARKER: &str = "w/o MS2:";

/// Sample-side metric compared against the blank threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BlankFiltering {
    /// Highest sample height
    #[default]
    SampleMaxOverBlankAverage,
    /// Average sample height
    SampleAverageOverBlankAverage,
}

/// Configuration of alignment refinement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentParameter {
    /// Keep only the best spot per MSP library entry
    pub only_report_top_hit_in_msp_search: bool,
    /// Keep only the best spot per text library entry
    pub only_report_top_hit_in_text_db_search: bool,
    /// Enable blank filtering
    pub is_remove_feature_based_on_blank_peak_height_fold_change: bool,
    /// Sample metric used by blank filtering
    pub blank_filtering: BlankFiltering,
    /// Required fold change of the sample metric over the blank average
    pub fold_change_for_blank_filtering: f64,
    /// Rescue reference-matched spots from blank filtering
    pub is_keep_ref_matched_metabolite_features: bool,
    /// Rescue suggested off-target spots from blank filtering
    pub is_keep_suggested_metabolite_features: bool,
    /// Flag blank-filtered spots instead of dropping them
    pub is_keep_removable_features_and_assigned_tag_for_checking: bool,
    /// m/z tolerance for cleaning and isotope linking
    pub mass_tolerance: f64,
    /// Axis tolerance for cleaning and isotope linking
    pub axis_tolerance: f64,
}

impl Default for AlignmentParameter {
    fn default() -> Self {
        Self {
            only_report_top_hit_in_msp_search: true,
            only_report_top_hit_in_text_db_search: true,
            is_remove_feature_based_on_blank_peak_height_fold_change: false,
            blank_filtering: BlankFiltering::default(),
            fold_change_for_blank_filtering: 5.0,
            is_keep_ref_matched_metabolite_features: true,
            is_keep_suggested_metabolite_features: false,
            is_keep_removable_features_and_assigned_tag_for_checking: false,
            mass_tolerance: 0.015,
            axis_tolerance: 0.05,
        }
    }
}
