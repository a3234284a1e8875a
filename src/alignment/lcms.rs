use std::collections::HashMap;

use log::debug;

use crate::matching::MatchResultRefer;

use super::parameter::AlignmentParameter;
use super::refiner::AlignmentRefiner;
use super::types::{AlignmentSpotProperty, AnalysisFileBean, FileTypeMap, PeakLink, PeakLinkType};

/// Mass difference between 13C and 12C
pub const C13_C12_DIFFERENCE: f64 = 1.003355;

/// Highest isotope number searched by the linker
pub const MAX_ISOTOPE_NUMBER: u32 = 8;

/// Refiner for liquid-chromatography alignments
pub struct LcmsAlignmentRefiner<'a> {
    parameter: AlignmentParameter,
    files: Vec<AnalysisFileBean>,
    file_types: FileTypeMap,
    refer: &'a dyn MatchResultRefer,
}

impl<'a> LcmsAlignmentRefiner<'a> {
    /// Create a refiner for the given files
    pub fn new(
        parameter: AlignmentParameter,
        files: Vec<AnalysisFileBean>,
        refer: &'a dyn MatchResultRefer,
    ) -> Self {
        let file_types = FileTypeMap::from_files(&files);
        Self {
            parameter,
            files,
            file_types,
            refer,
        }
    }

    fn within(&self, a: &AlignmentSpotProperty, b: &AlignmentSpotProperty, mass_offset: f64) -> bool {
        (b.mass_center - a.mass_center - mass_offset).abs() <= self.parameter.mass_tolerance
            && (b.time_center.value - a.time_center.value).abs() <= self.parameter.axis_tolerance
    }
}

impl AlignmentRefiner for LcmsAlignmentRefiner<'_> {
    fn parameter(&self) -> &AlignmentParameter {
        &self.parameter
    }

    fn files(&self) -> &[AnalysisFileBean] {
        &self.files
    }

    fn file_types(&self) -> &FileTypeMap {
        &self.file_types
    }

    fn refer(&self) -> &dyn MatchResultRefer {
        self.refer
    }

    /// Collapse spots within the mass and axis tolerances, keeping the one
    /// with the higher average height
    fn get_cleaned_spots(&self, mut spots: Vec<AlignmentSpotProperty>) -> Vec<AlignmentSpotProperty> {
        for spot in &mut spots {
            spot.update_statistics();
        }
        // Stable: equal heights keep their incoming order
        spots.sort_by(|a, b| b.height_average.total_cmp(&a.height_average));

        let mut kept: Vec<AlignmentSpotProperty> = Vec::with_capacity(spots.len());
        for spot in spots {
            if kept.iter().any(|k| self.within(k, &spot, 0.0)) {
                debug!(
                    "Dropping spot {} at m/z {:.5} as redundant",
                    spot.alignment_id, spot.mass_center
                );
                continue;
            }
            kept.push(spot);
        }
        kept
    }

    /// Mark 13C isotope partners of every monoisotopic spot
    fn set_links(&self, mut spots: Vec<AlignmentSpotProperty>) -> Vec<AlignmentSpotProperty> {
        spots.sort_by(|a, b| a.mass_center.total_cmp(&b.mass_center));
        let max_offset = C13_C12_DIFFERENCE * f64::from(MAX_ISOTOPE_NUMBER) + self.parameter.mass_tolerance;

        for parent in 0..spots.len() {
            if spots[parent].isotope_weight_number > 0 {
                continue;
            }
            for child in parent + 1..spots.len() {
                let offset = spots[child].mass_center - spots[parent].mass_center;
                if offset > max_offset {
                    break;
                }
                if spots[child].isotope_weight_number > 0 {
                    continue;
                }
                let Some(n) = (1..=MAX_ISOTOPE_NUMBER).find(|&n| {
                    self.within(&spots[parent], &spots[child], C13_C12_DIFFERENCE * f64::from(n))
                }) else {
                    continue;
                };

                let parent_id = spots[parent].alignment_id;
                let child_id = spots[child].alignment_id;
                spots[child].isotope_weight_number = n;
                spots[child].isotope_parent_id = Some(parent_id);
                spots[child].add_link(PeakLink {
                    linked_id: parent_id,
                    link_type: PeakLinkType::Isotope,
                });
                spots[parent].add_link(PeakLink {
                    linked_id: child_id,
                    link_type: PeakLinkType::Isotope,
                });
            }
        }
        spots
    }

    /// Recompute statistics and renumber spots by mass, keeping links valid
    fn post_process(&self, mut spots: Vec<AlignmentSpotProperty>) -> Vec<AlignmentSpotProperty> {
        spots.sort_by(|a, b| {
            a.mass_center
                .total_cmp(&b.mass_center)
                .then_with(|| a.time_center.value.total_cmp(&b.time_center.value))
        });
        let renumber: HashMap<usize, usize> = spots
            .iter()
            .enumerate()
            .map(|(new_id, spot)| (spot.alignment_id, new_id))
            .collect();

        for (new_id, spot) in spots.iter_mut().enumerate() {
            spot.update_statistics();
            spot.alignment_id = new_id;
            spot.master_alignment_id = new_id;
            spot.isotope_parent_id = spot
                .isotope_parent_id
                .and_then(|id| renumber.get(&id).copied());
            spot.peak_links = spot
                .peak_links
                .iter()
                .filter_map(|link| {
                    renumber.get(&link.linked_id).map(|&linked_id| PeakLink {
                        linked_id,
                        link_type: link.link_type,
                    })
                })
                .collect();
        }
        spots
    }
}
