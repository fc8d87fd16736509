//! Frame selection over analysis output.
//!
//! A pure function of the motion data, the scene boundaries and the mode.
//! The selection is always ascending and free of duplicates.

use std::collections::BTreeSet;

use crate::config::FilterMode;
use crate::report::{FilterResult, MotionData};

/// Selects frame indices according to `mode`.
pub fn filter_frames(motion_data: &MotionData, scene_changes: &[u64], mode: FilterMode) -> FilterResult {
    let mut selected = BTreeSet::new();

    if matches!(mode, FilterMode::Scenes | FilterMode::Both) {
        selected.extend(scene_changes.iter().copied());
    }
    if matches!(mode, FilterMode::Motion | FilterMode::Both) {
        selected.extend(
            motion_data
                .iter()
                .filter(|(_, record)| record.has_motion)
                .map(|(index, _)| *index),
        );
    }

    let selected: Vec<u64> = selected.into_iter().collect();
    log::debug!("Filter '{}' selected {} frame(s)", mode, selected.len());
    FilterResult::new(selected, mode)
}
