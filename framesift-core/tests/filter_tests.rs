mod common;

use std::collections::BTreeSet;

use common::*;
use framesift_core::*;

fn analysed_request() -> FilterRequest {
    let opener = MockOpener::new(synthetic_clip(60));
    let result = analyze_with(
        &opener,
        b"synthetic",
        &params(&[("method", "histogram"), ("motion_threshold", "3")]),
    )
    .unwrap();
    FilterRequest::from_result(&result, FilterMode::Motion)
}

fn with_mode(request: &FilterRequest, mode: &str) -> FilterRequest {
    FilterRequest {
        filter_mode: Some(mode.to_string()),
        ..request.clone()
    }
}

fn motion_set(request: &FilterRequest) -> BTreeSet<u64> {
    request
        .motion_data
        .iter()
        .filter(|(_, r)| r.has_motion)
        .map(|(i, _)| *i)
        .collect()
}

/// The request restricted to the frames of a previous selection.
fn restricted(request: &FilterRequest, selected: &[u64]) -> FilterRequest {
    let keep: BTreeSet<u64> = selected.iter().copied().collect();
    FilterRequest {
        motion_data: request
            .motion_data
            .iter()
            .filter(|(i, _)| keep.contains(i))
            .map(|(i, r)| (*i, r.clone()))
            .collect(),
        scene_changes: request
            .scene_changes
            .iter()
            .copied()
            .filter(|i| keep.contains(i))
            .collect(),
        filter_mode: request.filter_mode.clone(),
    }
}

#[test]
fn test_scenes_mode_returns_scene_changes_verbatim() {
    let request = analysed_request();
    let result = filter(&with_mode(&request, "scenes")).unwrap();
    assert_eq!(result.selected_frames, request.scene_changes);
    assert_eq!(result.count, request.scene_changes.len());
    assert_eq!(result.filter_mode, FilterMode::Scenes);
}

#[test]
fn test_motion_mode_returns_motion_frames() {
    let request = analysed_request();
    let result = filter(&with_mode(&request, "motion")).unwrap();
    let expected: Vec<u64> = motion_set(&request).into_iter().collect();
    assert_eq!(result.selected_frames, expected);
    assert_eq!(result.selected_frames[0], 0);
}

#[test]
fn test_both_mode_is_bounded_union() {
    let request = analysed_request();
    let result = filter(&with_mode(&request, "both")).unwrap();

    let scenes: BTreeSet<u64> = request.scene_changes.iter().copied().collect();
    let motion = motion_set(&request);
    let union: Vec<u64> = scenes.union(&motion).copied().collect();

    assert_eq!(result.selected_frames, union);
    assert!(result.count >= scenes.len().max(motion.len()));
    assert!(result.count <= scenes.len() + motion.len());
    assert!(result.selected_frames.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_filtering_is_idempotent() {
    let request = analysed_request();
    for mode in ["motion", "scenes", "both"] {
        let request = with_mode(&request, mode);
        let first = filter(&request).unwrap();
        let second = filter(&restricted(&request, &first.selected_frames)).unwrap();
        assert_eq!(first, second, "mode {mode}");
    }
}

#[test]
fn test_unknown_mode_is_rejected() {
    let request = analysed_request();
    let err = filter(&with_mode(&request, "bogus")).unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("bogus"));
}

#[test]
fn test_missing_mode_defaults_to_motion() {
    let request = FilterRequest {
        filter_mode: None,
        ..analysed_request()
    };
    assert_eq!(filter(&request).unwrap().filter_mode, FilterMode::Motion);
}

#[test]
fn test_filter_accepts_analysis_json() {
    let opener = MockOpener::new(synthetic_clip(25));
    let result = analyze_with(&opener, b"synthetic", &AnalysisParams::default()).unwrap();
    let mut body: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    body["filter_mode"] = serde_json::json!("both");

    let request = FilterRequest::from_json(&body.to_string()).unwrap();
    let selection = filter(&request).unwrap();

    let direct = analysis::filter_frames(&result.motion_data, &result.scene_changes, FilterMode::Both);
    assert_eq!(selection, direct);
}

#[test]
fn test_select_combines_analysis_and_filter() {
    let opener = MockOpener::new(synthetic_clip(30));
    let selection = select_with(&opener, b"synthetic", &AnalysisParams::default(), "scenes").unwrap();

    assert_eq!(selection.filter.selected_frames, selection.analysis.scene_changes);
    let value = serde_json::to_value(selection.response()).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["selection"]["filter_mode"], "scenes");
    assert_eq!(value["analysis"]["method"], "adaptive");
}
