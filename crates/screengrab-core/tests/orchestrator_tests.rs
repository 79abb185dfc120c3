//! Orchestrator behaviour over mock strategies
//!
//! Covers strategy selection order, geometry resolution, enumeration bypass
//! for region captures and the save/restore discipline of the ambient display
//! target. No display server is needed.

use std::sync::Arc;

use screengrab_core::capture::{
    CaptureStrategy, Capturer, MockStrategy, StrategyRegistry, StrategyStatus,
};
use screengrab_core::error::{CaptureError, ErrorCategory};
use screengrab_core::model::{CaptureRequest, CompressionLevel, DisplayInfo, Rect};
use screengrab_test_utils::fixtures::{
    decode_png, diagonal_layout, negative_origin_layout, side_by_side_layout,
};

fn capturer_over(mock: &Arc<MockStrategy>) -> Capturer {
    Capturer::new(StrategyRegistry::new().with(mock.clone()))
}

fn request(monitor: i32) -> CaptureRequest {
    CaptureRequest::builder().monitor(monitor).build().unwrap()
}

#[test]
fn test_active_strategy_is_first_available() {
    // Every availability pattern over three strategies
    for mask in 1u8..8 {
        let strategies: Vec<Arc<MockStrategy>> = ["a", "b", "c"]
            .iter()
            .enumerate()
            .map(|(i, &name)| Arc::new(MockStrategy::named(name).with_availability(mask & (1 << i) != 0)))
            .collect();

        let mut registry = StrategyRegistry::new();
        for strategy in &strategies {
            registry.register(strategy.clone());
        }

        let expected = strategies.iter().find(|s| s.is_available()).unwrap().name();
        assert_eq!(registry.active_strategy().unwrap().name(), expected, "mask {mask:03b}");
    }
}

#[test]
fn test_capture_uses_selected_strategy_only() {
    let unavailable = Arc::new(MockStrategy::named("down").with_availability(false));
    let active = Arc::new(MockStrategy::named("up"));
    let capturer = Capturer::new(
        StrategyRegistry::new()
            .with(unavailable.clone())
            .with(active.clone()),
    );

    capturer.capture(&request(0)).unwrap();

    assert!(unavailable.captured_rects().is_empty());
    assert_eq!(active.captured_rects(), vec![Rect::new(0, 0, 1920, 1080)]);
}

#[test]
fn test_no_strategy_available() {
    let capturer = Capturer::new(
        StrategyRegistry::new().with(Arc::new(MockStrategy::named("x11").with_availability(false))),
    );

    let err = capturer.capture(&CaptureRequest::all_monitors()).unwrap_err();
    assert!(matches!(err, CaptureError::NoStrategyAvailable { .. }));
    assert_eq!(err.category(), ErrorCategory::Unavailable);

    let err = capturer.list_monitors().unwrap_err();
    assert!(matches!(err, CaptureError::NoStrategyAvailable { .. }));
}

#[test]
fn test_region_bypasses_enumeration() {
    let mock = Arc::new(MockStrategy::new().with_enumeration_error("enumeration must not run"));
    let capturer = capturer_over(&mock);

    let region = Rect::new(100, 100, 500, 400);
    let request = CaptureRequest::builder()
        .monitor(7)
        .region(region)
        .build()
        .unwrap();

    let raster = capturer.capture(&request).unwrap();

    assert_eq!(raster.dimensions(), (500, 400));
    assert_eq!(mock.captured_rects(), vec![region]);
    assert_eq!(mock.enumeration_count(), 0);
}

#[test]
fn test_all_monitors_is_bounding_box() {
    let mock = Arc::new(MockStrategy::new().with_displays(side_by_side_layout()));
    let raster = capturer_over(&mock).capture(&request(-1)).unwrap();

    assert_eq!(mock.captured_rects(), vec![Rect::new(0, 0, 3840, 1080)]);
    assert_eq!(raster.dimensions(), (3840, 1080));
}

#[test]
fn test_all_monitors_negative_origin() {
    let mock = Arc::new(MockStrategy::new().with_displays(negative_origin_layout()));
    capturer_over(&mock).capture(&request(-1)).unwrap();

    assert_eq!(mock.captured_rects(), vec![Rect::new(-1920, -1080, 4480, 2520)]);
}

/// Non-adjacent monitors: the request is the full bounding box, gaps
/// included, captured in one call rather than stitched per monitor.
#[test]
fn test_all_monitors_includes_gap_region() {
    let mock = Arc::new(MockStrategy::new().with_displays(diagonal_layout()));
    capturer_over(&mock).capture(&request(-1)).unwrap();

    let captured = mock.captured_rects();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0], Rect::new(0, 0, 3200, 2104));

    let covered: u64 = diagonal_layout()
        .iter()
        .map(|d| u64::from(d.bounds.width) * u64::from(d.bounds.height))
        .sum();
    let requested = u64::from(captured[0].width) * u64::from(captured[0].height);
    assert!(requested > covered, "bounding box should contain uncovered pixels");
}

#[test]
fn test_single_monitor_uses_its_bounds() {
    let mock = Arc::new(MockStrategy::new().with_displays(side_by_side_layout()));
    capturer_over(&mock).capture(&request(1)).unwrap();

    assert_eq!(mock.captured_rects(), vec![Rect::new(1920, 0, 1920, 1080)]);
}

#[test]
fn test_monitor_out_of_range() {
    let mock = Arc::new(MockStrategy::new().with_displays(side_by_side_layout()));
    let err = capturer_over(&mock).capture(&request(5)).unwrap_err();

    assert!(matches!(err, CaptureError::MonitorOutOfRange { index: 5, count: 2 }));
    assert_eq!(err.valid_range(), Some(0..=1));
    assert!(err.to_string().contains("0-1"));
    assert!(mock.captured_rects().is_empty());
}

#[test]
fn test_negative_monitor_other_than_all_is_out_of_range() {
    let mock = Arc::new(MockStrategy::new().with_displays(side_by_side_layout()));
    let err = capturer_over(&mock).capture(&request(-2)).unwrap_err();

    assert!(matches!(err, CaptureError::MonitorOutOfRange { index: -2, .. }));
}

#[test]
fn test_capture_with_no_displays() {
    let mock = Arc::new(MockStrategy::named("headless").with_displays(vec![]));
    let err = capturer_over(&mock).capture(&request(-1)).unwrap_err();

    assert!(matches!(err, CaptureError::NoActiveDisplays { strategy: "headless" }));
}

#[test]
fn test_backend_failure_is_wrapped_verbatim() {
    let mock = Arc::new(MockStrategy::named("x11").with_capture_error("XGetImage: BadMatch"));
    let err = capturer_over(&mock).capture(&request(0)).unwrap_err();

    assert_eq!(err.to_string(), "x11 capture failed: XGetImage: BadMatch");
    assert_eq!(err.category(), ErrorCategory::ProcessingError);
}

#[test]
fn test_list_monitors_enumeration_order() {
    let layout = vec![
        DisplayInfo::new("HDMI-1", Rect::new(1920, 0, 1280, 1024)),
        DisplayInfo::new("eDP-1", Rect::new(0, 0, 1920, 1080)),
        DisplayInfo::new("DP-3", Rect::new(-1080, 0, 1080, 1920)),
    ];
    let mock = Arc::new(MockStrategy::new().with_displays(layout.clone()));

    let monitors = capturer_over(&mock).list_monitors().unwrap();

    assert_eq!(monitors.len(), layout.len());
    for (i, (monitor, display)) in monitors.iter().zip(&layout).enumerate() {
        assert_eq!(monitor.index, i);
        assert_eq!(monitor.display_name, display.name);
        assert_eq!(monitor.bounds, display.bounds);
    }
}

#[test]
fn test_list_monitors_empty() {
    let mock = Arc::new(MockStrategy::new().with_displays(vec![]));
    let err = capturer_over(&mock).list_monitors().unwrap_err();

    assert!(matches!(err, CaptureError::NoActiveDisplays { .. }));
}

#[test]
fn test_override_restored_after_success() {
    let mock = Arc::new(MockStrategy::new().with_ambient_target(Some(":1")));
    let request = CaptureRequest::builder().display(":5").build().unwrap();

    capturer_over(&mock).capture(&request).unwrap();

    assert_eq!(mock.targets_seen(), vec![Some(":5".to_string())]);
    assert_eq!(mock.ambient_target().as_deref(), Some(":1"));
}

#[test]
fn test_override_restored_to_unset_after_failure() {
    let mock = Arc::new(MockStrategy::new().with_capture_error("connection lost"));
    let request = CaptureRequest::builder().display(":5").build().unwrap();

    assert!(capturer_over(&mock).capture(&request).is_err());

    assert_eq!(mock.targets_seen(), vec![Some(":5".to_string())]);
    assert_eq!(mock.ambient_target(), None);
}

#[test]
fn test_override_restored_after_enumeration_failure() {
    let mock = Arc::new(
        MockStrategy::new()
            .with_ambient_target(Some(":2"))
            .with_enumeration_error("no screens"),
    );
    let request = CaptureRequest::builder().display(":9").build().unwrap();

    assert!(capturer_over(&mock).capture(&request).is_err());
    assert_eq!(mock.ambient_target().as_deref(), Some(":2"));
}

#[test]
fn test_fallback_applied_when_unset_and_restored() {
    let mock = Arc::new(MockStrategy::new());
    capturer_over(&mock).capture(&request(0)).unwrap();

    assert_eq!(mock.targets_seen(), vec![Some(":0".to_string())]);
    assert_eq!(mock.ambient_target(), None);
}

#[test]
fn test_ambient_target_used_without_override() {
    let mock = Arc::new(MockStrategy::new().with_ambient_target(Some(":3")));
    capturer_over(&mock).capture(&request(0)).unwrap();

    assert_eq!(mock.targets_seen(), vec![Some(":3".to_string())]);
    assert_eq!(mock.ambient_target().as_deref(), Some(":3"));
}

#[test]
fn test_repeated_captures_do_not_leak_override() {
    let mock = Arc::new(MockStrategy::new().with_ambient_target(Some(":1")));
    let capturer = capturer_over(&mock);

    let with_override = CaptureRequest::builder().display(":7").build().unwrap();
    capturer.capture(&with_override).unwrap();
    capturer.capture(&request(0)).unwrap();

    assert_eq!(
        mock.targets_seen(),
        vec![Some(":7".to_string()), Some(":1".to_string())]
    );
}

#[test]
fn test_list_monitors_on_override() {
    let mock = Arc::new(MockStrategy::new());
    let monitors = capturer_over(&mock).list_monitors_on(Some(":4")).unwrap();

    assert_eq!(monitors.len(), 1);
    assert_eq!(mock.ambient_target(), None);
}

#[test]
fn test_strategies_reports_availability() {
    let capturer = Capturer::new(
        StrategyRegistry::new()
            .with(Arc::new(MockStrategy::named("x11").with_availability(false)))
            .with(Arc::new(MockStrategy::named("mock"))),
    );

    assert_eq!(
        capturer.strategies(),
        vec![
            StrategyStatus {
                name:      "x11",
                available: false,
            },
            StrategyStatus {
                name:      "mock",
                available: true,
            },
        ]
    );
}

#[test]
fn test_capture_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shots").join("one.png");
    let mock = Arc::new(MockStrategy::new());

    capturer_over(&mock)
        .capture_to_file(&request(0), CompressionLevel::Fast, &path)
        .unwrap();

    let decoded = decode_png(&std::fs::read(&path).unwrap());
    assert_eq!((decoded.width(), decoded.height()), (1920, 1080));
}
