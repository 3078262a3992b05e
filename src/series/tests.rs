// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;

use super::*;

fn series_with_window(window: usize) -> Series {
    Series::new(
        "A magnitude",
        SeriesConfig {
            window,
            ..Default::default()
        },
    )
}

fn xs(samples: &[Sample]) -> Vec<f64> {
    samples.iter().map(|s| s.x).collect()
}

fn ys(samples: &[Sample]) -> Vec<f64> {
    samples.iter().map(|s| s.y).collect()
}

#[test]
fn test_add_count_evicts_old_samples() {
    let mut series = series_with_window(1);
    let range = 3.0;
    for i in 0..10 {
        let x = i as f64;
        series.add_count(x - range, x, Some(x * 2.0), Some(x), Some(-x));
        for component in [Component::Counts, Component::Magnitude, Component::Phase] {
            let samples = series.samples(component);
            assert!(samples.iter().all(|s| s.x >= x - range));
            assert_eq!(samples.len(), series.raw(component).len());
        }
    }
    assert_eq!(xs(series.counts()), vec![6.0, 7.0, 8.0, 9.0]);
    assert_eq!(ys(series.counts()), vec![12.0, 14.0, 16.0, 18.0]);
    assert_eq!(ys(series.magnitude()), vec![6.0, 7.0, 8.0, 9.0]);
    assert_eq!(ys(series.phase()), vec![-6.0, -7.0, -8.0, -9.0]);
}

#[test]
fn test_add_count_absent_values_are_skipped() {
    let mut series = series_with_window(1);
    series.add_count(0.0, 1.0, None, Some(2.0), None);
    series.add_count(0.0, 2.0, Some(5.0), None, Some(0.5));
    assert_eq!(xs(series.counts()), vec![2.0]);
    assert_eq!(xs(series.magnitude()), vec![1.0]);
    assert_eq!(xs(series.phase()), vec![2.0]);
}

#[test]
fn test_add_count_smooths_each_trace_over_its_own_history() {
    let mut series = series_with_window(3);
    for i in 0..5 {
        let x = i as f64;
        series.add_count(-1.0, x, Some(x + 1.0), Some(10.0 * (x + 1.0)), None);
    }
    assert_eq!(ys(series.counts()), vec![2.0, 2.0, 3.0, 4.0, 4.0]);
    assert_eq!(ys(series.magnitude()), vec![20.0, 20.0, 30.0, 40.0, 40.0]);
    // Raw history is never overwritten by smoothing.
    assert_eq!(series.raw(Component::Counts), &[1.0, 2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn test_stack_buffer_skips_first_bin_and_transforms() {
    let mut series = series_with_window(1);
    let transform = AxisTransform {
        x_scale: 2.0,
        x_offset: -1.0,
        y_scale: 10.0,
        y_offset: 0.0,
    };
    series.stack_buffer(Component::Magnitude, &[9.0, 1.0, 2.0, 3.0], 0, &transform);
    let samples = series.magnitude();
    assert_eq!(xs(samples), vec![1.0, 3.0, 5.0]);
    assert_eq!(ys(samples), vec![10.0, 20.0, 30.0]);

    series.stack_buffer(Component::Magnitude, &[9.0, 3.0, 4.0, 5.0], 0, &transform);
    assert_eq!(ys(series.magnitude()), vec![20.0, 30.0, 40.0]);
    assert_eq!(series.stack(Component::Magnitude).stack_index(), 2);
    // Other stacks are untouched.
    assert_eq!(series.stack(Component::Phase).stack_index(), 0);
}

#[test]
fn test_stack_buffer_with_offset() {
    let mut series = series_with_window(1);
    series.stack_buffer(
        Component::Phase,
        &[1.0, 2.0, 3.0, 4.0],
        1,
        &AxisTransform::default(),
    );
    assert_eq!(xs(series.phase()), vec![2.0, 3.0]);
}

#[test]
fn test_dark_toggle_round_trip() {
    let mut series = series_with_window(1);
    series.stack_buffer(
        Component::Magnitude,
        &[0.5, 1.0, 2.0],
        0,
        &AxisTransform::default(),
    );

    assert!(series.toggle_dark());
    assert!(series.dark_active());
    assert_eq!(series.label(), "A magnitude (residuals)");
    assert_eq!(series.dark().len(), 2);
    assert_abs_diff_eq!(series.dark().get(2.0).unwrap(), 2.0);

    assert!(!series.toggle_dark());
    assert_eq!(series.label(), "A magnitude");
    assert!(series.dark().is_empty());
}

#[test]
fn test_dark_is_applied_to_new_passes() {
    let mut series = series_with_window(1);
    series.stack_buffer(
        Component::Magnitude,
        &[0.0, 4.0],
        0,
        &AxisTransform::default(),
    );
    series.toggle_dark();
    series.reset();
    series.stack_buffer(
        Component::Magnitude,
        &[0.0, 6.0],
        0,
        &AxisTransform::default(),
    );
    assert_abs_diff_eq!(series.magnitude()[0].y, 2.0);

    // Phase shares the dark frame.
    series.stack_buffer(Component::Phase, &[0.0, 6.0], 0, &AxisTransform::default());
    assert_abs_diff_eq!(series.phase()[0].y, 2.0);
}

#[test]
fn test_stack_value_appends_emitted_point() {
    let mut series = series_with_window(1);
    assert!(series.stack_value(Component::Counts, 1.0, Some(0.0)).is_none());
    let s = series.stack_value(Component::Counts, 1.0, Some(3.0)).unwrap();
    assert_abs_diff_eq!(s.y, 3.0);
    assert_eq!(series.counts().len(), 1);
}

#[test]
fn test_build_histogram_accumulates() {
    let mut series = series_with_window(1);
    for i in 0..4 {
        series.add_count(0.0, i as f64, None, Some(10.0), None);
    }
    series.build_histogram(Component::Magnitude, 100.0, 4);
    let histogram = series.histogram(Component::Magnitude);
    assert_eq!(histogram.stack_index(), 1);
    assert!(!histogram.bins().is_empty());
    let total: f64 = histogram.bins().iter().map(|b| b.y).sum();
    assert_abs_diff_eq!(total, 4.0);
}

#[test]
fn test_clear_and_reset() {
    let mut series = series_with_window(1);
    series.add_count(0.0, 1.0, Some(1.0), Some(1.0), Some(1.0));
    series.stack_buffer(Component::Magnitude, &[0.0, 1.0], 0, &AxisTransform::default());
    series.build_histogram(Component::Magnitude, 1.0, 10);
    series.toggle_dark();

    series.reset();
    assert_eq!(series.stack(Component::Magnitude).stack_index(), 0);
    assert_eq!(series.histogram(Component::Magnitude).stack_index(), 0);
    assert!(!series.magnitude().is_empty());
    assert!(series.dark_active());

    series.clear();
    for component in [Component::Counts, Component::Magnitude, Component::Phase] {
        assert!(series.samples(component).is_empty());
        assert!(series.raw(component).is_empty());
        assert!(series.stack(component).is_empty());
        assert!(series.histogram(component).bins().is_empty());
    }
    assert!(!series.dark_active());
    assert_eq!(series.label(), series.name());
}
