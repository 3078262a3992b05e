// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;

use super::*;

#[test]
fn test_histogram_counts_and_edges() {
    // Range is [0, 8] because of the header values; 4 bins of width 2.
    let values = [1.0, 2.5, 3.0, 7.9];
    let histogram = compute_histogram(&values, 8.0, 4);
    let edges: Vec<f64> = histogram.iter().map(|b| b.x).collect();
    let counts: Vec<f64> = histogram.iter().map(|b| b.y).collect();
    assert_eq!(edges, vec![0.0, 2.0, 4.0, 6.0]);
    assert_eq!(counts, vec![1.0, 2.0, 0.0, 1.0]);
}

#[test]
fn test_histogram_maximum_lands_in_last_bin() {
    let histogram = compute_histogram(&[10.0, 5.0], 1.0, 2);
    assert_eq!(histogram.len(), 2);
    assert_abs_diff_eq!(histogram[1].y, 2.0);
    assert_abs_diff_eq!(histogram[1].x, 5.0);
}

#[test]
fn test_histogram_bins_limited_by_input_length() {
    let histogram = compute_histogram(&[1.0, 2.0, 3.0], 4.0, 100);
    assert_eq!(histogram.len(), 3);
    let total: f64 = histogram.iter().map(|b| b.y).sum();
    assert_abs_diff_eq!(total, 3.0);
}

#[test]
fn test_histogram_empty_and_degenerate() {
    assert!(compute_histogram(&[], 10.0, 10).is_empty());
    assert!(compute_histogram(&[1.0], 10.0, 0).is_empty());

    let histogram = compute_histogram(&[0.0, 0.0, 0.0], 0.0, 10);
    assert_eq!(histogram.len(), 1);
    assert_abs_diff_eq!(histogram[0].x, 0.0);
    assert_abs_diff_eq!(histogram[0].y, 3.0);
}

#[test]
fn test_negative_values_widen_range() {
    let histogram = compute_histogram(&[-4.0, 4.0], 4.0, 2);
    assert_abs_diff_eq!(histogram[0].x, -4.0);
    assert_abs_diff_eq!(histogram[1].x, 0.0);
    assert_abs_diff_eq!(histogram[0].y, 1.0);
    assert_abs_diff_eq!(histogram[1].y, 1.0);
}

#[test]
fn test_stack_averages_across_builds() {
    let mut stack = HistogramStack::new(ZeroPolicy::Skip);
    stack.accumulate(&[1.0, 1.5, 7.0, 7.5], 8.0, 4);
    stack.accumulate(&[1.0, 7.0, 7.5, 7.9], 8.0, 4);
    assert_eq!(stack.stack_index(), 2);
    // Bin 0: (2 + 1) / 2; bin 3: (2 + 3) / 2.
    assert_abs_diff_eq!(stack.stack().get(0.0).unwrap(), 1.5);
    assert_abs_diff_eq!(stack.stack().get(6.0).unwrap(), 2.5);
}

#[test]
fn test_stack_is_reproducible_after_reset() {
    let values = [0.2, 0.4, 0.9, 3.3, 3.4, 2.0];
    let mut stack = HistogramStack::new(ZeroPolicy::Skip);
    stack.accumulate(&values, 4.0, 4);
    let first = stack.bins().to_vec();
    stack.reset();
    stack.accumulate(&values, 4.0, 4);
    assert_eq!(stack.bins(), first.as_slice());
}

#[test]
fn test_empty_input_does_not_begin_a_pass() {
    let mut stack = HistogramStack::new(ZeroPolicy::Skip);
    stack.accumulate(&[], 1.0, 10);
    assert_eq!(stack.stack_index(), 0);
    assert!(stack.bins().is_empty());
}
