// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Some helper mathematics.


use crate::series::Sample;

/// Replace the y values of `samples` with a centred moving average of length
/// `window` taken over the unsmoothed `raw` history.
///
/// The first and last `window / 2` samples can't be centred, so they are
/// clamped to the nearest computed value. Nothing happens if `window <= 1`,
/// if there are fewer samples than `window`, or if `raw` is shorter than
/// `samples`.
pub(crate) fn smooth(samples: &mut [Sample], raw: &[f64], window: usize) {
    let len = samples.len();
    let half = window / 2;
    // An even window needs one extra sample before anything is centred.
    if window <= 1 || len < window || len <= 2 * half || raw.len() < len {
        return;
    }

    let first = half;
    let last = len - half - 1;
    for (i, sample) in samples.iter_mut().enumerate().take(last + 1).skip(first) {
        let start = i - half;
        sample.y = raw[start..start + window].iter().sum::<f64>() / window as f64;
    }

    let head = samples[first].y;
    let tail = samples[last].y;
    samples[..first].iter_mut().for_each(|s| s.y = head);
    samples[last + 1..].iter_mut().for_each(|s| s.y = tail);
}

/// The minimum and maximum of `values`, or `None` if there are none.
pub(crate) fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut iter = values.iter().copied();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(mn, mx), v| (mn.min(v), mx.max(v))))
}

/// Linearly map `v` from `[min, max]` onto `[0, size]`.
#[inline]
pub(crate) fn stretch(v: f64, min: f64, max: f64, size: f64) -> f64 {
    (v - min) * size / (max - min)
}

/// The inverse of [`stretch`].
#[inline]
pub(crate) fn unstretch(v: f64, min: f64, max: f64, size: f64) -> f64 {
    v * (max - min) / size + min
}
