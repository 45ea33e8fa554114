// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Order statistics used by bulk loading.
//!
//! - [`select`]: Floyd–Rivest selection. Places the `k`-th smallest element of
//!   `items[left..=right]` at index `k`, with smaller-or-equal elements to its
//!   left and greater-or-equal elements to its right.
//! - [`multi_select`]: arranges a range into consecutive groups of `n` elements
//!   that are ordered relative to each other but unsorted within a group.
//!
//! Both take inclusive `left..=right` bounds and a comparator, so the same
//! slice can be partitioned piecewise without reslicing.

use alloc::vec;
use core::cmp::Ordering;

use crate::math;

/// Ranges wider than this are narrowed with a sampled bracket before partitioning.
const SAMPLE_THRESHOLD: usize = 600;

/// Floyd–Rivest selection over `items[left..=right]`.
///
/// On return `items[k]` holds the element that a full sort by `compare` would
/// put there, every element in `left..k` compares `<=` to it and every element
/// in `k + 1..=right` compares `>=` to it. Equal elements may end up on either
/// side.
///
/// # Panics
///
/// Panics if `left <= k <= right < items.len()` does not hold.
#[allow(
    clippy::cast_possible_truncation,
    reason = "bracket bounds are clamped into [left, right] before the cast"
)]
pub fn select<T, F>(items: &mut [T], k: usize, left: usize, right: usize, compare: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    assert!(
        left <= k && k <= right && right < items.len(),
        "select bounds out of range"
    );
    let mut left = left;
    let mut right = right;

    while right > left {
        if right - left > SAMPLE_THRESHOLD {
            let n = (right - left + 1) as f64;
            let m = (k - left + 1) as f64;
            let z = math::ln(n);
            let s = 0.5 * math::exp(2.0 * z / 3.0);
            let sign = if m - n / 2.0 < 0.0 { -1.0 } else { 1.0 };
            let sd = 0.5 * math::sqrt(z * s * (n - s) / n) * sign;
            let kf = k as f64;
            let lo = math::floor(kf - m * s / n + sd);
            let hi = math::floor(kf + (n - m) * s / n + sd);
            let new_left = if lo > left as f64 { lo as usize } else { left };
            let new_right = if hi < right as f64 { hi as usize } else { right };
            select(items, k, new_left, new_right, compare);
        }

        let pivot = items[k].clone();
        let mut i = left;
        let mut j = right;

        items.swap(left, k);
        if compare(&items[right], &pivot) == Ordering::Greater {
            items.swap(left, right);
        }

        while i < j {
            items.swap(i, j);
            i += 1;
            j -= 1;
            while compare(&items[i], &pivot) == Ordering::Less {
                i += 1;
            }
            while compare(&items[j], &pivot) == Ordering::Greater {
                j -= 1;
            }
        }

        if compare(&items[left], &pivot) == Ordering::Equal {
            items.swap(left, j);
        } else {
            j += 1;
            items.swap(j, right);
        }

        if j <= k {
            left = j + 1;
        }
        if k <= j {
            if j == 0 {
                break;
            }
            right = j - 1;
        }
    }
}

/// Arrange `items[left..=right]` into groups of `n` that are sorted between
/// each other.
///
/// Afterwards, walking the range in windows of `n` starting at `left` (the last
/// window may be shorter), every element of a window compares `<=` every
/// element of any later window. Uses an explicit work list rather than
/// recursion.
///
/// # Panics
///
/// Panics if `n` is zero or `left <= right < items.len()` does not hold.
pub fn multi_select<T, F>(items: &mut [T], left: usize, right: usize, n: usize, compare: &mut F)
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    assert!(n > 0, "group size must be positive");
    assert!(
        left <= right && right < items.len(),
        "multi_select bounds out of range"
    );

    let mut stack = vec![(left, right)];
    while let Some((left, right)) = stack.pop() {
        let len = right - left + 1;
        if len <= n {
            continue;
        }
        // Group boundary nearest the middle of the range.
        let mid = left + len.div_ceil(2 * n) * n;
        select(items, mid, left, right, compare);
        stack.push((left, mid - 1));
        stack.push((mid, right));
    }
}
