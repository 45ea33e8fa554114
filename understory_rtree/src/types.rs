// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;
use core::fmt::Debug;
use core::hash::Hash;
use core::ops::{Add, Mul, Sub};

use crate::error::{Error, Result};

/// Integer coordinate abstraction for 2D rectangles.
///
/// Every derived metric (margin, area, enlargement, overlap) is computed in the
/// associated accumulator type [`Coord::Acc`]. Its arithmetic never overflows:
/// it is either wide enough for the product of two extents, or saturating.
///
/// | Coordinate | Accumulator        | Metrics                            |
/// |------------|--------------------|------------------------------------|
/// | `i16`      | `i64`              | exact over the full range          |
/// | `i32`      | `i128`             | exact over the full range          |
/// | `i64`      | [`SaturatingI128`] | areas clamp at `i128::MAX`         |
pub trait Coord: Copy + Ord + Hash + Debug {
    /// Widened accumulator type for margin and area metrics.
    type Acc: Copy
        + Ord
        + Debug
        + Add<Output = Self::Acc>
        + Sub<Output = Self::Acc>
        + Mul<Output = Self::Acc>;

    /// Smallest representable coordinate.
    const MIN: Self;

    /// Largest representable coordinate.
    const MAX: Self;

    /// Zero value of the accumulator.
    const ACC_ZERO: Self::Acc;

    /// Add two coordinates, saturating at the numeric bounds.
    fn saturating_add(a: Self, b: Self) -> Self;

    /// Subtract `b` from `a`, saturating at the numeric bounds.
    fn saturating_sub(a: Self, b: Self) -> Self;

    /// Half of the value, rounding toward zero.
    fn half(v: Self) -> Self;

    /// Convert a coordinate to the accumulator type.
    fn widen(v: Self) -> Self::Acc;
}

macro_rules! impl_coord {
    ($t:ty, $acc:ty, $zero:expr) => {
        impl Coord for $t {
            type Acc = $acc;

            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
            const ACC_ZERO: Self::Acc = $zero;

            #[inline]
            fn saturating_add(a: Self, b: Self) -> Self {
                a.saturating_add(b)
            }

            #[inline]
            fn saturating_sub(a: Self, b: Self) -> Self {
                a.saturating_sub(b)
            }

            #[inline]
            fn half(v: Self) -> Self {
                v / 2
            }

            #[inline]
            fn widen(v: Self) -> Self::Acc {
                <$acc>::from(v)
            }
        }
    };
}

/// `i128` with saturating arithmetic, used as the accumulator for `i64` coordinates.
///
/// An `i64` extent needs 65 bits, so the product of two of them does not fit in
/// `i128`. Areas of such rectangles clamp at `i128::MAX` instead of wrapping;
/// extents and margins are always exact.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SaturatingI128(pub i128);

impl From<i64> for SaturatingI128 {
    #[inline]
    fn from(v: i64) -> Self {
        Self(i128::from(v))
    }
}

impl Add for SaturatingI128 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for SaturatingI128 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul for SaturatingI128 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(self.0.saturating_mul(rhs.0))
    }
}

impl_coord!(i16, i64, 0);
impl_coord!(i32, i128, 0);
impl_coord!(i64, SaturatingI128, SaturatingI128(0));

/// Axis-aligned rectangle in 2D with closed bounds on both axes.
///
/// A rectangle with `min > max` on either axis is empty. [`Rect::empty`] is the
/// neutral element for [`Rect::extend`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect<C> {
    /// Minimum x (left)
    pub min_x: C,
    /// Minimum y (top)
    pub min_y: C,
    /// Maximum x (right)
    pub max_x: C,
    /// Maximum y (bottom)
    pub max_y: C,
}

impl<C> Rect<C> {
    /// Create a new rectangle from min/max corners.
    pub const fn new(min_x: C, min_y: C, max_x: C, max_y: C) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<C: Coord> Rect<C> {
    /// Degenerate rectangle covering a single point.
    pub const fn point(x: C, y: C) -> Self {
        Self::new(x, y, x, y)
    }

    /// Build a rectangle from `[x, y]` (a point) or `[min_x, min_y, max_x, max_y]`.
    ///
    /// Any other length is rejected with [`Error::InvalidCoordinateCount`].
    pub fn from_slice(coords: &[C]) -> Result<Self> {
        match *coords {
            [x, y] => Ok(Self::point(x, y)),
            [min_x, min_y, max_x, max_y] => Ok(Self::new(min_x, min_y, max_x, max_y)),
            _ => Err(Error::InvalidCoordinateCount { len: coords.len() }),
        }
    }

    /// The empty rectangle: `min = MAX`, `max = MIN`.
    pub const fn empty() -> Self {
        Self::new(C::MAX, C::MAX, C::MIN, C::MIN)
    }

    /// Reset to [`Rect::empty`].
    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    /// True if the rectangle covers nothing (inverted on some axis).
    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    /// Grow `self` to the union of `self` and `other`.
    pub fn extend(&mut self, other: &Self) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// The union of two rectangles.
    #[must_use]
    pub fn union(mut self, other: &Self) -> Self {
        self.extend(other);
        self
    }

    /// Move every side outward by `amount`, saturating at the coordinate bounds.
    pub fn expand(&mut self, amount: C) {
        self.min_x = C::saturating_sub(self.min_x, amount);
        self.min_y = C::saturating_sub(self.min_y, amount);
        self.max_x = C::saturating_add(self.max_x, amount);
        self.max_y = C::saturating_add(self.max_y, amount);
    }

    /// Center point, halving each bound before adding so it cannot overflow.
    pub fn center(&self) -> (C, C) {
        (
            C::saturating_add(C::half(self.max_x), C::half(self.min_x)),
            C::saturating_add(C::half(self.max_y), C::half(self.min_y)),
        )
    }

    /// Center as a degenerate rectangle.
    pub fn center_rect(&self) -> Self {
        let (x, y) = self.center();
        Self::point(x, y)
    }

    /// Width in the accumulator type; zero when empty on x.
    pub fn width(&self) -> C::Acc {
        extent(self.min_x, self.max_x)
    }

    /// Height in the accumulator type; zero when empty on y.
    pub fn height(&self) -> C::Acc {
        extent(self.min_y, self.max_y)
    }

    /// `width * height`.
    pub fn area(&self) -> C::Acc {
        self.width() * self.height()
    }

    /// Half-perimeter: `width + height`.
    pub fn margin(&self) -> C::Acc {
        self.width() + self.height()
    }

    /// Area of the union of `self` and `other`.
    pub fn enlarged_area(&self, other: &Self) -> C::Acc {
        extent(self.min_x.min(other.min_x), self.max_x.max(other.max_x))
            * extent(self.min_y.min(other.min_y), self.max_y.max(other.max_y))
    }

    /// Area of the intersection of `self` and `other`; zero if they are disjoint.
    pub fn intersection_area(&self, other: &Self) -> C::Acc {
        extent(self.min_x.max(other.min_x), self.max_x.min(other.max_x))
            * extent(self.min_y.max(other.min_y), self.max_y.min(other.max_y))
    }

    /// True if the closed ranges overlap on both axes.
    pub fn intersects(&self, other: &Self) -> bool {
        other.min_x <= self.max_x
            && other.min_y <= self.max_y
            && other.max_x >= self.min_x
            && other.max_y >= self.min_y
    }

    /// True if `other` lies fully inside `self` (shared edges count as inside).
    pub fn contains(&self, other: &Self) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    /// Order by `min_x` only. Chain with [`Ordering::then_with`] for a secondary key.
    pub fn compare_min_x(&self, other: &Self) -> Ordering {
        self.min_x.cmp(&other.min_x)
    }

    /// Order by `min_y` only. Chain with [`Ordering::then_with`] for a secondary key.
    pub fn compare_min_y(&self, other: &Self) -> Ordering {
        self.min_y.cmp(&other.min_y)
    }
}

impl<C: Coord> Default for Rect<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C: Coord> TryFrom<&[C]> for Rect<C> {
    type Error = Error;

    fn try_from(coords: &[C]) -> Result<Self> {
        Self::from_slice(coords)
    }
}

impl<C: Coord> From<[C; 4]> for Rect<C> {
    fn from([min_x, min_y, max_x, max_y]: [C; 4]) -> Self {
        Self::new(min_x, min_y, max_x, max_y)
    }
}

impl<C: Coord> From<[C; 2]> for Rect<C> {
    fn from([x, y]: [C; 2]) -> Self {
        Self::point(x, y)
    }
}

/// `max - min` after widening, clamped at zero.
#[inline]
fn extent<C: Coord>(min: C, max: C) -> C::Acc {
    let d = C::widen(max) - C::widen(min);
    if d < C::ACC_ZERO { C::ACC_ZERO } else { d }
}
