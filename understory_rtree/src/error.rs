// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for fallible constructors.

/// Errors surfaced to callers of this crate.
///
/// Structural invariants of the tree are never reported here; a violation is a bug.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A coordinate slice was neither a point (`[x, y]`) nor a box
    /// (`[min_x, min_y, max_x, max_y]`).
    #[error("expected 2 or 4 coordinates, got {len}")]
    InvalidCoordinateCount {
        /// Length of the rejected slice.
        len: usize,
    },
}

/// Result alias using this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;
