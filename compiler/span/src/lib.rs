// Copyright (C) 2024-2025 The dejs authors.
// This file is part of the dejs library.

// The dejs library is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// The dejs library is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with the dejs library. If not, see <https://www.gnu.org/licenses/>.

//! Byte-offset spans for the dejs syntax tree.
//!
//! A [`Span`] records the half-open byte range `[lo, hi)` a node occupies in
//! the original source. Spans survive tree surgery unchanged; nodes that are
//! synthesized during rewriting carry the span of the node they replace so
//! diagnostics keep pointing at real source text.

use serde::{Deserialize, Serialize};
use std::{fmt, ops::Add};

/// The byte range of a token or tree node in the source text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Offset of the first byte.
    pub lo: u32,
    /// Offset one past the last byte.
    pub hi: u32,
}

impl Span {
    /// Returns a new span from `lo` to `hi`.
    pub fn new(lo: u32, hi: u32) -> Self {
        Self { lo, hi }
    }

    /// Returns a dummy span pointing at the start of the source.
    ///
    /// Used for synthesized nodes before they adopt a real span.
    pub const fn dummy() -> Self {
        Self { lo: 0, hi: 0 }
    }

    /// Is the span a dummy?
    pub fn is_dummy(&self) -> bool {
        self.lo == 0 && self.hi == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.lo, self.hi)
    }
}

impl Add for Span {
    type Output = Self;

    /// Merges two spans into one covering both.
    fn add(self, other: Self) -> Self {
        if self.is_dummy() {
            other
        } else if other.is_dummy() {
            self
        } else {
            Self::new(self.lo.min(other.lo), self.hi.max(other.hi))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_covers_both_ranges() {
        assert_eq!(Span::new(4, 9) + Span::new(12, 20), Span::new(4, 20));
        assert_eq!(Span::new(12, 20) + Span::new(4, 9), Span::new(4, 20));
    }

    #[test]
    fn merge_with_dummy_keeps_real_span() {
        assert_eq!(Span::dummy() + Span::new(3, 5), Span::new(3, 5));
        assert_eq!(Span::new(3, 5) + Span::dummy(), Span::new(3, 5));
    }
}
