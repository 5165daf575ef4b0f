use crate::range::{Direction, Range};
use serde::{Deserialize, Serialize};

/// The current selection, or a collapsed cursor when `start == end`.
///
/// `clockwise` tells which way the selection runs from `start`. A reverse
/// selection (`clockwise == false`) covers `end..start`, so the same pair of
/// numbers can describe either arc of a circular sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub clockwise: bool,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            clockwise: true,
        }
    }
}

impl Selection {
    pub fn new(start: usize, end: usize, clockwise: bool) -> Self {
        Self {
            start,
            end,
            clockwise,
        }
    }

    pub fn cursor(index: usize) -> Self {
        Self::new(index, index, true)
    }

    /// Selection covering a feature. Reverse features are selected from their
    /// end back to their start.
    pub fn from_range(range: &Range) -> Self {
        if range.direction == Direction::Reverse {
            Self::new(range.end, range.start, false)
        } else {
            Self::new(range.start, range.end, true)
        }
    }

    #[inline(always)]
    pub fn is_cursor(&self) -> bool {
        self.start == self.end
    }

    /// The covered bases as a forward half-open range.
    pub fn as_range(&self) -> Range {
        if self.clockwise {
            Range::new(self.start, self.end).with_direction(Direction::Forward)
        } else {
            Range::new(self.end, self.start).with_direction(Direction::Reverse)
        }
    }

    /// Number of selected bases. A selection running through the origin
    /// counts the bases on both sides of it.
    pub fn length(&self, seq_len: usize) -> usize {
        self.as_range().span(seq_len)
    }

    pub fn contains(&self, index: usize, seq_len: usize) -> bool {
        !self.is_cursor() && self.as_range().contains(index, seq_len)
    }
}

/// The sequence index rotated to 12 o'clock on the circular map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CentralIndex(usize);

impl CentralIndex {
    pub fn new(index: usize, seq_len: usize) -> Self {
        if seq_len == 0 {
            Self(0)
        } else {
            Self(index % seq_len)
        }
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// Rotate by a signed number of bases, wrapping around the origin.
    pub fn rotated(self, delta: i64, seq_len: usize) -> Self {
        if seq_len == 0 {
            return Self(0);
        }
        let len = seq_len as i64;
        let next = (self.0 as i64 + delta).rem_euclid(len);
        Self(next as usize)
    }
}
