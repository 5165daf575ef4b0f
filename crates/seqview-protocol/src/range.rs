//! Positional primitives shared by every feature category.
//!
//! All positions are 0-based and ranges are half-open. A range whose `start`
//! is greater than its `end` runs through the origin of a circular sequence,
//! i.e. it covers `[start, len) ∪ [0, end)`. A range with `start == end` is a
//! zero-width point feature.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Feature orientation, normalised once when a feature enters the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Reverse,
    #[default]
    None,
}

impl Direction {
    pub fn from_sign(sign: i64) -> Self {
        match sign.signum() {
            1 => Direction::Forward,
            -1 => Direction::Reverse,
            _ => Direction::None,
        }
    }

    /// Parses the textual spellings found in annotation sources.
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "forward" | "fwd" | "fw" | "+" | "1" | "+1" | "sense" | "true" => Direction::Forward,
            "reverse" | "rev" | "rv" | "-" | "-1" | "complement" | "antisense" => {
                Direction::Reverse
            }
            _ => Direction::None,
        }
    }

    pub fn sign(self) -> i8 {
        match self {
            Direction::Forward => 1,
            Direction::Reverse => -1,
            Direction::None => 0,
        }
    }

    #[inline(always)]
    pub fn is_reverse(self) -> bool {
        self == Direction::Reverse
    }

    #[inline(always)]
    pub fn is_forward(self) -> bool {
        self == Direction::Forward
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDirection {
    Integer(i64),
    Float(f64),
    Flag(bool),
    Text(String),
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<RawDirection>::deserialize(deserializer)?;
        Ok(match raw {
            Some(RawDirection::Integer(sign)) => Direction::from_sign(sign),
            Some(RawDirection::Float(sign)) if sign > 0.0 => Direction::Forward,
            Some(RawDirection::Float(sign)) if sign < 0.0 => Direction::Reverse,
            Some(RawDirection::Float(_)) => Direction::None,
            Some(RawDirection::Flag(true)) => Direction::Forward,
            Some(RawDirection::Flag(false)) => Direction::Reverse,
            Some(RawDirection::Text(text)) => Direction::parse(&text),
            None => Direction::None,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPosition {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

/// Accepts any JSON number as a position. Negative values saturate to 0 so
/// that ingestion can clamp instead of rejecting the whole payload.
pub fn lenient_position<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let raw = RawPosition::deserialize(deserializer)?;
    let position = match raw {
        RawPosition::Unsigned(value) => usize::try_from(value).unwrap_or(usize::MAX),
        RawPosition::Signed(value) if value < 0 => {
            log::warn!("negative position {value} saturated to 0");
            0
        }
        RawPosition::Signed(value) => usize::try_from(value).unwrap_or(usize::MAX),
        RawPosition::Float(value) if value.is_nan() || value < 0.0 => {
            log::warn!("invalid position {value} saturated to 0");
            0
        }
        RawPosition::Float(value) => value.round() as usize,
    };
    Ok(position)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    #[serde(deserialize_with = "lenient_position")]
    pub start: usize,
    #[serde(deserialize_with = "lenient_position")]
    pub end: usize,
    #[serde(default)]
    pub direction: Direction,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            direction: Direction::None,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    #[inline(always)]
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    #[inline(always)]
    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    /// Number of bases covered, counting through the origin for wrapping ranges.
    pub fn span(&self, seq_len: usize) -> usize {
        if self.wraps() {
            seq_len.saturating_sub(self.start) + self.end
        } else {
            self.end - self.start
        }
    }

    /// The one or two contiguous `[from, to)` runs this range covers.
    /// A point feature yields a single empty run at its position.
    pub fn segments(&self, seq_len: usize) -> impl Iterator<Item = std::ops::Range<usize>> {
        let (head, tail) = if self.wraps() {
            let tail = (self.end > 0).then_some(0..self.end);
            (Some(self.start..seq_len.max(self.start)), tail)
        } else {
            (Some(self.start..self.end), None)
        };
        head.into_iter().chain(tail)
    }

    /// Whether `index` lies inside the covered bases.
    pub fn contains(&self, index: usize, seq_len: usize) -> bool {
        self.segments(seq_len)
            .any(|segment| segment.start <= index && index < segment.end)
    }

    /// Overlap test on the circle. Two points overlap when they sit on the
    /// same index; a point overlaps an interval when it lies strictly inside it.
    pub fn overlaps(&self, other: &Range, seq_len: usize) -> bool {
        match (self.is_point(), other.is_point()) {
            (true, true) => self.start == other.start,
            (true, false) => other.strictly_contains(self.start),
            (false, true) => self.strictly_contains(other.start),
            (false, false) => self.segments(seq_len).any(|a| {
                other
                    .segments(seq_len)
                    .any(|b| a.start < b.end && b.start < a.end)
            }),
        }
    }

    fn strictly_contains(&self, index: usize) -> bool {
        if self.wraps() {
            index > self.start || index < self.end
        } else {
            self.start < index && index < self.end
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A 1-based position for human-readable output. Only the serialisation and
/// labelling layers construct these; algorithms never see them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayPosition(usize);

impl DisplayPosition {
    pub fn from_index(index: usize) -> Self {
        Self(index.saturating_add(1))
    }

    pub fn to_index(self) -> usize {
        self.0.saturating_sub(1)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for DisplayPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anything that occupies a range of the sequence.
pub trait Ranged {
    fn range(&self) -> Range;
}

impl Ranged for Range {
    fn range(&self) -> Range {
        *self
    }
}

impl<T: Ranged + ?Sized> Ranged for std::sync::Arc<T> {
    fn range(&self) -> Range {
        (**self).range()
    }
}

impl<T: Ranged + ?Sized> Ranged for &T {
    fn range(&self) -> Range {
        (**self).range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_accepts_mixed_encodings() {
        let parsed: Vec<Direction> =
            serde_json::from_str(r#"[1, -1, 0, "forward", "reverse", "REV", true, false, null, 1.0]"#)
                .unwrap();
        assert_eq!(
            parsed,
            vec![
                Direction::Forward,
                Direction::Reverse,
                Direction::None,
                Direction::Forward,
                Direction::Reverse,
                Direction::Reverse,
                Direction::Forward,
                Direction::Reverse,
                Direction::None,
                Direction::Forward,
            ]
        );
    }

    #[test]
    fn direction_serializes_lowercase() {
        let text = serde_json::to_string(&Direction::Reverse).unwrap();
        assert_eq!(text, "\"reverse\"");
    }

    #[test]
    fn negative_positions_saturate() {
        let range: Range = serde_json::from_str(r#"{"start": -5, "end": 12.4}"#).unwrap();
        assert_eq!(range, Range::new(0, 12));
    }

    #[test]
    fn wrapping_span_and_segments() {
        let range = Range::new(90, 10);
        assert!(range.wraps());
        assert_eq!(range.span(100), 20);
        let segments: Vec<_> = range.segments(100).collect();
        assert_eq!(segments, vec![90..100, 0..10]);
        assert!(range.contains(95, 100));
        assert!(range.contains(0, 100));
        assert!(!range.contains(10, 100));
        assert!(!range.contains(50, 100));
    }

    #[test]
    fn wrap_ending_at_origin_has_one_segment() {
        let range = Range::new(90, 0);
        let segments: Vec<_> = range.segments(100).collect();
        assert_eq!(segments, vec![90..100]);
        assert_eq!(range.span(100), 10);
    }

    #[test]
    fn overlap_rules() {
        let a = Range::new(10, 20);
        assert!(a.overlaps(&Range::new(19, 30), 100));
        assert!(!a.overlaps(&Range::new(20, 30), 100));
        assert!(a.overlaps(&Range::new(95, 11), 100));
        assert!(!a.overlaps(&Range::new(95, 10), 100));
        assert!(Range::new(5, 5).overlaps(&Range::new(5, 5), 100));
        assert!(!Range::new(10, 10).overlaps(&a, 100));
        assert!(Range::new(15, 15).overlaps(&a, 100));
    }

    #[test]
    fn display_position_is_one_based() {
        let pos = DisplayPosition::from_index(0);
        assert_eq!(pos.get(), 1);
        assert_eq!(pos.to_index(), 0);
        assert_eq!(pos.to_string(), "1");
    }
}
