//! Ingestion of caller-supplied positions. Out-of-range coordinates are
//! repaired and logged here so the layout path never has to fail.

use seqview_protocol::{CutSite, Placed, Range};
use thiserror::Error;

/// A repair applied to a feature's coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeIssue {
    #[error("{id}: start {start} is outside a sequence of length {seq_len}, clamped to {clamped}")]
    StartOutOfBounds {
        id: String,
        start: usize,
        seq_len: usize,
        clamped: usize,
    },
    #[error("{id}: end {end} is beyond a sequence of length {seq_len}, clamped to {clamped}")]
    EndOutOfBounds {
        id: String,
        end: usize,
        seq_len: usize,
        clamped: usize,
    },
    #[error("{id}: cut position {position} is beyond a sequence of length {seq_len}, clamped to {clamped}")]
    CutOutOfBounds {
        id: String,
        position: usize,
        seq_len: usize,
        clamped: usize,
    },
    #[error("{id}: the sequence is empty, position collapsed to 0")]
    EmptySequence { id: String },
}

/// Brings `range` into `[0, seq_len)` (with `end` allowed to equal
/// `seq_len`). Returns the repaired range and what was changed.
pub fn clamp_range(id: &str, range: Range, seq_len: usize) -> (Range, Vec<RangeIssue>) {
    let mut issues = vec![];
    if seq_len == 0 {
        if range.start != 0 || range.end != 0 {
            issues.push(RangeIssue::EmptySequence { id: id.to_string() });
        }
        return (Range::new(0, 0).with_direction(range.direction), issues);
    }

    let mut clamped = range;
    if range.is_point() {
        // A point may sit on the boundary after the last base.
        if range.start > seq_len {
            clamped.start = seq_len;
            clamped.end = seq_len;
            issues.push(RangeIssue::StartOutOfBounds {
                id: id.to_string(),
                start: range.start,
                seq_len,
                clamped: seq_len,
            });
        }
        return (clamped, issues);
    }
    if range.start >= seq_len {
        clamped.start = seq_len - 1;
        issues.push(RangeIssue::StartOutOfBounds {
            id: id.to_string(),
            start: range.start,
            seq_len,
            clamped: clamped.start,
        });
    }
    if range.end > seq_len {
        clamped.end = seq_len;
        issues.push(RangeIssue::EndOutOfBounds {
            id: id.to_string(),
            end: range.end,
            seq_len,
            clamped: clamped.end,
        });
    }
    (clamped, issues)
}

fn clamp_cut(id: &str, position: usize, seq_len: usize, issues: &mut Vec<RangeIssue>) -> usize {
    if position <= seq_len {
        return position;
    }
    issues.push(RangeIssue::CutOutOfBounds {
        id: id.to_string(),
        position,
        seq_len,
        clamped: seq_len,
    });
    seq_len
}

fn report(issues: &[RangeIssue]) {
    for issue in issues {
        log::warn!("{issue}");
    }
}

/// Clamps every feature to the sequence, logging each repair. Nothing is
/// dropped: a feature that cannot be placed sensibly still gets a valid range.
pub fn ingest<T: Placed>(mut features: Vec<T>, seq_len: usize) -> Vec<T> {
    for feature in features.iter_mut() {
        let (range, issues) = clamp_range(feature.id(), feature.range(), seq_len);
        if !issues.is_empty() {
            report(&issues);
            feature.set_range(range);
        }
    }
    features
}

/// Like [`ingest`], additionally clamping the strand cut positions.
pub fn ingest_cut_sites(sites: Vec<CutSite>, seq_len: usize) -> Vec<CutSite> {
    let mut sites = ingest(sites, seq_len);
    for site in sites.iter_mut() {
        let mut issues = vec![];
        site.fcut = clamp_cut(&site.id, site.fcut, seq_len, &mut issues);
        site.rcut = clamp_cut(&site.id, site.rcut, seq_len, &mut issues);
        report(&issues);
    }
    sites
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqview_protocol::{Annotation, Direction};

    #[test]
    fn in_bounds_ranges_are_untouched() {
        let (range, issues) = clamp_range("a", Range::new(90, 10), 100);
        assert_eq!(range, Range::new(90, 10));
        assert!(issues.is_empty());
        let (range, issues) = clamp_range("a", Range::new(0, 100), 100);
        assert_eq!(range, Range::new(0, 100));
        assert!(issues.is_empty());
    }

    #[test]
    fn out_of_bounds_positions_are_clamped() {
        let (range, issues) = clamp_range("a", Range::new(150, 180), 100);
        assert_eq!(range, Range::new(99, 100));
        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0], RangeIssue::StartOutOfBounds { start: 150, .. }));
        assert_eq!(
            issues[1].to_string(),
            "a: end 180 is beyond a sequence of length 100, clamped to 100"
        );
    }

    #[test]
    fn points_stay_zero_width() {
        let (range, issues) = clamp_range("p", Range::new(100, 100), 100);
        assert_eq!(range, Range::new(100, 100));
        assert!(issues.is_empty());
        let (range, issues) = clamp_range("p", Range::new(130, 130), 100);
        assert_eq!(range, Range::new(100, 100));
        assert!(range.is_point());
        assert!(matches!(issues[..], [RangeIssue::StartOutOfBounds { start: 130, clamped: 100, .. }]));
    }

    #[test]
    fn empty_sequence_collapses_everything() {
        let (range, issues) = clamp_range("a", Range::new(3, 7), 0);
        assert_eq!(range, Range::new(0, 0));
        assert_eq!(issues, vec![RangeIssue::EmptySequence { id: "a".to_string() }]);
    }

    #[test]
    fn ingest_keeps_every_feature() {
        let annotations = vec![
            Annotation::new("ok", "ok", 10, 20, Direction::Forward),
            Annotation::new("bad", "bad", 10, 500, Direction::Reverse),
        ];
        let ingested = ingest(annotations, 100);
        assert_eq!(ingested.len(), 2);
        assert_eq!((ingested[0].start, ingested[0].end), (10, 20));
        assert_eq!((ingested[1].start, ingested[1].end), (10, 100));
        assert_eq!(ingested[1].direction, Direction::Reverse);
    }

    #[test]
    fn cut_positions_are_clamped() {
        let sites = vec![CutSite::new("c", "EcoRI", 95, 101, 96, 104)];
        let sites = ingest_cut_sites(sites, 100);
        assert_eq!((sites[0].start, sites[0].end), (95, 100));
        assert_eq!((sites[0].fcut, sites[0].rcut), (96, 100));
    }
}
