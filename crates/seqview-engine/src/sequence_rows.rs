//! Row packing: stacks overlapping features into rows of mutually
//! non-overlapping ones.

use itertools::Itertools;
use seqview_protocol::{Annotation, CutSite, Highlight, Range, Ranged, SearchMatch, Translation};
use std::sync::Arc;

pub type Row<T> = Vec<T>;
pub type RowSet<T> = Vec<Row<T>>;

/// Whether `row` can take `candidate` after its last element.
///
/// Candidates arrive sorted by start, so the last element of a row has the
/// furthest end. A wrapping element closes its row for good. A wrapping
/// candidate must also clear the row's first element with its tail.
fn admits<T: Ranged>(row: &[T], candidate: &Range, seq_len: usize) -> bool {
    let (Some(first), Some(last)) = (row.first(), row.last()) else {
        return true;
    };
    let first = first.range();
    let last = last.range();

    let last_end = if last.wraps() { last.end + seq_len } else { last.end };
    if last_end > candidate.start {
        return false;
    }
    if last.is_point() && candidate.is_point() && last.start == candidate.start {
        return false;
    }
    if candidate.wraps() && candidate.end > first.start {
        return false;
    }
    true
}

/// Greedy interval packing on a circular sequence of length `seq_len`.
///
/// Features are sorted by end, then (stably) by start, and each goes into the
/// first row that admits it. Every feature lands in exactly one row; the row
/// count is deterministic for a given input order but not necessarily
/// minimal. Point features sit in a single row like any other feature.
pub fn pack<T: Ranged + Clone>(items: &[T], seq_len: usize) -> RowSet<T> {
    let mut rows: RowSet<T> = vec![];
    let sorted = items
        .iter()
        .sorted_by_key(|item| item.range().end)
        .sorted_by_key(|item| item.range().start);
    for item in sorted {
        let range = item.range();
        match rows.iter_mut().find(|row| admits(row, &range, seq_len)) {
            Some(row) => row.push(item.clone()),
            None => rows.push(vec![item.clone()]),
        }
    }
    rows
}

/// The features of one sequence, shared between the layout and the caller.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    pub annotations: Vec<Arc<Annotation>>,
    pub cut_sites: Vec<Arc<CutSite>>,
    pub search_matches: Vec<Arc<SearchMatch>>,
    pub highlights: Vec<Arc<Highlight>>,
    pub translations: Vec<Arc<Translation>>,
}

impl FeatureSet {
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
            && self.cut_sites.is_empty()
            && self.search_matches.is_empty()
            && self.highlights.is_empty()
            && self.translations.is_empty()
    }
}

/// Packed rows for every feature category.
#[derive(Debug, Clone, Default)]
pub struct LayoutRows {
    pub annotations: RowSet<Arc<Annotation>>,
    pub cut_sites: RowSet<Arc<CutSite>>,
    pub search_matches: RowSet<Arc<SearchMatch>>,
    pub highlights: RowSet<Arc<Highlight>>,
    pub translations: RowSet<Arc<Translation>>,
}

impl LayoutRows {
    pub fn pack(features: &FeatureSet, seq_len: usize) -> Self {
        Self {
            annotations: pack(&features.annotations, seq_len),
            cut_sites: pack(&features.cut_sites, seq_len),
            search_matches: pack(&features.search_matches, seq_len),
            highlights: pack(&features.highlights, seq_len),
            translations: pack(&features.translations, seq_len),
        }
    }

    /// Total number of rows across all categories.
    pub fn depth(&self) -> usize {
        self.annotations.len()
            + self.cut_sites.len()
            + self.search_matches.len()
            + self.highlights.len()
            + self.translations.len()
    }
}
