//! Cuts packed rows into fixed-width blocks for the linear view.

use crate::sequence_rows::{LayoutRows, RowSet};
use seqview_protocol::{Annotation, CutSite, Highlight, Ranged, SearchMatch, Translation};
use std::sync::Arc;

/// The part of a feature that falls inside one block. `start` and `end` are
/// relative to the block start.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment<T> {
    pub item: T,
    pub start: usize,
    pub end: usize,
    /// The feature carries on in an earlier block (or through the origin).
    pub continues_left: bool,
    /// The feature carries on in a later block (or through the origin).
    pub continues_right: bool,
}

impl<T> Fragment<T> {
    pub fn width(&self) -> usize {
        self.end - self.start
    }

    pub fn is_point(&self) -> bool {
        self.start == self.end
    }
}

/// One line of the linear view: `[start, end)` of the sequence and the
/// fragments of every row that touch it. Rows without a fragment in this
/// block are left out.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub id: String,
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub annotations: RowSet<Fragment<Arc<Annotation>>>,
    pub cut_sites: RowSet<Fragment<Arc<CutSite>>>,
    pub search_matches: RowSet<Fragment<Arc<SearchMatch>>>,
    pub highlights: RowSet<Fragment<Arc<Highlight>>>,
    pub translations: RowSet<Fragment<Arc<Translation>>>,
}

impl Block {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }
}

pub fn block_count(seq_len: usize, block_width: usize) -> usize {
    if block_width == 0 {
        return 0;
    }
    seq_len.div_ceil(block_width)
}

/// The block showing `index`. The last block owns the end position.
pub fn block_for_index(index: usize, seq_len: usize, block_width: usize) -> usize {
    let count = block_count(seq_len, block_width);
    if count == 0 {
        return 0;
    }
    (index / block_width).min(count - 1)
}

/// Fragments of every row over the blocks in `window`. The result has one
/// row set per block of the window, with empty rows removed.
pub fn fragment_rows<T: Ranged + Clone>(
    rows: &RowSet<T>,
    seq_len: usize,
    block_width: usize,
    window: std::ops::Range<usize>,
) -> Vec<RowSet<Fragment<T>>> {
    let window = window.start..window.end.min(block_count(seq_len, block_width));
    let width = window.len();
    if width == 0 {
        return vec![];
    }
    let mut per_block: Vec<RowSet<Fragment<T>>> =
        (0..width).map(|_| (0..rows.len()).map(|_| vec![]).collect()).collect();

    for (row_index, row) in rows.iter().enumerate() {
        for item in row {
            let range = item.range();
            let wraps = range.wraps();
            let runs_on = wraps && range.end > 0;

            if range.is_point() {
                let block = block_for_index(range.start, seq_len, block_width);
                if window.contains(&block) {
                    let offset = range.start - block * block_width;
                    per_block[block - window.start][row_index].push(Fragment {
                        item: item.clone(),
                        start: offset,
                        end: offset,
                        continues_left: false,
                        continues_right: false,
                    });
                }
                continue;
            }

            for (segment_index, segment) in range.segments(seq_len).enumerate() {
                if segment.is_empty() {
                    continue;
                }
                let is_head = segment_index == 0;
                let first = segment.start / block_width;
                let last = (segment.end - 1) / block_width;
                let from = first.max(window.start);
                let to = last.min(window.end.saturating_sub(1));
                for block in from..=to {
                    let block_start = block * block_width;
                    let block_end = (block_start + block_width).min(seq_len);
                    let start = segment.start.max(block_start);
                    let end = segment.end.min(block_end);
                    per_block[block - window.start][row_index].push(Fragment {
                        item: item.clone(),
                        start: start - block_start,
                        end: end - block_start,
                        continues_left: start > segment.start || (runs_on && !is_head),
                        continues_right: end < segment.end || (runs_on && is_head),
                    });
                }
            }
        }
    }

    per_block
        .into_iter()
        .map(|rows| rows.into_iter().filter(|row| !row.is_empty()).collect())
        .collect()
}

/// Blocks `window` of the linear layout.
pub fn fragment_window(
    rows: &LayoutRows,
    seq_len: usize,
    block_width: usize,
    window: std::ops::Range<usize>,
) -> Vec<Block> {
    let window = window.start..window.end.min(block_count(seq_len, block_width));
    let mut annotations = fragment_rows(&rows.annotations, seq_len, block_width, window.clone()).into_iter();
    let mut cut_sites = fragment_rows(&rows.cut_sites, seq_len, block_width, window.clone()).into_iter();
    let mut search_matches =
        fragment_rows(&rows.search_matches, seq_len, block_width, window.clone()).into_iter();
    let mut highlights = fragment_rows(&rows.highlights, seq_len, block_width, window.clone()).into_iter();
    let mut translations =
        fragment_rows(&rows.translations, seq_len, block_width, window.clone()).into_iter();

    window
        .map(|index| {
            let start = index * block_width;
            Block {
                id: format!("block-{index}"),
                index,
                start,
                end: (start + block_width).min(seq_len),
                annotations: annotations.next().unwrap_or_default(),
                cut_sites: cut_sites.next().unwrap_or_default(),
                search_matches: search_matches.next().unwrap_or_default(),
                highlights: highlights.next().unwrap_or_default(),
                translations: translations.next().unwrap_or_default(),
            }
        })
        .collect()
}

/// Every block of the linear layout.
pub fn fragment(rows: &LayoutRows, seq_len: usize, block_width: usize) -> Vec<Block> {
    fragment_window(rows, seq_len, block_width, 0..block_count(seq_len, block_width))
}
