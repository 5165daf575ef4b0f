//! Sequence search with IUPAC ambiguity codes, run as a resumable scan so the
//! caller can spread a multi-megabase search over several turns.

use crate::iupac_code::{IUPAC_LETTERS, IupacCode, reverse_complement};
use regex::bytes::{Regex, RegexBuilder};
use seqview_protocol::{DEFAULT_SEARCH_COLOR, Direction, SearchMatch, SequenceType};
use std::sync::Arc;
use thiserror::Error;

const AMINO_ACID_LETTERS: &[u8] = b"ACDEFGHIKLMNPQRSTVWYX*";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search term is empty")]
    EmptyTerm,
    #[error("'{letter}' is not valid in a {seq_type} search")]
    InvalidLetter { letter: char, seq_type: SequenceType },
    #[error("search pattern could not be built: {0}")]
    Pattern(#[from] regex::Error),
}

/// Turns a search term into a regex over sequence bytes. Nucleotide codes
/// match every letter whose bases they include, so `R` finds A, G and R.
fn pattern_for(term: &str, seq_type: SequenceType) -> Result<String, SearchError> {
    let mut pattern = String::with_capacity(term.len() * 8);
    for letter in term.bytes() {
        let upper = letter.to_ascii_uppercase();
        match seq_type {
            SequenceType::Dna | SequenceType::Rna => {
                if !IupacCode::is_valid_letter(upper) {
                    return Err(SearchError::InvalidLetter {
                        letter: letter as char,
                        seq_type,
                    });
                }
                let code = IupacCode::from_letter(upper);
                let class: String = IUPAC_LETTERS
                    .iter()
                    .filter(|candidate| IupacCode::from_letter(**candidate).is_within(code))
                    .map(|candidate| *candidate as char)
                    .collect();
                pattern.push('[');
                pattern.push_str(&class);
                pattern.push(']');
            }
            SequenceType::Aa => {
                if !AMINO_ACID_LETTERS.contains(&upper) {
                    return Err(SearchError::InvalidLetter {
                        letter: letter as char,
                        seq_type,
                    });
                }
                if upper == b'X' {
                    pattern.push('.');
                } else {
                    pattern.push_str(&regex::escape(&(upper as char).to_string()));
                }
            }
            SequenceType::Unknown => {
                pattern.push_str(&regex::escape(&(letter as char).to_string()));
            }
        }
    }
    Ok(pattern)
}

fn compile(pattern: &str) -> Result<Regex, SearchError> {
    Ok(RegexBuilder::new(pattern)
        .case_insensitive(true)
        .unicode(false)
        .build()?)
}

/// A compiled search term, plus its reverse complement for nucleotides.
#[derive(Debug, Clone)]
pub struct SearchPattern {
    term: String,
    width: usize,
    forward: Regex,
    reverse: Option<Regex>,
}

impl SearchPattern {
    pub fn new(term: &str, seq_type: SequenceType) -> Result<Self, SearchError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(SearchError::EmptyTerm);
        }
        if !term.is_ascii() {
            let letter = term.chars().find(|c| !c.is_ascii()).unwrap_or('?');
            return Err(SearchError::InvalidLetter { letter, seq_type });
        }
        let forward_pattern = pattern_for(term, seq_type)?;
        let reverse = if seq_type.is_nucleotide() {
            let reverse_pattern = pattern_for(&reverse_complement(term, seq_type), seq_type)?;
            if reverse_pattern == forward_pattern {
                None
            } else {
                Some(compile(&reverse_pattern)?)
            }
        } else {
            None
        };
        Ok(Self {
            term: term.to_string(),
            width: term.len(),
            forward: compile(&forward_pattern)?,
            reverse,
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the reverse strand is searched separately. Palindromic
    /// terms are found once, on the forward strand.
    pub fn searches_reverse_strand(&self) -> bool {
        self.reverse.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Running { scanned: usize, total: usize },
    Done,
}

#[derive(Debug, Clone)]
enum Haystack {
    Shared(Arc<str>),
    Extended(Vec<u8>),
}

impl Haystack {
    fn bytes(&self) -> &[u8] {
        match self {
            Haystack::Shared(seq) => seq.as_bytes(),
            Haystack::Extended(bytes) => bytes,
        }
    }
}

/// A resumable search over one sequence. Each [`SearchScan::step`] examines
/// at most `budget` start positions on both strands.
#[derive(Debug, Clone)]
pub struct SearchScan {
    pattern: SearchPattern,
    haystack: Haystack,
    seq_len: usize,
    circular: bool,
    positions: usize,
    cursor: usize,
    max_matches: usize,
    matches: Vec<SearchMatch>,
    truncated: bool,
}

impl SearchScan {
    pub fn new(pattern: SearchPattern, seq: Arc<str>, circular: bool, max_matches: usize) -> Self {
        let seq_len = seq.len();
        let width = pattern.width();
        let (haystack, positions) = if circular && width > seq_len {
            (Haystack::Shared(seq), 0)
        } else if circular && width > 1 {
            let mut bytes = Vec::with_capacity(seq_len + width - 1);
            bytes.extend_from_slice(seq.as_bytes());
            bytes.extend(seq.as_bytes().iter().cycle().take(width - 1));
            (Haystack::Extended(bytes), seq_len)
        } else if circular {
            (Haystack::Shared(seq), seq_len)
        } else {
            (Haystack::Shared(seq), (seq_len + 1).saturating_sub(width))
        };
        Self {
            pattern,
            haystack,
            seq_len,
            circular,
            positions,
            cursor: 0,
            max_matches,
            matches: vec![],
            truncated: false,
        }
    }

    pub fn term(&self) -> &str {
        self.pattern.term()
    }

    pub fn is_done(&self) -> bool {
        self.cursor >= self.positions || self.truncated
    }

    /// True when the scan stopped at the match limit.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    pub fn into_matches(self) -> Vec<SearchMatch> {
        self.matches
    }

    fn record(&mut self, start: usize, direction: Direction) {
        let end = start + self.pattern.width();
        let end = if self.circular && end > self.seq_len {
            end - self.seq_len
        } else {
            end
        };
        let strand = if direction == Direction::Reverse { "rev" } else { "fwd" };
        self.matches.push(SearchMatch {
            id: format!("search-{start}-{strand}"),
            name: self.pattern.term().to_string(),
            color: DEFAULT_SEARCH_COLOR.to_string(),
            start,
            end,
            direction,
        });
    }

    fn scan_strand(&mut self, reverse: bool, from: usize, to: usize) {
        let width = self.pattern.width();
        let regex = match (reverse, &self.pattern.reverse) {
            (false, _) => self.pattern.forward.clone(),
            (true, Some(regex)) => regex.clone(),
            (true, None) => return,
        };
        let direction = if reverse { Direction::Reverse } else { Direction::Forward };
        let bytes = self.haystack.bytes();
        let window_end = (to + width - 1).min(bytes.len());
        let window = &bytes[..window_end];
        let mut starts = vec![];
        let mut at = from;
        while at < to {
            let Some(found) = regex.find_at(window, at) else {
                break;
            };
            if found.start() >= to {
                break;
            }
            starts.push(found.start());
            at = found.start() + 1;
        }
        for start in starts {
            if self.matches.len() >= self.max_matches {
                self.truncated = true;
                return;
            }
            self.record(start, direction);
        }
    }

    /// Examines the next `budget` start positions.
    pub fn step(&mut self, budget: usize) -> ScanState {
        if self.is_done() {
            return ScanState::Done;
        }
        let from = self.cursor;
        let to = from.saturating_add(budget.max(1)).min(self.positions);
        self.scan_strand(false, from, to);
        if !self.truncated {
            self.scan_strand(true, from, to);
        }
        self.cursor = to;

        if self.is_done() {
            self.matches.sort_by_key(|m| (m.start, m.direction.is_reverse()));
            log::debug!(
                "search for '{}' finished with {} matches{}",
                self.pattern.term(),
                self.matches.len(),
                if self.truncated { " (truncated)" } else { "" }
            );
            ScanState::Done
        } else {
            ScanState::Running {
                scanned: self.cursor,
                total: self.positions,
            }
        }
    }

    /// Runs the remaining scan in one go.
    pub fn finish(mut self) -> Self {
        while self.step(usize::MAX) != ScanState::Done {}
        self
    }
}

/// One-shot search, for callers that do not need chunking.
pub fn search(
    term: &str,
    seq: Arc<str>,
    seq_type: SequenceType,
    circular: bool,
    max_matches: usize,
) -> Result<Vec<SearchMatch>, SearchError> {
    let pattern = SearchPattern::new(term, seq_type)?;
    Ok(SearchScan::new(pattern, seq, circular, max_matches)
        .finish()
        .into_matches())
}
