//! Standard genetic code and reading-frame translation.

use crate::iupac_code::IupacCode;
use seqview_protocol::{Direction, Range};
use serde::{Deserialize, Serialize};

/// NCBI translation table 1, codons enumerated in TCAG order.
const STANDARD_CODE: &[u8; 64] = b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

/// Amino acid reported for codons containing ambiguous or unknown bases.
pub const UNKNOWN_AMINO_ACID: u8 = b'X';

#[inline(always)]
fn base_index(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'T' | b'U' => Some(0),
        b'C' => Some(1),
        b'A' => Some(2),
        b'G' => Some(3),
        _ => None,
    }
}

pub fn translate_codon(codon: [u8; 3]) -> u8 {
    let [a, b, c] = codon;
    match (base_index(a), base_index(b), base_index(c)) {
        (Some(a), Some(b), Some(c)) => STANDARD_CODE[a * 16 + b * 4 + c],
        _ => UNKNOWN_AMINO_ACID,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AminoAcidClass {
    Nonpolar,
    Polar,
    Acidic,
    Basic,
    Stop,
    Other,
}

impl AminoAcidClass {
    pub fn of(amino_acid: u8) -> Self {
        match amino_acid.to_ascii_uppercase() {
            b'G' | b'A' | b'V' | b'L' | b'I' | b'P' | b'F' | b'M' | b'W' => AminoAcidClass::Nonpolar,
            b'S' | b'T' | b'C' | b'Y' | b'N' | b'Q' => AminoAcidClass::Polar,
            b'D' | b'E' => AminoAcidClass::Acidic,
            b'K' | b'R' | b'H' => AminoAcidClass::Basic,
            b'*' => AminoAcidClass::Stop,
            _ => AminoAcidClass::Other,
        }
    }
}

/// One translated codon. `positions` are the absolute indices of its bases in
/// reading order, so a reverse codon lists them descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codon {
    pub ordinal: usize,
    pub positions: [usize; 3],
    pub amino_acid: u8,
    pub class: AminoAcidClass,
}

impl Codon {
    /// The base under which the amino-acid letter is drawn.
    pub fn middle(&self) -> usize {
        self.positions[1]
    }
}

/// A reading frame over `range`. Forward frames read from `start`; reverse
/// frames read the complement strand from `end` towards `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadingFrame {
    range: Range,
    seq_len: usize,
}

impl ReadingFrame {
    pub fn new(range: Range, seq_len: usize) -> Self {
        Self { range, seq_len }
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn codon_count(&self) -> usize {
        if self.seq_len == 0 {
            return 0;
        }
        self.range.span(self.seq_len) / 3
    }

    fn position(&self, offset: usize) -> usize {
        let len = self.seq_len;
        if self.range.direction == Direction::Reverse {
            (self.range.end + len - 1 - offset % len) % len
        } else {
            (self.range.start + offset) % len
        }
    }

    fn offset_of(&self, index: usize) -> Option<usize> {
        if self.seq_len == 0 || !self.range.contains(index, self.seq_len) {
            return None;
        }
        let len = self.seq_len;
        let offset = if self.range.direction == Direction::Reverse {
            (self.range.end + len - 1 - index) % len
        } else {
            (index + len - self.range.start) % len
        };
        Some(offset)
    }

    fn base(&self, seq: &[u8], index: usize) -> u8 {
        let base = seq.get(index).copied().unwrap_or(b'N');
        if self.range.direction == Direction::Reverse {
            IupacCode::letter_complement(base, false)
        } else {
            base
        }
    }

    pub fn codon(&self, seq: &[u8], ordinal: usize) -> Codon {
        let positions = [
            self.position(ordinal * 3),
            self.position(ordinal * 3 + 1),
            self.position(ordinal * 3 + 2),
        ];
        let amino_acid = translate_codon(positions.map(|index| self.base(seq, index)));
        Codon {
            ordinal,
            positions,
            amino_acid,
            class: AminoAcidClass::of(amino_acid),
        }
    }

    /// Codons with at least one base inside `window`, in reading order.
    pub fn codons_in(&self, seq: &[u8], window: std::ops::Range<usize>) -> Vec<Codon> {
        let count = self.codon_count();
        let mut ordinals: Vec<usize> = window
            .filter_map(|index| self.offset_of(index))
            .map(|offset| offset / 3)
            .filter(|ordinal| *ordinal < count)
            .collect();
        ordinals.sort_unstable();
        ordinals.dedup();
        ordinals.into_iter().map(|ordinal| self.codon(seq, ordinal)).collect()
    }

    /// The whole frame as a protein string.
    pub fn protein(&self, seq: &[u8]) -> String {
        (0..self.codon_count())
            .map(|ordinal| self.codon(seq, ordinal).amino_acid as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_spot_checks() {
        assert_eq!(translate_codon(*b"ATG"), b'M');
        assert_eq!(translate_codon(*b"TTT"), b'F');
        assert_eq!(translate_codon(*b"TAA"), b'*');
        assert_eq!(translate_codon(*b"TGA"), b'*');
        assert_eq!(translate_codon(*b"TGG"), b'W');
        assert_eq!(translate_codon(*b"GGG"), b'G');
        assert_eq!(translate_codon(*b"aug"), b'M');
        assert_eq!(translate_codon(*b"ANG"), UNKNOWN_AMINO_ACID);
    }

    #[test]
    fn classes() {
        assert_eq!(AminoAcidClass::of(b'L'), AminoAcidClass::Nonpolar);
        assert_eq!(AminoAcidClass::of(b'S'), AminoAcidClass::Polar);
        assert_eq!(AminoAcidClass::of(b'E'), AminoAcidClass::Acidic);
        assert_eq!(AminoAcidClass::of(b'K'), AminoAcidClass::Basic);
        assert_eq!(AminoAcidClass::of(b'*'), AminoAcidClass::Stop);
        assert_eq!(AminoAcidClass::of(b'X'), AminoAcidClass::Other);
    }

    #[test]
    fn forward_frame() {
        let seq = b"CCATGAAATAGCC";
        let frame = ReadingFrame::new(Range::new(2, 11).with_direction(Direction::Forward), seq.len());
        assert_eq!(frame.protein(seq), "MK*");
        let codons = frame.codons_in(seq, 6..7);
        assert_eq!(codons.len(), 1);
        assert_eq!(codons[0].positions, [5, 6, 7]);
        assert_eq!(codons[0].amino_acid, b'K');
    }

    #[test]
    fn reverse_frame_reads_the_complement() {
        // reverse complement of CATTTCAT is ATGAAATG
        let seq = b"CATTTCAT";
        let frame = ReadingFrame::new(Range::new(0, 8).with_direction(Direction::Reverse), seq.len());
        assert_eq!(frame.protein(seq), "MK");
        assert_eq!(frame.codon(seq, 0).positions, [7, 6, 5]);
    }

    #[test]
    fn frame_through_the_origin() {
        let seq = b"GAAATAGCCAT";
        let frame = ReadingFrame::new(Range::new(9, 6).with_direction(Direction::Forward), seq.len());
        assert_eq!(frame.protein(seq), "MK");
        assert_eq!(frame.codon(seq, 0).positions, [9, 10, 0]);
    }
}
