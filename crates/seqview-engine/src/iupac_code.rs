use lazy_static::lazy_static;
use regex::Regex;
use seqview_protocol::SequenceType;

const DNA_BITMASK_A: u8 = 1;
const DNA_BITMASK_C: u8 = 2;
const DNA_BITMASK_G: u8 = 4;
const DNA_BITMASK_T: u8 = 8;
const DNA_BITMASK_N: u8 = DNA_BITMASK_A | DNA_BITMASK_C | DNA_BITMASK_G | DNA_BITMASK_T;

/// Letters with an IUPAC meaning, in the order search classes list them.
pub const IUPAC_LETTERS: &[u8] = b"ACGTUWSMKRYBDHVN";

/// Number of leading characters [`guess_type`] looks at.
pub const TYPE_SAMPLE_LEN: usize = 1000;

lazy_static! {
    static ref DNA_ALPHABET: Regex = Regex::new(r"(?i)^[ATGCN]+$").unwrap();
    static ref RNA_ALPHABET: Regex = Regex::new(r"(?i)^[AUGCN]+$").unwrap();
    static ref AA_ALPHABET: Regex = Regex::new(r"(?i)^[ACDEFGHIKLMNPQRSTVWY*]+$").unwrap();
}

/// A bitmasked IUPAC code for nucleotides, eg DNA_BITMASK_A|DNA_BITMASK_C.
/// U shares the T bit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct IupacCode(u8);

impl IupacCode {
    pub fn new(bitmask: u8) -> Self {
        Self(bitmask & DNA_BITMASK_N)
    }

    #[inline(always)]
    pub fn from_letter(letter: u8) -> Self {
        match letter.to_ascii_uppercase() {
            b'A' => Self(DNA_BITMASK_A),
            b'C' => Self(DNA_BITMASK_C),
            b'G' => Self(DNA_BITMASK_G),
            b'T' | b'U' => Self(DNA_BITMASK_T),
            b'W' => Self(DNA_BITMASK_A | DNA_BITMASK_T),
            b'S' => Self(DNA_BITMASK_C | DNA_BITMASK_G),
            b'M' => Self(DNA_BITMASK_A | DNA_BITMASK_C),
            b'K' => Self(DNA_BITMASK_G | DNA_BITMASK_T),
            b'R' => Self(DNA_BITMASK_A | DNA_BITMASK_G),
            b'Y' => Self(DNA_BITMASK_C | DNA_BITMASK_T),
            b'B' => Self(DNA_BITMASK_C | DNA_BITMASK_G | DNA_BITMASK_T),
            b'D' => Self(DNA_BITMASK_A | DNA_BITMASK_G | DNA_BITMASK_T),
            b'H' => Self(DNA_BITMASK_A | DNA_BITMASK_C | DNA_BITMASK_T),
            b'V' => Self(DNA_BITMASK_A | DNA_BITMASK_C | DNA_BITMASK_G),
            b'N' => Self(DNA_BITMASK_N),
            _ => Self(0),
        }
    }

    /// The canonical upper-case letter for this code. `rna` selects U over T.
    pub fn to_letter(self, rna: bool) -> Option<u8> {
        let letter = match self.0 {
            DNA_BITMASK_A => b'A',
            DNA_BITMASK_C => b'C',
            DNA_BITMASK_G => b'G',
            DNA_BITMASK_T if rna => b'U',
            DNA_BITMASK_T => b'T',
            0b1001 => b'W',
            0b0110 => b'S',
            0b0011 => b'M',
            0b1100 => b'K',
            0b0101 => b'R',
            0b1010 => b'Y',
            0b1110 => b'B',
            0b1101 => b'D',
            0b1011 => b'H',
            0b0111 => b'V',
            DNA_BITMASK_N => b'N',
            _ => return None,
        };
        Some(letter)
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub fn subset(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Whether every base `self` stands for is also allowed by `other`.
    #[inline(always)]
    pub fn is_within(self, other: Self) -> bool {
        !self.is_empty() && self.0 & other.0 == self.0
    }

    /// Swaps A with T and C with G on every bit of the code.
    #[inline(always)]
    pub fn complement(self) -> Self {
        let a = self.0 & DNA_BITMASK_A;
        let c = self.0 & DNA_BITMASK_C;
        let g = self.0 & DNA_BITMASK_G;
        let t = self.0 & DNA_BITMASK_T;
        Self((a << 3) | (c << 1) | (g >> 1) | (t >> 3))
    }

    #[inline(always)]
    pub fn is_valid_letter(letter: u8) -> bool {
        IUPAC_LETTERS.contains(&letter.to_ascii_uppercase())
    }

    #[inline(always)]
    pub fn to_vec(&self) -> Vec<u8> {
        let mut ret = Vec::with_capacity(4);
        if self.0 & DNA_BITMASK_A != 0 {
            ret.push(b'A');
        }
        if self.0 & DNA_BITMASK_C != 0 {
            ret.push(b'C');
        }
        if self.0 & DNA_BITMASK_G != 0 {
            ret.push(b'G');
        }
        if self.0 & DNA_BITMASK_T != 0 {
            ret.push(b'T');
        }
        ret
    }

    /// Complement of a single letter, keeping its case. Letters without an
    /// IUPAC meaning come back unchanged.
    #[inline(always)]
    pub fn letter_complement(letter: u8, rna: bool) -> u8 {
        let code = Self::from_letter(letter);
        match code.complement().to_letter(rna) {
            Some(complement) if !code.is_empty() => {
                if letter.is_ascii_lowercase() {
                    complement.to_ascii_lowercase()
                } else {
                    complement
                }
            }
            _ => letter,
        }
    }
}

/// Base-by-base complement. Amino-acid sequences have no complement and
/// yield an empty string.
pub fn complement(seq: &str, seq_type: SequenceType) -> String {
    if seq_type == SequenceType::Aa {
        return String::new();
    }
    let rna = seq_type == SequenceType::Rna;
    seq.chars()
        .map(|c| {
            if c.is_ascii() {
                IupacCode::letter_complement(c as u8, rna) as char
            } else {
                c
            }
        })
        .collect()
}

pub fn reverse_complement(seq: &str, seq_type: SequenceType) -> String {
    complement(seq, seq_type).chars().rev().collect()
}

/// Infers the sequence type from its first [`TYPE_SAMPLE_LEN`] characters.
/// DNA is tested before RNA before amino acids; the first alphabet that
/// covers the whole sample wins.
pub fn guess_type(seq: &str) -> SequenceType {
    let sample = match seq.char_indices().nth(TYPE_SAMPLE_LEN) {
        Some((cut, _)) => &seq[..cut],
        None => seq,
    };
    if DNA_ALPHABET.is_match(sample) {
        SequenceType::Dna
    } else if RNA_ALPHABET.is_match(sample) {
        SequenceType::Rna
    } else if AA_ALPHABET.is_match(sample) {
        SequenceType::Aa
    } else {
        SequenceType::Unknown
    }
}

/// Uppercases the sequence and drops whitespace. Nucleotide sequences get
/// every non-IUPAC character replaced by N, everything else gets non-ASCII
/// characters replaced by X, so one base is always one byte.
pub fn sanitize_sequence(seq: &str, seq_type: SequenceType) -> String {
    seq.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| {
            let upper = c.to_ascii_uppercase();
            if seq_type.is_nucleotide() {
                if upper.is_ascii() && IupacCode::is_valid_letter(upper as u8) {
                    upper
                } else {
                    'N'
                }
            } else if upper.is_ascii() {
                upper
            } else {
                'X'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_base2iupac() {
        assert!(
            !IupacCode::from_letter(b'V')
                .subset(IupacCode::from_letter(b'G'))
                .is_empty()
        );
        assert!(
            IupacCode::from_letter(b'H')
                .subset(IupacCode::from_letter(b'G'))
                .is_empty()
        );
        assert_eq!(IupacCode::from_letter(b'U'), IupacCode::new(DNA_BITMASK_T));
        assert_eq!(IupacCode::from_letter(b'X'), IupacCode::new(0));
        assert!(IupacCode::from_letter(b'A').is_within(IupacCode::from_letter(b'R')));
        assert!(!IupacCode::from_letter(b'R').is_within(IupacCode::from_letter(b'A')));
    }

    #[test]
    fn test_split_iupac() {
        assert_eq!(IupacCode::from_letter(b'R').to_vec(), vec![b'A', b'G']);
        assert_eq!(IupacCode::from_letter(b'N').to_vec(), vec![b'A', b'C', b'G', b'T']);
    }

    #[test]
    fn every_letter_maps_back_to_itself() {
        for &letter in IUPAC_LETTERS.iter().filter(|l| **l != b'U') {
            assert_eq!(IupacCode::from_letter(letter).to_letter(false), Some(letter));
        }
        assert_eq!(IupacCode::from_letter(b'U').to_letter(true), Some(b'U'));
    }

    #[test]
    fn test_complement() {
        assert_eq!(complement("ATGC", SequenceType::Dna), "TACG");
        assert_eq!(complement("atgc", SequenceType::Dna), "tacg");
        assert_eq!(complement("AUGC", SequenceType::Rna), "UACG");
        assert_eq!(complement("RYKMBVDHSWN", SequenceType::Dna), "YRMKVBHDSWN");
        assert_eq!(complement("N", SequenceType::Dna), "N");
        assert_eq!(complement("AT-X", SequenceType::Dna), "TA-X");
        assert_eq!(complement("MVLSPADK", SequenceType::Aa), "");
    }

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement("GAATTCA", SequenceType::Dna), "TGAATTC");
        assert_eq!(reverse_complement("", SequenceType::Dna), "");
    }

    #[test]
    fn guess_type_by_alphabet() {
        assert_eq!(guess_type("ATGCATGC"), SequenceType::Dna);
        assert_eq!(guess_type("atgcnn"), SequenceType::Dna);
        assert_eq!(guess_type("AUGCAUGC"), SequenceType::Rna);
        assert_eq!(guess_type("MVLSPADKTNVKAA"), SequenceType::Aa);
        assert_eq!(guess_type(""), SequenceType::Unknown);
        assert_eq!(guess_type("ATG CAT"), SequenceType::Unknown);
    }

    #[test]
    fn guess_type_only_samples_the_head() {
        let mut seq = "A".repeat(TYPE_SAMPLE_LEN);
        seq.push_str("!!!");
        assert_eq!(guess_type(&seq), SequenceType::Dna);
    }

    #[test]
    fn sanitize_replaces_unknown_letters() {
        assert_eq!(sanitize_sequence("ac gt\nxz", SequenceType::Dna), "ACGTNN");
        assert_eq!(sanitize_sequence("mv ls", SequenceType::Aa), "MVLS");
        assert_eq!(sanitize_sequence("mvké€ ls", SequenceType::Aa), "MVKXXLS");
        assert_eq!(sanitize_sequence("atµg", SequenceType::Unknown), "ATXG");
        assert_eq!(sanitize_sequence("atµg", SequenceType::Dna), "ATNG");
    }

    proptest! {
        #[test]
        fn complement_is_an_involution(seq in "[ATGC]{0,200}") {
            let twice = complement(&complement(&seq, SequenceType::Dna), SequenceType::Dna);
            prop_assert_eq!(twice, seq);
        }

        #[test]
        fn reverse_complement_preserves_length(seq in "[ATGCatgcN]{0,200}") {
            prop_assert_eq!(reverse_complement(&seq, SequenceType::Dna).len(), seq.len());
        }
    }
}
