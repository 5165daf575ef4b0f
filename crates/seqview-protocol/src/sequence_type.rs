use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceType {
    #[default]
    Dna,
    Rna,
    #[serde(alias = "protein")]
    Aa,
    Unknown,
}

impl SequenceType {
    pub fn is_nucleotide(self) -> bool {
        matches!(self, SequenceType::Dna | SequenceType::Rna)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SequenceType::Dna => "dna",
            SequenceType::Rna => "rna",
            SequenceType::Aa => "aa",
            SequenceType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SequenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Linear,
    Circular,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Linear => ViewMode::Circular,
            ViewMode::Circular => ViewMode::Linear,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Linear => f.write_str("linear"),
            ViewMode::Circular => f.write_str("circular"),
        }
    }
}
