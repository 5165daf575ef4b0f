//! Deterministic layout engine of the sequence viewer.
//!
//! Pure functions and small resumable jobs, no rendering and no I/O:
//! coordinate transforms, nucleotide codes, translation, range ingestion,
//! row packing, block fragmentation and search.

pub mod feature_location;
pub mod genetic_code;
pub mod geometry;
pub mod iupac_code;
pub mod search;
pub mod sequence_blocks;
pub mod sequence_rows;

pub use feature_location::{RangeIssue, clamp_range, ingest, ingest_cut_sites};
pub use genetic_code::{AminoAcidClass, Codon, ReadingFrame, translate_codon};
pub use geometry::{CircularFrame, Point, index_at_offset, index_from_x, to_cartesian, to_polar};
pub use iupac_code::{IupacCode, complement, guess_type, reverse_complement, sanitize_sequence};
pub use search::{ScanState, SearchError, SearchPattern, SearchScan, search};
pub use sequence_blocks::{Block, Fragment, block_count, block_for_index, fragment, fragment_rows, fragment_window};
pub use sequence_rows::{FeatureSet, LayoutRows, Row, RowSet, pack};
