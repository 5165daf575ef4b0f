//! Shared machine-readable contracts of the sequence viewer.
//!
//! Everything here is plain data exchanged with callers: positions, feature
//! lists, the selection and the view mode. Positions are 0-based half-open
//! throughout; [`DisplayPosition`] is the only 1-based value.

pub mod features;
pub mod range;
pub mod selection;
pub mod sequence_type;

pub use features::{
    Annotation, AnnotationKind, CutSite, Enzyme, Highlight, Placed, SearchMatch, Translation,
    DEFAULT_ANNOTATION_COLOR, DEFAULT_HIGHLIGHT_COLOR, DEFAULT_SEARCH_COLOR,
};
pub use range::{Direction, DisplayPosition, Range, Ranged};
pub use selection::{CentralIndex, Selection};
pub use sequence_type::{SequenceType, ViewMode};
