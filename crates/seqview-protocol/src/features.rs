//! Feature categories the viewer lays out: annotations, cut sites, search
//! matches, highlights and translation frames.

use crate::range::{lenient_position, Direction, Range, Ranged};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_ANNOTATION_COLOR: &str = "#9DEAED";
pub const DEFAULT_SEARCH_COLOR: &str = "#FBF719";
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#C6E2FF";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum AnnotationKind {
    Gene,
    Promoter,
    Terminator,
    Origin,
    #[default]
    Custom,
}

impl From<String> for AnnotationKind {
    fn from(kind: String) -> Self {
        AnnotationKind::from(kind.as_str())
    }
}

impl From<&str> for AnnotationKind {
    fn from(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "gene" | "cds" => AnnotationKind::Gene,
            "promoter" => AnnotationKind::Promoter,
            "terminator" => AnnotationKind::Terminator,
            "origin" | "ori" | "rep_origin" => AnnotationKind::Origin,
            _ => AnnotationKind::Custom,
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AnnotationKind::Gene => "gene",
            AnnotationKind::Promoter => "promoter",
            AnnotationKind::Terminator => "terminator",
            AnnotationKind::Origin => "origin",
            AnnotationKind::Custom => "custom",
        };
        write!(f, "{text}")
    }
}

fn default_annotation_color() -> String {
    DEFAULT_ANNOTATION_COLOR.to_string()
}

fn default_search_color() -> String {
    DEFAULT_SEARCH_COLOR.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: AnnotationKind,
    #[serde(default = "default_annotation_color")]
    pub color: String,
    #[serde(deserialize_with = "lenient_position")]
    pub start: usize,
    #[serde(deserialize_with = "lenient_position")]
    pub end: usize,
    #[serde(default)]
    pub direction: Direction,
}

impl Annotation {
    pub fn new(id: &str, name: &str, start: usize, end: usize, direction: Direction) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: AnnotationKind::Custom,
            color: default_annotation_color(),
            start,
            end,
            direction,
        }
    }

    pub fn with_kind(mut self, kind: AnnotationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enzyme {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// A restriction site. `start..end` is the recognition site; `fcut` and
/// `rcut` are the absolute indices at which the forward and reverse strands
/// are cut. They differ for enzymes leaving sticky ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutSite {
    pub id: String,
    pub enzyme: Enzyme,
    #[serde(deserialize_with = "lenient_position")]
    pub start: usize,
    #[serde(deserialize_with = "lenient_position")]
    pub end: usize,
    #[serde(default)]
    pub direction: Direction,
    #[serde(deserialize_with = "lenient_position")]
    pub fcut: usize,
    #[serde(deserialize_with = "lenient_position")]
    pub rcut: usize,
}

impl CutSite {
    pub fn new(id: &str, enzyme: &str, start: usize, end: usize, fcut: usize, rcut: usize) -> Self {
        Self {
            id: id.to_string(),
            enzyme: Enzyme {
                name: enzyme.to_string(),
                color: None,
            },
            start,
            end,
            direction: Direction::Forward,
            fcut,
            rcut,
        }
    }

    pub fn is_blunt(&self) -> bool {
        self.fcut == self.rcut
    }
}

/// A hit of the current search term. Recomputed whenever the term changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub id: String,
    pub name: String,
    #[serde(default = "default_search_color")]
    pub color: String,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub direction: Direction,
}

/// A caller-supplied coloured region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub id: String,
    #[serde(deserialize_with = "lenient_position")]
    pub start: usize,
    #[serde(deserialize_with = "lenient_position")]
    pub end: usize,
    #[serde(default)]
    pub color: Option<String>,
}

/// A region to show translated into amino acids. Reverse translations read
/// the reverse complement, starting from `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub id: String,
    #[serde(deserialize_with = "lenient_position")]
    pub start: usize,
    #[serde(deserialize_with = "lenient_position")]
    pub end: usize,
    #[serde(default)]
    pub direction: Direction,
}

/// Features whose position can be rewritten during ingestion.
pub trait Placed: Ranged {
    fn id(&self) -> &str;
    fn set_range(&mut self, range: Range);
}

macro_rules! impl_placed {
    (@placed $ty:ty) => {
        impl Placed for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn set_range(&mut self, range: Range) {
                self.start = range.start;
                self.end = range.end;
            }
        }
    };
    ($ty:ty) => {
        impl Ranged for $ty {
            fn range(&self) -> Range {
                Range::new(self.start, self.end).with_direction(self.direction)
            }
        }
        impl_placed!(@placed $ty);
    };
    ($ty:ty, undirected) => {
        impl Ranged for $ty {
            fn range(&self) -> Range {
                Range::new(self.start, self.end)
            }
        }
        impl_placed!(@placed $ty);
    };
}

impl_placed!(Annotation);
impl_placed!(CutSite);
impl_placed!(SearchMatch);
impl_placed!(Highlight, undirected);
impl_placed!(Translation);
