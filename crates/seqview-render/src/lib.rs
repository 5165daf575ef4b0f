//! Headless renderers of the sequence viewer.
//!
//! Each renderer turns a laid-out scene into an SVG string plus the list of
//! interactive elements it drew, so the caller can mount them in an
//! [`ElementRegistry`] and resolve pointer events back to sequence ranges.

pub mod elements;
pub mod render_dna_circular;
pub mod render_dna_linear;
pub mod style;

pub use elements::{ElementGeometry, ElementKind, ElementMeta, ElementRegistry, MountedElement};
pub use render_dna_circular::{CircularOptions, CircularScene, gen_arc, render_circular};
pub use render_dna_linear::{LinearOptions, LinearScene, block_height, render_linear};

/// Output of one render pass.
#[derive(Debug, Clone, Default)]
pub struct RenderedView {
    pub svg: String,
    pub elements: Vec<MountedElement>,
    /// Total drawing height in SVG units.
    pub height: f64,
}
