//! Interactive sequence viewer: selection handling, view orchestration and
//! configuration on top of the layout engine and the SVG renderers.

pub mod clipboard;
pub mod config;
pub mod dna_display;
pub mod error;
pub mod fasta;
pub mod selection_handler;
pub mod viewer;

pub use clipboard::{Clipboard, ClipboardError, ClipboardService, CopyOutcome, CopyPath, MemoryClipboard};
pub use config::{Thresholds, ViewerConfig, ZoomLevels};
pub use dna_display::{DisplayFeature, DnaDisplay, FeatureStatus, SizeClass};
pub use error::ViewerError;
pub use selection_handler::{Key, KeyAction, KeyEvent, Modifiers, PointerEvent, SelectionHandler, selected_text};
pub use viewer::{SearchStatus, SequenceViewer, ViewerEvent};

pub use seqview_engine as engine;
pub use seqview_protocol as protocol;
pub use seqview_render as render;
