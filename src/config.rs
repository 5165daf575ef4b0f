use crate::error::ViewerError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MAX_ZOOM: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLevels {
    pub linear: u8,
    pub circular: u8,
}

impl Default for ZoomLevels {
    fn default() -> Self {
        Self {
            linear: 50,
            circular: 0,
        }
    }
}

/// Sequence sizes at which the viewer starts cutting back on detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Above this, sequence commits are delayed and searches capped.
    pub large_sequence: usize,
    pub huge_sequence: usize,
    /// Above this, translation and the complement strand are forced off.
    pub very_large_sequence: usize,
    pub max_search_matches: usize,
    pub max_search_matches_large: usize,
    /// Start positions examined per search step.
    pub search_chunk: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            large_sequence: 50_000,
            huge_sequence: 1_000_000,
            very_large_sequence: 5_000_000,
            max_search_matches: 10_000,
            max_search_matches_large: 500,
            search_chunk: 100_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub zoom: ZoomLevels,
    /// Fixed line length of the linear view; derived from the width when unset.
    pub bases_per_line: Option<usize>,
    pub show_complement: bool,
    pub show_index: bool,
    pub show_translation: bool,
    pub show_annotations: bool,
    pub show_cut_sites: bool,
    pub width: f64,
    pub height: f64,
    pub char_width: f64,
    pub line_height: f64,
    pub click_interval_ms: u64,
    pub thresholds: Thresholds,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom: ZoomLevels::default(),
            bases_per_line: None,
            show_complement: true,
            show_index: true,
            show_translation: false,
            show_annotations: true,
            show_cut_sites: true,
            width: 800.0,
            height: 600.0,
            char_width: 7.5,
            line_height: 16.0,
            click_interval_ms: 250,
            thresholds: Thresholds::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ViewerError> {
        let config: ViewerConfig = serde_json::from_str(text)?;
        Ok(config.clamped())
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read viewer config {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("could not parse viewer config {}", path.display()))
    }

    /// Pulls every value back into its usable range.
    pub fn clamped(mut self) -> Self {
        let defaults = Self::default();
        self.zoom.linear = self.zoom.linear.min(MAX_ZOOM);
        self.zoom.circular = self.zoom.circular.min(MAX_ZOOM);
        self.bases_per_line = self.bases_per_line.map(|n| n.max(1));
        if !(self.width.is_finite() && self.width > 0.0) {
            self.width = defaults.width;
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            self.height = defaults.height;
        }
        if !(self.char_width.is_finite() && self.char_width > 0.0) {
            self.char_width = defaults.char_width;
        }
        if !(self.line_height.is_finite() && self.line_height > 0.0) {
            self.line_height = defaults.line_height;
        }
        let t = &mut self.thresholds;
        t.huge_sequence = t.huge_sequence.max(t.large_sequence);
        t.very_large_sequence = t.very_large_sequence.max(t.huge_sequence);
        t.max_search_matches = t.max_search_matches.max(1);
        t.max_search_matches_large = t.max_search_matches_large.clamp(1, t.max_search_matches);
        t.search_chunk = t.search_chunk.max(1);
        self
    }

    /// Character width of the linear view at the current zoom. Zoom 50 draws
    /// bases at the configured width.
    pub fn effective_char_width(&self) -> f64 {
        let zoom = f64::from(self.zoom.linear.min(MAX_ZOOM)) / 100.0;
        self.char_width * (0.5 + 1.5 * zoom) / 1.25
    }

    /// Bases per linear line.
    pub fn bases_per_line(&self) -> usize {
        self.bases_per_line.unwrap_or_else(|| {
            seqview_render::LinearOptions::fitting_bases_per_line(self.width, self.effective_char_width())
        })
    }
}
