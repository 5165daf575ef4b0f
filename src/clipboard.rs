//! Copying the selection out of the viewer. The native clipboard is tried
//! first; when it is unavailable a fallback writer gets the text, and if that
//! fails too the caller gets a notice to show instead of an error.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard is not available: {0}")]
    Unavailable(String),
    #[error("clipboard refused the text: {0}")]
    Rejected(String),
}

pub trait Clipboard {
    fn name(&self) -> &str;
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPath {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied { via: CopyPath, bases: usize },
    /// Nothing to copy (collapsed cursor).
    Empty,
    /// Both writers failed; the notice is meant for the user.
    Failed { notice: String },
}

/// In-process clipboard. Also stands in for platform clipboards in tests.
#[derive(Debug, Clone)]
pub struct MemoryClipboard {
    name: String,
    available: bool,
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            available: true,
            contents: None,
        }
    }

    /// A clipboard that fails every write, like a restricted environment.
    pub fn unavailable(name: &str) -> Self {
        Self {
            available: false,
            ..Self::new(name)
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Default for MemoryClipboard {
    fn default() -> Self {
        Self::new("memory")
    }
}

impl Clipboard for MemoryClipboard {
    fn name(&self) -> &str {
        &self.name
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if !self.available {
            return Err(ClipboardError::Unavailable(self.name.clone()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// A primary clipboard plus the writer used when it fails.
pub struct ClipboardService {
    primary: Box<dyn Clipboard>,
    fallback: Option<Box<dyn Clipboard>>,
}

impl std::fmt::Debug for ClipboardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardService")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.as_ref().map(|c| c.name().to_string()))
            .finish()
    }
}

impl Default for ClipboardService {
    fn default() -> Self {
        Self::new(Box::new(MemoryClipboard::default()))
    }
}

impl ClipboardService {
    pub fn new(primary: Box<dyn Clipboard>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Box<dyn Clipboard>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn copy(&mut self, text: &str) -> CopyOutcome {
        if text.is_empty() {
            return CopyOutcome::Empty;
        }
        let bases = text.len();
        let primary_error = match self.primary.write_text(text) {
            Ok(()) => {
                return CopyOutcome::Copied {
                    via: CopyPath::Primary,
                    bases,
                };
            }
            Err(error) => error,
        };
        log::debug!("{primary_error}, trying fallback");
        let Some(fallback) = self.fallback.as_mut() else {
            return CopyOutcome::Failed {
                notice: format!("Could not copy {bases} bases: {primary_error}"),
            };
        };
        match fallback.write_text(text) {
            Ok(()) => CopyOutcome::Copied {
                via: CopyPath::Fallback,
                bases,
            },
            Err(error) => {
                log::warn!("copy failed on both clipboards: {error}");
                CopyOutcome::Failed {
                    notice: format!("Could not copy {bases} bases, the clipboard is not accessible"),
                }
            }
        }
    }
}
