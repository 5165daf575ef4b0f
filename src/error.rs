use crate::clipboard::ClipboardError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("no element with id '{0}'")]
    UnknownElement(String),
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
}

impl From<String> for ViewerError {
    fn from(err: String) -> Self {
        ViewerError::Config(err)
    }
}
