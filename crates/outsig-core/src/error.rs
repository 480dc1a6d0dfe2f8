use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Signature file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Registry access is only supported on Windows")]
    UnsupportedPlatform,

    #[error("Registry read failed for {key}: {message}")]
    Registry { key: String, message: String },

    #[error("Could not determine the user application data directory")]
    AppDataUnavailable,

    #[error("HTML rewrite failed: {0}")]
    HtmlRewrite(#[from] lol_html::errors::RewritingError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Manifest is not valid UTF-8: {0}")]
    ManifestEncoding(#[from] std::string::FromUtf8Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error means an expected file was missing
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::FileNotFound(_) => true,
            Error::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Reject blank required string inputs before any I/O happens.
pub(crate) fn require_non_blank(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidArgument(format!("{what} must not be blank")));
    }
    Ok(())
}
