//! Location of the per-user Outlook signature store.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Directory where Outlook keeps saved signatures
/// (`%APPDATA%\Microsoft\Signatures` on Windows).
pub fn signatures_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or(Error::AppDataUnavailable)?;
    Ok(base.join("Microsoft").join("Signatures"))
}
