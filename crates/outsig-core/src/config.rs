//! Application settings loaded from an `appsettings.json`-shaped file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Fallback image location used when no path is configured anywhere.
pub const DEFAULT_IMAGE_PATH: &str = "//127.0.0.1/outlook_files/novo_ass_email.jpg";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Config {
    pub signature_settings: SignatureSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SignatureSettings {
    /// Replacement image path, typically a UNC share location
    pub new_image_path: Option<String>,
}

impl Config {
    /// Load settings from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Effective image path: explicit override first, then the settings
    /// value, then [`DEFAULT_IMAGE_PATH`]. Blank values fall through.
    pub fn resolve_image_path(&self, override_path: Option<&str>) -> String {
        override_path
            .or(self.signature_settings.new_image_path.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_IMAGE_PATH)
            .to_string()
    }
}
