//! # outsig-core
//!
//! Core library for the Outlook signature updater.
//!
//! This crate provides:
//! - Default signature discovery from the per-version Outlook registry
//!   settings
//! - HTML signature document patching (image source rewrite)
//! - `filelist.xml` manifest patching for matching image records
//! - The one-shot update pass tying the three together

pub mod config;
pub mod error;
pub mod html;
pub mod locator;
pub mod paths;
pub mod updater;
pub mod xml;

pub use config::{Config, DEFAULT_IMAGE_PATH, SignatureSettings};
pub use error::{Error, Result};
pub use html::{set_image_source, signature_html_path};
pub use locator::{
    OFFICE_VERSIONS, RegistrySignatureStore, SignatureStore, find_default_signature,
};
pub use paths::signatures_dir;
pub use updater::{SignatureUpdater, UpdateOutcome};
pub use xml::{DEFAULT_IMAGE_FILE, ManifestUpdate, manifest_path, update_manifest_image};
