//! The one-shot signature update pass.
//!
//! Locates the default signature, then patches its HTML document and its
//! manifest in sequence. There are no retries and no rollback: a failure
//! mid-run leaves earlier steps applied.

use std::path::PathBuf;

use tracing::info;

use crate::error::Result;
use crate::html;
use crate::locator::{self, SignatureStore};
use crate::xml;

/// Outcome of a completed update run.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// No default signature is configured; nothing was touched.
    NoSignature,
    /// The signature's files were processed.
    Updated {
        /// Name of the signature that was processed
        signature: String,
        /// Whether the HTML document contained an image to patch
        html_patched: bool,
        /// Whether the manifest was rewritten and saved
        manifest_changed: bool,
        /// Serialized manifest text, for diagnostics
        manifest_xml: String,
    },
}

/// Runs the locate -> patch HTML -> patch manifest sequence once.
pub struct SignatureUpdater<S> {
    store: S,
    signatures_dir: PathBuf,
    new_image_path: String,
}

impl<S: SignatureStore> SignatureUpdater<S> {
    pub fn new(store: S, signatures_dir: PathBuf, new_image_path: String) -> Self {
        Self {
            store,
            signatures_dir,
            new_image_path,
        }
    }

    pub fn run(&self) -> Result<UpdateOutcome> {
        let Some(signature) = locator::find_default_signature(&self.store)? else {
            info!("No default Outlook signature found, nothing to update");
            return Ok(UpdateOutcome::NoSignature);
        };
        info!("Default signature: {signature}");

        let html_path = html::signature_html_path(&self.signatures_dir, &signature)?;
        let html_patched = html::set_image_source(&html_path, &self.new_image_path)?;
        if html_patched {
            info!("Rewrote image source in {}", html_path.display());
        }

        let manifest =
            xml::update_manifest_image(&self.signatures_dir, &signature, &self.new_image_path)?;

        Ok(UpdateOutcome::Updated {
            signature,
            html_patched,
            manifest_changed: manifest.changed,
            manifest_xml: manifest.xml,
        })
    }
}
