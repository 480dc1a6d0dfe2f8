//! Default signature discovery.
//!
//! Outlook records the currently selected signature in version-scoped
//! registry locations. The probe walks the known Office releases newest
//! first and returns the first configured name it finds.

mod registry;

#[cfg(test)]
pub mod mock;

pub use registry::RegistrySignatureStore;

use tracing::warn;

use crate::error::{Error, Result};

/// Office releases probed for signature settings, newest first.
pub const OFFICE_VERSIONS: [&str; 5] = ["16.0", "15.0", "14.0", "13.0", "12.0"];

/// Read access to the per-version Outlook signature settings.
///
/// Implemented against the current user's registry hive on Windows and
/// mocked in tests.
pub trait SignatureStore {
    /// The version's direct "current signature" value, if configured
    fn mail_settings_signature(&self, version: &str) -> Result<Option<String>>;

    /// The first "signature" value found across the version's mail
    /// profiles, in native enumeration order
    fn profile_signature(&self, version: &str) -> Result<Option<String>>;
}

/// Find the name of the user's default signature.
///
/// `Ok(None)` is the normal "no signature configured" outcome. A store
/// failure for one version is logged and treated as no value there; only
/// the platform-capability error aborts the probe.
pub fn find_default_signature<S: SignatureStore>(store: &S) -> Result<Option<String>> {
    for version in OFFICE_VERSIONS {
        if let Some(name) = probe(store, version, Probe::MailSettings)? {
            return Ok(Some(name));
        }
        if let Some(name) = probe(store, version, Probe::Profiles)? {
            return Ok(Some(name));
        }
    }

    Ok(None)
}

#[derive(Clone, Copy)]
enum Probe {
    MailSettings,
    Profiles,
}

fn probe<S: SignatureStore>(store: &S, version: &str, which: Probe) -> Result<Option<String>> {
    let result = match which {
        Probe::MailSettings => store.mail_settings_signature(version),
        Probe::Profiles => store.profile_signature(version),
    };

    match result {
        Ok(name) => Ok(name.filter(|n| !n.trim().is_empty())),
        Err(Error::UnsupportedPlatform) => Err(Error::UnsupportedPlatform),
        Err(e) => {
            let source = match which {
                Probe::MailSettings => "mail settings",
                Probe::Profiles => "profiles",
            };
            warn!("Failed to read {source} for version {version}: {e}");
            Ok(None)
        }
    }
}
