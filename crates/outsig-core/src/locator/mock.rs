//! Test double for the registry-backed signature store.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::SignatureStore;
use crate::error::{Error, Result};

/// In-memory [`SignatureStore`] that records every probe it receives.
#[derive(Debug, Default)]
pub struct MockSignatureStore {
    mail_settings: HashMap<String, String>,
    profiles: HashMap<String, String>,
    failing_versions: HashSet<String>,
    unsupported: bool,
    probes: RefCell<Vec<String>>,
}

impl MockSignatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that fails every call with the platform-capability error
    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }

    /// Set the direct mail-settings value for a version
    pub fn with_mail_settings(mut self, version: &str, name: &str) -> Self {
        self.mail_settings
            .insert(version.to_string(), name.to_string());
        self
    }

    /// Set the profile signature value for a version
    pub fn with_profile(mut self, version: &str, name: &str) -> Self {
        self.profiles.insert(version.to_string(), name.to_string());
        self
    }

    /// Make every read for a version fail with a registry error
    pub fn with_failure(mut self, version: &str) -> Self {
        self.failing_versions.insert(version.to_string());
        self
    }

    /// Probe log, in call order, as `"mail:{version}"` / `"profiles:{version}"`
    pub fn probes(&self) -> Vec<String> {
        self.probes.borrow().clone()
    }

    fn read(&self, source: &str, map: &HashMap<String, String>, version: &str) -> Result<Option<String>> {
        self.probes.borrow_mut().push(format!("{source}:{version}"));

        if self.unsupported {
            return Err(Error::UnsupportedPlatform);
        }
        if self.failing_versions.contains(version) {
            return Err(Error::Registry {
                key: version.to_string(),
                message: "access denied".to_string(),
            });
        }

        Ok(map.get(version).cloned())
    }
}

impl SignatureStore for MockSignatureStore {
    fn mail_settings_signature(&self, version: &str) -> Result<Option<String>> {
        self.read("mail", &self.mail_settings, version)
    }

    fn profile_signature(&self, version: &str) -> Result<Option<String>> {
        self.read("profiles", &self.profiles, version)
    }
}
