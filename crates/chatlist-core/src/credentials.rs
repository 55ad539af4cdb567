//! Credential resolution — maps a provider's `credentialRef` to an API key.
//!
//! The dispatcher receives a `CredentialSource` at construction instead of
//! reading ambient state. Production uses [`EnvCredentials`]; tests and
//! embedding callers use [`StaticCredentials`].

use std::collections::HashMap;
use std::fmt;

/// An API key. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    /// The raw key, for the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Looks up a named secret.
///
/// `None` means unset or blank. That is not an error here; it only becomes
/// one for the provider that needed the key.
pub trait CredentialSource: Send + Sync {
    fn resolve(&self, credential_ref: &str) -> Option<Secret>;
}

/// Reads secrets from the process environment on every call (no caching).
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn resolve(&self, credential_ref: &str) -> Option<Secret> {
        let name = credential_ref.trim();
        if name.is_empty() {
            return None;
        }
        std::env::var(name)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(Secret::new)
    }
}

/// Fixed in-memory secrets.
#[derive(Clone, Debug, Default)]
pub struct StaticCredentials {
    secrets: HashMap<String, Secret>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, credential_ref: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(credential_ref, value);
        self
    }

    pub fn insert(&mut self, credential_ref: impl Into<String>, value: impl Into<String>) {
        self.secrets
            .insert(credential_ref.into(), Secret::new(value));
    }
}

impl CredentialSource for StaticCredentials {
    fn resolve(&self, credential_ref: &str) -> Option<Secret> {
        self.secrets
            .get(credential_ref)
            .filter(|s| !s.expose().trim().is_empty())
            .cloned()
    }
}
