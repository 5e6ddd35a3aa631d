//! Bearer-token storage.
//!
//! The store holds at most one credential. Setting it never validates; that
//! is the job of the connectivity probe
//! ([`crate::client::ApiClient::test_connection`]). Persisting the token
//! across runs is left to the presentation layer.

use crate::config::API_KEY_ENV;
use std::fmt;
use std::sync::RwLock;
use tracing::debug;

/// An opaque bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Holds the single credential shared by every in-flight operation.
#[derive(Debug, Default)]
pub struct CredentialStore {
    token: RwLock<Option<Credential>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store from `NUTRIENT_DWS_API_KEY`, if set.
    pub fn from_env() -> Self {
        let store = Self::new();
        if let Ok(token) = std::env::var(API_KEY_ENV) {
            debug!("Credential loaded from {}", API_KEY_ENV);
            store.set(token);
        }
        store
    }

    /// Replace the stored credential unconditionally.
    pub fn set(&self, token: impl Into<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(Credential::new(token));
    }

    pub fn clear(&self) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    /// True iff a non-empty token is held.
    pub fn has_credential(&self) -> bool {
        self.get().is_some()
    }

    /// A snapshot of the current credential; empty tokens count as absent.
    pub fn get(&self) -> Option<Credential> {
        let guard = self.token.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().filter(|c| !c.is_empty()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let store = CredentialStore::new();
        assert!(!store.has_credential());
        assert!(store.get().is_none());
    }

    #[test]
    fn set_replaces_and_clear_forgets() {
        let store = CredentialStore::new();
        store.set("first");
        store.set("second");
        assert_eq!(store.get().unwrap().expose(), "second");

        store.clear();
        assert!(!store.has_credential());
    }

    #[test]
    fn empty_token_is_absent() {
        let store = CredentialStore::new();
        store.set("");
        assert!(!store.has_credential());
    }

    #[test]
    fn debug_is_redacted() {
        let c = Credential::new("sk-secret");
        assert!(!format!("{c:?}").contains("sk-secret"));
    }
}
