//! Scheme-update alert subscriptions. The product only remembers the most
//! recent email per device; no matching or delivery logic hangs off it.

use std::sync::Arc;

use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the last subscribed email.
pub(crate) const ALERT_KEY: &str = "alertEmail";

pub struct AlertSubscriptions<S> {
    storage: Arc<S>,
}

impl<S: KeyValueStore> AlertSubscriptions<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Overwrite the remembered subscription email.
    pub fn subscribe(&self, email: &str) -> Result<(), StorageError> {
        let raw = serde_json::to_string(email).map_err(|err| {
            StorageError::Unavailable(format!("could not serialize subscription: {err}"))
        })?;
        self.storage.put(ALERT_KEY, &raw)
    }

    /// The most recently subscribed email, if any. A malformed slot reads as
    /// no subscription.
    pub fn current(&self) -> Result<Option<String>, StorageError> {
        match self.storage.get(ALERT_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw).ok()),
            None => Ok(None),
        }
    }
}
