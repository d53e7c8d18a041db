use std::sync::Arc;

use tracing::warn;

use super::domain::Account;
use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the serialized account collection.
pub(crate) const ACCOUNTS_KEY: &str = "registeredUsers";

/// Rejections raised by the credential store.
#[derive(Debug, thiserror::Error)]
pub enum CredentialStoreError {
    #[error("username already registered")]
    DuplicateUsername,
    #[error("account not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Durable collection of registered accounts under a single storage slot.
///
/// Every mutation reads the full collection, applies the change, and rewrites
/// the slot; callers must treat list-mutate-persist as one logical
/// transaction (single writer, no partial updates).
pub struct CredentialStore<S> {
    storage: Arc<S>,
}

impl<S: KeyValueStore> CredentialStore<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// The full stored collection. A missing slot or malformed contents read
    /// as an empty collection; only storage unavailability is an error.
    pub fn list_accounts(&self) -> Result<Vec<Account>, StorageError> {
        let Some(raw) = self.storage.get(ACCOUNTS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(accounts) => Ok(accounts),
            Err(err) => {
                warn!(%err, "stored account collection is malformed, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Exact, case-sensitive lookup.
    pub fn find_by_username(&self, username: &str) -> Result<Option<Account>, StorageError> {
        Ok(self
            .list_accounts()?
            .into_iter()
            .find(|account| account.username == username))
    }

    pub fn username_exists(&self, username: &str) -> Result<bool, StorageError> {
        Ok(self
            .list_accounts()?
            .iter()
            .any(|account| account.username == username))
    }

    /// Append `account`, rejecting an already-registered username. The whole
    /// collection is rewritten on success; nothing is persisted on rejection.
    pub fn add_account(&self, account: Account) -> Result<Account, CredentialStoreError> {
        let mut accounts = self.list_accounts()?;
        if accounts
            .iter()
            .any(|existing| existing.username == account.username)
        {
            return Err(CredentialStoreError::DuplicateUsername);
        }
        accounts.push(account.clone());
        self.persist(&accounts)?;
        Ok(account)
    }

    /// Replace the stored record with matching id and username.
    pub fn update_account(&self, account: &Account) -> Result<(), CredentialStoreError> {
        let mut accounts = self.list_accounts()?;
        let slot = accounts
            .iter_mut()
            .find(|existing| existing.id == account.id && existing.username == account.username)
            .ok_or(CredentialStoreError::NotFound)?;
        *slot = account.clone();
        self.persist(&accounts)?;
        Ok(())
    }

    fn persist(&self, accounts: &[Account]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(accounts).map_err(|err| {
            StorageError::Unavailable(format!("could not serialize account collection: {err}"))
        })?;
        self.storage.put(ACCOUNTS_KEY, &raw)
    }
}
