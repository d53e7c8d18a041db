use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::warn;

use super::domain::{next_account_id, Account, RegistrationRequest};
use super::password;
use super::store::{CredentialStore, CredentialStoreError};
use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the persisted current identity, absent when logged
/// out.
pub(crate) const SESSION_KEY: &str = "currentUser";

/// Failures surfaced to the caller for user-facing display, plus the hard
/// storage failure.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown username and wrong password are deliberately one variant so
    /// callers cannot enumerate registered usernames.
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("username already taken")]
    UsernameTaken,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<CredentialStoreError> for AuthError {
    fn from(err: CredentialStoreError) -> Self {
        match err {
            CredentialStoreError::DuplicateUsername => AuthError::UsernameTaken,
            CredentialStoreError::NotFound => AuthError::InvalidCredentials,
            CredentialStoreError::Storage(err) => AuthError::Storage(err),
        }
    }
}

/// Tracks the single authenticated identity, backed by the credential store.
///
/// One instance per running process, constructed from persisted state at
/// startup and updated explicitly on login, registration, and logout. The
/// held account is a snapshot; store records only change through
/// [`CredentialStore`] calls.
pub struct SessionManager<S> {
    credentials: CredentialStore<S>,
    storage: Arc<S>,
    current: Mutex<Option<Account>>,
}

impl<S: KeyValueStore> SessionManager<S> {
    /// Open the session layer, restoring any persisted identity. A malformed
    /// session slot reads as logged out.
    pub fn open(storage: Arc<S>) -> Result<Self, StorageError> {
        let current = match storage.get(SESSION_KEY)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(account) => Some(account),
                Err(err) => {
                    warn!(%err, "persisted session is malformed, starting logged out");
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            credentials: CredentialStore::new(storage.clone()),
            storage,
            current: Mutex::new(current),
        })
    }

    pub fn credentials(&self) -> &CredentialStore<S> {
        &self.credentials
    }

    /// Snapshot of the authenticated account, if any.
    pub fn current_identity(&self) -> Option<Account> {
        self.current.lock().expect("session mutex poisoned").clone()
    }

    /// Authenticate `username` against the stored credentials.
    ///
    /// `remember` controls whether the refreshed last-login timestamp is
    /// written back to the account collection; the session slot is refreshed
    /// either way.
    pub fn login(
        &self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<Account, AuthError> {
        let Some(mut account) = self.credentials.find_by_username(username)? else {
            return Err(AuthError::InvalidCredentials);
        };
        if !password::verify_password(password, &account.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        account.last_login = Utc::now();
        if remember {
            self.credentials.update_account(&account)?;
        }
        self.persist_session(&account)?;
        *self.current.lock().expect("session mutex poisoned") = Some(account.clone());
        Ok(account)
    }

    /// Create an account and log straight into it.
    ///
    /// Password confirmation is checked before anything touches storage, so
    /// a mismatch persists nothing.
    pub fn register(&self, request: RegistrationRequest) -> Result<Account, AuthError> {
        if request.password != request.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        let now = Utc::now();
        let account = Account {
            id: next_account_id(now),
            name: request.name,
            email: request.email,
            username: request.username,
            password_hash: password::hash_password(&request.password),
            business_type: request.business_type,
            registered_date: now,
            last_login: now,
        };

        let account = self.credentials.add_account(account)?;
        self.persist_session(&account)?;
        *self.current.lock().expect("session mutex poisoned") = Some(account.clone());
        Ok(account)
    }

    /// Drop the current identity. The account collection is untouched, and a
    /// failure to clear the persisted slot is logged rather than surfaced:
    /// logout itself cannot fail.
    pub fn logout(&self) {
        if let Err(err) = self.storage.remove(SESSION_KEY) {
            warn!(%err, "could not clear persisted session slot");
        }
        *self.current.lock().expect("session mutex poisoned") = None;
    }

    fn persist_session(&self, account: &Account) -> Result<(), StorageError> {
        let raw = serde_json::to_string(account).map_err(|err| {
            StorageError::Unavailable(format!("could not serialize session: {err}"))
        })?;
        self.storage.put(SESSION_KEY, &raw)
    }
}
