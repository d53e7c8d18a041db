use std::sync::Arc;

use super::common::{registration, MemoryStore, UnavailableStore};
use crate::accounts::service::{AuthError, SessionManager, SESSION_KEY};
use crate::accounts::store::CredentialStore;
use crate::storage::{KeyValueStore, StorageError};

fn open_session(storage: &Arc<MemoryStore>) -> SessionManager<MemoryStore> {
    SessionManager::open(storage.clone()).expect("session opens")
}

#[test]
fn register_auto_logs_in_and_persists_the_account() {
    let storage = Arc::new(MemoryStore::default());
    let session = open_session(&storage);

    let account = session.register(registration("asha")).expect("register succeeds");

    let current = session.current_identity().expect("authenticated");
    assert_eq!(current.username, "asha");
    assert_eq!(current.registered_date, current.last_login);
    assert!(storage.raw(SESSION_KEY).is_some(), "session slot persisted");

    let stored = session
        .credentials()
        .find_by_username("asha")
        .expect("lookup succeeds")
        .expect("account persisted");
    assert_eq!(stored.id, account.id);
}

#[test]
fn register_password_mismatch_persists_nothing() {
    let storage = Arc::new(MemoryStore::default());
    let session = open_session(&storage);

    let mut request = registration("asha");
    request.confirm_password = "something-else".to_string();

    match session.register(request) {
        Err(AuthError::PasswordMismatch) => {}
        other => panic!("expected password mismatch, got {other:?}"),
    }
    assert!(session.current_identity().is_none());
    assert!(session
        .credentials()
        .list_accounts()
        .expect("list succeeds")
        .is_empty());
    assert!(storage.raw(SESSION_KEY).is_none());
}

#[test]
fn register_rejects_taken_username_and_keeps_first_account() {
    let storage = Arc::new(MemoryStore::default());
    let session = open_session(&storage);

    let first = session.register(registration("asha")).expect("first register");

    match session.register(registration("asha")) {
        Err(AuthError::UsernameTaken) => {}
        other => panic!("expected username taken, got {other:?}"),
    }

    let accounts = session.credentials().list_accounts().expect("list succeeds");
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].id, first.id);
}

#[test]
fn wrong_password_and_unknown_username_are_indistinguishable() {
    let storage = Arc::new(MemoryStore::default());
    let session = open_session(&storage);
    session.register(registration("asha")).expect("register succeeds");
    session.logout();

    let wrong_password = session
        .login("asha", "not-the-password", false)
        .expect_err("wrong password fails");
    let unknown_user = session
        .login("nobody", "green-fields-7", false)
        .expect_err("unknown username fails");

    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    assert!(session.current_identity().is_none(), "state stays anonymous");
}

#[test]
fn login_without_remember_leaves_stored_last_login_untouched() {
    let storage = Arc::new(MemoryStore::default());
    let session = open_session(&storage);
    let registered = session.register(registration("asha")).expect("register succeeds");
    session.logout();

    let logged_in = session
        .login("asha", "green-fields-7", false)
        .expect("login succeeds");
    assert!(logged_in.last_login > registered.last_login);

    let stored = session
        .credentials()
        .find_by_username("asha")
        .expect("lookup succeeds")
        .expect("account present");
    assert_eq!(stored.last_login, registered.last_login);
}

#[test]
fn login_with_remember_persists_the_refreshed_last_login() {
    let storage = Arc::new(MemoryStore::default());
    let session = open_session(&storage);
    let registered = session.register(registration("asha")).expect("register succeeds");
    session.logout();

    let logged_in = session
        .login("asha", "green-fields-7", true)
        .expect("login succeeds");

    let stored = session
        .credentials()
        .find_by_username("asha")
        .expect("lookup succeeds")
        .expect("account present");
    assert_eq!(stored.last_login, logged_in.last_login);
    assert!(stored.last_login > registered.last_login);
}

#[test]
fn logout_clears_the_session_but_keeps_the_account() {
    let storage = Arc::new(MemoryStore::default());
    let session = open_session(&storage);
    session.register(registration("asha")).expect("register succeeds");

    session.logout();

    assert!(session.current_identity().is_none());
    assert!(storage.raw(SESSION_KEY).is_none(), "session slot cleared");
    assert_eq!(
        session
            .credentials()
            .list_accounts()
            .expect("list succeeds")
            .len(),
        1,
        "account collection untouched"
    );
}

#[test]
fn session_survives_a_reopen_via_the_persisted_slot() {
    let storage = Arc::new(MemoryStore::default());
    let session = open_session(&storage);
    session.register(registration("asha")).expect("register succeeds");
    drop(session);

    let reopened = open_session(&storage);
    let current = reopened.current_identity().expect("still authenticated");
    assert_eq!(current.username, "asha");
}

#[test]
fn malformed_session_slot_reads_as_logged_out() {
    let storage = Arc::new(MemoryStore::default());
    storage.seed(SESSION_KEY, "{broken");

    let session = open_session(&storage);
    assert!(session.current_identity().is_none());
}

#[test]
fn logout_never_fails_even_when_the_slot_cannot_be_cleared() {
    struct RemoveFailsStore(MemoryStore);

    impl KeyValueStore for RemoveFailsStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.0.put(key, value)
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("storage went away".to_string()))
        }
    }

    let storage = Arc::new(RemoveFailsStore(MemoryStore::default()));
    let session = SessionManager::open(storage).expect("session opens");
    session.register(registration("asha")).expect("register succeeds");

    session.logout();
    assert!(session.current_identity().is_none());
}

#[test]
fn opening_against_dead_storage_surfaces_the_failure() {
    match SessionManager::open(Arc::new(UnavailableStore)) {
        Err(StorageError::Unavailable(_)) => {}
        Ok(_) => panic!("expected unavailable storage"),
    }

    let dead = CredentialStore::new(Arc::new(UnavailableStore));
    match dead.find_by_username("asha") {
        Err(StorageError::Unavailable(_)) => {}
        other => panic!("expected unavailable storage, got {other:?}"),
    }
}
