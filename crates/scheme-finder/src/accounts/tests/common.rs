use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::accounts::domain::RegistrationRequest;
use crate::storage::{KeyValueStore, StorageError};

/// In-memory stand-in for the device-local store.
#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub(super) fn raw(&self, key: &str) -> Option<String> {
        self.slots
            .lock()
            .expect("storage mutex poisoned")
            .get(key)
            .cloned()
    }

    pub(super) fn seed(&self, key: &str, value: &str) {
        self.slots
            .lock()
            .expect("storage mutex poisoned")
            .insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .slots
            .lock()
            .expect("storage mutex poisoned")
            .get(key)
            .cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots
            .lock()
            .expect("storage mutex poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.slots
            .lock()
            .expect("storage mutex poisoned")
            .remove(key);
        Ok(())
    }
}

/// Store double whose every operation fails hard.
pub(super) struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("local storage disabled".to_string()))
    }

    fn put(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("local storage disabled".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("local storage disabled".to_string()))
    }
}

pub(super) fn registration(username: &str) -> RegistrationRequest {
    RegistrationRequest {
        name: "Asha Rao".to_string(),
        email: format!("{username}@example.test"),
        username: username.to_string(),
        password: "green-fields-7".to_string(),
        confirm_password: "green-fields-7".to_string(),
        business_type: "proprietorship".to_string(),
    }
}
