use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use scheme_finder::catalog::{Catalog, CatalogImporter};
use scheme_finder::error::AppError;
use scheme_finder::storage::{KeyValueStore, StorageError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory stand-in for the device-local store so the demo leaves no files
/// behind.
#[derive(Default)]
pub(crate) struct InMemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for InMemoryStore {
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

/// The catalog to serve: an external CSV when configured, the builtin
/// catalog otherwise. The flag reports whether an import happened.
pub(crate) fn load_catalog(csv_path: Option<&Path>) -> Result<(Catalog, bool), AppError> {
    match csv_path {
        Some(path) => CatalogImporter::from_path(path)
            .map(|catalog| (catalog, true))
            .map_err(AppError::from),
        None => Ok((Catalog::builtin(), false)),
    }
}
