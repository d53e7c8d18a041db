use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Device-local key-value storage seam so the account layer can be exercised
/// against doubles in tests and the in-memory store in demos.
///
/// Keys are fixed, code-owned identifiers (`registeredUsers`, `currentUser`,
/// `alertEmail`), never user input.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// The single hard storage failure: the local store denied a read or write.
/// Malformed *contents* are not an error at this layer; callers decode and
/// recover on their own terms.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("local storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    fn io(context: &str, err: std::io::Error) -> Self {
        Self::Unavailable(format!("{context}: {err}"))
    }
}

/// Durable store keeping one JSON document per key under a data directory.
///
/// Writes land in a temp file first and are renamed into place, so a slot is
/// always either the previous document or the new one, never a torn write.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|err| StorageError::io("could not create storage directory", err))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::io("could not read storage slot", err)),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let tmp_path = self.root.join(format!(".{key}.json.tmp"));
        let mut tmp = fs::File::create(&tmp_path)
            .map_err(|err| StorageError::io("could not stage storage write", err))?;
        tmp.write_all(value.as_bytes())
            .map_err(|err| StorageError::io("could not stage storage write", err))?;
        tmp.sync_all()
            .map_err(|err| StorageError::io("could not flush storage write", err))?;
        drop(tmp);

        fs::rename(&tmp_path, self.slot_path(key))
            .map_err(|err| StorageError::io("could not commit storage write", err))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::io("could not clear storage slot", err)),
        }
    }
}
