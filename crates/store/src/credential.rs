//! Bearer credential holder and its persistent storage

use crate::error::{StoreError, StoreResult};
use prescripto_core::Role;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Durable key/value storage for credentials
pub trait CredentialStorage: Send + Sync {
    fn load(&self, key: &str) -> StoreResult<Option<String>>;
    fn save(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// In-process storage; nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one entry
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.lock().insert(key.into(), value.into());
        storage
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl CredentialStorage for MemoryStorage {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}

/// JSON file holding one object of key/value pairs
///
/// Writes go to a uniquely named sibling temporary file which then replaces
/// the existing one, so a crash never leaves a half-written file behind.
/// Every `FileStorage` on the same path shares one write lock, so stores for
/// different roles can share a file without losing each other's updates.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let write_lock = write_lock_for(&path);
        Self { path, write_lock }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> StoreResult<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        serde_json::to_writer_pretty(&mut tmp, entries)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    /// Read-modify-write under the path's lock
    ///
    /// A file that no longer parses is replaced rather than blocking writes.
    fn update<F>(&self, f: F) -> StoreResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(StoreError::Serialization(e)) => {
                warn!(path = %self.path.display(), error = %e, "Replacing unreadable credential file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        f(&mut entries);
        self.write_all(&entries)
    }
}

/// The write lock shared by every `FileStorage` on `path`
fn write_lock_for(path: &Path) -> Arc<Mutex<()>> {
    static LOCKS: LazyLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
        LazyLock::new(Mutex::default);

    let key = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    LOCKS
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .entry(key)
        .or_default()
        .clone()
}

impl CredentialStorage for FileStorage {
    fn load(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&self, key: &str, value: &str) -> StoreResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// The bearer credential of one role
///
/// Initialised from storage; empty when nothing is stored. The value is
/// never validated, refreshed or expired on this side.
pub struct Credential {
    role: Role,
    storage: Arc<dyn CredentialStorage>,
    value: watch::Sender<String>,
    write_lock: Mutex<()>,
}

impl Credential {
    /// Load the role's credential from storage
    ///
    /// An unreadable store is logged and treated as empty.
    pub fn load(role: Role, storage: Arc<dyn CredentialStorage>) -> Self {
        let initial = match storage.load(role.storage_key()) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                warn!(%role, error = %e, "Failed to read stored credential");
                String::new()
            }
        };
        debug!(%role, present = !initial.is_empty(), "Credential loaded");

        Self {
            role,
            storage,
            value: watch::Sender::new(initial),
            write_lock: Mutex::new(()),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Current value
    pub fn get(&self) -> String {
        self.value.borrow().clone()
    }

    /// Whether a non-empty credential is held
    pub fn is_present(&self) -> bool {
        !self.value.borrow().is_empty()
    }

    /// Watch the credential for changes
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.value.subscribe()
    }

    /// Persist a new credential, then make it current
    ///
    /// # Errors
    ///
    /// Returns an error if storage rejects the write; the in-memory value
    /// is left unchanged in that case.
    pub fn set(&self, token: impl Into<String>) -> StoreResult<()> {
        let token = token.into();
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        self.storage.save(self.role.storage_key(), &token)?;
        self.value.send_replace(token);
        debug!(role = %self.role, "Credential updated");
        Ok(())
    }

    /// Remove the credential from storage and memory
    ///
    /// # Errors
    ///
    /// Returns an error if storage rejects the removal; the in-memory value
    /// is left unchanged in that case.
    pub fn clear(&self) -> StoreResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        self.storage.remove(self.role.storage_key())?;
        self.value.send_replace(String::new());
        debug!(role = %self.role, "Credential cleared");
        Ok(())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("role", &self.role)
            .field("present", &self.is_present())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ReadOnlyStorage;

    impl CredentialStorage for ReadOnlyStorage {
        fn load(&self, _key: &str) -> StoreResult<Option<String>> {
            Ok(Some("stored".to_string()))
        }

        fn save(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Storage("read-only".to_string()))
        }

        fn remove(&self, _key: &str) -> StoreResult<()> {
            Err(StoreError::Storage("read-only".to_string()))
        }
    }

    #[test]
    fn test_initializes_from_storage() {
        let storage = Arc::new(MemoryStorage::with_entry("aToken", "abc"));
        let credential = Credential::load(Role::Admin, storage);
        assert_eq!(credential.get(), "abc");
        assert!(credential.is_present());
    }

    #[test]
    fn test_initializes_empty_when_absent() {
        let storage = Arc::new(MemoryStorage::with_entry("aToken", "abc"));
        let credential = Credential::load(Role::Doctor, storage);
        assert_eq!(credential.get(), "");
        assert!(!credential.is_present());
    }

    #[test]
    fn test_set_persists_and_updates() {
        let storage = Arc::new(MemoryStorage::new());
        let credential = Credential::load(Role::Doctor, storage.clone());
        let mut rx = credential.subscribe();

        credential.set("doc-token").unwrap();

        assert_eq!(credential.get(), "doc-token");
        assert_eq!(storage.load("dToken").unwrap().as_deref(), Some("doc-token"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "doc-token");
    }

    #[test]
    fn test_failed_persist_leaves_memory_unchanged() {
        let credential = Credential::load(Role::Admin, Arc::new(ReadOnlyStorage));
        assert!(credential.set("new").is_err());
        assert_eq!(credential.get(), "stored");
        assert!(credential.clear().is_err());
        assert_eq!(credential.get(), "stored");
    }

    #[test]
    fn test_clear() {
        let storage = Arc::new(MemoryStorage::with_entry("dToken", "t"));
        let credential = Credential::load(Role::Doctor, storage.clone());
        credential.clear().unwrap();
        assert!(!credential.is_present());
        assert_eq!(storage.load("dToken").unwrap(), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        let storage = Arc::new(FileStorage::new(&path));
        let credential = Credential::load(Role::Admin, storage);
        credential.set("persisted").unwrap();
        drop(credential);

        let reopened = Credential::load(Role::Admin, Arc::new(FileStorage::new(&path)));
        assert_eq!(reopened.get(), "persisted");

        let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_file_storage_keeps_other_roles() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("credentials.json"));
        storage.save("aToken", "a").unwrap();
        storage.save("dToken", "d").unwrap();
        storage.remove("aToken").unwrap();

        assert_eq!(storage.load("aToken").unwrap(), None);
        assert_eq!(storage.load("dToken").unwrap().as_deref(), Some("d"));
    }

    #[test]
    fn test_corrupt_file_reads_as_empty_credential() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();

        let credential = Credential::load(Role::Doctor, Arc::new(FileStorage::new(&path)));
        assert_eq!(credential.get(), "");
    }

    #[test]
    fn test_set_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();

        let credential = Credential::load(Role::Admin, Arc::new(FileStorage::new(&path)));
        credential.set("fresh").unwrap();

        assert_eq!(credential.get(), "fresh");
        let reopened = Credential::load(Role::Admin, Arc::new(FileStorage::new(&path)));
        assert_eq!(reopened.get(), "fresh");
    }

    #[test]
    fn test_storages_sharing_a_file_keep_both_roles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let admin = FileStorage::new(&path);
        let doctor = FileStorage::new(&path);

        for round in 0..100 {
            let barrier = std::sync::Barrier::new(2);
            let (a, d) = std::thread::scope(|scope| {
                let a = scope.spawn(|| {
                    barrier.wait();
                    admin.save("aToken", &format!("a{round}"))
                });
                let d = scope.spawn(|| {
                    barrier.wait();
                    doctor.save("dToken", &format!("d{round}"))
                });
                (a.join().unwrap(), d.join().unwrap())
            });
            a.unwrap();
            d.unwrap();

            let reader = FileStorage::new(&path);
            assert_eq!(reader.load("aToken").unwrap(), Some(format!("a{round}")));
            assert_eq!(reader.load("dToken").unwrap(), Some(format!("d{round}")));
        }
    }
}
