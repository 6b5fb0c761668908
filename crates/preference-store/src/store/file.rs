use std::{
    collections::BTreeMap,
    fs::File,
    io::Write,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, RwLock,
    },
};

use tracing::{debug, error};

use super::{memory::apply_changes, AccessMode, Change, Store, StoreError};
use crate::value::StoredValue;

/// A store persisted as a single JSON document.
///
/// The whole document is loaded when the store is opened and kept in memory; reads never
/// touch the file. Every write replaces the file with a snapshot of the current values.
#[derive(Clone)]
pub struct FileStore(Arc<FileStoreInner>);

struct FileStoreInner {
    name: String,
    path: PathBuf,
    mode: AccessMode,
    values: RwLock<BTreeMap<String, StoredValue>>,
    // Serializes writers so that the last one to run always holds the newest snapshot.
    write_lock: Mutex<()>,
    // Set while a background write is queued but hasn't taken its snapshot yet.
    write_queued: AtomicBool,
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("name", &self.0.name)
            .field("path", &self.0.path)
            .field("mode", &self.0.mode)
            .finish()
    }
}

impl FileStore {
    /// Open the store `name` in `folder`, creating the folder if needed.
    ///
    /// A missing file is an empty store. The file is only created by the first write.
    pub fn open(folder: &Path, name: &str, mode: AccessMode) -> Result<Self, StoreError> {
        ensure_folder(folder)?;
        let path = folder.join(format!("{name}.json"));

        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Creating preference store {:?}", path);
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(FileStore(Arc::new(FileStoreInner {
            name: name.to_string(),
            path,
            mode,
            values: RwLock::new(values),
            write_lock: Mutex::new(()),
            write_queued: AtomicBool::new(false),
        })))
    }

    /// The file backing this store.
    pub fn path(&self) -> &Path {
        &self.0.path
    }
}

fn ensure_folder(folder: &Path) -> Result<(), StoreError> {
    if folder.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(folder)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o700);
        std::fs::set_permissions(folder, perms)?;
    }

    Ok(())
}

/// Create or truncate `path` with the permissions of `mode` applied before any data is
/// written to it.
fn create_restricted(path: &Path, mode: AccessMode) -> Result<File, StoreError> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    std::os::unix::fs::OpenOptionsExt::mode(&mut options, mode.file_permissions());
    let file = options.open(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // The creation mode is filtered by the umask and ignored for a leftover file.
        file.set_permissions(std::fs::Permissions::from_mode(mode.file_permissions()))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(file)
}

impl FileStoreInner {
    fn write_to_disk(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().expect("Mutex should not be poisoned");

        let contents = {
            let values = self.values.read().expect("RwLock should not be poisoned");
            serde_json::to_string_pretty(&*values)?
        };

        // Write next to the target and rename, so readers never see a partial file.
        let tmp_path = self.path.with_extension("json.tmp");
        let mut file = create_restricted(&tmp_path, self.mode)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn update(&self, changes: Vec<Change>) {
        let mut values = self.values.write().expect("RwLock should not be poisoned");
        apply_changes(&mut values, changes);
    }
}

impl Store for FileStore {
    fn name(&self) -> &str {
        &self.0.name
    }

    fn get(&self, key: &str) -> Result<Option<StoredValue>, StoreError> {
        Ok(self
            .0
            .values
            .read()
            .expect("RwLock should not be poisoned")
            .get(key)
            .cloned())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .0
            .values
            .read()
            .expect("RwLock should not be poisoned")
            .keys()
            .cloned()
            .collect())
    }

    fn apply(&self, changes: Vec<Change>) -> Result<(), StoreError> {
        self.0.update(changes);

        // A queued writer snapshots after clearing the flag, so it picks these changes up.
        if self.0.write_queued.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let inner = Arc::clone(&self.0);
        std::thread::spawn(move || {
            inner.write_queued.store(false, Ordering::SeqCst);
            if let Err(e) = inner.write_to_disk() {
                error!("Failed to persist preference store '{}': {}", inner.name, e);
            }
        });

        Ok(())
    }

    fn commit(&self, changes: Vec<Change>) -> Result<(), StoreError> {
        self.0.update(changes);
        self.0.write_to_disk()
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.0.write_to_disk()
    }
}
