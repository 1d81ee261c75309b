use crate::{AuthError, Result as AuthResult};

use sf_core::CachedIdentity;

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use error_location::ErrorLocation;

/// Durable local storage for one reconciled identity.
///
/// A single shared mutable slot: only the state store writes to it, and a
/// write must replace the whole record at once so a concurrent read can
/// never observe a half-updated object. Injected rather than accessed as
/// ambient global state so tests can substitute [`MemoryIdentityCache`].
pub trait PersistedIdentityCache: Send + Sync {
    fn read(&self) -> AuthResult<Option<CachedIdentity>>;

    fn write(&self, record: &CachedIdentity) -> AuthResult<()>;

    fn clear(&self) -> AuthResult<()>;
}

/// One serialized JSON record at a fixed path, versionless.
///
/// There is no migration logic: absence or malformed content both read as
/// "no cached identity" and bootstrap rebuilds the record.
pub struct FileIdentityCache {
    path: PathBuf,
}

impl FileIdentityCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistedIdentityCache for FileIdentityCache {
    fn read(&self) -> AuthResult<Option<CachedIdentity>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AuthError::CacheIo {
                    source: e,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        match serde_json::from_str(&contents) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                log::warn!(
                    "discarding malformed identity record at {}: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    fn write(&self, record: &CachedIdentity) -> AuthResult<()> {
        let json = serde_json::to_string(record).map_err(|e| AuthError::CacheSerde {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AuthError::CacheIo {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        // Write-then-rename so a concurrent read sees either the old record
        // or the new one, never a partial write.
        let staging = self.path.with_extension("tmp");
        std::fs::write(&staging, json).map_err(|e| AuthError::CacheIo {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;
        std::fs::rename(&staging, &self.path).map_err(|e| AuthError::CacheIo {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(())
    }

    fn clear(&self) -> AuthResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::CacheIo {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// In-memory cache for tests and hosts without durable storage.
#[derive(Default)]
pub struct MemoryIdentityCache {
    slot: Mutex<Option<CachedIdentity>>,
}

impl MemoryIdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current record, if any. Test observability helper.
    pub fn stored(&self) -> Option<CachedIdentity> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl PersistedIdentityCache for MemoryIdentityCache {
    fn read(&self) -> AuthResult<Option<CachedIdentity>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| AuthError::cache("identity cache mutex poisoned"))?;
        Ok(slot.clone())
    }

    fn write(&self, record: &CachedIdentity) -> AuthResult<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| AuthError::cache("identity cache mutex poisoned"))?;
        *slot = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> AuthResult<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| AuthError::cache("identity cache mutex poisoned"))?;
        *slot = None;
        Ok(())
    }
}
