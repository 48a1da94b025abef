//! Host registry
//!
//! Source of truth for which hosts should be monitored. The entry list is
//! insertion-ordered, addresses are unique, and every mutation is written
//! through to the registry file before it returns success, so a crash never
//! leaves disk behind memory.

use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::storage::error::StorageError;
use crate::storage::registry_file;

/// One monitored host: unique address plus a human-readable label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub address: String,
    pub label: String,
}

/// Errors surfaced synchronously from registry mutations
#[derive(Debug)]
pub enum RegistryError {
    /// The address is already registered
    DuplicateAddress(String),

    /// The address is not registered
    NotFound(String),

    /// The registry file could not be written
    Storage(StorageError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateAddress(addr) => {
                write!(f, "host {} is already registered", addr)
            }
            RegistryError::NotFound(addr) => write!(f, "host {} is not registered", addr),
            RegistryError::Storage(err) => write!(f, "failed to persist registry: {}", err),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for RegistryError {
    fn from(err: StorageError) -> Self {
        RegistryError::Storage(err)
    }
}

/// Insertion-ordered collection of monitored hosts with write-through
/// persistence
///
/// All methods take `&self`; the entry list is guarded by a mutex so the
/// control surface and the probe loops can use the registry concurrently.
pub struct HostRegistry {
    path: PathBuf,
    entries: Mutex<Vec<HostEntry>>,
}

impl HostRegistry {
    /// Load the registry from `path`.
    ///
    /// A missing or unreadable file yields an empty registry.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = registry_file::load_records(&path);

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Register a host. The full registry is persisted before returning;
    /// on a failed write the in-memory add is rolled back.
    pub fn add(&self, address: &str, label: &str) -> Result<HostEntry, RegistryError> {
        let mut entries = self.entries.lock().expect("registry lock poisoned");

        if entries.iter().any(|e| e.address == address) {
            return Err(RegistryError::DuplicateAddress(address.to_string()));
        }

        let entry = HostEntry {
            address: address.to_string(),
            label: label.to_string(),
        };
        entries.push(entry.clone());

        if let Err(err) = registry_file::save_records(&self.path, &entries) {
            entries.pop();
            return Err(err.into());
        }

        Ok(entry)
    }

    /// Deregister a host. The remaining registry is persisted (full
    /// rewrite) before returning; on a failed write the entry is restored.
    pub fn remove(&self, address: &str) -> Result<(), RegistryError> {
        let mut entries = self.entries.lock().expect("registry lock poisoned");

        let Some(index) = entries.iter().position(|e| e.address == address) else {
            return Err(RegistryError::NotFound(address.to_string()));
        };

        let removed = entries.remove(index);

        if let Err(err) = registry_file::save_records(&self.path, &entries) {
            entries.insert(index, removed);
            return Err(err.into());
        }

        Ok(())
    }

    /// Snapshot of all entries in insertion order.
    pub fn list(&self) -> Vec<HostEntry> {
        self.entries.lock().expect("registry lock poisoned").clone()
    }

    /// Whether `address` is currently registered. Probe loops use this as
    /// the authoritative liveness check for their host.
    pub fn contains(&self, address: &str) -> bool {
        self.entries
            .lock()
            .expect("registry lock poisoned")
            .iter()
            .any(|e| e.address == address)
    }
}
