//! In-memory object store.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{ObjectLocation, ObjectStore};
use crate::error::{Error, Result};

/// Thread-safe in-memory object store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<ObjectLocation, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object, returning `self` for chaining.
    pub fn with_object(self, location: ObjectLocation, bytes: impl Into<Vec<u8>>) -> Self {
        if let Ok(mut objects) = self.objects.write() {
            objects.insert(location, bytes.into());
        }
        self
    }

    /// Check whether an object exists.
    pub fn contains(&self, location: &ObjectLocation) -> bool {
        self.objects
            .read()
            .map(|objects| objects.contains_key(location))
            .unwrap_or(false)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().map(|objects| objects.len()).unwrap_or(0)
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored locations, sorted by bucket then key.
    pub fn locations(&self) -> Vec<ObjectLocation> {
        let mut locations: Vec<ObjectLocation> = self
            .objects
            .read()
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default();
        locations.sort_by(|a, b| (&a.bucket, &a.key).cmp(&(&b.bucket, &b.key)));
        locations
    }
}

impl ObjectStore for MemoryStore {
    fn get(&self, location: &ObjectLocation) -> Result<Vec<u8>> {
        let objects = self
            .objects
            .read()
            .map_err(|_| Error::Storage("memory store lock poisoned".into()))?;
        objects.get(location).cloned().ok_or_else(|| Error::NotFound {
            bucket: location.bucket.clone(),
            key: location.key.clone(),
        })
    }

    fn put(&self, location: &ObjectLocation, bytes: &[u8]) -> Result<()> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| Error::Storage("memory store lock poisoned".into()))?;
        objects.insert(location.clone(), bytes.to_vec());
        Ok(())
    }
}
