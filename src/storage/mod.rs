//! Object storage collaborators.
//!
//! The handler reads source documents and writes artifacts through the
//! [`ObjectStore`] trait. Two implementations ship with the crate:
//! [`MemoryStore`] for tests and embedding, and [`LocalStore`], which maps
//! buckets onto directories.

mod local;
mod memory;

pub use local::LocalStore;
pub use memory::MemoryStore;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::detect::type_hint_from_key;
use crate::error::Result;

/// A bucket and key pair identifying one stored object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    /// Create a new location.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Same bucket, key with `suffix` appended.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self {
            bucket: self.bucket.clone(),
            key: format!("{}{}", self.key, suffix),
        }
    }

    /// Type hint derived from the key's final extension.
    pub fn type_hint(&self) -> String {
        type_hint_from_key(&self.key)
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Byte-level access to an object store.
pub trait ObjectStore: Send + Sync {
    /// Download an object.
    ///
    /// Fails with [`Error::NotFound`](crate::Error::NotFound) when the object
    /// does not exist.
    fn get(&self, location: &ObjectLocation) -> Result<Vec<u8>>;

    /// Upload an object, overwriting any existing one.
    fn put(&self, location: &ObjectLocation, bytes: &[u8]) -> Result<()>;
}

impl<S: ObjectStore + ?Sized> ObjectStore for &S {
    fn get(&self, location: &ObjectLocation) -> Result<Vec<u8>> {
        (**self).get(location)
    }

    fn put(&self, location: &ObjectLocation, bytes: &[u8]) -> Result<()> {
        (**self).put(location, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_with_suffix() {
        let src = ObjectLocation::new("uploads", "reports/q1.xlsx");
        let dst = src.with_suffix(".extracted");
        assert_eq!(dst.bucket, "uploads");
        assert_eq!(dst.key, "reports/q1.xlsx.extracted");
        assert_eq!(src.type_hint(), "xlsx");
    }

    #[test]
    fn test_location_display() {
        let loc = ObjectLocation::new("uploads", "a/b.PDF");
        assert_eq!(loc.to_string(), "uploads/a/b.PDF");
        assert_eq!(loc.type_hint(), "pdf");
    }
}
