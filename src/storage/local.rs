//! Directory-backed object store.

use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;

use super::{ObjectLocation, ObjectStore};
use crate::error::{Error, Result};

/// Object store rooted at a local directory.
///
/// Each bucket is a directory directly under the root and keys are relative
/// paths inside it. Writes go to a temporary file in the destination
/// directory and are renamed into place, so readers never see a partial
/// artifact.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path of an object.
    pub fn path_for(&self, location: &ObjectLocation) -> Result<PathBuf> {
        check_relative("bucket", &location.bucket, true)?;
        check_relative("key", &location.key, false)?;
        Ok(self.root.join(&location.bucket).join(&location.key))
    }
}

/// Reject empty, absolute and parent-relative names.
fn check_relative(what: &str, name: &str, single: bool) -> Result<()> {
    let reject = || Error::Storage(format!("invalid {what} {name:?}"));

    if name.is_empty() {
        return Err(reject());
    }
    let mut normal = 0;
    for component in Path::new(name).components() {
        match component {
            Component::Normal(_) => normal += 1,
            Component::CurDir => {}
            _ => return Err(reject()),
        }
    }
    if normal == 0 || (single && normal > 1) {
        return Err(reject());
    }
    Ok(())
}

fn storage_error(location: &ObjectLocation, err: io::Error) -> Error {
    Error::Storage(format!("{location}: {err}"))
}

impl ObjectStore for LocalStore {
    fn get(&self, location: &ObjectLocation) -> Result<Vec<u8>> {
        let path = self.path_for(location)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::NotFound {
                bucket: location.bucket.clone(),
                key: location.key.clone(),
            }),
            Err(e) => Err(storage_error(location, e)),
        }
    }

    fn put(&self, location: &ObjectLocation, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(location)?;
        let parent = path
            .parent()
            .ok_or_else(|| Error::Storage(format!("no parent directory for {location}")))?;
        let failed = |e: io::Error| storage_error(location, e);
        fs::create_dir_all(parent).map_err(failed)?;

        let mut staged = NamedTempFile::new_in(parent).map_err(failed)?;
        staged.write_all(bytes).map_err(failed)?;
        staged.as_file().sync_all().map_err(failed)?;
        staged.persist(&path).map_err(|e| failed(e.error))?;

        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}
