//! Object-created notifications.
//!
//! The trigger delivers a JSON document with a `Records` array; each record
//! names the bucket and key of one uploaded object. Fields other than those
//! two are ignored.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::ObjectLocation;

/// An object-created notification.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StorageEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<EventRecord>,
}

/// One record of a [`StorageEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub s3: S3Entity,
}

/// Storage section of an event record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketEntity,
    pub object: ObjectEntity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketEntity {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntity {
    pub key: String,
}

impl StorageEvent {
    /// Build an event for the given locations.
    pub fn for_locations<I>(locations: I) -> Self
    where
        I: IntoIterator<Item = ObjectLocation>,
    {
        let records = locations
            .into_iter()
            .map(|location| EventRecord {
                s3: S3Entity {
                    bucket: BucketEntity {
                        name: location.bucket,
                    },
                    object: ObjectEntity { key: location.key },
                },
            })
            .collect();
        Self { records }
    }

    /// Parse a notification document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Event(e.to_string()))
    }

    /// Read and parse a notification file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Object locations, in record order.
    ///
    /// An event without records is rejected.
    pub fn locations(&self) -> Result<Vec<ObjectLocation>> {
        if self.records.is_empty() {
            return Err(Error::Event("event has no records".into()));
        }
        Ok(self
            .records
            .iter()
            .map(|record| ObjectLocation::new(&record.s3.bucket.name, &record.s3.object.key))
            .collect())
    }
}
