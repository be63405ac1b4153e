//! File-backed session storage
//!
//! One JSON document per origin in the cache directory. The document records
//! the session it belongs to; opening it for a different session starts from
//! an empty area, which is what a browser does when a new session begins.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::SessionStorage;
use crate::core::StorageFault;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StorageDocument {
    session: String,
    items: BTreeMap<String, String>,
}

/// Session storage persisted to `<dir>/<origin>.json`
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    doc: StorageDocument,
    /// Set when the document on disk could not be decoded
    corrupt: Option<String>,
    available: bool,
}

impl FileStorage {
    /// Open the storage area for `origin`, scoped to `session`
    pub fn open(dir: &Path, origin: &str, session: &str) -> Self {
        let path = dir.join(format!("{}.json", sanitize(origin)));
        let available = std::fs::create_dir_all(dir).is_ok();
        let mut storage = Self {
            path,
            doc: StorageDocument {
                session: session.to_string(),
                items: BTreeMap::new(),
            },
            corrupt: None,
            available,
        };

        if available {
            match std::fs::read_to_string(&storage.path) {
                Ok(content) => match serde_json::from_str::<StorageDocument>(&content) {
                    Ok(doc) if doc.session == session => storage.doc = doc,
                    Ok(_) => tracing::debug!("session changed, starting with empty storage"),
                    Err(e) => storage.corrupt = Some(e.to_string()),
                },
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => storage.corrupt = Some(e.to_string()),
            }
        }
        storage
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check(&self) -> Result<(), StorageFault> {
        if !self.available {
            return Err(StorageFault::Unavailable);
        }
        if let Some(reason) = &self.corrupt {
            return Err(StorageFault::Corrupted(reason.clone()));
        }
        Ok(())
    }

    fn persist(&self) -> Result<(), StorageFault> {
        let content = serde_json::to_string(&self.doc)
            .map_err(|e| StorageFault::Corrupted(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn is_available(&self) -> bool {
        self.available
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageFault> {
        self.check()?;
        Ok(self.doc.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageFault> {
        self.check()?;
        let previous = self.doc.items.insert(key.to_string(), value.to_string());
        if let Err(fault) = self.persist() {
            match previous {
                Some(old) => self.doc.items.insert(key.to_string(), old),
                None => self.doc.items.remove(key),
            };
            return Err(fault);
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageFault> {
        if !self.available {
            return Err(StorageFault::Unavailable);
        }
        self.doc.items.clear();
        self.corrupt = None;
        self.persist()
    }
}

fn sanitize(origin: &str) -> String {
    origin
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
