//! In-process session storage

use std::collections::HashMap;

use super::SessionStorage;
use crate::core::StorageFault;

/// Session storage that lives as long as the process
///
/// An optional byte quota models a full browser storage area.
#[derive(Debug)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    quota: Option<usize>,
    available: bool,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            quota: None,
            available: true,
        }
    }

    /// Storage limited to `quota` bytes of keys plus values
    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::new()
        }
    }

    /// Storage that reports itself as unsupported
    pub fn disabled() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl SessionStorage for MemoryStorage {
    fn is_available(&self) -> bool {
        self.available
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageFault> {
        if !self.available {
            return Err(StorageFault::Unavailable);
        }
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageFault> {
        if !self.available {
            return Err(StorageFault::Unavailable);
        }
        if let Some(quota) = self.quota {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StorageFault::QuotaExceeded { needed, quota });
            }
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageFault> {
        self.items.clear();
        Ok(())
    }
}
