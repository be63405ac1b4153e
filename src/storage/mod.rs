//! Session storage for personal menu markup
//!
//! A [`SessionStorage`] is the raw per-origin, per-session key/value medium.
//! [`CacheStore`] wraps one and turns every fault into a full wipe so a broken
//! medium can never block rendering.

mod cache;
mod file;
mod memory;

pub use cache::CacheStore;
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::core::StorageFault;

/// Raw key/value storage area scoped to one origin and browsing session
pub trait SessionStorage: Send {
    /// Whether the medium can be used at all in this environment
    fn is_available(&self) -> bool;

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageFault>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageFault>;

    fn clear(&mut self) -> Result<(), StorageFault>;
}
