//! Personal menu markup cache

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::SessionStorage;
use crate::core::StorageFault;

/// Key/value cache over a [`SessionStorage`]
///
/// Support for the medium is probed once at construction and again on every
/// call. Any fault while reading or writing wipes the whole area and is logged
/// once; callers only ever see "absent" or a fault value, never a panic.
pub struct CacheStore {
    backend: Mutex<Box<dyn SessionStorage>>,
    supported: bool,
    faults: AtomicUsize,
}

impl CacheStore {
    pub fn new(backend: Box<dyn SessionStorage>) -> Self {
        let supported = backend.is_available();
        if !supported {
            tracing::debug!("session storage not supported, personal menu cache disabled");
        }
        Self {
            backend: Mutex::new(backend),
            supported,
            faults: AtomicUsize::new(0),
        }
    }

    /// Whether cached markup can be read or written right now
    pub fn supports_session_storage(&self) -> bool {
        self.supported && self.lock().is_available()
    }

    /// Cached markup for `key`, or `None` when absent or on any fault
    pub fn get(&self, key: &str) -> Option<String> {
        if !self.supported {
            return None;
        }
        let mut backend = self.lock();
        if !backend.is_available() {
            return None;
        }
        match backend.get_item(key) {
            Ok(value) => value,
            Err(fault) => {
                self.wipe(&mut backend, key, &fault);
                None
            }
        }
    }

    /// Store markup under `key`
    ///
    /// Unsupported storage is reported as [`StorageFault::Unavailable`]
    /// without wiping anything; every other fault clears the store first.
    pub fn set(&self, key: &str, markup: &str) -> Result<(), StorageFault> {
        if !self.supported {
            return Err(StorageFault::Unavailable);
        }
        let mut backend = self.lock();
        if !backend.is_available() {
            return Err(StorageFault::Unavailable);
        }
        let result = backend.set_item(key, markup);
        if let Err(fault) = &result {
            self.wipe(&mut backend, key, fault);
        }
        result
    }

    /// Drop every cached entry
    pub fn clear(&self) {
        if let Err(e) = self.lock().clear() {
            tracing::debug!("clearing session storage failed: {}", e);
        }
    }

    /// Number of faults recovered from so far
    pub fn fault_count(&self) -> usize {
        self.faults.load(Ordering::Relaxed)
    }

    fn wipe(&self, backend: &mut Box<dyn SessionStorage>, key: &str, fault: &StorageFault) {
        self.faults.fetch_add(1, Ordering::Relaxed);
        tracing::error!(key, "session storage fault, clearing cache: {}", fault);
        if let Err(e) = backend.clear() {
            tracing::debug!("clearing session storage failed: {}", e);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn SessionStorage>> {
        self.backend.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("CacheStore lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::io::Write;
    use std::sync::Arc;

    /// Memory storage whose reads and writes can be made to fail
    pub(crate) struct FaultyStorage {
        pub inner: MemoryStorage,
        pub fail_reads: Arc<std::sync::atomic::AtomicBool>,
        pub fail_writes: Arc<std::sync::atomic::AtomicBool>,
    }

    impl FaultyStorage {
        pub fn new() -> Self {
            Self {
                inner: MemoryStorage::new(),
                fail_reads: Arc::default(),
                fail_writes: Arc::default(),
            }
        }
    }

    impl SessionStorage for FaultyStorage {
        fn is_available(&self) -> bool {
            true
        }

        fn get_item(&self, key: &str) -> Result<Option<String>, StorageFault> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StorageFault::Corrupted("bad entry".into()));
            }
            self.inner.get_item(key)
        }

        fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageFault> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageFault::QuotaExceeded {
                    needed: value.len(),
                    quota: 0,
                });
            }
            self.inner.set_item(key, value)
        }

        fn clear(&mut self) -> Result<(), StorageFault> {
            self.inner.clear()
        }
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture_logs<F: FnOnce()>(f: F) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::ERROR)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_get_set_round_trip() {
        let cache = CacheStore::new(Box::new(MemoryStorage::new()));
        assert!(cache.supports_session_storage());
        assert_eq!(cache.get("a"), None);

        cache.set("a", "<p>one</p>").unwrap();
        assert_eq!(cache.get("a"), Some("<p>one</p>".to_string()));
    }

    #[test]
    fn test_unsupported_storage_is_silent() {
        let cache = CacheStore::new(Box::new(MemoryStorage::disabled()));
        assert!(!cache.supports_session_storage());

        let logs = capture_logs(|| {
            assert_eq!(cache.set("a", "x"), Err(StorageFault::Unavailable));
            assert_eq!(cache.get("a"), None);
        });
        assert!(logs.is_empty());
        assert_eq!(cache.fault_count(), 0);
    }

    #[test]
    fn test_read_fault_wipes_store_and_logs_once() {
        let storage = FaultyStorage::new();
        let fail_reads = storage.fail_reads.clone();
        let cache = CacheStore::new(Box::new(storage));
        cache.set("s1personal-menu-deadlines", "d").unwrap();
        cache.set("s1personal-menu-messages", "m").unwrap();

        let logs = capture_logs(|| {
            fail_reads.store(true, Ordering::SeqCst);
            assert_eq!(cache.get("s1personal-menu-deadlines"), None);
            fail_reads.store(false, Ordering::SeqCst);
        });

        assert_eq!(logs.matches("session storage fault").count(), 1);
        assert_eq!(cache.fault_count(), 1);
        assert_eq!(cache.get("s1personal-menu-deadlines"), None);
        assert_eq!(cache.get("s1personal-menu-messages"), None);
    }

    #[test]
    fn test_write_fault_wipes_store_and_reports() {
        let storage = FaultyStorage::new();
        let fail_writes = storage.fail_writes.clone();
        let cache = CacheStore::new(Box::new(storage));
        cache.set("keep", "old").unwrap();

        fail_writes.store(true, Ordering::SeqCst);
        let logs = capture_logs(|| {
            let result = cache.set("big", "huge markup");
            assert!(matches!(result, Err(StorageFault::QuotaExceeded { .. })));
        });
        fail_writes.store(false, Ordering::SeqCst);

        assert_eq!(logs.matches("session storage fault").count(), 1);
        assert_eq!(cache.get("keep"), None);
        assert_eq!(cache.get("big"), None);
    }

    #[test]
    fn test_quota_exceeded_clears_everything() {
        let cache = CacheStore::new(Box::new(MemoryStorage::with_quota(16)));
        cache.set("a", "1234").unwrap();
        assert!(cache.set("b", "this value is far too large").is_err());
        assert_eq!(cache.get("a"), None);

        // Store is usable again after the wipe
        cache.set("c", "ok").unwrap();
        assert_eq!(cache.get("c"), Some("ok".to_string()));
    }
}
