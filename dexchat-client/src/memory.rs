use std::collections::HashMap;

use crate::{api::StorageError, Backend};

/// In-memory backend, with an optional size quota and injectable write failures
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,

    /// Maximum total size of keys and values, in bytes
    quota: Option<usize>,

    writes_before_failing: usize,
    failing_writes: usize,
    writes: usize,
}

impl MemoryBackend {
    pub fn new() -> MemoryBackend {
        MemoryBackend::default()
    }

    pub fn with_quota(bytes: usize) -> MemoryBackend {
        MemoryBackend {
            quota: Some(bytes),
            ..MemoryBackend::default()
        }
    }

    /// Make the next `n` writes fail as if storage was unavailable
    pub fn fail_next_writes(&mut self, n: usize) {
        self.fail_writes_after(0, n);
    }

    /// Let `ok` more writes through, then fail the `n` following ones
    pub fn fail_writes_after(&mut self, ok: usize, n: usize) {
        self.writes_before_failing = ok;
        self.failing_writes = n;
    }

    /// Number of successful writes so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl Backend for MemoryBackend {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.writes_before_failing > 0 {
            self.writes_before_failing -= 1;
        } else if self.failing_writes > 0 {
            self.failing_writes -= 1;
            return Err(StorageError::Unavailable(String::from(
                "injected write failure",
            )));
        }
        if let Some(quota) = self.quota {
            let replaced = self.entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            if self.used_bytes() - replaced + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    key: String::from(key),
                });
            }
        }
        self.entries.insert(String::from(key), String::from(value));
        self.writes += 1;
        Ok(())
    }

    fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
