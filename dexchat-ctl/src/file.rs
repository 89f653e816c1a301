use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Context;
use dexchat_client::{api::StorageError, Backend};

/// A JSON object mapping storage keys to their raw values, kept in one file
///
/// The file is rewritten as a whole on every write.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileBackend {
    /// Opens `path`, which does not need to exist yet
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<FileBackend> {
        let path = path.into();
        let entries = match path.exists() {
            false => BTreeMap::new(),
            true => {
                let data = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading store {path:?}"))?;
                serde_json::from_str(&data).with_context(|| format!("parsing store {path:?}"))?
            }
        };
        tracing::debug!(?path, keys = entries.len(), "opened store");
        Ok(FileBackend { path, entries })
    }

    fn flush(&self) -> Result<(), StorageError> {
        let data = serde_json::to_string_pretty(&self.entries).map_err(|e| {
            StorageError::Serialize {
                key: self.path.display().to_string(),
                message: e.to_string(),
            }
        })?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, data)
            .and_then(|()| std::fs::rename(&tmp, &self.path))
            .map_err(|e| StorageError::Unavailable(format!("writing {:?}: {e}", self.path)))
    }
}

impl Backend for FileBackend {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let old = self.entries.insert(String::from(key), String::from(value));
        let res = self.flush();
        if res.is_err() {
            match old {
                Some(old) => self.entries.insert(String::from(key), old),
                None => self.entries.remove(key),
            };
        }
        res
    }

    fn delete(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            if let Err(err) = self.flush() {
                tracing::warn!(key, %err, "failed persisting deletion");
            }
        }
    }
}
