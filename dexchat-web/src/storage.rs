use dexchat_client::{api::StorageError, Backend};
use gloo_storage::{LocalStorage, Storage};
use wasm_bindgen::JsValue;

/// The browser's `window.localStorage`
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl Backend for BrowserStorage {
    fn get_raw(&self, key: &str) -> Option<String> {
        match LocalStorage::raw().get_item(key) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(key, ?err, "failed reading local storage");
                None
            }
        }
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| classify(key, err))
    }

    fn delete(&mut self, key: &str) {
        LocalStorage::delete(key)
    }
}

fn classify(key: &str, err: JsValue) -> StorageError {
    let name = js_sys::Reflect::get(&err, &JsValue::from_str("name"))
        .ok()
        .and_then(|n| n.as_string());
    match name.as_deref() {
        // firefox used to report the latter
        Some("QuotaExceededError") | Some("NS_ERROR_DOM_QUOTA_REACHED") => {
            StorageError::QuotaExceeded {
                key: String::from(key),
            }
        }
        _ => StorageError::Unavailable(format!("{err:?}")),
    }
}
