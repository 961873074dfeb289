//! Key/value JSON persistence
//!
//! Settings and profiles both live here:
//! - LocalStorage on web
//! - A process-local map natively (nothing touches the disk)

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Load and decode a value, `Ok(None)` when the key was never written
pub fn load_json<T: DeserializeOwned>(key: &str) -> Result<Option<T>> {
    match backend::get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and store a value under `key`
pub fn save_json<T: Serialize>(key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    backend::set(key, &json)
}

/// Remove a key (missing keys are fine)
pub fn remove(key: &str) -> Result<()> {
    backend::remove(key)
}

#[cfg(target_arch = "wasm32")]
mod backend {
    use crate::error::{Error, Result};

    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(Error::StorageUnavailable)
    }

    fn js_err(e: wasm_bindgen::JsValue) -> Error {
        Error::Storage(format!("{e:?}"))
    }

    pub fn get(key: &str) -> Result<Option<String>> {
        storage()?.get_item(key).map_err(js_err)
    }

    pub fn set(key: &str, value: &str) -> Result<()> {
        storage()?.set_item(key, value).map_err(js_err)
    }

    pub fn remove(key: &str) -> Result<()> {
        storage()?.remove_item(key).map_err(js_err)
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod backend {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use crate::error::Result;

    thread_local! {
        static STORE: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
    }

    pub fn get(key: &str) -> Result<Option<String>> {
        Ok(STORE.with(|s| s.borrow().get(key).cloned()))
    }

    pub fn set(key: &str, value: &str) -> Result<()> {
        STORE.with(|s| s.borrow_mut().insert(key.to_string(), value.to_string()));
        Ok(())
    }

    pub fn remove(key: &str) -> Result<()> {
        STORE.with(|s| s.borrow_mut().remove(key));
        Ok(())
    }
}

/// Load a value, logging and falling back to `None` on any failure
pub fn load_or_warn<T: DeserializeOwned>(key: &str) -> Option<T> {
    match load_json(key) {
        Ok(value) => value,
        Err(Error::StorageUnavailable) => None,
        Err(e) => {
            log::warn!("Ignoring stored {key}: {e}");
            None
        }
    }
}

/// Save a value, logging any failure instead of propagating it
pub fn save_or_warn<T: Serialize>(key: &str, value: &T) {
    if let Err(e) = save_json(key, value) {
        log::warn!("Could not save {key}: {e}");
    }
}
