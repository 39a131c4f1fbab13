//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`PersistentByteStore`] with one `u8` entry per offset in
//! the `handlight` namespace.  Each write is committed before returning.
//! The simulation backend keeps the bytes in a map.

use log::info;

use crate::app::ports::{PersistentByteStore, StorageError};

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::warn;

#[cfg(target_os = "espidf")]
const NAMESPACE: &[u8] = b"handlight\0";

pub struct NvsByteStore {
    #[cfg(not(target_os = "espidf"))]
    store: HashMap<u8, u8>,
}

/// NUL-terminated key for a byte offset: `b0` .. `b255`.
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
fn offset_key(offset: u8) -> [u8; 5] {
    let mut key = [0u8; 5];
    key[0] = b'b';
    let mut digits = [0u8; 3];
    let mut n = offset;
    let mut len = 0;
    loop {
        digits[len] = b'0' + n % 10;
        len += 1;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    for i in 0..len {
        key[1 + i] = digits[len - 1 - i];
    }
    key
}

impl NvsByteStore {
    /// Initialise NVS flash.  On first boot or after a version mismatch
    /// the partition is erased and re-initialised.
    pub fn new() -> Result<Self, StorageError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES as i32 || ret == ESP_ERR_NVS_NEW_VERSION_FOUND as i32 {
                warn!("NVS: erasing and re-initialising flash partition");
                if unsafe { nvs_flash_erase() } != ESP_OK as i32 {
                    return Err(StorageError::IoError);
                }
                if unsafe { nvs_flash_init() } != ESP_OK as i32 {
                    return Err(StorageError::IoError);
                }
            } else if ret != ESP_OK as i32 {
                return Err(StorageError::IoError);
            }
            info!("NvsByteStore: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsByteStore: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: HashMap::new(),
        })
    }

    /// Open the namespace, run `f` with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        // SAFETY: NAMESPACE is NUL-terminated; handle is a valid out-pointer.
        let ret = unsafe { nvs_open(NAMESPACE.as_ptr().cast(), mode, &mut handle) };
        if ret != ESP_OK as i32 {
            return Err(ret);
        }

        let result = f(handle);
        // SAFETY: handle was opened above and is not used after this.
        unsafe {
            nvs_close(handle);
        }
        result
    }
}

#[cfg(target_os = "espidf")]
fn map_err(rc: i32) -> StorageError {
    if rc == ESP_ERR_NVS_NOT_FOUND as i32 {
        StorageError::NotFound
    } else {
        StorageError::IoError
    }
}

#[cfg(target_os = "espidf")]
impl PersistentByteStore for NvsByteStore {
    fn read_byte(&mut self, offset: u8) -> Result<u8, StorageError> {
        let key = offset_key(offset);
        Self::with_nvs_handle(false, |h| {
            let mut value: u8 = 0;
            // SAFETY: key is NUL-terminated; value is a valid out-pointer.
            let ret = unsafe { nvs_get_u8(h, key.as_ptr().cast(), &mut value) };
            if ret == ESP_OK as i32 { Ok(value) } else { Err(ret) }
        })
        .map_err(map_err)
    }

    fn write_byte(&mut self, offset: u8, value: u8) -> Result<(), StorageError> {
        let key = offset_key(offset);
        Self::with_nvs_handle(true, |h| {
            // SAFETY: key is NUL-terminated; handle opened read-write.
            let ret = unsafe { nvs_set_u8(h, key.as_ptr().cast(), value) };
            if ret != ESP_OK as i32 {
                return Err(ret);
            }
            let ret = unsafe { nvs_commit(h) };
            if ret == ESP_OK as i32 { Ok(()) } else { Err(ret) }
        })
        .map_err(|rc| {
            warn!("NVS: write of offset {} failed (rc={})", offset, rc);
            StorageError::IoError
        })
    }
}

#[cfg(not(target_os = "espidf"))]
impl PersistentByteStore for NvsByteStore {
    fn read_byte(&mut self, offset: u8) -> Result<u8, StorageError> {
        self.store.get(&offset).copied().ok_or(StorageError::NotFound)
    }

    fn write_byte(&mut self, offset: u8, value: u8) -> Result<(), StorageError> {
        self.store.insert(offset, value);
        Ok(())
    }
}
