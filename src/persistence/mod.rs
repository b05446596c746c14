use std::{
    collections::HashMap,
    fs,
    path::{
        Path,
        PathBuf,
    },
    sync::{
        Mutex,
        MutexGuard,
    },
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::core::HortasError;

const APP_NAME: &str = "hortas";
const CREDENTIALS_FILE: &str = "credentials.json";

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join(APP_NAME);
        let _ = fs::create_dir_all(&app_dir);
        app_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

pub fn save_json<T: Serialize>(data: &T, path: &Path) -> Result<(), HortasError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "data saved");
    Ok(())
}

pub fn load_json<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> Result<T, HortasError> {
    if !path.exists() {
        return Ok(T::default());
    }

    let json = fs::read_to_string(path)?;
    let data: T = serde_json::from_str(&json)?;
    tracing::debug!(path = %path.display(), "data loaded");
    Ok(data)
}

pub fn load_json_or_default<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> T {
    match load_json::<T>(path) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to load, using defaults");
            T::default()
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Key/value storage for credentials, the native stand-in for browser
/// local storage.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), HortasError>;

    fn remove(&self, key: &str) -> Result<(), HortasError>;
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), HortasError> {
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), HortasError> {
        lock(&self.values).remove(key);
        Ok(())
    }
}

/// Credential map persisted as a JSON object; every write goes to disk.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileCredentialStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, HortasError> {
        let path = path.into();
        let values: HashMap<String, String> = load_json(&path)?;
        Ok(Self { path, values: Mutex::new(values) })
    }

    pub fn open_default() -> Result<Self, HortasError> {
        Self::open(get_data_file_path(CREDENTIALS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &HashMap<String, String>) -> Result<(), HortasError> {
        save_json(values, &self.path)
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), HortasError> {
        let mut values = lock(&self.values);
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    fn remove(&self, key: &str) -> Result<(), HortasError> {
        let mut values = lock(&self.values);
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }
}
