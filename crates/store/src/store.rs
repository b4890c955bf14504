use crate::{StorageBackend, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, error, warn};

/// Appended to a key to hold a stored value that no longer decodes.
pub const BACKUP_SUFFIX: &str = ".corrupt";

pub fn backup_key(key: &str) -> String {
    format!("{key}{BACKUP_SUFFIX}")
}

/// Typed JSON values over an optional [`StorageBackend`].
///
/// Without a backend every load yields the supplied default and every save
/// is dropped. A stored value that fails to decode is copied to
/// [`backup_key`] before the default is handed out; when even that copy is
/// impossible the key is held and later saves to it fail.
#[derive(Debug)]
pub struct PersistentStore<B> {
    backend: Option<B>,
    held: HashSet<String>,
}

impl<B: StorageBackend> PersistentStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Some(backend),
            held: HashSet::new(),
        }
    }

    pub fn without_backend() -> Self {
        Self {
            backend: None,
            held: HashSet::new(),
        }
    }

    /// Whether saves to `key` are refused to protect an unreadable stored value.
    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> Option<&mut B> {
        self.backend.as_mut()
    }

    /// Reads `key`, filling anything the stored value lacks from `default`.
    /// Missing or unreadable data yields `default`.
    pub fn load<T>(&mut self, key: &str, default: T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        let Some(backend) = self.backend.as_mut() else {
            return default;
        };
        let body = match backend.read(key) {
            Ok(Some(body)) => body,
            Ok(None) => {
                debug!(key, "nothing stored yet, using default");
                return default;
            }
            Err(err) => {
                error!(key, error = %err, "stored state unreadable, holding writes");
                self.held.insert(key.to_string());
                return default;
            }
        };
        let err = match decode_merged(&body, &default) {
            Ok(value) => return value,
            Err(err) => err,
        };
        let backup = backup_key(key);
        match backend.write(&backup, &body) {
            Ok(()) => {
                warn!(key, backup = %backup, error = %err, "stored state undecodable, kept a copy and using default");
            }
            Err(write_err) => {
                error!(key, error = %err, backup_error = %write_err, "stored state undecodable and not backed up, holding writes");
                self.held.insert(key.to_string());
            }
        }
        default
    }

    pub fn save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        if self.held.contains(key) {
            return Err(StoreError::Held {
                key: key.to_string(),
            });
        }
        let Some(backend) = self.backend.as_mut() else {
            debug!(key, "no storage backend, write dropped");
            return Ok(());
        };
        let body = serde_json::to_string(value)?;
        backend.write(key, &body)
    }
}

fn decode_merged<T>(body: &str, default: &T) -> Result<T, StoreError>
where
    T: Serialize + DeserializeOwned,
{
    let stored: Value = serde_json::from_str(body)?;
    let mut merged = serde_json::to_value(default)?;
    merge(&mut merged, stored);
    Ok(serde_json::from_value(merged)?)
}

/// Overlays `stored` on `base` object by object. Stored nulls keep the base
/// value; any other stored value replaces it wholesale.
fn merge(base: &mut Value, stored: Value) {
    match (base, stored) {
        (Value::Object(base), Value::Object(stored)) => {
            for (key, value) in stored {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBackend;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        name: String,
        volume: u8,
        tags: Vec<String>,
    }

    fn defaults() -> Prefs {
        Prefs {
            name: "anon".to_string(),
            volume: 5,
            tags: vec!["a".to_string()],
        }
    }

    macro_rules! merge_case {
        ($name:ident, $base:expr, $stored:expr, $expected:expr) => {
            #[test]
            fn $name() {
                let mut base = $base;
                merge(&mut base, $stored);
                assert_eq!(base, $expected);
            }
        };
    }

    merge_case!(merge_fills_missing_keys, json!({"a": 1, "b": 2}), json!({"a": 9}), json!({"a": 9, "b": 2}));
    merge_case!(merge_keeps_default_on_null, json!({"a": 1}), json!({"a": null}), json!({"a": 1}));
    merge_case!(merge_recurses_into_objects, json!({"o": {"x": 1, "y": 2}}), json!({"o": {"y": 3}}), json!({"o": {"x": 1, "y": 3}}));
    merge_case!(merge_replaces_arrays, json!({"l": [1, 2, 3]}), json!({"l": [4]}), json!({"l": [4]}));
    merge_case!(merge_keeps_unknown_keys, json!({"a": 1}), json!({"z": true}), json!({"a": 1, "z": true}));

    #[test]
    fn partial_blob_is_completed_from_default() {
        let backend = MemoryBackend::new().with_entry("prefs", r#"{"volume": 9}"#);
        let mut store = PersistentStore::new(backend);
        let loaded = store.load("prefs", defaults());
        assert_eq!(loaded.volume, 9);
        assert_eq!(loaded.name, "anon");
        assert_eq!(loaded.tags, vec!["a".to_string()]);
    }

    #[test]
    fn corrupt_blob_falls_back_to_default() {
        let backend = MemoryBackend::new().with_entry("prefs", "{not json");
        let mut store = PersistentStore::new(backend);
        assert_eq!(store.load("prefs", defaults()), defaults());
    }

    #[test]
    fn wrong_shape_falls_back_to_default() {
        let backend = MemoryBackend::new().with_entry("prefs", r#"{"volume": "loud"}"#);
        let mut store = PersistentStore::new(backend);
        assert_eq!(store.load("prefs", defaults()), defaults());
    }

    #[test]
    fn undecodable_blob_survives_the_next_save() {
        let original = r#"{"volume": -1, "name": "precious"}"#;
        let mut store = PersistentStore::new(MemoryBackend::new().with_entry("prefs", original));
        assert_eq!(store.load("prefs", defaults()), defaults());
        store.save("prefs", &defaults()).expect("save over default");
        let backend = store.backend().expect("backend");
        assert_eq!(backend.get("prefs.corrupt"), Some(original));
        assert!(!store.is_held("prefs"));
    }

    /// Reads always fail; writes land in memory.
    #[derive(Debug, Default)]
    struct UnreadableBackend {
        inner: MemoryBackend,
    }

    impl StorageBackend for UnreadableBackend {
        fn read(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Backend("permission denied".to_string()))
        }

        fn write(&mut self, key: &str, body: &str) -> Result<(), StoreError> {
            self.inner.write(key, body)
        }
    }

    #[test]
    fn unreadable_key_is_never_overwritten() {
        let mut store = PersistentStore::new(UnreadableBackend::default());
        assert_eq!(store.load("prefs", defaults()), defaults());
        assert!(store.is_held("prefs"));
        assert!(matches!(
            store.save("prefs", &defaults()),
            Err(StoreError::Held { .. })
        ));
        store.save("other", &defaults()).expect("other keys still write");
        let backend = store.backend().expect("backend");
        assert_eq!(backend.inner.get("prefs"), None);
        assert!(backend.inner.get("other").is_some());
    }

    #[test]
    fn save_then_load_returns_the_value() {
        let mut store = PersistentStore::new(MemoryBackend::new());
        let prefs = Prefs {
            name: "Alice".to_string(),
            volume: 0,
            tags: Vec::new(),
        };
        store.save("prefs", &prefs).expect("save");
        assert_eq!(store.load("prefs", defaults()), prefs);
    }

    #[test]
    fn no_backend_drops_writes() {
        let mut store: PersistentStore<MemoryBackend> = PersistentStore::without_backend();
        let mut prefs = defaults();
        prefs.volume = 1;
        store.save("prefs", &prefs).expect("dropped write is not an error");
        assert_eq!(store.load("prefs", defaults()), defaults());
        assert!(!store.has_backend());
    }
}
