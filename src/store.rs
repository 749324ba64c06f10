use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;

/// Key names of every collection in the store.
pub mod keys {
    pub const USERS: &str = "users";
    pub const CURRENT_USER: &str = "currentUser";
    pub const JOBS: &str = "jobs";
    pub const SAVED_JOBS: &str = "savedJobs";
    pub const APPLIED_JOBS: &str = "appliedJobs";
    pub const ACADEMIC_EVENTS: &str = "academicEvents";
    pub const EVENT_RESERVATIONS: &str = "academicEventReservations";
    pub const MENTORS: &str = "mentors";
    pub const MENTORSHIP_APPLICATIONS: &str = "mentorshipApplications";
    pub const FOLLOWING_PREFIX: &str = "following_";

    pub fn following(user_id: &str) -> String {
        format!("{}{}", FOLLOWING_PREFIX, user_id)
    }
}

/// A flat key-value store of JSON text. Writes replace the whole value; there
/// are no partial updates and no transactions, so the last writer wins.
pub trait RecordStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

/// Reads and decodes a collection. A missing key yields `T::default()`.
pub fn read<T, S>(store: &S, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
    S: RecordStore + ?Sized,
{
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .with_context(|| format!("Malformed JSON stored under '{}'", key)),
        None => Ok(T::default()),
    }
}

/// Encodes a collection and overwrites whatever the key held before.
pub fn write<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: RecordStore + ?Sized,
{
    let raw = serde_json::to_string(value)
        .with_context(|| format!("Failed to encode value for '{}'", key))?;
    store.set(key, &raw)?;
    log::debug!("wrote {} bytes to '{}'", raw.len(), key);
    Ok(())
}

/// Every key with the given prefix, in key order.
pub fn keys_with_prefix<S: RecordStore + ?Sized>(store: &S, prefix: &str) -> Result<Vec<String>> {
    Ok(store
        .keys()?
        .into_iter()
        .filter(|k| k.starts_with(prefix))
        .collect())
}

/// The whole store as one JSON object, keyed by record name.
pub fn snapshot<S: RecordStore + ?Sized>(store: &S) -> Result<BTreeMap<String, serde_json::Value>> {
    let mut out = BTreeMap::new();
    for key in store.keys()? {
        let value: Option<serde_json::Value> = read(store, &key)?;
        if let Some(value) = value {
            out.insert(key, value);
        }
    }
    Ok(out)
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: std::cell::RefCell<BTreeMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl RecordStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.records
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.records.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.records.borrow().keys().cloned().collect())
    }
}
