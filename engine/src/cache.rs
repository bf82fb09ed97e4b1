//! Session-scoped cache of the cleaned people list.
//!
//! Purely an optimization: a miss, a corrupt entry or a refused write only
//! means the list is fetched again.

use crate::person::PersonRecord;

/// Prefix shared by every cache generation's key.
pub const KEY_PREFIX: &str = "people_";

/// Payloads at or above this many bytes are not cached.
pub const DEFAULT_LIMIT_BYTES: usize = 4_500_000;

/// Minimal key/value store, shaped after the browser's `sessionStorage`.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), String>;
    fn keys(&self) -> Vec<String>;
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheWrite {
    Stored,
    /// Serialized size in bytes
    TooLarge(usize),
    /// The store refused the write; stale generations were evicted
    Rejected(String),
}

pub fn read_cached<S: SessionStore + ?Sized>(store: &S, key: &str) -> Option<Vec<PersonRecord>> {
    let json = store.get(key)?;
    match serde_json::from_str(&json) {
        Ok(people) => Some(people),
        Err(e) => {
            tracing::debug!(key, error = %e, "ignoring unreadable cache entry");
            None
        }
    }
}

pub fn write_cached<S: SessionStore + ?Sized>(
    store: &mut S,
    key: &str,
    people: &[PersonRecord],
    limit_bytes: usize,
) -> CacheWrite {
    let json = match serde_json::to_string(people) {
        Ok(json) => json,
        Err(e) => return CacheWrite::Rejected(e.to_string()),
    };
    if json.len() >= limit_bytes {
        tracing::debug!(bytes = json.len(), limit_bytes, "people list too large to cache");
        return CacheWrite::TooLarge(json.len());
    }
    match store.set(key, &json) {
        Ok(()) => CacheWrite::Stored,
        Err(reason) => {
            tracing::warn!(key, %reason, "skipping cache");
            for stale in store
                .keys()
                .into_iter()
                .filter(|k| k.starts_with(KEY_PREFIX) && k != key)
            {
                store.remove(&stale);
            }
            CacheWrite::Rejected(reason)
        }
    }
}
