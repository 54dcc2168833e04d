//! Local user registry backed by a key-value store.
//!
//! The registry owns the in-memory collection and mirrors it to the store
//! after every mutation. The whole collection is written each time, never a
//! delta, under the single key [`STORAGE_KEY`].

use crate::domain::{validate, Candidate, UserRecord, ValidationErrors};
use crate::infrastructure::{KeyValueStore, StorageError};
use std::fmt;
use uuid::Uuid;

/// Key holding the JSON array of registered users.
pub const STORAGE_KEY: &str = "usuarios";

type Listener = Box<dyn FnMut(&[UserRecord])>;

/// Explicit store object for the locally registered users.
///
/// # Examples
///
/// ```
/// use primera_pagina::application::Registry;
/// use primera_pagina::domain::Candidate;
/// use primera_pagina::infrastructure::MemoryStore;
///
/// let mut registry = Registry::open(Box::new(MemoryStore::new()));
/// let record = registry.register(&Candidate::new("Ana", "ana@example.com", "123")).unwrap();
/// assert_eq!(registry.records(), &[record]);
/// ```
pub struct Registry {
    store: Box<dyn KeyValueStore>,
    records: Vec<UserRecord>,
    listeners: Vec<Listener>,
    persist_error: Option<StorageError>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("records", &self.records)
            .field("listeners", &self.listeners.len())
            .field("persist_error", &self.persist_error)
            .finish()
    }
}

impl Registry {
    /// Opens the registry, rehydrating the collection from `store`.
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        let mut registry = Self {
            store,
            records: Vec::new(),
            listeners: Vec::new(),
            persist_error: None,
        };
        registry.records = registry.load();
        tracing::info!(count = registry.records.len(), "registry loaded");
        registry
    }

    /// Reads the stored collection.
    ///
    /// An absent key or a payload that is not an array of user objects yields
    /// an empty collection.
    pub fn load(&self) -> Vec<UserRecord> {
        match self.store.get(STORAGE_KEY) {
            Some(payload) => decode(&payload).unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// The current collection, in insertion order.
    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validates `candidate` against the current collection.
    pub fn validate(&self, candidate: &Candidate) -> ValidationErrors {
        validate(candidate, &self.records)
    }

    /// Validates and, on success, appends a new trimmed record and persists.
    ///
    /// On failure the collection is left untouched and nothing is written.
    pub fn register(&mut self, candidate: &Candidate) -> Result<UserRecord, ValidationErrors> {
        let errors = self.validate(candidate);
        if !errors.is_empty() {
            tracing::debug!(%errors, "registration rejected");
            return Err(errors);
        }

        let record = UserRecord::from_candidate(Uuid::new_v4().to_string(), candidate);
        self.records.push(record.clone());
        tracing::info!(id = %record.id, "user registered");
        self.commit();
        Ok(record)
    }

    /// Removes the record with `id` if present and persists the result.
    pub fn remove(&mut self, id: &str) {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        if self.records.len() != before {
            tracing::info!(%id, "user removed");
        }
        self.commit();
    }

    /// Registers a callback invoked with the collection after every mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&[UserRecord]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Returns and clears the error from the last failed write, if any.
    pub fn take_persist_error(&mut self) -> Option<StorageError> {
        self.persist_error.take()
    }

    fn commit(&mut self) {
        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, "could not persist registry");
            self.persist_error = Some(e);
        }
        for listener in &mut self.listeners {
            listener(&self.records);
        }
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let payload = serde_json::to_string(&self.records)?;
        self.store.set(STORAGE_KEY, payload)
    }
}

fn decode(payload: &str) -> Option<Vec<UserRecord>> {
    match serde_json::from_str::<Vec<UserRecord>>(payload) {
        Ok(records) => Some(records),
        Err(e) => {
            tracing::warn!(error = %e, "stored registry is malformed, ignoring it");
            None
        }
    }
}
