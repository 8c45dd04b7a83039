use crate::SessionId;
use crate::store::{Error, Removal, SessionData, SessionStore};
use dashmap::DashMap;
use std::sync::Arc;

/// An in-memory session store implementation.
///
/// It keeps one payload per session id in a concurrent map and mirrors the
/// observable behavior of [`MongoStore`](crate::store::mongodb::MongoStore):
/// full overwrites, the same BSON encoding of payloads, `_id` present in
/// fetched payloads, idempotent removal.
/// Clones share the same map.
///
/// ### Note
///
/// Do not use this in a production environment.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<DashMap<SessionId, SessionData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently held.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl SessionStore for MemoryStore {
    async fn fetch(&self, session_id: &SessionId) -> Result<Option<SessionData>, Error> {
        Ok(self.data.get(session_id).map(|entry| entry.value().clone()))
    }

    async fn store(&self, session_id: &SessionId, data: &SessionData) -> Result<(), Error> {
        // Same encoding as the document stores, so unrepresentable values fail here too.
        let document = data.to_document(session_id)?;
        self.data
            .insert(session_id.clone(), SessionData::from_document(document)?);
        Ok(())
    }

    async fn remove(&self, session_id: &SessionId) -> Removal {
        match self.data.remove(session_id) {
            Some(_) => Removal::Deleted,
            None => Removal::Absent,
        }
    }
}
