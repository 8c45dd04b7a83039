use std::future::Future;

use crate::SessionId;
use crate::store::{Error, SessionData};

/// Outcome of [`SessionStore::remove`].
///
/// Removal never fails the request: a failure is logged by the store and
/// reported here so callers can inspect it if they care to.
#[derive(Debug)]
pub enum Removal {
    /// The session document was deleted.
    Deleted,
    /// No document matched the session id.
    Absent,
    /// The delete could not be carried out.
    Failed(Error),
}

impl Removal {
    pub fn is_deleted(&self) -> bool {
        matches!(self, Removal::Deleted)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Removal::Failed(_))
    }
}

/// The contract a session middleware expects from its backing store.
///
/// Every call is an independent round trip; implementors hold no per-session
/// state and must be shareable across concurrently running requests.
pub trait SessionStore: Clone + Send + Sync + 'static {
    /// Loads the payload stored at `session_id`.
    ///
    /// Returns `None` when no such session exists.
    fn fetch(
        &self,
        session_id: &SessionId,
    ) -> impl Future<Output = Result<Option<SessionData>, Error>> + Send;

    /// Persists `data` at `session_id`, replacing whatever was stored there.
    ///
    /// A failed write is returned as an error and must not be ignored.
    fn store(
        &self,
        session_id: &SessionId,
        data: &SessionData,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Deletes the session at `session_id`, if any.
    ///
    /// Removing an unknown session is not an error.
    fn remove(&self, session_id: &SessionId) -> impl Future<Output = Removal> + Send;
}
