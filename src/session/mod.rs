//! Session identifiers.

mod id;
pub use id::SessionId;
