//! # ruts-mongodb: MongoDB session storage for HTTP applications
//!
//! `ruts-mongodb` persists HTTP session data in a MongoDB collection. It exposes the
//! three operations a session middleware needs from its backing store: fetch a session
//! when a request starts, store it when the request ends, and remove it on logout.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ruts_mongodb::store::SessionStore;
//! use ruts_mongodb::store::mongodb::MongoStore;
//! use ruts_mongodb::{SessionData, SessionId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ruts_mongodb::store::Error> {
//!     // Connects to localhost:27017 and binds the `sessions` collection of `app`.
//!     let store = MongoStore::builder().db_name("app").build().await?;
//!
//!     let id = SessionId::generate();
//!
//!     let mut data = SessionData::new();
//!     data.insert("user", &"alice")?;
//!     data.insert("count", &1)?;
//!     store.store(&id, &data).await?;
//!
//!     if let Some(data) = store.fetch(&id).await? {
//!         let count: Option<i64> = data.get("count")?;
//!         println!("{} visited {:?} times", id, count);
//!     }
//!
//!     // Never fails the request; a failed delete is logged and reported.
//!     let _ = store.remove(&id).await;
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! | option      | default       |
//! |-------------|---------------|
//! | `db_name`   | required      |
//! | `host`      | `"localhost"` |
//! | `port`      | `27017`       |
//! | `coll_name` | `"sessions"`  |
//!
//! Options can be set on [`store::mongodb::MongoStoreBuilder`], deserialized into
//! [`store::mongodb::MongoStoreOptions`] from an application config, or read from the
//! `MONGODB_DB_NAME`, `MONGODB_HOST`, `MONGODB_PORT` and `MONGODB_COLL_NAME`
//! environment variables with [`store::mongodb::MongoStoreOptions::from_env`].
//!
//! # Storage Layout
//!
//! Each session is a single document. `_id` holds the session id and every other field
//! comes straight from the [`SessionData`] payload; the store adds no envelope and no
//! metadata. Storing a session replaces the whole document.
//!
//! # Errors
//!
//! - `fetch` returns `Ok(None)` for an unknown session.
//! - `store` returns an error on any failed write; treat it as a failed request.
//! - `remove` never returns an error. A failure is logged at `warn` level and reported
//!   as [`store::Removal::Failed`].
//!
//! Writes use an acknowledged, journaled write concern unless overridden with
//! [`store::mongodb::MongoStoreBuilder::write_concern`].
//!
//! ## Testing
//!
//! [`store::MemoryStore`] implements the same [`store::SessionStore`] contract in
//! process. Do not use it in production.

pub use mongodb;

mod session;
pub use session::*;

pub mod store;
pub use store::SessionData;
