pub mod memory;
pub mod mongodb;

mod session_data;
mod store_trait;

pub use memory::MemoryStore;
pub use session_data::{ID_FIELD, SessionData};
pub use store_trait::*;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid store configuration: {0}")]
    Config(String),

    #[error("failed to connect to the database: {0}")]
    Connect(String),

    #[error("session id must not be empty")]
    InvalidId,

    #[error("Encoding failed with: {0}")]
    Encode(String),

    #[error("Decoding failed with: {0}")]
    Decode(String),

    #[error("{0}")]
    Backend(String),
}

impl From<::mongodb::error::Error> for Error {
    fn from(err: ::mongodb::error::Error) -> Self {
        Error::Backend(err.to_string())
    }
}
