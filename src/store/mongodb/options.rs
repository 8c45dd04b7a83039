use serde::{Deserialize, Serialize};

use crate::store::Error;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 27017;
pub const DEFAULT_COLL_NAME: &str = "sessions";

/// Characters MongoDB does not accept in a database name.
const INVALID_DB_NAME_CHARS: &[char] = &['/', '\\', '.', ' ', '"', '$', '\0'];

pub const ENV_DB_NAME: &str = "MONGODB_DB_NAME";
pub const ENV_HOST: &str = "MONGODB_HOST";
pub const ENV_PORT: &str = "MONGODB_PORT";
pub const ENV_COLL_NAME: &str = "MONGODB_COLL_NAME";

/// Where a [`MongoStore`](super::MongoStore) keeps its sessions.
///
/// Missing fields take their defaults when deserialized, so the options can be
/// embedded in an application's own configuration:
///
/// ```rust
/// use ruts_mongodb::store::mongodb::MongoStoreOptions;
///
/// let options: MongoStoreOptions =
///     serde_json::from_str(r#"{ "db_name": "app", "port": 27018 }"#).unwrap();
///
/// assert_eq!(options.host, "localhost");
/// assert_eq!(options.coll_name, "sessions");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoStoreOptions {
    /// Target database. Required.
    pub db_name: Option<String>,
    pub host: String,
    pub port: u16,
    pub coll_name: String,
}

impl Default for MongoStoreOptions {
    fn default() -> Self {
        Self {
            db_name: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            coll_name: DEFAULT_COLL_NAME.to_string(),
        }
    }
}

impl MongoStoreOptions {
    /// Creates options for `db_name` with every other option defaulted.
    pub fn new(db_name: impl Into<String>) -> Self {
        Self {
            db_name: Some(db_name.into()),
            ..Self::default()
        }
    }

    /// Reads the options from `MONGODB_DB_NAME`, `MONGODB_HOST`,
    /// `MONGODB_PORT` and `MONGODB_COLL_NAME`.
    ///
    /// Unset variables keep their defaults. The database name is not checked
    /// here; that happens when the store is built.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(db_name) = lookup(ENV_DB_NAME) {
            options.db_name = Some(db_name);
        }
        if let Some(host) = lookup(ENV_HOST) {
            options.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            options.port = port
                .trim()
                .parse()
                .map_err(|err| Error::Config(format!("{ENV_PORT}={port:?}: {err}")))?;
        }
        if let Some(coll_name) = lookup(ENV_COLL_NAME) {
            options.coll_name = coll_name;
        }

        Ok(options)
    }

    /// Checks the options without touching the network and returns the
    /// database name.
    pub(crate) fn validate(&self) -> Result<&str, Error> {
        let db_name = match self.db_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err(Error::Config("`db_name` is required".to_string())),
        };

        if db_name.contains(INVALID_DB_NAME_CHARS) {
            return Err(Error::Config(format!(
                "`db_name` {db_name:?} contains a character MongoDB does not allow"
            )));
        }

        if self.host.trim().is_empty() {
            return Err(Error::Config("`host` must not be empty".to_string()));
        }

        if self.port == 0 {
            return Err(Error::Config("`port` must not be 0".to_string()));
        }

        if self.coll_name.trim().is_empty() {
            return Err(Error::Config("`coll_name` must not be empty".to_string()));
        }

        if self.coll_name.contains(['$', '\0']) || self.coll_name.starts_with("system.") {
            return Err(Error::Config(format!(
                "`coll_name` {:?} is not a valid collection name",
                self.coll_name
            )));
        }

        Ok(db_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let options = MongoStoreOptions::new("testdb");
        assert_eq!(options.db_name.as_deref(), Some("testdb"));
        assert_eq!(options.host, "localhost");
        assert_eq!(options.port, 27017);
        assert_eq!(options.coll_name, "sessions");
        assert_eq!(options.validate().unwrap(), "testdb");
    }

    #[test]
    fn test_db_name_is_required() {
        let options = MongoStoreOptions::default();
        assert!(matches!(options.validate(), Err(Error::Config(_))));

        let options = MongoStoreOptions::new("  ");
        assert!(matches!(options.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_db_name_characters_are_checked() {
        for name in ["my/db", "my\\db", "my.db", "my db", "my\"db", "my$db", "my\0db"] {
            let options = MongoStoreOptions::new(name);
            assert!(
                matches!(options.validate(), Err(Error::Config(_))),
                "{name:?} should be rejected"
            );
        }

        assert!(MongoStoreOptions::new("my_app-db").validate().is_ok());
    }

    #[test]
    fn test_coll_name_is_checked() {
        for name in ["sess$ions", "sess\0ions", "system.sessions"] {
            let mut options = MongoStoreOptions::new("testdb");
            options.coll_name = name.to_string();
            assert!(
                matches!(options.validate(), Err(Error::Config(_))),
                "{name:?} should be rejected"
            );
        }

        let mut options = MongoStoreOptions::new("testdb");
        options.coll_name = "web.sessions".to_string();
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_other_options_are_checked() {
        let mut options = MongoStoreOptions::new("testdb");
        options.port = 0;
        assert!(matches!(options.validate(), Err(Error::Config(_))));

        let mut options = MongoStoreOptions::new("testdb");
        options.coll_name = String::new();
        assert!(matches!(options.validate(), Err(Error::Config(_))));

        let mut options = MongoStoreOptions::new("testdb");
        options.host = String::new();
        assert!(matches!(options.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_lookup() {
        let options = MongoStoreOptions::from_lookup(lookup_from(&[
            (ENV_DB_NAME, "app"),
            (ENV_HOST, "mongo.internal"),
            (ENV_PORT, "27018"),
        ]))
        .unwrap();

        assert_eq!(options.db_name.as_deref(), Some("app"));
        assert_eq!(options.host, "mongo.internal");
        assert_eq!(options.port, 27018);
        assert_eq!(options.coll_name, "sessions");
    }

    #[test]
    fn test_from_lookup_rejects_bad_port() {
        let result = MongoStoreOptions::from_lookup(lookup_from(&[(ENV_PORT, "not-a-port")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let options: MongoStoreOptions =
            serde_json::from_str(r#"{ "db_name": "testdb", "coll_name": "web_sessions" }"#)
                .unwrap();

        assert_eq!(options.host, "localhost");
        assert_eq!(options.port, 27017);
        assert_eq!(options.coll_name, "web_sessions");
    }
}
