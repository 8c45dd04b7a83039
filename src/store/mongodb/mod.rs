mod options;

pub use options::*;

use crate::SessionId;
use crate::store::{Error, ID_FIELD, Removal, SessionData, SessionStore};
use mongodb::bson::{Document, doc};
use mongodb::options::{
    Acknowledgment, ClientOptions, CollectionOptions, ServerAddress, WriteConcern,
};
use mongodb::{Client, Collection, Database};
use std::sync::Arc;
use std::time::Duration;

/// A builder for creating a [`MongoStore`].
///
/// Building validates the options, connects and pings the database. A missing
/// `db_name` is rejected before any connection is attempted.
///
/// ```rust,no_run
/// use ruts_mongodb::store::mongodb::MongoStoreBuilder;
///
/// # async fn run() -> Result<(), ruts_mongodb::store::Error> {
/// let store = MongoStoreBuilder::new()
///     .db_name("app")
///     .host("localhost")
///     .port(27017)
///     .coll_name("sessions")
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MongoStoreBuilder {
    options: MongoStoreOptions,
    client: Option<Client>,
    write_concern: Option<WriteConcern>,
    app_name: Option<String>,
    server_selection_timeout: Option<Duration>,
    max_pool_size: Option<u32>,
    min_pool_size: Option<u32>,
}

impl MongoStoreBuilder {
    /// Creates a builder with default options and no database name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from already loaded options.
    pub fn from_options(options: MongoStoreOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn db_name(mut self, db_name: impl Into<String>) -> Self {
        self.options.db_name = Some(db_name.into());
        self
    }

    /// Sets the server hostname. Defaults to "localhost".
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.options.host = host.into();
        self
    }

    /// Sets the server port. Defaults to 27017.
    pub fn port(mut self, port: u16) -> Self {
        self.options.port = port;
        self
    }

    /// Sets the collection holding the sessions. Defaults to "sessions".
    pub fn coll_name(mut self, coll_name: impl Into<String>) -> Self {
        self.options.coll_name = coll_name.into();
        self
    }

    /// Reuses an existing client instead of opening a new one.
    ///
    /// The client's own connection settings win over `host`/`port` and the
    /// driver tuning options, which are then only informational.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Overrides the write concern used by `store` and `remove`.
    ///
    /// Defaults to an acknowledged, journaled write on the primary.
    pub fn write_concern(mut self, write_concern: WriteConcern) -> Self {
        self.write_concern = Some(write_concern);
        self
    }

    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Bounds how long the driver waits for a usable server, including the
    /// ping issued while building.
    pub fn server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout = Some(timeout);
        self
    }

    pub fn max_pool_size(mut self, size: u32) -> Self {
        self.max_pool_size = Some(size);
        self
    }

    pub fn min_pool_size(mut self, size: u32) -> Self {
        self.min_pool_size = Some(size);
        self
    }

    /// Builds the `MongoStore`, failing if the database cannot be reached.
    #[tracing::instrument(name = "connecting session store", skip_all)]
    pub async fn build(self) -> Result<MongoStore, Error> {
        let Self {
            options,
            client,
            write_concern,
            app_name,
            server_selection_timeout,
            max_pool_size,
            min_pool_size,
        } = self;

        let db_name = options.validate()?.to_string();

        let client = match client {
            Some(client) => client,
            None => {
                let mut client_options = ClientOptions::builder()
                    .hosts(vec![ServerAddress::Tcp {
                        host: options.host.clone(),
                        port: Some(options.port),
                    }])
                    .build();

                client_options.app_name = app_name;
                if let Some(timeout) = server_selection_timeout {
                    client_options.server_selection_timeout = Some(timeout);
                }
                if let Some(size) = max_pool_size {
                    client_options.max_pool_size = Some(size);
                }
                if let Some(size) = min_pool_size {
                    client_options.min_pool_size = Some(size);
                }

                Client::with_options(client_options).map_err(|err| {
                    tracing::error!(err = %err, "failed to create database client");
                    Error::Connect(err.to_string())
                })?
            }
        };

        let database = client.database(&db_name);
        ping(&database).await.map_err(|err| {
            tracing::error!(
                err = %err,
                host = %options.host,
                port = options.port,
                "failed to reach the database"
            );
            Error::Connect(err.to_string())
        })?;

        let collection_options = CollectionOptions::builder()
            .write_concern(write_concern.unwrap_or_else(acknowledged_write_concern))
            .build();
        let collection =
            database.collection_with_options::<Document>(&options.coll_name, collection_options);

        tracing::debug!(
            host = %options.host,
            port = options.port,
            db_name = %db_name,
            coll_name = %options.coll_name,
            "session store connected"
        );

        Ok(MongoStore {
            client,
            database,
            collection,
            options: Arc::new(options),
        })
    }
}

/// A MongoDB-backed session store.
///
/// Each session is one document in a single collection: `_id` holds the
/// session id and the remaining fields are the payload, stored flat. Every
/// operation is a single round trip; nothing is cached.
///
/// Cloning is cheap and clones share the driver's connection pool, so one
/// store is meant to be built at startup and shared by all requests.
#[derive(Clone, Debug)]
pub struct MongoStore {
    client: Client,
    database: Database,
    collection: Collection<Document>,
    options: Arc<MongoStoreOptions>,
}

impl MongoStore {
    pub fn builder() -> MongoStoreBuilder {
        MongoStoreBuilder::new()
    }

    /// Connects with the given options and the default driver settings.
    pub async fn connect(options: MongoStoreOptions) -> Result<Self, Error> {
        MongoStoreBuilder::from_options(options).build().await
    }

    /// Checks that the bound database is reachable.
    #[tracing::instrument(name = "pinging session store", skip(self))]
    pub async fn ping(&self) -> Result<(), Error> {
        ping(&self.database).await.map_err(|err| {
            tracing::error!(err = %err, "failed to ping the database");
            Error::from(err)
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn options(&self) -> &MongoStoreOptions {
        &self.options
    }

    pub fn host(&self) -> &str {
        &self.options.host
    }

    pub fn port(&self) -> u16 {
        self.options.port
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }
}

impl SessionStore for MongoStore {
    #[tracing::instrument(
        name = "fetching session from store",
        skip_all,
        fields(session_id = %session_id)
    )]
    async fn fetch(&self, session_id: &SessionId) -> Result<Option<SessionData>, Error> {
        let document = self
            .collection
            .find_one(id_filter(session_id))
            .await
            .map_err(|err| {
                tracing::error!(err = %err, "failed to fetch session from store");
                Error::from(err)
            })?;

        match document {
            Some(document) => SessionData::from_document(document).map(Some).map_err(|err| {
                tracing::error!(err = %err, "failed to decode session document");
                err
            }),
            None => {
                tracing::debug!("session not found");
                Ok(None)
            }
        }
    }

    #[tracing::instrument(
        name = "saving session to store",
        skip_all,
        fields(session_id = %session_id)
    )]
    async fn store(&self, session_id: &SessionId, data: &SessionData) -> Result<(), Error> {
        let document = data.to_document(session_id).map_err(|err| {
            tracing::error!(err = %err, "failed to encode session");
            err
        })?;

        self.collection
            .replace_one(id_filter(session_id), document)
            .upsert(true)
            .await
            .map_err(|err| {
                tracing::error!(err = %err, "failed to save session to store");
                Error::from(err)
            })?;

        Ok(())
    }

    #[tracing::instrument(
        name = "removing session from store",
        skip_all,
        fields(session_id = %session_id)
    )]
    async fn remove(&self, session_id: &SessionId) -> Removal {
        match self.collection.delete_one(id_filter(session_id)).await {
            Ok(result) if result.deleted_count > 0 => Removal::Deleted,
            Ok(_) => {
                tracing::debug!("no session to remove");
                Removal::Absent
            }
            Err(err) => {
                tracing::warn!(err = %err, "failed to remove session from store");
                Removal::Failed(err.into())
            }
        }
    }
}

fn id_filter(session_id: &SessionId) -> Document {
    let mut filter = Document::new();
    filter.insert(ID_FIELD, session_id.as_str());
    filter
}

fn acknowledged_write_concern() -> WriteConcern {
    WriteConcern::builder()
        .w(Acknowledgment::Nodes(1))
        .journal(true)
        .build()
}

async fn ping(database: &Database) -> Result<(), mongodb::error::Error> {
    database.run_command(doc! { "ping": 1 }).await?;
    Ok(())
}
