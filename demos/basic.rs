use ruts_mongodb::store::mongodb::{MongoStore, MongoStoreOptions};
use ruts_mongodb::store::{Removal, SessionStore};
use ruts_mongodb::{SessionData, SessionId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct User {
    id: i64,
    name: String,
}

// Run with e.g. `MONGODB_DB_NAME=app cargo run --example basic`
#[tokio::main]
async fn main() -> Result<(), ruts_mongodb::store::Error> {
    let options = MongoStoreOptions::from_env()?;
    let store = MongoStore::connect(options).await?;

    let id = SessionId::generate();

    // Request 1: nothing stored yet.
    let mut data = store.fetch(&id).await?.unwrap_or_default();
    data.insert(
        "user",
        &User {
            id: 34895634,
            name: String::from("John Doe"),
        },
    )?;
    data.insert("count", &1)?;
    store.store(&id, &data).await?;

    // Request 2: hydrate, mutate, persist.
    let mut data: SessionData = store.fetch(&id).await?.unwrap_or_default();
    let count: i64 = data.get("count")?.unwrap_or(0);
    data.insert("count", &(count + 1))?;
    store.store(&id, &data).await?;

    let user: Option<User> = data.get("user")?;
    println!("session {id}: {user:?}, count {}", count + 1);

    // Logout.
    if let Removal::Failed(err) = store.remove(&id).await {
        eprintln!("session {id} was not removed: {err}");
    }

    Ok(())
}
