use mongodb::bson::{self, Document};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::SessionId;
use crate::store::Error;

/// Name of the document field holding the session id.
pub const ID_FIELD: &str = "_id";

/// The application-defined payload of a session.
///
/// The store knows nothing about its shape: it is an open map of string keys
/// to JSON-like values, persisted flat as the fields of the session document.
/// Fields can be read lazily with [`SessionData::get`] and written with
/// [`SessionData::insert`].
///
/// # Example
///
/// ```rust
/// use ruts_mongodb::SessionData;
///
/// let mut data = SessionData::new();
/// data.insert("user", &"alice").unwrap();
/// data.insert("count", &1).unwrap();
///
/// let count: Option<i64> = data.get("count").unwrap();
/// assert_eq!(count, Some(1));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionData(Map<String, Value>);

impl SessionData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session id recorded in the payload, if any.
    ///
    /// Payloads returned by a store's `fetch` always carry it.
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Deserializes the value stored under `field`.
    pub fn get<T>(&self, field: &str) -> Result<Option<T>, Error>
    where
        T: DeserializeOwned,
    {
        match self.0.get(field) {
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|err| Error::Decode(err.to_string())),
            None => Ok(None),
        }
    }

    /// Serializes `value` under `field`, returning the previous raw value.
    pub fn insert<T>(&mut self, field: impl Into<String>, value: &T) -> Result<Option<Value>, Error>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value).map_err(|err| Error::Encode(err.to_string()))?;
        Ok(self.0.insert(field.into(), value))
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Builds the flat session document: `_id` first, payload fields after.
    /// A payload `_id` is replaced by `session_id`.
    pub(crate) fn to_document(&self, session_id: &SessionId) -> Result<Document, Error> {
        let body = bson::to_document(&self.0).map_err(|err| Error::Encode(err.to_string()))?;

        let mut document = Document::new();
        document.insert(ID_FIELD, session_id.as_str());
        for (field, value) in body {
            if field != ID_FIELD {
                document.insert(field, value);
            }
        }

        Ok(document)
    }

    pub(crate) fn from_document(document: Document) -> Result<Self, Error> {
        bson::from_document::<Map<String, Value>>(document)
            .map(Self)
            .map_err(|err| Error::Decode(err.to_string()))
    }
}

impl From<Map<String, Value>> for SessionData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<SessionData> for Value {
    fn from(data: SessionData) -> Self {
        Value::Object(data.0)
    }
}

impl TryFrom<Value> for SessionData {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::Encode(format!(
                "session payload must be an object, got {other}"
            ))),
        }
    }
}

impl FromIterator<(String, Value)> for SessionData {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
