use serde_json::{Map, Value};
use thiserror::Error;

/// A stored document. The key lives under [`KEY_FIELD`].
pub type Document = Map<String, Value>;

pub const KEY_FIELD: &str = "_id";

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("duplicate key on unique index '{field}': {value}")]
    DuplicateKey { field: String, value: String },

    #[error("document has no '{}' key", KEY_FIELD)]
    MissingKey,

    #[error("invalid document key: {0:?}")]
    InvalidKey(String),

    #[error("collection unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CollectionResult<T> = std::result::Result<T, CollectionError>;

/// Opaque keyed document store.
///
/// Implementations keep documents in insertion order and enforce every
/// unique index declared through [`create_unique_index`](Self::create_unique_index)
/// on insert and replace. A single call is atomic for a single document.
pub trait DocumentCollection {
    fn name(&self) -> &str;

    /// Declares a unique index on a top-level field. Documents missing the field or
    /// holding `null` there are not indexed.
    fn create_unique_index(&mut self, field: &str) -> CollectionResult<()>;

    fn insert_one(&mut self, doc: Document) -> CollectionResult<()>;

    fn find_by_key(&self, key: &str) -> CollectionResult<Option<Document>>;

    fn find_all(&self) -> CollectionResult<Vec<Document>>;

    /// Returns false when no document holds `key`.
    fn replace_one(&mut self, key: &str, doc: Document) -> CollectionResult<bool>;

    fn delete_one(&mut self, key: &str) -> CollectionResult<Option<Document>>;
}

pub fn key_of(doc: &Document) -> CollectionResult<&str> {
    doc.get(KEY_FIELD)
        .and_then(Value::as_str)
        .ok_or(CollectionError::MissingKey)
}

/// Finds the first unique-index violation `doc` would cause among `existing`,
/// ignoring the document stored under `skip_key`.
pub(crate) fn unique_violation<'a>(
    indexes: &[String],
    doc: &Document,
    existing: impl Iterator<Item = &'a Document> + Clone,
    skip_key: Option<&str>,
) -> Option<CollectionError> {
    for field in indexes {
        let value = match doc.get(field) {
            Some(Value::Null) | None => continue,
            Some(value) => value,
        };
        let taken = existing.clone().any(|other| {
            let same_doc =
                skip_key.is_some() && other.get(KEY_FIELD).and_then(Value::as_str) == skip_key;
            !same_doc && other.get(field) == Some(value)
        });
        if taken {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Some(CollectionError::DuplicateKey {
                field: field.clone(),
                value,
            });
        }
    }
    None
}
