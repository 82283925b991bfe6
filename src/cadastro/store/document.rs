use super::collection::{CollectionError, Document, DocumentCollection, KEY_FIELD};
use super::dir::DirCollection;
use super::ClientStore;
use crate::error::{CadastroError, Result};
use crate::model::{ClientRecord, RecordId};
use serde_json::Value;
use std::path::PathBuf;
use tracing::warn;
use uuid::Uuid;

pub const TAX_ID_FIELD: &str = "cpf";

/// Clients kept in a keyed document collection.
///
/// The record id is stored as the document key (`_id`); the canonical CPF
/// carries a unique index declared when the store is opened.
pub struct DocumentStore<C: DocumentCollection> {
    collection: C,
}

impl<C: DocumentCollection> DocumentStore<C> {
    pub fn open(mut collection: C) -> Result<Self> {
        collection
            .create_unique_index(TAX_ID_FIELD)
            .map_err(map_collection_error)?;
        Ok(Self { collection })
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    pub fn collection_mut(&mut self) -> &mut C {
        &mut self.collection
    }
}

impl DocumentStore<DirCollection> {
    /// Opens a store over a directory of documents, creating it if needed.
    pub fn open_dir(root: impl Into<PathBuf>) -> Result<Self> {
        let collection = DirCollection::open(root).map_err(map_collection_error)?;
        Self::open(collection)
    }
}

fn key_of(id: &RecordId) -> String {
    id.to_string()
}

fn to_document(record: &ClientRecord) -> Result<Document> {
    let value = serde_json::to_value(record)?;
    let Value::Object(mut doc) = value else {
        return Err(CadastroError::StoreUnavailable(
            "client did not serialize to an object".to_string(),
        ));
    };
    if let Some(id) = doc.remove("id") {
        let key = match id {
            Value::String(s) => s,
            other => other.to_string(),
        };
        doc.insert(KEY_FIELD.to_string(), Value::String(key));
    }
    Ok(doc)
}

fn from_document(mut doc: Document) -> Result<ClientRecord> {
    if let Some(key) = doc.remove(KEY_FIELD) {
        doc.insert("id".to_string(), key);
    }
    Ok(serde_json::from_value(Value::Object(doc))?)
}

fn map_collection_error(err: CollectionError) -> CadastroError {
    match err {
        CollectionError::DuplicateKey { field, value } if field == TAX_ID_FIELD => {
            CadastroError::DuplicateTaxId(value)
        }
        CollectionError::DuplicateKey { field, value } => {
            CadastroError::InvalidIdentifier(format!("{} {} is already taken", field, value))
        }
        CollectionError::InvalidKey(key) => {
            CadastroError::InvalidIdentifier(format!("'{}' is not a usable document key", key))
        }
        CollectionError::Serialization(e) => CadastroError::Serialization(e),
        other => CadastroError::StoreUnavailable(other.to_string()),
    }
}

impl<C: DocumentCollection> ClientStore for DocumentStore<C> {
    fn describe(&self) -> String {
        format!("document collection '{}'", self.collection.name())
    }

    fn next_id(&self) -> Result<RecordId> {
        Ok(RecordId::Key(Uuid::now_v7().to_string()))
    }

    fn find_all(&self) -> Result<Vec<ClientRecord>> {
        self.collection
            .find_all()
            .map_err(map_collection_error)?
            .into_iter()
            .map(from_document)
            .collect()
    }

    fn find_by_id(&self, id: &RecordId) -> Result<Option<ClientRecord>> {
        self.collection
            .find_by_key(&key_of(id))
            .map_err(map_collection_error)?
            .map(from_document)
            .transpose()
    }

    fn insert(&mut self, record: &ClientRecord) -> Result<()> {
        let doc = to_document(record)?;
        self.collection
            .insert_one(doc)
            .map_err(map_collection_error)
    }

    fn replace(&mut self, id: &RecordId, record: &ClientRecord) -> Result<()> {
        let doc = to_document(record)?;
        let replaced = self
            .collection
            .replace_one(&key_of(id), doc)
            .map_err(map_collection_error)?;
        if !replaced {
            return Err(CadastroError::NotFound(format!("id {}", id)));
        }
        Ok(())
    }

    fn delete(&mut self, id: &RecordId) -> Result<ClientRecord> {
        match self
            .collection
            .delete_one(&key_of(id))
            .map_err(map_collection_error)?
        {
            Some(doc) => from_document(doc),
            None => Err(CadastroError::NotFound(format!("id {}", id))),
        }
    }

    fn delete_where(
        &mut self,
        predicate: &dyn Fn(&ClientRecord) -> bool,
    ) -> Result<Vec<ClientRecord>> {
        let mut removed = Vec::new();
        for record in self.find_all()? {
            if !predicate(&record) {
                continue;
            }
            match self.collection.delete_one(&key_of(&record.id)) {
                Ok(Some(doc)) => removed.push(from_document(doc)?),
                Ok(None) => warn!(id = %record.id, "document vanished before delete"),
                Err(e) => return Err(map_collection_error(e)),
            }
        }
        Ok(removed)
    }
}
