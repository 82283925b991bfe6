//! # Storage Layer
//!
//! This module defines the storage abstraction for the registry. The
//! [`ClientStore`] trait is the only thing the command layer knows about
//! persistence, so validation and merge rules behave the same on every backend.
//!
//! ## Implementations
//!
//! - [`file::FileStore`]: one JSON file holding the ordered list of clients
//!   - Every mutation loads the whole list, changes it in memory and rewrites
//!     the file through a temporary file + rename
//!   - Ids are sequence numbers
//!
//! - [`document::DocumentStore`]: a keyed document collection
//!   - Generic over [`collection::DocumentCollection`], the opaque keyed store
//!   - Declares a unique index on the canonical CPF (`cpf`)
//!   - Ids are generated keys (time-ordered UUIDs)
//!
//! Two collections ship with the crate:
//! - [`memory::MemoryCollection`]: in-process, used by tests
//! - [`dir::DirCollection`]: one JSON document per file in a directory
//!
//! ## Uniqueness
//!
//! Both stores refuse a second record holding the same CPF and report it as
//! [`CadastroError::DuplicateTaxId`](crate::error::CadastroError::DuplicateTaxId),
//! whatever the backend's native signal is.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── clientes.json         # FileStore
//! ├── documents/            # DirCollection
//! │   └── doc-{uuid}.json
//! ├── backups/              # timestamped copies of clientes.json
//! └── config.json
//! ```

use crate::error::Result;
use crate::model::{ClientRecord, RecordId};

pub mod collection;
pub mod dir;
pub mod document;
pub mod file;
pub mod memory;

/// Abstract interface for client persistence.
///
/// Implementations must keep records in a stable natural order and must
/// reject two records sharing a CPF.
pub trait ClientStore {
    /// Short human label for logs and messages
    fn describe(&self) -> String;

    /// Identity for the next record to be inserted
    fn next_id(&self) -> Result<RecordId>;

    /// All records, in the store's natural order
    fn find_all(&self) -> Result<Vec<ClientRecord>>;

    /// First record matching the predicate
    fn find_one(&self, predicate: &dyn Fn(&ClientRecord) -> bool) -> Result<Option<ClientRecord>> {
        Ok(self.find_all()?.into_iter().find(|record| predicate(record)))
    }

    /// The record stored under `id`
    fn find_by_id(&self, id: &RecordId) -> Result<Option<ClientRecord>> {
        self.find_one(&|record: &ClientRecord| &record.id == id)
    }

    /// Persist a new record
    fn insert(&mut self, record: &ClientRecord) -> Result<()>;

    /// Overwrite the record stored under `id`
    fn replace(&mut self, id: &RecordId, record: &ClientRecord) -> Result<()>;

    /// Remove the record stored under `id`, returning it
    fn delete(&mut self, id: &RecordId) -> Result<ClientRecord>;

    /// Remove every record matching the predicate in one mutation
    fn delete_where(
        &mut self,
        predicate: &dyn Fn(&ClientRecord) -> bool,
    ) -> Result<Vec<ClientRecord>>;
}

impl<S: ClientStore + ?Sized> ClientStore for Box<S> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn next_id(&self) -> Result<RecordId> {
        (**self).next_id()
    }

    fn find_all(&self) -> Result<Vec<ClientRecord>> {
        (**self).find_all()
    }

    fn find_one(&self, predicate: &dyn Fn(&ClientRecord) -> bool) -> Result<Option<ClientRecord>> {
        (**self).find_one(predicate)
    }

    fn find_by_id(&self, id: &RecordId) -> Result<Option<ClientRecord>> {
        (**self).find_by_id(id)
    }

    fn insert(&mut self, record: &ClientRecord) -> Result<()> {
        (**self).insert(record)
    }

    fn replace(&mut self, id: &RecordId, record: &ClientRecord) -> Result<()> {
        (**self).replace(id, record)
    }

    fn delete(&mut self, id: &RecordId) -> Result<ClientRecord> {
        (**self).delete(id)
    }

    fn delete_where(
        &mut self,
        predicate: &dyn Fn(&ClientRecord) -> bool,
    ) -> Result<Vec<ClientRecord>> {
        (**self).delete_where(predicate)
    }
}
