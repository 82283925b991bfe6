//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for UI clients.
//!
//! The facade:
//! - **Parses** raw identifiers (`123.456.789-09`, `7`, a document key)
//! - **Dispatches** to the matching command
//! - **Packages** results as [`CmdResult`] with user-facing messages
//!
//! It holds no business rules; validation, uniqueness and merge semantics live
//! in `commands/*.rs`.
//!
//! `RegistryApi<S: ClientStore>` is generic over the backend:
//! - Production: `RegistryApi<FileStore>` or `RegistryApi<DocumentStore<DirCollection>>`
//! - Testing: `RegistryApi<DocumentStore<MemoryCollection>>`

use crate::commands::{self, Identifier, Removal, SortOrder, StatusFilter};
use crate::error::Result;
use crate::model::{ClientPatch, NewClient, RecordId};
use crate::store::ClientStore;
use chrono::Utc;

pub struct RegistryApi<S: ClientStore> {
    store: S,
}

impl<S: ClientStore> RegistryApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create(&mut self, input: NewClient) -> Result<CmdResult> {
        let record = commands::create::run(&mut self.store, input)?;
        Ok(CmdResult::default()
            .with_message(CmdMessage::success(format!(
                "Client registered (id {}): {} - {}",
                record.id, record.name, record.tax_id
            )))
            .with_affected(vec![record]))
    }

    /// Registers several clients, reporting each rejected entry.
    pub fn create_many(&mut self, inputs: Vec<NewClient>) -> Result<CmdResult> {
        let report = commands::batch::run(&mut self.store, inputs)?;
        let mut result = CmdResult::default();
        for failure in &report.failed {
            result.add_message(CmdMessage::error(format!(
                "#{} ({}): {}",
                failure.position, failure.tax_id, failure.error
            )));
        }
        result.add_message(CmdMessage::success(format!(
            "{} of {} client(s) registered",
            report.created.len(),
            report.total()
        )));
        if !report.failed.is_empty() {
            result.add_message(CmdMessage::warning(format!(
                "{} client(s) rejected",
                report.failed.len()
            )));
        }
        Ok(result.with_affected(report.created))
    }

    pub fn update(&mut self, identifier: &str, patch: &ClientPatch) -> Result<CmdResult> {
        let identifier = Identifier::parse(identifier)?;
        if patch.is_empty() {
            let record = commands::helpers::resolve(&self.store, &identifier)?;
            return Ok(CmdResult::default()
                .with_message(CmdMessage::info("Nothing to update."))
                .with_affected(vec![record]));
        }
        let record = commands::update::run(&mut self.store, &identifier, patch)?;
        Ok(CmdResult::default()
            .with_message(CmdMessage::success(format!(
                "Client updated (id {}): {}",
                record.id, record.name
            )))
            .with_affected(vec![record]))
    }

    pub fn remove(&mut self, identifier: &str, hard: bool) -> Result<CmdResult> {
        let identifier = Identifier::parse(identifier)?;
        let removal = commands::remove::run(&mut self.store, &identifier, hard)?;
        let message = match &removal {
            Removal::Deactivated(r) => {
                CmdMessage::success(format!("Client deactivated: {} - {}", r.name, r.tax_id))
            }
            Removal::Deleted(r) => CmdMessage::success(format!(
                "Client permanently removed: {} - {}",
                r.name, r.tax_id
            )),
        };
        let record = match removal {
            Removal::Deactivated(r) | Removal::Deleted(r) => r,
        };
        Ok(CmdResult::default()
            .with_message(message)
            .with_affected(vec![record]))
    }

    pub fn reactivate(&mut self, identifier: &str) -> Result<CmdResult> {
        let identifier = Identifier::parse(identifier)?;
        let record = commands::reactivate::run(&mut self.store, &identifier)?;
        Ok(CmdResult::default()
            .with_message(CmdMessage::success(format!(
                "Client reactivated: {} - {}",
                record.name, record.tax_id
            )))
            .with_affected(vec![record]))
    }

    /// Looks up one client by CPF or id.
    pub fn show(&self, identifier: &str) -> Result<CmdResult> {
        let record = match Identifier::parse(identifier)? {
            Identifier::TaxId(cpf) => commands::find::by_tax_id(&self.store, &cpf)?,
            Identifier::Id(id) => commands::find::by_id(&self.store, &id)?,
        };
        Ok(CmdResult::default().with_listed(vec![record]))
    }

    pub fn find_by_id(&self, id: &RecordId) -> Result<CmdResult> {
        let record = commands::find::by_id(&self.store, id)?;
        Ok(CmdResult::default().with_listed(vec![record]))
    }

    pub fn list(&self, filter: StatusFilter, order: SortOrder) -> Result<CmdResult> {
        let records = commands::list::run(&self.store, filter, order)?;
        Ok(CmdResult::default().with_listed(records))
    }

    pub fn search_name(&self, text: &str, order: SortOrder) -> Result<CmdResult> {
        let records = commands::find::by_name(&self.store, text, order)?;
        Ok(CmdResult::default().with_listed(records))
    }

    pub fn search_city(&self, text: &str) -> Result<CmdResult> {
        let records = commands::find::by_city(&self.store, text)?;
        Ok(CmdResult::default().with_listed(records))
    }

    pub fn stats(&self) -> Result<CmdResult> {
        let stats = commands::stats::run(&self.store)?;
        Ok(CmdResult::default().with_stats(stats))
    }

    pub fn purge_inactive(&mut self, older_than_days: i64) -> Result<CmdResult> {
        let removed = commands::purge::run(&mut self.store, older_than_days, Utc::now())?;
        let message = CmdMessage::success(format!(
            "{} inactive client(s) removed (inactive for more than {} days)",
            removed.len(),
            older_than_days
        ));
        Ok(CmdResult::default()
            .with_message(message)
            .with_affected(removed))
    }

    /// Permanently removes every client. Callers confirm before calling this.
    pub fn clear(&mut self) -> Result<CmdResult> {
        let removed = commands::clear::run(&mut self.store)?;
        let message = if removed.is_empty() {
            CmdMessage::info("No clients to remove.")
        } else {
            CmdMessage::success(format!("{} client(s) permanently removed", removed.len()))
        };
        Ok(CmdResult::default()
            .with_message(message)
            .with_affected(removed))
    }
}

pub use crate::commands::{CmdMessage, CmdResult, MessageLevel, RegistryStats};
