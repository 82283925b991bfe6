use crate::error::{CadastroError, Result};
use crate::store::ClientStore;
use chrono::Utc;
use tracing::info;

use super::helpers::resolve;
use super::{Identifier, Removal};

/// Removes a client: soft (deactivate) by default, hard (erase) on request.
///
/// A hard delete frees the CPF for a new registration.
pub fn run<S: ClientStore + ?Sized>(
    store: &mut S,
    identifier: &Identifier,
    hard: bool,
) -> Result<Removal> {
    let mut record = resolve(store, identifier)?;

    if hard {
        let removed = store.delete(&record.id)?;
        info!(id = %removed.id, cpf = %removed.tax_id, "client deleted");
        return Ok(Removal::Deleted(removed));
    }

    if !record.active {
        return Err(CadastroError::AlreadyInactive(identifier.to_string()));
    }
    record.deactivate(Utc::now());
    store.replace(&record.id, &record)?;
    info!(id = %record.id, cpf = %record.tax_id, "client deactivated");
    Ok(Removal::Deactivated(record))
}
