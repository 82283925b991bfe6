use crate::error::{CadastroError, Result};
use crate::model::ClientRecord;
use crate::store::ClientStore;
use chrono::Utc;
use tracing::info;

use super::helpers::resolve;
use super::Identifier;

pub fn run<S: ClientStore + ?Sized>(
    store: &mut S,
    identifier: &Identifier,
) -> Result<ClientRecord> {
    let mut record = resolve(store, identifier)?;
    if record.active {
        return Err(CadastroError::AlreadyActive(identifier.to_string()));
    }
    record.reactivate(Utc::now());
    store.replace(&record.id, &record)?;
    info!(id = %record.id, cpf = %record.tax_id, "client reactivated");
    Ok(record)
}
