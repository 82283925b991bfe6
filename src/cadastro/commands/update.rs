use crate::error::{CadastroError, Result};
use crate::model::{ClientPatch, ClientRecord};
use crate::store::ClientStore;
use crate::validation::{normalize_email, normalize_optional, validate_name, validate_tax_id};
use chrono::Utc;
use tracing::{debug, info, warn};

use super::helpers::{resolve, tax_id_taken};
use super::Identifier;

/// Applies a partial patch to one client.
///
/// The patched record is built and validated in memory first; the store
/// sees a single `replace` only when every touched field passed.
pub fn run<S: ClientStore + ?Sized>(
    store: &mut S,
    identifier: &Identifier,
    patch: &ClientPatch,
) -> Result<ClientRecord> {
    let current = resolve(store, identifier)?;
    if patch.is_empty() {
        debug!(id = %current.id, "empty patch, nothing to update");
        return Ok(current);
    }

    let updated = apply_patch(store, &current, patch).inspect_err(|e| {
        warn!(id = %current.id, error = %e, "update rejected");
    })?;

    store.replace(&current.id, &updated)?;
    info!(id = %updated.id, cpf = %updated.tax_id, "client updated");
    Ok(updated)
}

fn apply_patch<S: ClientStore + ?Sized>(
    store: &S,
    current: &ClientRecord,
    patch: &ClientPatch,
) -> Result<ClientRecord> {
    let mut updated = current.clone();

    if let Some(name) = &patch.name {
        updated.name = validate_name(name)?;
    }
    if let Some(raw) = &patch.tax_id {
        let tax_id = validate_tax_id(raw)?;
        if tax_id != current.tax_id && tax_id_taken(store, &tax_id, Some(&current.id))? {
            return Err(CadastroError::DuplicateTaxId(tax_id.to_string()));
        }
        updated.tax_id = tax_id;
    }
    if let Some(email) = &patch.email {
        updated.email = normalize_email(email)?;
    }
    if let Some(phone) = &patch.phone {
        updated.phone = normalize_optional(phone);
    }
    if let Some(address) = &patch.address {
        updated.address = address.apply(current.address.clone());
    }

    updated.updated_at = Some(Utc::now());
    Ok(updated)
}
