use crate::error::{CadastroError, Field, Result};
use crate::model::{AddressPatch, ClientRecord, NewClient};
use crate::store::ClientStore;
use crate::validation::{normalize_email, normalize_optional, validate_name, validate_tax_id};
use chrono::Utc;
use tracing::{info, warn};

use super::helpers::tax_id_taken;

/// Registers a new client.
///
/// Checks run in a fixed order: required fields, name, CPF check digits,
/// CPF uniqueness (active and inactive records alike), then email.
pub fn run<S: ClientStore + ?Sized>(store: &mut S, input: NewClient) -> Result<ClientRecord> {
    if input.name.trim().is_empty() {
        return Err(CadastroError::MissingField(Field::Name));
    }
    if input.tax_id.trim().is_empty() {
        return Err(CadastroError::MissingField(Field::TaxId));
    }
    let name = validate_name(&input.name)?;
    let tax_id = validate_tax_id(&input.tax_id)?;

    if tax_id_taken(store, &tax_id, None)? {
        warn!(cpf = %tax_id, "rejected duplicate CPF");
        return Err(CadastroError::DuplicateTaxId(tax_id.to_string()));
    }

    let email = match input.email.as_deref() {
        Some(raw) => normalize_email(raw)?,
        None => None,
    };

    let mut record = ClientRecord::new(store.next_id()?, name, tax_id);
    record.email = email;
    record.phone = input.phone.as_deref().and_then(normalize_optional);
    record.address = input
        .address
        .and_then(|address| AddressPatch::from(address).apply(None));
    record.registered_at = Utc::now();

    store.insert(&record)?;
    info!(id = %record.id, cpf = %record.tax_id, store = %store.describe(), "client created");
    Ok(record)
}
