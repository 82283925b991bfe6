use super::Identifier;
use crate::cpf::Cpf;
use crate::error::{CadastroError, Result};
use crate::model::{ClientRecord, RecordId};
use crate::store::ClientStore;

/// Looks a client up by CPF or id, active or not.
pub fn resolve<S: ClientStore + ?Sized>(
    store: &S,
    identifier: &Identifier,
) -> Result<ClientRecord> {
    let found = match identifier {
        Identifier::TaxId(cpf) => store.find_one(&|r: &ClientRecord| r.tax_id.as_str() == cpf)?,
        Identifier::Id(id) => store.find_by_id(id)?,
    };
    found.ok_or_else(|| CadastroError::NotFound(identifier.to_string()))
}

/// Whether a record other than `except` already holds `cpf`.
pub fn tax_id_taken<S: ClientStore + ?Sized>(
    store: &S,
    cpf: &Cpf,
    except: Option<&RecordId>,
) -> Result<bool> {
    let holder = store.find_one(&|r: &ClientRecord| &r.tax_id == cpf)?;
    Ok(match (holder, except) {
        (Some(record), Some(id)) => &record.id != id,
        (Some(_), None) => true,
        (None, _) => false,
    })
}
