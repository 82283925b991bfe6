use crate::cpf::{canonicalize, normalize, CPF_LEN};
use crate::error::{CadastroError, Result};
use crate::model::{ClientRecord, RecordId};
use crate::store::ClientStore;
use tracing::debug;

use super::SortOrder;

/// Finds a client by CPF in any punctuation. Malformed input simply matches nothing.
pub fn by_tax_id<S: ClientStore + ?Sized>(store: &S, raw: &str) -> Result<ClientRecord> {
    let not_found = || CadastroError::NotFound(format!("CPF {}", raw.trim()));
    if normalize(raw).len() != CPF_LEN {
        return Err(not_found());
    }
    let canonical = canonicalize(raw);
    store
        .find_one(&|r: &ClientRecord| r.tax_id.as_str() == canonical)?
        .ok_or_else(not_found)
}

pub fn by_id<S: ClientStore + ?Sized>(store: &S, id: &RecordId) -> Result<ClientRecord> {
    store
        .find_by_id(id)?
        .ok_or_else(|| CadastroError::NotFound(format!("id {}", id)))
}

/// Case-insensitive substring match on the name.
pub fn by_name<S: ClientStore + ?Sized>(
    store: &S,
    text: &str,
    order: SortOrder,
) -> Result<Vec<ClientRecord>> {
    let needle = text.trim().to_lowercase();
    let mut found: Vec<_> = store
        .find_all()?
        .into_iter()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .collect();
    order.apply(&mut found);
    debug!(term = %needle, count = found.len(), "name search");
    Ok(found)
}

/// Case-insensitive substring match on the address city, sorted by name.
pub fn by_city<S: ClientStore + ?Sized>(store: &S, text: &str) -> Result<Vec<ClientRecord>> {
    let needle = text.trim().to_lowercase();
    let mut found: Vec<_> = store
        .find_all()?
        .into_iter()
        .filter(|r| {
            r.city()
                .map(|city| city.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .collect();
    SortOrder::Name.apply(&mut found);
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::commands::testing::{cpf, store};
    use crate::model::{Address, NewClient};

    #[test]
    fn by_tax_id_accepts_any_punctuation() {
        let mut store = store();
        create::run(&mut store, NewClient::new("Ana", "123.456.789-09")).unwrap();
        assert!(by_tax_id(&store, "12345678909").is_ok());
        assert!(by_tax_id(&store, "123 456 789 09").is_ok());
        assert!(matches!(
            by_tax_id(&store, "123"),
            Err(CadastroError::NotFound(_))
        ));
        assert!(matches!(
            by_tax_id(&store, "111.444.777-35"),
            Err(CadastroError::NotFound(_))
        ));
    }

    #[test]
    fn by_name_matches_substrings_case_insensitively() {
        let mut store = store();
        create::run(&mut store, NewClient::new("Mariana Souza", cpf(1))).unwrap();
        create::run(&mut store, NewClient::new("Ana Costa", cpf(2))).unwrap();
        create::run(&mut store, NewClient::new("Pedro", cpf(3))).unwrap();

        let natural: Vec<_> = by_name(&store, "ANA", SortOrder::Natural)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(natural, vec!["Mariana Souza", "Ana Costa"]);

        let sorted: Vec<_> = by_name(&store, "ana", SortOrder::Name)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(sorted, vec!["Ana Costa", "Mariana Souza"]);
    }

    #[test]
    fn by_city_skips_records_without_address() {
        let mut store = store();
        let recife = Address {
            city: Some("Recife".into()),
            ..Default::default()
        };
        create::run(
            &mut store,
            NewClient::new("Zeca", cpf(1)).with_address(recife.clone()),
        )
        .unwrap();
        create::run(&mut store, NewClient::new("Ana", cpf(2)).with_address(recife)).unwrap();
        create::run(&mut store, NewClient::new("Sem Endereço", cpf(3))).unwrap();

        let names: Vec<_> = by_city(&store, "reci")
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Ana", "Zeca"]);
    }
}
