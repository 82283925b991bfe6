use crate::error::Result;
use crate::model::ClientRecord;
use crate::store::ClientStore;
use tracing::warn;

/// Hard-deletes every client, active or not, returning what was removed.
///
/// This does not ask for confirmation; the UI is expected to do that first.
pub fn run<S: ClientStore + ?Sized>(store: &mut S) -> Result<Vec<ClientRecord>> {
    let removed = store.delete_where(&|_: &ClientRecord| true)?;
    warn!(count = removed.len(), store = %store.describe(), "registry cleared");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{cpf, store};
    use crate::commands::{create, remove, Identifier};
    use crate::model::NewClient;

    #[test]
    fn removes_active_and_inactive_clients() {
        let mut store = store();
        create::run(&mut store, NewClient::new("Ana", cpf(1))).unwrap();
        create::run(&mut store, NewClient::new("Bia", cpf(2))).unwrap();
        remove::run(&mut store, &Identifier::parse(&cpf(2)).unwrap(), false).unwrap();

        let removed = run(&mut store).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(store.find_all().unwrap().is_empty());

        // CPFs are free again.
        create::run(&mut store, NewClient::new("Ana", cpf(1))).unwrap();
    }

    #[test]
    fn empty_registry_is_fine() {
        let mut store = store();
        assert!(run(&mut store).unwrap().is_empty());
    }
}
