use crate::error::Result;
use crate::model::ClientRecord;
use crate::store::ClientStore;

use super::{SortOrder, StatusFilter};

pub fn run<S: ClientStore + ?Sized>(
    store: &S,
    filter: StatusFilter,
    order: SortOrder,
) -> Result<Vec<ClientRecord>> {
    let mut records: Vec<_> = store
        .find_all()?
        .into_iter()
        .filter(|r| filter.matches(r))
        .collect();
    order.apply(&mut records);
    Ok(records)
}
