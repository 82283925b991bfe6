use crate::error::Result;
use crate::model::ClientRecord;
use crate::store::ClientStore;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

pub const DEFAULT_PURGE_DAYS: i64 = 30;

/// Hard-deletes inactive clients deactivated more than `older_than_days` before `now`.
///
/// A window reaching past the representable calendar purges nothing.
pub fn run<S: ClientStore + ?Sized>(
    store: &mut S,
    older_than_days: i64,
    now: DateTime<Utc>,
) -> Result<Vec<ClientRecord>> {
    let Some(cutoff) = cutoff(now, older_than_days) else {
        info!(days = older_than_days, "purge window out of range, nothing to purge");
        return Ok(Vec::new());
    };
    let removed = store.delete_where(&|r: &ClientRecord| {
        !r.active && r.deactivated_at.map(|at| at < cutoff).unwrap_or(false)
    })?;
    info!(count = removed.len(), %cutoff, "purged inactive clients");
    Ok(removed)
}

fn cutoff(now: DateTime<Utc>, older_than_days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(older_than_days.max(0)).and_then(|window| now.checked_sub_signed(window))
}
