use crate::error::Result;
use crate::model::ClientRecord;
use crate::store::ClientStore;
use std::collections::HashMap;

const TOP_CITIES: usize = 5;

/// Registry counters. Rendering is left to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub with_email: usize,
    pub with_phone: usize,
    /// Most recently registered client
    pub newest: Option<ClientRecord>,
    /// Cities with the most clients, largest first, ties by name
    pub top_cities: Vec<(String, usize)>,
}

pub fn run<S: ClientStore + ?Sized>(store: &S) -> Result<RegistryStats> {
    let records = store.find_all()?;

    let mut stats = RegistryStats {
        total: records.len(),
        ..Default::default()
    };
    let mut cities: HashMap<String, usize> = HashMap::new();

    for record in &records {
        if record.active {
            stats.active += 1;
        } else {
            stats.inactive += 1;
        }
        if record.email.is_some() {
            stats.with_email += 1;
        }
        if record.phone.is_some() {
            stats.with_phone += 1;
        }
        if let Some(city) = record.city() {
            *cities.entry(city.to_string()).or_default() += 1;
        }
    }

    stats.newest = records.iter().max_by_key(|r| r.registered_at).cloned();

    let mut ranked: Vec<_> = cities.into_iter().collect();
    ranked.sort_by(|(city_a, n_a), (city_b, n_b)| n_b.cmp(n_a).then_with(|| city_a.cmp(city_b)));
    ranked.truncate(TOP_CITIES);
    stats.top_cities = ranked;

    Ok(stats)
}
