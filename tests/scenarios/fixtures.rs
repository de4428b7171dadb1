//! Shared records for the scenario suite.

use chrono::{Duration, TimeZone, Utc};
use lfpm::resources::{Customer, CustomerStatus};
use lfpm::{InMemoryKeyValue, LocalRecordStore, MutationGateway};

pub type Store = LocalRecordStore<InMemoryKeyValue>;

/// `n` customers with ids "1".."n", created one minute apart.
pub fn customers(n: usize) -> Vec<Customer> {
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    (1..=n)
        .map(|i| {
            let mut customer =
                Customer::new(format!("Customer{i}"), "Example", format!("customer{i}@example.com"))
                    .with_id(i.to_string());
            customer.created_at = Some(start + Duration::minutes(i as i64));
            if i % 4 == 0 {
                customer.status = CustomerStatus::Inactive;
            }
            customer
        })
        .collect()
}

/// A gateway over a local store seeded with `records`, cache loaded.
pub fn seeded_gateway(records: &[Customer]) -> MutationGateway<Store, Customer> {
    let store = LocalRecordStore::new(InMemoryKeyValue::new(), "scenarios");
    store.seed_if_empty(records).unwrap();
    let gateway = MutationGateway::new(store);
    gateway.refresh().unwrap();
    gateway
}
