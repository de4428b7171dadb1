//! Debounced uniqueness checks (feature `async`).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lfpm::resources::Customer;
use lfpm::{
    CheckOutcome, DebouncedCheck, InMemoryKeyValue, LocalRecordStore, MutationGateway, StoreError,
};

fn gateway_with(email: &str) -> MutationGateway<LocalRecordStore<InMemoryKeyValue>, Customer> {
    let gateway = MutationGateway::new(LocalRecordStore::new(InMemoryKeyValue::new(), "async"));
    gateway.create(&Customer::new("Ada", "Lovelace", email)).unwrap();
    gateway
}

#[tokio::test]
async fn newer_input_supersedes_waiting_check() {
    let check = DebouncedCheck::new(Duration::from_millis(50));
    let probes = Arc::new(AtomicUsize::new(0));

    let first = {
        let probes = probes.clone();
        check.run(move || async move {
            probes.fetch_add(1, Ordering::SeqCst);
            Ok::<_, StoreError>(true)
        })
    };
    let second = {
        let probes = probes.clone();
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            check
                .run(move || async move {
                    probes.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, StoreError>(false)
                })
                .await
        }
    };

    let (first, second) = tokio::join!(first, second);
    assert_eq!(first, CheckOutcome::Superseded);
    assert_eq!(second, CheckOutcome::Available);
    assert_eq!(probes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn checks_against_gateway_cache() {
    let gateway = gateway_with("ada@example.com");
    let check = DebouncedCheck::new(Duration::from_millis(5));

    let taken = check
        .run(|| async { Ok::<_, StoreError>(gateway.is_taken("email", "ADA@example.com", None)) })
        .await;
    assert_eq!(taken, CheckOutcome::Taken);

    let free = check
        .run(|| async { Ok::<_, StoreError>(gateway.is_taken("email", "grace@example.com", None)) })
        .await;
    assert_eq!(free, CheckOutcome::Available);
}

#[tokio::test]
async fn sequential_checks_do_not_supersede_each_other() {
    let check = DebouncedCheck::new(Duration::from_millis(1));
    for _ in 0..3 {
        assert_eq!(check.run(|| async { Ok::<_, StoreError>(false) }).await, CheckOutcome::Available);
    }
}
