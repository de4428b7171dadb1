//! HttpRecordStore against an in-process fake of the REST API.

mod fake_api;

use std::time::Duration;

use axum::http::StatusCode;
use fake_api::FakeApi;
use lfpm::resources::{AssetKind, Customer, DigitalAsset};
use lfpm::{
    BackendKind, ConsoleConfig, Form, HasId, HttpRecordStore, ListWindow, MutationError,
    MutationGateway, RecordPatch, RecordStore, RecordsExt, StoreBackend, StoreError,
};
use serde_json::json;

fn customer_row(id: u64, first: &str, email: &str) -> serde_json::Value {
    json!({
        "id": id,
        "firstName": first,
        "lastName": "Example",
        "email": email,
        "status": "active",
        "createdAt": "2024-01-01T00:00:00Z"
    })
}

fn store_for(api: &FakeApi) -> HttpRecordStore {
    HttpRecordStore::new(&api.base_url, Duration::from_secs(5)).unwrap()
}

#[test]
fn list_reads_paged_body_and_stringifies_ids() {
    let api = FakeApi::start();
    api.seed(
        "customers",
        vec![
            customer_row(1, "Ada", "ada@example.com"),
            customer_row(2, "Bob", "bob@example.com"),
            customer_row(3, "Cy", "cy@example.com"),
        ],
    );
    let store = store_for(&api);

    let listing = store.list::<Customer>(ListWindow::new(1, 1)).unwrap();
    assert_eq!(listing.total, 3);
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.items[0].id(), "2");
}

#[test]
fn list_accepts_bare_array() {
    let api = FakeApi::start();
    api.seed(
        "assets",
        vec![json!({ "id": "a1", "name": "Logo", "kind": "image" })],
    );

    let assets = store_for(&api).records::<DigitalAsset>().all().unwrap();
    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].kind, AssetKind::Image);
}

#[test]
fn get_missing_is_none_and_delete_missing_is_not_found() {
    let api = FakeApi::start();
    let store = store_for(&api);

    assert!(store.get::<Customer>("404").unwrap().is_none());
    let err = store.delete::<Customer>("404").unwrap_err();
    assert_eq!(
        err,
        StoreError::NotFound {
            resource: "customers".into(),
            id: "404".into()
        }
    );
}

#[test]
fn create_and_patch_round_trip_through_server() {
    let api = FakeApi::start();
    let store = store_for(&api);

    let created = store
        .create(&Customer::new("Ada", "Lovelace", "ada@example.com"))
        .unwrap();
    assert_eq!(created.id(), "100");

    let updated = store
        .update::<Customer>(created.id(), &RecordPatch::new().set("company", "Engines Ltd"))
        .unwrap();
    assert_eq!(updated.company.as_deref(), Some("Engines Ltd"));
    assert_eq!(api.rows("customers")[0]["company"], "Engines Ltd");
}

#[test]
fn duplicate_email_conflict_keeps_cache_and_form() {
    let api = FakeApi::start();
    api.seed("customers", vec![customer_row(1, "Ada", "ada@example.com")]);
    let gateway = MutationGateway::<_, Customer>::new(store_for(&api));
    let before = gateway.refresh().unwrap();

    let mut form = Form::create(Customer::new("Ada", "Again", "ada@example.com"));
    let err = gateway.submit(&mut form).unwrap_err();

    assert!(matches!(
        &err,
        MutationError::Store(StoreError::Conflict { message, .. }) if message == "Email already exists"
    ));
    assert_eq!(gateway.records(), before);
    assert!(form.is_open());
    assert_eq!(form.error(), Some("Email already exists"));
    assert_eq!(form.draft().last_name, "Again");
}

#[test]
fn unavailable_backend_is_transient() {
    let api = FakeApi::start();
    api.fail_next(StatusCode::SERVICE_UNAVAILABLE, json!({}));

    let err = store_for(&api).list::<Customer>(ListWindow::all()).unwrap_err();
    assert!(matches!(err, StoreError::Transient(ref m) if m == "Service Unavailable"));
    assert!(err.is_retryable());
}

#[test]
fn server_error_messages_are_joined() {
    let api = FakeApi::start();
    api.fail_next(
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "message": ["email must be an email", "lastName should not be empty"] }),
    );

    let err = store_for(&api)
        .create(&Customer::new("Ada", "Lovelace", "ada@example.com"))
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::Server {
            status: 422,
            message: "email must be an email, lastName should not be empty".into()
        }
    );
}

#[test]
fn unreachable_server_is_transient() {
    let store = HttpRecordStore::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let err = store.list::<Customer>(ListWindow::all()).unwrap_err();
    assert!(err.is_retryable());
}

#[test]
fn config_selects_remote_and_local_backends() {
    let api = FakeApi::start();
    api.seed("customers", vec![customer_row(1, "Ada", "ada@example.com")]);
    let dir = tempfile::tempdir().unwrap();
    let text = format!(
        "[api]\nbase_url = \"{}\"\n\n[storage]\ndir = {:?}\n",
        api.base_url,
        dir.path().display().to_string()
    );
    let config = ConsoleConfig::from_toml_str(&text).unwrap();

    let customers = StoreBackend::open(&config, "customers").unwrap();
    assert_eq!(customers.kind(), BackendKind::Remote);
    assert_eq!(customers.records::<Customer>().all().unwrap().len(), 1);

    let mappings = StoreBackend::open(&config, "field_mappings").unwrap();
    assert_eq!(mappings.kind(), BackendKind::Local);
}
