//! End-to-end list/filter/paginate/mutate scenarios over the local store.

mod fixtures;

use std::sync::{Arc, Mutex};

use fixtures::{customers, seeded_gateway, Store};
use lfpm::resources::{Customer, FieldMapping, MappingEntity};
use lfpm::{
    paginate, query, FileKeyValue, Form, HasId, ListView, LocalRecordStore, MutationError,
    NoticeLevel, QueryController, QueryState, RecordStore, RecordsExt, ResourcePage, StoreError,
};

#[test]
fn scenario_a_last_page_holds_the_remainder() {
    let records = customers(25);
    let ordered = query::engine::apply(&records, &QueryState::new(10));
    let page = paginate(&ordered, 3, 10);

    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.first_item_number(), 21);
}

#[test]
fn scenario_b_search_without_matches_keeps_one_page() {
    let mut view = ListView::new(QueryController::new(10));
    view.replace_records(customers(25));
    view.set_search("no such customer");

    let page = view.current_page();
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.current_page, 1);
    assert!(page.items.is_empty());
}

#[test]
fn scenario_c_deleted_record_disappears_from_every_page() {
    let gateway = seeded_gateway(&customers(12));
    let mut page: ResourcePage<Store, Customer> =
        ResourcePage::with_gateway(gateway, QueryController::new(5));
    page.load();

    let target = page.gateway().record("7").unwrap();
    let mut form = Form::confirm_delete(&target);
    assert_eq!(page.submit(&mut form).unwrap(), None);
    assert!(!form.is_open());

    let ordered = query::engine::apply(&page.gateway().records(), &QueryState::new(5));
    let pages = paginate(&ordered, 1, 5).total_pages;
    for n in 1..=pages {
        assert!(paginate(&ordered, n, 5).items.iter().all(|c| c.id() != "7"));
    }
    assert_eq!(page.page().total_items, 11);
    assert!(page.gateway().store().get::<Customer>("7").unwrap().is_none());
}

#[test]
fn scenario_d_duplicate_email_keeps_list_and_form() {
    let records = customers(3);
    let gateway = seeded_gateway(&records);
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    gateway
        .notifier()
        .on(NoticeLevel::Error, move |n| sink.lock().unwrap().push(n.message.clone()));

    let mut form = Form::create(Customer::new("Dup", "Licate", "CUSTOMER2@example.com"));
    let err = gateway.submit(&mut form).unwrap_err();

    assert!(matches!(err, MutationError::Store(StoreError::Conflict { .. })));
    assert_eq!(gateway.records(), records);
    assert!(form.is_open());
    assert_eq!(form.draft().first_name, "Dup");
    assert_eq!(form.draft().email, "CUSTOMER2@example.com");
    assert!(form.error().unwrap().contains("already exists"));
    assert_eq!(errors.lock().unwrap().len(), 1);
}

#[test]
fn scenario_e_page_size_change_clamps_current_page() {
    let mut view = ListView::new(QueryController::new(2));
    view.replace_records(customers(15));
    view.set_page(4);
    assert_eq!(view.query().page, 4);

    view.set_page_size(5);
    let page = view.current_page();
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.current_page, 3);
    assert_eq!(page.items.len(), 5);
}

#[test]
fn edit_form_sends_only_changed_fields() {
    let gateway = seeded_gateway(&customers(3));
    let original = gateway.record("2").unwrap();

    let mut form = Form::edit(&original);
    form.draft_mut().company = Some("Analytical Engines".into());
    let updated = gateway.submit(&mut form).unwrap().unwrap();

    assert_eq!(updated.company.as_deref(), Some("Analytical Engines"));
    assert_eq!(updated.email, original.email);
    assert_eq!(gateway.record("2").unwrap(), updated);
    assert!(!form.is_open());
}

#[test]
fn unchanged_edit_closes_without_a_request() {
    let gateway = seeded_gateway(&customers(2));
    let mut form = Form::edit(&gateway.record("1").unwrap());

    assert_eq!(gateway.submit(&mut form).unwrap(), None);
    assert!(!form.is_open());
}

#[test]
fn invalid_form_reports_fields_inline() {
    let gateway = seeded_gateway(&customers(2));
    let mut form = Form::create(Customer::new("", "", "bad"));

    let err = gateway.submit(&mut form).unwrap_err();
    assert!(err.validation_errors().is_some());
    assert!(form.errors().has("firstName"));
    assert!(form.errors().has("email"));
    assert_eq!(form.error(), None);
    assert_eq!(gateway.store().records::<Customer>().all().unwrap().len(), 2);
}

#[test]
fn file_store_persists_between_instances() {
    let dir = tempfile::tempdir().unwrap();
    let first = LocalRecordStore::new(FileKeyValue::open(dir.path()).unwrap(), "backoffice");
    let mapping = first
        .records::<FieldMapping>()
        .create(&FieldMapping::new("email", "EmailAddress", MappingEntity::Customer))
        .unwrap();

    let second = LocalRecordStore::new(FileKeyValue::open(dir.path()).unwrap(), "backoffice");
    let loaded = second.records::<FieldMapping>().get(mapping.id()).unwrap();
    assert_eq!(loaded, Some(mapping));
    assert!(dir.path().join("backoffice_field_mappings.json").exists());
}
