#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

// ── Seed failover ─────────────────────────────────────────────

#[test]
fn test_missing_budgets_document_seeds() {
    let store = Store::open_in_memory().unwrap();
    let budgets = store.load_budgets().unwrap();
    assert_eq!(budgets.len(), 4);
    assert_eq!(budgets[0].client_name, "Construtora Exemplo Ltda");
    assert_eq!(budgets[0].budget_amount, dec!(150000));
}

#[test]
fn test_seed_written_through() {
    let store = Store::open_in_memory().unwrap();
    let first = store.load_budgets().unwrap();
    let second = store.load_budgets().unwrap();
    assert_eq!(first, second);
    // The document now exists, so a save of an empty collection sticks.
    store.save_budgets(&[]).unwrap();
    assert!(store.load_budgets().unwrap().is_empty());
}

#[test]
fn test_missing_settings_document_defaults() {
    let store = Store::open_in_memory().unwrap();
    let settings = store.load_settings().unwrap();
    assert_eq!(settings, AppSettings::default());
    assert!(settings.email_notifications);
    assert!(!settings.drive_connected);
}

// ── Full-overwrite semantics ──────────────────────────────────

#[test]
fn test_save_replaces_whole_document() {
    let store = Store::open_in_memory().unwrap();
    let mut budgets = store.load_budgets().unwrap();
    budgets.truncate(1);
    store.save_budgets(&budgets).unwrap();
    assert_eq!(store.load_budgets().unwrap().len(), 1);
}

#[test]
fn test_settings_roundtrip() {
    let store = Store::open_in_memory().unwrap();
    let mut settings = AppSettings::default();
    settings.drive_connected = true;
    settings.drive_folder_name = "Gestão de Orçamentos / 2024 (Conectado)".into();
    settings.google_api_key = "key-123".into();
    store.save_settings(&settings).unwrap();
    assert_eq!(store.load_settings().unwrap(), settings);
}

#[test]
fn test_last_writer_wins() {
    let store = Store::open_in_memory().unwrap();
    let mut a = AppSettings::default();
    a.google_sheet_id = "sheet-a".into();
    let mut b = AppSettings::default();
    b.google_sheet_id = "sheet-b".into();
    store.save_settings(&a).unwrap();
    store.save_settings(&b).unwrap();
    assert_eq!(store.load_settings().unwrap().google_sheet_id, "sheet-b");
}

// ── Older document shapes ─────────────────────────────────────

#[test]
fn test_older_shape_trusted_as_is() {
    let store = Store::open_in_memory().unwrap();
    // A document written before the invoiceNumber field existed, with no
    // optional order fields at all.
    let raw = r#"[{
        "id": "x1",
        "date": "2022-07-05",
        "clientName": "Cliente Antigo",
        "serviceDescription": "PR0800 - Laudo",
        "budgetAmount": "1234.56",
        "discount": 0,
        "status": "Pendente",
        "orderConfirmation": false,
        "invoiceSent": false,
        "sendToClient": false,
        "requester": "",
        "files": []
    }]"#;
    store.put_document(BUDGETS_KEY, raw).unwrap();

    let budgets = store.load_budgets().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].budget_amount, dec!(1234.56));
    assert!(budgets[0].invoice_number.is_none());
}

#[test]
fn test_corrupt_document_is_an_error() {
    let store = Store::open_in_memory().unwrap();
    store.put_document(BUDGETS_KEY, "not json").unwrap();
    assert!(store.load_budgets().is_err());
}

// ── Durability across connections ─────────────────────────────

#[test]
fn test_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("construcost.db");
    {
        let store = Store::open(&path).unwrap();
        let mut budgets = store.load_budgets().unwrap();
        budgets[0].client_name = "Renomeada".into();
        store.save_budgets(&budgets).unwrap();
    }
    let store = Store::open(&path).unwrap();
    assert_eq!(store.load_budgets().unwrap()[0].client_name, "Renomeada");
}
