#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::Budget;
use crate::store::Store;
use rust_decimal_macros::dec;

fn test_repo() -> BudgetRepo {
    let repo = BudgetRepo::new(Store::open_in_memory().unwrap());
    // Start from an empty collection; the seed is exercised in store tests.
    repo.store.save_budgets(&[]).unwrap();
    repo
}

fn make_budget(client: &str, status: crate::models::BudgetStatus) -> Budget {
    let mut b = Budget::new_draft();
    b.client_name = client.into();
    b.status = status;
    b.budget_amount = dec!(1000.00);
    b
}

use crate::models::BudgetStatus::{Approved, NotApproved, Pending};

// ── Upsert ────────────────────────────────────────────────────

#[test]
fn test_insert_assigns_id_and_appends() {
    let repo = test_repo();
    let saved = repo.upsert(make_budget("A", Pending)).unwrap();
    assert!(saved.id.is_some());

    let second = repo.upsert(make_budget("B", Pending)).unwrap();
    assert_ne!(saved.id, second.id);

    let all = repo.list().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].client_name, "A");
    assert_eq!(all[1].client_name, "B");
}

#[test]
fn test_update_replaces_in_place() {
    let repo = test_repo();
    repo.upsert(make_budget("A", Pending)).unwrap();
    let b = repo.upsert(make_budget("B", Pending)).unwrap();
    repo.upsert(make_budget("C", Pending)).unwrap();

    let mut edited = b.clone();
    edited.client_name = "B (editada)".into();
    let saved = repo.upsert(edited).unwrap();
    assert_eq!(saved.id, b.id);

    let all = repo.list().unwrap();
    assert_eq!(all.len(), 3);
    // Position preserved
    assert_eq!(all[1].client_name, "B (editada)");
}

#[test]
fn test_upsert_idempotent_under_same_id() {
    let repo = test_repo();
    let saved = repo.upsert(make_budget("A", Pending)).unwrap();
    repo.upsert(saved.clone()).unwrap();
    repo.upsert(saved.clone()).unwrap();

    let all = repo.list().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], saved);
}

#[test]
fn test_unknown_id_appends_as_new() {
    // An id that matches nothing in the collection behaves like an insert.
    let repo = test_repo();
    let mut b = make_budget("A", Pending);
    b.id = Some("no-such-id".into());
    let saved = repo.upsert(b).unwrap();
    assert_ne!(saved.id.as_deref(), Some("no-such-id"));
    assert_eq!(repo.list().unwrap().len(), 1);
}

// ── Delete ────────────────────────────────────────────────────

#[test]
fn test_delete() {
    let repo = test_repo();
    let a = repo.upsert(make_budget("A", Pending)).unwrap();
    repo.upsert(make_budget("B", Pending)).unwrap();

    repo.delete(a.id.as_deref().unwrap()).unwrap();
    let all = repo.list().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].client_name, "B");
}

#[test]
fn test_double_delete_is_noop() {
    let repo = test_repo();
    let a = repo.upsert(make_budget("A", Pending)).unwrap();
    let id = a.id.as_deref().unwrap();

    repo.delete(id).unwrap();
    let after_first = repo.list().unwrap();
    repo.delete(id).unwrap();
    assert_eq!(repo.list().unwrap(), after_first);
}

#[test]
fn test_delete_absent_id_is_silent() {
    let repo = test_repo();
    repo.upsert(make_budget("A", Pending)).unwrap();
    repo.delete("never-existed").unwrap();
    assert_eq!(repo.list().unwrap().len(), 1);
}

// ── Get ───────────────────────────────────────────────────────

#[test]
fn test_get_by_id() {
    let repo = test_repo();
    let a = repo.upsert(make_budget("A", Pending)).unwrap();
    let found = repo.get(a.id.as_deref().unwrap()).unwrap();
    assert_eq!(found, Some(a));
    assert!(repo.get("missing").unwrap().is_none());
}

// ── Stats ─────────────────────────────────────────────────────

#[test]
fn test_stats_counts_and_totals() {
    let repo = test_repo();

    let mut approved = make_budget("A", Approved);
    approved.budget_amount = dec!(150000.00);
    approved.discount = dec!(5000.00);
    approved.invoice_sent = true;
    repo.upsert(approved).unwrap();

    let mut approved_no_invoice = make_budget("B", Approved);
    approved_no_invoice.budget_amount = dec!(25000.00);
    repo.upsert(approved_no_invoice).unwrap();

    let mut pending = make_budget("C", Pending);
    pending.budget_amount = dec!(45000.00);
    repo.upsert(pending).unwrap();

    repo.upsert(make_budget("D", NotApproved)).unwrap();

    let stats = repo.stats().unwrap();
    assert_eq!(stats.total_estimates, 4);
    assert_eq!(stats.approved_count, 2);
    assert_eq!(stats.pending_count, 1);
    assert_eq!(stats.rejected_count, 1);
    assert_eq!(stats.total_value_approved, dec!(170000.00));
    assert_eq!(stats.total_value_pending, dec!(45000.00));
    assert_eq!(stats.invoice_pending_count, 1);
}

#[test]
fn test_stats_each_approved_counted_once() {
    let repo = test_repo();
    let mut b = make_budget("A", Approved);
    b.budget_amount = dec!(100.10);
    b.discount = dec!(0.10);
    let saved = repo.upsert(b).unwrap();
    // Re-saving the same record must not double-count it.
    repo.upsert(saved).unwrap();

    let stats = repo.stats().unwrap();
    assert_eq!(stats.approved_count, 1);
    assert_eq!(stats.total_value_approved, dec!(100.00));
}

#[test]
fn test_stats_exact_decimal_sums() {
    // Amounts chosen to drift under binary floating point.
    let repo = test_repo();
    for _ in 0..10 {
        let mut b = make_budget("A", Pending);
        b.budget_amount = dec!(0.10);
        b.discount = dec!(0.00);
        repo.upsert(b).unwrap();
    }
    assert_eq!(repo.stats().unwrap().total_value_pending, dec!(1.00));
}

#[test]
fn test_stats_empty_collection() {
    let repo = test_repo();
    let stats = repo.stats().unwrap();
    assert_eq!(stats, crate::models::DashboardStats::default());
}

// ── Backup / export ───────────────────────────────────────────

#[test]
fn test_backup_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backup_orcamentos_2026-08-28.json");

    let repo = test_repo();
    let mut a = make_budget("Construtora Exemplo", Approved);
    a.order_number = Some("PO-9981".into());
    a.discount = dec!(5000.00);
    repo.upsert(a).unwrap();
    repo.upsert(make_budget("Comercial Global", Pending)).unwrap();

    let before = repo.list().unwrap();
    let written = repo.export_backup(&path).unwrap();
    assert_eq!(written, 2);

    // Wipe and reimport: identical collection.
    repo.store.save_budgets(&[]).unwrap();
    let read = repo.import_backup(&path).unwrap();
    assert_eq!(read, 2);
    assert_eq!(repo.list().unwrap(), before);
}

#[test]
fn test_backup_is_pretty_printed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backup.json");
    let repo = test_repo();
    repo.upsert(make_budget("A", Pending)).unwrap();
    repo.export_backup(&path).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\n  "));
}

#[test]
fn test_backup_filename_shape() {
    let name = backup_filename();
    assert!(name.starts_with("backup_orcamentos_"));
    assert!(name.ends_with(".json"));
    // ISO date in the middle
    assert_eq!(name.len(), "backup_orcamentos_YYYY-MM-DD.json".len());
}

#[test]
fn test_csv_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("orcamentos.csv");
    let repo = test_repo();
    let mut b = make_budget("Construtora Exemplo", Approved);
    b.service_description = "PR0930 rev.01 - Expansão".into();
    b.order_number = Some("PO-9981".into());
    repo.upsert(b).unwrap();

    let rows = repo.export_csv(&path).unwrap();
    assert_eq!(rows, 1);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with("Data,Nome Cliente"));
    assert!(raw.contains("PO-9981"));
    assert!(raw.contains("Aprovado"));
}
