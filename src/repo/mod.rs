use anyhow::{Context, Result};
use std::path::Path;

use crate::models::{AppSettings, Budget, BudgetStatus, DashboardStats};
use crate::store::Store;

/// CRUD over the persisted budget collection plus derived statistics.
///
/// Every operation is a full read-modify-write of the collection document;
/// the single-user assumption means no locking is needed.
pub(crate) struct BudgetRepo {
    store: Store,
}

impl BudgetRepo {
    pub(crate) fn new(store: Store) -> Self {
        Self { store }
    }

    /// All budgets in storage order (insertion order as persisted).
    pub(crate) fn list(&self) -> Result<Vec<Budget>> {
        self.store.load_budgets()
    }

    pub(crate) fn get(&self, id: &str) -> Result<Option<Budget>> {
        Ok(self.list()?.into_iter().find(|b| b.id.as_deref() == Some(id)))
    }

    /// Replace in place when the id matches an existing record (position
    /// preserved); otherwise assign a fresh id and append. Returns the
    /// possibly id-assigned record. No validation happens here.
    pub(crate) fn upsert(&self, mut budget: Budget) -> Result<Budget> {
        let mut budgets = self.list()?;
        let existing = budget
            .id
            .as_deref()
            .and_then(|id| budgets.iter().position(|b| b.id.as_deref() == Some(id)));

        match existing {
            Some(index) => budgets[index] = budget.clone(),
            None => {
                budget.id = Some(generate_id());
                budgets.push(budget.clone());
            }
        }

        self.store.save_budgets(&budgets)?;
        Ok(budget)
    }

    /// Remove the matching record. Deleting an absent id is a silent no-op.
    pub(crate) fn delete(&self, id: &str) -> Result<()> {
        let mut budgets = self.list()?;
        budgets.retain(|b| b.id.as_deref() != Some(id));
        self.store.save_budgets(&budgets)
    }

    /// Recomputed fresh from the full collection on every call.
    pub(crate) fn stats(&self) -> Result<DashboardStats> {
        let budgets = self.list()?;
        let mut stats = DashboardStats {
            total_estimates: budgets.len(),
            ..DashboardStats::default()
        };

        for b in &budgets {
            match b.status {
                BudgetStatus::Approved => {
                    stats.approved_count += 1;
                    stats.total_value_approved += b.net_value();
                    if !b.invoice_sent {
                        stats.invoice_pending_count += 1;
                    }
                }
                BudgetStatus::Pending => {
                    stats.pending_count += 1;
                    stats.total_value_pending += b.net_value();
                }
                BudgetStatus::NotApproved => stats.rejected_count += 1,
            }
        }

        Ok(stats)
    }

    // ── Settings ──────────────────────────────────────────────

    pub(crate) fn settings(&self) -> Result<AppSettings> {
        self.store.load_settings()
    }

    pub(crate) fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        self.store.save_settings(settings)
    }

    // ── Backup / export ───────────────────────────────────────

    /// Pretty-printed JSON backup of the full collection. Returns the
    /// number of records written.
    pub(crate) fn export_backup(&self, path: &Path) -> Result<usize> {
        let budgets = self.list()?;
        let json = serde_json::to_string_pretty(&budgets)
            .context("Failed to serialize budget collection")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write backup: {}", path.display()))?;
        Ok(budgets.len())
    }

    /// Replace the whole collection with the contents of a backup file.
    pub(crate) fn import_backup(&self, path: &Path) -> Result<usize> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read backup: {}", path.display()))?;
        let budgets: Vec<Budget> =
            serde_json::from_str(&raw).context("Backup file is not a valid budget collection")?;
        self.store.save_budgets(&budgets)?;
        Ok(budgets.len())
    }

    /// One CSV row per budget, mirroring the columns of the user's master
    /// sheet. Returns the number of rows written.
    pub(crate) fn export_csv(&self, path: &Path) -> Result<usize> {
        let budgets = self.list()?;
        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

        wtr.write_record([
            "Data",
            "Nome Cliente",
            "Descrição Serviços",
            "Valor Orçamento",
            "Desconto",
            "Status",
            "Pedido",
            "Nota Fiscal",
            "Solicitante",
        ])?;
        for b in &budgets {
            let amount = b.budget_amount.to_string();
            let discount = b.discount.to_string();
            wtr.write_record([
                b.date.as_str(),
                b.client_name.as_str(),
                b.service_description.as_str(),
                amount.as_str(),
                discount.as_str(),
                b.status.as_str(),
                b.order_number.as_deref().unwrap_or(""),
                b.invoice_number.as_deref().unwrap_or(""),
                b.requester.as_str(),
            ])?;
        }
        wtr.flush()?;
        Ok(budgets.len())
    }
}

/// Default backup filename: `backup_orcamentos_<ISO-date>.json`.
pub(crate) fn backup_filename() -> String {
    format!(
        "backup_orcamentos_{}.json",
        chrono::Local::now().format("%Y-%m-%d")
    )
}

/// Collision-resistant opaque id for a newly inserted budget.
fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests;
