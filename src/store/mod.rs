mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::path::Path;

use crate::models::{AppSettings, AttachedFile, Budget, BudgetStatus, FileKind};

pub(crate) const BUDGETS_KEY: &str = "construcost_budgets";
pub(crate) const SETTINGS_KEY: &str = "construcost_settings";

/// Durable key-value document store. Each named document is a complete
/// JSON value, fully replaced on every write; last writer wins.
pub(crate) struct Store {
    conn: Connection,
}

impl Store {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut store = Self { conn };
        store.migrate().context("Database migration failed")?;
        Ok(store)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Raw documents ─────────────────────────────────────────

    fn get_document(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM documents WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_document(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO documents (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    // ── Budgets document ──────────────────────────────────────

    /// Full budget collection in storage order. A missing document fails
    /// over to the seed dataset, which is written through so first read
    /// and second read agree.
    pub(crate) fn load_budgets(&self) -> Result<Vec<Budget>> {
        match self.get_document(BUDGETS_KEY)? {
            Some(raw) => {
                serde_json::from_str(&raw).context("Budget collection document is not valid JSON")
            }
            None => {
                let seed = seed_budgets();
                self.save_budgets(&seed)?;
                Ok(seed)
            }
        }
    }

    pub(crate) fn save_budgets(&self, budgets: &[Budget]) -> Result<()> {
        let raw =
            serde_json::to_string(budgets).context("Failed to serialize budget collection")?;
        self.put_document(BUDGETS_KEY, &raw)
    }

    // ── Settings document ─────────────────────────────────────

    pub(crate) fn load_settings(&self) -> Result<AppSettings> {
        match self.get_document(SETTINGS_KEY)? {
            Some(raw) => {
                serde_json::from_str(&raw).context("Settings document is not valid JSON")
            }
            None => Ok(AppSettings::default()),
        }
    }

    pub(crate) fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        let raw = serde_json::to_string(settings).context("Failed to serialize settings")?;
        self.put_document(SETTINGS_KEY, &raw)
    }
}

/// Sample dataset seeded on first run, mirroring the user's master sheet.
pub(crate) fn seed_budgets() -> Vec<Budget> {
    vec![
        Budget {
            id: Some("1".into()),
            date: "2023-10-01".into(),
            client_name: "Construtora Exemplo Ltda".into(),
            service_description: "PR0930 rev.01 2022 - Expansão do Galpão".into(),
            budget_amount: Decimal::from(150_000),
            discount: Decimal::from(5_000),
            status: BudgetStatus::Approved,
            order_confirmation: true,
            invoice_sent: true,
            send_to_client: true,
            order_date: Some("2023-10-05".into()),
            order_number: Some("PO-9981".into()),
            invoice_number: Some("NF-2023-001".into()),
            requester: "João Silva".into(),
            files: vec![AttachedFile {
                id: "f1".into(),
                name: "Planta_Baixa_v1.pdf".into(),
                url: "#".into(),
                kind: FileKind::Pdf,
            }],
        },
        Budget {
            id: Some("2".into()),
            date: "2023-10-15".into(),
            client_name: "Comercial Global S.A.".into(),
            service_description: "PR0931 - Reforma do Escritório".into(),
            budget_amount: Decimal::from(45_000),
            discount: Decimal::ZERO,
            status: BudgetStatus::Pending,
            order_confirmation: false,
            invoice_sent: false,
            send_to_client: false,
            order_date: None,
            order_number: None,
            invoice_number: None,
            requester: "Maria Santos".into(),
            files: Vec::new(),
        },
        Budget {
            id: Some("3".into()),
            date: "2023-10-20".into(),
            client_name: "Indústrias Reunidas".into(),
            service_description: "PR0932 - Piso Fabril".into(),
            budget_amount: Decimal::from(82_000),
            discount: Decimal::from(2_000),
            status: BudgetStatus::NotApproved,
            order_confirmation: false,
            invoice_sent: false,
            send_to_client: true,
            order_date: None,
            order_number: None,
            invoice_number: None,
            requester: "João Silva".into(),
            files: Vec::new(),
        },
        Budget {
            id: Some("4".into()),
            date: "2023-11-01".into(),
            client_name: "Tecnologia Inovadora".into(),
            service_description: "PR0933 - Refrigeração Sala de Servidores".into(),
            budget_amount: Decimal::from(25_000),
            discount: Decimal::ZERO,
            status: BudgetStatus::Approved,
            order_confirmation: true,
            invoice_sent: false,
            send_to_client: true,
            order_date: Some("2023-11-03".into()),
            order_number: Some("PED-4420".into()),
            invoice_number: None,
            requester: "Pedro Souza".into(),
            files: vec![AttachedFile {
                id: "f2".into(),
                name: "Foto_Local.jpg".into(),
                url: "https://picsum.photos/200/300".into(),
                kind: FileKind::Image,
            }],
        },
    ]
}

#[cfg(test)]
mod tests;
