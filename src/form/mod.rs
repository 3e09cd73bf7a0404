mod docref;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::Path;

use crate::gemini::ExtractedBudget;
use crate::models::{AttachedFile, Budget, BudgetStatus};
use crate::repo::BudgetRepo;
use crate::sync;

use docref::{file_stem, pick_reference_doc};

/// How an AI-suggested value merges into the draft field it targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MergePolicy {
    /// Suggestion applies only when the draft field is empty/unset.
    OverwriteIfEmpty,
    /// Suggestion is authoritative and replaces whatever the draft holds.
    AlwaysOverwrite,
}

/// Per-field merge policy for `apply_extracted`. Discount is the one
/// authoritative field: an absent suggestion means "no discount found",
/// which overwrites even a user-entered value.
pub(crate) const MERGE_POLICIES: &[(&str, MergePolicy)] = &[
    ("clientName", MergePolicy::OverwriteIfEmpty),
    ("serviceDescription", MergePolicy::OverwriteIfEmpty),
    ("budgetAmount", MergePolicy::OverwriteIfEmpty),
    ("date", MergePolicy::OverwriteIfEmpty),
    ("requester", MergePolicy::OverwriteIfEmpty),
    ("orderNumber", MergePolicy::OverwriteIfEmpty),
    ("discount", MergePolicy::AlwaysOverwrite),
];

fn policy_for(field: &str) -> MergePolicy {
    MERGE_POLICIES
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, policy)| *policy)
        .unwrap_or(MergePolicy::OverwriteIfEmpty)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionState {
    Drafting,
    Submitting,
    Committed,
}

pub(crate) enum SubmitOutcome {
    Saved(Budget),
    /// Submission refused: the blocking warnings, for the caller to show.
    Blocked(Vec<String>),
}

/// In-memory draft of a budget under edit. Mutations happen strictly
/// sequentially; the repository is only touched on a successful submit.
pub(crate) struct FormSession {
    draft: Budget,
    state: SessionState,
}

impl FormSession {
    /// Fresh draft: today's date, Pending, zero amounts, no files.
    pub(crate) fn new() -> Self {
        Self {
            draft: Budget::new_draft(),
            state: SessionState::Drafting,
        }
    }

    /// Edit session over a deep copy of an existing record.
    pub(crate) fn edit(budget: Budget) -> Self {
        Self {
            draft: budget,
            state: SessionState::Drafting,
        }
    }

    pub(crate) fn draft(&self) -> &Budget {
        &self.draft
    }

    pub(crate) fn draft_mut(&mut self) -> &mut Budget {
        &mut self.draft
    }

    pub(crate) fn state(&self) -> SessionState {
        self.state
    }

    // ── Attachments ───────────────────────────────────────────

    /// Read and attach a batch of files, then run the doc-reference
    /// heuristic once over the whole batch.
    pub(crate) fn attach_paths(&mut self, paths: &[impl AsRef<Path>]) -> Result<()> {
        for path in paths {
            let path = path.as_ref();
            let content = std::fs::read(path)
                .with_context(|| format!("Failed to read attachment: {}", path.display()))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            self.draft.files.push(AttachedFile::from_content(&name, &content));
        }
        self.apply_doc_reference();
        Ok(())
    }

    /// Attach raw content directly (already read by the caller).
    pub(crate) fn attach_content(&mut self, name: &str, content: &[u8]) {
        self.draft
            .files
            .push(AttachedFile::from_content(name, content));
        self.apply_doc_reference();
    }

    pub(crate) fn remove_file(&mut self, file_id: &str) {
        self.draft.files.retain(|f| f.id != file_id);
    }

    /// If the service description is still empty, default it to the stem
    /// of the latest attached PDF (by filename revision). Never overwrites
    /// a non-empty description.
    fn apply_doc_reference(&mut self) {
        if !self.draft.service_description.is_empty() {
            return;
        }
        if let Some(doc) = pick_reference_doc(&self.draft.files) {
            self.draft.service_description = file_stem(&doc.name).to_string();
        }
    }

    // ── AI-extracted suggestions ──────────────────────────────

    /// Merge AI-suggested fields into the draft per the policy table.
    /// A present `orderNumber` additionally marks the budget approved
    /// with a confirmed order.
    pub(crate) fn apply_extracted(&mut self, extracted: &ExtractedBudget) {
        merge_text("clientName", &mut self.draft.client_name, &extracted.client_name);
        merge_text(
            "serviceDescription",
            &mut self.draft.service_description,
            &extracted.service_description,
        );
        merge_text("date", &mut self.draft.date, &extracted.date);
        merge_text("requester", &mut self.draft.requester, &extracted.requester);
        merge_amount(
            "budgetAmount",
            &mut self.draft.budget_amount,
            &extracted.budget_amount,
        );
        merge_amount("discount", &mut self.draft.discount, &extracted.discount);

        if let Some(order_number) = &extracted.order_number {
            if policy_for("orderNumber") == MergePolicy::AlwaysOverwrite
                || self.draft.order_number.is_none()
            {
                self.draft.order_number = Some(order_number.clone());
            }
            self.draft.status = BudgetStatus::Approved;
            self.draft.order_confirmation = true;
            if self.draft.order_date.is_none() {
                self.draft.order_date = Some(
                    extracted
                        .date
                        .clone()
                        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string()),
                );
            }
        }
    }

    // ── Validation & submit ───────────────────────────────────

    /// Human-readable warnings, in a fixed order. Warnings containing
    /// "Recomendado" are advisory; all others block submission.
    pub(crate) fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.draft.client_name.is_empty() {
            warnings.push("Nome do Cliente é obrigatório.".to_string());
        }
        if self.draft.service_description.is_empty() {
            warnings.push("Descrição do Serviço é obrigatória.".to_string());
        }
        if self.draft.budget_amount <= Decimal::ZERO {
            warnings.push("Valor do orçamento deve ser maior que 0.".to_string());
        }
        if self.draft.status == BudgetStatus::Approved && self.draft.order_date.is_none() {
            warnings.push("Orçamentos aprovados devem ter uma Data do Pedido.".to_string());
        }
        warnings
    }

    pub(crate) fn blocking_warnings(&self) -> Vec<String> {
        self.validate()
            .into_iter()
            .filter(|w| !w.contains("Recomendado"))
            .collect()
    }

    /// Validate, run the simulated remote sync, then hand the draft to the
    /// repository. Blocking warnings refuse the submit unless the caller
    /// confirmed the override; any failure leaves the collection untouched
    /// and the session back in `Drafting`.
    pub(crate) fn submit(
        &mut self,
        repo: &BudgetRepo,
        confirm_override: bool,
        progress: &mut dyn FnMut(&str),
    ) -> Result<SubmitOutcome> {
        let blocking = self.blocking_warnings();
        if !blocking.is_empty() && !confirm_override {
            return Ok(SubmitOutcome::Blocked(blocking));
        }

        self.state = SessionState::Submitting;
        sync::run_submit_phases(progress);

        match repo.upsert(self.draft.clone()) {
            Ok(saved) => {
                self.draft = saved.clone();
                self.state = SessionState::Committed;
                Ok(SubmitOutcome::Saved(saved))
            }
            Err(e) => {
                self.state = SessionState::Drafting;
                Err(e)
            }
        }
    }
}

fn merge_text(field: &str, target: &mut String, suggestion: &Option<String>) {
    let Some(value) = suggestion else { return };
    match policy_for(field) {
        MergePolicy::AlwaysOverwrite => *target = value.clone(),
        MergePolicy::OverwriteIfEmpty => {
            if target.is_empty() {
                *target = value.clone();
            }
        }
    }
}

fn merge_amount(field: &str, target: &mut Decimal, suggestion: &Option<Decimal>) {
    match policy_for(field) {
        // Authoritative: absence means zero, not "keep the draft value".
        MergePolicy::AlwaysOverwrite => *target = suggestion.unwrap_or(Decimal::ZERO),
        MergePolicy::OverwriteIfEmpty => {
            if *target == Decimal::ZERO {
                if let Some(value) = suggestion {
                    *target = *value;
                }
            }
        }
    }
}
