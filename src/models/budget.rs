use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AttachedFile;

/// Lifecycle status of a budget (quote). Serialized with the Portuguese
/// labels used by the stored documents and the user's master sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStatus {
    #[serde(rename = "Pendente")]
    Pending,
    #[serde(rename = "Aprovado")]
    Approved,
    #[serde(rename = "Não Aprovado")]
    NotApproved,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Approved => "Aprovado",
            Self::NotApproved => "Não Aprovado",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pendente" | "pending" => Some(Self::Pending),
            "aprovado" | "approved" => Some(Self::Approved),
            "não aprovado" | "nao aprovado" | "not approved" | "rejected" => {
                Some(Self::NotApproved)
            }
            _ => None,
        }
    }

    pub fn all() -> &'static [BudgetStatus] {
        &[Self::Pending, Self::Approved, Self::NotApproved]
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A client quote/estimate record tracked through its approval lifecycle.
///
/// Field names stay camelCase on the wire so documents written by earlier
/// versions of the tool load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// Assigned by the repository at first insert; `None` while drafting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Issuance date, "YYYY-MM-DD".
    pub date: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub service_description: String,
    #[serde(default)]
    pub budget_amount: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    pub status: BudgetStatus,
    #[serde(default)]
    pub order_confirmation: bool,
    #[serde(default)]
    pub invoice_sent: bool,
    #[serde(default)]
    pub send_to_client: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub requester: String,
    #[serde(default)]
    pub files: Vec<AttachedFile>,
}

impl Budget {
    /// Blank draft with today's date and Pending status.
    pub fn new_draft() -> Self {
        Self {
            id: None,
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            client_name: String::new(),
            service_description: String::new(),
            budget_amount: Decimal::ZERO,
            discount: Decimal::ZERO,
            status: BudgetStatus::Pending,
            order_confirmation: false,
            invoice_sent: false,
            send_to_client: false,
            order_date: None,
            order_number: None,
            invoice_number: None,
            requester: String::new(),
            files: Vec::new(),
        }
    }

    /// Amount after discount, exact decimal.
    pub fn net_value(&self) -> Decimal {
        self.budget_amount - self.discount
    }
}
