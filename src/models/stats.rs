use rust_decimal::Decimal;

/// Derived dashboard aggregates, recomputed fresh from the full collection
/// on every call. All sums are exact decimal arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub total_estimates: usize,
    pub approved_count: usize,
    pub rejected_count: usize,
    pub pending_count: usize,
    pub total_value_approved: Decimal,
    pub total_value_pending: Decimal,
    pub invoice_pending_count: usize,
}
