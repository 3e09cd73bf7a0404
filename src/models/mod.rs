mod budget;
mod file;
mod settings;
mod stats;

pub use budget::{Budget, BudgetStatus};
pub use file::{AttachedFile, FileKind};
pub use settings::AppSettings;
pub use stats::DashboardStats;
