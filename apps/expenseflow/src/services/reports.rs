use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{aggregate, ExpenseRecord, ExpenseReport, UserId};
use crate::error::AppError;
use crate::identity::{DataStore, ExpenseFilter};

/// Loads a user's expense records and aggregates them into a report.
pub struct ReportService {
    store: Arc<dyn DataStore>,
}

impl ReportService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    pub async fn load_user_expenses(&self, user_id: UserId) -> Result<Vec<ExpenseRecord>, AppError> {
        let filter = ExpenseFilter { user_id };
        let records = self.store.query_expenses(&filter).await.map_err(|e| {
            warn!(user_id = %user_id, code = %e.code(), error = %e, "Expense query failed");
            match e {
                AppError::Query { .. } => e,
                other => AppError::query(other.detail().to_string()),
            }
        })?;

        let blank = records.iter().filter(|r| r.has_blank_category()).count();
        if blank > 0 {
            warn!(user_id = %user_id, records = blank, "Expense rows with a blank category");
        }
        Ok(records)
    }

    /// Query the user's expenses and aggregate them. Query failures propagate
    /// to the caller as `AppError::Query`; there is no retry.
    pub async fn load_user_report(&self, user_id: UserId) -> Result<ExpenseReport, AppError> {
        let records = self.load_user_expenses(user_id).await?;
        let report = aggregate(&records);
        debug!(
            user_id = %user_id,
            records = report.stats.record_count(),
            categories = report.breakdown.len(),
            "Expense report built"
        );
        Ok(report)
    }
}
