//! 存储操作时间预算
//!
//! 每个存储读写都包在 `with_budget` 中：超时立即返回 `QueryTimeout`，
//! 不会无限阻塞，调用方可据此重试。

use std::future::Future;
use std::time::Duration;

use super::{AppError, AppResult};

/// Run `fut` within `budget`; elapsed budget becomes a distinct timeout error.
pub async fn with_budget<T, E, F>(budget: Duration, operation: &'static str, fut: F) -> AppResult<T>
where
    F: Future<Output = Result<T, E>>,
    E: Into<AppError>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => {
            tracing::warn!(
                operation,
                budget_ms = budget.as_millis() as u64,
                "Storage operation exceeded its time budget"
            );
            Err(AppError::timeout(operation))
        }
    }
}
