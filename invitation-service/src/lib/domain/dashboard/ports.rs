use async_trait::async_trait;

use crate::domain::dashboard::errors::DashboardError;
use crate::domain::dashboard::models::DashboardSummary;
use crate::domain::user::models::UserId;

/// Port for the owner dashboard.
#[async_trait]
pub trait DashboardServicePort: Send + Sync + 'static {
    /// Summarize every event of `owner` from current repository state.
    ///
    /// # Errors
    /// * `Infrastructure` - Storage operation failed
    async fn summarize(&self, owner: &UserId) -> Result<DashboardSummary, DashboardError>;
}
