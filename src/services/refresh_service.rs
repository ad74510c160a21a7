use std::sync::Arc;

use chrono::Utc;

use crate::db::user_store::UserStore;
use crate::error::{PipelineError, Result};
use crate::models::RefreshOutcome;
use crate::source::UserSource;

/// Fetches the upstream collection and replaces the persisted snapshot with it.
pub struct RefreshService {
    source: Arc<dyn UserSource>,
    user_store: UserStore,
}

impl RefreshService {
    pub fn new(source: Arc<dyn UserSource>, user_store: UserStore) -> Self {
        Self { source, user_store }
    }

    /// Nothing is written unless the whole fetch succeeded.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let users = self.source.fetch_users().await?;

        let count = self
            .user_store
            .replace_all(&users)
            .await
            .map_err(PipelineError::Storage)?;

        tracing::info!(fetched = users.len(), stored = count, "Snapshot replaced");

        Ok(RefreshOutcome {
            count,
            refreshed_at: Utc::now(),
            cached: false,
        })
    }
}
