use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use crate::cache::{GenerationCache, TtlCache};
use crate::config::Config;
use crate::db::{user_store::UserStore, DbPool};
use crate::error::Result;
use crate::models::{DashboardStats, RefreshOutcome, UserView};
use crate::services::export_service::{self, ChartKind};
use crate::services::{stats_service, RefreshService, ViewService};
use crate::source::{HttpUserSource, UserSource};

/// Wires the refresh pipeline and the view loader behind their memoization caches.
pub struct Controller {
    refresh_service: RefreshService,
    view_service: ViewService,
    // Held across a whole refresh, so refreshes never interleave
    refresh_cache: Mutex<TtlCache<RefreshOutcome>>,
    view_cache: Mutex<GenerationCache<Arc<Vec<UserView>>>>,
    generation: AtomicU64,
}

impl Controller {
    pub fn new(config: &Config, pool: DbPool) -> Result<Self> {
        let source = HttpUserSource::new(config.api_url.clone(), config.fetch_timeout())?;
        tracing::info!(
            url = source.url(),
            timeout_secs = config.fetch_timeout_secs,
            "Using remote user source"
        );
        Ok(Self::with_source(config, pool, Arc::new(source)))
    }

    pub fn with_source(config: &Config, pool: DbPool, source: Arc<dyn UserSource>) -> Self {
        let user_store = UserStore::new(pool);

        Self {
            refresh_service: RefreshService::new(source, user_store.clone()),
            view_service: ViewService::new(user_store, config.name_length_policy),
            refresh_cache: Mutex::new(TtlCache::new(config.refresh_ttl())),
            view_cache: Mutex::new(GenerationCache::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Refresh the snapshot, reusing a successful outcome inside the memoization window
    /// unless `force` is set.
    pub async fn refresh(&self, force: bool) -> Result<RefreshOutcome> {
        let mut cache = self.refresh_cache.lock().await;

        if !force {
            if let Some(outcome) = cache.get(Instant::now()) {
                tracing::debug!(count = outcome.count, "Serving refresh from cache");
                return Ok(RefreshOutcome {
                    cached: true,
                    ..outcome
                });
            }
        }

        let outcome = match self.refresh_service.refresh().await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "Refresh failed");
                return Err(e);
            }
        };

        self.generation.fetch_add(1, Ordering::SeqCst);
        self.view_cache.lock().await.clear();
        cache.set(outcome.clone(), Instant::now());

        tracing::info!(count = outcome.count, "Users refreshed from API");
        Ok(outcome)
    }

    /// Drop both cached results so the next refresh hits the network.
    pub async fn clear_caches(&self) {
        let refresh_cleared = self.refresh_cache.lock().await.clear();
        let view_cleared = self.view_cache.lock().await.clear();
        tracing::info!(refresh_cleared, view_cleared, "Caches cleared");
    }

    /// Derived view of the current snapshot.
    pub async fn load(&self) -> Result<Arc<Vec<UserView>>> {
        let generation = self.generation.load(Ordering::SeqCst);
        let mut cache = self.view_cache.lock().await;

        if let Some(rows) = cache.get(generation) {
            return Ok(rows);
        }

        let rows = Arc::new(self.view_service.load().await?);
        tracing::debug!(rows = rows.len(), generation, "Loaded derived view");
        cache.set(generation, rows.clone());
        Ok(rows)
    }

    pub async fn load_user(&self, id: i64) -> Result<UserView> {
        self.view_service.load_one(id).await
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        let rows = self.load().await?;
        Ok(stats_service::dashboard_stats(&rows))
    }

    pub async fn export_csv(&self) -> Result<Vec<u8>> {
        let rows = self.load().await?;
        export_service::users_csv(&rows)
    }

    pub async fn export_chart(&self, kind: ChartKind) -> Result<String> {
        let rows = self.load().await?;
        export_service::chart_html(kind, &rows)
    }
}
