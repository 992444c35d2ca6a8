use sqlx::PgPool;
use std::sync::Arc;
use strum_macros::{Display, EnumString};
use tracing::info;

use super::{
    service::{QueryStatsService, StatsService},
    view_service::ViewStatsService,
    views::{MaterializedViews, PostgresStatsViews},
};
use crate::data::{InMemoryRaceDataRepository, PostgresRaceDataRepository, Snapshot};

/// Which of the two statistics backends serves requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StatsBackend {
    /// Raw rows folded in-process
    #[default]
    Query,
    /// Precomputed views, formatted only
    Views,
}

/// Where the race data lives
#[derive(Clone)]
pub enum DataSource {
    InMemory(Arc<Snapshot>),
    Postgres(PgPool),
}

/// Factory for creating statistics services from configuration
pub struct StatsServiceFactory;

impl StatsServiceFactory {
    pub fn create(backend: StatsBackend, source: &DataSource) -> Arc<dyn StatsService> {
        info!(backend = %backend, "Creating statistics service");

        match (backend, source) {
            (StatsBackend::Query, DataSource::InMemory(snapshot)) => Arc::new(
                QueryStatsService::new(Arc::new(InMemoryRaceDataRepository::new(
                    snapshot.as_ref().clone(),
                ))),
            ),
            (StatsBackend::Query, DataSource::Postgres(pool)) => Arc::new(QueryStatsService::new(
                Arc::new(PostgresRaceDataRepository::new(pool.clone())),
            )),
            (StatsBackend::Views, DataSource::InMemory(snapshot)) => Arc::new(
                ViewStatsService::new(Arc::new(MaterializedViews::refresh(snapshot))),
            ),
            (StatsBackend::Views, DataSource::Postgres(pool)) => Arc::new(ViewStatsService::new(
                Arc::new(PostgresStatsViews::new(pool.clone())),
            )),
        }
    }
}
