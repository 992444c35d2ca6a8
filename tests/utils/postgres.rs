use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    Executor, PgPool, Postgres, QueryBuilder,
};

use f1stats::{
    data::Snapshot,
    stats::{DataSource, StatsBackend, StatsServiceFactory},
};

use super::setup::BackendPair;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");
const VIEWS_SQL: &str = include_str!("../../sql/stats_views.sql");

// ============================================================================
// PostgreSQL test database
// ============================================================================

/// A throwaway schema on the server named by `DATABASE_URL`, holding the race
/// tables, the statistics views and one snapshot's rows
pub struct PostgresTestDb {
    pub pool: PgPool,
    admin: PgPool,
    schema: String,
}

impl PostgresTestDb {
    pub async fn with_snapshot(snapshot: &Snapshot) -> Self {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at PostgreSQL");
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock after epoch")
            .as_nanos();
        let schema = format!("f1stats_test_{}_{}", std::process::id(), nanos);

        let admin = PgPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .expect("connect to DATABASE_URL");
        admin
            .execute(format!("CREATE SCHEMA {}", schema).as_str())
            .await
            .expect("create test schema");

        let options = PgConnectOptions::from_str(&url)
            .expect("parse DATABASE_URL")
            .options([("search_path", schema.as_str())]);
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .expect("connect to test schema");

        pool.execute(SCHEMA_SQL).await.expect("create race tables");
        pool.execute(VIEWS_SQL).await.expect("create statistics views");
        load_snapshot(&pool, snapshot)
            .await
            .expect("load snapshot rows");

        Self {
            pool,
            admin,
            schema,
        }
    }

    /// Both statistics backends reading this schema
    pub fn backends(&self) -> BackendPair {
        let source = DataSource::Postgres(self.pool.clone());
        BackendPair {
            query: StatsServiceFactory::create(StatsBackend::Query, &source),
            views: StatsServiceFactory::create(StatsBackend::Views, &source),
        }
    }

    pub async fn teardown(self) {
        self.pool.close().await;
        self.admin
            .execute(format!("DROP SCHEMA {} CASCADE", self.schema).as_str())
            .await
            .expect("drop test schema");
        self.admin.close().await;
    }
}

/// Copies every snapshot row into the race tables
pub async fn load_snapshot(pool: &PgPool, snapshot: &Snapshot) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    if !snapshot.seasons.is_empty() {
        let mut query = QueryBuilder::<Postgres>::new("INSERT INTO season (season_id, year, status) ");
        query.push_values(&snapshot.seasons, |mut row, season| {
            row.push_bind(season.season_id)
                .push_bind(season.year)
                .push_bind(&season.status);
        });
        query.build().execute(&mut *tx).await?;
    }

    if !snapshot.events.is_empty() {
        let mut query = QueryBuilder::<Postgres>::new(
            "INSERT INTO event (event_id, season_id, gp_name, country_name, circuit_short_name, date_start) ",
        );
        query.push_values(&snapshot.events, |mut row, event| {
            row.push_bind(event.event_id)
                .push_bind(event.season_id)
                .push_bind(&event.gp_name)
                .push_bind(&event.country_name)
                .push_bind(&event.circuit_name)
                .push_bind(event.date_start);
        });
        query.build().execute(&mut *tx).await?;
    }

    if !snapshot.sessions.is_empty() {
        let mut query = QueryBuilder::<Postgres>::new(
            "INSERT INTO session (session_id, event_id, session_name, session_type, date_start) ",
        );
        query.push_values(&snapshot.sessions, |mut row, session| {
            row.push_bind(session.session_id)
                .push_bind(session.event_id)
                .push_bind(&session.session_name)
                .push_bind(session.session_type.to_string())
                .push_bind(session.date_start);
        });
        query.build().execute(&mut *tx).await?;
    }

    if !snapshot.drivers.is_empty() {
        let mut query = QueryBuilder::<Postgres>::new(
            "INSERT INTO driver (driver_id, driver_number, code, full_name, nationality, headshot_url) ",
        );
        query.push_values(&snapshot.drivers, |mut row, driver| {
            row.push_bind(driver.driver_id)
                .push_bind(driver.driver_number)
                .push_bind(&driver.code)
                .push_bind(&driver.full_name)
                .push_bind(&driver.nationality)
                .push_bind(&driver.headshot_url);
        });
        query.build().execute(&mut *tx).await?;
    }

    if !snapshot.teams.is_empty() {
        let mut query =
            QueryBuilder::<Postgres>::new("INSERT INTO team (team_id, name, short_name, colour_hex) ");
        query.push_values(&snapshot.teams, |mut row, team| {
            row.push_bind(team.team_id)
                .push_bind(&team.name)
                .push_bind(&team.short_name)
                .push_bind(&team.colour_hex);
        });
        query.build().execute(&mut *tx).await?;
    }

    if !snapshot.contracts.is_empty() {
        let mut query = QueryBuilder::<Postgres>::new(
            "INSERT INTO contract (contract_id, driver_id, team_id, season_id) ",
        );
        query.push_values(&snapshot.contracts, |mut row, contract| {
            row.push_bind(contract.contract_id)
                .push_bind(contract.driver_id)
                .push_bind(contract.team_id)
                .push_bind(contract.season_id);
        });
        query.build().execute(&mut *tx).await?;
    }

    if !snapshot.results.is_empty() {
        let mut query = QueryBuilder::<Postgres>::new(
            "INSERT INTO session_result (session_id, driver_id, position, number_of_laps, \
             gap_to_leader, duration, dnf, dns, dsq) ",
        );
        query.push_values(&snapshot.results, |mut row, result| {
            row.push_bind(result.session_id)
                .push_bind(result.driver_id)
                .push_bind(result.position)
                .push_bind(result.number_of_laps)
                .push_bind(&result.gap_to_leader)
                .push_bind(result.duration)
                .push_bind(result.dnf)
                .push_bind(result.dns)
                .push_bind(result.dsq);
        });
        query.build().execute(&mut *tx).await?;
    }

    if !snapshot.starting_grid.is_empty() {
        let mut query = QueryBuilder::<Postgres>::new(
            "INSERT INTO starting_grid (session_id, driver_id, position) ",
        );
        query.push_values(&snapshot.starting_grid, |mut row, entry| {
            row.push_bind(entry.session_id)
                .push_bind(entry.driver_id)
                .push_bind(entry.position);
        });
        query.build().execute(&mut *tx).await?;
    }

    if !snapshot.laps.is_empty() {
        let mut query = QueryBuilder::<Postgres>::new(
            "INSERT INTO lap (session_id, driver_id, lap_number, lap_duration) ",
        );
        query.push_values(&snapshot.laps, |mut row, lap| {
            row.push_bind(lap.session_id)
                .push_bind(lap.driver_id)
                .push_bind(lap.lap_number)
                .push_bind(lap.lap_duration);
        });
        query.build().execute(&mut *tx).await?;
    }

    tx.commit().await
}
