use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Postgres, QueryBuilder, Row};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use super::models::{
    Contract, Driver, Event, FastestLap, Season, SessionInfo, SessionResult, SessionType,
    StartingGridEntry, Team,
};
use super::snapshot::Snapshot;
use crate::stats::StatsError;

/// Narrows session-scoped reads. Empty `session_types` means every type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFilter {
    pub year: Option<i32>,
    pub session_id: Option<i32>,
    pub driver_id: Option<i32>,
    pub session_types: Vec<SessionType>,
}

impl SessionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_year(year: i32) -> Self {
        Self {
            year: Some(year),
            ..Self::default()
        }
    }

    pub fn for_session(session_id: i32) -> Self {
        Self {
            session_id: Some(session_id),
            ..Self::default()
        }
    }

    pub fn driver(mut self, driver_id: i32) -> Self {
        self.driver_id = Some(driver_id);
        self
    }

    pub fn of_types(mut self, session_types: &[SessionType]) -> Self {
        self.session_types = session_types.to_vec();
        self
    }

    /// Session-level part of the filter; the driver is checked per row
    pub fn matches_session(&self, session: &SessionInfo) -> bool {
        self.year.map_or(true, |year| session.year == year)
            && self
                .session_id
                .map_or(true, |id| session.session_id == id)
            && (self.session_types.is_empty()
                || self.session_types.contains(&session.session_type))
    }

    pub fn matches_driver(&self, driver_id: i32) -> bool {
        self.driver_id.map_or(true, |id| id == driver_id)
    }

    fn type_labels(&self) -> Vec<String> {
        self.session_types
            .iter()
            .flat_map(|t| t.labels().iter().map(|label| label.to_string()))
            .collect()
    }
}

/// Read access to the raw historical race tables
#[async_trait]
pub trait RaceDataRepository: Send + Sync {
    /// Seasons, most recent year first
    async fn list_seasons(&self) -> Result<Vec<Season>, StatsError>;
    /// Events of a season year ordered by start date
    async fn list_events(&self, year: i32) -> Result<Vec<Event>, StatsError>;
    async fn get_driver(&self, driver_id: i32) -> Result<Option<Driver>, StatsError>;
    async fn list_drivers(&self) -> Result<Vec<Driver>, StatsError>;
    async fn get_team(&self, team_id: i32) -> Result<Option<Team>, StatsError>;
    async fn list_teams(&self) -> Result<Vec<Team>, StatsError>;
    async fn list_contracts(&self, year: i32) -> Result<Vec<Contract>, StatsError>;
    /// Sessions joined with their event, ordered by event date, session date, then id.
    /// A driver filter keeps the sessions in which that driver has a result.
    async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<SessionInfo>, StatsError>;
    async fn list_results(&self, filter: &SessionFilter) -> Result<Vec<SessionResult>, StatsError>;
    async fn list_grid(&self, filter: &SessionFilter)
        -> Result<Vec<StartingGridEntry>, StatsError>;
    /// Holder of the quickest lap of a session
    async fn fastest_lap(&self, session_id: i32) -> Result<Option<FastestLap>, StatsError>;
}

pub(crate) fn compare_sessions(a: &SessionInfo, b: &SessionInfo) -> std::cmp::Ordering {
    a.event_date
        .cmp(&b.event_date)
        .then_with(|| a.session_date.cmp(&b.session_date))
        .then_with(|| a.session_id.cmp(&b.session_id))
}

/// In-memory implementation of RaceDataRepository backed by a [`Snapshot`]
///
/// The snapshot is never modified after construction, so reads need no locking.
pub struct InMemoryRaceDataRepository {
    snapshot: Snapshot,
    sessions: Vec<SessionInfo>,
}

impl Default for InMemoryRaceDataRepository {
    fn default() -> Self {
        Self::new(Snapshot::default())
    }
}

impl InMemoryRaceDataRepository {
    pub fn new(snapshot: Snapshot) -> Self {
        let mut sessions = snapshot.session_infos();
        sessions.sort_by(compare_sessions);
        Self { snapshot, sessions }
    }

    fn matching_sessions(&self, filter: &SessionFilter) -> HashMap<i32, &SessionInfo> {
        self.sessions
            .iter()
            .filter(|s| filter.matches_session(s))
            .map(|s| (s.session_id, s))
            .collect()
    }
}

#[async_trait]
impl RaceDataRepository for InMemoryRaceDataRepository {
    #[instrument(skip(self))]
    async fn list_seasons(&self) -> Result<Vec<Season>, StatsError> {
        let mut seasons = self.snapshot.seasons.clone();
        seasons.sort_by(|a, b| b.year.cmp(&a.year));

        debug!(count = seasons.len(), "Listed seasons from memory");
        Ok(seasons)
    }

    #[instrument(skip(self))]
    async fn list_events(&self, year: i32) -> Result<Vec<Event>, StatsError> {
        let mut events: Vec<Event> = self
            .snapshot
            .events
            .iter()
            .filter(|e| self.snapshot.season_year(e.season_id) == Some(year))
            .cloned()
            .collect();
        events.sort_by(|a, b| {
            a.date_start
                .cmp(&b.date_start)
                .then_with(|| a.event_id.cmp(&b.event_id))
        });

        debug!(year = year, count = events.len(), "Listed events from memory");
        Ok(events)
    }

    #[instrument(skip(self))]
    async fn get_driver(&self, driver_id: i32) -> Result<Option<Driver>, StatsError> {
        let driver = self.snapshot.driver(driver_id).cloned();
        if driver.is_none() {
            debug!(driver_id = driver_id, "Driver not found in memory");
        }
        Ok(driver)
    }

    #[instrument(skip(self))]
    async fn list_drivers(&self) -> Result<Vec<Driver>, StatsError> {
        Ok(self.snapshot.drivers.clone())
    }

    #[instrument(skip(self))]
    async fn get_team(&self, team_id: i32) -> Result<Option<Team>, StatsError> {
        let team = self.snapshot.team(team_id).cloned();
        if team.is_none() {
            debug!(team_id = team_id, "Team not found in memory");
        }
        Ok(team)
    }

    #[instrument(skip(self))]
    async fn list_teams(&self) -> Result<Vec<Team>, StatsError> {
        Ok(self.snapshot.teams.clone())
    }

    #[instrument(skip(self))]
    async fn list_contracts(&self, year: i32) -> Result<Vec<Contract>, StatsError> {
        let contracts = self.snapshot.contracts_for_year(year);
        debug!(year = year, count = contracts.len(), "Listed contracts from memory");
        Ok(contracts)
    }

    #[instrument(skip(self))]
    async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<SessionInfo>, StatsError> {
        let sessions: Vec<SessionInfo> = self
            .sessions
            .iter()
            .filter(|s| filter.matches_session(s))
            .filter(|s| match filter.driver_id {
                Some(driver_id) => self
                    .snapshot
                    .results
                    .iter()
                    .any(|r| r.session_id == s.session_id && r.driver_id == driver_id),
                None => true,
            })
            .cloned()
            .collect();

        debug!(count = sessions.len(), "Listed sessions from memory");
        Ok(sessions)
    }

    #[instrument(skip(self))]
    async fn list_results(&self, filter: &SessionFilter) -> Result<Vec<SessionResult>, StatsError> {
        let sessions = self.matching_sessions(filter);
        let mut results: Vec<SessionResult> = self
            .snapshot
            .results
            .iter()
            .filter(|r| sessions.contains_key(&r.session_id) && filter.matches_driver(r.driver_id))
            .cloned()
            .collect();
        results.sort_by_key(|r| (r.session_id, r.driver_id));

        debug!(count = results.len(), "Listed results from memory");
        Ok(results)
    }

    #[instrument(skip(self))]
    async fn list_grid(
        &self,
        filter: &SessionFilter,
    ) -> Result<Vec<StartingGridEntry>, StatsError> {
        let sessions = self.matching_sessions(filter);
        let mut grid: Vec<StartingGridEntry> = self
            .snapshot
            .starting_grid
            .iter()
            .filter(|g| sessions.contains_key(&g.session_id) && filter.matches_driver(g.driver_id))
            .cloned()
            .collect();
        grid.sort_by_key(|g| (g.session_id, g.driver_id));

        debug!(count = grid.len(), "Listed grid entries from memory");
        Ok(grid)
    }

    #[instrument(skip(self))]
    async fn fastest_lap(&self, session_id: i32) -> Result<Option<FastestLap>, StatsError> {
        let fastest = self.snapshot.fastest_lap(session_id);
        debug!(
            session_id = session_id,
            driver_id = ?fastest.as_ref().map(|f| f.driver_id),
            "Resolved fastest lap from memory"
        );
        Ok(fastest)
    }
}

const SESSION_INFO_SELECT: &str = "SELECT s.session_id, s.session_name, s.session_type, \
    s.date_start AS session_date, e.event_id, e.gp_name, e.country_name, \
    e.circuit_short_name, e.date_start AS event_date, se.year \
    FROM session s \
    JOIN event e ON e.event_id = s.event_id \
    JOIN season se ON se.season_id = e.season_id \
    WHERE TRUE";

/// PostgreSQL implementation of the raw race data repository
pub struct PostgresRaceDataRepository {
    pool: PgPool,
}

impl PostgresRaceDataRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_session_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &SessionFilter) {
    if let Some(year) = filter.year {
        query.push(" AND se.year = ").push_bind(year);
    }
    if let Some(session_id) = filter.session_id {
        query.push(" AND s.session_id = ").push_bind(session_id);
    }
    if !filter.session_types.is_empty() {
        query
            .push(" AND lower(trim(s.session_type)) = ANY(")
            .push_bind(filter.type_labels())
            .push(")");
    }
}

fn storage_error(e: sqlx::Error, what: &str) -> StatsError {
    warn!(error = %e, "Failed to fetch {} from database", what);
    StatsError::from(e)
}

fn session_info_from_row(row: &PgRow) -> SessionInfo {
    SessionInfo {
        session_id: row.get("session_id"),
        session_name: row.get("session_name"),
        session_type: SessionType::from_label(row.get::<&str, _>("session_type")),
        session_date: row.get("session_date"),
        event_id: row.get("event_id"),
        gp_name: row.get("gp_name"),
        country_name: row.get("country_name"),
        circuit_name: row.get("circuit_short_name"),
        event_date: row.get("event_date"),
        year: row.get("year"),
    }
}

fn driver_from_row(row: &PgRow) -> Driver {
    Driver {
        driver_id: row.get("driver_id"),
        driver_number: row.get("driver_number"),
        code: row.get("code"),
        full_name: row.get("full_name"),
        nationality: row.get("nationality"),
        headshot_url: row.get("headshot_url"),
    }
}

fn team_from_row(row: &PgRow) -> Team {
    Team {
        team_id: row.get("team_id"),
        name: row.get("name"),
        short_name: row.get("short_name"),
        colour_hex: row.get("colour_hex"),
    }
}

#[async_trait]
impl RaceDataRepository for PostgresRaceDataRepository {
    #[instrument(skip(self))]
    async fn list_seasons(&self) -> Result<Vec<Season>, StatsError> {
        debug!("Fetching seasons from database");

        let rows = sqlx::query("SELECT season_id, year, status FROM season ORDER BY year DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error(e, "seasons"))?;

        Ok(rows
            .iter()
            .map(|row| Season {
                season_id: row.get("season_id"),
                year: row.get("year"),
                status: row.get("status"),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_events(&self, year: i32) -> Result<Vec<Event>, StatsError> {
        debug!(year = year, "Fetching events from database");

        let rows = sqlx::query(
            "SELECT e.event_id, e.season_id, e.gp_name, e.country_name, e.circuit_short_name, e.date_start \
             FROM event e JOIN season se ON se.season_id = e.season_id \
             WHERE se.year = $1 ORDER BY e.date_start, e.event_id",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error(e, "events"))?;

        Ok(rows
            .iter()
            .map(|row| Event {
                event_id: row.get("event_id"),
                season_id: row.get("season_id"),
                gp_name: row.get("gp_name"),
                country_name: row.get("country_name"),
                circuit_name: row.get("circuit_short_name"),
                date_start: row.get("date_start"),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn get_driver(&self, driver_id: i32) -> Result<Option<Driver>, StatsError> {
        debug!(driver_id = driver_id, "Fetching driver from database");

        let row = sqlx::query(
            "SELECT driver_id, driver_number, code, full_name, nationality, headshot_url \
             FROM driver WHERE driver_id = $1",
        )
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error(e, "driver"))?;

        Ok(row.as_ref().map(driver_from_row))
    }

    #[instrument(skip(self))]
    async fn list_drivers(&self) -> Result<Vec<Driver>, StatsError> {
        let rows = sqlx::query(
            "SELECT driver_id, driver_number, code, full_name, nationality, headshot_url \
             FROM driver ORDER BY driver_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error(e, "drivers"))?;

        Ok(rows.iter().map(driver_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn get_team(&self, team_id: i32) -> Result<Option<Team>, StatsError> {
        debug!(team_id = team_id, "Fetching team from database");

        let row = sqlx::query(
            "SELECT team_id, name, short_name, colour_hex FROM team WHERE team_id = $1",
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error(e, "team"))?;

        Ok(row.as_ref().map(team_from_row))
    }

    #[instrument(skip(self))]
    async fn list_teams(&self) -> Result<Vec<Team>, StatsError> {
        let rows =
            sqlx::query("SELECT team_id, name, short_name, colour_hex FROM team ORDER BY team_id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| storage_error(e, "teams"))?;

        Ok(rows.iter().map(team_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn list_contracts(&self, year: i32) -> Result<Vec<Contract>, StatsError> {
        debug!(year = year, "Fetching contracts from database");

        let rows = sqlx::query(
            "SELECT c.contract_id, c.driver_id, c.team_id, c.season_id \
             FROM contract c JOIN season se ON se.season_id = c.season_id \
             WHERE se.year = $1 ORDER BY c.contract_id",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error(e, "contracts"))?;

        Ok(rows
            .iter()
            .map(|row| Contract {
                contract_id: row.get("contract_id"),
                driver_id: row.get("driver_id"),
                team_id: row.get("team_id"),
                season_id: row.get("season_id"),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_sessions(&self, filter: &SessionFilter) -> Result<Vec<SessionInfo>, StatsError> {
        let mut query = QueryBuilder::<Postgres>::new(SESSION_INFO_SELECT);
        push_session_filter(&mut query, filter);
        if let Some(driver_id) = filter.driver_id {
            query
                .push(" AND EXISTS (SELECT 1 FROM session_result r WHERE r.session_id = s.session_id AND r.driver_id = ")
                .push_bind(driver_id)
                .push(")");
        }
        query.push(" ORDER BY e.date_start, s.date_start, s.session_id");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error(e, "sessions"))?;

        debug!(count = rows.len(), "Fetched sessions from database");
        Ok(rows.iter().map(session_info_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn list_results(&self, filter: &SessionFilter) -> Result<Vec<SessionResult>, StatsError> {
        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT r.session_id, r.driver_id, r.position, r.number_of_laps, r.gap_to_leader, \
             r.duration, r.dnf, r.dns, r.dsq \
             FROM session_result r \
             JOIN session s ON s.session_id = r.session_id \
             JOIN event e ON e.event_id = s.event_id \
             JOIN season se ON se.season_id = e.season_id \
             WHERE TRUE",
        );
        push_session_filter(&mut query, filter);
        if let Some(driver_id) = filter.driver_id {
            query.push(" AND r.driver_id = ").push_bind(driver_id);
        }
        query.push(" ORDER BY r.session_id, r.driver_id");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error(e, "results"))?;

        debug!(count = rows.len(), "Fetched results from database");
        Ok(rows
            .iter()
            .map(|row| SessionResult {
                session_id: row.get("session_id"),
                driver_id: row.get("driver_id"),
                position: row.get("position"),
                number_of_laps: row.get("number_of_laps"),
                gap_to_leader: row.get("gap_to_leader"),
                duration: row.get("duration"),
                dnf: row.get("dnf"),
                dns: row.get("dns"),
                dsq: row.get("dsq"),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_grid(
        &self,
        filter: &SessionFilter,
    ) -> Result<Vec<StartingGridEntry>, StatsError> {
        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT g.session_id, g.driver_id, g.position \
             FROM starting_grid g \
             JOIN session s ON s.session_id = g.session_id \
             JOIN event e ON e.event_id = s.event_id \
             JOIN season se ON se.season_id = e.season_id \
             WHERE TRUE",
        );
        push_session_filter(&mut query, filter);
        if let Some(driver_id) = filter.driver_id {
            query.push(" AND g.driver_id = ").push_bind(driver_id);
        }
        query.push(" ORDER BY g.session_id, g.driver_id");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error(e, "starting grid"))?;

        Ok(rows
            .iter()
            .map(|row| StartingGridEntry {
                session_id: row.get("session_id"),
                driver_id: row.get("driver_id"),
                position: row.get("position"),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn fastest_lap(&self, session_id: i32) -> Result<Option<FastestLap>, StatsError> {
        debug!(session_id = session_id, "Fetching fastest lap from database");

        let row = sqlx::query(
            "SELECT session_id, driver_id, lap_number, lap_duration FROM lap \
             WHERE session_id = $1 \
               AND lap_duration > '-Infinity'::float8 AND lap_duration < 'Infinity'::float8 \
             ORDER BY lap_duration, lap_number, driver_id \
             LIMIT 1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error(e, "fastest lap"))?;

        Ok(row.map(|row| FastestLap {
            session_id: row.get("session_id"),
            driver_id: row.get("driver_id"),
            lap_number: row.get("lap_number"),
            lap_duration: row.get("lap_duration"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn date(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap()
    }

    fn repository() -> InMemoryRaceDataRepository {
        let snapshot = Snapshot::builder()
            .season(1, 2023)
            .season(2, 2024)
            .team(1, "Red Bull Racing")
            .driver(1, 1, "VER", "Max Verstappen")
            .driver(2, 4, "NOR", "Lando Norris")
            .contract(1, 1, 2)
            .event(20, 2, "Saudi Arabian Grand Prix", date(3, 9))
            .event(10, 2, "Bahrain Grand Prix", date(3, 2))
            .event(5, 1, "Abu Dhabi Grand Prix", date(11, 26))
            .session(201, 20, SessionType::Race)
            .session(101, 10, SessionType::Race)
            .session(100, 10, SessionType::Qualifying)
            .session(50, 5, SessionType::Race)
            .finish(101, 1, 1, 57)
            .finish(101, 2, 2, 57)
            .finish(201, 2, 1, 50)
            .finish(50, 1, 1, 58)
            .grid(101, 1, 1)
            .grid(101, 2, 2)
            .lap(101, 1, 10, 92.1)
            .lap(101, 2, 11, 91.8)
            .build();
        InMemoryRaceDataRepository::new(snapshot)
    }

    #[tokio::test]
    async fn seasons_are_listed_most_recent_first() {
        let seasons = repository().list_seasons().await.unwrap();
        let years: Vec<i32> = seasons.iter().map(|s| s.year).collect();
        assert_eq!(years, vec![2024, 2023]);
    }

    #[tokio::test]
    async fn events_are_ordered_by_date() {
        let events = repository().list_events(2024).await.unwrap();
        let ids: Vec<i32> = events.iter().map(|e| e.event_id).collect();
        assert_eq!(ids, vec![10, 20]);
    }

    #[tokio::test]
    async fn sessions_filter_by_year_and_type() {
        let repo = repository();
        let filter = SessionFilter::for_year(2024).of_types(&[SessionType::Race]);

        let sessions = repo.list_sessions(&filter).await.unwrap();
        let ids: Vec<i32> = sessions.iter().map(|s| s.session_id).collect();
        assert_eq!(ids, vec![101, 201]);
    }

    #[tokio::test]
    async fn sessions_filter_by_driver_participation() {
        let repo = repository();
        let filter = SessionFilter::for_year(2024).driver(1);

        let sessions = repo.list_sessions(&filter).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].session_id, 101);
    }

    #[tokio::test]
    async fn results_respect_driver_and_session_filters() {
        let repo = repository();

        let all_2024 = repo.list_results(&SessionFilter::for_year(2024)).await.unwrap();
        assert_eq!(all_2024.len(), 3);

        let career = repo.list_results(&SessionFilter::all().driver(1)).await.unwrap();
        assert_eq!(career.len(), 2);

        let one_session = repo
            .list_results(&SessionFilter::for_session(101))
            .await
            .unwrap();
        assert!(one_session.iter().all(|r| r.session_id == 101));
    }

    #[tokio::test]
    async fn grid_is_scoped_to_matching_sessions() {
        let repo = repository();
        let grid = repo
            .list_grid(&SessionFilter::all().driver(2))
            .await
            .unwrap();

        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0].position, 2);
    }

    #[tokio::test]
    async fn fastest_lap_resolves_minimum_duration() {
        let repo = repository();

        let fastest = repo.fastest_lap(101).await.unwrap().unwrap();
        assert_eq!(fastest.driver_id, 2);
        assert!(repo.fastest_lap(201).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn contracts_and_lookups() {
        let repo = repository();

        assert_eq!(repo.list_contracts(2024).await.unwrap().len(), 1);
        assert!(repo.list_contracts(2023).await.unwrap().is_empty());
        assert!(repo.get_driver(1).await.unwrap().is_some());
        assert!(repo.get_driver(99).await.unwrap().is_none());
        assert!(repo.get_team(1).await.unwrap().is_some());
    }

    #[test]
    fn type_labels_cover_every_stored_spelling() {
        let filter =
            SessionFilter::all().of_types(&[SessionType::Race, SessionType::SprintQualifying]);

        assert_eq!(
            filter.type_labels(),
            vec!["race", "sprint qualifying", "sprintqualifying", "sprint shootout"]
        );
        assert!(SessionFilter::all().type_labels().is_empty());
    }

    #[test]
    fn session_filter_sql_binds_each_condition() {
        let mut query = QueryBuilder::<Postgres>::new(SESSION_INFO_SELECT);
        push_session_filter(
            &mut query,
            &SessionFilter::for_year(2024).of_types(&[SessionType::Race]),
        );

        assert!(query
            .sql()
            .ends_with("WHERE TRUE AND se.year = $1 AND lower(trim(s.session_type)) = ANY($2)"));
    }

    #[test]
    fn session_filter_sql_is_untouched_when_empty() {
        let mut query = QueryBuilder::<Postgres>::new("SELECT 1 WHERE TRUE");
        push_session_filter(&mut query, &SessionFilter::all().driver(7));
        assert_eq!(query.sql(), "SELECT 1 WHERE TRUE");

        let mut query = QueryBuilder::<Postgres>::new("SELECT 1 WHERE TRUE");
        push_session_filter(&mut query, &SessionFilter::for_session(101));
        assert_eq!(query.sql(), "SELECT 1 WHERE TRUE AND s.session_id = $1");
    }
}
