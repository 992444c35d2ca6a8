use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::{debug, instrument, warn};

use super::{RaceWinnerRow, StatsViews, TeamDriverRow, TeamStandingRow};
use crate::data::{Driver, Event, Season, SessionInfo, SessionResult, SessionType, Team};
use crate::stats::{
    CareerAggregate, DriverStanding, PositionRecord, ResultLine, SessionTypeCounts, StatsError,
    TeamRaceResult,
};

/// Statistics views backed by `sql/stats_views.sql`
pub struct PostgresStatsViews {
    pool: PgPool,
}

impl PostgresStatsViews {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn view_error(e: sqlx::Error, view: &str) -> StatsError {
    warn!(error = %e, view = view, "Failed to read statistics view");
    StatsError::from(e)
}

/// SQL `COUNT` and `ROW_NUMBER` come back as BIGINT
fn count(row: &PgRow, column: &str) -> u32 {
    u32::try_from(row.get::<i64, _>(column)).unwrap_or(u32::MAX)
}

fn team_from_row(row: &PgRow) -> Team {
    Team {
        team_id: row.get("team_id"),
        name: row.get("name"),
        short_name: row.get("short_name"),
        colour_hex: row.get("colour_hex"),
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

fn position_record(row: &PgRow, position: &str, occurrences: &str) -> Option<PositionRecord> {
    row.get::<Option<i32>, _>(position)
        .map(|position| PositionRecord {
            position,
            count: count(row, occurrences),
        })
}

#[async_trait]
impl StatsViews for PostgresStatsViews {
    #[instrument(skip(self))]
    async fn driver_standings(&self, year: i32) -> Result<Vec<DriverStanding>, StatsError> {
        let rows = sqlx::query(
            "SELECT year, driver_id, full_name, code, total_points, total_wins, championship_position \
             FROM vw_driver_standings WHERE year = $1 ORDER BY championship_position",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| view_error(e, "vw_driver_standings"))?;

        debug!(year = year, rows = rows.len(), "Read driver standings view");
        Ok(rows
            .iter()
            .map(|row| DriverStanding {
                year: row.get("year"),
                driver_id: row.get("driver_id"),
                full_name: row.get("full_name"),
                code: row.get("code"),
                total_points: row.get("total_points"),
                total_wins: count(row, "total_wins"),
                championship_position: count(row, "championship_position"),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn team_standings(&self, year: i32) -> Result<Vec<TeamStandingRow>, StatsError> {
        let rows = sqlx::query(
            "SELECT team_id, name, short_name, colour_hex, total_points \
             FROM vw_team_standings WHERE year = $1 ORDER BY total_points DESC, team_id",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| view_error(e, "vw_team_standings"))?;

        Ok(rows
            .iter()
            .map(|row| TeamStandingRow {
                team: team_from_row(row),
                total_points: row.get("total_points"),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn team_top_drivers(&self, year: i32) -> Result<Vec<TeamDriverRow>, StatsError> {
        let rows = sqlx::query(
            "SELECT team_id, driver_id, driver_number, code, full_name, nationality, headshot_url, \
                    points, roster_rank \
             FROM vw_team_top_drivers WHERE year = $1 ORDER BY team_id, roster_rank",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| view_error(e, "vw_team_top_drivers"))?;

        Ok(rows
            .iter()
            .map(|row| TeamDriverRow {
                team_id: row.get("team_id"),
                driver: Driver {
                    driver_id: row.get("driver_id"),
                    driver_number: row.get("driver_number"),
                    code: row.get("code"),
                    full_name: row.get("full_name"),
                    nationality: row.get("nationality"),
                    headshot_url: row.get("headshot_url"),
                },
                points: row.get("points"),
                roster_rank: count(row, "roster_rank"),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn team_race_points(
        &self,
        team_id: i32,
        year: i32,
    ) -> Result<Vec<TeamRaceResult>, StatsError> {
        let rows = sqlx::query(
            "SELECT session_id, gp_name, event_date, points FROM vw_team_race_points \
             WHERE team_id = $1 AND year = $2 ORDER BY event_date, session_date, session_id",
        )
        .bind(team_id)
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| view_error(e, "vw_team_race_points"))?;

        Ok(rows
            .iter()
            .map(|row| TeamRaceResult {
                session_id: row.get("session_id"),
                gp_name: row.get("gp_name"),
                date: row.get("event_date"),
                points: row.get("points"),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn session_header(&self, session_id: i32) -> Result<Option<SessionInfo>, StatsError> {
        let row = sqlx::query(
            "SELECT session_id, session_name, session_type, session_date, event_id, gp_name, \
                    country_name, circuit_short_name, event_date, year \
             FROM vw_session_info WHERE session_id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| view_error(e, "vw_session_info"))?;

        Ok(row.map(|row| SessionInfo {
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
        }))
    }

    #[instrument(skip(self))]
    async fn session_lines(&self, session_id: i32) -> Result<Vec<ResultLine>, StatsError> {
        let rows = sqlx::query(
            "SELECT session_id, driver_id, position, number_of_laps, gap_to_leader, duration, \
                    dnf, dns, dsq, driver_number, driver_name, driver_code, team_name, points \
             FROM vw_session_lines WHERE session_id = $1 \
             ORDER BY retired, \
                      CASE WHEN retired THEN number_of_laps ELSE 0 END DESC, \
                      position NULLS LAST, driver_id",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| view_error(e, "vw_session_lines"))?;

        debug!(session_id = session_id, rows = rows.len(), "Read session lines view");
        Ok(rows
            .iter()
            .map(|row| ResultLine {
                result: SessionResult {
                    session_id: row.get("session_id"),
                    driver_id: row.get("driver_id"),
                    position: row.get("position"),
                    number_of_laps: row.get("number_of_laps"),
                    gap_to_leader: row.get("gap_to_leader"),
                    duration: row.get("duration"),
                    dnf: row.get("dnf"),
                    dns: row.get("dns"),
                    dsq: row.get("dsq"),
                },
                driver_number: row.get("driver_number"),
                driver_name: row.get("driver_name"),
                driver_code: row.get("driver_code"),
                team_name: row.get("team_name"),
                points: row.get("points"),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn race_winners(&self, year: i32) -> Result<Vec<RaceWinnerRow>, StatsError> {
        let rows = sqlx::query(
            "SELECT session_id, gp_name, country_name, event_date, driver_id, driver_name, \
                    driver_code, team_name, laps, duration \
             FROM vw_race_winners WHERE year = $1 \
             ORDER BY event_date, session_date, session_id",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| view_error(e, "vw_race_winners"))?;

        Ok(rows
            .iter()
            .map(|row| RaceWinnerRow {
                session_id: row.get("session_id"),
                gp_name: row.get("gp_name"),
                country_name: row.get("country_name"),
                date_start: row.get("event_date"),
                driver_id: row.get("driver_id"),
                driver_name: row.get("driver_name"),
                driver_code: row.get("driver_code"),
                team_name: row.get("team_name"),
                laps: row.get("laps"),
                duration: row.get("duration"),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn driver_season_counts(
        &self,
        driver_id: i32,
        year: i32,
        session_type: SessionType,
    ) -> Result<SessionTypeCounts, StatsError> {
        let categories: Vec<String> = session_type
            .labels()
            .iter()
            .map(|label| label.to_string())
            .collect();

        let row = sqlx::query("SELECT * FROM fn_driver_season_counts($1, $2, $3)")
            .bind(driver_id)
            .bind(year)
            .bind(categories)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| view_error(e, "fn_driver_season_counts"))?;

        Ok(SessionTypeCounts {
            entered: count(&row, "entered"),
            points: row.get("points"),
            wins: count(&row, "wins"),
            podiums: count(&row, "podiums"),
            top10s: count(&row, "top10s"),
            dnfs: count(&row, "dnfs"),
            poles: count(&row, "poles"),
            fastest_laps: count(&row, "fastest_laps"),
        })
    }

    #[instrument(skip(self))]
    async fn driver_career(&self, driver_id: i32) -> Result<CareerAggregate, StatsError> {
        let row = sqlx::query("SELECT * FROM fn_driver_career($1)")
            .bind(driver_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| view_error(e, "fn_driver_career"))?;

        Ok(CareerAggregate {
            driver_id,
            entered: count(&row, "entered"),
            podiums: count(&row, "podiums"),
            highest_finish: position_record(&row, "highest_finish", "highest_finish_count"),
            highest_grid: position_record(&row, "highest_grid", "highest_grid_count"),
            poles: count(&row, "poles"),
            points: row.get("points"),
        })
    }

    #[instrument(skip(self))]
    async fn driver(&self, driver_id: i32) -> Result<Option<Driver>, StatsError> {
        let row = sqlx::query(
            "SELECT driver_id, driver_number, code, full_name, nationality, headshot_url \
             FROM driver WHERE driver_id = $1",
        )
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| view_error(e, "driver"))?;

        Ok(row.as_ref().map(driver_from_row))
    }

    #[instrument(skip(self))]
    async fn team(&self, team_id: i32) -> Result<Option<Team>, StatsError> {
        let row = sqlx::query(
            "SELECT team_id, name, short_name, colour_hex FROM team WHERE team_id = $1",
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| view_error(e, "team"))?;

        Ok(row.as_ref().map(team_from_row))
    }

    #[instrument(skip(self))]
    async fn team_for_driver(
        &self,
        driver_id: i32,
        year: i32,
    ) -> Result<Option<Team>, StatsError> {
        let row = sqlx::query(
            "SELECT t.team_id, t.name, t.short_name, t.colour_hex \
             FROM vw_team_assignment ta JOIN team t ON t.team_id = ta.team_id \
             WHERE ta.driver_id = $1 AND ta.year = $2",
        )
        .bind(driver_id)
        .bind(year)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| view_error(e, "vw_team_assignment"))?;

        Ok(row.as_ref().map(team_from_row))
    }

    #[instrument(skip(self))]
    async fn season_drivers(&self, year: i32) -> Result<Vec<Driver>, StatsError> {
        let rows = sqlx::query(
            "SELECT driver_id, driver_number, code, full_name, nationality, headshot_url \
             FROM vw_season_drivers WHERE year = $1 ORDER BY driver_id",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| view_error(e, "vw_season_drivers"))?;

        debug!(year = year, drivers = rows.len(), "Read season drivers");
        Ok(rows.iter().map(driver_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn season_teams(&self, year: i32) -> Result<Vec<Team>, StatsError> {
        let rows = sqlx::query(
            "SELECT team_id, name, short_name, colour_hex \
             FROM vw_season_teams WHERE year = $1 ORDER BY team_id",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| view_error(e, "vw_season_teams"))?;

        debug!(year = year, teams = rows.len(), "Read season teams");
        Ok(rows.iter().map(team_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn seasons(&self) -> Result<Vec<Season>, StatsError> {
        let rows = sqlx::query("SELECT season_id, year, status FROM season ORDER BY year DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| view_error(e, "season"))?;

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
    async fn events(&self, year: i32) -> Result<Vec<Event>, StatsError> {
        let rows = sqlx::query(
            "SELECT e.event_id, e.season_id, e.gp_name, e.country_name, e.circuit_short_name, e.date_start \
             FROM event e JOIN season se ON se.season_id = e.season_id \
             WHERE se.year = $1 ORDER BY e.date_start, e.event_id",
        )
        .bind(year)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| view_error(e, "event"))?;

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
}
