//! Precomputed statistics, as served by database views.

mod materialized;
mod postgres;

pub use materialized::MaterializedViews;
pub use postgres::PostgresStatsViews;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{
    CareerAggregate, DriverStanding, ResultLine, SessionTypeCounts, StatsError, TeamRaceResult,
};
use crate::data::{Driver, Event, Season, SessionInfo, SessionType, Team};

/// One row of the constructors' table, already ranked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStandingRow {
    pub team: Team,
    pub total_points: i32,
}

/// A contracted driver's Race points for the team, with their place in the team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDriverRow {
    pub team_id: i32,
    pub driver: Driver,
    pub points: i32,
    pub roster_rank: u32,
}

/// Unformatted winner of a Race session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceWinnerRow {
    pub session_id: i32,
    pub gp_name: String,
    pub country_name: String,
    pub date_start: NaiveDateTime,
    pub driver_id: i32,
    pub driver_name: String,
    pub driver_code: String,
    pub team_name: String,
    pub laps: i32,
    pub duration: Option<f64>,
}

/// Read access to precomputed statistics.
///
/// Every aggregate is computed by the store; callers only format.
#[async_trait]
pub trait StatsViews: Send + Sync {
    /// Ranked drivers' championship
    async fn driver_standings(&self, year: i32) -> Result<Vec<DriverStanding>, StatsError>;
    /// Ranked constructors' championship
    async fn team_standings(&self, year: i32) -> Result<Vec<TeamStandingRow>, StatsError>;
    /// The top drivers of every team, ordered by team then roster rank
    async fn team_top_drivers(&self, year: i32) -> Result<Vec<TeamDriverRow>, StatsError>;
    async fn team_race_points(
        &self,
        team_id: i32,
        year: i32,
    ) -> Result<Vec<TeamRaceResult>, StatsError>;
    async fn session_header(&self, session_id: i32) -> Result<Option<SessionInfo>, StatsError>;
    /// Scored result lines of a session in classification order
    async fn session_lines(&self, session_id: i32) -> Result<Vec<ResultLine>, StatsError>;
    async fn race_winners(&self, year: i32) -> Result<Vec<RaceWinnerRow>, StatsError>;
    async fn driver_season_counts(
        &self,
        driver_id: i32,
        year: i32,
        session_type: SessionType,
    ) -> Result<SessionTypeCounts, StatsError>;
    async fn driver_career(&self, driver_id: i32) -> Result<CareerAggregate, StatsError>;
    async fn driver(&self, driver_id: i32) -> Result<Option<Driver>, StatsError>;
    async fn team(&self, team_id: i32) -> Result<Option<Team>, StatsError>;
    async fn team_for_driver(&self, driver_id: i32, year: i32)
        -> Result<Option<Team>, StatsError>;
    /// Drivers holding any contract in `year`, by id
    async fn season_drivers(&self, year: i32) -> Result<Vec<Driver>, StatsError>;
    /// Teams holding any contract in `year`, by id
    async fn season_teams(&self, year: i32) -> Result<Vec<Team>, StatsError>;
    async fn seasons(&self) -> Result<Vec<Season>, StatsError>;
    async fn events(&self, year: i32) -> Result<Vec<Event>, StatsError>;
}
