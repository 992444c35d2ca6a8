use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::data::{Driver, SessionResult, SessionType, Team};

/// A driver's place in the championship for one year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverStanding {
    pub year: i32,
    pub driver_id: i32,
    pub full_name: String,
    pub code: String,
    pub total_points: i32,
    pub total_wins: u32,
    pub championship_position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDriver {
    pub driver: Driver,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAggregate {
    pub team: Team,
    pub total_points: i32,
    pub top_drivers: Vec<TeamDriver>,
}

/// Per-session-type counters for one driver in one year
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTypeCounts {
    pub entered: u32,
    pub points: i32,
    pub wins: u32,
    pub podiums: u32,
    pub top10s: u32,
    pub dnfs: u32,
    pub poles: u32,
    pub fastest_laps: u32,
}

/// Best position achieved and how many times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub position: i32,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerAggregate {
    pub driver_id: i32,
    pub entered: u32,
    pub podiums: u32,
    pub highest_finish: Option<PositionRecord>,
    pub highest_grid: Option<PositionRecord>,
    pub poles: u32,
    pub points: i32,
}

/// Season and career figures for one driver, as shown on a driver page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonAggregate {
    pub driver: Driver,
    pub team: Option<Team>,
    pub year: i32,
    pub season_position: Option<u32>,
    pub season_points: i32,
    pub grand_prix: SessionTypeCounts,
    pub sprint: SessionTypeCounts,
    pub career: CareerAggregate,
}

/// Display-ready row of a session classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedResult {
    pub position: Option<i32>,
    pub driver_id: i32,
    pub driver_number: i32,
    pub driver_name: String,
    pub driver_code: String,
    pub team_name: String,
    pub laps: i32,
    pub time_or_status: String,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceDetails {
    pub session_id: i32,
    pub session_type: SessionType,
    pub gp_name: String,
    pub circuit_name: String,
    pub date_start: NaiveDateTime,
    pub results: Vec<FormattedResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceWinner {
    pub session_id: i32,
    pub gp_name: String,
    pub country_name: String,
    pub date_start: NaiveDateTime,
    pub driver_id: i32,
    pub driver_name: String,
    pub driver_code: String,
    pub team_name: String,
    pub laps: i32,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRaceResult {
    pub session_id: i32,
    pub gp_name: String,
    pub date: NaiveDateTime,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSeasonDetails {
    pub team: Team,
    pub year: i32,
    pub races: Vec<TeamRaceResult>,
}

/// Points awarded to one result: the table value and the value after bonuses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsBreakdown {
    pub base_points: i32,
    pub total_points: i32,
}

/// A session result joined with the driver and team it is shown with.
///
/// Both backends produce these before formatting; `points` is already
/// the scored total for the session category.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultLine {
    pub result: SessionResult,
    pub driver_number: i32,
    pub driver_name: String,
    pub driver_code: String,
    pub team_name: String,
    pub points: i32,
}
