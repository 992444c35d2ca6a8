use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Kind of track activity a session represents.
///
/// Only `Race` and `Sprint` sessions award points.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum SessionType {
    Race,
    Sprint,
    Qualifying,
    #[strum(
        to_string = "Sprint Qualifying",
        serialize = "SprintQualifying",
        serialize = "Sprint Shootout"
    )]
    SprintQualifying,
    #[strum(
        to_string = "Practice",
        serialize = "Practice 1",
        serialize = "Practice 2",
        serialize = "Practice 3"
    )]
    Practice,
    Other,
}

impl SessionType {
    /// Parses a stored session label, falling back to `Other` for anything unrecognised
    pub fn from_label(label: &str) -> Self {
        label.trim().parse().unwrap_or(SessionType::Other)
    }

    /// Sessions whose results count towards standings
    pub fn awards_points(self) -> bool {
        matches!(self, SessionType::Race | SessionType::Sprint)
    }

    /// Lowercased stored spellings that parse to this type
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            SessionType::Race => &["race"],
            SessionType::Sprint => &["sprint"],
            SessionType::Qualifying => &["qualifying"],
            SessionType::SprintQualifying => {
                &["sprint qualifying", "sprintqualifying", "sprint shootout"]
            }
            SessionType::Practice => &["practice", "practice 1", "practice 2", "practice 3"],
            SessionType::Other => &["other"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub season_id: i32,
    pub year: i32,
    #[serde(default = "default_season_status")]
    pub status: String,
}

pub(crate) fn default_season_status() -> String {
    "active".to_string()
}

/// A Grand Prix weekend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: i32,
    pub season_id: i32,
    pub gp_name: String,
    pub country_name: String,
    #[serde(default)]
    pub circuit_name: Option<String>,
    pub date_start: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: i32,
    pub event_id: i32,
    pub session_name: String,
    pub session_type: SessionType,
    pub date_start: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub driver_id: i32,
    pub driver_number: i32,
    pub code: String,
    pub full_name: String,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub headshot_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: i32,
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub colour_hex: Option<String>,
}

/// A driver's team affiliation for one season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub contract_id: i32,
    pub driver_id: i32,
    pub team_id: i32,
    pub season_id: i32,
}

/// Recorded outcome of one driver in one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub session_id: i32,
    pub driver_id: i32,
    #[serde(default)]
    pub position: Option<i32>,
    pub number_of_laps: i32,
    /// Seconds behind the winner, stored as text
    #[serde(default)]
    pub gap_to_leader: Option<String>,
    /// Total race time in seconds, recorded for the winner
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub dnf: bool,
    #[serde(default)]
    pub dns: bool,
    #[serde(default)]
    pub dsq: bool,
}

impl SessionResult {
    /// True when the result carries a DNF, DNS or DSQ flag
    pub fn is_retired(&self) -> bool {
        self.dnf || self.dns || self.dsq
    }

    pub fn status_label(&self) -> Option<&'static str> {
        if self.dnf {
            Some("DNF")
        } else if self.dns {
            Some("DNS")
        } else if self.dsq {
            Some("DSQ")
        } else {
            None
        }
    }

    /// Finishing position when it lies within `1..=limit`
    pub fn finished_within(&self, limit: i32) -> bool {
        matches!(self.position, Some(p) if (1..=limit).contains(&p))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingGridEntry {
    pub session_id: i32,
    pub driver_id: i32,
    pub position: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    pub session_id: i32,
    pub driver_id: i32,
    pub lap_number: i32,
    #[serde(default)]
    pub lap_duration: Option<f64>,
}

/// Holder of the quickest single lap of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastestLap {
    pub session_id: i32,
    pub driver_id: i32,
    pub lap_number: i32,
    pub lap_duration: f64,
}

impl FastestLap {
    /// Picks the quickest lap; equal durations go to the earlier lap, then the lower driver id.
    pub fn select<'a>(laps: impl IntoIterator<Item = &'a Lap>) -> Option<Self> {
        laps.into_iter()
            .filter_map(|lap| {
                lap.lap_duration
                    .filter(|d| d.is_finite())
                    .map(|duration| FastestLap {
                        session_id: lap.session_id,
                        driver_id: lap.driver_id,
                        lap_number: lap.lap_number,
                        lap_duration: duration,
                    })
            })
            .min_by(|a, b| {
                a.lap_duration
                    .total_cmp(&b.lap_duration)
                    .then_with(|| a.lap_number.cmp(&b.lap_number))
                    .then_with(|| a.driver_id.cmp(&b.driver_id))
            })
    }
}

/// A session joined with its event and the season year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: i32,
    pub session_name: String,
    pub session_type: SessionType,
    pub session_date: NaiveDateTime,
    pub event_id: i32,
    pub gp_name: String,
    pub country_name: String,
    pub circuit_name: Option<String>,
    pub event_date: NaiveDateTime,
    pub year: i32,
}
