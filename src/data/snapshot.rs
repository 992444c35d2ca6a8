use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::models::{
    default_season_status, Contract, Driver, Event, FastestLap, Lap, Season, Session, SessionInfo,
    SessionResult, SessionType, StartingGridEntry, Team,
};
use crate::stats::StatsError;

/// Complete copy of the historical race tables held in memory.
///
/// This is the on-disk format of the in-memory store (JSON) and the
/// fixture format used by the test suites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub seasons: Vec<Season>,
    pub events: Vec<Event>,
    pub sessions: Vec<Session>,
    pub drivers: Vec<Driver>,
    pub teams: Vec<Team>,
    pub contracts: Vec<Contract>,
    pub results: Vec<SessionResult>,
    pub starting_grid: Vec<StartingGridEntry>,
    pub laps: Vec<Lap>,
}

impl Snapshot {
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, StatsError> {
        serde_json::from_str(json)
            .map_err(|e| StatsError::Repository(format!("Invalid snapshot: {}", e)))
    }

    #[instrument]
    pub fn from_json_file(path: &Path) -> Result<Self, StatsError> {
        debug!(path = %path.display(), "Loading race data snapshot");

        let contents = std::fs::read_to_string(path).map_err(|e| {
            warn!(error = %e, path = %path.display(), "Failed to read snapshot file");
            StatsError::Repository(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let snapshot = Self::from_json_str(&contents)?;

        debug!(
            sessions = snapshot.sessions.len(),
            results = snapshot.results.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }

    pub fn season_year(&self, season_id: i32) -> Option<i32> {
        self.seasons
            .iter()
            .find(|s| s.season_id == season_id)
            .map(|s| s.year)
    }

    pub fn driver(&self, driver_id: i32) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.driver_id == driver_id)
    }

    pub fn team(&self, team_id: i32) -> Option<&Team> {
        self.teams.iter().find(|t| t.team_id == team_id)
    }

    /// Joins every session to its event and season year.
    /// Sessions whose event or season is missing are dropped.
    pub fn session_infos(&self) -> Vec<SessionInfo> {
        let events: HashMap<i32, &Event> = self.events.iter().map(|e| (e.event_id, e)).collect();
        let years: HashMap<i32, i32> = self
            .seasons
            .iter()
            .map(|s| (s.season_id, s.year))
            .collect();

        self.sessions
            .iter()
            .filter_map(|session| {
                let event = events.get(&session.event_id)?;
                let year = *years.get(&event.season_id)?;
                Some(SessionInfo {
                    session_id: session.session_id,
                    session_name: session.session_name.clone(),
                    session_type: session.session_type,
                    session_date: session.date_start,
                    event_id: event.event_id,
                    gp_name: event.gp_name.clone(),
                    country_name: event.country_name.clone(),
                    circuit_name: event.circuit_name.clone(),
                    event_date: event.date_start,
                    year,
                })
            })
            .collect()
    }

    /// Contracts whose season falls in `year`, ordered by contract id
    pub fn contracts_for_year(&self, year: i32) -> Vec<Contract> {
        let mut contracts: Vec<Contract> = self
            .contracts
            .iter()
            .filter(|c| self.season_year(c.season_id) == Some(year))
            .cloned()
            .collect();
        contracts.sort_by_key(|c| c.contract_id);
        contracts
    }

    pub fn fastest_lap(&self, session_id: i32) -> Option<FastestLap> {
        FastestLap::select(self.laps.iter().filter(|lap| lap.session_id == session_id))
    }
}

/// Incremental construction of a [`Snapshot`], mostly for fixtures.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    pub fn season(mut self, season_id: i32, year: i32) -> Self {
        self.snapshot.seasons.push(Season {
            season_id,
            year,
            status: default_season_status(),
        });
        self
    }

    pub fn team(mut self, team_id: i32, name: &str) -> Self {
        self.snapshot.teams.push(Team {
            team_id,
            name: name.to_string(),
            short_name: None,
            colour_hex: None,
        });
        self
    }

    pub fn driver(mut self, driver_id: i32, number: i32, code: &str, full_name: &str) -> Self {
        self.snapshot.drivers.push(Driver {
            driver_id,
            driver_number: number,
            code: code.to_string(),
            full_name: full_name.to_string(),
            nationality: None,
            headshot_url: None,
        });
        self
    }

    pub fn contract(mut self, driver_id: i32, team_id: i32, season_id: i32) -> Self {
        let contract_id = self.snapshot.contracts.len() as i32 + 1;
        self.snapshot.contracts.push(Contract {
            contract_id,
            driver_id,
            team_id,
            season_id,
        });
        self
    }

    pub fn event(mut self, event_id: i32, season_id: i32, gp_name: &str, date: NaiveDateTime) -> Self {
        self.snapshot.events.push(Event {
            event_id,
            season_id,
            gp_name: gp_name.to_string(),
            country_name: gp_name.replace(" Grand Prix", ""),
            circuit_name: None,
            date_start: date,
        });
        self
    }

    pub fn session(mut self, session_id: i32, event_id: i32, session_type: SessionType) -> Self {
        let date_start = self
            .snapshot
            .events
            .iter()
            .find(|e| e.event_id == event_id)
            .map(|e| e.date_start)
            .unwrap_or_default();
        self.snapshot.sessions.push(Session {
            session_id,
            event_id,
            session_name: session_type.to_string(),
            session_type,
            date_start,
        });
        self
    }

    pub fn result(mut self, result: SessionResult) -> Self {
        self.snapshot.results.push(result);
        self
    }

    /// Classified finisher with the given position and lap count
    pub fn finish(self, session_id: i32, driver_id: i32, position: i32, laps: i32) -> Self {
        self.result(SessionResult {
            session_id,
            driver_id,
            position: Some(position),
            number_of_laps: laps,
            gap_to_leader: None,
            duration: None,
            dnf: false,
            dns: false,
            dsq: false,
        })
    }

    pub fn retirement(self, session_id: i32, driver_id: i32, laps: i32) -> Self {
        self.result(SessionResult {
            session_id,
            driver_id,
            position: None,
            number_of_laps: laps,
            gap_to_leader: None,
            duration: None,
            dnf: true,
            dns: false,
            dsq: false,
        })
    }

    pub fn grid(mut self, session_id: i32, driver_id: i32, position: i32) -> Self {
        self.snapshot.starting_grid.push(StartingGridEntry {
            session_id,
            driver_id,
            position,
        });
        self
    }

    pub fn lap(mut self, session_id: i32, driver_id: i32, lap_number: i32, duration: f64) -> Self {
        self.snapshot.laps.push(Lap {
            session_id,
            driver_id,
            lap_number,
            lap_duration: Some(duration),
        });
        self
    }

    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}
