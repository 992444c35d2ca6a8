//! Season folds over scored results.
//!
//! Everything here is pure: callers fetch rows, score them once with a
//! [`PointsScorer`] and pass the scored rows in.

use std::collections::{BTreeMap, HashMap};

use super::{
    ranking::{rank_drivers, rank_teams, top_drivers, ROSTER_SIZE},
    DriverStanding, PointsBreakdown, PointsScorer, SessionTypeCounts, TeamAggregate, TeamDriver,
    TeamRaceResult,
};
use crate::data::{
    Contract, Driver, SessionInfo, SessionResult, SessionType, StartingGridEntry, Team,
};

const PODIUM: i32 = 3;
const TOP_TEN: i32 = 10;

/// A result together with its session and the points it earned
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResult {
    pub session: SessionInfo,
    pub result: SessionResult,
    pub points: PointsBreakdown,
    pub holds_fastest_lap: bool,
}

impl ScoredResult {
    pub fn session_type(&self) -> SessionType {
        self.session.session_type
    }

    pub fn driver_id(&self) -> i32 {
        self.result.driver_id
    }
}

/// Scores each result against its session.
///
/// `fastest_laps` maps session id to the driver holding that session's
/// fastest lap. Results of sessions missing from `sessions` are dropped.
pub fn score_results(
    scorer: &PointsScorer,
    sessions: &[SessionInfo],
    results: Vec<SessionResult>,
    fastest_laps: &HashMap<i32, i32>,
) -> Vec<ScoredResult> {
    let sessions: HashMap<i32, &SessionInfo> =
        sessions.iter().map(|s| (s.session_id, s)).collect();

    results
        .into_iter()
        .filter_map(|result| {
            let session = *sessions.get(&result.session_id)?;
            let fastest_driver = fastest_laps.get(&session.session_id).copied();
            let points = scorer.score(&result, session.session_type, fastest_driver);
            Some(ScoredResult {
                session: session.clone(),
                holds_fastest_lap: session.session_type == SessionType::Race
                    && fastest_driver == Some(result.driver_id),
                points,
                result,
            })
        })
        .collect()
}

/// Drivers' championship for `year`, ranked.
///
/// Only Race and Sprint rows count. Drivers without a driver record are left out.
pub fn driver_standings(
    year: i32,
    scored: &[ScoredResult],
    drivers: &[Driver],
) -> Vec<DriverStanding> {
    let mut tallies: BTreeMap<i32, (i32, u32)> = BTreeMap::new();

    for row in scored
        .iter()
        .filter(|r| r.session.year == year && r.session_type().awards_points())
    {
        let tally = tallies.entry(row.driver_id()).or_default();
        tally.0 += row.points.total_points;
        if row.session_type() == SessionType::Race && row.result.position == Some(1) {
            tally.1 += 1;
        }
    }

    let drivers: HashMap<i32, &Driver> = drivers.iter().map(|d| (d.driver_id, d)).collect();
    let standings = tallies
        .into_iter()
        .filter_map(|(driver_id, (points, wins))| {
            let driver = drivers.get(&driver_id)?;
            Some(DriverStanding {
                year,
                driver_id,
                full_name: driver.full_name.clone(),
                code: driver.code.clone(),
                total_points: points,
                total_wins: wins,
                championship_position: 0,
            })
        })
        .collect();

    rank_drivers(standings)
}

/// Counters for one driver across the sessions of one type.
///
/// `grid` may hold entries of any session type; only those of sessions
/// found in `sessions` with the requested type are counted.
pub fn session_type_counts(
    driver_id: i32,
    session_type: SessionType,
    scored: &[ScoredResult],
    sessions: &[SessionInfo],
    grid: &[StartingGridEntry],
) -> SessionTypeCounts {
    let mut counts = SessionTypeCounts::default();

    for row in scored
        .iter()
        .filter(|r| r.driver_id() == driver_id && r.session_type() == session_type)
    {
        counts.entered += 1;
        counts.points += row.points.total_points;
        if row.result.position == Some(1) {
            counts.wins += 1;
        }
        if row.result.finished_within(PODIUM) {
            counts.podiums += 1;
        }
        if row.result.finished_within(TOP_TEN) {
            counts.top10s += 1;
        }
        if row.result.dnf {
            counts.dnfs += 1;
        }
        if row.holds_fastest_lap {
            counts.fastest_laps += 1;
        }
    }

    let session_types: HashMap<i32, SessionType> = sessions
        .iter()
        .map(|s| (s.session_id, s.session_type))
        .collect();
    counts.poles = grid
        .iter()
        .filter(|g| {
            g.driver_id == driver_id
                && g.position == 1
                && session_types.get(&g.session_id) == Some(&session_type)
        })
        .count() as u32;

    counts
}

/// Team of each driver for the contracts of one season; the lowest contract id wins
pub fn team_by_driver(contracts: &[Contract]) -> HashMap<i32, i32> {
    let mut ordered: Vec<&Contract> = contracts.iter().collect();
    ordered.sort_by_key(|c| c.contract_id);

    let mut teams = HashMap::new();
    for contract in ordered {
        teams.entry(contract.driver_id).or_insert(contract.team_id);
    }
    teams
}

/// Constructors' championship for `year` over the Race rows in `scored`.
///
/// `contracts` are the contracts of that year. Every team holding one is
/// listed, even without points. Team totals include the fastest-lap bonus;
/// the roster is ranked on table points alone.
pub fn team_standings(
    year: i32,
    scored: &[ScoredResult],
    contracts: &[Contract],
    teams: &[Team],
    drivers: &[Driver],
) -> Vec<TeamAggregate> {
    let team_of = team_by_driver(contracts);

    // driver -> (points with bonus, table points)
    let mut driver_points: HashMap<i32, (i32, i32)> = HashMap::new();
    for row in scored
        .iter()
        .filter(|r| r.session.year == year && r.session_type() == SessionType::Race)
    {
        if team_of.contains_key(&row.driver_id()) {
            let points = driver_points.entry(row.driver_id()).or_default();
            points.0 += row.points.total_points;
            points.1 += row.points.base_points;
        }
    }

    let drivers: HashMap<i32, &Driver> = drivers.iter().map(|d| (d.driver_id, d)).collect();
    let mut aggregates: BTreeMap<i32, (i32, Vec<TeamDriver>)> = BTreeMap::new();
    for (driver_id, team_id) in &team_of {
        let (total_points, base_points) = driver_points.get(driver_id).copied().unwrap_or_default();
        let entry = aggregates.entry(*team_id).or_default();
        entry.0 += total_points;
        if let Some(driver) = drivers.get(driver_id) {
            entry.1.push(TeamDriver {
                driver: (*driver).clone(),
                points: base_points,
            });
        }
    }

    let teams: HashMap<i32, &Team> = teams.iter().map(|t| (t.team_id, t)).collect();
    let aggregates = aggregates
        .into_iter()
        .filter_map(|(team_id, (total_points, roster))| {
            let team = teams.get(&team_id)?;
            Some(TeamAggregate {
                team: (*team).clone(),
                total_points,
                top_drivers: top_drivers(roster, ROSTER_SIZE),
            })
        })
        .collect();

    rank_teams(aggregates)
}

/// Points one team scored in each Race session where its drivers took part
pub fn team_race_results(
    team_id: i32,
    year: i32,
    scored: &[ScoredResult],
    contracts: &[Contract],
) -> Vec<TeamRaceResult> {
    let team_of = team_by_driver(contracts);

    let mut races: Vec<TeamRaceResult> = Vec::new();
    let mut index: HashMap<i32, usize> = HashMap::new();
    let mut rows: Vec<&ScoredResult> = scored
        .iter()
        .filter(|r| {
            r.session.year == year
                && r.session_type() == SessionType::Race
                && team_of.get(&r.driver_id()) == Some(&team_id)
        })
        .collect();
    rows.sort_by(|a, b| crate::data::repository::compare_sessions(&a.session, &b.session));

    for row in rows {
        let slot = *index.entry(row.session.session_id).or_insert_with(|| {
            races.push(TeamRaceResult {
                session_id: row.session.session_id,
                gp_name: row.session.gp_name.clone(),
                date: row.session.event_date,
                points: 0,
            });
            races.len() - 1
        });
        races[slot].points += row.points.total_points;
    }

    races
}
