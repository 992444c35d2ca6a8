use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, instrument};

use super::{RaceWinnerRow, StatsViews, TeamDriverRow, TeamStandingRow};
use crate::data::{
    repository::compare_sessions, Contract, Driver, Event, Lap, Season, SessionInfo,
    SessionResult, SessionType, Snapshot, Team,
};
use crate::stats::{
    calculators::{earns_fastest_lap_bonus, points_for},
    career::best_position,
    format::{compare_results, team_display_name, UNKNOWN_TEAM},
    ranking::{rank_drivers, rank_teams, top_drivers, ROSTER_SIZE},
    CareerAggregate, DriverStanding, ResultLine, SessionTypeCounts, StatsError, TeamAggregate,
    TeamDriver, TeamRaceResult,
};

/// One row of the scored-results relation
struct ScoredRow<'a> {
    session: &'a SessionInfo,
    result: &'a SessionResult,
    base_points: i32,
    total_points: i32,
    holds_fastest_lap: bool,
}

/// Per-driver career accumulator
#[derive(Default)]
struct CareerTally {
    race_positions: Vec<i32>,
    entered: u32,
    podiums: u32,
    points: i32,
    grid_positions: Vec<i32>,
}

/// In-memory stand-in for the statistics views.
///
/// Every relation is computed once from a [`Snapshot`] when the views are
/// refreshed; reads are plain lookups afterwards.
pub struct MaterializedViews {
    seasons: Vec<Season>,
    events: HashMap<i32, Vec<Event>>,
    drivers: HashMap<i32, Driver>,
    teams: HashMap<i32, Team>,
    assignments: HashMap<(i32, i32), i32>,
    season_drivers: HashMap<i32, Vec<Driver>>,
    season_teams: HashMap<i32, Vec<Team>>,
    sessions: HashMap<i32, SessionInfo>,
    driver_standings: HashMap<i32, Vec<DriverStanding>>,
    team_standings: HashMap<i32, Vec<TeamStandingRow>>,
    team_top_drivers: HashMap<i32, Vec<TeamDriverRow>>,
    team_race_points: HashMap<(i32, i32), Vec<TeamRaceResult>>,
    session_lines: HashMap<i32, Vec<ResultLine>>,
    race_winners: HashMap<i32, Vec<RaceWinnerRow>>,
    season_counts: HashMap<(i32, i32, SessionType), SessionTypeCounts>,
    careers: HashMap<i32, CareerAggregate>,
}

/// Quickest timed lap of every session
fn fastest_lap_holders(laps: &[Lap]) -> HashMap<i32, i32> {
    let mut quickest: HashMap<i32, (f64, i32, i32)> = HashMap::new();

    for lap in laps {
        let Some(duration) = lap.lap_duration.filter(|d| d.is_finite()) else {
            continue;
        };
        let candidate = (duration, lap.lap_number, lap.driver_id);
        quickest
            .entry(lap.session_id)
            .and_modify(|best| {
                let better = candidate
                    .0
                    .total_cmp(&best.0)
                    .then_with(|| candidate.1.cmp(&best.1))
                    .then_with(|| candidate.2.cmp(&best.2))
                    .is_lt();
                if better {
                    *best = candidate;
                }
            })
            .or_insert(candidate);
    }

    quickest
        .into_iter()
        .map(|(session_id, (_, _, driver_id))| (session_id, driver_id))
        .collect()
}

impl MaterializedViews {
    #[instrument(skip_all)]
    pub fn refresh(snapshot: &Snapshot) -> Self {
        let years: HashMap<i32, i32> = snapshot
            .seasons
            .iter()
            .map(|s| (s.season_id, s.year))
            .collect();

        let mut seasons = snapshot.seasons.clone();
        seasons.sort_by(|a, b| b.year.cmp(&a.year));

        let mut events: HashMap<i32, Vec<Event>> = HashMap::new();
        for event in &snapshot.events {
            if let Some(year) = years.get(&event.season_id) {
                events.entry(*year).or_default().push(event.clone());
            }
        }
        for list in events.values_mut() {
            list.sort_by(|a, b| {
                a.date_start
                    .cmp(&b.date_start)
                    .then_with(|| a.event_id.cmp(&b.event_id))
            });
        }

        let drivers: HashMap<i32, Driver> = snapshot
            .drivers
            .iter()
            .map(|d| (d.driver_id, d.clone()))
            .collect();
        let teams: HashMap<i32, Team> = snapshot
            .teams
            .iter()
            .map(|t| (t.team_id, t.clone()))
            .collect();

        // (driver, year) -> team, lowest contract id wins
        let mut contracts: Vec<&Contract> = snapshot.contracts.iter().collect();
        contracts.sort_by_key(|c| c.contract_id);
        let mut assignments: HashMap<(i32, i32), i32> = HashMap::new();
        for contract in contracts {
            if let Some(year) = years.get(&contract.season_id) {
                assignments
                    .entry((contract.driver_id, *year))
                    .or_insert(contract.team_id);
            }
        }

        let mut contracted: BTreeMap<i32, (BTreeSet<i32>, BTreeSet<i32>)> = BTreeMap::new();
        for contract in &snapshot.contracts {
            if let Some(year) = years.get(&contract.season_id) {
                let entry = contracted.entry(*year).or_default();
                entry.0.insert(contract.driver_id);
                entry.1.insert(contract.team_id);
            }
        }
        let mut season_drivers: HashMap<i32, Vec<Driver>> = HashMap::new();
        let mut season_teams: HashMap<i32, Vec<Team>> = HashMap::new();
        for (year, (driver_ids, team_ids)) in contracted {
            season_drivers.insert(
                year,
                driver_ids.iter().filter_map(|id| drivers.get(id).cloned()).collect(),
            );
            season_teams.insert(
                year,
                team_ids.iter().filter_map(|id| teams.get(id).cloned()).collect(),
            );
        }

        let mut ordered_sessions = snapshot.session_infos();
        ordered_sessions.sort_by(compare_sessions);
        let session_rank: HashMap<i32, usize> = ordered_sessions
            .iter()
            .enumerate()
            .map(|(rank, s)| (s.session_id, rank))
            .collect();
        let sessions: HashMap<i32, SessionInfo> = ordered_sessions
            .iter()
            .map(|s| (s.session_id, s.clone()))
            .collect();

        let fastest = fastest_lap_holders(&snapshot.laps);

        let scored: Vec<ScoredRow> = snapshot
            .results
            .iter()
            .filter_map(|result| {
                let session = sessions.get(&result.session_id)?;
                let holder = if session.session_type == SessionType::Race {
                    fastest.get(&session.session_id).copied()
                } else {
                    None
                };
                let base_points = points_for(session.session_type, result.position);
                let bonus = earns_fastest_lap_bonus(session.session_type, holder, result);
                Some(ScoredRow {
                    session,
                    result,
                    base_points,
                    total_points: base_points + i32::from(bonus),
                    holds_fastest_lap: holder == Some(result.driver_id),
                })
            })
            .collect();

        let team_name_of = |driver_id: i32, year: i32| -> String {
            match assignments.get(&(driver_id, year)) {
                Some(team_id) => team_display_name(teams.get(team_id).map(|t| t.name.as_str())),
                None => UNKNOWN_TEAM.to_string(),
            }
        };

        let mut standing_totals: BTreeMap<(i32, i32), (i32, u32)> = BTreeMap::new();
        // (driver, year) -> (race points with bonus, table points)
        let mut team_driver_points: HashMap<(i32, i32), (i32, i32)> = HashMap::new();
        let mut team_race_totals: BTreeMap<(i32, i32, usize), i32> = BTreeMap::new();
        let mut season_counts: HashMap<(i32, i32, SessionType), SessionTypeCounts> =
            HashMap::new();
        let mut career_tallies: HashMap<i32, CareerTally> = HashMap::new();
        let mut session_lines: HashMap<i32, Vec<ResultLine>> = HashMap::new();

        for row in &scored {
            let year = row.session.year;
            let driver_id = row.result.driver_id;
            let session_type = row.session.session_type;
            let is_race = session_type == SessionType::Race;

            if session_type.awards_points() {
                let total = standing_totals.entry((year, driver_id)).or_default();
                total.0 += row.total_points;
                if is_race && row.result.position == Some(1) {
                    total.1 += 1;
                }

                let career = career_tallies.entry(driver_id).or_default();
                career.points += row.base_points;
                if is_race {
                    career.entered += 1;
                    if row.result.finished_within(3) {
                        career.podiums += 1;
                    }
                    career.race_positions.extend(row.result.position);
                }
            }

            if is_race {
                if let Some(team_id) = assignments.get(&(driver_id, year)) {
                    let points = team_driver_points.entry((driver_id, year)).or_default();
                    points.0 += row.total_points;
                    points.1 += row.base_points;
                    if let Some(rank) = session_rank.get(&row.session.session_id) {
                        *team_race_totals.entry((*team_id, year, *rank)).or_default() +=
                            row.total_points;
                    }
                }
            }

            let counts = season_counts
                .entry((driver_id, year, session_type))
                .or_default();
            counts.entered += 1;
            counts.points += row.total_points;
            counts.wins += u32::from(row.result.position == Some(1));
            counts.podiums += u32::from(row.result.finished_within(3));
            counts.top10s += u32::from(row.result.finished_within(10));
            counts.dnfs += u32::from(row.result.dnf);
            counts.fastest_laps += u32::from(row.holds_fastest_lap);

            let driver = drivers.get(&driver_id);
            session_lines
                .entry(row.session.session_id)
                .or_default()
                .push(ResultLine {
                    result: row.result.clone(),
                    driver_number: driver.map(|d| d.driver_number).unwrap_or_default(),
                    driver_name: driver.map(|d| d.full_name.clone()).unwrap_or_default(),
                    driver_code: driver.map(|d| d.code.clone()).unwrap_or_default(),
                    team_name: team_name_of(driver_id, year),
                    points: row.total_points,
                });
        }

        for entry in &snapshot.starting_grid {
            let Some(session) = sessions.get(&entry.session_id) else {
                continue;
            };
            if entry.position == 1 {
                season_counts
                    .entry((entry.driver_id, session.year, session.session_type))
                    .or_default()
                    .poles += 1;
            }
            if session.session_type == SessionType::Race {
                career_tallies
                    .entry(entry.driver_id)
                    .or_default()
                    .grid_positions
                    .push(entry.position);
            }
        }

        for lines in session_lines.values_mut() {
            lines.sort_by(|a, b| compare_results(&a.result, &b.result));
        }

        let mut race_winners: HashMap<i32, Vec<RaceWinnerRow>> = HashMap::new();
        for session in ordered_sessions
            .iter()
            .filter(|s| s.session_type == SessionType::Race)
        {
            let winner = session_lines.get(&session.session_id).and_then(|lines| {
                lines
                    .iter()
                    .filter(|l| l.result.position == Some(1))
                    .min_by_key(|l| l.result.driver_id)
            });
            if let Some(line) = winner {
                race_winners.entry(session.year).or_default().push(RaceWinnerRow {
                    session_id: session.session_id,
                    gp_name: session.gp_name.clone(),
                    country_name: session.country_name.clone(),
                    date_start: session.event_date,
                    driver_id: line.result.driver_id,
                    driver_name: line.driver_name.clone(),
                    driver_code: line.driver_code.clone(),
                    team_name: line.team_name.clone(),
                    laps: line.result.number_of_laps,
                    duration: line.result.duration,
                });
            }
        }

        let mut driver_standings: HashMap<i32, Vec<DriverStanding>> = HashMap::new();
        for ((year, driver_id), (points, wins)) in standing_totals {
            if let Some(driver) = drivers.get(&driver_id) {
                driver_standings.entry(year).or_default().push(DriverStanding {
                    year,
                    driver_id,
                    full_name: driver.full_name.clone(),
                    code: driver.code.clone(),
                    total_points: points,
                    total_wins: wins,
                    championship_position: 0,
                });
            }
        }
        let driver_standings: HashMap<i32, Vec<DriverStanding>> = driver_standings
            .into_iter()
            .map(|(year, rows)| (year, rank_drivers(rows)))
            .collect();

        let mut team_members: BTreeMap<(i32, i32), Vec<(i32, (i32, i32))>> = BTreeMap::new();
        for ((driver_id, year), team_id) in &assignments {
            let points = team_driver_points
                .get(&(*driver_id, *year))
                .copied()
                .unwrap_or_default();
            team_members
                .entry((*year, *team_id))
                .or_default()
                .push((*driver_id, points));
        }

        let mut team_standings: HashMap<i32, Vec<TeamStandingRow>> = HashMap::new();
        let mut team_top_drivers: HashMap<i32, Vec<TeamDriverRow>> = HashMap::new();
        let mut ranked_by_year: HashMap<i32, Vec<TeamAggregate>> = HashMap::new();
        for ((year, team_id), members) in team_members {
            let Some(team) = teams.get(&team_id) else {
                continue;
            };
            let roster: Vec<TeamDriver> = members
                .iter()
                .filter_map(|(driver_id, (_, base_points))| {
                    drivers.get(driver_id).map(|driver| TeamDriver {
                        driver: driver.clone(),
                        points: *base_points,
                    })
                })
                .collect();
            ranked_by_year.entry(year).or_default().push(TeamAggregate {
                team: team.clone(),
                total_points: members.iter().map(|(_, (total, _))| total).sum(),
                top_drivers: top_drivers(roster, ROSTER_SIZE),
            });
        }
        for (year, aggregates) in ranked_by_year {
            for aggregate in rank_teams(aggregates) {
                team_top_drivers
                    .entry(year)
                    .or_default()
                    .extend(aggregate.top_drivers.into_iter().enumerate().map(
                        |(index, member)| TeamDriverRow {
                            team_id: aggregate.team.team_id,
                            driver: member.driver,
                            points: member.points,
                            roster_rank: index as u32 + 1,
                        },
                    ));
                team_standings.entry(year).or_default().push(TeamStandingRow {
                    team: aggregate.team,
                    total_points: aggregate.total_points,
                });
            }
        }

        let mut team_race_points: HashMap<(i32, i32), Vec<TeamRaceResult>> = HashMap::new();
        for ((team_id, year, rank), points) in team_race_totals {
            let session = &ordered_sessions[rank];
            team_race_points
                .entry((team_id, year))
                .or_default()
                .push(TeamRaceResult {
                    session_id: session.session_id,
                    gp_name: session.gp_name.clone(),
                    date: session.event_date,
                    points,
                });
        }

        let careers: HashMap<i32, CareerAggregate> = career_tallies
            .into_iter()
            .map(|(driver_id, tally)| {
                let career = CareerAggregate {
                    driver_id,
                    entered: tally.entered,
                    podiums: tally.podiums,
                    highest_finish: best_position(tally.race_positions.iter().copied()),
                    highest_grid: best_position(tally.grid_positions.iter().copied()),
                    poles: tally.grid_positions.iter().filter(|p| **p == 1).count() as u32,
                    points: tally.points,
                };
                (driver_id, career)
            })
            .collect();

        debug!(
            sessions = sessions.len(),
            scored_results = scored.len(),
            seasons = seasons.len(),
            "Materialized statistics views"
        );

        Self {
            seasons,
            events,
            drivers,
            teams,
            assignments,
            season_drivers,
            season_teams,
            sessions,
            driver_standings,
            team_standings,
            team_top_drivers,
            team_race_points,
            session_lines,
            race_winners,
            season_counts,
            careers,
        }
    }
}

#[async_trait]
impl StatsViews for MaterializedViews {
    async fn driver_standings(&self, year: i32) -> Result<Vec<DriverStanding>, StatsError> {
        Ok(self.driver_standings.get(&year).cloned().unwrap_or_default())
    }

    async fn team_standings(&self, year: i32) -> Result<Vec<TeamStandingRow>, StatsError> {
        Ok(self.team_standings.get(&year).cloned().unwrap_or_default())
    }

    async fn team_top_drivers(&self, year: i32) -> Result<Vec<TeamDriverRow>, StatsError> {
        Ok(self.team_top_drivers.get(&year).cloned().unwrap_or_default())
    }

    async fn team_race_points(
        &self,
        team_id: i32,
        year: i32,
    ) -> Result<Vec<TeamRaceResult>, StatsError> {
        Ok(self
            .team_race_points
            .get(&(team_id, year))
            .cloned()
            .unwrap_or_default())
    }

    async fn session_header(&self, session_id: i32) -> Result<Option<SessionInfo>, StatsError> {
        Ok(self.sessions.get(&session_id).cloned())
    }

    async fn session_lines(&self, session_id: i32) -> Result<Vec<ResultLine>, StatsError> {
        Ok(self
            .session_lines
            .get(&session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn race_winners(&self, year: i32) -> Result<Vec<RaceWinnerRow>, StatsError> {
        Ok(self.race_winners.get(&year).cloned().unwrap_or_default())
    }

    async fn driver_season_counts(
        &self,
        driver_id: i32,
        year: i32,
        session_type: SessionType,
    ) -> Result<SessionTypeCounts, StatsError> {
        Ok(self
            .season_counts
            .get(&(driver_id, year, session_type))
            .cloned()
            .unwrap_or_default())
    }

    async fn driver_career(&self, driver_id: i32) -> Result<CareerAggregate, StatsError> {
        Ok(self
            .careers
            .get(&driver_id)
            .cloned()
            .unwrap_or_else(|| CareerAggregate {
                driver_id,
                ..CareerAggregate::default()
            }))
    }

    async fn driver(&self, driver_id: i32) -> Result<Option<Driver>, StatsError> {
        Ok(self.drivers.get(&driver_id).cloned())
    }

    async fn team(&self, team_id: i32) -> Result<Option<Team>, StatsError> {
        Ok(self.teams.get(&team_id).cloned())
    }

    async fn team_for_driver(
        &self,
        driver_id: i32,
        year: i32,
    ) -> Result<Option<Team>, StatsError> {
        Ok(self
            .assignments
            .get(&(driver_id, year))
            .and_then(|team_id| self.teams.get(team_id))
            .cloned())
    }

    async fn season_drivers(&self, year: i32) -> Result<Vec<Driver>, StatsError> {
        Ok(self.season_drivers.get(&year).cloned().unwrap_or_default())
    }

    async fn season_teams(&self, year: i32) -> Result<Vec<Team>, StatsError> {
        Ok(self.season_teams.get(&year).cloned().unwrap_or_default())
    }

    async fn seasons(&self) -> Result<Vec<Season>, StatsError> {
        Ok(self.seasons.clone())
    }

    async fn events(&self, year: i32) -> Result<Vec<Event>, StatsError> {
        Ok(self.events.get(&year).cloned().unwrap_or_default())
    }
}
