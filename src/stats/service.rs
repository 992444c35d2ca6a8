use async_trait::async_trait;
use futures::future::try_join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{
    career::career_aggregate,
    format::{
        circuit_display_name, render_results, sort_lines, team_display_name, winner_time,
        UNKNOWN_TEAM,
    },
    standings::{
        driver_standings, score_results, session_type_counts, team_by_driver, team_race_results,
        team_standings, ScoredResult,
    },
    validate_year, CareerAggregate, DriverStanding, FormattedResult, PointsScorer, RaceDetails,
    RaceWinner, ResultLine, SeasonAggregate, StatsError, TeamAggregate, TeamSeasonDetails,
};
use crate::data::{
    Contract, Driver, Event, RaceDataRepository, Season, SessionFilter, SessionInfo, SessionType,
    Team,
};

const POINTS_SESSIONS: [SessionType; 2] = [SessionType::Race, SessionType::Sprint];

/// Read-only statistics over the race history.
///
/// Both backends implement this and must return identical values for the
/// same data.
#[async_trait]
pub trait StatsService: Send + Sync {
    async fn get_season_standings(&self, year: i32) -> Result<Vec<DriverStanding>, StatsError>;
    async fn get_team_standings(&self, year: i32) -> Result<Vec<TeamAggregate>, StatsError>;
    async fn get_driver_career_stats(
        &self,
        driver_id: i32,
    ) -> Result<Option<CareerAggregate>, StatsError>;
    async fn get_driver_season_stats(
        &self,
        driver_id: i32,
        year: i32,
    ) -> Result<Option<SeasonAggregate>, StatsError>;
    async fn get_session_results(&self, session_id: i32)
        -> Result<Vec<FormattedResult>, StatsError>;
    async fn get_race_winners(&self, year: i32) -> Result<Vec<RaceWinner>, StatsError>;
    async fn get_race_details(&self, session_id: i32) -> Result<Option<RaceDetails>, StatsError>;
    async fn get_team_details(
        &self,
        team_id: i32,
        year: i32,
    ) -> Result<Option<TeamSeasonDetails>, StatsError>;
    /// Drivers under contract in `year`, ordered by id
    async fn get_drivers(&self, year: i32) -> Result<Vec<Driver>, StatsError>;
    /// Teams under contract in `year`, ordered by id
    async fn get_teams(&self, year: i32) -> Result<Vec<Team>, StatsError>;
    async fn get_seasons(&self) -> Result<Vec<Season>, StatsError>;
    async fn get_events(&self, year: i32) -> Result<Vec<Event>, StatsError>;
}

/// Backend that reads raw rows and folds them in-process
pub struct QueryStatsService {
    repository: Arc<dyn RaceDataRepository>,
    scorer: PointsScorer,
}

impl QueryStatsService {
    pub fn new(repository: Arc<dyn RaceDataRepository>) -> Self {
        Self::with_scorer(repository, PointsScorer::default())
    }

    pub fn with_scorer(repository: Arc<dyn RaceDataRepository>, scorer: PointsScorer) -> Self {
        Self { repository, scorer }
    }

    /// Fastest-lap holder of every Race session in `sessions`, looked up concurrently
    async fn fastest_laps(&self, sessions: &[SessionInfo]) -> Result<HashMap<i32, i32>, StatsError> {
        let lookups = sessions
            .iter()
            .filter(|s| s.session_type == SessionType::Race)
            .map(|s| self.repository.fastest_lap(s.session_id));

        let laps = try_join_all(lookups).await?;
        Ok(laps
            .into_iter()
            .flatten()
            .map(|lap| (lap.session_id, lap.driver_id))
            .collect())
    }

    async fn scored(
        &self,
        filter: &SessionFilter,
    ) -> Result<(Vec<SessionInfo>, Vec<ScoredResult>), StatsError> {
        let (sessions, results) = tokio::try_join!(
            self.repository.list_sessions(filter),
            self.repository.list_results(filter)
        )?;
        let fastest = self.fastest_laps(&sessions).await?;

        let scored = score_results(&self.scorer, &sessions, results, &fastest);
        debug!(
            sessions = sessions.len(),
            results = scored.len(),
            "Scored session results"
        );
        Ok((sessions, scored))
    }

    async fn team_names(&self, year: i32) -> Result<HashMap<i32, String>, StatsError> {
        let (contracts, teams) = tokio::try_join!(
            self.repository.list_contracts(year),
            self.repository.list_teams()
        )?;
        Ok(team_names_by_driver(&contracts, &teams))
    }

    async fn career(&self, driver_id: i32) -> Result<CareerAggregate, StatsError> {
        let filter = SessionFilter::all()
            .driver(driver_id)
            .of_types(&POINTS_SESSIONS);
        let grid_filter = SessionFilter::all()
            .driver(driver_id)
            .of_types(&[SessionType::Race]);

        let (_, scored) = self.scored(&filter).await?;
        let grid = self.repository.list_grid(&grid_filter).await?;

        Ok(career_aggregate(driver_id, &scored, &grid))
    }
}

/// Display team name of each contracted driver
fn team_names_by_driver(contracts: &[Contract], teams: &[Team]) -> HashMap<i32, String> {
    let teams: HashMap<i32, &Team> = teams.iter().map(|t| (t.team_id, t)).collect();
    team_by_driver(contracts)
        .into_iter()
        .map(|(driver_id, team_id)| {
            let name = teams.get(&team_id).map(|t| t.name.as_str());
            (driver_id, team_display_name(name))
        })
        .collect()
}

fn result_line(
    row: ScoredResult,
    drivers: &HashMap<i32, &Driver>,
    team_names: &HashMap<i32, String>,
) -> ResultLine {
    let driver = drivers.get(&row.driver_id());
    ResultLine {
        driver_number: driver.map(|d| d.driver_number).unwrap_or_default(),
        driver_name: driver.map(|d| d.full_name.clone()).unwrap_or_default(),
        driver_code: driver.map(|d| d.code.clone()).unwrap_or_default(),
        team_name: team_names
            .get(&row.driver_id())
            .cloned()
            .unwrap_or_else(|| UNKNOWN_TEAM.to_string()),
        points: row.points.total_points,
        result: row.result,
    }
}

#[async_trait]
impl StatsService for QueryStatsService {
    #[instrument(skip(self))]
    async fn get_season_standings(&self, year: i32) -> Result<Vec<DriverStanding>, StatsError> {
        validate_year(year)?;

        let filter = SessionFilter::for_year(year).of_types(&POINTS_SESSIONS);
        let (_, scored) = self.scored(&filter).await?;
        let drivers = self.repository.list_drivers().await?;

        let standings = driver_standings(year, &scored, &drivers);
        debug!(year = year, drivers = standings.len(), "Computed driver standings");
        Ok(standings)
    }

    #[instrument(skip(self))]
    async fn get_team_standings(&self, year: i32) -> Result<Vec<TeamAggregate>, StatsError> {
        validate_year(year)?;

        let filter = SessionFilter::for_year(year).of_types(&[SessionType::Race]);
        let (_, scored) = self.scored(&filter).await?;
        let (contracts, teams, drivers) = tokio::try_join!(
            self.repository.list_contracts(year),
            self.repository.list_teams(),
            self.repository.list_drivers()
        )?;

        let standings = team_standings(year, &scored, &contracts, &teams, &drivers);
        debug!(year = year, teams = standings.len(), "Computed team standings");
        Ok(standings)
    }

    #[instrument(skip(self))]
    async fn get_driver_career_stats(
        &self,
        driver_id: i32,
    ) -> Result<Option<CareerAggregate>, StatsError> {
        if self.repository.get_driver(driver_id).await?.is_none() {
            debug!(driver_id = driver_id, "No career for unknown driver");
            return Ok(None);
        }

        self.career(driver_id).await.map(Some)
    }

    #[instrument(skip(self))]
    async fn get_driver_season_stats(
        &self,
        driver_id: i32,
        year: i32,
    ) -> Result<Option<SeasonAggregate>, StatsError> {
        validate_year(year)?;

        let Some(driver) = self.repository.get_driver(driver_id).await? else {
            debug!(driver_id = driver_id, "No season stats for unknown driver");
            return Ok(None);
        };

        let filter = SessionFilter::for_year(year).of_types(&POINTS_SESSIONS);
        let (sessions, scored) = self.scored(&filter).await?;
        let grid_filter = SessionFilter::for_year(year)
            .driver(driver_id)
            .of_types(&POINTS_SESSIONS);
        let (drivers, grid, contracts) = tokio::try_join!(
            self.repository.list_drivers(),
            self.repository.list_grid(&grid_filter),
            self.repository.list_contracts(year)
        )?;

        let season_position = driver_standings(year, &scored, &drivers)
            .into_iter()
            .find(|s| s.driver_id == driver_id)
            .map(|s| s.championship_position);
        let grand_prix =
            session_type_counts(driver_id, SessionType::Race, &scored, &sessions, &grid);
        let sprint = session_type_counts(driver_id, SessionType::Sprint, &scored, &sessions, &grid);

        let team = match team_by_driver(&contracts).get(&driver_id) {
            Some(team_id) => self.repository.get_team(*team_id).await?,
            None => None,
        };
        let career = self.career(driver_id).await?;

        Ok(Some(SeasonAggregate {
            driver,
            team,
            year,
            season_position,
            season_points: grand_prix.points + sprint.points,
            grand_prix,
            sprint,
            career,
        }))
    }

    #[instrument(skip(self))]
    async fn get_session_results(
        &self,
        session_id: i32,
    ) -> Result<Vec<FormattedResult>, StatsError> {
        Ok(self
            .get_race_details(session_id)
            .await?
            .map(|details| details.results)
            .unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn get_race_winners(&self, year: i32) -> Result<Vec<RaceWinner>, StatsError> {
        validate_year(year)?;

        let filter = SessionFilter::for_year(year).of_types(&[SessionType::Race]);
        let (sessions, results) = tokio::try_join!(
            self.repository.list_sessions(&filter),
            self.repository.list_results(&filter)
        )?;
        let drivers = self.repository.list_drivers().await?;
        let drivers: HashMap<i32, &Driver> = drivers.iter().map(|d| (d.driver_id, d)).collect();
        let team_names = self.team_names(year).await?;

        let winners: Vec<RaceWinner> = sessions
            .iter()
            .filter_map(|session| {
                let winner = results
                    .iter()
                    .filter(|r| r.session_id == session.session_id && r.position == Some(1))
                    .min_by_key(|r| r.driver_id)?;
                let driver = drivers.get(&winner.driver_id);
                Some(RaceWinner {
                    session_id: session.session_id,
                    gp_name: session.gp_name.clone(),
                    country_name: session.country_name.clone(),
                    date_start: session.event_date,
                    driver_id: winner.driver_id,
                    driver_name: driver.map(|d| d.full_name.clone()).unwrap_or_default(),
                    driver_code: driver.map(|d| d.code.clone()).unwrap_or_default(),
                    team_name: team_names
                        .get(&winner.driver_id)
                        .cloned()
                        .unwrap_or_else(|| UNKNOWN_TEAM.to_string()),
                    laps: winner.number_of_laps,
                    time: winner_time(winner.duration),
                })
            })
            .collect();

        debug!(year = year, winners = winners.len(), "Collected race winners");
        Ok(winners)
    }

    #[instrument(skip(self))]
    async fn get_race_details(&self, session_id: i32) -> Result<Option<RaceDetails>, StatsError> {
        let filter = SessionFilter::for_session(session_id);
        let (sessions, scored) = self.scored(&filter).await?;
        let Some(session) = sessions.into_iter().next() else {
            debug!(session_id = session_id, "Session not found");
            return Ok(None);
        };

        let drivers = self.repository.list_drivers().await?;
        let drivers: HashMap<i32, &Driver> = drivers.iter().map(|d| (d.driver_id, d)).collect();
        let team_names = self.team_names(session.year).await?;

        let mut lines: Vec<ResultLine> = scored
            .into_iter()
            .map(|row| result_line(row, &drivers, &team_names))
            .collect();
        sort_lines(&mut lines);

        Ok(Some(RaceDetails {
            session_id: session.session_id,
            session_type: session.session_type,
            gp_name: session.gp_name,
            circuit_name: circuit_display_name(session.circuit_name.as_deref()),
            date_start: session.session_date,
            results: render_results(lines),
        }))
    }

    #[instrument(skip(self))]
    async fn get_team_details(
        &self,
        team_id: i32,
        year: i32,
    ) -> Result<Option<TeamSeasonDetails>, StatsError> {
        validate_year(year)?;

        let Some(team) = self.repository.get_team(team_id).await? else {
            debug!(team_id = team_id, "Team not found");
            return Ok(None);
        };

        let filter = SessionFilter::for_year(year).of_types(&[SessionType::Race]);
        let (_, scored) = self.scored(&filter).await?;
        let contracts = self.repository.list_contracts(year).await?;

        Ok(Some(TeamSeasonDetails {
            races: team_race_results(team_id, year, &scored, &contracts),
            team,
            year,
        }))
    }

    #[instrument(skip(self))]
    async fn get_drivers(&self, year: i32) -> Result<Vec<Driver>, StatsError> {
        validate_year(year)?;

        let (contracts, drivers) = tokio::try_join!(
            self.repository.list_contracts(year),
            self.repository.list_drivers()
        )?;
        let contracted: HashSet<i32> = contracts.iter().map(|c| c.driver_id).collect();

        let mut drivers: Vec<Driver> = drivers
            .into_iter()
            .filter(|d| contracted.contains(&d.driver_id))
            .collect();
        drivers.sort_by_key(|d| d.driver_id);
        debug!(year = year, drivers = drivers.len(), "Listed season drivers");
        Ok(drivers)
    }

    #[instrument(skip(self))]
    async fn get_teams(&self, year: i32) -> Result<Vec<Team>, StatsError> {
        validate_year(year)?;

        let (contracts, teams) = tokio::try_join!(
            self.repository.list_contracts(year),
            self.repository.list_teams()
        )?;
        let contracted: HashSet<i32> = contracts.iter().map(|c| c.team_id).collect();

        let mut teams: Vec<Team> = teams
            .into_iter()
            .filter(|t| contracted.contains(&t.team_id))
            .collect();
        teams.sort_by_key(|t| t.team_id);
        debug!(year = year, teams = teams.len(), "Listed season teams");
        Ok(teams)
    }

    #[instrument(skip(self))]
    async fn get_seasons(&self) -> Result<Vec<Season>, StatsError> {
        self.repository.list_seasons().await
    }

    #[instrument(skip(self))]
    async fn get_events(&self, year: i32) -> Result<Vec<Event>, StatsError> {
        validate_year(year)?;
        self.repository.list_events(year).await
    }
}
