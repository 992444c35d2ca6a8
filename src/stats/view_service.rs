use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{
    format::{circuit_display_name, render_results, winner_time},
    service::StatsService,
    validate_year,
    views::StatsViews,
    CareerAggregate, DriverStanding, FormattedResult, RaceDetails, RaceWinner, SeasonAggregate,
    StatsError, TeamAggregate, TeamDriver, TeamSeasonDetails,
};
use crate::data::{Driver, Event, Season, SessionType, Team};

/// Backend that reads precomputed aggregates and only formats them
pub struct ViewStatsService {
    views: Arc<dyn StatsViews>,
}

impl ViewStatsService {
    pub fn new(views: Arc<dyn StatsViews>) -> Self {
        Self { views }
    }
}

#[async_trait]
impl StatsService for ViewStatsService {
    #[instrument(skip(self))]
    async fn get_season_standings(&self, year: i32) -> Result<Vec<DriverStanding>, StatsError> {
        validate_year(year)?;
        self.views.driver_standings(year).await
    }

    #[instrument(skip(self))]
    async fn get_team_standings(&self, year: i32) -> Result<Vec<TeamAggregate>, StatsError> {
        validate_year(year)?;

        let (teams, members) = tokio::try_join!(
            self.views.team_standings(year),
            self.views.team_top_drivers(year)
        )?;

        let mut rosters: HashMap<i32, Vec<(u32, TeamDriver)>> = HashMap::new();
        for member in members {
            rosters.entry(member.team_id).or_default().push((
                member.roster_rank,
                TeamDriver {
                    driver: member.driver,
                    points: member.points,
                },
            ));
        }

        let standings: Vec<TeamAggregate> = teams
            .into_iter()
            .map(|row| {
                let mut roster = rosters.remove(&row.team.team_id).unwrap_or_default();
                roster.sort_by_key(|(rank, _)| *rank);
                TeamAggregate {
                    team: row.team,
                    total_points: row.total_points,
                    top_drivers: roster.into_iter().map(|(_, driver)| driver).collect(),
                }
            })
            .collect();

        debug!(year = year, teams = standings.len(), "Assembled team standings");
        Ok(standings)
    }

    #[instrument(skip(self))]
    async fn get_driver_career_stats(
        &self,
        driver_id: i32,
    ) -> Result<Option<CareerAggregate>, StatsError> {
        if self.views.driver(driver_id).await?.is_none() {
            return Ok(None);
        }
        self.views.driver_career(driver_id).await.map(Some)
    }

    #[instrument(skip(self))]
    async fn get_driver_season_stats(
        &self,
        driver_id: i32,
        year: i32,
    ) -> Result<Option<SeasonAggregate>, StatsError> {
        validate_year(year)?;

        let Some(driver) = self.views.driver(driver_id).await? else {
            return Ok(None);
        };

        let (standings, grand_prix, sprint, team, career) = tokio::try_join!(
            self.views.driver_standings(year),
            self.views
                .driver_season_counts(driver_id, year, SessionType::Race),
            self.views
                .driver_season_counts(driver_id, year, SessionType::Sprint),
            self.views.team_for_driver(driver_id, year),
            self.views.driver_career(driver_id)
        )?;

        Ok(Some(SeasonAggregate {
            driver,
            team,
            year,
            season_position: standings
                .iter()
                .find(|s| s.driver_id == driver_id)
                .map(|s| s.championship_position),
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
        let lines = self.views.session_lines(session_id).await?;
        Ok(render_results(lines))
    }

    #[instrument(skip(self))]
    async fn get_race_winners(&self, year: i32) -> Result<Vec<RaceWinner>, StatsError> {
        validate_year(year)?;

        let rows = self.views.race_winners(year).await?;
        Ok(rows
            .into_iter()
            .map(|row| RaceWinner {
                session_id: row.session_id,
                gp_name: row.gp_name,
                country_name: row.country_name,
                date_start: row.date_start,
                driver_id: row.driver_id,
                driver_name: row.driver_name,
                driver_code: row.driver_code,
                team_name: row.team_name,
                laps: row.laps,
                time: winner_time(row.duration),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn get_race_details(&self, session_id: i32) -> Result<Option<RaceDetails>, StatsError> {
        let Some(session) = self.views.session_header(session_id).await? else {
            debug!(session_id = session_id, "Session not found");
            return Ok(None);
        };
        let lines = self.views.session_lines(session_id).await?;

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

        let Some(team) = self.views.team(team_id).await? else {
            return Ok(None);
        };
        let races = self.views.team_race_points(team_id, year).await?;

        Ok(Some(TeamSeasonDetails { team, year, races }))
    }

    #[instrument(skip(self))]
    async fn get_drivers(&self, year: i32) -> Result<Vec<Driver>, StatsError> {
        validate_year(year)?;
        self.views.season_drivers(year).await
    }

    #[instrument(skip(self))]
    async fn get_teams(&self, year: i32) -> Result<Vec<Team>, StatsError> {
        validate_year(year)?;
        self.views.season_teams(year).await
    }

    #[instrument(skip(self))]
    async fn get_seasons(&self) -> Result<Vec<Season>, StatsError> {
        self.views.seasons().await
    }

    #[instrument(skip(self))]
    async fn get_events(&self, year: i32) -> Result<Vec<Event>, StatsError> {
        validate_year(year)?;
        self.views.events(year).await
    }
}
