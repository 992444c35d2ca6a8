use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    CareerAggregate, DriverStanding, FormattedResult, RaceDetails, RaceWinner, SeasonAggregate,
    TeamAggregate, TeamSeasonDetails,
};
use crate::data::{Driver, Event, Season, Team};
use crate::shared::{AppError, AppState};

/// Read-only statistics routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/seasons", get(list_seasons))
        .route("/seasons/:year/events", get(list_events))
        .route("/seasons/:year/drivers", get(list_drivers))
        .route("/seasons/:year/teams", get(list_teams))
        .route("/seasons/:year/standings/drivers", get(driver_standings))
        .route("/seasons/:year/standings/teams", get(team_standings))
        .route("/seasons/:year/winners", get(race_winners))
        .route("/sessions/:session_id", get(race_details))
        .route("/sessions/:session_id/results", get(session_results))
        .route("/drivers/:driver_id/career", get(driver_career))
        .route("/drivers/:driver_id/seasons/:year", get(driver_season))
        .route("/teams/:team_id/seasons/:year", get(team_details))
}

/// GET /seasons
#[instrument(name = "list_seasons", skip(state))]
pub async fn list_seasons(State(state): State<AppState>) -> Result<Json<Vec<Season>>, AppError> {
    let seasons = state.stats_service.get_seasons().await?;
    info!(season_count = seasons.len(), "Seasons listed");
    Ok(Json(seasons))
}

/// GET /seasons/:year/events
#[instrument(name = "list_events", skip(state))]
pub async fn list_events(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = state.stats_service.get_events(year).await?;
    info!(year = year, event_count = events.len(), "Events listed");
    Ok(Json(events))
}

/// GET /seasons/:year/drivers
#[instrument(name = "list_drivers", skip(state))]
pub async fn list_drivers(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<Driver>>, AppError> {
    let drivers = state.stats_service.get_drivers(year).await?;
    info!(year = year, driver_count = drivers.len(), "Drivers listed");
    Ok(Json(drivers))
}

/// GET /seasons/:year/teams
#[instrument(name = "list_teams", skip(state))]
pub async fn list_teams(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<Team>>, AppError> {
    let teams = state.stats_service.get_teams(year).await?;
    info!(year = year, team_count = teams.len(), "Teams listed");
    Ok(Json(teams))
}

/// GET /seasons/:year/standings/drivers
#[instrument(name = "driver_standings", skip(state))]
pub async fn driver_standings(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<DriverStanding>>, AppError> {
    let standings = state.stats_service.get_season_standings(year).await?;
    info!(year = year, drivers = standings.len(), "Driver standings served");
    Ok(Json(standings))
}

/// GET /seasons/:year/standings/teams
#[instrument(name = "team_standings", skip(state))]
pub async fn team_standings(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<TeamAggregate>>, AppError> {
    let standings = state.stats_service.get_team_standings(year).await?;
    info!(year = year, teams = standings.len(), "Team standings served");
    Ok(Json(standings))
}

/// GET /seasons/:year/winners
#[instrument(name = "race_winners", skip(state))]
pub async fn race_winners(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<Vec<RaceWinner>>, AppError> {
    let winners = state.stats_service.get_race_winners(year).await?;
    Ok(Json(winners))
}

/// GET /sessions/:session_id
#[instrument(name = "race_details", skip(state))]
pub async fn race_details(
    State(state): State<AppState>,
    Path(session_id): Path<i32>,
) -> Result<Json<RaceDetails>, AppError> {
    state
        .stats_service
        .get_race_details(session_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Session {} not found", session_id)))
}

/// GET /sessions/:session_id/results
#[instrument(name = "session_results", skip(state))]
pub async fn session_results(
    State(state): State<AppState>,
    Path(session_id): Path<i32>,
) -> Result<Json<Vec<FormattedResult>>, AppError> {
    let results = state.stats_service.get_session_results(session_id).await?;
    info!(session_id = session_id, rows = results.len(), "Session results served");
    Ok(Json(results))
}

/// GET /drivers/:driver_id/career
#[instrument(name = "driver_career", skip(state))]
pub async fn driver_career(
    State(state): State<AppState>,
    Path(driver_id): Path<i32>,
) -> Result<Json<CareerAggregate>, AppError> {
    state
        .stats_service
        .get_driver_career_stats(driver_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Driver {} not found", driver_id)))
}

/// GET /drivers/:driver_id/seasons/:year
#[instrument(name = "driver_season", skip(state))]
pub async fn driver_season(
    State(state): State<AppState>,
    Path((driver_id, year)): Path<(i32, i32)>,
) -> Result<Json<SeasonAggregate>, AppError> {
    state
        .stats_service
        .get_driver_season_stats(driver_id, year)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Driver {} not found", driver_id)))
}

/// GET /teams/:team_id/seasons/:year
#[instrument(name = "team_details", skip(state))]
pub async fn team_details(
    State(state): State<AppState>,
    Path((team_id, year)): Path<(i32, i32)>,
) -> Result<Json<TeamSeasonDetails>, AppError> {
    state
        .stats_service
        .get_team_details(team_id, year)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Team {} not found", team_id)))
}
