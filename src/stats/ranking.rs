//! Ordering rules for championship tables.

use std::cmp::Ordering;

use super::{DriverStanding, TeamAggregate, TeamDriver};

/// Drivers listed under each team in the constructors' table
pub const ROSTER_SIZE: usize = 2;

/// Points descending, then wins descending, then driver id
pub fn compare_driver_standings(a: &DriverStanding, b: &DriverStanding) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then_with(|| b.total_wins.cmp(&a.total_wins))
        .then_with(|| a.driver_id.cmp(&b.driver_id))
}

/// Sorts standings and assigns 1-based championship positions
pub fn rank_drivers(mut standings: Vec<DriverStanding>) -> Vec<DriverStanding> {
    standings.sort_by(compare_driver_standings);
    for (index, standing) in standings.iter_mut().enumerate() {
        standing.championship_position = index as u32 + 1;
    }
    standings
}

pub fn rank_teams(mut teams: Vec<TeamAggregate>) -> Vec<TeamAggregate> {
    teams.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.team.team_id.cmp(&b.team.team_id))
    });
    teams
}

/// Highest scoring `n` drivers, ties going to the lower driver id
pub fn top_drivers(mut drivers: Vec<TeamDriver>, n: usize) -> Vec<TeamDriver> {
    drivers.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| a.driver.driver_id.cmp(&b.driver.driver_id))
    });
    drivers.truncate(n);
    drivers
}
