use std::sync::Arc;

use f1stats::stats::StatsService;

pub const YEARS: [i32; 4] = [2022, 2023, 2024, 2025];
pub const DRIVERS: [i32; 8] = [1, 2, 3, 4, 5, 6, 9, 42];
pub const TEAMS: [i32; 5] = [1, 2, 3, 4, 99];
pub const SESSIONS: [i32; 7] = [100, 101, 110, 111, 121, 200, 999];

// ============================================================================
// Cross-backend assertions
// ============================================================================

/// Runs every read against both services and asserts identical answers
pub async fn assert_services_agree(left: &Arc<dyn StatsService>, right: &Arc<dyn StatsService>) {
    assert_eq!(
        left.get_seasons().await.unwrap(),
        right.get_seasons().await.unwrap()
    );

    for year in YEARS {
        assert_eq!(
            left.get_season_standings(year).await.unwrap(),
            right.get_season_standings(year).await.unwrap(),
            "driver standings differ for {}",
            year
        );
        assert_eq!(
            left.get_team_standings(year).await.unwrap(),
            right.get_team_standings(year).await.unwrap(),
            "team standings differ for {}",
            year
        );
        assert_eq!(
            left.get_race_winners(year).await.unwrap(),
            right.get_race_winners(year).await.unwrap(),
            "race winners differ for {}",
            year
        );
        assert_eq!(
            left.get_events(year).await.unwrap(),
            right.get_events(year).await.unwrap(),
            "events differ for {}",
            year
        );
        assert_eq!(
            left.get_drivers(year).await.unwrap(),
            right.get_drivers(year).await.unwrap(),
            "season drivers differ for {}",
            year
        );
        assert_eq!(
            left.get_teams(year).await.unwrap(),
            right.get_teams(year).await.unwrap(),
            "season teams differ for {}",
            year
        );

        for driver_id in DRIVERS {
            assert_eq!(
                left.get_driver_season_stats(driver_id, year).await.unwrap(),
                right.get_driver_season_stats(driver_id, year).await.unwrap(),
                "season stats differ for driver {} in {}",
                driver_id,
                year
            );
        }

        for team_id in TEAMS {
            assert_eq!(
                left.get_team_details(team_id, year).await.unwrap(),
                right.get_team_details(team_id, year).await.unwrap(),
                "team details differ for team {} in {}",
                team_id,
                year
            );
        }
    }

    for driver_id in DRIVERS {
        assert_eq!(
            left.get_driver_career_stats(driver_id).await.unwrap(),
            right.get_driver_career_stats(driver_id).await.unwrap(),
            "career differs for driver {}",
            driver_id
        );
    }

    for session_id in SESSIONS {
        assert_eq!(
            left.get_session_results(session_id).await.unwrap(),
            right.get_session_results(session_id).await.unwrap(),
            "results differ for session {}",
            session_id
        );
        assert_eq!(
            left.get_race_details(session_id).await.unwrap(),
            right.get_race_details(session_id).await.unwrap(),
            "race details differ for session {}",
            session_id
        );
    }
}
