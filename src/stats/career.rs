use super::{standings::ScoredResult, CareerAggregate, PositionRecord};
use crate::data::{SessionType, StartingGridEntry};

/// Best (lowest positive) position in `positions` and how often it occurred
pub fn best_position(positions: impl IntoIterator<Item = i32>) -> Option<PositionRecord> {
    positions
        .into_iter()
        .filter(|p| *p > 0)
        .fold(None, |best: Option<PositionRecord>, position| match best {
            Some(record) if record.position < position => Some(record),
            Some(record) if record.position == position => Some(PositionRecord {
                position,
                count: record.count + 1,
            }),
            _ => Some(PositionRecord { position, count: 1 }),
        })
}

/// All-time record of one driver.
///
/// `scored` holds the driver's results from every year; `race_grid` the
/// driver's starting positions in Race sessions. Points are table points
/// only, without fastest-lap bonuses.
pub fn career_aggregate(
    driver_id: i32,
    scored: &[ScoredResult],
    race_grid: &[StartingGridEntry],
) -> CareerAggregate {
    let driver_rows: Vec<&ScoredResult> =
        scored.iter().filter(|r| r.driver_id() == driver_id).collect();
    let races: Vec<&ScoredResult> = driver_rows
        .iter()
        .copied()
        .filter(|r| r.session_type() == SessionType::Race)
        .collect();
    let grid: Vec<i32> = race_grid
        .iter()
        .filter(|g| g.driver_id == driver_id)
        .map(|g| g.position)
        .collect();

    CareerAggregate {
        driver_id,
        entered: races.len() as u32,
        podiums: races.iter().filter(|r| r.result.finished_within(3)).count() as u32,
        highest_finish: best_position(races.iter().filter_map(|r| r.result.position)),
        highest_grid: best_position(grid.iter().copied()),
        poles: grid.iter().filter(|p| **p == 1).count() as u32,
        points: driver_rows
            .iter()
            .filter(|r| r.session_type().awards_points())
            .map(|r| r.points.base_points)
            .sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Snapshot;
    use crate::stats::{standings::score_results, PointsScorer};
    use chrono::NaiveDate;
    use std::collections::HashMap;

    #[test]
    fn best_position_counts_repeats() {
        let record = best_position(vec![4, 2, 0, 2, 7, -1]).unwrap();
        assert_eq!(record, PositionRecord { position: 2, count: 2 });
        assert!(best_position(vec![0, -3]).is_none());
        assert!(best_position(Vec::new()).is_none());
    }

    #[test]
    fn career_spans_seasons_and_skips_bonus() {
        let date = |year| {
            NaiveDate::from_ymd_opt(year, 5, 1)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap()
        };
        let snapshot = Snapshot::builder()
            .season(1, 2023)
            .season(2, 2024)
            .driver(1, 44, "HAM", "Lewis Hamilton")
            .event(10, 1, "Miami Grand Prix", date(2023))
            .event(20, 2, "Miami Grand Prix", date(2024))
            .session(100, 10, SessionType::Race)
            .session(200, 20, SessionType::Sprint)
            .session(201, 20, SessionType::Race)
            .session(202, 20, SessionType::Qualifying)
            .finish(100, 1, 1, 57)
            .finish(200, 1, 3, 19)
            .finish(201, 1, 1, 57)
            .finish(202, 1, 1, 0)
            .grid(100, 1, 2)
            .grid(201, 1, 1)
            .build();

        let scored = score_results(
            &PointsScorer::default(),
            &snapshot.session_infos(),
            snapshot.results.clone(),
            &HashMap::from([(100, 1), (201, 1)]),
        );
        let career = career_aggregate(1, &scored, &snapshot.starting_grid);

        assert_eq!(career.entered, 2);
        assert_eq!(career.podiums, 2);
        assert_eq!(career.highest_finish, Some(PositionRecord { position: 1, count: 2 }));
        assert_eq!(career.highest_grid, Some(PositionRecord { position: 1, count: 1 }));
        assert_eq!(career.poles, 1);
        // 25 + 25 from races, 6 from the sprint, no fastest-lap points
        assert_eq!(career.points, 56);
    }

    #[test]
    fn unknown_history_yields_empty_records() {
        let career = career_aggregate(9, &[], &[]);
        assert_eq!(career.entered, 0);
        assert!(career.highest_finish.is_none());
        assert!(career.highest_grid.is_none());
        assert_eq!(career.points, 0);
    }
}
