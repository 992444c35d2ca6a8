use super::super::{CalculationContext, PointsCalculator};
use crate::data::{SessionResult, SessionType};

/// Last position that still earns the fastest-lap point
pub const BONUS_POSITION_LIMIT: i32 = 10;

/// Whether `result` earns the fastest-lap point in a session of `session_type`
pub fn earns_fastest_lap_bonus(
    session_type: SessionType,
    fastest_lap_driver: Option<i32>,
    result: &SessionResult,
) -> bool {
    session_type == SessionType::Race
        && fastest_lap_driver == Some(result.driver_id)
        && result.finished_within(BONUS_POSITION_LIMIT)
}

pub struct FastestLapBonusCalculator;

impl Default for FastestLapBonusCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl FastestLapBonusCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl PointsCalculator for FastestLapBonusCalculator {
    fn calculate(&self, result: &SessionResult, context: &CalculationContext) -> i32 {
        if earns_fastest_lap_bonus(context.session_type, context.fastest_lap_driver, result) {
            context.current_points + 1
        } else {
            context.current_points
        }
    }

    fn priority(&self) -> u32 {
        crate::stats::calculator_priority::BONUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn result_for(driver_id: i32, position: Option<i32>) -> SessionResult {
        SessionResult {
            session_id: 1,
            driver_id,
            position,
            number_of_laps: 57,
            gap_to_leader: None,
            duration: None,
            dnf: false,
            dns: false,
            dsq: false,
        }
    }

    #[test]
    fn adds_point_for_fastest_driver_in_top_ten() {
        let calculator = FastestLapBonusCalculator::new();
        let context = CalculationContext::new(SessionType::Race, Some(4), 12);

        let points = calculator.calculate(&result_for(4, Some(4)), &context);
        assert_eq!(points, 13);
    }

    #[rstest]
    #[case(SessionType::Sprint, Some(4), Some(1))]
    #[case(SessionType::Race, Some(4), Some(11))]
    #[case(SessionType::Race, Some(4), None)]
    #[case(SessionType::Race, Some(9), Some(1))]
    #[case(SessionType::Race, None, Some(1))]
    fn leaves_points_unchanged_when_not_eligible(
        #[case] session_type: SessionType,
        #[case] fastest: Option<i32>,
        #[case] position: Option<i32>,
    ) {
        let calculator = FastestLapBonusCalculator::new();
        let context = CalculationContext::new(session_type, fastest, 7);

        let points = calculator.calculate(&result_for(4, position), &context);
        assert_eq!(points, 7);
    }

    #[test]
    fn at_most_one_driver_receives_bonus() {
        let results: Vec<SessionResult> = (1..=20).map(|p| result_for(p, Some(p))).collect();

        let awarded = results
            .iter()
            .filter(|r| earns_fastest_lap_bonus(SessionType::Race, Some(7), r))
            .count();
        assert_eq!(awarded, 1);

        let awarded_outside_points = results
            .iter()
            .filter(|r| earns_fastest_lap_bonus(SessionType::Race, Some(15), r))
            .count();
        assert_eq!(awarded_outside_points, 0);
    }
}
