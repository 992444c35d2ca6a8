use super::super::{CalculationContext, PointsCalculator};
use crate::data::{SessionResult, SessionType};

const RACE_POINTS: [i32; 10] = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1];
const SPRINT_POINTS: [i32; 8] = [8, 7, 6, 5, 4, 3, 2, 1];

fn table_lookup(table: &[i32], position: Option<i32>) -> i32 {
    position
        .filter(|p| *p >= 1)
        .and_then(|p| table.get((p - 1) as usize))
        .copied()
        .unwrap_or_default()
}

/// Grand Prix points for a finishing position
pub fn race_points(position: Option<i32>) -> i32 {
    table_lookup(&RACE_POINTS, position)
}

pub fn sprint_points(position: Option<i32>) -> i32 {
    table_lookup(&SPRINT_POINTS, position)
}

/// Table points for a position in a session of the given type
pub fn points_for(session_type: SessionType, position: Option<i32>) -> i32 {
    match session_type {
        SessionType::Race => race_points(position),
        SessionType::Sprint => sprint_points(position),
        _ => 0,
    }
}

pub struct BasePointsCalculator;

impl Default for BasePointsCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl BasePointsCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl PointsCalculator for BasePointsCalculator {
    fn calculate(&self, result: &SessionResult, context: &CalculationContext) -> i32 {
        points_for(context.session_type, result.position)
    }

    fn priority(&self) -> u32 {
        crate::stats::calculator_priority::BASE_POINTS
    }
}
