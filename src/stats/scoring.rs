use std::sync::Arc;

use super::{
    calculator_priority,
    calculators::{BasePointsCalculator, FastestLapBonusCalculator},
    CalculationContext, PointsBreakdown, PointsCalculator,
};
use crate::data::{SessionResult, SessionType};

/// Runs the registered points calculators over a result in priority order.
///
/// The running total right after the calculator registered at
/// [`calculator_priority::BASE_POINTS`] is reported as the base points; the
/// total after the last one is the awarded points.
pub struct PointsScorer {
    calculators: Vec<Arc<dyn PointsCalculator>>,
}

impl Default for PointsScorer {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PointsScorer {
    pub fn builder() -> PointsScorerBuilder {
        PointsScorerBuilder::new()
    }

    pub fn score(
        &self,
        result: &SessionResult,
        session_type: SessionType,
        fastest_lap_driver: Option<i32>,
    ) -> PointsBreakdown {
        let mut breakdown = PointsBreakdown::default();

        for calculator in &self.calculators {
            let context =
                CalculationContext::new(session_type, fastest_lap_driver, breakdown.total_points);
            breakdown.total_points = calculator.calculate(result, &context);

            if calculator.priority() == calculator_priority::BASE_POINTS {
                breakdown.base_points = breakdown.total_points;
            }
        }

        breakdown
    }
}

pub struct PointsScorerBuilder {
    calculators: Vec<Arc<dyn PointsCalculator>>,
}

impl PointsScorerBuilder {
    fn new() -> Self {
        Self {
            calculators: vec![
                Arc::new(BasePointsCalculator::new()),
                Arc::new(FastestLapBonusCalculator::new()),
            ],
        }
    }

    pub fn with_calculator(mut self, calculator: Arc<dyn PointsCalculator>) -> Self {
        self.calculators.push(calculator);
        self
    }

    pub fn build(mut self) -> PointsScorer {
        self.calculators.sort_by_key(|c| c.priority());
        PointsScorer {
            calculators: self.calculators,
        }
    }
}
