pub mod calculators;
pub mod career;
pub mod factory;
pub mod format;
pub mod handlers;
pub mod ranking;
pub mod scoring;
pub mod service;
pub mod standings;
pub mod view_service;
pub mod views;

mod errors;
pub mod models;

pub use errors::{validate_year, StatsError};
pub use factory::{DataSource, StatsBackend, StatsServiceFactory};
pub use models::*;
pub use scoring::PointsScorer;
pub use service::{QueryStatsService, StatsService};
pub use view_service::ViewStatsService;

use crate::data::{SessionResult, SessionType};

/// Priority constants for points calculators.
/// Lower values run first. Later calculators receive the running
/// total produced by earlier ones.
pub mod calculator_priority {
    /// Position table points
    pub const BASE_POINTS: u32 = 100;
    /// Bonuses on top of the table (fastest lap)
    pub const BONUS: u32 = 200;
}

pub trait PointsCalculator: Send + Sync {
    fn calculate(&self, result: &SessionResult, context: &CalculationContext) -> i32;

    fn priority(&self) -> u32;
}

pub struct CalculationContext {
    pub session_type: SessionType,
    pub fastest_lap_driver: Option<i32>,
    pub current_points: i32,
}

impl CalculationContext {
    pub fn new(
        session_type: SessionType,
        fastest_lap_driver: Option<i32>,
        current_points: i32,
    ) -> Self {
        Self {
            session_type,
            fastest_lap_driver,
            current_points,
        }
    }
}
