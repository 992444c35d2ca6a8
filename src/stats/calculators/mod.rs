mod base_points;
mod fastest_lap_bonus;

pub use base_points::{points_for, race_points, sprint_points, BasePointsCalculator};
pub use fastest_lap_bonus::{
    earns_fastest_lap_bonus, FastestLapBonusCalculator, BONUS_POSITION_LIMIT,
};
