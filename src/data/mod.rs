pub mod models;
pub mod repository;
pub mod snapshot;

pub use models::*;
pub use repository::{
    InMemoryRaceDataRepository, PostgresRaceDataRepository, RaceDataRepository, SessionFilter,
};
pub use snapshot::{Snapshot, SnapshotBuilder};
