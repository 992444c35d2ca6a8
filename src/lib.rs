// Library crate for the race statistics server
// This file exposes the public API for integration tests

pub mod config;
pub mod data;
pub mod shared;
pub mod stats;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use data::{RaceDataRepository, Snapshot};
pub use shared::{AppError, AppState};
pub use stats::{DataSource, StatsBackend, StatsError, StatsService, StatsServiceFactory};
