pub mod assertions;
pub mod fixtures;
pub mod postgres;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use assertions::assert_services_agree;
#[allow(unused_imports)]
pub use fixtures::{championship_snapshot, date, race_result};
#[allow(unused_imports)]
pub use postgres::PostgresTestDb;
#[allow(unused_imports)]
pub use setup::{BackendPair, TestApp};
