//! Orchestration migration
//!
//! Precondition check, the two-pass migrator and its bookkeeping.

pub mod executor;
pub mod id_map;
pub mod precheck;
pub mod report;

pub use executor::Migrator;
pub use id_map::IdMap;
pub use precheck::check_destination_empty;
pub use report::{DanglingReference, FixOutcome, MigratedOrchestration, MigrationReport};
