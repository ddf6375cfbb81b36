pub mod health;
pub mod migrate;
pub mod relay;
pub mod scheduler;

pub use health::{Backpressure, HealthMonitor, Target};
pub use migrate::{BulkMigrator, MigrationReport};
pub use relay::TickerRelay;
pub use scheduler::{Scheduler, Tick};
