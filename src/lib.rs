pub mod api;
pub mod availability;
pub mod config;
pub mod db;
pub mod demo;
pub mod error;
pub mod pipeline;
pub mod player;
pub mod projection;
pub mod record;
pub mod roster;
pub mod schema;

pub use availability::{AvailabilityClassifier, AvailabilityStatus, Rule, RULE_CHAIN};
pub use error::{Result, RosterError};
pub use pipeline::{PlayerStatus, StatusPipeline};
pub use player::PlayerId;
pub use projection::{ColumnMetadataEntry, Projection, ProjectionResolver};
pub use record::{PlayerStatRecord, RecordFetcher};
pub use schema::RosterSchema;
