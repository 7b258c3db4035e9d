//! Status Pipeline
//!
//! Composes projection resolution, record fetch and availability classification
//! into the combined per-player response. The projection must be resolved before
//! the fetch; fetch and classification are independent and run concurrently.

use crate::availability::{AvailabilityClassifier, AvailabilityStatus};
use crate::db::gateway::StorageGateway;
use crate::error::Result;
use crate::player::PlayerId;
use crate::projection::ProjectionResolver;
use crate::record::{PlayerStatRecord, RecordFetcher};
use crate::schema::RosterSchema;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Combined response. A missing record and the status are independent outcomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStatus {
    #[serde(rename = "playerRecords")]
    pub record: Option<PlayerStatRecord>,
    pub status: AvailabilityStatus,
}

pub struct StatusPipeline {
    resolver: ProjectionResolver,
    fetcher: RecordFetcher,
    classifier: AvailabilityClassifier,
    stats_table: String,
}

impl StatusPipeline {
    pub fn new(gateway: Arc<dyn StorageGateway>, schema: Arc<RosterSchema>) -> Self {
        Self {
            resolver: ProjectionResolver::new(gateway.clone(), schema.dictionary.clone()),
            fetcher: RecordFetcher::new(gateway.clone(), schema.batting.clone(), schema.player_key),
            classifier: AvailabilityClassifier::new(gateway, schema.clone()),
            stats_table: schema.batting.logical_name.clone(),
        }
    }

    /// Season batting record and today's availability for `player`.
    pub async fn player_status(&self, player: &PlayerId) -> Result<PlayerStatus> {
        let today = Local::now().date_naive();
        self.player_status_on(player, today).await
    }

    /// Same as `player_status`, with the game day pinned. Every check in one
    /// invocation sees the same day.
    pub async fn player_status_on(
        &self,
        player: &PlayerId,
        day: NaiveDate,
    ) -> Result<PlayerStatus> {
        let projection = self.resolver.resolve(&self.stats_table).await?;

        let (record, status) = tokio::try_join!(
            self.fetcher.fetch(player, &projection),
            self.classifier.classify(player, day)
        )?;

        info!(
            player = %player,
            columns = projection.len(),
            record = record.is_some(),
            status = ?status,
            "player status resolved"
        );
        Ok(PlayerStatus { record, status })
    }
}
