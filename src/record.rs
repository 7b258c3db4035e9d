//! Record Fetcher: one season-statistics row for one player

use crate::db::gateway::{Row, StorageGateway};
use crate::db::statement::{KeyType, Statement};
use crate::error::Result;
use crate::player::PlayerId;
use crate::projection::Projection;
use crate::schema::StatTableSchema;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Season statistics keyed by the projection's columns, in projection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStatRecord {
    row: Row,
}

impl PlayerStatRecord {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.row.get(column)
    }

    pub fn columns(&self) -> Vec<&str> {
        self.row.columns().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.row.is_empty()
    }
}

impl From<Row> for PlayerStatRecord {
    fn from(row: Row) -> Self {
        Self { row }
    }
}

impl Serialize for PlayerStatRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.row.serialize(serializer)
    }
}

pub struct RecordFetcher {
    gateway: Arc<dyn StorageGateway>,
    table: StatTableSchema,
    player_key: KeyType,
}

impl RecordFetcher {
    pub fn new(
        gateway: Arc<dyn StorageGateway>,
        table: StatTableSchema,
        player_key: KeyType,
    ) -> Self {
        Self { gateway, table, player_key }
    }

    /// First row for `player`, restricted to `projection`, or `None` when the
    /// player has no row.
    pub async fn fetch(
        &self,
        player: &PlayerId,
        projection: &Projection,
    ) -> Result<Option<PlayerStatRecord>> {
        if projection.is_empty() {
            return self.probe_existence(player).await;
        }

        let statement = Statement::select(&self.table.table)
            .columns(projection.columns())
            .filter_eq(&self.table.player_column, player.param(self.player_key));
        let rows = self.gateway.query_rows(&statement).await?;

        if rows.len() > 1 {
            warn!(
                player = %player,
                rows = rows.len(),
                table = %self.table.table,
                "multiple season rows for one player; using the first"
            );
        }

        let record: Option<PlayerStatRecord> = rows.into_iter().next().map(|row| {
            // Key by the projection's spelling, whatever case the driver reports.
            projection
                .columns()
                .iter()
                .zip(row.into_pairs())
                .map(|(column, (_, value))| (column.to_string(), value))
                .collect::<Row>()
                .into()
        });
        debug!(player = %player, found = record.is_some(), "season record fetched");
        Ok(record)
    }

    // Nothing to select, but "absent" must still mean there is no row.
    async fn probe_existence(&self, player: &PlayerId) -> Result<Option<PlayerStatRecord>> {
        let statement = Statement::select(&self.table.table)
            .columns([&self.table.player_column])
            .filter_eq(&self.table.player_column, player.param(self.player_key))
            .limit(1);
        let rows = self.gateway.query_rows(&statement).await?;
        Ok(rows.first().map(|_| PlayerStatRecord::default()))
    }
}
