//! Roster listing: active position players and their batting lines

use crate::db::gateway::{Row, StorageGateway};
use crate::db::statement::{Param, Statement};
use crate::error::{Result, RosterError};
use crate::schema::RosterSchema;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerType {
    All,
    Position(String),
}

impl PlayerType {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim() {
            "" => Err(RosterError::BadRequest("player type is required".to_string())),
            "all" => Ok(PlayerType::All),
            position => Ok(PlayerType::Position(position.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerList {
    pub players: Vec<Row>,
}

pub struct RosterService {
    gateway: Arc<dyn StorageGateway>,
    schema: Arc<RosterSchema>,
}

impl RosterService {
    pub fn new(gateway: Arc<dyn StorageGateway>, schema: Arc<RosterSchema>) -> Self {
        Self { gateway, schema }
    }

    /// Non-deleted players outside the excluded (pitching) positions.
    fn eligible_players(&self) -> Statement {
        let players = &self.schema.players;
        self.schema.excluded_positions.iter().fold(
            Statement::select(&players.table).filter_eq(&players.deleted_column, Param::Int(0)),
            |statement, position| {
                statement.filter_ne(&players.position_column, Param::Text(position.clone()))
            },
        )
    }

    pub async fn list_players(&self, player_type: &PlayerType) -> Result<PlayerList> {
        let statement = match player_type {
            PlayerType::All => self.eligible_players(),
            PlayerType::Position(position) => self
                .eligible_players()
                .filter_eq(&self.schema.players.position_column, Param::Text(position.clone())),
        };
        let players = self.gateway.query_rows(&statement).await?;
        debug!(?player_type, count = players.len(), "listed players");
        Ok(PlayerList { players })
    }

    /// Batting rows of every eligible player.
    pub async fn extended_search(&self) -> Result<PlayerList> {
        let players = &self.schema.players;
        let ids = self
            .gateway
            .query_rows(&self.eligible_players().columns([&players.player_column]))
            .await?
            .iter()
            .filter_map(|row| row.get(players.player_column.as_str()).and_then(Param::from_value))
            .collect::<Vec<_>>();

        if ids.is_empty() {
            return Ok(PlayerList { players: Vec::new() });
        }

        let batting = &self.schema.batting;
        let statement = Statement::select(&batting.table).filter_in(&batting.player_column, ids);
        let players = self.gateway.query_rows(&statement).await?;
        debug!(count = players.len(), "extended search");
        Ok(PlayerList { players })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryGateway;
    use serde_json::json;

    fn service() -> (Arc<MemoryGateway>, RosterService) {
        let gateway = Arc::new(
            MemoryGateway::new()
                .with_table(
                    "players",
                    vec![
                        json!({"PlayerRefID": 1, "Position1": "SS", "Deleted": 0}),
                        json!({"PlayerRefID": 2, "Position1": "SP", "Deleted": 0}),
                        json!({"PlayerRefID": 3, "Position1": "CF", "Deleted": 0}),
                        json!({"PlayerRefID": 4, "Position1": "SS", "Deleted": 1}),
                        json!({"PlayerRefID": 5, "Position1": "RP", "Deleted": 0}),
                    ],
                )
                .with_table(
                    "yearlystatsbatting",
                    vec![
                        json!({"PlayerRefID": 1, "HR": 12}),
                        json!({"PlayerRefID": 2, "HR": 0}),
                        json!({"PlayerRefID": 3, "HR": 30}),
                    ],
                ),
        );
        let service = RosterService::new(gateway.clone(), Arc::new(RosterSchema::default()));
        (gateway, service)
    }

    fn ids(list: &PlayerList) -> Vec<i64> {
        list.players.iter().filter_map(|p| p.get_i64("PlayerRefID")).collect()
    }

    #[test]
    fn test_parse_player_type() {
        assert_eq!(PlayerType::parse("all").unwrap(), PlayerType::All);
        assert_eq!(PlayerType::parse("SS").unwrap(), PlayerType::Position("SS".into()));
        assert!(PlayerType::parse(" ").is_err());
    }

    #[tokio::test]
    async fn test_all_excludes_pitchers_and_deleted() {
        let (_, service) = service();
        let list = service.list_players(&PlayerType::All).await.unwrap();
        assert_eq!(ids(&list), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_position_filter() {
        let (_, service) = service();
        let list = service.list_players(&PlayerType::Position("SS".into())).await.unwrap();
        assert_eq!(ids(&list), vec![1]);

        // pitchers stay excluded even when asked for by name
        let list = service.list_players(&PlayerType::Position("SP".into())).await.unwrap();
        assert!(list.players.is_empty());
    }

    #[tokio::test]
    async fn test_extended_search_returns_eligible_batting_rows() {
        let (_, service) = service();
        let list = service.extended_search().await.unwrap();
        assert_eq!(ids(&list), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_extended_search_fault() {
        let (gateway, service) = service();
        gateway.fail_on("yearlystatsbatting");
        assert!(service.extended_search().await.unwrap_err().is_data_access());
    }
}
