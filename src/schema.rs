//! Relation and column names the service reads
//!
//! Defaults match the production MySQL-era layout (`dictionarydata`,
//! `yearlystatsbatting`, `todaysstarters`, ...). A JSON file can override any
//! part of it; every name is validated as an identifier on load.

use crate::db::statement::{Identifier, KeyType, Param, Statement};
use crate::error::{Result, RosterError};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RosterSchema {
    pub dictionary: DictionarySchema,
    pub batting: StatTableSchema,
    pub injuries: PlayerRelation,
    pub starters: DayScopedRelation,
    pub players: PlayersSchema,
    pub games: DayScopedRelation,
    /// `Position1` values excluded from roster listings (pitchers).
    pub excluded_positions: Vec<String>,
    /// Type of the player reference columns (`PlayerRefID`, `PlayerRefID1`).
    pub player_key: KeyType,
}

/// Column metadata relation: which fields of which table are active, and in what order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DictionarySchema {
    pub table: Identifier,
    pub table_name_column: Identifier,
    pub field_name_column: Identifier,
    pub active_column: Identifier,
    pub order_column: Identifier,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatTableSchema {
    /// Name the dictionary uses for this table.
    pub logical_name: String,
    pub table: Identifier,
    pub player_column: Identifier,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerRelation {
    pub table: Identifier,
    pub player_column: Identifier,
}

/// A relation whose rows only count for one game day.
///
/// Without `day_column` the relation is assumed to hold today's rows only, which
/// is how the nightly loader maintains `todaysstarters` and `todaysgames`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DayScopedRelation {
    pub table: Identifier,
    pub key_column: Identifier,
    #[serde(default)]
    pub day_column: Option<Identifier>,
}

impl DayScopedRelation {
    /// Existence probe for `key` on `day`.
    pub fn probe(&self, key: Param, day: NaiveDate) -> Statement {
        let statement = Statement::select(&self.table)
            .columns([&self.key_column])
            .filter_eq(&self.key_column, key);
        let statement = match &self.day_column {
            Some(column) => statement.filter_eq(column, Param::Date(day)),
            None => statement,
        };
        statement.limit(1)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayersSchema {
    pub table: Identifier,
    pub player_column: Identifier,
    pub team_column: Identifier,
    pub deleted_column: Identifier,
    pub position_column: Identifier,
}

impl Default for RosterSchema {
    fn default() -> Self {
        Self {
            dictionary: DictionarySchema {
                table: Identifier::from_static("dictionarydata"),
                table_name_column: Identifier::from_static("TableName"),
                field_name_column: Identifier::from_static("FieldNameX"),
                active_column: Identifier::from_static("Verify"),
                order_column: Identifier::from_static("Order"),
            },
            batting: StatTableSchema {
                logical_name: "YearlyStatsBatting".to_string(),
                table: Identifier::from_static("yearlystatsbatting"),
                player_column: Identifier::from_static("PlayerRefID"),
            },
            injuries: PlayerRelation {
                table: Identifier::from_static("injuries"),
                player_column: Identifier::from_static("PlayerRefID"),
            },
            starters: DayScopedRelation {
                table: Identifier::from_static("todaysstarters"),
                key_column: Identifier::from_static("PlayerRefID1"),
                day_column: None,
            },
            players: PlayersSchema {
                table: Identifier::from_static("players"),
                player_column: Identifier::from_static("PlayerRefID"),
                team_column: Identifier::from_static("TeamID"),
                deleted_column: Identifier::from_static("Deleted"),
                position_column: Identifier::from_static("Position1"),
            },
            games: DayScopedRelation {
                table: Identifier::from_static("todaysgames"),
                key_column: Identifier::from_static("TeamID"),
                day_column: None,
            },
            excluded_positions: vec!["RP".to_string(), "SP".to_string()],
            player_key: KeyType::Integer,
        }
    }
}

impl RosterSchema {
    /// Load overrides from a JSON file; sections left out keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let schema: Self = serde_json::from_str(&content)
            .map_err(|e| RosterError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(schema)
    }
}
