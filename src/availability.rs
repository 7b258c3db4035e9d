//! Availability Classifier
//!
//! A player's game-day status comes from three relations consulted in a fixed
//! priority order. The rules live in `RULE_CHAIN` and are evaluated by one
//! short-circuiting loop: the first rule that yields a status wins and nothing
//! after it is queried.
//!
//! | rule            | relation                     | outcome on match       |
//! |-----------------|------------------------------|------------------------|
//! | `Injury`        | injuries                     | `Injured`              |
//! | `StartingToday` | todaysstarters               | `Starting`             |
//! | `TeamSchedule`  | players → todaysgames        | `NotPlaying` if no game|
//!
//! Falling off the end of the chain means the team plays today but neither
//! positive signal fired: `Unknown`.

use crate::db::gateway::StorageGateway;
use crate::db::statement::{Param, Statement};
use crate::error::{Result, RosterError};
use crate::player::PlayerId;
use crate::schema::RosterSchema;
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvailabilityStatus {
    Injured,
    Starting,
    NotPlaying,
    Unknown,
}

impl AvailabilityStatus {
    /// Wire label; `Unknown` is the empty string.
    pub fn label(&self) -> &'static str {
        match self {
            AvailabilityStatus::Injured => "Injured",
            AvailabilityStatus::Starting => "Player is starting",
            AvailabilityStatus::NotPlaying => "Team is not playing",
            AvailabilityStatus::Unknown => "",
        }
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for AvailabilityStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Injury,
    StartingToday,
    TeamSchedule,
}

/// Highest priority first. Injury overrides a same-day starting assignment.
pub const RULE_CHAIN: [Rule; 3] = [Rule::Injury, Rule::StartingToday, Rule::TeamSchedule];

pub struct AvailabilityClassifier {
    gateway: Arc<dyn StorageGateway>,
    schema: Arc<RosterSchema>,
}

impl AvailabilityClassifier {
    pub fn new(gateway: Arc<dyn StorageGateway>, schema: Arc<RosterSchema>) -> Self {
        Self { gateway, schema }
    }

    /// Status of `player` on `day`. Any storage fault aborts the whole chain.
    pub async fn classify(&self, player: &PlayerId, day: NaiveDate) -> Result<AvailabilityStatus> {
        for rule in RULE_CHAIN {
            if let Some(status) = self.evaluate(rule, player, day).await? {
                debug!(player = %player, ?rule, ?status, "availability rule matched");
                return Ok(status);
            }
        }
        debug!(player = %player, "team plays today; status undetermined");
        Ok(AvailabilityStatus::Unknown)
    }

    /// One rule in isolation: `Some(status)` when it decides, `None` to fall through.
    pub async fn evaluate(
        &self,
        rule: Rule,
        player: &PlayerId,
        day: NaiveDate,
    ) -> Result<Option<AvailabilityStatus>> {
        let status = match rule {
            Rule::Injury => self
                .is_injured(player)
                .await?
                .then_some(AvailabilityStatus::Injured),
            Rule::StartingToday => self
                .is_starting(player, day)
                .await?
                .then_some(AvailabilityStatus::Starting),
            Rule::TeamSchedule => {
                let team = self.team_of(player).await?;
                (!self.team_plays(team, day).await?).then_some(AvailabilityStatus::NotPlaying)
            }
        };
        Ok(status)
    }

    async fn is_injured(&self, player: &PlayerId) -> Result<bool> {
        let injuries = &self.schema.injuries;
        let statement = Statement::select(&injuries.table)
            .columns([&injuries.player_column])
            .filter_eq(&injuries.player_column, player.param(self.schema.player_key))
            .limit(1);
        self.exists(&statement).await
    }

    async fn is_starting(&self, player: &PlayerId, day: NaiveDate) -> Result<bool> {
        let key = player.param(self.schema.player_key);
        self.exists(&self.schema.starters.probe(key, day)).await
    }

    /// The player's team. A player without one is an integrity fault, not "not playing".
    async fn team_of(&self, player: &PlayerId) -> Result<Param> {
        let players = &self.schema.players;
        let statement = Statement::select(&players.table)
            .columns([&players.team_column])
            .filter_eq(&players.player_column, player.param(self.schema.player_key));
        let rows = self.gateway.query_rows(&statement).await?;

        rows.first()
            .and_then(|row| row.get(players.team_column.as_str()))
            .and_then(Param::from_value)
            .ok_or_else(|| {
                error!(player = %player, "no team found for player");
                RosterError::DataAccess(format!("no team found for player {}", player))
            })
    }

    async fn team_plays(&self, team: Param, day: NaiveDate) -> Result<bool> {
        self.exists(&self.schema.games.probe(team, day)).await
    }

    async fn exists(&self, statement: &Statement) -> Result<bool> {
        Ok(!self.gateway.query_rows(statement).await?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryGateway;
    use serde_json::json;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 4).unwrap()
    }

    fn store() -> MemoryGateway {
        MemoryGateway::new()
            .with_table("injuries", vec![json!({"PlayerRefID": 1})])
            .with_table("todaysstarters", vec![json!({"PlayerRefID1": 1}), json!({"PlayerRefID1": 4})])
            .with_table(
                "players",
                vec![
                    json!({"PlayerRefID": 1, "TeamID": 10}),
                    json!({"PlayerRefID": 2, "TeamID": 20}),
                    json!({"PlayerRefID": 3, "TeamID": 30}),
                    json!({"PlayerRefID": 4, "TeamID": 30}),
                    json!({"PlayerRefID": 5, "TeamID": null}),
                ],
            )
            .with_table("todaysgames", vec![json!({"TeamID": 10}), json!({"TeamID": 20})])
    }

    fn classifier(gateway: Arc<MemoryGateway>) -> AvailabilityClassifier {
        AvailabilityClassifier::new(gateway, Arc::new(RosterSchema::default()))
    }

    async fn classify(gateway: &Arc<MemoryGateway>, player: &str) -> Result<AvailabilityStatus> {
        classifier(gateway.clone())
            .classify(&PlayerId::new(player).unwrap(), day())
            .await
    }

    #[test]
    fn test_labels() {
        assert_eq!(AvailabilityStatus::Injured.label(), "Injured");
        assert_eq!(AvailabilityStatus::Starting.label(), "Player is starting");
        assert_eq!(AvailabilityStatus::NotPlaying.label(), "Team is not playing");
        assert_eq!(AvailabilityStatus::Unknown.label(), "");
        assert_eq!(serde_json::to_string(&AvailabilityStatus::Unknown).unwrap(), "\"\"");
    }

    #[tokio::test]
    async fn test_injury_short_circuits_everything_else() {
        let gateway = Arc::new(store());
        assert_eq!(classify(&gateway, "1").await.unwrap(), AvailabilityStatus::Injured);
        assert_eq!(gateway.queried_tables(), vec!["injuries".to_string()]);
    }

    #[tokio::test]
    async fn test_starting_skips_schedule_lookups() {
        let gateway = Arc::new(store());
        // team 30 has no game, but the starting row decides first
        assert_eq!(classify(&gateway, "4").await.unwrap(), AvailabilityStatus::Starting);
        assert_eq!(
            gateway.queried_tables(),
            vec!["injuries".to_string(), "todaysstarters".to_string()]
        );
    }

    #[tokio::test]
    async fn test_team_without_game_is_not_playing() {
        let gateway = Arc::new(store());
        assert_eq!(classify(&gateway, "3").await.unwrap(), AvailabilityStatus::NotPlaying);
        assert_eq!(
            gateway.queried_tables(),
            vec!["injuries", "todaysstarters", "players", "todaysgames"]
        );
    }

    #[tokio::test]
    async fn test_team_with_game_is_unknown() {
        let gateway = Arc::new(store());
        assert_eq!(classify(&gateway, "2").await.unwrap(), AvailabilityStatus::Unknown);
    }

    #[tokio::test]
    async fn test_missing_team_is_a_fault() {
        let gateway = Arc::new(store());
        assert!(classify(&gateway, "99").await.unwrap_err().is_data_access());
        assert!(classify(&gateway, "5").await.unwrap_err().is_data_access());
    }

    #[tokio::test]
    async fn test_fault_mid_chain_aborts() {
        let gateway = Arc::new(store());
        gateway.fail_on("todaysstarters");
        assert!(classify(&gateway, "2").await.unwrap_err().is_data_access());
        assert!(!gateway.queried_tables().contains(&"players".to_string()));
    }

    #[tokio::test]
    async fn test_rules_evaluate_in_isolation() {
        let gateway = Arc::new(store());
        let classifier = classifier(gateway.clone());
        let injured = PlayerId::new("1").unwrap();

        assert_eq!(
            classifier.evaluate(Rule::StartingToday, &injured, day()).await.unwrap(),
            Some(AvailabilityStatus::Starting)
        );
        assert_eq!(
            classifier.evaluate(Rule::TeamSchedule, &injured, day()).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_day_column_scopes_schedule() {
        let gateway = Arc::new(
            MemoryGateway::new()
                .with_table("injuries", Vec::new())
                .with_table("todaysstarters", Vec::new())
                .with_table("players", vec![json!({"PlayerRefID": 2, "TeamID": 20})])
                .with_table(
                    "todaysgames",
                    vec![json!({"TeamID": 20, "GameDate": "2024-07-03"})],
                ),
        );
        let mut schema = RosterSchema::default();
        schema.games.day_column = Some(crate::db::statement::Identifier::from_static("GameDate"));
        let classifier = AvailabilityClassifier::new(gateway, Arc::new(schema));

        let status = classifier
            .classify(&PlayerId::new("2").unwrap(), day())
            .await
            .unwrap();
        assert_eq!(status, AvailabilityStatus::NotPlaying);
    }
}
