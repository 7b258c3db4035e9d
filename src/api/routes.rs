//! Route table for the roster API

use crate::api::http::{Request, Response};
use crate::db::gateway::StorageGateway;
use crate::error::RosterError;
use crate::pipeline::StatusPipeline;
use crate::player::PlayerId;
use crate::roster::{PlayerType, RosterService};
use crate::schema::RosterSchema;
use std::sync::Arc;
use tracing::{error, warn};

const ROSTER_FAILURE: &str = "Error fetching data";
const STATUS_FAILURE: &str = "Error fetching player record";

pub struct Router {
    pipeline: StatusPipeline,
    roster: RosterService,
}

impl Router {
    pub fn new(gateway: Arc<dyn StorageGateway>, schema: Arc<RosterSchema>) -> Self {
        Self {
            pipeline: StatusPipeline::new(gateway.clone(), schema.clone()),
            roster: RosterService::new(gateway, schema),
        }
    }

    pub async fn handle(&self, request: &Request) -> Response {
        let segments = request.segments();
        match (request.method.as_str(), segments.as_slice()) {
            ("OPTIONS", _) => Response::empty(200),
            ("GET", ["api", "health"]) => {
                Response::json(200, &serde_json::json!({"status": "ok", "service": "roster-status"}))
            }
            ("GET", ["api", "all-players"]) => self.all_players("all").await,
            ("GET", ["api", "all-players", player_type]) => self.all_players(player_type).await,
            ("GET", ["api", "extended-search"]) => match self.roster.extended_search().await {
                Ok(list) => Response::json(200, &list),
                Err(e) => failure(&e, ROSTER_FAILURE),
            },
            ("GET", ["api", "player-stats", player_ref]) => self.player_stats(player_ref).await,
            _ => {
                warn!(method = %request.method, path = %request.path, "route not found");
                let err = RosterError::NotFound(format!(
                    "Endpoint not found: {} {}",
                    request.method, request.path
                ));
                Response::from_error(&err, "")
            }
        }
    }

    async fn all_players(&self, raw_type: &str) -> Response {
        let result = match PlayerType::parse(raw_type) {
            Ok(player_type) => self.roster.list_players(&player_type).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(list) => Response::json(200, &list),
            Err(e) => failure(&e, ROSTER_FAILURE),
        }
    }

    async fn player_stats(&self, player_ref: &str) -> Response {
        let result = match PlayerId::new(player_ref) {
            Ok(player) => self.pipeline.player_status(&player).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(status) => Response::json(200, &status),
            Err(e) => failure(&e, STATUS_FAILURE),
        }
    }
}

fn failure(err: &RosterError, message: &str) -> Response {
    if err.status_code() >= 500 {
        error!("{}: {}", message, err);
    }
    Response::from_error(err, message)
}
