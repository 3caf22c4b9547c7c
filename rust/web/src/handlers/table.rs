use crate::errors::ErrorResponse;
use crate::session::SessionManager;
use bjtrain_engine::levels;
use bjtrain_engine::rules::Rules;
use bjtrain_engine::strategy::StrategyTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Reply;

/// Query string for GET /api/table.
#[derive(Debug, Deserialize)]
pub struct TableQuery {
    pub decks: Option<usize>,
    pub level: Option<u8>,
}

#[derive(Debug, Serialize)]
struct TableRow {
    key: String,
    actions: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
struct TableResponse {
    decks: usize,
    rows: Vec<TableRow>,
    exceptions: Vec<String>,
}

/// Returns a strategy chart as JSON.
///
/// - **Method**: GET
/// - **Path**: `/api/table?decks=1&level=2`
///
/// `decks` selects the chart (1 or 6, default 1); `level` restricts the
/// rows to one skill level. Exception descriptions ride along so clients
/// can annotate the chart.
pub async fn get_table(sessions: Arc<SessionManager>, query: TableQuery) -> Response {
    let decks = query.decks.unwrap_or(1);
    if decks != 1 && decks != 6 {
        return ErrorResponse::new("invalid_rules", format!("decks must be 1 or 6, got {}", decks))
            .into_response(StatusCode::BAD_REQUEST);
    }

    let filter = match query.level {
        Some(0) | None => None,
        Some(level) => match levels::keys_for_level(level) {
            Ok(keys) => Some(keys),
            Err(err) => {
                return ErrorResponse::new("invalid_rules", err.to_string())
                    .into_response(StatusCode::BAD_REQUEST);
            }
        },
    };

    let rules = Rules {
        num_decks: decks,
        ..Rules::default()
    };
    let path = sessions.data_dir().join(rules.strategy_file());
    let table = match StrategyTable::load(&path) {
        Ok(table) => table,
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "failed to load strategy table");
            return ErrorResponse::new("engine_error", err.to_string())
                .into_response(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let rows: Vec<TableRow> = table
        .row_keys()
        .iter()
        .filter(|key| {
            filter
                .as_ref()
                .is_none_or(|set| set.contains(key.as_str()))
        })
        .map(|key| {
            let mut actions = BTreeMap::new();
            for dealer in StrategyTable::DEALER_CARDS {
                if let Some(action) = table.action(key, dealer) {
                    actions.insert(dealer.to_string(), action.code().to_string());
                }
            }
            TableRow {
                key: key.clone(),
                actions,
            }
        })
        .collect();

    let exceptions = table
        .exceptions()
        .iter()
        .map(|exc| exc.description.clone())
        .collect();

    let body = TableResponse {
        decks,
        rows,
        exceptions,
    };
    warp::reply::with_status(warp::reply::json(&body), StatusCode::OK).into_response()
}
