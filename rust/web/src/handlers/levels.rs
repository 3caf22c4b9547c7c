use bjtrain_engine::levels;
use serde::Serialize;
use warp::reply::{self, Response};
use warp::Reply;

#[derive(Debug, Serialize)]
struct LevelInfo {
    level: u8,
    name: &'static str,
    hands: usize,
    keys: Vec<&'static str>,
}

/// Lists the skill levels with the strategy keys each one drills.
///
/// - **Method**: GET
/// - **Path**: `/api/levels`
///
/// Level 0 is the union of the others, so its `keys` list is the
/// concatenation of levels 1-4 in drill order.
pub async fn list_levels() -> Response {
    let mut body = Vec::with_capacity(usize::from(levels::MAX_LEVEL) + 1);

    let mut all_keys = Vec::new();
    for level in 1..=levels::MAX_LEVEL {
        if let Ok(keys) = levels::level_keys(level) {
            all_keys.extend_from_slice(keys);
        }
    }
    body.push(LevelInfo {
        level: 0,
        name: levels::level_name(0).unwrap_or("All Hands"),
        hands: all_keys.len(),
        keys: all_keys,
    });

    for level in 1..=levels::MAX_LEVEL {
        let name = levels::level_name(level).unwrap_or("");
        let keys: Vec<&'static str> = levels::level_keys(level)
            .map(|keys| keys.to_vec())
            .unwrap_or_default();
        body.push(LevelInfo {
            level,
            name,
            hands: keys.len(),
            keys,
        });
    }

    reply::json(&body).into_response()
}
