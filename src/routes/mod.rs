use crate::{app::AppState, domain::errors::ApiError, repository::count_users};
use axum::{extract::State, Json};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use std::sync::Arc;

pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let users = count_users(&state.get_db())?;
    Ok(Json(json!( {
        "message": "API up!",
        "users": users,
    })))
}

/// Reads a body field the way a loosely typed client sends it: strings pass
/// through, numbers and booleans become their text, anything else is absent.
/// Never fails, so a badly typed field cannot reject the whole body.
pub(crate) fn lenient_string<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s.into()),
        Some(Value::Number(n)) => Some(n.to_string().into()),
        Some(Value::Bool(b)) => Some(b.to_string().into()),
        _ => None,
    })
}

pub mod auth;
pub mod event;
pub mod referral;
pub mod user;
