use std::sync::Arc;

use super::lenient_string;
use crate::{
    app::AppState,
    domain::{
        errors::ApiError,
        events::{AppEvent, NewReferralEvent},
        fields::{ReferralCode, UserId},
    },
    repository::apply_referral,
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReferRequest {
    #[serde(default)]
    user_id: Value,
    #[serde(default, deserialize_with = "lenient_string")]
    referral_code: Option<ReferralCode>,
}

#[derive(Serialize)]
pub struct ReferResponse {
    message: &'static str,
}

pub async fn refer(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<ReferRequest>>,
) -> Result<Json<ReferResponse>, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let bonus = state.config.referral.bonus;
    tracing::info!(
        "applying referral >>> user {} code {:?}",
        payload.user_id,
        payload.referral_code
    );

    // An id or code that cannot name anything is just another unknown referral.
    let (user_id, code) = match (
        UserId::from_json_loose(&payload.user_id),
        payload.referral_code,
    ) {
        (Some(user_id), Some(code)) => (user_id, code),
        _ => {
            tracing::warn!("unresolvable referral >>> user {}", payload.user_id);
            return Err(ApiError::InvalidReferral);
        }
    };

    let credit = apply_referral(&state.get_db(), user_id, &code, bonus)?.ok_or_else(|| {
        tracing::warn!("invalid referral >>> user {} code {}", user_id, code);
        ApiError::InvalidReferral
    })?;

    state.publish(AppEvent::NewReferral(NewReferralEvent {
        referrer: credit.referrer.username,
        referred_user: credit.referred_user.username,
        bonus,
    }));

    Ok(Json(ReferResponse {
        message: "Referral added",
    }))
}
