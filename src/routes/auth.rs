use super::lenient_string;
use crate::{
    app::AppState,
    domain::{
        errors::ApiError,
        events::AppEvent,
        fields::{Password, ReferralCode, User, Username},
    },
    repository::{create_new_user, get_user_by_credentials},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    username: Option<Username>,
    #[serde(default, deserialize_with = "lenient_string")]
    password: Option<Password>,
    #[serde(default, deserialize_with = "lenient_string")]
    referral_code: Option<ReferralCode>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    message: &'static str,
    referral_code: ReferralCode,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    // Registration never rejects a body; absent fields are stored empty.
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let username = payload.username.unwrap_or_default();
    tracing::info!("registering user >>> {}", username);

    // Empty strings count as "no referral code".
    let referred_by = payload.referral_code.filter(|c| !c.as_ref().is_empty());

    let user = create_new_user(
        &state.get_db(),
        username,
        payload.password.unwrap_or_default(),
        referred_by,
        state.config.referral.max_code_attempts,
    )?;
    tracing::debug!("user {} got referral code {}", user.id, user.referral_code);

    state.publish(AppEvent::NewRegister((&user).into()));

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered",
            referral_code: user.referral_code,
        }),
    ))
}

#[derive(Deserialize, Default)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    username: Option<Username>,
    #[serde(default, deserialize_with = "lenient_string")]
    password: Option<Password>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    message: &'static str,
    user: User,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Json<LoginResponse>, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let (username, password) = match (payload.username, payload.password) {
        (Some(username), Some(password)) => (username, password),
        _ => {
            tracing::warn!("login attempt with missing credentials");
            return Err(ApiError::InvalidCredentials);
        }
    };

    tracing::info!("authenticating user >>> {}", username);
    let user = get_user_by_credentials(&state.get_db(), &username, &password)?.ok_or_else(|| {
        tracing::warn!("invalid credentials for >>> {}", username);
        ApiError::InvalidCredentials
    })?;

    state.publish(AppEvent::NewLogin((&user).into()));

    Ok(Json(LoginResponse {
        message: "Login successful",
        user,
    }))
}
