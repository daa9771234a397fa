use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

#[derive(Debug)]
pub enum DatabaseError {
    ServerError,
    ReferralCodeExhausted,
}

#[derive(Debug)]
pub enum ApiError {
    InvalidCredentials,
    UserNotFound,
    InvalidReferral,
    ServerError,
}

impl From<DatabaseError> for ApiError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::ServerError | DatabaseError::ReferralCodeExhausted => Self::ServerError,
        }
    }
}

impl ApiError {
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            Self::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            Self::InvalidReferral => (StatusCode::NOT_FOUND, "Invalid referral"),
            Self::ServerError => (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = self.status_and_message();

        let body = Json(json!({
            "message": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_surface_as_server_errors() {
        for err in [DatabaseError::ServerError, DatabaseError::ReferralCodeExhausted] {
            let api: ApiError = err.into();
            assert_eq!(
                api.status_and_message().0,
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            ApiError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::UserNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InvalidReferral.into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
