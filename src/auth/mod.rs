mod login;
mod register;
mod store;

use axum::{routing::post, Router};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult, AppState};

pub use login::login;
pub use register::register;
pub use store::{Credentials, StoreError};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register::register))
        .route("/login", post(login::login))
}

/// Body of both auth requests. Fields are optional so that absent ones
/// surface as a 400 rather than an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct AuthForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl AuthForm {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: Some(username.to_owned()),
            password: Some(password.to_owned()),
        }
    }

    pub(crate) fn fields(self) -> AppResult<(String, String)> {
        // whitespace-only counts as absent, not just the empty string
        let present = |field: Option<String>| field.filter(|value| !value.trim().is_empty());

        match (present(self.username), present(self.password)) {
            (Some(username), Some(password)) => Ok((username, password)),
            _ => Err(AppError::MissingFields),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthReply {
    pub success: bool,
    pub message: &'static str,
}

impl AuthReply {
    pub(crate) fn ok(message: &'static str) -> Self {
        Self { success: true, message }
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

    use super::*;
    use crate::db;

    async fn credentials() -> Credentials {
        Credentials::new(db::memory_pool().await)
    }

    fn status(result: AppResult<Json<AuthReply>>) -> StatusCode {
        match result {
            Ok(reply) => reply.into_response().status(),
            Err(err) => err.into_response().status(),
        }
    }

    #[test]
    fn blank_fields_are_missing() {
        assert!(matches!(AuthForm::default().fields(), Err(AppError::MissingFields)));
        assert!(matches!(AuthForm::new("alice", "  ").fields(), Err(AppError::MissingFields)));
        assert_eq!(
            AuthForm::new("alice", "pw").fields().unwrap(),
            ("alice".to_owned(), "pw".to_owned())
        );
    }

    #[tokio::test]
    async fn register_then_duplicate() {
        let store = credentials().await;

        let first = register(State(store.clone()), Ok(Json(AuthForm::new("alice", "pw")))).await;
        assert_eq!(status(first), StatusCode::OK);

        let second = register(State(store), Ok(Json(AuthForm::new("alice", "pw")))).await;
        assert!(matches!(second, Err(AppError::UserExists)));
    }

    #[tokio::test]
    async fn register_requires_fields() {
        let store = credentials().await;

        let result = register(
            State(store),
            Ok(Json(AuthForm { username: Some("alice".to_owned()), password: None })),
        )
        .await;
        assert!(matches!(result, Err(AppError::MissingFields)));
    }

    #[tokio::test]
    async fn login_unknown_user_is_invalid() {
        let store = credentials().await;

        let result = login(State(store), Ok(Json(AuthForm::new("ghost", "pw")))).await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_after_register() {
        let store = credentials().await;
        register(State(store.clone()), Ok(Json(AuthForm::new("alice", "pw")))).await.unwrap();

        let ok = login(State(store.clone()), Ok(Json(AuthForm::new("alice", "pw")))).await;
        assert_eq!(status(ok), StatusCode::OK);

        let wrong = login(State(store), Ok(Json(AuthForm::new("alice", "nope")))).await;
        assert_eq!(status(wrong), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn storage_errors_are_500() {
        let db_pool = db::memory_pool().await;
        sqlx::query("DROP TABLE users").execute(&db_pool).await.unwrap();
        let store = Credentials::new(db_pool);

        let result = login(State(store), Ok(Json(AuthForm::new("alice", "pw")))).await;
        assert_eq!(status(result), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
