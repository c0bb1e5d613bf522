use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    MissingFields,
    UserExists,
    InvalidCredentials,
    Internal(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFields | AppError::UserExists | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AppError::MissingFields => "missing fields",
            AppError::UserExists => "user already exists",
            AppError::InvalidCredentials => "invalid credentials",
            AppError::Internal(_) => "internal server error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(err) = &self {
            tracing::error!("{err}\n\n{}", err.backtrace());
        }

        (
            self.status(),
            Json(json!({ "error": self.message() })),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_400() {
        for err in [AppError::MissingFields, AppError::UserExists, AppError::InvalidCredentials] {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn anything_else_is_500() {
        let err: AppError = std::io::Error::other("disk on fire").into();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.message(), "internal server error");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
