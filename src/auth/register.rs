use axum::{debug_handler, extract::{rejection::JsonRejection, State}, Json};

use crate::{AppError, AppResult};

use super::{AuthForm, AuthReply, Credentials, StoreError};

#[debug_handler(state = crate::AppState)]
pub async fn register(
    State(credentials): State<Credentials>,
    body: Result<Json<AuthForm>, JsonRejection>,
) -> AppResult<Json<AuthReply>> {
    let Ok(Json(form)) = body else {
        return Err(AppError::MissingFields);
    };
    let (username, password) = form.fields()?;

    match credentials.register(&username, &password).await {
        Ok(()) => {
            tracing::info!("registered {username}");
            Ok(Json(AuthReply::ok("registered")))
        }
        Err(StoreError::AlreadyExists) => Err(AppError::UserExists),
        Err(err) => Err(err.into()),
    }
}
