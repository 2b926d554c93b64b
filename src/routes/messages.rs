use axum::{
    Extension, Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};

use crate::{
    error::AppError,
    message::{AuthorizedQuery, AuthorizedResponse, Message},
    services::token::Principal,
    state::SharedState,
};

pub async fn list_messages_handler(State(state): State<SharedState>) -> Json<Vec<Message>> {
    Json(state.messages.list())
}

pub async fn create_message_handler(
    State(state): State<SharedState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<Message>, JsonRejection>,
) -> Result<Json<Message>, AppError> {
    let Json(message) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    tracing::debug!(subject = ?principal.subject, "create message");
    Ok(Json(state.messages.create(message)))
}

// Landing point of the authorization-code redirect. The code is handed back as-is.
pub async fn authorized_handler(
    query: Result<Query<AuthorizedQuery>, QueryRejection>,
) -> Result<Json<AuthorizedResponse>, AppError> {
    let Query(AuthorizedQuery { code }) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(Json(AuthorizedResponse { code }))
}
