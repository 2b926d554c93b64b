// src/routes/mod.rs
pub mod login;
pub mod messages;

use crate::{
    error::{AppError, AuthError},
    services::{policy::Requirement, token::Principal},
    state::SharedState,
};
use axum::{
    Router,
    extract::{Request, State},
    http::header,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use login::login_redirect_handler;
use messages::{authorized_handler, create_message_handler, list_messages_handler};
use tower_http::trace::TraceLayer;

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/messages", get(list_messages_handler))
        .route("/createMessage", post(create_message_handler))
        .route("/authorized", get(authorized_handler))
        .route("/oauth2/authorization/{registration_id}", get(login_redirect_handler))
        .fallback(|| async { AppError::NotFound })
        .layer(middleware::from_fn_with_state(state.clone(), authorize))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Applies the policy table before routing. A verified caller is stored as a
/// [`Principal`] request extension.
///
/// Public routes skip token handling entirely, so a malformed or expired
/// bearer token there is ignored rather than rejected with 401.
async fn authorize(
    State(state): State<SharedState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let requirement = state.policy.requirement_for(req.method(), req.uri().path());
    if *requirement == Requirement::Public {
        return Ok(next.run(req).await);
    }

    let principal: Option<Principal> = match bearer_token(&req)? {
        Some(token) => Some(state.tokens.verify(token)?),
        None => None,
    };

    if let Err(err) = requirement.check(principal.as_ref()) {
        tracing::debug!(
            method = %req.method(),
            path = req.uri().path(),
            error = %err,
            "request rejected"
        );
        return Err(err);
    }

    if let Some(principal) = principal {
        req.extensions_mut().insert(principal);
    }
    Ok(next.run(req).await)
}

/// `Ok(None)` when no Authorization header is present.
fn bearer_token(req: &Request) -> Result<Option<&str>, AuthError> {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("authorization header is not ASCII".to_string()))?;
    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(Some(token.trim()))
        }
        _ => Err(AuthError::InvalidToken("expected a bearer token".to_string())),
    }
}
