use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::{config::OAuthClientConfig, error::AppError, state::SharedState};

/// Sends the browser to the authorization server's authorize endpoint.
///
/// The service keeps no session, so no `state` value is sent; the code is
/// handed back unchecked by `/authorized`.
pub async fn login_redirect_handler(
    State(state): State<SharedState>,
    Path(registration_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if registration_id != state.oauth.registration_id {
        return Err(AppError::NotFound);
    }
    tracing::info!(registration = %registration_id, "redirecting to authorization server");
    let location = authorization_url(&state.oauth);
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}

pub fn authorization_url(oauth: &OAuthClientConfig) -> String {
    let separator = if oauth.authorization_uri.contains('?') { '&' } else { '?' };
    format!(
        "{}{}response_type=code&client_id={}&scope={}&redirect_uri={}",
        oauth.authorization_uri,
        separator,
        urlencoding::encode(&oauth.client_id),
        urlencoding::encode(&oauth.scopes.join(" ")),
        urlencoding::encode(&oauth.redirect_uri),
    )
}
