use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderMap, AUTHORIZATION},
    middleware::Next,
    web, ResponseError,
};

use crate::{
    error::{LibraryServerError, Result},
    session::SessionManager,
    state::AppState,
};

/// Extracts `<token>` from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Returns the request's bearer token if it names a live session.
pub fn authorize(headers: &HeaderMap, sessions: &SessionManager) -> Result<String> {
    let token = bearer_token(headers).ok_or(LibraryServerError::MissingToken)?;
    if sessions.is_valid(&token) {
        Ok(token)
    } else {
        Err(LibraryServerError::InvalidSession)
    }
}

/// Rejects the request with 401 unless it carries a live bearer token.
pub async fn auth_middleware<B: MessageBody>(
    req: ServiceRequest,
    next: Next<B>,
) -> std::result::Result<ServiceResponse<EitherBody<B>>, actix_web::Error> {
    let outcome = match req.app_data::<web::Data<AppState>>() {
        Some(state) => authorize(req.headers(), &state.sessions),
        None => Err(LibraryServerError::Config(
            "Application state not available".into(),
        )),
    };

    if let Err(e) = outcome {
        log::warn!("Rejected request to {}: {}", req.path(), e);
        return Ok(req.into_response(e.error_response()).map_into_right_body());
    }

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}
