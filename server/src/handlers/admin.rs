use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    error::{LibraryServerError, Result},
    middleware::bearer_token,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self { status: "success" }
    }
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<String>,
}

#[post(
    "/api/admin/login",
    wrap = "actix_web::middleware::from_fn(crate::middleware::rate_limit_middleware)"
)]
pub async fn login(
    http_req: HttpRequest,
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let username = req.username.unwrap_or_default();
    let password = req.password.unwrap_or_default();
    let peer_ip = http_req.peer_addr().map(|addr| addr.ip());

    log::info!("Login attempt for user: {}", username);

    if username.is_empty() || !state.credentials.verify(&username, &password) {
        if let Some(ip) = peer_ip {
            state.login_limiter.record_failure(ip);
        }
        state.logs.append("Admin login failed: Invalid credentials");
        return Err(LibraryServerError::InvalidCredentials);
    }

    // Only failed attempts count towards the throttle.
    if let Some(ip) = peer_ip {
        state.login_limiter.reset(ip);
    }

    let token = state.sessions.create();
    let prefix: String = token.chars().take(10).collect();
    state
        .logs
        .append(format!("Admin login successful - Token: {}...", prefix));

    Ok(HttpResponse::Ok().json(LoginResponse {
        status: "success",
        token,
    }))
}

#[post(
    "/api/admin/verify",
    wrap = "actix_web::middleware::from_fn(crate::middleware::auth_middleware)"
)]
pub async fn verify() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(StatusResponse::success()))
}

/// Always succeeds; a missing or unknown token simply has nothing to revoke.
#[post("/api/admin/logout")]
pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    if let Some(token) = bearer_token(req.headers()) {
        state.sessions.revoke(&token);
        state.logs.append("Admin logged out");
    }

    Ok(HttpResponse::Ok().json(StatusResponse::success()))
}

#[get(
    "/api/admin/logs",
    wrap = "actix_web::middleware::from_fn(crate::middleware::auth_middleware)"
)]
pub async fn get_logs(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(LogsResponse {
        logs: state.logs.get_all(),
    }))
}

#[delete(
    "/api/admin/logs",
    wrap = "actix_web::middleware::from_fn(crate::middleware::auth_middleware)"
)]
pub async fn clear_logs(state: web::Data<AppState>) -> Result<HttpResponse> {
    state.logs.clear();
    Ok(HttpResponse::Ok().json(StatusResponse::success()))
}
