use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::{error::Result, state::AppState};

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub active_sessions: usize,
    pub links: usize,
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    let response = HealthCheckResponse {
        status: "healthy".to_string(),
        active_sessions: state.sessions.active_count(),
        links: state.library.len(),
    };

    Ok(HttpResponse::Ok().json(response))
}
