use actix_web::{post, web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::{error::Result, state::AppState};

#[derive(Debug, Serialize)]
pub struct LogIpResponse {
    pub status: &'static str,
    pub ip: String,
}

/// First hop of `X-Forwarded-For` when behind a proxy, else the peer address.
pub fn client_ip(req: &HttpRequest) -> String {
    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    match forwarded {
        Some(ip) => ip.to_string(),
        None => req
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

#[post("/log-ip")]
pub async fn log_ip(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let ip = client_ip(&req);
    state.logs.append(format!("IP logged: {}", ip));

    Ok(HttpResponse::Ok().json(LogIpResponse {
        status: "success",
        ip,
    }))
}
