use actix_web::{get, web, HttpResponse};

use crate::{
    error::{LibraryServerError, Result},
    state::AppState,
};

async fn serve_page(state: &AppState, file_name: &str) -> Result<HttpResponse> {
    let path = state.config.pages_dir.join(file_name);

    let body = tokio::fs::read(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            log::warn!("Page not found: {}", path.display());
            LibraryServerError::NotFound
        } else {
            LibraryServerError::Storage(e)
        }
    })?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

#[get("/")]
pub async fn home(state: web::Data<AppState>) -> Result<HttpResponse> {
    serve_page(&state, "index.html").await
}

#[get("/library")]
pub async fn library_page(state: web::Data<AppState>) -> Result<HttpResponse> {
    serve_page(&state, "library.html").await
}

#[get("/library/admin/login")]
pub async fn admin_login_page(state: web::Data<AppState>) -> Result<HttpResponse> {
    serve_page(&state, "admin_login.html").await
}

#[get("/library/admin")]
pub async fn admin_page(state: web::Data<AppState>) -> Result<HttpResponse> {
    serve_page(&state, "admin.html").await
}
