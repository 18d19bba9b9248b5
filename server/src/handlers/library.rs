use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    db::LinkRecord,
    error::{LibraryServerError, Result},
    middleware::authorize,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct AddLinkRequest {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub links: Vec<LinkRecord>,
}

#[derive(Debug, Serialize)]
pub struct LinkMutationResponse {
    pub status: &'static str,
    pub links: Vec<LinkRecord>,
}

impl LinkMutationResponse {
    fn success(links: Vec<LinkRecord>) -> Self {
        Self {
            status: "success",
            links,
        }
    }
}

// Mutations hold the library lock across a synchronous file write, so they
// run on the blocking pool instead of the worker thread.

/// Library writes are public unless `protect_library_writes` is set.
fn authorize_write(req: &HttpRequest, state: &AppState) -> Result<()> {
    if state.config.protect_library_writes {
        authorize(req.headers(), &state.sessions)?;
    }
    Ok(())
}

fn parse_index(raw: &str) -> Result<usize> {
    raw.parse().map_err(|_| LibraryServerError::InvalidIndex)
}

#[get("/api/library")]
pub async fn get_library(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(LinkListResponse {
        links: state.library.list(),
    }))
}

#[post("/api/library")]
pub async fn add_link(
    req: HttpRequest,
    body: web::Json<AddLinkRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    authorize_write(&req, &state)?;

    let body = body.into_inner();
    let name = body.name.unwrap_or_default();
    let url = body.url.unwrap_or_default();

    let library = state.library.clone();
    let (name, url, links) = web::block(move || {
        let links = library.add(&name, &url)?;
        Ok::<_, LibraryServerError>((name, url, links))
    })
    .await??;
    state
        .logs
        .append(format!("Added to library: {} - {}", name, url));

    Ok(HttpResponse::Ok().json(LinkMutationResponse::success(links)))
}

#[delete("/api/library/{index}")]
pub async fn delete_link(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    authorize_write(&req, &state)?;

    let index = parse_index(&path)?;
    let library = state.library.clone();
    let (removed, links) = web::block(move || library.remove_at(index)).await??;
    state
        .logs
        .append(format!("Removed from library: {}", removed.name));

    Ok(HttpResponse::Ok().json(LinkMutationResponse::success(links)))
}

#[post("/api/library/{index}/pin")]
pub async fn toggle_pin(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    authorize_write(&req, &state)?;

    let index = parse_index(&path)?;
    let library = state.library.clone();
    let (link, links) = web::block(move || library.toggle_pin(index)).await??;
    let status = if link.pinned { "pinned" } else { "unpinned" };
    state
        .logs
        .append(format!("Link {}: {}", status, link.name));

    Ok(HttpResponse::Ok().json(LinkMutationResponse::success(links)))
}

#[get("/api/pinned")]
pub async fn get_pinned(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(LinkListResponse {
        links: state.library.list_pinned(),
    }))
}
