pub mod admin;
pub mod health;
pub mod library;
pub mod pages;
pub mod visitors;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::error::LibraryServerError;

pub use admin::{clear_logs, get_logs, login, logout, verify};
pub use health::health_check;
pub use library::{add_link, delete_link, get_library, get_pinned, toggle_pin};
pub use pages::{admin_login_page, admin_page, home, library_page};
pub use visitors::log_ip;

/// Registers every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(home)
        .service(library_page)
        .service(admin_login_page)
        .service(admin_page)
        .service(health_check)
        .service(log_ip)
        .service(login)
        .service(verify)
        .service(logout)
        .service(get_logs)
        .service(clear_logs)
        .service(get_library)
        .service(add_link)
        .service(delete_link)
        .service(toggle_pin)
        .service(get_pinned);
}

/// Malformed request bodies are answered with the regular error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        LibraryServerError::Validation(format!("Invalid JSON body: {}", err)).into()
    })
}
