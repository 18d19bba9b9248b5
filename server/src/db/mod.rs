pub mod credentials;
pub mod library;
pub mod models;

pub use credentials::CredentialStore;
pub use library::LibraryStore;
pub use models::{AdminCredential, LinkRecord};
