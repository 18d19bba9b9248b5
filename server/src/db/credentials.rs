use std::fs;
use std::path::{Path, PathBuf};

use super::models::AdminCredential;
use crate::config::PasswordScheme;

/// Reads the admin credential file. The file is re-read on every login so
/// that rotating the password does not need a restart.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    scheme: PasswordScheme,
}

impl CredentialStore {
    pub fn new<P: Into<PathBuf>>(path: P, scheme: PasswordScheme) -> Self {
        Self {
            path: path.into(),
            scheme,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Option<AdminCredential> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("{} missing!", self.path.display());
                return None;
            }
            Err(e) => {
                log::warn!("Failed to read {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(credential) => Some(credential),
            Err(e) => {
                log::warn!("{} is corrupted: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.load()
            .map(|credential| credential.verify(username, password, self.scheme))
            .unwrap_or(false)
    }
}
