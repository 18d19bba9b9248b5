use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::PasswordScheme;

/// One entry of the link library. Entries are addressed by position only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub pinned: bool,
}

impl LinkRecord {
    pub fn new(name: String, url: String) -> Self {
        Self {
            name,
            url,
            pinned: false,
        }
    }
}

/// The single admin login, written out-of-band by the setup utility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredential {
    pub username: String,
    #[serde(alias = "password")]
    pub password_hash: String,
}

impl AdminCredential {
    pub fn verify(&self, username: &str, password: &str, scheme: PasswordScheme) -> bool {
        if username != self.username {
            return false;
        }

        match scheme {
            PasswordScheme::Plain => password == self.password_hash,
            PasswordScheme::Sha256 => {
                let digest = Sha256::digest(password.as_bytes());
                let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
                hex.eq_ignore_ascii_case(&self.password_hash)
            }
        }
    }
}
