use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::db::{CredentialStore, LibraryStore};
use crate::error::Result;
use crate::middleware::RateLimiter;
use crate::monitor::LogBuffer;
use crate::session::{Clock, SessionManager, SystemClock};

/// Everything a request handler can touch. Cloning is cheap; all clones share
/// the same underlying stores.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub library: LibraryStore,
    pub credentials: CredentialStore,
    pub sessions: SessionManager,
    pub logs: LogBuffer,
    pub login_limiter: RateLimiter,
}

impl AppState {
    pub fn bootstrap(config: AppConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: AppConfig, clock: Arc<dyn Clock>) -> Self {
        let library = LibraryStore::open(config.library_file.clone());
        let credentials = CredentialStore::new(config.admin_file.clone(), config.password_scheme);
        let sessions =
            SessionManager::with_clock(config.session_ttl(), config.max_sessions, clock);
        let logs = LogBuffer::new(config.log_capacity);
        let login_limiter =
            RateLimiter::new(config.login_rate_limit, config.login_rate_window());

        Self {
            config: Arc::new(config),
            library,
            credentials,
            sessions,
            logs,
            login_limiter,
        }
    }

    /// Starts the periodic session sweep and rate-limiter cleanup. Must be
    /// called from within a Tokio runtime.
    pub fn spawn_background_tasks(&self) {
        let sessions = self.sessions.clone();
        let sweep_every = self.config.session_sweep_interval();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(sweep_every);
            loop {
                interval.tick().await;
                let removed = sessions.cleanup_expired();
                if removed > 0 {
                    log::info!("Background cleanup: removed {} expired sessions", removed);
                }
            }
        });

        let limiter = self.login_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                limiter.cleanup_old_entries();
                log::debug!("Background cleanup: cleaned rate limiter entries");
            }
        });
    }

    pub fn shutdown(&self) -> Result<()> {
        self.library.flush()?;
        log::info!(
            "Flushed {} links to {}",
            self.library.len(),
            self.library.path().display()
        );
        Ok(())
    }
}
