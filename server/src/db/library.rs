use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use super::models::LinkRecord;
use crate::error::{LibraryServerError, Result};

/// Ordered link list mirrored to a JSON file.
///
/// The in-memory list is authoritative while the process runs. Every mutation
/// rewrites the whole file before returning, under the same lock as the
/// mutation itself, so writers never interleave.
#[derive(Clone)]
pub struct LibraryStore {
    path: PathBuf,
    links: Arc<Mutex<Vec<LinkRecord>>>,
}

impl LibraryStore {
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let links = load(&path);
        log::info!("Loaded {} links from {}", links.len(), path.display());

        Self {
            path,
            links: Arc::new(Mutex::new(links)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> Vec<LinkRecord> {
        self.lock().clone()
    }

    pub fn list_pinned(&self) -> Vec<LinkRecord> {
        self.lock().iter().filter(|link| link.pinned).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn add(&self, name: &str, url: &str) -> Result<Vec<LinkRecord>> {
        if name.is_empty() || url.is_empty() {
            return Err(LibraryServerError::Validation(
                "Name and URL required".to_string(),
            ));
        }

        let mut links = self.lock();
        links.push(LinkRecord::new(name.to_string(), url.to_string()));
        save(&self.path, &links)?;
        Ok(links.clone())
    }

    /// Removes the entry at `index`; later entries shift down by one.
    pub fn remove_at(&self, index: usize) -> Result<(LinkRecord, Vec<LinkRecord>)> {
        let mut links = self.lock();
        if index >= links.len() {
            return Err(LibraryServerError::InvalidIndex);
        }

        let removed = links.remove(index);
        save(&self.path, &links)?;
        Ok((removed, links.clone()))
    }

    pub fn toggle_pin(&self, index: usize) -> Result<(LinkRecord, Vec<LinkRecord>)> {
        let mut links = self.lock();
        let link = links
            .get_mut(index)
            .ok_or(LibraryServerError::InvalidIndex)?;

        link.pinned = !link.pinned;
        let updated = link.clone();
        save(&self.path, &links)?;
        Ok((updated, links.clone()))
    }

    pub fn flush(&self) -> Result<()> {
        let links = self.lock();
        save(&self.path, &links)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LinkRecord>> {
        // A panic mid-mutation leaves a valid Vec behind; keep serving it.
        self.links.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Reads the library file. A missing file is an empty library; an unreadable
/// or corrupt one is logged and also treated as empty.
pub fn load(path: &Path) -> Vec<LinkRecord> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            log::warn!("Failed to read {}: {}. Starting empty.", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(links) => links,
        Err(e) => {
            log::warn!("{} corrupted ({}). Starting empty.", path.display(), e);
            Vec::new()
        }
    }
}

pub fn save(path: &Path, links: &[LinkRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(links)?;
    fs::write(path, json)?;
    Ok(())
}
