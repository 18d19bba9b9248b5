use chrono::Local;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// Bounded, timestamped record of server events shown to the admin.
#[derive(Clone)]
pub struct LogBuffer {
    entries: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn append(&self, message: impl AsRef<str>) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let entry = format!("[{}] {}", timestamp, message.as_ref());

        log::info!("{}", entry);

        let Ok(mut entries) = self.entries.lock() else {
            log::error!("Log buffer lock poisoned, dropping entry");
            return;
        };
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    pub fn get_all(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
        self.append("Logs cleared by admin");
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_formats_timestamp() {
        let logs = LogBuffer::default();
        logs.append("Server starting...");

        let entries = logs.get_all();
        assert_eq!(entries.len(), 1);
        // "[YYYY-mm-dd HH:MM:SS] " is 22 characters.
        assert!(entries[0].starts_with('['));
        assert_eq!(&entries[0][20..22], "] ");
        assert!(entries[0].ends_with("Server starting..."));
    }

    #[test]
    fn test_insertion_order() {
        let logs = LogBuffer::default();
        logs.append("first");
        logs.append("second");

        let entries = logs.get_all();
        assert!(entries[0].ends_with("first"));
        assert!(entries[1].ends_with("second"));
    }

    #[test]
    fn test_bound_evicts_oldest() {
        let logs = LogBuffer::default();
        for i in 1..=1001 {
            logs.append(format!("message #{}", i));
        }

        let entries = logs.get_all();
        assert_eq!(entries.len(), 1000);
        assert!(entries[0].ends_with("message #2"));
        assert!(entries[999].ends_with("message #1001"));
    }

    #[test]
    fn test_clear_leaves_cleared_event() {
        let logs = LogBuffer::new(10);
        logs.append("one");
        logs.append("two");

        logs.clear();

        let entries = logs.get_all();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ends_with("Logs cleared by admin"));
    }

    #[test]
    fn test_clones_share_entries() {
        let logs = LogBuffer::new(10);
        let handle = logs.clone();
        handle.append("shared");
        assert_eq!(logs.len(), 1);
    }
}
