pub mod log_buffer;

pub use log_buffer::{LogBuffer, DEFAULT_LOG_CAPACITY};
