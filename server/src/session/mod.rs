pub mod clock;
pub mod manager;

#[doc(hidden)]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use manager::SessionManager;
