//! Polling/refresh orchestration.

mod controller;
pub mod throttle;

pub use controller::RefreshController;
pub use throttle::{Admission, Throttle};
