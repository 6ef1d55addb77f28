//! Local medication-reminder core: a scheduling facade over a platform
//! notification capability, an in-process alarm service implementing that
//! capability for desktop hosts, and a dose planner.

pub mod alarm;
pub mod bridge;
pub mod config;
pub mod error;
pub mod interfaces {
    pub mod platform;
    pub mod presenter;
    pub mod scheduler;
}
pub mod logging;
pub mod planning;
pub mod presenter;
pub mod runtime_paths;
pub mod scheduler;

pub type Result<T> = std::result::Result<T, error::PillcheckError>;

pub use bridge::{Dispatch, ReminderBridge};
pub use interfaces::platform::{PlatformCall, ReminderPlatform};
