use std::fmt;

/// The fixed set of calls a host notification platform may expose.
///
/// `as_str` yields the native method name, which is what diagnostics report
/// when a call is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformCall {
    StartService,
    StopService,
    SchedulePersistentNotification,
    CancelPersistentNotification,
}

impl PlatformCall {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformCall::StartService => "startService",
            PlatformCall::StopService => "stopService",
            PlatformCall::SchedulePersistentNotification => "schedulePersistentNotification",
            PlatformCall::CancelPersistentNotification => "cancelPersistentNotification",
        }
    }
}

impl fmt::Display for PlatformCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host alarm/notification capability. A platform may expose any subset of
/// the calls; `provides` declares which, and the default method bodies let a
/// partial implementation override only what it actually backs.
///
/// Methods must return without blocking. Implementations doing real work hand
/// the call off (e.g. to a channel) and return immediately.
pub trait ReminderPlatform: Send + Sync {
    fn provides(&self, call: PlatformCall) -> bool;

    fn start_service(&self, _title: &str, _message: &str) {}

    fn stop_service(&self) {}

    fn schedule_persistent_notification(
        &self,
        _id: i32,
        _fire_at_epoch_ms: i64,
        _title: &str,
        _message: &str,
    ) {
    }

    fn cancel_persistent_notification(&self, _id: i32) {}
}
