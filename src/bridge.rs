use std::sync::Arc;

use crate::interfaces::platform::{PlatformCall, ReminderPlatform};

/// Outcome of a bridge operation.
///
/// `Unavailable` names the platform call that could not be made, so callers
/// and tests can observe degradation directly instead of scraping logs.
/// Callers that treat the operations as fire-and-forget ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Forwarded,
    Unavailable(PlatformCall),
}

impl Dispatch {
    pub fn is_forwarded(&self) -> bool {
        matches!(self, Dispatch::Forwarded)
    }
}

/// Stateless pass-through from reminder operations to the host platform
/// capability.
///
/// The platform is injected at construction and may be absent entirely (not
/// linked on this host) or provide only a subset of its calls. Every
/// operation checks presence first; when the call is unavailable it emits one
/// `warn` diagnostic naming the platform method and does nothing else. No
/// operation blocks, panics, returns an error, or validates argument values.
///
/// The bridge keeps no record of sessions or scheduled reminders. Reminder
/// ids are caller-assigned; the bridge forwards them untouched, so uniqueness
/// and reuse policy live with the caller and the platform.
#[derive(Clone)]
pub struct ReminderBridge {
    platform: Option<Arc<dyn ReminderPlatform>>,
}

impl ReminderBridge {
    pub fn new(platform: Option<Arc<dyn ReminderPlatform>>) -> Self {
        Self { platform }
    }

    /// Bridge with no platform linked. Every operation degrades to a
    /// diagnostic and `Dispatch::Unavailable`.
    pub fn unlinked() -> Self {
        Self { platform: None }
    }

    fn resolve(&self, call: PlatformCall) -> Option<&dyn ReminderPlatform> {
        match self.platform.as_deref() {
            Some(platform) if platform.provides(call) => Some(platform),
            _ => {
                tracing::warn!(method = %call, "reminder platform call unavailable, request dropped");
                None
            }
        }
    }

    /// Start the ongoing persistent reminder session.
    pub fn start_persistent_reminder(&self, title: &str, message: &str) -> Dispatch {
        let call = PlatformCall::StartService;
        match self.resolve(call) {
            Some(platform) => {
                platform.start_service(title, message);
                Dispatch::Forwarded
            }
            None => Dispatch::Unavailable(call),
        }
    }

    /// Stop the ongoing persistent reminder session.
    pub fn stop_persistent_reminder(&self) -> Dispatch {
        let call = PlatformCall::StopService;
        match self.resolve(call) {
            Some(platform) => {
                platform.stop_service();
                Dispatch::Forwarded
            }
            None => Dispatch::Unavailable(call),
        }
    }

    /// Schedule a one-shot reminder at an absolute UTC timestamp in
    /// milliseconds, under a caller-assigned id.
    pub fn schedule_reminder(
        &self,
        id: i32,
        fire_at_epoch_ms: i64,
        title: &str,
        message: &str,
    ) -> Dispatch {
        let call = PlatformCall::SchedulePersistentNotification;
        match self.resolve(call) {
            Some(platform) => {
                platform.schedule_persistent_notification(id, fire_at_epoch_ms, title, message);
                Dispatch::Forwarded
            }
            None => Dispatch::Unavailable(call),
        }
    }

    /// Cancel the reminder scheduled under `id`. Always forwards; whether an
    /// unknown id is a no-op is the platform's decision.
    pub fn cancel_reminder(&self, id: i32) -> Dispatch {
        let call = PlatformCall::CancelPersistentNotification;
        match self.resolve(call) {
            Some(platform) => {
                platform.cancel_persistent_notification(id);
                Dispatch::Forwarded
            }
            None => Dispatch::Unavailable(call),
        }
    }
}
