#![allow(dead_code)]

use std::sync::Mutex;

use pillcheck::interfaces::platform::{PlatformCall, ReminderPlatform};
use pillcheck::interfaces::presenter::NotificationPresenter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardedCall {
    Start {
        title: String,
        message: String,
    },
    Stop,
    Schedule {
        id: i32,
        fire_at_epoch_ms: i64,
        title: String,
        message: String,
    },
    Cancel {
        id: i32,
    },
}

/// Platform fake recording every forwarded call, optionally with some calls
/// left unprovided.
#[derive(Default)]
pub struct RecordingPlatform {
    missing: Vec<PlatformCall>,
    calls: Mutex<Vec<ForwardedCall>>,
}

impl RecordingPlatform {
    pub fn full() -> Self {
        Self::default()
    }

    pub fn without(missing: &[PlatformCall]) -> Self {
        Self {
            missing: missing.to_vec(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ForwardedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ReminderPlatform for RecordingPlatform {
    fn provides(&self, call: PlatformCall) -> bool {
        !self.missing.contains(&call)
    }

    fn start_service(&self, title: &str, message: &str) {
        self.calls.lock().unwrap().push(ForwardedCall::Start {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn stop_service(&self) {
        self.calls.lock().unwrap().push(ForwardedCall::Stop);
    }

    fn schedule_persistent_notification(
        &self,
        id: i32,
        fire_at_epoch_ms: i64,
        title: &str,
        message: &str,
    ) {
        self.calls.lock().unwrap().push(ForwardedCall::Schedule {
            id,
            fire_at_epoch_ms,
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn cancel_persistent_notification(&self, id: i32) {
        self.calls.lock().unwrap().push(ForwardedCall::Cancel { id });
    }
}

#[derive(Default)]
pub struct RecordingPresenter {
    shown: Mutex<Vec<(String, String)>>,
    clears: Mutex<usize>,
}

impl RecordingPresenter {
    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().unwrap().clone()
    }

    pub fn clear_count(&self) -> usize {
        *self.clears.lock().unwrap()
    }
}

impl NotificationPresenter for RecordingPresenter {
    fn show(&self, title: &str, message: &str) {
        self.shown
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }

    fn clear(&self) {
        *self.clears.lock().unwrap() += 1;
    }
}
