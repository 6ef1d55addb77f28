use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, mpsc, watch};

use crate::interfaces::platform::{PlatformCall, ReminderPlatform};
use crate::interfaces::presenter::NotificationPresenter;

const DEFAULT_SESSION_TITLE: &str = "Time for your medication";
const DEFAULT_SESSION_MESSAGE: &str = "Confirm you took your dose";

/// Longest single timer sleep. Bounds how stale the wall-clock reading can
/// get while an alarm is pending.
const WALL_CLOCK_RECHECK_MS: i64 = 60_000;

/// Observable alarm activity, broadcast to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmEvent {
    Fired {
        id: i32,
        title: String,
        message: String,
    },
    Confirmed {
        title: String,
    },
}

enum AlarmCommand {
    Schedule {
        id: i32,
        fire_at_epoch_ms: i64,
        title: String,
        message: String,
    },
    Cancel {
        id: i32,
    },
    StartSession {
        title: String,
        message: String,
    },
    StopSession,
    Confirm,
}

/// In-process alarm and persistent-session service.
///
/// Implements [`ReminderPlatform`] over a spawned actor task: commands go in
/// on an unbounded channel (so the capability methods never block), alarm
/// activity comes out on a broadcast channel. One-shot alarms are exact;
/// scheduling an id that is already pending replaces it, cancelling an
/// unknown id is a silent no-op, and a deadline at or before now fires
/// immediately. At most one persistent session is active at a time; firing an
/// alarm starts a session carrying that alarm's title and message, and
/// `confirm` ends the session with a `Confirmed` event.
#[derive(Clone)]
pub struct LocalAlarmService {
    cmd_tx: mpsc::UnboundedSender<AlarmCommand>,
    event_tx: broadcast::Sender<AlarmEvent>,
    stop_tx: watch::Sender<bool>,
}

impl LocalAlarmService {
    /// Spawns the actor task. Must be called within a tokio runtime.
    pub fn spawn(presenter: Arc<dyn NotificationPresenter>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, _) = broadcast::channel(64);
        let (stop_tx, stop_rx) = watch::channel(false);

        let actor = AlarmActor {
            alarms: HashMap::new(),
            session: None,
            presenter,
            event_tx: event_tx.clone(),
        };
        tokio::spawn(actor.run(cmd_rx, stop_rx));

        Self {
            cmd_tx,
            event_tx,
            stop_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AlarmEvent> {
        self.event_tx.subscribe()
    }

    /// Confirms the active session, if any. Mirrors the confirm action on the
    /// presented notification.
    pub fn confirm(&self) {
        let _ = self.cmd_tx.send(AlarmCommand::Confirm);
    }

    pub fn shutdown(&self) {
        let _ = self.stop_tx.send(true);
    }
}

impl ReminderPlatform for LocalAlarmService {
    fn provides(&self, _call: PlatformCall) -> bool {
        true
    }

    fn start_service(&self, title: &str, message: &str) {
        let _ = self.cmd_tx.send(AlarmCommand::StartSession {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn stop_service(&self) {
        let _ = self.cmd_tx.send(AlarmCommand::StopSession);
    }

    fn schedule_persistent_notification(
        &self,
        id: i32,
        fire_at_epoch_ms: i64,
        title: &str,
        message: &str,
    ) {
        let _ = self.cmd_tx.send(AlarmCommand::Schedule {
            id,
            fire_at_epoch_ms,
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn cancel_persistent_notification(&self, id: i32) {
        let _ = self.cmd_tx.send(AlarmCommand::Cancel { id });
    }
}

struct PendingAlarm {
    fire_at_epoch_ms: i64,
    title: String,
    message: String,
}

struct ActiveSession {
    title: String,
}

struct AlarmActor {
    alarms: HashMap<i32, PendingAlarm>,
    session: Option<ActiveSession>,
    presenter: Arc<dyn NotificationPresenter>,
    event_tx: broadcast::Sender<AlarmEvent>,
}

impl AlarmActor {
    async fn run(
        mut self,
        mut cmd_rx: mpsc::UnboundedReceiver<AlarmCommand>,
        mut stop_rx: watch::Receiver<bool>,
    ) {
        // Epoch time is anchored once and advanced on the tokio clock, with
        // the wall clock as a floor: the anchor keeps firing deterministic
        // under tokio's paused test time, while the floor picks up suspends
        // and forward clock steps on the next wake. Sleeps are sliced so that
        // wake is never more than one recheck interval away.
        let anchor_epoch_ms = Utc::now().timestamp_millis();
        let anchor = tokio::time::Instant::now();
        let now_ms = move || {
            effective_now_ms(
                anchor_epoch_ms + anchor.elapsed().as_millis() as i64,
                Utc::now().timestamp_millis(),
            )
        };

        loop {
            let next_deadline = self.alarms.values().map(|a| a.fire_at_epoch_ms).min();

            tokio::select! {
                maybe_cmd = cmd_rx.recv() => {
                    match maybe_cmd {
                        Some(cmd) => self.handle_command(cmd),
                        None => break,
                    }
                }
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
                _ = wait_until(next_deadline, now_ms()), if next_deadline.is_some() => {
                    self.fire_due(now_ms());
                }
            }
        }
        tracing::debug!("alarm service stopped");
    }

    fn handle_command(&mut self, cmd: AlarmCommand) {
        match cmd {
            AlarmCommand::Schedule {
                id,
                fire_at_epoch_ms,
                title,
                message,
            } => {
                let replaced = self
                    .alarms
                    .insert(
                        id,
                        PendingAlarm {
                            fire_at_epoch_ms,
                            title,
                            message,
                        },
                    )
                    .is_some();
                tracing::debug!(id, fire_at_epoch_ms, replaced, "exact alarm scheduled");
            }
            AlarmCommand::Cancel { id } => {
                // Cancelling an id with no pending alarm is a silent no-op.
                if self.alarms.remove(&id).is_some() {
                    tracing::debug!(id, "alarm cancelled");
                }
            }
            AlarmCommand::StartSession { title, message } => {
                self.begin_session(title, message);
            }
            AlarmCommand::StopSession => {
                if self.session.take().is_some() {
                    self.presenter.clear();
                    tracing::info!("persistent session stopped");
                }
            }
            AlarmCommand::Confirm => {
                if let Some(session) = self.session.take() {
                    self.presenter.clear();
                    tracing::info!(title = %session.title, "dose confirmed");
                    let _ = self.event_tx.send(AlarmEvent::Confirmed {
                        title: session.title,
                    });
                }
            }
        }
    }

    fn fire_due(&mut self, now_ms: i64) {
        let mut due: Vec<i32> = self
            .alarms
            .iter()
            .filter(|(_, alarm)| alarm.fire_at_epoch_ms <= now_ms)
            .map(|(id, _)| *id)
            .collect();
        due.sort_by_key(|id| {
            self.alarms
                .get(id)
                .map(|alarm| (alarm.fire_at_epoch_ms, *id))
                .unwrap_or((i64::MAX, *id))
        });

        for id in due {
            if let Some(alarm) = self.alarms.remove(&id) {
                tracing::info!(id, title = %alarm.title, "alarm fired");
                self.begin_session(alarm.title.clone(), alarm.message.clone());
                let _ = self.event_tx.send(AlarmEvent::Fired {
                    id,
                    title: alarm.title,
                    message: alarm.message,
                });
            }
        }
    }

    // The last start wins: the session owns a single presented notification,
    // updated in place.
    fn begin_session(&mut self, title: String, message: String) {
        let title = fallback_if_empty(title, DEFAULT_SESSION_TITLE);
        let message = fallback_if_empty(message, DEFAULT_SESSION_MESSAGE);
        self.presenter.show(&title, &message);
        tracing::info!(title = %title, "persistent session started");
        self.session = Some(ActiveSession { title });
    }
}

fn effective_now_ms(anchored_ms: i64, wall_ms: i64) -> i64 {
    anchored_ms.max(wall_ms)
}

fn next_wait_ms(deadline: i64, now_ms: i64) -> i64 {
    deadline.saturating_sub(now_ms).min(WALL_CLOCK_RECHECK_MS)
}

async fn wait_until(deadline: Option<i64>, now_ms: i64) {
    if let Some(deadline) = deadline {
        let wait = next_wait_ms(deadline, now_ms);
        if wait > 0 {
            tokio::time::sleep(Duration::from_millis(wait as u64)).await;
        }
    }
}

fn fallback_if_empty(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
