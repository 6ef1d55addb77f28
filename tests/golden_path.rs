mod common;

use std::fs;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use common::RecordingPresenter;
use pillcheck::alarm::{AlarmEvent, LocalAlarmService};
use pillcheck::config::Config;
use pillcheck::planning;
use pillcheck::{ReminderBridge, ReminderPlatform};

const CONFIG: &str = r#"{
    "alerts": [
        {"id": 1, "medication": "Ibuprofen", "dosage": "Take 1 tablet",
         "type": "fixed", "time": "14:00", "days": [1]},
        {"id": 2, "medication": "Vitamin D", "dosage": "Take 1 capsule",
         "type": "fixed", "time": "08:00", "days": [1]},
        {"id": 3, "medication": "Omeprazole", "dosage": "Take 1 tablet",
         "type": "fixed", "time": "16:00", "days": [1]}
    ],
    "taken": [{"alert_id": 3, "day": "2025-01-06", "time": "16:00"}]
}"#;

// Config file to planned dose to scheduled alarm to fired session to
// confirmation, across the public surface only.
#[tokio::test(start_paused = true)]
async fn config_to_confirmation() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("pillcheck.json");
    fs::write(&path, CONFIG).expect("write config");

    let config = Config::from_file(path.to_str().unwrap()).expect("config loads");

    // Plan a Monday mid-morning: 08:00 is already past and 16:00 is recorded
    // as taken, so only the 14:00 dose survives.
    let now = Utc.with_ymd_and_hms(2025, 1, 6, 10, 0, 0).unwrap();
    let taken = config.taken_doses().expect("taken converts");
    let doses = planning::plan_day(&now, &config.alerts, &taken).expect("plan");
    assert_eq!(doses.len(), 1);
    assert_eq!(doses[0].reminder_id, 100);
    assert_eq!(doses[0].title, "Ibuprofen");

    let presenter = Arc::new(RecordingPresenter::default());
    let service = LocalAlarmService::spawn(presenter.clone());
    let platform: Arc<dyn ReminderPlatform> = Arc::new(service.clone());
    let bridge = ReminderBridge::new(Some(platform));
    let mut events = service.subscribe();

    for dose in &doses {
        assert!(bridge
            .schedule_reminder(
                dose.reminder_id,
                dose.fire_at_epoch_ms,
                &dose.title,
                &dose.message
            )
            .is_forwarded());
    }

    // The planned instant lies in the wall-clock past, so the alarm fires
    // right away.
    let event = events.recv().await.expect("fired");
    assert_eq!(
        event,
        AlarmEvent::Fired {
            id: 100,
            title: "Ibuprofen".to_string(),
            message: "Take 1 tablet".to_string(),
        }
    );

    service.confirm();
    let event = events.recv().await.expect("confirmed");
    assert_eq!(
        event,
        AlarmEvent::Confirmed {
            title: "Ibuprofen".to_string(),
        }
    );

    assert_eq!(
        presenter.shown(),
        vec![("Ibuprofen".to_string(), "Take 1 tablet".to_string())]
    );
    assert_eq!(presenter.clear_count(), 1);
    service.shutdown();
}
