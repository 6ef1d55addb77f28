use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{PillcheckError, Result};

/// Interval alerts never plan more than this many doses in one day.
pub const MAX_INTERVAL_DOSES_PER_DAY: u32 = 24;

/// A dose counts as taken when a confirmation lies within this many minutes
/// of the planned occurrence.
pub const TAKEN_WINDOW_MINUTES: i64 = 30;

/// One medication alert definition, as stored in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderAlert {
    pub id: i32,
    pub medication: String,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(flatten)]
    pub kind: AlertKind,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlertKind {
    /// Fires at a fixed time of day on the listed weekdays
    /// (0 = Sunday through 6 = Saturday).
    Fixed { time: String, days: Vec<u8> },
    /// Fires every `every_hours` hours through the day, starting at `start`.
    Interval { start: String, every_hours: u32 },
}

/// A confirmed dose, used to suppress reminders for medication already taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakenDose {
    pub alert_id: i32,
    pub day: NaiveDate,
    pub time: NaiveTime,
}

/// One one-shot reminder, ready to hand to the scheduling bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDose {
    pub reminder_id: i32,
    pub fire_at_epoch_ms: i64,
    pub title: String,
    pub message: String,
}

/// Reminder id for a given alert occurrence. Deterministic, so re-planning
/// re-issues the same ids and pending alarms are replaced rather than
/// duplicated. Slots stay below 100 (the daily dose cap), so slots never
/// bleed into the alert part of the id; alert ids big enough to push the
/// result out of `i32` are a configuration error, not a wrap.
pub fn dose_reminder_id(alert_id: i32, slot: u32) -> Result<i32> {
    i32::try_from(slot)
        .ok()
        .and_then(|slot| alert_id.checked_mul(100)?.checked_add(slot))
        .ok_or_else(|| {
            PillcheckError::Config(format!("alert id {alert_id} overflows the reminder id range"))
        })
}

pub fn parse_hhmm(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| PillcheckError::Config(format!("invalid time of day {value:?}, expected HH:MM")))
}

/// Computes the one-shot reminders still worth scheduling today.
///
/// Fixed alerts are planned when today's weekday is listed, the occurrence is
/// strictly in the future, and no taken record matches the alert at exactly
/// that day and time. Interval alerts step from their start time to the end
/// of the day, skipping occurrences already past and occurrences with a taken
/// record within [`TAKEN_WINDOW_MINUTES`]. Output is sorted by fire time.
pub fn plan_day<Tz: TimeZone>(
    now: &DateTime<Tz>,
    alerts: &[ReminderAlert],
    taken: &[TakenDose],
) -> Result<Vec<PlannedDose>> {
    let local_now = now.naive_local();
    let today = local_now.date();
    let weekday = today.weekday().num_days_from_sunday() as u8;
    let mut planned = Vec::new();

    for alert in alerts {
        if !alert.active {
            continue;
        }
        match &alert.kind {
            AlertKind::Fixed { time, days } => {
                if !days.contains(&weekday) {
                    continue;
                }
                let at = parse_hhmm(time)?;
                let occurrence = today.and_time(at);
                if occurrence <= local_now {
                    continue;
                }
                if taken_exactly_at(taken, alert.id, today, at) {
                    continue;
                }
                if let Some(fire_at_epoch_ms) = epoch_ms(now, occurrence) {
                    planned.push(PlannedDose {
                        reminder_id: dose_reminder_id(alert.id, 0)?,
                        fire_at_epoch_ms,
                        title: alert.medication.clone(),
                        message: alert.dosage.clone().unwrap_or_default(),
                    });
                }
            }
            AlertKind::Interval { start, every_hours } => {
                if *every_hours == 0 {
                    return Err(PillcheckError::Config(format!(
                        "alert {} has a zero-hour interval",
                        alert.id
                    )));
                }
                let mut occurrence = today.and_time(parse_hhmm(start)?);
                let mut slot: u32 = 0;
                while slot < MAX_INTERVAL_DOSES_PER_DAY && occurrence.date() == today {
                    if occurrence > local_now
                        && !taken_within_window(taken, alert.id, today, occurrence.time())
                    {
                        if let Some(fire_at_epoch_ms) = epoch_ms(now, occurrence) {
                            planned.push(PlannedDose {
                                reminder_id: dose_reminder_id(alert.id, slot)?,
                                fire_at_epoch_ms,
                                title: alert.medication.clone(),
                                message: interval_message(alert.dosage.as_deref(), *every_hours),
                            });
                        }
                    }
                    slot += 1;
                    // A step past the representable datetime range is also past
                    // the end of today.
                    occurrence = match occurrence
                        .checked_add_signed(Duration::hours(i64::from(*every_hours)))
                    {
                        Some(next) => next,
                        None => break,
                    };
                }
            }
        }
    }

    planned.sort_by_key(|dose| (dose.fire_at_epoch_ms, dose.reminder_id));
    Ok(planned)
}

fn interval_message(dosage: Option<&str>, every_hours: u32) -> String {
    match dosage {
        Some(dosage) => format!("{dosage} (every {every_hours}h)"),
        None => format!("every {every_hours}h"),
    }
}

fn taken_exactly_at(taken: &[TakenDose], alert_id: i32, day: NaiveDate, at: NaiveTime) -> bool {
    taken
        .iter()
        .any(|t| t.alert_id == alert_id && t.day == day && t.time == at)
}

fn taken_within_window(taken: &[TakenDose], alert_id: i32, day: NaiveDate, at: NaiveTime) -> bool {
    taken.iter().any(|t| {
        t.alert_id == alert_id
            && t.day == day
            && (minute_of_day(t.time) - minute_of_day(at)).abs() <= TAKEN_WINDOW_MINUTES
    })
}

fn minute_of_day(time: NaiveTime) -> i64 {
    i64::from(time.hour() * 60 + time.minute())
}

// Local times skipped by a DST transition have no instant to fire at; those
// occurrences are dropped rather than guessed.
fn epoch_ms<Tz: TimeZone>(now: &DateTime<Tz>, local: NaiveDateTime) -> Option<i64> {
    now.timezone()
        .from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.timestamp_millis())
}
