use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

use pillcheck::alarm::{AlarmEvent, LocalAlarmService};
use pillcheck::config::Config;
use pillcheck::error::Result;
use pillcheck::interfaces::scheduler::ScheduledJob;
use pillcheck::planning;
use pillcheck::presenter::DesktopPresenter;
use pillcheck::scheduler::{minutes, Scheduler};
use pillcheck::{ReminderBridge, ReminderPlatform};

#[derive(Parser, Debug)]
#[command(name = "pillcheckd")]
#[command(about = "PillCheck local reminder daemon")]
struct Cli {
    #[arg(long, default_value_t = pillcheck::runtime_paths::default_config_path())]
    config: String,

    #[arg(long, default_value_t = 30)]
    replan_minutes: u64,
}

struct ReplanJob {
    bridge: ReminderBridge,
    config_path: String,
    interval: Duration,
}

#[async_trait]
impl ScheduledJob for ReplanJob {
    fn name(&self) -> &str {
        "replan"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn run(&self) -> Result<()> {
        // Re-read the config so edits and fresh taken records are picked up;
        // deterministic reminder ids make re-scheduling replace, not duplicate.
        let config = Config::from_file(&self.config_path)?;
        let scheduled = plan_and_schedule(&self.bridge, &config)?;
        tracing::debug!(scheduled, "day re-planned");
        Ok(())
    }
}

fn plan_and_schedule(bridge: &ReminderBridge, config: &Config) -> Result<usize> {
    let now = chrono::Local::now();
    let taken = config.taken_doses()?;
    let doses = planning::plan_day(&now, &config.alerts, &taken)?;
    let count = doses.len();
    for dose in doses {
        bridge.schedule_reminder(
            dose.reminder_id,
            dose.fire_at_epoch_ms,
            &dose.title,
            &dose.message,
        );
    }
    Ok(count)
}

#[tokio::main]
async fn main() -> Result<()> {
    pillcheck::logging::init_tracing("pillcheckd");
    let cli = Cli::parse();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        git_sha = env!("PILLCHECK_GIT_SHA"),
        config = %cli.config,
        "pillcheckd starting"
    );

    let config = Config::from_file(&cli.config)?;
    let replan_every = config.replan_minutes.unwrap_or(cli.replan_minutes).max(1);

    let service = LocalAlarmService::spawn(Arc::new(DesktopPresenter));
    let platform: Arc<dyn ReminderPlatform> = Arc::new(service.clone());
    let bridge = ReminderBridge::new(Some(platform));

    let scheduled = plan_and_schedule(&bridge, &config)?;
    tracing::info!(scheduled, alerts = config.alerts.len(), "day planned");

    let mut scheduler = Scheduler::new();
    scheduler.register_job(Arc::new(ReplanJob {
        bridge: bridge.clone(),
        config_path: cli.config.clone(),
        interval: minutes(replan_every),
    }));
    scheduler.start();

    let mut events = service.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    tracing::info!("type `taken` to confirm the active reminder, `quit` to exit");

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(AlarmEvent::Fired { id, title, .. }) => {
                        tracing::info!(id, title = %title, "reminder fired");
                    }
                    Ok(AlarmEvent::Confirmed { title }) => {
                        tracing::info!(title = %title, "dose confirmed");
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "alarm events lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(input)) => match input.trim() {
                        "taken" | "confirm" => service.confirm(),
                        "quit" | "exit" => break,
                        "" => {}
                        other => tracing::info!(input = other, "commands: taken, quit"),
                    },
                    Ok(None) => break,
                    Err(err) => {
                        tracing::warn!(error = %err, "stdin read failed");
                        break;
                    }
                }
            }
        }
    }

    scheduler.stop().await;
    service.shutdown();
    Ok(())
}
