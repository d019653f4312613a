use std::{path::Path, sync::Arc};

use clap::Parser;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

mod engine;
mod surface;

use engine::{KioskCommand, KioskEngine};
use surface::{LogUi, LoggingPlayer};

/// Kiosk display daemon: shows a clock and plays scheduled video clips.
#[derive(Parser, Debug)]
#[command(name = "marquee-kiosk", version, about)]
struct Cli {
    /// Path to marquee.toml (MARQUEE_* env overrides apply on top).
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marquee_kiosk=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = marquee_core::MarqueeConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        marquee_core::MarqueeConfig::default()
    });

    let entries = match marquee_schedule::load_schedule(Path::new(&config.schedule.path)) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "schedule unavailable; starting with an empty schedule");
            Vec::new()
        }
    };
    let actions = match marquee_actions::ActionTable::load(Path::new(&config.schedule.script_path))
    {
        Ok(table) => table,
        Err(e) => {
            warn!(error = %e, "action table unavailable; starting with an empty table");
            marquee_actions::ActionTable::default()
        }
    };

    // Control commands (signals) and player completion events both drain
    // into the single engine actor.
    let (commands_tx, commands_rx) = mpsc::channel::<KioskCommand>(32);
    let (player_tx, player_rx) = mpsc::channel(32);

    let player = Arc::new(LoggingPlayer::new(player_tx));
    let ui = Arc::new(LogUi);

    let manual_action = config.engine.manual_action.clone();
    let engine = KioskEngine::new(
        config,
        entries,
        actions,
        player,
        ui,
        commands_rx,
        player_rx,
        chrono::Local::now(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let engine_task = tokio::spawn(async move { engine.run(shutdown_rx).await });

    spawn_signal_listeners(commands_tx, manual_action);

    tokio::signal::ctrl_c().await?;
    info!("ctrl-c received; shutting down");
    let _ = shutdown_tx.send(true);
    engine_task.await?;
    Ok(())
}

/// SIGHUP reloads the schedule and action table; SIGUSR1 force-fires the
/// configured manual action. Both are best-effort; a full mailbox just
/// drops the command.
#[cfg(unix)]
fn spawn_signal_listeners(commands: mpsc::Sender<KioskCommand>, manual_action: String) {
    use tokio::signal::unix::{signal, SignalKind};

    let reload_commands = commands.clone();
    tokio::spawn(async move {
        let Ok(mut hangup) = signal(SignalKind::hangup()) else {
            warn!("SIGHUP listener unavailable");
            return;
        };
        while hangup.recv().await.is_some() {
            info!("SIGHUP received, reloading schedule and action table");
            let _ = reload_commands.send(KioskCommand::ReloadSchedule).await;
            let _ = reload_commands.send(KioskCommand::ReloadActions).await;
        }
    });

    tokio::spawn(async move {
        let Ok(mut usr1) = signal(SignalKind::user_defined1()) else {
            warn!("SIGUSR1 listener unavailable");
            return;
        };
        while usr1.recv().await.is_some() {
            info!(action = %manual_action, "SIGUSR1 manual trigger");
            let _ = commands
                .send(KioskCommand::TriggerAction {
                    name: manual_action.clone(),
                })
                .await;
        }
    });
}

#[cfg(not(unix))]
fn spawn_signal_listeners(_commands: mpsc::Sender<KioskCommand>, _manual_action: String) {}
