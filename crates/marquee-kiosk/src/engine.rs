use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{DateTime, Datelike, Local, NaiveDate, Timelike};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use marquee_actions::{ActionEffect, ActionRunner, ActionTable, TriggerDebounce};
use marquee_core::{
    config::{MarqueeConfig, TICK_INTERVAL_SECS, UPCOMING_LOG_EVERY_TICKS},
    MediaPlayer, PlayerEvent, UiSurface,
};
use marquee_playback::{resolve_hour_clip, weekday_greeting_path, PlaybackQueue};
use marquee_schedule::{load_schedule, next_upcoming, DayState, ScheduleEntry};

/// Control commands consumed from the outside (signals today, any IPC
/// surface tomorrow). Reloads are best-effort: on failure the previous
/// tables stay in force.
#[derive(Debug, Clone)]
pub enum KioskCommand {
    ReloadSchedule,
    ReloadActions,
    TriggerAction { name: String },
}

/// The chain currently tracked for display and same-name manual-trigger
/// suppression. Overlapping chains keep executing regardless of this.
struct ActiveAction {
    name: String,
    run: Uuid,
}

/// The single actor owning all mutable kiosk state.
///
/// Drives a 1 Hz tick and drains three mailboxes: control commands,
/// action-chain effects, and player completion events. Nothing outside
/// this struct touches the daily state, the action table, or the playback
/// queue, so no locking exists anywhere. Waits never block the actor:
/// chains suspend on their own timers inside [`ActionRunner`] tasks and
/// come back through the effects mailbox.
pub struct KioskEngine {
    config: MarqueeConfig,
    entries: Vec<ScheduleEntry>,
    actions: ActionTable,
    day: DayState,
    queue: PlaybackQueue,
    last_seen_date: NaiveDate,
    last_seen_hour: u32,
    /// Set only when a clip was actually enqueued for the hour; kept
    /// separate from `last_seen_hour` so repeated ticks within one hour
    /// stay no-ops.
    last_enqueued_hour: Option<u32>,
    current_action: Option<ActiveAction>,
    debounce: TriggerDebounce,
    runner: ActionRunner,
    cancel: CancellationToken,
    player: Arc<dyn MediaPlayer>,
    ui: Arc<dyn UiSurface>,
    commands_rx: mpsc::Receiver<KioskCommand>,
    effects_rx: mpsc::Receiver<ActionEffect>,
    player_rx: mpsc::Receiver<PlayerEvent>,
    ticks: u32,
}

impl KioskEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: MarqueeConfig,
        entries: Vec<ScheduleEntry>,
        actions: ActionTable,
        player: Arc<dyn MediaPlayer>,
        ui: Arc<dyn UiSurface>,
        commands_rx: mpsc::Receiver<KioskCommand>,
        player_rx: mpsc::Receiver<PlayerEvent>,
        started_at: DateTime<Local>,
    ) -> Self {
        let (effects_tx, effects_rx) = mpsc::channel(256);
        let cancel = CancellationToken::new();
        let runner = ActionRunner::new(effects_tx, cancel.clone());
        let debounce = TriggerDebounce::new(Duration::from_millis(config.engine.debounce_ms));

        Self {
            config,
            entries,
            actions,
            day: DayState::new(),
            queue: PlaybackQueue::new(),
            last_seen_date: started_at.date_naive(),
            last_seen_hour: started_at.hour(),
            last_enqueued_hour: None,
            current_action: None,
            debounce,
            runner,
            cancel,
            player,
            ui,
            commands_rx,
            effects_rx,
            player_rx,
            ticks: 0,
        }
    }

    /// Main event loop. Ticks every second until `shutdown` broadcasts
    /// `true`, at which point pending waits are cancelled and the player
    /// stopped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            entries = self.entries.len(),
            actions = self.actions.len(),
            "kiosk engine started"
        );

        let now = Local::now();
        self.enqueue_startup_sequence(now).await;
        self.enqueue_hour_clip(now.hour()).await;

        let mut interval = tokio::time::interval(Duration::from_secs(TICK_INTERVAL_SECS));
        loop {
            tokio::select! {
                _ = interval.tick() => self.tick(Local::now()).await,
                Some(cmd) = self.commands_rx.recv() => self.handle_command(cmd).await,
                Some(effect) = self.effects_rx.recv() => self.handle_effect(effect).await,
                Some(event) = self.player_rx.recv() => self.handle_player_event(event).await,
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("kiosk engine shutting down");
                        self.cancel.cancel();
                        if let Err(e) = self.player.stop().await {
                            warn!(error = %e, "player stop failed during shutdown");
                        }
                        break;
                    }
                }
            }
        }
    }

    /// One scheduler tick: clock refresh, date rollover, hour rollover,
    /// seeding, then firing decisions; in that order, every second.
    async fn tick(&mut self, now: DateTime<Local>) {
        self.ui.set_clock_text(&now.format("%A  %H:%M").to_string());

        let today = now.date_naive();
        if today != self.last_seen_date {
            info!(%today, "new day; daily state reset");
            self.last_seen_date = today;
            self.day.reset_for_new_day();
        }

        if now.hour() != self.last_seen_hour {
            info!(hour = now.hour(), "hour changed");
            self.last_seen_hour = now.hour();
            self.enqueue_hour_clip(now.hour()).await;
        }

        self.day.ensure_seeded(&self.entries);

        // Evaluate every entry against one `now` snapshot before firing
        // any, so no firing observes another from the same tick.
        let local_now = now.naive_local();
        let due: Vec<usize> = (0..self.entries.len())
            .filter(|&idx| self.day.should_fire(idx, &self.entries[idx], local_now))
            .collect();
        for idx in due {
            self.day.mark_fired(idx);
            self.fire_entry(idx).await;
        }

        self.ticks = self.ticks.wrapping_add(1);
        if self.ticks % UPCOMING_LOG_EVERY_TICKS == 0 {
            if let Some((idx, at)) = next_upcoming(&self.entries, local_now) {
                debug!(entry = idx, at = %at, "next upcoming entry");
            }
        }
    }

    async fn fire_entry(&mut self, idx: usize) {
        let (toast, action, time_label, days_label) = {
            let entry = &self.entries[idx];
            (
                entry.toast.clone(),
                entry.action.clone(),
                entry.time_label(),
                entry.days_label(),
            )
        };
        info!(entry = idx, time = %time_label, days = %days_label, "schedule entry fired");

        if let Some(text) = toast {
            self.ui.show_toast(&text, self.config.ui.toast_secs);
        }
        if let Some(name) = action {
            self.start_action(&name, false);
        }
    }

    /// Kick off a chain. Manual triggers are debounced per name and
    /// ignored while the same name is the tracked running action;
    /// scheduled firings skip both checks; the daily fired flags already
    /// gate them.
    fn start_action(&mut self, name: &str, manual: bool) {
        if manual {
            if self
                .current_action
                .as_ref()
                .is_some_and(|active| active.name == name)
            {
                debug!(action = %name, "already running; manual trigger ignored");
                return;
            }
            if !self.debounce.allow(name, Instant::now()) {
                debug!(action = %name, "manual trigger debounced");
                return;
            }
        }

        let Some(steps) = self.actions.get(name) else {
            warn!(action = %name, "unknown action; ignored");
            return;
        };
        if steps.is_empty() {
            warn!(action = %name, "action has no steps; ignored");
            return;
        }
        if let Some(active) = &self.current_action {
            info!(running = %active.name, starting = %name, "action already in flight; chains run concurrently");
        }

        let run = self.runner.start(name, steps);
        self.current_action = Some(ActiveAction {
            name: name.to_string(),
            run,
        });
    }

    async fn handle_effect(&mut self, effect: ActionEffect) {
        match effect {
            ActionEffect::Enqueue { path } => self.enqueue_clip(PathBuf::from(path)).await,
            ActionEffect::Toast { message } => {
                self.ui.show_toast(&message, self.config.ui.toast_secs);
            }
            ActionEffect::Finished { run, name } => {
                debug!(action = %name, run = %run, "action chain finished");
                if self
                    .current_action
                    .as_ref()
                    .is_some_and(|active| active.run == run)
                {
                    self.current_action = None;
                }
            }
        }
    }

    async fn handle_command(&mut self, cmd: KioskCommand) {
        match cmd {
            KioskCommand::ReloadSchedule => {
                match load_schedule(Path::new(&self.config.schedule.path)) {
                    Ok(entries) => {
                        info!(count = entries.len(), "schedule reloaded; daily state reset");
                        self.entries = entries;
                        // Entry identity is positional: every prior offset
                        // and fired flag is invalid after a reload.
                        self.day.reset_for_new_day();
                    }
                    Err(e) => {
                        warn!(error = %e, "schedule reload failed; keeping previous schedule");
                    }
                }
            }
            KioskCommand::ReloadActions => {
                match ActionTable::load(Path::new(&self.config.schedule.script_path)) {
                    Ok(actions) => {
                        info!(count = actions.len(), "action table reloaded");
                        // Running chains keep the snapshots they captured.
                        self.actions = actions;
                    }
                    Err(e) => {
                        warn!(error = %e, "action table reload failed; keeping previous table");
                    }
                }
            }
            KioskCommand::TriggerAction { name } => {
                info!(action = %name, "manual trigger");
                self.start_action(&name, true);
            }
        }
    }

    async fn handle_player_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::Finished => debug!("playback finished"),
            PlayerEvent::Failed { ref reason } => warn!(reason = %reason, "playback failed; advancing"),
        }
        match self.queue.advance() {
            Some(next) => self.play_now(next).await,
            None => self.go_idle(),
        }
    }

    /// Offer a clip to the queue, starting playback immediately when the
    /// queue is idle. A missing file is an immediate failure: logged and
    /// skipped without touching the queue.
    async fn enqueue_clip(&mut self, path: PathBuf) {
        if !path.exists() {
            warn!(path = %path.display(), "clip missing; skipped");
            return;
        }
        match self.queue.enqueue(path) {
            Some(to_play) => self.play_now(to_play).await,
            None => info!(pending = self.queue.pending_len(), "clip queued"),
        }
    }

    /// Start playback, skipping forward through start failures until
    /// something plays or the queue drains.
    async fn play_now(&mut self, first: PathBuf) {
        let mut next = Some(first);
        while let Some(path) = next {
            self.ui.show_video_layer();
            match self.player.play_file(&path).await {
                Ok(()) => {
                    info!(path = %path.display(), "playing");
                    return;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "playback start failed; advancing");
                    next = self.queue.advance();
                }
            }
        }
        self.go_idle();
    }

    fn go_idle(&mut self) {
        debug!("playback queue drained; back to idle clock");
        self.ui.hide_video_layer();
    }

    /// Enqueue the hour announcement at most once per wall-clock hour,
    /// falling back to the idle clip when the hour-keyed file is missing.
    async fn enqueue_hour_clip(&mut self, hour: u32) {
        if self.last_enqueued_hour == Some(hour) {
            return;
        }
        let clip = resolve_hour_clip(
            Path::new(&self.config.media.announcements_dir),
            &self.config.media.clip_prefix,
            hour,
            Path::new(&self.config.media.fallback_clip),
        );
        if !clip.exists() {
            warn!(hour, path = %clip.display(), "hour announcement missing; skipped");
            return;
        }
        self.enqueue_clip(clip).await;
        self.last_enqueued_hour = Some(hour);
    }

    /// Queue the boot clips: the intro greeting, then today's weekday
    /// greeting when one exists. Missing files are skipped quietly.
    async fn enqueue_startup_sequence(&mut self, now: DateTime<Local>) {
        let intro = PathBuf::from(&self.config.media.intro_clip);
        if intro.exists() {
            self.enqueue_clip(intro).await;
        } else {
            debug!(path = %intro.display(), "intro clip missing; skipped");
        }

        let greeting = weekday_greeting_path(
            Path::new(&self.config.media.announcements_dir),
            &self.config.media.clip_prefix,
            now.weekday(),
        );
        if greeting.exists() {
            self.enqueue_clip(greeting).await;
        } else {
            debug!(path = %greeting.display(), "weekday greeting missing; skipped");
        }
    }
}
