use std::sync::Arc;

use rand::Rng;
use tokio::{
    sync::mpsc,
    time::{sleep, Duration},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::step::{substitute_ranges, ActionStep};

/// A side effect produced by a running chain, marshalled back to the engine
/// actor's mailbox. Runner tasks never touch engine state directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionEffect {
    /// Enqueue this path onto the playback queue.
    Enqueue { path: String },
    /// Surface a toast message.
    Toast { message: String },
    /// The chain ran off the end of its step list.
    Finished { run: Uuid, name: String },
}

/// Spawns action chains and hands their effects to the engine.
///
/// Each invocation is an independent task with its own step cursor and wait
/// timer; overlapping invocations (even of the same name) progress
/// concurrently by design; the engine only tracks the most recent name for
/// display. The shared cancel token abandons pending waits at shutdown.
#[derive(Clone)]
pub struct ActionRunner {
    effects: mpsc::Sender<ActionEffect>,
    cancel: CancellationToken,
}

impl ActionRunner {
    pub fn new(effects: mpsc::Sender<ActionEffect>, cancel: CancellationToken) -> Self {
        Self { effects, cancel }
    }

    /// Start one invocation of `name` over a captured step snapshot.
    /// Returns the run id correlating its effects and log lines.
    pub fn start(&self, name: &str, steps: Arc<Vec<ActionStep>>) -> Uuid {
        let run = Uuid::new_v4();
        info!(action = %name, run = %run, steps = steps.len(), "action started");
        tokio::spawn(run_steps(
            name.to_string(),
            run,
            steps,
            self.effects.clone(),
            self.cancel.clone(),
        ));
        run
    }
}

/// Drive one chain to completion.
///
/// The cursor only moves forward; a `Wait` suspends on a cancellable timer
/// and everything else emits its effect and advances. Step handoffs go
/// through `yield_now`, so a long script neither recurses nor starves the
/// engine mailbox.
async fn run_steps(
    name: String,
    run: Uuid,
    steps: Arc<Vec<ActionStep>>,
    effects: mpsc::Sender<ActionEffect>,
    cancel: CancellationToken,
) {
    let mut step_index = 0;
    while step_index < steps.len() {
        match &steps[step_index] {
            ActionStep::Play(path) => {
                emit(&effects, ActionEffect::Enqueue { path: path.clone() }).await;
            }
            ActionStep::PlayRandomFromRange(pattern) => {
                let path = substitute_ranges(pattern);
                debug!(action = %name, run = %run, step = step_index, %path, "range resolved");
                emit(&effects, ActionEffect::Enqueue { path }).await;
            }
            ActionStep::PlayRandomFromChoices(choices) => {
                let path = choices[rand::thread_rng().gen_range(0..choices.len())].clone();
                debug!(action = %name, run = %run, step = step_index, %path, "choice picked");
                emit(&effects, ActionEffect::Enqueue { path }).await;
            }
            ActionStep::Wait(secs) => {
                debug!(action = %name, run = %run, step = step_index, secs, "waiting");
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!(action = %name, run = %run, "wait cancelled; chain abandoned");
                        return;
                    }
                    _ = sleep(Duration::from_secs(*secs)) => {}
                }
            }
            ActionStep::Toast(message) => {
                emit(
                    &effects,
                    ActionEffect::Toast {
                        message: message.clone(),
                    },
                )
                .await;
            }
            ActionStep::Malformed(op) => {
                warn!(action = %name, run = %run, step = step_index, op = %op, "malformed step skipped");
            }
        }
        step_index += 1;
        tokio::task::yield_now().await;
    }

    debug!(action = %name, run = %run, "action finished");
    emit(&effects, ActionEffect::Finished { run, name }).await;
}

async fn emit(effects: &mpsc::Sender<ActionEffect>, effect: ActionEffect) {
    if effects.send(effect).await.is_err() {
        debug!("engine mailbox closed; effect dropped");
    }
}
