//! End-to-end interpreter flow: ordering, wait suspension, cancellation,
//! and overlapping invocations.

use std::sync::Arc;

use marquee_actions::{ActionEffect, ActionRunner, ActionStep};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn runner() -> (ActionRunner, mpsc::Receiver<ActionEffect>, CancellationToken) {
    let (tx, rx) = mpsc::channel(32);
    let cancel = CancellationToken::new();
    (ActionRunner::new(tx, cancel.clone()), rx, cancel)
}

#[tokio::test(start_paused = true)]
async fn play_wait_toast_play_runs_in_order() {
    let (runner, mut rx, _cancel) = runner();
    let steps = Arc::new(vec![
        ActionStep::Play("a.mp4".into()),
        ActionStep::Wait(2),
        ActionStep::Toast("x".into()),
        ActionStep::Play("b.mp4".into()),
    ]);

    let started = tokio::time::Instant::now();
    let run = runner.start("ACT_SEQ", steps);

    assert_eq!(
        rx.recv().await.unwrap(),
        ActionEffect::Enqueue { path: "a.mp4".into() }
    );
    // The toast only arrives once the (virtual) two seconds have elapsed.
    assert_eq!(
        rx.recv().await.unwrap(),
        ActionEffect::Toast { message: "x".into() }
    );
    assert!(started.elapsed() >= tokio::time::Duration::from_secs(2));
    assert_eq!(
        rx.recv().await.unwrap(),
        ActionEffect::Enqueue { path: "b.mp4".into() }
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        ActionEffect::Finished {
            run,
            name: "ACT_SEQ".into()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn malformed_steps_are_skipped_not_fatal() {
    let (runner, mut rx, _cancel) = runner();
    let steps = Arc::new(vec![
        ActionStep::Malformed("FROB".into()),
        ActionStep::Play("ok.mp4".into()),
    ]);

    let run = runner.start("ACT_ODD", steps);

    assert_eq!(
        rx.recv().await.unwrap(),
        ActionEffect::Enqueue { path: "ok.mp4".into() }
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        ActionEffect::Finished {
            run,
            name: "ACT_ODD".into()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn cancellation_abandons_a_waiting_chain() {
    let (runner, mut rx, cancel) = runner();
    let steps = Arc::new(vec![
        ActionStep::Play("a.mp4".into()),
        ActionStep::Wait(60),
        ActionStep::Play("never.mp4".into()),
    ]);

    runner.start("ACT_CUT", steps);

    assert_eq!(
        rx.recv().await.unwrap(),
        ActionEffect::Enqueue { path: "a.mp4".into() }
    );
    cancel.cancel();
    drop(runner);
    // The chain exits inside the wait: no second enqueue, no Finished.
    assert_eq!(rx.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn overlapping_invocations_progress_independently() {
    let (runner, mut rx, _cancel) = runner();
    let steps = Arc::new(vec![
        ActionStep::Wait(1),
        ActionStep::Play("shared.mp4".into()),
    ]);

    let first = runner.start("ACT_TWICE", steps.clone());
    let second = runner.start("ACT_TWICE", steps);
    assert_ne!(first, second);

    let mut enqueues = 0;
    let mut finished = Vec::new();
    for _ in 0..4 {
        match rx.recv().await.unwrap() {
            ActionEffect::Enqueue { path } => {
                assert_eq!(path, "shared.mp4");
                enqueues += 1;
            }
            ActionEffect::Finished { run, .. } => finished.push(run),
            other => panic!("unexpected effect: {other:?}"),
        }
    }
    assert_eq!(enqueues, 2);
    assert_eq!(finished.len(), 2);
    assert!(finished.contains(&first) && finished.contains(&second));
}
