mod common;

use std::time::Duration;

use common::{Call, FakeBackend};
use pspace_app_core::app_core::{DomainEvent, LifecycleEvent};
use pspace_app_core::orchestrator::run_operation;
use pspace_app_core::{LifecyclePhase, SettleTimings, SpaceOperation};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn drain(rx: &mut mpsc::Receiver<DomainEvent>) -> Vec<LifecycleEvent> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        if let DomainEvent::Lifecycle { ev, .. } = ev {
            out.push(ev);
        }
    }
    out
}

fn time_of(fake: &FakeBackend, call: &Call) -> tokio::time::Instant {
    fake.call_times()
        .into_iter()
        .find(|(c, _)| c == call)
        .map(|(_, at)| at)
        .unwrap_or_else(|| panic!("{call:?} was not made"))
}

#[tokio::test(start_paused = true)]
async fn create_waits_five_seconds_before_refreshing() {
    let fake = FakeBackend::with_spaces(&[10]);
    let (tx, mut rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();

    run_operation(
        &fake,
        &tx,
        &cancel,
        uuid::Uuid::new_v4(),
        SpaceOperation::Create {
            name: "Work".into(),
        },
        &SettleTimings::default(),
        "Space",
    )
    .await;

    let created = time_of(&fake, &Call::CreateProfile("Work".into()));
    let listed = time_of(&fake, &Call::ListProfiles);
    assert!(listed - created >= Duration::from_millis(5000));

    let events = drain(&mut rx);
    assert!(matches!(
        events.as_slice(),
        [
            LifecycleEvent::PhaseChanged(LifecyclePhase::Settling),
            LifecycleEvent::PhaseChanged(LifecyclePhase::Refreshing),
            LifecycleEvent::Refreshed(snapshot),
        ] if snapshot.len() == 2
    ));
}

#[tokio::test(start_paused = true)]
async fn delete_waits_before_and_after_removal() {
    let fake = FakeBackend::with_spaces(&[10, 11]);
    let (tx, mut rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();
    let started = tokio::time::Instant::now();

    run_operation(
        &fake,
        &tx,
        &cancel,
        uuid::Uuid::new_v4(),
        SpaceOperation::Delete { id: 11 },
        &SettleTimings::default(),
        "Space",
    )
    .await;

    let removed = time_of(&fake, &Call::RemoveProfile(11));
    let listed = time_of(&fake, &Call::ListProfiles);
    assert!(removed - started >= Duration::from_millis(500));
    assert!(listed - removed >= Duration::from_millis(2000));

    match drain(&mut rx).last() {
        Some(LifecycleEvent::Refreshed(snapshot)) => {
            assert_eq!(snapshot.len(), 1);
            assert!(!snapshot.contains(11));
        }
        other => panic!("unexpected final event: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn failed_create_skips_settle_and_refresh() {
    let fake = FakeBackend::with_spaces(&[10]);
    fake.state().fail_create = true;
    let (tx, mut rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();
    let started = tokio::time::Instant::now();

    run_operation(
        &fake,
        &tx,
        &cancel,
        uuid::Uuid::new_v4(),
        SpaceOperation::Create {
            name: "Work".into(),
        },
        &SettleTimings::default(),
        "Space",
    )
    .await;

    assert!(tokio::time::Instant::now() - started < Duration::from_millis(5000));
    assert!(!fake.calls().contains(&Call::ListProfiles));
    let events = drain(&mut rx);
    assert!(matches!(
        events.as_slice(),
        [LifecycleEvent::Failed { message }] if message.contains("couldn't create User")
    ));
}

#[tokio::test(start_paused = true)]
async fn shutdown_interrupts_settle_delay() {
    let fake = FakeBackend::with_spaces(&[10]);
    let (tx, mut rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();

    let task = {
        let fake = fake.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            run_operation(
                &fake,
                &tx,
                &cancel,
                uuid::Uuid::new_v4(),
                SpaceOperation::Create {
                    name: "Work".into(),
                },
                &SettleTimings::default(),
                "Space",
            )
            .await;
        })
    };

    tokio::time::sleep(Duration::from_secs(1)).await;
    cancel.cancel();
    task.await.unwrap();

    assert!(!fake.calls().contains(&Call::ListProfiles));
    assert!(matches!(
        drain(&mut rx).last(),
        Some(LifecycleEvent::Cancelled)
    ));
}

#[tokio::test(start_paused = true)]
async fn configured_timings_are_honoured() {
    let fake = FakeBackend::with_spaces(&[10]);
    let (tx, _rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();
    let timings = SettleTimings {
        create_settle_ms: 250,
        ..SettleTimings::default()
    };

    run_operation(
        &fake,
        &tx,
        &cancel,
        uuid::Uuid::new_v4(),
        SpaceOperation::Create {
            name: "Work".into(),
        },
        &timings,
        "Space",
    )
    .await;

    let created = time_of(&fake, &Call::CreateProfile("Work".into()));
    let listed = time_of(&fake, &Call::ListProfiles);
    let gap = listed - created;
    assert!(gap >= Duration::from_millis(250));
    assert!(gap < Duration::from_millis(5000));
}
