use bar_status::framework::mock::{texts, ChannelSink, ScriptHandle, ScriptedGenerator};
use bar_status::framework::WidgetError;
use bar_status::generators::IntervalGenerator;
use bar_status::lifecycle::{
    lifecycle_channel, LifecycleState, ShutdownReport, SignalHandle, Status, StatusError,
};
use bar_status::model::{Align, Color, Element};
use bar_status::probes::ProbeResult;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

type Run = JoinHandle<(Status, Result<ShutdownReport, StatusError>)>;

/// A running status with `names.len()` scripted widgets.
struct Harness {
    scripts: Vec<ScriptHandle>,
    writes: mpsc::UnboundedReceiver<Vec<Element>>,
    signals: SignalHandle,
    state: watch::Receiver<LifecycleState>,
    run: Run,
}

impl Harness {
    /// Starts the status and waits for every widget's eager, empty first production.
    async fn start(names: &[&str]) -> Self {
        let (sink, writes) = ChannelSink::new();
        let mut status = Status::new(sink);
        let mut scripts = Vec::new();
        for name in names {
            let (gen, script) = ScriptedGenerator::new(*name);
            status.register(Box::new(gen)).expect("register");
            scripts.push(script);
        }
        let state = status.subscribe_state();
        let (signals, lifecycle) = lifecycle_channel();
        let run = tokio::spawn(async move {
            let result = status.start(lifecycle).await;
            (status, result)
        });
        let mut harness = Self {
            scripts,
            writes,
            signals,
            state,
            run,
        };
        for _ in names {
            assert!(harness.next_write().await.is_empty());
        }
        harness
    }

    async fn next_write(&mut self) -> Vec<String> {
        let write = timeout(WAIT, self.writes.recv())
            .await
            .expect("timed out waiting for a write")
            .expect("sink dropped");
        texts(&write)
    }

    async fn wait_for(&mut self, wanted: LifecycleState) {
        timeout(WAIT, self.state.wait_for(|state| *state == wanted))
            .await
            .expect("timed out waiting for state")
            .expect("status dropped");
    }

    async fn terminate(self) -> (Status, Result<ShutdownReport, StatusError>) {
        self.signals.terminate();
        timeout(WAIT, self.run)
            .await
            .expect("shutdown hung")
            .expect("status task panicked")
    }
}

#[tokio::test]
async fn slots_keep_registration_order() {
    let mut bar = Harness::start(&["a", "b"]).await;

    bar.scripts[0].push_texts(&["a1"]);
    assert_eq!(bar.next_write().await, vec!["a1"]);

    bar.scripts[1].push_texts(&["b1"]);
    assert_eq!(bar.next_write().await, vec!["a1", "b1"]);

    // A later update from the first widget stays in front
    bar.scripts[0].push_texts(&["a2"]);
    assert_eq!(bar.next_write().await, vec!["a2", "b1"]);

    // Multi-element slots replace, never append
    bar.scripts[1].push_texts(&["b2", "b3"]);
    assert_eq!(bar.next_write().await, vec!["a2", "b2", "b3"]);

    let (_, result) = bar.terminate().await;
    assert_eq!(
        result.unwrap(),
        ShutdownReport {
            producers: 2,
            acknowledged: 2
        }
    );
}

#[tokio::test]
async fn failed_widget_shows_error_and_stops() {
    let mut bar = Harness::start(&["a", "b"]).await;
    bar.scripts[0].push_texts(&["a1"]);
    assert_eq!(bar.next_write().await, vec!["a1"]);
    bar.scripts[1].push_texts(&["b1"]);
    assert_eq!(bar.next_write().await, vec!["a1", "b1"]);

    bar.scripts[1].push(Err(WidgetError::Probe("sensor gone".into())));
    let write = timeout(WAIT, bar.writes.recv()).await.unwrap().unwrap();
    assert_eq!(texts(&write), vec!["a1", "ERROR: sensor gone"]);
    let error = &write[1];
    assert_eq!(error.name, "error");
    assert_eq!(error.color, Some(Color::ALERT));
    assert_eq!(error.alignment, Some(Align::Right));

    // The failed widget's task ends and drops its generator
    timeout(WAIT, bar.scripts[1].closed()).await.unwrap();
    assert!(!bar.scripts[1].push_texts(&["b2"]));

    // The healthy widget keeps working next to the error
    bar.scripts[0].push_texts(&["a2"]);
    assert_eq!(bar.next_write().await, vec!["a2", "ERROR: sensor gone"]);

    let (status, result) = bar.terminate().await;
    assert_eq!(result.unwrap().acknowledged, 2);
    assert_eq!(
        status.last_error(1),
        Some(&WidgetError::Probe("sensor gone".into()))
    );
    assert_eq!(status.last_error(0), None);
}

#[tokio::test]
async fn suspended_updates_are_dropped_without_blocking() {
    let mut bar = Harness::start(&["a", "b"]).await;
    bar.scripts[0].push_texts(&["a1"]);
    assert_eq!(bar.next_write().await, vec!["a1"]);

    bar.signals.suspend();
    bar.wait_for(LifecycleState::Suspended).await;

    // More updates than the events channel can hold; none may block the widgets
    for n in 0..5 {
        assert!(bar.scripts[0].push_texts(&[format!("hidden{n}").as_str()]));
        assert!(bar.scripts[1].push_texts(&[format!("hidden{n}").as_str()]));
    }
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(bar.writes.try_recv().is_err(), "nothing is written while suspended");

    bar.signals.resume();
    bar.wait_for(LifecycleState::Running).await;

    bar.scripts[0].push_texts(&["a2"]);
    assert_eq!(bar.next_write().await, vec!["a2"]);

    let (status, result) = bar.terminate().await;
    assert_eq!(result.unwrap().acknowledged, 2);
    assert_eq!(status.state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn terminate_while_suspended_still_shuts_down() {
    let mut bar = Harness::start(&["a"]).await;
    bar.signals.suspend();
    bar.wait_for(LifecycleState::Suspended).await;

    let (_, result) = bar.terminate().await;
    assert_eq!(
        result.unwrap(),
        ShutdownReport {
            producers: 1,
            acknowledged: 1
        }
    );
}

#[tokio::test]
async fn every_widget_acknowledges_terminate() {
    for producers in [0, 1, 3, 16] {
        let names: Vec<String> = (0..producers).map(|i| format!("w{i}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut bar = Harness::start(&names).await;
        bar.wait_for(LifecycleState::Running).await;

        // Half the widgets have produced and wait on their trigger, half are mid-production
        for script in bar.scripts.iter().step_by(2) {
            script.push_texts(&["x"]);
        }

        let scripts = std::mem::take(&mut bar.scripts);
        let (_, result) = bar.terminate().await;
        assert_eq!(
            result.unwrap(),
            ShutdownReport {
                producers,
                acknowledged: producers
            }
        );
        assert!(scripts.iter().all(ScriptHandle::is_closed));
    }
}

#[tokio::test]
async fn closed_lifecycle_channel_terminates() {
    let (sink, _writes) = ChannelSink::new();
    let mut status = Status::new(sink);
    let (gen, _script) = ScriptedGenerator::new("a");
    status.register(Box::new(gen)).unwrap();

    let (handle, signals) = lifecycle_channel();
    drop(handle);
    let report = timeout(WAIT, status.start(signals)).await.unwrap().unwrap();
    assert_eq!(report.acknowledged, 1);
}

#[tokio::test]
async fn interval_widget_failure_is_sticky() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let probe = Arc::new(move || -> ProbeResult {
        match counter.fetch_add(1, Ordering::SeqCst) {
            0 => Ok(vec![Element::new("flaky", "fine")]),
            _ => Err(WidgetError::Probe("went away".into())),
        }
    });

    let (sink, mut writes) = ChannelSink::new();
    let mut status = Status::new(sink);
    status
        .register(Box::new(IntervalGenerator::new(
            "flaky",
            probe,
            Duration::from_millis(20),
        )))
        .unwrap();
    let (signals, lifecycle) = lifecycle_channel();
    let run = tokio::spawn(async move { status.start(lifecycle).await });

    let first = timeout(WAIT, writes.recv()).await.unwrap().unwrap();
    assert_eq!(texts(&first), vec!["fine"]);
    let second = timeout(WAIT, writes.recv()).await.unwrap().unwrap();
    assert_eq!(texts(&second), vec!["ERROR: went away"]);

    // No retries: the probe is never called again
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(writes.try_recv().is_err());

    signals.terminate();
    let report = timeout(WAIT, run).await.unwrap().unwrap().unwrap();
    assert_eq!(report.acknowledged, 1);
}

#[tokio::test]
async fn back_to_back_suspend_and_resume_keep_running() {
    let mut bar = Harness::start(&["a", "b"]).await;

    for round in 0..20 {
        bar.signals.suspend();
        bar.signals.resume();
        let text = format!("a{round}");
        bar.scripts[0].push_texts(&[text.as_str()]);
        assert_eq!(bar.next_write().await, vec![text]);
    }

    let (status, result) = bar.terminate().await;
    assert_eq!(result.unwrap().acknowledged, 2);
    assert_eq!(status.state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn failure_while_suspended_is_shown_on_resume() {
    let mut bar = Harness::start(&["a", "b"]).await;
    bar.scripts[0].push_texts(&["a1"]);
    assert_eq!(bar.next_write().await, vec!["a1"]);
    bar.scripts[1].push_texts(&["b1"]);
    assert_eq!(bar.next_write().await, vec!["a1", "b1"]);

    bar.signals.suspend();
    bar.wait_for(LifecycleState::Suspended).await;
    bar.scripts[1].push(Err(WidgetError::Probe("dead".into())));
    timeout(WAIT, bar.scripts[1].closed()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(bar.writes.try_recv().is_err(), "nothing is written while suspended");

    bar.signals.resume();
    assert_eq!(bar.next_write().await, vec!["a1", "ERROR: dead"]);

    // Later updates from healthy widgets keep the error in place
    bar.scripts[0].push_texts(&["a2"]);
    assert_eq!(bar.next_write().await, vec!["a2", "ERROR: dead"]);

    let (status, result) = bar.terminate().await;
    assert_eq!(result.unwrap().acknowledged, 2);
    assert_eq!(status.last_error(1), Some(&WidgetError::Probe("dead".into())));
}

#[tokio::test]
async fn shutdown_waits_for_a_running_probe() {
    let finished = Arc::new(AtomicBool::new(false));
    let flag = finished.clone();
    let probe = Arc::new(move || -> ProbeResult {
        std::thread::sleep(Duration::from_millis(500));
        flag.store(true, Ordering::SeqCst);
        Ok(vec![Element::new("slow", "done")])
    });

    let (sink, _writes) = ChannelSink::new();
    let mut status = Status::new(sink);
    status
        .register(Box::new(IntervalGenerator::new(
            "slow",
            probe,
            Duration::from_secs(60),
        )))
        .unwrap();
    let (signals, lifecycle) = lifecycle_channel();
    let run = tokio::spawn(async move { status.start(lifecycle).await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    signals.terminate();
    let report = timeout(WAIT, run).await.unwrap().unwrap().unwrap();
    assert_eq!(report.acknowledged, 1);
    assert!(finished.load(Ordering::SeqCst), "done acknowledged before the probe returned");
}
