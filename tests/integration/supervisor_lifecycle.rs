//! Start/stop/add/remove semantics of the probe supervisor

use std::time::Duration;

use crate::helpers::*;

#[tokio::test]
async fn host_added_while_running_starts_probing_without_restart() {
    let prober = ScriptedProber::success_ms(1.0);
    let t = make_monitor(prober.clone());

    t.monitor.start_all().await;
    assert!(t.monitor.active_hosts().await.is_empty());

    t.monitor.add_host("10.0.0.1", "router").await.unwrap();

    assert!(
        eventually(async || prober.probes() > 0).await,
        "new host should be probed without another start_all"
    );
    assert_eq!(t.monitor.active_hosts().await, vec!["10.0.0.1"]);

    t.monitor.shutdown().await;
}

#[tokio::test]
async fn start_only_picks_up_registered_hosts() {
    let prober = ScriptedProber::success_ms(1.0);
    let t = make_monitor(prober.clone());

    t.monitor.add_host("10.0.0.1", "router").await.unwrap();
    assert!(t.monitor.active_hosts().await.is_empty(), "stopped monitor must not probe");

    t.monitor.start_all().await;
    assert!(t.monitor.is_running());
    assert_eq!(t.monitor.active_hosts().await, vec!["10.0.0.1"]);

    t.monitor.shutdown().await;
}

#[tokio::test]
async fn removed_host_stops_logging_within_one_interval() {
    let prober = ScriptedProber::success_ms(1.0);
    let t = make_monitor(prober.clone());

    t.monitor.add_host("10.0.0.1", "router").await.unwrap();
    t.monitor.start_all().await;

    let sink = t.sink.clone();
    assert!(
        eventually(async || !sink.lines_for("10.0.0.1").is_empty()).await,
        "host should produce log lines while registered"
    );

    t.monitor.remove_host("10.0.0.1").await.unwrap();

    let monitor = &t.monitor;
    assert!(
        eventually(async || monitor.active_hosts().await.is_empty()).await,
        "task should exit after removal"
    );

    // once the task is gone no further lines may appear for that host
    let lines_after_removal = t.sink.lines_for("10.0.0.1").len();
    tokio::time::sleep(TEST_INTERVAL * 5).await;
    assert_eq!(t.sink.lines_for("10.0.0.1").len(), lines_after_removal);

    t.monitor.shutdown().await;
}

#[tokio::test]
async fn rapid_remove_then_add_keeps_a_single_task() {
    let prober = ScriptedProber::success_ms(1.0);
    let t = make_monitor(prober.clone());

    t.monitor.add_host("10.0.0.1", "router").await.unwrap();
    t.monitor.start_all().await;

    for _ in 0..5 {
        t.monitor.remove_host("10.0.0.1").await.unwrap();
        t.monitor.add_host("10.0.0.1", "router").await.unwrap();
    }

    assert_eq!(t.monitor.active_hosts().await, vec!["10.0.0.1"]);

    t.monitor.shutdown().await;
}

#[tokio::test]
async fn stop_then_immediate_start_does_not_double_a_mid_probe_host() {
    // probe calls outlast the interval, so stop lands mid-probe
    let prober = ScriptedProber::slow(Duration::from_millis(150));
    let t = make_monitor(prober.clone());

    t.monitor.add_host("10.0.0.1", "router").await.unwrap();
    t.monitor.start_all().await;

    assert!(eventually(async || prober.probes() > 0).await);

    t.monitor.stop_all().await;
    t.monitor.start_all().await;

    assert_eq!(
        t.monitor.active_hosts().await,
        vec!["10.0.0.1"],
        "exactly one task may own this host's log stream"
    );

    t.monitor.shutdown().await;
}

#[tokio::test]
async fn shutdown_leaves_nothing_running() {
    let prober = ScriptedProber::success_ms(1.0);
    let t = make_monitor(prober.clone());

    t.monitor.add_host("10.0.0.1", "router").await.unwrap();
    t.monitor.add_host("1.1.1.1", "cf").await.unwrap();
    t.monitor.start_all().await;

    t.monitor.shutdown().await;

    assert!(!t.monitor.is_running());
    assert!(t.monitor.active_hosts().await.is_empty());

    // idempotent
    t.monitor.stop_all().await;
    t.monitor.shutdown().await;
}
