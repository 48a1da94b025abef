//! Durable registry behavior through the control surface

use assert_matches::assert_matches;
use pingmon::{HostRegistry, RegistryError};
use pretty_assertions::assert_eq;

use crate::helpers::*;

#[tokio::test]
async fn add_host_writes_the_registry_record() {
    let t = make_monitor(ScriptedProber::success_ms(1.0));

    assert!(t.monitor.list_hosts().is_empty());
    t.monitor.add_host("10.0.0.1", "router").await.unwrap();

    assert_eq!(t.monitor.list_hosts().len(), 1);
    let content = std::fs::read_to_string(&t.registry_path).unwrap();
    assert_eq!(content, "10.0.0.1,router\n");
}

#[tokio::test]
async fn duplicate_add_is_rejected_and_leaves_storage_untouched() {
    let t = make_monitor(ScriptedProber::success_ms(1.0));

    t.monitor.add_host("10.0.0.1", "router").await.unwrap();
    let err = t.monitor.add_host("10.0.0.1", "again").await.unwrap_err();

    assert_matches!(err, RegistryError::DuplicateAddress(_));
    let content = std::fs::read_to_string(&t.registry_path).unwrap();
    assert_eq!(content, "10.0.0.1,router\n");
}

#[tokio::test]
async fn remove_host_rewrites_the_file_without_the_entry() {
    let t = make_monitor(ScriptedProber::success_ms(1.0));

    t.monitor.add_host("10.0.0.1", "router").await.unwrap();
    t.monitor.add_host("1.1.1.1", "cf").await.unwrap();
    t.monitor.remove_host("10.0.0.1").await.unwrap();

    let content = std::fs::read_to_string(&t.registry_path).unwrap();
    assert_eq!(content, "1.1.1.1,cf\n");

    let err = t.monitor.remove_host("10.0.0.1").await.unwrap_err();
    assert_matches!(err, RegistryError::NotFound(_));
}

#[tokio::test]
async fn registry_survives_a_restart() {
    let t = make_monitor(ScriptedProber::success_ms(1.0));

    t.monitor.add_host("10.0.0.1", "router").await.unwrap();
    t.monitor.add_host("1.1.1.1", "cf").await.unwrap();

    let reloaded = HostRegistry::load(&t.registry_path);
    let addresses: Vec<_> = reloaded.list().into_iter().map(|e| e.address).collect();
    assert_eq!(addresses, vec!["10.0.0.1", "1.1.1.1"]);
}
