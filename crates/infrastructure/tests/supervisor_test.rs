//! `/bin/sh` stands in for the SUT binary: `sh -C <config> -l ...` runs the
//! generated configuration as a script, with noclobber set.
#![cfg(unix)]

use dns_harness_application::ports::SutProcess;
use dns_harness_domain::HarnessError;
use dns_harness_infrastructure::ProcessSupervisor;
use std::net::SocketAddr;
use std::time::Duration;

mod helpers;
use helpers::subscribe;

const GRACE: Duration = Duration::from_millis(200);

fn listen_addr() -> SocketAddr {
    "127.0.0.1:5340".parse().unwrap()
}

fn script(body: &str) -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), body).unwrap();
    file
}

#[tokio::test]
async fn test_early_exit_reports_exit_code() {
    subscribe();
    let config = script("exit 3\n");
    let mut supervisor = ProcessSupervisor::new("/bin/sh").startup_grace(GRACE);

    let err = supervisor
        .start(config.path(), listen_addr(), &["127.0.0.1/32".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, HarnessError::SutExited { code: Some(3) }));
    assert_eq!(err.exit_code(), 3);
    assert!(!supervisor.is_running());
}

#[tokio::test]
async fn test_running_process_is_stopped() {
    subscribe();
    let config = script("sleep 30\n");
    let mut supervisor = ProcessSupervisor::new("/bin/sh").startup_grace(GRACE);

    supervisor
        .start(config.path(), listen_addr(), &[])
        .await
        .unwrap();
    assert!(supervisor.is_running());
    assert!(supervisor.pid().is_some());

    tokio::time::timeout(Duration::from_secs(5), supervisor.stop())
        .await
        .expect("SIGTERM should end the child")
        .unwrap();
    assert!(!supervisor.is_running());
    assert!(supervisor.pid().is_none());
}

#[tokio::test]
async fn test_stop_without_start_is_noop() {
    let mut supervisor = ProcessSupervisor::new("/bin/sh");
    supervisor.stop().await.unwrap();
    assert!(!supervisor.is_running());
}

#[tokio::test]
async fn test_missing_binary_fails_to_spawn() {
    subscribe();
    let config = script("");
    let mut supervisor =
        ProcessSupervisor::new("/nonexistent/dns-harness-sut").startup_grace(GRACE);

    let err = supervisor
        .start(config.path(), listen_addr(), &[])
        .await
        .unwrap_err();

    assert!(matches!(err, HarnessError::SutSpawn(_)));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_acl_entries_reach_the_command_line() {
    subscribe();
    let dir = tempfile::tempdir().unwrap();
    let args_file = dir.path().join("args");
    let config = script(&format!("echo \"$@\" > {}\nsleep 30\n", args_file.display()));
    let mut supervisor = ProcessSupervisor::new("/bin/sh").startup_grace(GRACE);

    supervisor
        .start(
            config.path(),
            listen_addr(),
            &["127.0.0.1/32".to_string(), "::1/128".to_string()],
        )
        .await
        .unwrap();
    supervisor.stop().await.unwrap();

    let args = std::fs::read_to_string(&args_file).unwrap();
    assert_eq!(
        args.trim(),
        "-l 127.0.0.1:5340 --acl 127.0.0.1/32 --acl ::1/128"
    );
}
