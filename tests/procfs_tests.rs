use std::os::unix::process::ExitStatusExt;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use procman::manager::{CancelToken, MonitorEvent, MonitorExit, NixSignaller, TerminationOutcome};
use procman::{Manager, Metric, ProcessError, ProcfsSource, SnapshotProvider, Target};

fn source() -> ProcfsSource {
    ProcfsSource::new(Duration::from_millis(20))
}

fn spawn_sleeper() -> std::process::Child {
    Command::new("sleep")
        .arg("30")
        .stdout(Stdio::null())
        .spawn()
        .expect("sleep should be available")
}

#[test]
fn test_list_processes_returns_current_process() {
    let current_pid = std::process::id();
    let found = source()
        .list_processes(&[])
        .unwrap()
        .any(|p| p.pid() == current_pid);
    assert!(found, "Current process should be in the list");
}

#[test]
fn test_listing_fills_only_requested_fields() {
    let current_pid = std::process::id();
    let source = source();

    let bare = source
        .list_processes(&[])
        .unwrap()
        .find(|p| p.pid() == current_pid)
        .unwrap();
    assert_eq!(bare.cpu_percent(), None);
    assert_eq!(bare.memory_percent(), None);

    let full = source
        .list_processes(&[Metric::Cpu, Metric::Memory])
        .unwrap()
        .find(|p| p.pid() == current_pid)
        .unwrap();
    assert!(full.cpu_percent().is_some());
    assert!(full.memory_percent().unwrap() > 0.0);
}

#[test]
fn test_back_to_back_listings_see_the_same_long_lived_pids() {
    let source = source();
    let current_pid = std::process::id();
    for _ in 0..2 {
        let pids: Vec<u32> = source.list_processes(&[]).unwrap().map(|p| p.pid()).collect();
        assert!(pids.contains(&1));
        assert!(pids.contains(&current_pid));
    }
}

#[test]
fn test_get_process_returns_current_process() {
    let current_pid = std::process::id();
    let p = source().get_process(current_pid).unwrap();
    assert_eq!(p.pid(), current_pid);
    assert!(!p.name().is_empty());
    assert!(p.cpu_percent().is_some());
}

#[test]
fn test_get_process_returns_not_found_for_invalid_pid() {
    assert_eq!(
        source().get_process(999999999),
        Err(ProcessError::NotFound(999999999))
    );
}

#[test]
fn test_get_process_exiting_inside_cpu_window_is_not_found() {
    let mut child = Command::new("sleep")
        .arg("0.1")
        .stdout(Stdio::null())
        .spawn()
        .expect("sleep should be available");
    let pid = child.id();
    //Reaped as soon as it exits, so the second stat read finds nothing
    let reaper = thread::spawn(move || child.wait());

    let result = ProcfsSource::new(Duration::from_millis(600)).get_process(pid);

    reaper.join().unwrap().unwrap();
    assert_eq!(result, Err(ProcessError::NotFound(pid)));
}

#[test]
fn test_info_reports_real_owner() {
    let manager = Manager::new(source(), NixSignaller);
    let info = manager.info_for(std::process::id()).unwrap();
    assert_eq!(info.owner_id(), Some(nix::unistd::getuid().as_raw()));
}

#[test]
fn test_sigterm_stops_spawned_process() {
    let mut child = spawn_sleeper();
    let manager = Manager::new(source(), NixSignaller);

    let report = manager.terminate(&Target::Pid(child.id())).unwrap();
    assert_eq!(report.outcomes[0].outcome, TerminationOutcome::Terminated);

    let status = child.wait().unwrap();
    assert_eq!(status.signal(), Some(nix::libc::SIGTERM));
}

#[test]
fn test_kill_by_unknown_name_touches_nothing() {
    let manager = Manager::new(source(), NixSignaller);
    let report = manager
        .terminate(&Target::name("nonexistent-xyz-procman"))
        .unwrap();
    assert!(report.is_empty());
}

#[test]
fn test_monitor_reports_end_of_real_process() {
    let mut child = spawn_sleeper();
    let pid = child.id();
    let manager = Manager::new(source(), NixSignaller);
    let mut samples = 0;

    let exit = manager
        .monitor(&Target::Pid(pid), Duration::from_millis(10), &CancelToken::new(), |e| {
            if let MonitorEvent::Sample(_) = e {
                samples += 1;
                if samples == 1 {
                    //Reap it so the pid really disappears instead of lingering as a zombie
                    child.kill().unwrap();
                    child.wait().unwrap();
                }
            }
        })
        .unwrap();

    assert_eq!(exit, MonitorExit::ProcessEnded);
    assert_eq!(samples, 1);
}
