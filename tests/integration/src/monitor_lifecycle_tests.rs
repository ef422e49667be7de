//! Monitor lifecycle against a converged profile tree
//!
//! Exercises the not-ready-then-ready startup sequence and the pipeline's
//! own output redirection, using a short shell pipeline in place of
//! dbus-monitor.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use profile_fs::mirror;
use profile_monitor::PipelineMonitor;
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn monitor_becomes_ready_once_the_tree_is_converged() {
    let temp = TempDir::new().unwrap();
    let template = temp.path().join("template");
    let profile = temp.path().join("profile");
    write(&template.join("JS/controller.uc.js"), "// js");

    // Before the mirror pass the prerequisite directory is missing
    assert!(
        PipelineMonitor::focus_monitor(&profile)
            .spawn()
            .unwrap()
            .is_none()
    );

    mirror::synchronize(&template, &profile.join("chrome")).unwrap();

    let handle = PipelineMonitor::focus_monitor(&profile)
        .spawn()
        .unwrap()
        .expect("converged profile should be ready for monitoring");
    handle.shutdown();
}

#[test]
fn pipeline_appends_to_its_output_target() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("events.log");
    let command = format!(
        "printf 'isPidFocused true\\n' >> {}; sleep 30",
        output.display()
    );

    let handle = PipelineMonitor::new(command, temp.path())
        .with_intervals(Duration::from_millis(50), Duration::from_millis(500))
        .spawn()
        .unwrap()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(2);
    while !output.exists() {
        assert!(Instant::now() < deadline, "pipeline never wrote its output");
        std::thread::sleep(Duration::from_millis(10));
    }

    handle.shutdown();
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "isPidFocused true\n"
    );
}
