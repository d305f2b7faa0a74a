//! CLI integration test for the default no-argument run.

use std::process::Command;

#[test]
fn default_run_drains_every_task() {
    let bin = env!("CARGO_BIN_EXE_task_pool");
    let output = Command::new(bin).output().expect("failed to run binary");

    assert!(
        output.status.success(),
        "run exited with non-zero status: {:?}",
        output.status
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("RUN SUMMARY"),
        "run summary missing from output"
    );

    for (key, expected) in [
        ("workers_started=", "workers_started=3"),
        ("tasks_seeded=", "tasks_seeded=10"),
        ("tasks_processed=", "tasks_processed=10"),
        ("cancelled=", "cancelled=false"),
    ] {
        let line = stdout
            .lines()
            .find(|line| line.starts_with(key))
            .unwrap_or_else(|| panic!("{key} line missing"));
        assert_eq!(line.trim(), expected);
    }
    assert!(
        stdout.contains("All workers completed"),
        "completion report line missing"
    );

    // Each of the ten labels is greeted exactly once across the pool.
    let stderr = String::from_utf8_lossy(&output.stderr);
    for i in 1..=10 {
        let greeting = format!("greets Person {i}");
        let count = stderr
            .lines()
            .filter(|line| line.ends_with(&greeting))
            .count();
        assert_eq!(count, 1, "expected exactly one '{greeting}' line");
    }
}
