// tests/error_handling.rs

use std::io::Write;

use tempfile::NamedTempFile;
use ticketpool::config::{WorkloadFile, load_and_validate, parse_str};
use ticketpool::errors::TicketPoolError;

fn workload_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn test_dag_cycle_returns_structured_error() {
    let file = workload_file(
        r#"
[task.A]
after = ["B"]

[task.B]
after = ["A"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(TicketPoolError::DagCycle(msg)) => {
            assert!(msg.contains("cycle detected"));
            assert!(msg.contains("A") || msg.contains("B"));
        }
        Err(e) => panic!("Expected DagCycle error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_unknown_dependency_returns_structured_error() {
    let file = workload_file(
        r#"
[task.A]
after = ["NonExistent"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(TicketPoolError::UnknownDependency { task, dependency }) => {
            assert_eq!(task, "A");
            assert_eq!(dependency, "NonExistent");
        }
        Err(e) => panic!("Expected UnknownDependency error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_bad_pool_split_returns_config_error() {
    let file = workload_file(
        r#"
[pool]
total_workers = 2
high_priority_workers = 2

[task.A]
"#,
    );

    let result = load_and_validate(file.path());
    assert!(matches!(result, Err(TicketPoolError::ConfigError(_))));
}

#[test]
fn test_manual_task_with_dependencies_is_rejected() {
    let file = workload_file(
        r#"
[task.A]

[task.fence]
manual = true
after = ["A"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(TicketPoolError::ConfigError(msg)) => assert!(msg.contains("fence")),
        other => panic!("Expected ConfigError, got: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_empty_workload_is_rejected() {
    let raw = parse_str("[pool]\ntotal_workers = 2\n").unwrap();
    assert!(matches!(
        WorkloadFile::try_from(raw),
        Err(TicketPoolError::ConfigError(_))
    ));
}

#[test]
fn test_invalid_toml_returns_toml_error() {
    let file = workload_file("[task.A\npriority = ");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(TicketPoolError::TomlError(_))
    ));
}

#[test]
fn test_missing_file_returns_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(matches!(
        load_and_validate(&missing),
        Err(TicketPoolError::IoError(_))
    ));
}

#[test]
fn test_defaults_are_applied() {
    let raw = parse_str("[task.A]\n").unwrap();
    let workload = WorkloadFile::try_from(raw).unwrap();

    let pool = workload.pool();
    assert!(pool.total_workers >= 2);
    assert_eq!(pool.high_priority_workers, 1);
    assert_eq!(pool.high_priority_threshold, 100);
    assert_eq!(pool.thread_name_prefix, "ticketpool-worker");

    let task = workload.task("A").unwrap();
    assert_eq!(task.instances, 1);
    assert_eq!(task.priority, 0);
}
