// tests/workload_runner.rs

mod common;

use std::io::Write;

use tempfile::NamedTempFile;
use ticketpool::cli::CliArgs;
use ticketpool::config::TaskKind;
use ticketpool::workload::{run_on_pool, run_workload};
use ticketpool_test_utils::builders::{TaskSpecBuilder, WorkloadBuilder};

#[test]
fn frame_workload_respects_dependencies() {
    common::init_tracing();

    let workload = WorkloadBuilder::new()
        .pool(3, 1, 50)
        .with_task("fence", TaskSpecBuilder::new().manual(20).build())
        .with_task("fetch", TaskSpecBuilder::new().instances(3).work_ms(2).build())
        .with_task("decode", TaskSpecBuilder::new().after("fetch").priority(5).build())
        .with_task("frame", TaskSpecBuilder::new().barrier().after("decode").after("fence").build())
        .with_task("present", TaskSpecBuilder::new().after("frame").priority(60).build())
        .build();

    assert_eq!(workload.task("frame").unwrap().kind(), TaskKind::Barrier);
    assert_eq!(workload.task("fetch").unwrap().kind(), TaskKind::Batch);

    let report = run_workload(&workload).unwrap();

    assert_eq!(report.execution_order.len(), 5);
    assert!(report.last_position("fetch").unwrap() < report.first_position("decode").unwrap());
    assert!(report.first_position("decode").unwrap() < report.first_position("present").unwrap());
    assert_eq!(report.first_position("frame"), None);
    assert_eq!(report.stats.submitted, 5);
    assert_eq!(report.stats.executed(), 5);
}

#[test]
fn bumped_workload_task_is_escalated_with_its_dependency() {
    common::init_tracing();

    // Everything waits on the fence, so the bump lands while `urgent` and
    // `bulk0` are both still in the waiting registry.
    let mut builder = WorkloadBuilder::new()
        .pool(1, 0, 100)
        .with_task("fence", TaskSpecBuilder::new().manual(50).build());
    for i in 0..6 {
        builder = builder.with_task(
            &format!("bulk{i}"),
            TaskSpecBuilder::new().priority(5).after("fence").build(),
        );
    }
    let workload = builder
        .with_task("urgent", TaskSpecBuilder::new().after("bulk0").bump().build())
        .build();

    let report = run_workload(&workload).unwrap();

    assert_eq!(report.execution_order.len(), 7);
    assert!(report.first_position("bulk0").unwrap() < report.first_position("urgent").unwrap());
    assert_eq!(report.stats.bumped, 2);
}

#[test]
fn runs_on_an_existing_pool() {
    let pool = common::pool(2, 0, 100);
    let workload = WorkloadBuilder::new()
        .with_task("a", TaskSpecBuilder::new().build())
        .with_task("b", TaskSpecBuilder::new().after("a").build())
        .build();

    let first = run_on_pool(&pool, &workload);
    let second = run_on_pool(&pool, &workload);

    assert_eq!(first.execution_order, vec!["a", "b"]);
    assert_eq!(second.execution_order, vec!["a", "b"]);
    assert_eq!(second.stats.submitted, 4);
    assert_eq!(pool.outstanding_tickets(), 0);
}

#[test]
fn dry_run_through_the_cli_entry_point() {
    common::init_tracing();

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[pool]
total_workers = 2
high_priority_workers = 0

[task.compile]
priority = 3

[task.link]
after = ["compile"]
"#
    )
    .unwrap();

    let args = CliArgs {
        workload: file.path().to_path_buf(),
        workers: Some(3),
        log_level: None,
        dry_run: true,
    };
    ticketpool::run(args).unwrap();
}

#[test]
fn cli_worker_override_is_validated() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[pool]
total_workers = 4
high_priority_workers = 2

[task.only]
"#
    )
    .unwrap();

    let args = CliArgs {
        workload: file.path().to_path_buf(),
        workers: Some(2),
        log_level: None,
        dry_run: true,
    };
    let err = ticketpool::run(args).unwrap_err();
    assert!(err.to_string().contains("high_priority_workers"));
}
