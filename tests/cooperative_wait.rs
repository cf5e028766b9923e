// tests/cooperative_wait.rs

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use common::{Gate, Recorder, pool};
use ticketpool::{Ticket, TicketPool};
use ticketpool_test_utils::with_timeout;

fn diamond(pool: &TicketPool, recorder: &Recorder) -> Ticket {
    let a = pool.submit(recorder.job("a"), 0, &[]);
    let b = pool.submit(recorder.job("b"), 0, &[a.clone()]);
    let c = pool.submit(recorder.job("c"), 0, &[a]);
    pool.submit(recorder.job("d"), 0, &[b, c])
}

#[test]
fn waiting_caller_runs_the_whole_diamond_inline() {
    let pool = pool(1, 0, 100);
    let gate = Gate::new();
    let recorder = Recorder::new();

    let blocker = pool.submit(gate.blocker(), 0, &[]);
    gate.wait_entered(1);

    let d = diamond(&pool, &recorder);
    d.wait();

    assert_eq!(recorder.len(), 4);
    recorder.assert_before("a", "b");
    recorder.assert_before("a", "c");
    recorder.assert_before("b", "d");
    recorder.assert_before("c", "d");
    assert_eq!(pool.stats().executed_inline, 4);

    gate.open();
    blocker.wait();
}

#[test]
fn wait_from_inside_a_task_on_a_single_worker_does_not_deadlock() {
    let pool = Arc::new(pool(1, 0, 100));
    let recorder = Recorder::new();

    let inner_pool = Arc::clone(&pool);
    let inner_recorder = recorder.clone();
    let outer = pool.submit(
        move || {
            let d = diamond(&inner_pool, &inner_recorder);
            d.wait();
            inner_recorder.push("outer");
        },
        0,
        &[],
    );

    let waiter = outer.clone();
    with_timeout(move || waiter.wait());

    assert!(outer.finished());
    assert_eq!(recorder.len(), 5);
    recorder.assert_before("b", "d");
    recorder.assert_before("c", "d");
    recorder.assert_before("d", "outer");
}

#[test]
fn waiter_blocks_on_a_ticket_running_elsewhere() {
    let pool = pool(2, 0, 100);
    let gate = Gate::new();

    let running = pool.submit(gate.blocker(), 0, &[]);
    gate.wait_entered(1);

    let opener = {
        let gate = gate.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            gate.open();
        })
    };

    running.wait();
    assert!(running.finished());
    assert_eq!(pool.stats().executed_inline, 0);
    opener.join().unwrap();
}

#[test]
fn waiter_descends_to_a_dependency_running_elsewhere() {
    // Worker 0 only takes priority >= 10; worker 1 is parked for the whole
    // test, so `b` can only run on the waiting thread.
    let pool = pool(2, 1, 10);
    let parked = Gate::new();
    let gate = Gate::new();
    let recorder = Recorder::new();

    let idle = pool.submit(parked.blocker(), 0, &[]);
    parked.wait_entered(1);

    let a = pool.submit(gate.blocker(), 10, &[]);
    gate.wait_entered(1);
    let b = pool.submit(recorder.job("b"), 0, &[a.clone()]);

    let opener = {
        let gate = gate.clone();
        let recorder = recorder.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            recorder.push("gate-open");
            gate.open();
        })
    };

    b.wait();

    assert!(a.finished() && b.finished());
    assert_eq!(recorder.entries(), vec!["gate-open", "b"]);
    assert_eq!(pool.stats().executed_inline, 1);
    assert_eq!(pool.stats().executed_by_workers, 1);
    opener.join().unwrap();

    parked.open();
    common::poll_finished(&idle);
}

#[test]
fn deep_chain_is_waited_without_recursion() {
    const DEPTH: usize = 5_000;

    let pool = pool(1, 0, 100);
    let gate = Gate::new();
    let blocker = pool.submit(gate.blocker(), 0, &[]);
    gate.wait_entered(1);

    let next = Arc::new(AtomicUsize::new(0));
    let out_of_order = Arc::new(AtomicBool::new(false));

    let mut last = Ticket::default();
    for i in 0..DEPTH {
        let next = Arc::clone(&next);
        let out_of_order = Arc::clone(&out_of_order);
        last = pool.submit(
            move || {
                if next.fetch_add(1, Ordering::SeqCst) != i {
                    out_of_order.store(true, Ordering::SeqCst);
                }
            },
            0,
            &[last],
        );
    }

    let tail = last.clone();
    with_timeout(move || tail.wait());

    assert!(last.finished());
    assert_eq!(next.load(Ordering::SeqCst), DEPTH);
    assert!(!out_of_order.load(Ordering::SeqCst));
    assert_eq!(pool.stats().executed_inline, DEPTH as u64);

    gate.open();
    blocker.wait();
}

#[test]
fn finish_all_existing_ignores_tickets_created_later() {
    let pool = pool(2, 0, 100);
    let recorder = Recorder::new();

    let existing: Vec<Ticket> = (0..20)
        .map(|i| pool.submit(recorder.job(format!("early-{i}")), i % 3, &[]))
        .collect();

    let stop = AtomicBool::new(false);

    thread::scope(|scope| {
        scope.spawn(|| {
            while !stop.load(Ordering::SeqCst) {
                pool.submit(
                    || thread::sleep(Duration::from_micros(200)),
                    0,
                    &[],
                );
            }
        });

        pool.finish_all_existing();
        stop.store(true, Ordering::SeqCst);
    });

    assert!(existing.iter().all(Ticket::finished));
    assert_eq!(recorder.len(), 20);
    pool.finish_all_existing();
    assert_eq!(pool.outstanding_tickets(), 0);
}

#[test]
fn finish_all_existing_waits_for_manual_tickets() {
    let pool = Arc::new(pool(2, 0, 100));
    let fence = pool.create_manual_ticket();
    let dependent = pool.submit(|| {}, 5, &[fence.clone()]);

    let completer = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            pool.complete_manual_ticket(&fence);
        })
    };

    pool.finish_all_existing();
    assert!(dependent.finished());
    completer.join().unwrap();
}

#[test]
fn tasks_submitted_from_tasks_can_be_waited_on() {
    let pool = Arc::new(pool(2, 0, 100));
    let recorder = Recorder::new();

    let spawner_pool = Arc::clone(&pool);
    let spawner_recorder = recorder.clone();
    let spawner = pool.submit(
        move || {
            let children: Vec<Ticket> = (0..4)
                .map(|i| spawner_pool.submit(spawner_recorder.job(format!("child-{i}")), 1, &[]))
                .collect();
            let all = spawner_pool.submit_barrier(&children);
            all.wait();
            spawner_recorder.push("parent");
        },
        0,
        &[],
    );

    let waiter = spawner.clone();
    with_timeout(move || waiter.wait());
    assert_eq!(recorder.len(), 5);
    assert_eq!(recorder.position("parent"), Some(4));
}
