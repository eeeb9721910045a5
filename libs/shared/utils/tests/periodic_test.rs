// libs/shared/utils/tests/periodic_test.rs

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use shared_utils::PeriodicTask;

#[tokio::test]
async fn ticks_repeat_until_stopped() {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);

    let task = PeriodicTask::spawn("test-ticker", Duration::from_millis(20), move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    tokio::time::sleep(Duration::from_millis(120)).await;
    task.stop().await;

    let at_stop = count.load(Ordering::SeqCst);
    assert!(at_stop >= 2, "expected at least 2 ticks, saw {}", at_stop);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(count.load(Ordering::SeqCst), at_stop);
}

#[tokio::test]
async fn first_tick_fires_after_one_full_period() {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);

    let task = PeriodicTask::spawn("slow-ticker", Duration::from_secs(60), move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(count.load(Ordering::SeqCst), 0);

    task.stop().await;
}

#[tokio::test]
async fn dropping_the_handle_aborts_the_loop() {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);

    let task = PeriodicTask::spawn("dropped-ticker", Duration::from_millis(20), move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    tokio::time::sleep(Duration::from_millis(70)).await;
    drop(task);
    tokio::time::sleep(Duration::from_millis(20)).await;

    let after_drop = count.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(count.load(Ordering::SeqCst), after_drop);
}

#[tokio::test]
async fn stop_reports_a_finished_task() {
    let task = PeriodicTask::spawn("idle-ticker", Duration::from_secs(60), || async {});
    assert_eq!(task.name(), "idle-ticker");
    assert!(!task.is_finished());
    task.stop().await;
}
