use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use brain_core::model::{DrillSettings, Problem};
use brain_core::time::fixed_clock;
use services::{AppServices, Clock, DrillPhase, SubmitOutcome, TimerDriver};
use storage::file_store::corrupt_path;
use tokio::task::LocalSet;

fn three_problems() -> Vec<Problem> {
    vec![
        Problem::addition(1, 2),
        Problem::subtraction(3, 4),
        Problem::multiplication(2, 5),
    ]
}

#[test]
fn three_problem_session_records_one_result() {
    let app = AppServices::in_memory(fixed_clock(), DrillSettings::default(), TimerDriver::Manual);
    let drill = app.drill();
    drill.start_with_problems(three_problems()).unwrap();

    for answer in ["3", "3", "10"] {
        drill.submit_answer(answer).unwrap();
    }

    let state = drill.state();
    assert_eq!(state.phase(), DrillPhase::Finished);
    assert!(!drill.is_ticking());

    let results = app.results().all();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].problem_count(), 3);
    assert_eq!(results[0].correct_count(), 3);

    assert!(!app.progress().is_drill_pending());
    assert_eq!(app.progress().day_number(), 1);
    assert_eq!(app.statistics().stats().total_drills, 1);
}

#[test]
fn wrong_answer_holds_position() {
    let app = AppServices::in_memory(fixed_clock(), DrillSettings::default(), TimerDriver::Manual);
    let drill = app.drill();
    drill.start_with_problems(three_problems()).unwrap();

    assert_eq!(drill.submit_answer("4").unwrap(), SubmitOutcome::Incorrect);
    let state = drill.state();
    assert!(state.input_error());
    assert_eq!(state.current_index(), 0);

    assert_eq!(drill.submit_answer("3").unwrap(), SubmitOutcome::Correct);
    let state = drill.state();
    assert!(!state.input_error());
    assert_eq!(state.current_index(), 1);
    assert!(app.results().is_empty());
}

#[test]
fn daily_drill_uses_configured_count() {
    let app = AppServices::in_memory(fixed_clock(), DrillSettings::new(3), TimerDriver::Manual);
    app.start_daily_drill().unwrap();
    assert_eq!(app.drill().state().problems().len(), 10);
}

#[tokio::test(start_paused = true)]
async fn ticker_runs_while_drilling_and_stops_on_reset() {
    LocalSet::new()
        .run_until(async {
            let app = AppServices::in_memory(
                Clock::default_clock(),
                DrillSettings::default(),
                TimerDriver::LocalTokio,
            );
            let drill = app.drill();
            let ticks = Rc::new(Cell::new(0));
            let counter = Rc::clone(&ticks);
            drill.subscribe(move |state| {
                if state.phase() == DrillPhase::Drilling {
                    counter.set(counter.get() + 1);
                }
            });

            drill.start_with_problems(three_problems()).unwrap();
            assert!(drill.is_ticking());
            let after_start = ticks.get();

            tokio::time::sleep(Duration::from_millis(2_500)).await;
            assert_eq!(ticks.get(), after_start + 2);

            drill.reset_to_idle();
            assert!(!drill.is_ticking());
            tokio::time::sleep(Duration::from_secs(5)).await;
            assert_eq!(ticks.get(), after_start + 2);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn restarting_replaces_the_ticker() {
    LocalSet::new()
        .run_until(async {
            let app = AppServices::in_memory(
                fixed_clock(),
                DrillSettings::default(),
                TimerDriver::LocalTokio,
            );
            let drill = app.drill();
            let ticks = Rc::new(Cell::new(0));
            let counter = Rc::clone(&ticks);

            drill.start_with_problems(three_problems()).unwrap();
            drill.start_with_problems(three_problems()).unwrap();
            drill.subscribe(move |_| counter.set(counter.get() + 1));

            tokio::time::sleep(Duration::from_millis(3_500)).await;
            assert_eq!(ticks.get(), 3);

            for answer in ["3", "3", "10"] {
                drill.submit_answer(answer).unwrap();
            }
            assert!(!drill.is_ticking());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn finished_drill_clock_stays_frozen() {
    LocalSet::new()
        .run_until(async {
            let app = AppServices::in_memory(
                Clock::default_clock(),
                DrillSettings::default(),
                TimerDriver::LocalTokio,
            );
            let drill = app.drill();
            let notifications = Rc::new(Cell::new(0));
            let counter = Rc::clone(&notifications);
            drill.subscribe(move |_| counter.set(counter.get() + 1));

            drill.start_with_problems(three_problems()).unwrap();
            tokio::time::sleep(Duration::from_millis(2_500)).await;
            for answer in ["3", "3", "10"] {
                drill.submit_answer(answer).unwrap();
            }
            assert_eq!(drill.state().phase(), DrillPhase::Finished);

            let elapsed = drill.state().elapsed_seconds();
            let seen = notifications.get();
            tokio::time::sleep(Duration::from_secs(5)).await;

            assert_eq!(drill.state().elapsed_seconds(), elapsed);
            assert_eq!(notifications.get(), seen);
            assert!(!drill.is_ticking());
        })
        .await;
}

#[test]
fn file_backed_services_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("brain.json");

    {
        let app =
            AppServices::open_file(&path, fixed_clock(), DrillSettings::default(), TimerDriver::Manual)
                .unwrap();
        let drill = app.drill();
        drill.start_with_problems(three_problems()).unwrap();
        for answer in ["3", "3", "10"] {
            drill.submit_answer(answer).unwrap();
        }
        app.weekly_tests().add_counting(72.0, fixed_clock().now());
    }

    let app =
        AppServices::open_file(&path, fixed_clock(), DrillSettings::default(), TimerDriver::Manual)
            .unwrap();
    assert_eq!(app.results().len(), 1);
    assert_eq!(app.statistics().sessions().len(), 1);
    assert!(!app.progress().is_drill_pending());

    app.reset().reset_all_progress();
    let reopened =
        AppServices::open_file(&path, fixed_clock(), DrillSettings::default(), TimerDriver::Manual)
            .unwrap();
    assert!(reopened.results().is_empty());
    assert!(reopened.progress().is_drill_pending());
}

#[test]
fn corrupt_data_file_opens_empty_and_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("brain.json");
    std::fs::write(&path, r#"{"mathDrillResults": "[]", trunc"#).unwrap();

    let app =
        AppServices::open_file(&path, fixed_clock(), DrillSettings::default(), TimerDriver::Manual)
            .unwrap();
    assert!(app.results().is_empty());
    assert!(app.progress().is_drill_pending());
    assert!(corrupt_path(&path).exists());

    app.reset().reset_all_progress();
    let drill = app.drill();
    drill.start_with_problems(three_problems()).unwrap();
    for answer in ["3", "3", "10"] {
        drill.submit_answer(answer).unwrap();
    }

    let reopened =
        AppServices::open_file(&path, fixed_clock(), DrillSettings::default(), TimerDriver::Manual)
            .unwrap();
    assert_eq!(reopened.results().len(), 1);
}
