use std::cell::RefCell;
use std::rc::{Rc, Weak};

use brain_core::Clock;
use brain_core::generator::ProblemGenerator;
use brain_core::model::Problem;
use brain_core::observable::{ListenerKey, Observable};
use storage::ResultLog;

use crate::drill::session::{DrillProgress, DrillSession, SubmitOutcome};
use crate::drill::timer::{TICK_PERIOD, Ticker, TimerDriver};
use crate::error::DrillError;
use crate::progress::CompletionHooks;

/// Runs drill sessions: generates problems, keeps the clock running and
/// records the result when the last problem is answered.
///
/// Cloning yields another handle to the same controller.
#[derive(Clone)]
pub struct DrillSessionController {
    inner: Rc<Inner>,
}

struct Inner {
    clock: Clock,
    generator: ProblemGenerator,
    results: Rc<ResultLog>,
    hooks: Rc<dyn CompletionHooks>,
    driver: TimerDriver,
    state: Observable<DrillSession>,
    ticker: RefCell<Option<Ticker>>,
}

impl DrillSessionController {
    #[must_use]
    pub fn new(
        clock: Clock,
        generator: ProblemGenerator,
        results: Rc<ResultLog>,
        hooks: Rc<dyn CompletionHooks>,
        driver: TimerDriver,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                clock,
                generator,
                results,
                hooks,
                driver,
                state: Observable::new(DrillSession::new()),
                ticker: RefCell::new(None),
            }),
        }
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn state(&self) -> DrillSession {
        self.inner.state.get()
    }

    /// Listen for state changes. Listeners run synchronously after each change.
    pub fn subscribe(&self, listener: impl Fn(&DrillSession) + 'static) -> ListenerKey {
        self.inner.state.subscribe(listener)
    }

    pub fn unsubscribe(&self, key: ListenerKey) -> bool {
        self.inner.state.unsubscribe(key)
    }

    /// Generate `count` problems and start a new session.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::NoProblems` if no problem could be generated; the
    /// current session is left as it was.
    pub fn start(&self, count: usize) -> Result<(), DrillError> {
        let problems = self.inner.generator.generate(count);
        self.start_with_problems(problems)
    }

    /// Start a new session over a prepared batch.
    ///
    /// With [`TimerDriver::LocalTokio`] this must run inside a `LocalSet`.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::NoProblems` for an empty batch.
    pub fn start_with_problems(&self, problems: Vec<Problem>) -> Result<(), DrillError> {
        if problems.is_empty() {
            tracing::error!("refusing to start a drill without problems");
            return Err(DrillError::NoProblems);
        }

        self.cancel_ticker();
        let now = self.inner.clock.now();
        let count = problems.len();
        self.inner.state.update(|s| s.begin(problems, now))?;
        tracing::debug!(problems = count, "drill started");

        if self.inner.driver == TimerDriver::LocalTokio {
            let weak = Rc::downgrade(&self.inner);
            let ticker = Ticker::spawn(TICK_PERIOD, move || tick_weak(&weak));
            *self.inner.ticker.borrow_mut() = Some(ticker);
        }
        Ok(())
    }

    /// Refresh the elapsed time. Returns false when no drill is running.
    pub fn tick(&self) -> bool {
        self.inner.tick()
    }

    /// Submit an answer for the current problem.
    ///
    /// Finishing the last problem stops the clock, appends the result to the
    /// log and fires the completion hooks before listeners are notified.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::Result` if the finished drill cannot be recorded.
    pub fn submit_answer(&self, input: &str) -> Result<SubmitOutcome, DrillError> {
        let now = self.inner.clock.now();
        let mut next = self.inner.state.get();
        let outcome = next.submit(input, now)?;

        match &outcome {
            SubmitOutcome::Ignored => return Ok(outcome),
            SubmitOutcome::Finished(result) => {
                self.cancel_ticker();
                tracing::debug!(
                    seconds = result.time_in_seconds(),
                    medal = %result.medal(),
                    "drill finished"
                );
                self.inner.results.append(result.clone());
                self.inner.hooks.mark_daily_drill_completed();
                self.inner.hooks.record_first_day_if_unset();
            }
            SubmitOutcome::Correct | SubmitOutcome::Incorrect => {}
        }

        self.inner.state.set(next);
        Ok(outcome)
    }

    pub fn clear_input_error(&self) {
        self.inner.state.update(DrillSession::clear_input_error);
    }

    /// Store the in-progress answer text.
    pub fn update_user_answer(&self, text: &str) {
        self.inner.state.update(|s| s.set_user_answer(text));
    }

    #[must_use]
    pub fn progress(&self) -> DrillProgress {
        self.inner.state.with(DrillSession::progress)
    }

    /// Stop the clock and return to a blank idle session. Safe in any state.
    pub fn reset_to_idle(&self) {
        self.cancel_ticker();
        self.inner.state.set(DrillSession::new());
    }

    /// True while a background ticker is alive.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.inner
            .ticker
            .borrow()
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }

    fn cancel_ticker(&self) {
        let ticker = self.inner.ticker.borrow_mut().take();
        drop(ticker);
    }
}

impl Inner {
    fn tick(&self) -> bool {
        if !self.state.with(DrillSession::is_drilling) {
            return false;
        }
        let now = self.clock.now();
        self.state.update(|s| s.tick(now))
    }
}

fn tick_weak(inner: &Weak<Inner>) -> bool {
    inner.upgrade().is_some_and(|inner| inner.tick())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::time::fixed_clock;
    use std::cell::Cell;
    use std::sync::Arc;
    use storage::InMemoryStore;

    use crate::drill::DrillPhase;

    #[derive(Default)]
    struct CountingHooks {
        completed: Cell<u32>,
        first_day: Cell<u32>,
    }

    impl CompletionHooks for CountingHooks {
        fn mark_daily_drill_completed(&self) {
            self.completed.set(self.completed.get() + 1);
        }

        fn record_first_day_if_unset(&self) {
            self.first_day.set(self.first_day.get() + 1);
        }
    }

    fn controller() -> (DrillSessionController, Rc<ResultLog>, Rc<CountingHooks>) {
        let results = Rc::new(ResultLog::load(Arc::new(InMemoryStore::new())));
        let hooks = Rc::new(CountingHooks::default());
        let controller = DrillSessionController::new(
            fixed_clock(),
            ProblemGenerator::new(),
            Rc::clone(&results),
            hooks.clone(),
            TimerDriver::Manual,
        );
        (controller, results, hooks)
    }

    #[test]
    fn zero_count_is_refused_and_state_kept() {
        let (controller, _, _) = controller();
        assert_eq!(controller.start(0), Err(DrillError::NoProblems));
        assert_eq!(controller.state().phase(), DrillPhase::Idle);
    }

    #[test]
    fn start_generates_requested_batch() {
        let (controller, _, _) = controller();
        controller.start(12).unwrap();
        let state = controller.state();
        assert_eq!(state.phase(), DrillPhase::Drilling);
        assert_eq!(state.problems().len(), 12);
        assert_eq!(controller.progress().remaining, 12);
        assert!(!controller.is_ticking());
    }

    #[test]
    fn finishing_records_result_and_fires_hooks() {
        let (controller, results, hooks) = controller();
        controller
            .start_with_problems(vec![Problem::addition(1, 1), Problem::multiplication(3, 3)])
            .unwrap();

        assert_eq!(controller.submit_answer("2").unwrap(), SubmitOutcome::Correct);
        let outcome = controller.submit_answer("9").unwrap();
        assert!(matches!(outcome, SubmitOutcome::Finished(_)));

        assert_eq!(controller.state().phase(), DrillPhase::Finished);
        assert_eq!(results.len(), 1);
        assert_eq!(results.all()[0].problem_count(), 2);
        assert_eq!(hooks.completed.get(), 1);
        assert_eq!(hooks.first_day.get(), 1);

        assert_eq!(controller.submit_answer("9").unwrap(), SubmitOutcome::Ignored);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn listeners_see_result_already_logged() {
        let (controller, results, _) = controller();
        let logged = Rc::new(Cell::new(0));
        let sink = Rc::clone(&logged);
        let log = Rc::clone(&results);
        controller.subscribe(move |state| {
            if state.phase() == DrillPhase::Finished {
                sink.set(log.len());
            }
        });

        controller
            .start_with_problems(vec![Problem::addition(0, 0)])
            .unwrap();
        controller.submit_answer("0").unwrap();
        assert_eq!(logged.get(), 1);
    }

    #[test]
    fn input_helpers_update_state() {
        let (controller, _, _) = controller();
        controller
            .start_with_problems(vec![Problem::addition(4, 4)])
            .unwrap();

        controller.update_user_answer("7");
        assert_eq!(controller.state().user_answer(), "7");

        controller.submit_answer("7").unwrap();
        assert!(controller.state().input_error());
        controller.clear_input_error();
        assert!(!controller.state().input_error());
    }

    #[test]
    fn reset_is_idempotent() {
        let (controller, _, _) = controller();
        controller.start(10).unwrap();
        controller.reset_to_idle();
        controller.reset_to_idle();
        assert_eq!(controller.state(), DrillSession::new());
        assert!(!controller.tick());
    }
}
