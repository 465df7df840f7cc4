use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use brain_core::generator::ProblemGenerator;
use brain_core::model::DrillSettings;
use storage::{InMemoryStore, JsonFileStore, KeyValueStore, ResultLog, WeeklyTestLog};

use crate::Clock;
use crate::drill::{DrillSessionController, TimerDriver};
use crate::error::AppServicesError;
use crate::progress::DailyProgress;
use crate::reset::ResetService;
use crate::statistics::StatisticsService;

/// Assembles app-facing services over one key-value store.
#[derive(Clone)]
pub struct AppServices {
    settings: DrillSettings,
    results: Rc<ResultLog>,
    weekly: Rc<WeeklyTestLog>,
    progress: DailyProgress,
    drill: DrillSessionController,
    statistics: StatisticsService,
    reset: ResetService,
}

impl AppServices {
    /// Build services backed by a JSON data file.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the data file exists but cannot be read.
    pub fn open_file(
        path: impl AsRef<Path>,
        clock: Clock,
        settings: DrillSettings,
        driver: TimerDriver,
    ) -> Result<Self, AppServicesError> {
        let store = JsonFileStore::open(path.as_ref())?;
        Ok(Self::new(Arc::new(store), clock, settings, driver))
    }

    /// Build services backed by an in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock, settings: DrillSettings, driver: TimerDriver) -> Self {
        Self::new(Arc::new(InMemoryStore::new()), clock, settings, driver)
    }

    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Clock,
        settings: DrillSettings,
        driver: TimerDriver,
    ) -> Self {
        let results = Rc::new(ResultLog::load(Arc::clone(&store)));
        let weekly = Rc::new(WeeklyTestLog::load(Arc::clone(&store)));
        let progress = DailyProgress::new(clock, store);

        let drill = DrillSessionController::new(
            clock,
            ProblemGenerator::new(),
            Rc::clone(&results),
            Rc::new(progress.clone()),
            driver,
        );
        let statistics = StatisticsService::new(Rc::clone(&results), Rc::clone(&weekly));
        let reset = ResetService::new(Rc::clone(&results), Rc::clone(&weekly), progress.clone());

        Self {
            settings,
            results,
            weekly,
            progress,
            drill,
            statistics,
            reset,
        }
    }

    #[must_use]
    pub fn settings(&self) -> DrillSettings {
        self.settings
    }

    #[must_use]
    pub fn results(&self) -> Rc<ResultLog> {
        Rc::clone(&self.results)
    }

    #[must_use]
    pub fn weekly_tests(&self) -> Rc<WeeklyTestLog> {
        Rc::clone(&self.weekly)
    }

    #[must_use]
    pub fn progress(&self) -> DailyProgress {
        self.progress.clone()
    }

    #[must_use]
    pub fn drill(&self) -> DrillSessionController {
        self.drill.clone()
    }

    #[must_use]
    pub fn statistics(&self) -> StatisticsService {
        self.statistics.clone()
    }

    #[must_use]
    pub fn reset(&self) -> ResetService {
        self.reset.clone()
    }

    /// Start today's drill with the configured problem count.
    ///
    /// # Errors
    ///
    /// Returns `DrillError::NoProblems` if no problem could be generated.
    pub fn start_daily_drill(&self) -> Result<(), crate::DrillError> {
        let count = self.settings.daily_problems_count() as usize;
        self.drill.start(count)
    }
}
