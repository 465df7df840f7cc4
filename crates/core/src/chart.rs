//! Chart-ready projections of drill and weekly-test results.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::model::{
    CountingTestResult, Dated, DrillResult, Medal, StroopTestResult, WordMemoryTestResult,
    medal::colors,
};
use crate::stats::latest_per_day;

/// Formats a chronological key into an axis label.
pub type DateLabeler = fn(NaiveDate) -> String;

/// `Nov 14` style label used for drill points.
#[must_use]
pub fn short_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// `14/11/2023` style label used for weekly-test points.
#[must_use]
pub fn full_label(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// One bar in the drill time chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub key: NaiveDate,
    pub label: String,
    pub y: f64,
    pub color: &'static str,
}

/// Parallel arrays for a single-line weekly chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub keys: Vec<NaiveDate>,
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

impl ChartSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Elapsed times of valid results per calendar day, in input order.
#[must_use]
pub fn group_results_by_date(results: &[DrillResult]) -> BTreeMap<NaiveDate, Vec<f64>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for result in results {
        if let Some(date) = result.valid_date() {
            grouped
                .entry(date.date_naive())
                .or_default()
                .push(result.time_in_seconds());
        }
    }
    grouped
}

/// Chronological drill points labelled with [`short_label`].
#[must_use]
pub fn drill_time_series(results: &[DrillResult]) -> Vec<ChartPoint> {
    drill_time_series_with(results, short_label)
}

/// Chronological drill points, stable within a day.
#[must_use]
pub fn drill_time_series_with(results: &[DrillResult], labeler: DateLabeler) -> Vec<ChartPoint> {
    group_results_by_date(results)
        .into_iter()
        .flat_map(|(key, times)| {
            let label = labeler(key);
            times.into_iter().map(move |y| ChartPoint {
                key,
                label: label.clone(),
                y,
                color: Medal::for_time(y).color(),
            })
        })
        .collect()
}

/// Latest result per day, oldest first, projected through `extractor`.
#[must_use]
pub fn weekly_series<T, F>(results: &[T], extractor: F, labeler: DateLabeler) -> ChartSeries
where
    T: Dated + Clone,
    F: Fn(&T) -> f64,
{
    let mut series = ChartSeries::default();
    for (key, result) in latest_per_day(results) {
        series.keys.push(key);
        series.labels.push(labeler(key));
        series.data.push(extractor(&result));
    }
    series
}

#[must_use]
pub fn counting_time(result: &CountingTestResult) -> f64 {
    result.time
}

#[must_use]
pub fn stroop_time(result: &StroopTestResult) -> f64 {
    result.time
}

#[must_use]
pub fn word_accuracy(result: &WordMemoryTestResult) -> f64 {
    result.accuracy_percent()
}

/// Which weekly test a chart shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ChartTab {
    #[default]
    Counting,
    Word,
    Stroop,
}

impl ChartTab {
    pub const ALL: [ChartTab; 3] = [ChartTab::Counting, ChartTab::Word, ChartTab::Stroop];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            ChartTab::Counting => "1-120",
            ChartTab::Word => "word",
            ChartTab::Stroop => "stroop",
        }
    }

    #[must_use]
    pub fn y_label(self) -> &'static str {
        match self {
            ChartTab::Counting | ChartTab::Stroop => "Time (seconds)",
            ChartTab::Word => "Accuracy (%)",
        }
    }

    #[must_use]
    pub fn y_max(self) -> f64 {
        match self {
            ChartTab::Counting | ChartTab::Stroop => 120.0,
            ChartTab::Word => 100.0,
        }
    }

    #[must_use]
    pub fn border_color(self) -> &'static str {
        match self {
            ChartTab::Counting | ChartTab::Stroop => colors::DEFAULT,
            ChartTab::Word => colors::WORD_ACCURACY,
        }
    }
}

/// Error returned when a chart tab name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chart tab: {0}")]
pub struct UnknownChartTab(pub String);

impl std::str::FromStr for ChartTab {
    type Err = UnknownChartTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1-120" | "counting" => Ok(ChartTab::Counting),
            "word" => Ok(ChartTab::Word),
            "stroop" => Ok(ChartTab::Stroop),
            other => Err(UnknownChartTab(other.to_owned())),
        }
    }
}
