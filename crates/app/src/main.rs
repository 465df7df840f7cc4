use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use brain_core::chart::ChartTab;
use brain_core::model::{DrillSettings, WORD_MEMORY_TOTAL_WORDS};
use brain_core::stats::{SortDirection, SortKey};
use services::{AppServices, Clock, DrillPhase, SubmitOutcome, TimerDriver};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const DEFAULT_DATA_PATH: &str = "brain-data.json";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCount { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
    InvalidSortKey { raw: String },
    InvalidDataPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCount { raw } => write!(f, "invalid --count value: {raw}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidSortKey { raw } => write!(f, "invalid --sort value: {raw}"),
            ArgsError::InvalidDataPath { raw } => write!(f, "invalid --data value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<f64, ArgsError> {
    let raw = require_value(args, flag)?;
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ArgsError::InvalidNumber { flag, raw }),
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- drill  [--data <path>] [--count <n>]");
    eprintln!("  cargo run -p app -- stats  [--data <path>]");
    eprintln!("  cargo run -p app -- weekly [--data <path>] [--counting <secs>] [--word <recalled>]");
    eprintln!("                             [--stroop <secs>] [--sort <date|counting|word|stroop>] [--asc]");
    eprintln!("  cargo run -p app -- reset  [--data <path>] [--drills | --weekly]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --data {DEFAULT_DATA_PATH}");
    eprintln!("  --count 100 (clamped to 10..=100)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  BRAIN_DATA_PATH, BRAIN_PROBLEM_COUNT, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Drill,
    Stats,
    Weekly,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "drill" => Some(Self::Drill),
            "stats" => Some(Self::Stats),
            "weekly" => Some(Self::Weekly),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum ResetScope {
    #[default]
    All,
    Drills,
    Weekly,
}

#[derive(Debug, Default)]
struct WeeklyEntry {
    counting: Option<f64>,
    word_recalled: Option<u32>,
    stroop: Option<f64>,
}

impl WeeklyEntry {
    fn is_empty(&self) -> bool {
        self.counting.is_none() && self.word_recalled.is_none() && self.stroop.is_none()
    }
}

#[derive(Debug)]
struct Args {
    data_path: PathBuf,
    settings: DrillSettings,
    weekly: WeeklyEntry,
    sort_key: SortKey,
    sort_direction: SortDirection,
    reset_scope: ResetScope,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut data_path = std::env::var("BRAIN_DATA_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_PATH), PathBuf::from);
        let mut settings = std::env::var("BRAIN_PROBLEM_COUNT")
            .ok()
            .and_then(|value| value.trim().parse::<u32>().ok())
            .map_or_else(DrillSettings::default, DrillSettings::new);
        let mut weekly = WeeklyEntry::default();
        let mut sort_key = SortKey::default();
        let mut sort_direction = SortDirection::default();
        let mut reset_scope = ResetScope::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data" => {
                    let value = require_value(args, "--data")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDataPath { raw: value });
                    }
                    data_path = PathBuf::from(value);
                }
                "--count" => {
                    let value = require_value(args, "--count")?;
                    let parsed: u32 = value
                        .trim()
                        .parse()
                        .map_err(|_| ArgsError::InvalidCount { raw: value.clone() })?;
                    settings = DrillSettings::new(parsed);
                }
                "--counting" => weekly.counting = Some(parse_number(args, "--counting")?),
                "--stroop" => weekly.stroop = Some(parse_number(args, "--stroop")?),
                "--word" => {
                    let value = require_value(args, "--word")?;
                    let recalled = value
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n <= WORD_MEMORY_TOTAL_WORDS)
                        .ok_or_else(|| ArgsError::InvalidNumber {
                            flag: "--word",
                            raw: value.clone(),
                        })?;
                    weekly.word_recalled = Some(recalled);
                }
                "--sort" => {
                    let value = require_value(args, "--sort")?;
                    sort_key = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSortKey { raw: value.clone() })?;
                }
                "--asc" => sort_direction = SortDirection::Ascending,
                "--drills" => reset_scope = ResetScope::Drills,
                "--weekly" => reset_scope = ResetScope::Weekly,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            data_path,
            settings,
            weekly,
            sort_key,
            sort_direction,
            reset_scope,
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("app=info,services=info,storage=info,brain_core=info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: show statistics when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Stats,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Stats,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    tracing::debug!(path = %parsed.data_path.display(), ?cmd, "opening data file");
    let app = AppServices::open_file(
        &parsed.data_path,
        Clock::default_clock(),
        parsed.settings,
        TimerDriver::LocalTokio,
    )?;

    match cmd {
        Command::Drill => run_drill(&app).await,
        Command::Stats => {
            print_stats(&app);
            Ok(())
        }
        Command::Weekly => {
            record_weekly(&app, &parsed.weekly);
            print_weekly(&app, parsed.sort_key, parsed.sort_direction);
            Ok(())
        }
        Command::Reset => {
            let reset = app.reset();
            match parsed.reset_scope {
                ResetScope::All => reset.reset_all_progress(),
                ResetScope::Drills => reset.reset_drill_progress(),
                ResetScope::Weekly => reset.reset_weekly_test_progress(),
            }
            println!("Progress reset.");
            Ok(())
        }
    }
}

async fn run_drill(app: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let progress = app.progress();
    println!("Day {}", progress.day_number());
    if !progress.is_drill_pending() {
        println!("Today's drill is already done; this one counts as extra practice.");
    }

    let drill = app.drill();
    app.start_daily_drill()?;
    println!("Type each answer and press Enter. Type q to give up.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let state = drill.state();
        let Some(problem) = state.current_problem() else {
            break;
        };
        let progress = state.progress();
        print!(
            "[{}/{} {}] {} = ",
            progress.answered + 1,
            progress.total,
            state.formatted_time(),
            problem.expression()
        );
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            drill.reset_to_idle();
            println!();
            return Ok(());
        };
        if line.trim().eq_ignore_ascii_case("q") {
            drill.reset_to_idle();
            println!("Drill abandoned.");
            return Ok(());
        }

        drill.update_user_answer(&line);
        match drill.submit_answer(&line)? {
            SubmitOutcome::Incorrect => {
                println!("Not quite, try again.");
                drill.clear_input_error();
            }
            SubmitOutcome::Finished(result) => {
                println!(
                    "Done in {} with {}/{} correct. Medal: {}",
                    drill.state().formatted_time(),
                    result.correct_count(),
                    result.problem_count(),
                    result.medal()
                );
            }
            SubmitOutcome::Correct | SubmitOutcome::Ignored => {}
        }
    }

    if drill.state().phase() == DrillPhase::Finished
        && app.statistics().weekly_test_available()
    {
        println!("A weekly test is available. Record it with the `weekly` command.");
    }
    drill.reset_to_idle();
    Ok(())
}

fn print_stats(app: &AppServices) {
    let stats = app.statistics().stats();
    println!("Day {}", app.progress().day_number());
    println!("Total drills: {}", stats.total_drills);
    println!("Average time: {}", stats.average_time);
    println!(
        "Medals: {} gold, {} silver, {} bronze",
        stats.medal_counts.gold, stats.medal_counts.silver, stats.medal_counts.bronze
    );

    if !stats.recent_activities.is_empty() {
        println!();
        println!("Recent drills:");
        for activity in &stats.recent_activities {
            println!("  {}  {}  {}", activity.date, activity.time, activity.medal);
        }
    }

    let points = app.statistics().drill_chart();
    if !points.is_empty() {
        println!();
        println!("Drill times:");
        for point in points {
            println!("  {:<8} {:>6.0}s  {}", point.label, point.y, point.color);
        }
    }
}

fn record_weekly(app: &AppServices, entry: &WeeklyEntry) {
    if entry.is_empty() {
        return;
    }
    let now = Clock::default_clock().now();
    let weekly = app.weekly_tests();
    if let Some(time) = entry.counting {
        weekly.add_counting(time, now);
    }
    if let Some(recalled) = entry.word_recalled {
        weekly.add_word_memory(WORD_MEMORY_TOTAL_WORDS, recalled, now);
    }
    if let Some(time) = entry.stroop {
        weekly.add_stroop(time, now);
    }
    tracing::info!("weekly test recorded");
}

fn print_weekly(app: &AppServices, key: SortKey, direction: SortDirection) {
    let statistics = app.statistics();
    let sessions = statistics.sorted_sessions(key, direction);
    if sessions.is_empty() {
        println!("No weekly tests recorded yet.");
        return;
    }

    println!("{:<12} {:>12} {:>10} {:>12}", "Date", "1-120", "Words", "Stroop");
    for session in &sessions {
        println!(
            "{:<12} {:>12} {:>10} {:>12}",
            session.date_label, session.counting_time, session.word_accuracy, session.stroop_time
        );
    }

    for tab in ChartTab::ALL {
        let series = statistics.weekly_chart(tab);
        if series.is_empty() {
            continue;
        }
        println!();
        println!("{} ({}, max {}):", tab.title(), tab.y_label(), tab.y_max());
        for (label, value) in series.labels.iter().zip(&series.data) {
            println!("  {label}  {value:.1}");
        }
    }
}

fn main() {
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    // The drill ticker is a local task, so everything runs on one LocalSet.
    let local = tokio::task::LocalSet::new();
    if let Err(err) = local.block_on(&runtime, run()) {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
