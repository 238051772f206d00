//! circadia CLI - Command-line interface for the circadian metrics engine
//!
//! Commands:
//! - metrics: All regularity metrics for a date
//! - bedtime: Recommended bedtime and wake time
//! - environment: Score bedroom conditions for a night
//! - dashboard: Text dashboard of tonight's schedule, sleep/wake heatmap and bedroom
//! - update: Optionally download new data, then append the day's metrics to the log
//! - fetch-environment: Download a night's bedroom sensor feed
//! - snapshot: Copy a window of nights into a CSV ledger
//! - doctor: Diagnose configuration and data directories

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use circadia::adapters::{GarminSync, ThingSpeakClient, ThingSpeakNightFiles};
use circadia::stability::ASLEEP;
use circadia::types::{BedtimeRecommendation, EnvironmentDelta, EnvironmentReading};
use circadia::{
    window_dates, CircadianEngine, EngineConfig, GarminSleepDirectory, MetricsError, MetricsLog,
    NightLedger, NightSource, CIRCADIA_VERSION,
};

/// circadia - Circadian-rhythm regularity metrics from nightly sleep data
#[derive(Parser)]
#[command(name = "circadia")]
#[command(version = CIRCADIA_VERSION)]
#[command(about = "Compute sleep regularity metrics and bedtime advice", long_about = None)]
struct Cli {
    /// JSON config file (defaults to $CIRCADIA_CONFIG, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// All regularity metrics for a date
    Metrics {
        #[command(flatten)]
        target: TargetArgs,

        /// Output format (text on a terminal, JSON otherwise)
        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Recommended bedtime and wake time
    Bedtime {
        #[command(flatten)]
        target: TargetArgs,

        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Score bedroom conditions, from the night's sensor file or explicit averages
    Environment {
        /// Night to score (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Average temperature (°C); requires --humidity
        #[arg(long, requires = "humidity")]
        temperature: Option<f64>,

        /// Average relative humidity (%); requires --temperature
        #[arg(long, requires = "temperature")]
        humidity: Option<f64>,

        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Text dashboard of tonight's schedule, heatmap and bedroom conditions
    Dashboard {
        #[command(flatten)]
        target: TargetArgs,

        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Compute the day's metrics and append them to the metrics log
    Update {
        /// Date to log (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Read nights from a CSV ledger instead of the sleep directory
        #[arg(long)]
        ledger: Option<PathBuf>,

        /// Run the Garmin downloader first
        #[arg(long)]
        fetch_sleep: bool,

        /// Also download the night's environment feed first
        #[arg(long)]
        fetch_environment: bool,
    },

    /// Download a night's bedroom sensor feed into the environment directory
    FetchEnvironment {
        /// Night to fetch (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Copy a window of nights into a CSV ledger
    Snapshot {
        #[command(flatten)]
        target: TargetArgs,

        /// Ledger file to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Diagnose configuration and data directories
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
struct TargetArgs {
    /// Reference date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    date: Option<String>,

    /// Callback period in days (defaults to the configured period)
    #[arg(long)]
    period: Option<usize>,

    /// Read nights from a CSV ledger instead of the sleep directory
    #[arg(long)]
    ledger: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text
    Text,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CircadiaCliError> {
    let config = EngineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Metrics { target, format } => cmd_metrics(config, &target, format),
        Commands::Bedtime { target, format } => cmd_bedtime(config, &target, format),
        Commands::Environment {
            date,
            temperature,
            humidity,
            format,
        } => cmd_environment(config, date.as_deref(), temperature.zip(humidity), format),
        Commands::Dashboard { target, format } => cmd_dashboard(config, &target, format),
        Commands::Update {
            date,
            ledger,
            fetch_sleep,
            fetch_environment,
        } => cmd_update(
            config,
            date.as_deref(),
            ledger.as_deref(),
            fetch_sleep,
            fetch_environment,
        ),
        Commands::FetchEnvironment { date } => cmd_fetch_environment(config, date.as_deref()),
        Commands::Snapshot { target, output } => cmd_snapshot(config, &target, &output),
        Commands::Doctor { json } => cmd_doctor(config, json),
    }
}

fn cmd_metrics(
    config: EngineConfig,
    target: &TargetArgs,
    format: Option<OutputFormat>,
) -> Result<(), CircadiaCliError> {
    let date = resolve_date(target.date.as_deref(), &config)?;
    let period = target.period.unwrap_or(config.default_period);
    let engine = build_engine(config, target.ledger.as_deref())?;

    let variability = engine.variability(date, period)?;
    let report = MetricsReport {
        date,
        period,
        stdev_onset: variability.stdev_onset,
        stdev_offset: variability.stdev_offset,
        stdev_duration: variability.stdev_duration,
        interdaily_stability: engine.interdaily_stability(date, period)?,
        social_jet_lag: engine.social_jet_lag(date, period)?,
        optimal_bedtime: engine.optimal_bedtime(date, period)?,
    };

    match resolve_format(format) {
        OutputFormat::Text => {
            println!("Sleep Metrics {} ({} nights)", report.date, report.period);
            println!("==================================");
            println!("StDev onset:          {:.2} min", report.stdev_onset);
            println!("StDev offset:         {:.2} min", report.stdev_offset);
            println!("StDev duration:       {:.2} min", report.stdev_duration);
            println!("Interdaily stability: {:.3}", report.interdaily_stability);
            println!("Social jet lag:       {:+.2} h", report.social_jet_lag);
            println!(
                "Optimal schedule:     {} - {} ({:.0} min)",
                report.optimal_bedtime.bedtime,
                report.optimal_bedtime.wake_time,
                report.optimal_bedtime.sleep_duration
            );
        }
        other => print_json(&report, other)?,
    }
    Ok(())
}

fn cmd_bedtime(
    config: EngineConfig,
    target: &TargetArgs,
    format: Option<OutputFormat>,
) -> Result<(), CircadiaCliError> {
    let date = resolve_date(target.date.as_deref(), &config)?;
    let period = target.period.unwrap_or(config.default_period);
    let engine = build_engine(config, target.ledger.as_deref())?;

    let rec = engine.optimal_bedtime(date, period)?;
    match resolve_format(format) {
        OutputFormat::Text => {
            println!("Bedtime:   {}", rec.bedtime);
            println!("Wake time: {}", rec.wake_time);
            println!("Duration:  {:.0} min", rec.sleep_duration);
        }
        other => print_json(&rec, other)?,
    }
    Ok(())
}

fn cmd_environment(
    config: EngineConfig,
    date: Option<&str>,
    averages: Option<(f64, f64)>,
    format: Option<OutputFormat>,
) -> Result<(), CircadiaCliError> {
    let date = resolve_date(date, &config)?;
    let (reading, delta) = match averages {
        Some((temperature, humidity)) => {
            let delta =
                circadia::environment::environment_delta(temperature, humidity, &config.ideal);
            let reading = EnvironmentReading {
                date,
                avg_temperature: temperature,
                avg_humidity: humidity,
                samples: 0,
            };
            (reading, delta)
        }
        None => {
            let files = ThingSpeakNightFiles::new(config.environment_dir.clone());
            let engine = CircadianEngine::new(NightLedger::new(), config);
            engine.environment_report(&files, date)?
        }
    };

    let report = EnvironmentReport { reading, delta };
    match resolve_format(format) {
        OutputFormat::Text => {
            println!("Bedroom conditions {}", report.reading.date);
            println!("==============================");
            print_environment_text(Some(&report.reading), Some(&report.delta));
        }
        other => print_json(&report, other)?,
    }
    Ok(())
}

fn cmd_dashboard(
    config: EngineConfig,
    target: &TargetArgs,
    format: Option<OutputFormat>,
) -> Result<(), CircadiaCliError> {
    let date = resolve_date(target.date.as_deref(), &config)?;
    let period = target.period.unwrap_or(config.default_period);
    let files = ThingSpeakNightFiles::new(config.environment_dir.clone());
    let engine = build_engine(config, target.ledger.as_deref())?;

    let bedtime = available(engine.optimal_bedtime(date, period), "optimal bedtime")?;
    let interdaily_stability =
        available(engine.interdaily_stability(date, period), "interdaily stability")?;
    let heatmap = available(engine.sleep_wake_matrix(date, period), "sleep/wake heatmap")?.map(
        |matrix| {
            window_dates(date, period)
                .into_iter()
                .zip(matrix)
                .map(|(day, epochs)| HeatmapRow { date: day, epochs })
                .collect::<Vec<_>>()
        },
    );
    let (environment, delta) = match available(engine.environment_report(&files, date), "environment")? {
        Some((reading, delta)) => (Some(reading), Some(delta)),
        None => (None, None),
    };

    let snapshot = DashboardSnapshot {
        date,
        bedtime,
        interdaily_stability,
        heatmap,
        environment,
        delta,
    };

    match resolve_format(format) {
        OutputFormat::Text => print_dashboard_text(&snapshot, engine.config().epochs_per_day),
        other => print_json(&snapshot, other)?,
    }
    Ok(())
}

fn cmd_update(
    config: EngineConfig,
    date: Option<&str>,
    ledger: Option<&Path>,
    fetch_sleep: bool,
    fetch_environment: bool,
) -> Result<(), CircadiaCliError> {
    let date = resolve_date(date, &config)?;
    let log = MetricsLog::open(config.metrics_log.clone())?;

    if log.contains(date)? {
        println!("Date {} already exists in {}", date, log.path().display());
        return Ok(());
    }

    if fetch_sleep {
        GarminSync::from_config(&config).run()?;
    }

    let engine = build_engine(config, ledger)?;

    if fetch_environment {
        let night = engine.source().night_record(date)?;
        ThingSpeakClient::from_config(engine.config())?.fetch_night(&night)?;
    }

    let row = engine.daily_metrics(date)?;
    if log.append(&row)? {
        println!("Data for {} successfully added.", date);
    }
    Ok(())
}

fn cmd_fetch_environment(config: EngineConfig, date: Option<&str>) -> Result<(), CircadiaCliError> {
    let date = resolve_date(date, &config)?;
    let client = ThingSpeakClient::from_config(&config)?;
    let night = GarminSleepDirectory::from_config(&config)?.night_record(date)?;

    let path = client.fetch_night(&night)?;
    println!("{}", path.display());
    Ok(())
}

fn cmd_snapshot(
    config: EngineConfig,
    target: &TargetArgs,
    output: &Path,
) -> Result<(), CircadiaCliError> {
    let date = resolve_date(target.date.as_deref(), &config)?;
    let period = target.period.unwrap_or(config.default_period);
    let engine = build_engine(config, target.ledger.as_deref())?;

    let ledger = NightLedger::capture(engine.source(), window_dates(date, period))?;
    ledger.save(output)?;
    println!("{} nights written to {}", ledger.len(), output.display());
    Ok(())
}

fn cmd_doctor(config: EngineConfig, json: bool) -> Result<(), CircadiaCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck::ok(
        "version",
        format!("circadia version {}", CIRCADIA_VERSION),
    ));
    checks.push(DoctorCheck::ok(
        "config",
        format!(
            "timezone {} (+{}h), period {} days, {} epochs/day",
            config.timezone, config.local_shift_hours, config.default_period, config.epochs_per_day
        ),
    ));

    checks.push(directory_check(
        "sleep_dir",
        &config.sleep_dir,
        "sleep_",
        ".json",
    ));
    checks.push(directory_check(
        "environment_dir",
        &config.environment_dir,
        "nightdata_",
        ".csv",
    ));

    let log_check = if config.metrics_log.exists() {
        match MetricsLog::open(config.metrics_log.clone()).and_then(|log| log.read_all()) {
            Ok(rows) => DoctorCheck::ok(
                "metrics_log",
                format!("{} days logged", rows.len()),
            ),
            Err(e) => DoctorCheck {
                name: "metrics_log".to_string(),
                status: CheckStatus::Error,
                message: format!("Cannot read metrics log: {}", e),
            },
        }
    } else {
        DoctorCheck {
            name: "metrics_log".to_string(),
            status: CheckStatus::Warning,
            message: "Metrics log does not exist yet".to_string(),
        }
    };
    checks.push(log_check);

    let sync = GarminSync::from_config(&config);
    let sync_check = match sync.locate() {
        Some(path) => DoctorCheck::ok("garmin_sync", format!("{}", path.display())),
        None => DoctorCheck {
            name: "garmin_sync".to_string(),
            status: CheckStatus::Warning,
            message: format!(
                "{} not found; 'update --fetch-sleep' will fail",
                sync.command()
            ),
        },
    };
    checks.push(sync_check);

    let feed_check = match (&config.thingspeak.channel_id, &config.thingspeak.api_key) {
        (Some(channel), Some(_)) => DoctorCheck::ok("thingspeak", format!("channel {}", channel)),
        _ => DoctorCheck {
            name: "thingspeak".to_string(),
            status: CheckStatus::Warning,
            message: "Channel or API key not configured; environment fetch disabled".to_string(),
        },
    };
    checks.push(feed_check);

    let report = DoctorReport {
        version: CIRCADIA_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("circadia Doctor Report");
        println!("======================");
        println!("Version: {}", report.version);
        println!("\nChecks:");
        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(CircadiaCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn resolve_date(raw: Option<&str>, config: &EngineConfig) -> Result<NaiveDate, CircadiaCliError> {
    match raw {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
            CircadiaCliError::Metrics(MetricsError::DateParse(format!("'{}': {}", raw, e)))
        }),
        None => Ok(Utc::now().with_timezone(&config.tz()?).date_naive()),
    }
}

fn resolve_format(format: Option<OutputFormat>) -> OutputFormat {
    format.unwrap_or_else(|| {
        if atty::is(atty::Stream::Stdout) {
            OutputFormat::Text
        } else {
            OutputFormat::Json
        }
    })
}

fn build_engine(
    config: EngineConfig,
    ledger: Option<&Path>,
) -> Result<CircadianEngine<Box<dyn NightSource>>, CircadiaCliError> {
    let source: Box<dyn NightSource> = match ledger {
        Some(path) => Box::new(NightLedger::load(path)?),
        None => Box::new(GarminSleepDirectory::from_config(&config)?),
    };
    Ok(CircadianEngine::new(source, config))
}

/// Turn data gaps into an empty panel; anything else is still an error
fn available<T>(result: Result<T, MetricsError>, what: &str) -> Result<Option<T>, MetricsError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(
            e @ (MetricsError::NotFound(_)
            | MetricsError::Malformed(_)
            | MetricsError::InsufficientData(_)
            | MetricsError::EnvironmentUnavailable(_)),
        ) => {
            tracing::warn!(error = %e, "{} unavailable", what);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn print_json<T: Serialize>(value: &T, format: OutputFormat) -> Result<(), CircadiaCliError> {
    let text = match format {
        OutputFormat::JsonPretty => serde_json::to_string_pretty(value)?,
        _ => serde_json::to_string(value)?,
    };
    println!("{}", text);
    Ok(())
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| "N/A".to_string())
}

fn print_environment_text(reading: Option<&EnvironmentReading>, delta: Option<&EnvironmentDelta>) {
    println!(
        "Avg Temp (°C):            {}",
        or_na(reading.map(|r| format!("{:.2}", r.avg_temperature)))
    );
    println!(
        "Temp Difference (°C):     {}",
        or_na(delta.map(|d| format!("{:+.2}", d.temperature_difference)))
    );
    println!(
        "Avg Humidity (%):         {}",
        or_na(reading.map(|r| format!("{:.2}", r.avg_humidity)))
    );
    println!(
        "Humidity Difference (%):  {}",
        or_na(delta.map(|d| format!("{:+.2}", d.humidity_difference)))
    );
    if let Some(delta) = delta {
        println!();
        println!("Temperature Advice: {}", delta.temperature_advice);
        println!("Humidity Advice:    {}", delta.humidity_advice);
    }
}

fn print_dashboard_text(snapshot: &DashboardSnapshot, epochs_per_day: usize) {
    println!("Sleep Metrics Dashboard - {}", snapshot.date);
    println!("========================================");
    println!();
    println!("TONIGHT'S SLEEP AND WAKE TIMES");
    println!(
        "  Bedtime:   {}",
        or_na(snapshot.bedtime.as_ref().map(|b| b.bedtime.clone()))
    );
    println!(
        "  Wake Time: {}",
        or_na(snapshot.bedtime.as_ref().map(|b| b.wake_time.clone()))
    );
    println!(
        "  Interdaily stability: {}",
        or_na(snapshot.interdaily_stability.map(|is| format!("{:.2}", is)))
    );
    println!();

    println!("SLEEP/WAKE ({} epochs/day, # = asleep)", epochs_per_day);
    match &snapshot.heatmap {
        Some(rows) => {
            let hours_per_epoch = 24.0 / epochs_per_day as f64;
            let axis: String = (0..epochs_per_day)
                .map(|e| {
                    let hour = e as f64 * hours_per_epoch;
                    if hour.fract() == 0.0 && (hour as u32) % 6 == 0 {
                        '|'
                    } else {
                        ' '
                    }
                })
                .collect();
            println!("  {:<10} {}", "", axis);
            for row in rows {
                let cells: String = row
                    .epochs
                    .iter()
                    .map(|&v| if v == ASLEEP { '#' } else { '.' })
                    .collect();
                println!("  {:<10} {}", row.date, cells);
            }
        }
        None => println!("  N/A"),
    }
    println!();

    println!("BEDROOM");
    print_environment_text(snapshot.environment.as_ref(), snapshot.delta.as_ref());
}

// Error types

#[derive(Debug)]
enum CircadiaCliError {
    Io(io::Error),
    Metrics(MetricsError),
    Json(serde_json::Error),
    DoctorFailed,
}

impl From<io::Error> for CircadiaCliError {
    fn from(e: io::Error) -> Self {
        CircadiaCliError::Io(e)
    }
}

impl From<MetricsError> for CircadiaCliError {
    fn from(e: MetricsError) -> Self {
        CircadiaCliError::Metrics(e)
    }
}

impl From<serde_json::Error> for CircadiaCliError {
    fn from(e: serde_json::Error) -> Self {
        CircadiaCliError::Json(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(code: &str, message: String, hint: Option<&str>) -> Self {
        Self {
            code: code.to_string(),
            message,
            hint: hint.map(str::to_string),
        }
    }
}

impl From<CircadiaCliError> for CliError {
    fn from(e: CircadiaCliError) -> Self {
        match e {
            CircadiaCliError::Io(e) => {
                CliError::new("IO_ERROR", e.to_string(), Some("Check file paths and permissions"))
            }
            CircadiaCliError::Json(e) => CliError::new("JSON_ERROR", e.to_string(), None),
            CircadiaCliError::DoctorFailed => CliError::new(
                "DOCTOR_FAILED",
                "One or more health checks failed".to_string(),
                Some("Review the doctor report for details"),
            ),
            CircadiaCliError::Metrics(e) => {
                let message = e.to_string();
                match e {
                    MetricsError::NotFound(_) => CliError::new(
                        "NOT_FOUND",
                        message,
                        Some("Every night in the window needs a sleep record; try a shorter --period"),
                    ),
                    MetricsError::Malformed(_) => CliError::new(
                        "MALFORMED",
                        message,
                        Some("Check the sleep export or ledger for that night"),
                    ),
                    MetricsError::InsufficientData(_) => CliError::new(
                        "INSUFFICIENT_DATA",
                        message,
                        Some("Use a longer --period covering both workdays and a weekend"),
                    ),
                    MetricsError::InvalidRange(_) => CliError::new("INVALID_RANGE", message, None),
                    MetricsError::EnvironmentUnavailable(_) => CliError::new(
                        "ENVIRONMENT_UNAVAILABLE",
                        message,
                        Some("Run 'circadia fetch-environment' for that night"),
                    ),
                    MetricsError::NotSpecified(_) => CliError::new("NOT_SPECIFIED", message, None),
                    MetricsError::InvalidTimezone(_) => CliError::new(
                        "CONFIG_ERROR",
                        message,
                        Some("Use an IANA zone name such as Europe/London"),
                    ),
                    MetricsError::DateParse(_) => {
                        CliError::new("DATE_ERROR", message, Some("Dates are YYYY-MM-DD"))
                    }
                    MetricsError::Io(_) => CliError::new(
                        "IO_ERROR",
                        message,
                        Some("Check file paths and permissions"),
                    ),
                    MetricsError::Json(_) => {
                        CliError::new("JSON_ERROR", message, Some("Check JSON syntax"))
                    }
                    MetricsError::Csv(_) => CliError::new("CSV_ERROR", message, None),
                    MetricsError::Fetch(_) => CliError::new(
                        "FETCH_ERROR",
                        message,
                        Some("Check the downloader, the ThingSpeak credentials and the network"),
                    ),
                }
            }
        }
    }
}

// Report types

#[derive(Serialize)]
struct MetricsReport {
    date: NaiveDate,
    period: usize,
    stdev_onset: f64,
    stdev_offset: f64,
    stdev_duration: f64,
    interdaily_stability: f64,
    social_jet_lag: f64,
    optimal_bedtime: BedtimeRecommendation,
}

#[derive(Serialize)]
struct EnvironmentReport {
    reading: EnvironmentReading,
    delta: EnvironmentDelta,
}

#[derive(Serialize)]
struct HeatmapRow {
    date: NaiveDate,
    epochs: Vec<u8>,
}

#[derive(Serialize)]
struct DashboardSnapshot {
    date: NaiveDate,
    bedtime: Option<BedtimeRecommendation>,
    interdaily_stability: Option<f64>,
    heatmap: Option<Vec<HeatmapRow>>,
    environment: Option<EnvironmentReading>,
    delta: Option<EnvironmentDelta>,
}

#[derive(Serialize)]
struct DoctorReport {
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

impl DoctorCheck {
    fn ok(name: &str, message: String) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message,
        }
    }
}

#[derive(Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

fn directory_check(name: &str, dir: &Path, prefix: &str, suffix: &str) -> DoctorCheck {
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            let count = entries
                .filter_map(Result::ok)
                .filter(|entry| {
                    let file_name = entry.file_name();
                    let file_name = file_name.to_string_lossy();
                    file_name.starts_with(prefix) && file_name.ends_with(suffix)
                })
                .count();
            DoctorCheck::ok(name, format!("{} ({} nights)", dir.display(), count))
        }
        Err(e) => DoctorCheck {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: format!("Cannot read {}: {}", dir.display(), e),
        },
    }
}
