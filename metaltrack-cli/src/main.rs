//! metaltrack CLI: record entry, signal review, and export.
//!
//! Commands:
//! - `status` prints the latest record's signals, summary and advice
//! - `list` prints one line per record
//! - `import` loads a data file (path or URL) into the local store
//! - `add` / `delete` edit the local store
//! - `export` writes the dated CSV
//! - `calendar` shows delivery events and the window check for a date
//! - `thresholds` prints the effective threshold table

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn, Level};

use metaltrack_core::{CotChange, Evaluator, Metric, Record, RecordId, Signal};
use metaltrack_runner::{
    assess_records, dataset_hash, status_report, write_export, DataSource, HttpFileProvider,
    LocalStore, RecordStore, TrackerConfig,
};

#[derive(Parser)]
#[command(
    name = "metaltrack",
    about = "metaltrack: precious-metals signal tracker"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Local store directory. Overrides the config file.
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    /// Debug logging.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Signals, summary and advice for the most recent record.
    Status {
        /// Read records from this data file (path or URL) instead of the local store.
        #[arg(long)]
        data: Option<String>,

        /// Reference date for the delivery window and report-day reminder. Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// One line per record: date, price, counts, advice.
    List {
        /// Read records from this data file (path or URL) instead of the local store.
        #[arg(long)]
        data: Option<String>,
    },
    /// Load a data file and replace the local store with its records.
    Import {
        /// Path or http(s) URL of the data file.
        source: String,
    },
    /// Add a manually entered record to the local store.
    Add(RecordArgs),
    /// Delete a record from the local store by id.
    Delete {
        id: u64,
    },
    /// Write records with their signal counts and advice to a dated CSV.
    Export {
        /// Read records from this data file (path or URL) instead of the local store.
        #[arg(long)]
        data: Option<String>,

        /// Output directory.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// List delivery calendar events and check the window for a date.
    Calendar {
        /// Date to check (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// Print the effective threshold table.
    Thresholds,
}

#[derive(Args)]
struct RecordArgs {
    /// Observation date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<String>,

    #[arg(long, default_value = "")]
    silver: String,

    #[arg(long, default_value = "")]
    gold: String,

    /// Gold/silver ratio.
    #[arg(long, default_value = "")]
    ratio: String,

    /// Momentum score, 0-100.
    #[arg(long, default_value = "")]
    momentum: String,

    /// COMEX registered inventory, millions of ounces.
    #[arg(long, default_value = "")]
    comex: String,

    #[arg(long)]
    comex_eligible: Option<String>,

    #[arg(long)]
    comex_total: Option<String>,

    /// Net commercial COT position.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    cot_commercial: String,

    /// Week-over-week commercial move: "REDUCED SHORT" or "ADDED SHORT".
    #[arg(long)]
    cot_change: Option<String>,

    #[arg(long, default_value = "", allow_hyphen_values = true)]
    cot_speculator: String,

    #[arg(long, default_value = "")]
    slv: String,

    #[arg(long)]
    pslv: Option<String>,

    /// Monthly price change, percent.
    #[arg(long, allow_hyphen_values = true)]
    monthly: Option<String>,

    /// Weekly price change, percent.
    #[arg(long, allow_hyphen_values = true)]
    weekly: Option<String>,

    /// Free-text delivery window note.
    #[arg(long)]
    delivery_window: Option<String>,

    #[arg(long, default_value = "")]
    note: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => TrackerConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TrackerConfig::default(),
    };
    let local = LocalStore::new(resolve_store_dir(cli.store_dir, &config));
    debug!(dir = %local.dir().display(), "local store");

    match cli.command {
        Commands::Status { data, date } => {
            let today = parse_date_or_today(date.as_deref())?;
            run_status(&config, &local, data.as_deref(), today)
        }
        Commands::List { data } => run_list(&config, &local, data.as_deref()),
        Commands::Import { source } => run_import(&local, &source),
        Commands::Add(args) => run_add(&local, args),
        Commands::Delete { id } => run_delete(&local, RecordId(id)),
        Commands::Export { data, out_dir } => run_export(&config, &local, data.as_deref(), &out_dir),
        Commands::Calendar { date } => {
            let date = parse_date_or_today(date.as_deref())?;
            run_calendar(&config, date)
        }
        Commands::Thresholds => run_thresholds(&config),
    }
}

/// `--store-dir`, then `[storage] dir`, then the platform data dir, then `./data`.
fn resolve_store_dir(flag: Option<PathBuf>, config: &TrackerConfig) -> PathBuf {
    flag.or_else(|| config.storage.dir.clone())
        .or_else(|| dirs::data_dir().map(|d| d.join("metaltrack")))
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn parse_date_or_today(s: Option<&str>) -> Result<NaiveDate> {
    match s {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn load_local(local: &LocalStore) -> Result<RecordStore> {
    let stored = local
        .load()
        .with_context(|| format!("reading local store {}", local.path().display()))?;
    Ok(match stored {
        Some(records) => RecordStore::from_stored(records),
        None => RecordStore::new(),
    })
}

/// Records from `--data` when given, otherwise from the local store.
fn load_records(local: &LocalStore, data: Option<&str>) -> Result<RecordStore> {
    let Some(data) = data else {
        return load_local(local);
    };
    let source: DataSource = data.parse()?;
    let mut store = RecordStore::new();
    store
        .load(&HttpFileProvider::default(), &source)
        .with_context(|| format!("loading {source}"))?;
    Ok(store)
}

fn run_status(
    config: &TrackerConfig,
    local: &LocalStore,
    data: Option<&str>,
    today: NaiveDate,
) -> Result<()> {
    let store = load_records(local, data)?;
    let report = status_report(&store, &config.evaluator(), today);

    let Some(latest) = &report.latest else {
        println!("No records. Use `metaltrack import` or `metaltrack add`.");
        return Ok(());
    };

    let meta = store.meta();
    println!("Source: {}", meta.source);
    if !meta.last_updated.is_empty() {
        println!("Last updated: {}", meta.last_updated);
    }
    println!("Records: {}", report.record_count);
    println!("Dataset hash: {}", &dataset_hash(store.records())[..16]);
    println!();

    println!("Latest record: {} (id {})", latest.date, latest.id);
    if let Some(stored) = store.latest() {
        let r = &stored.record;
        println!("  Silver: {}  Gold: {}", or_dash(&r.silver_price), or_dash(&r.gold_price));
        if !r.note.is_empty() {
            println!("  Note: {}", r.note);
        }
    }
    if let Some(pc) = report.price_change {
        println!("  Change vs prior: {:+.2} ({:+.2}%)", pc.change, pc.percent);
    }
    println!();

    println!("{:<18} {:<22} {:<8} Reason", "Signal", "Value", "Reading");
    println!("{}", "-".repeat(80));
    for s in &latest.evaluation.signals {
        println!(
            "{:<18} {:<22} {:<8} {}",
            s.source.label(),
            s.display_value,
            marker(s.signal),
            s.reason
        );
    }
    println!();

    let summary = latest.evaluation.summary;
    println!("Summary: {} bullish / {} bearish", summary.bullish, summary.bearish);
    println!(
        "Advice: {} [{}] {}",
        latest.advice.label, latest.advice.severity, latest.advice.action_hint
    );
    println!();

    match &report.upcoming_delivery {
        Some(hit) => println!(
            "Delivery: {} on {} in {} day(s), {} risk",
            hit.event.description, hit.event.date, hit.days_to, hit.event.risk
        ),
        None => println!("Delivery: no event within the window"),
    }
    if let Some(day) = report.report_day {
        println!("Reminder: {}", day.reminder());
    }

    if let Some(insights) = &meta.market_insights {
        println!();
        println!("Market insights:");
        if let Some(ratio) = &insights.gold_silver_ratio {
            println!(
                "  Ratio {:.1} ({:.0}th pct, {}): {}",
                ratio.value, ratio.percentile, ratio.signal, ratio.description
            );
        }
        if let Some(cot) = &insights.cot_positioning {
            println!(
                "  COT commercial {:.0} / managed money {:.0} ({}{}): {}",
                cot.commercial,
                cot.managed_money,
                cot.signal,
                cot.change
                    .as_deref()
                    .map(|c| format!(", {c}"))
                    .unwrap_or_default(),
                cot.description
            );
        }
        if let Some(momentum) = &insights.momentum {
            println!(
                "  Momentum {:.0} ({}): {}",
                momentum.score, momentum.signal, momentum.description
            );
        }
        if let Some(tech) = &insights.technical {
            println!(
                "  RSI {:.1}, SMA50 {:.2}, SMA200 {:.2}, vs SMA50 {} ({})",
                tech.rsi, tech.sma50, tech.sma200, tech.price_vs_sma50, tech.signal
            );
        }
    }
    if let Some(range) = &meta.price_range {
        println!(
            "52-week range: {:.2} to {:.2} ({} from low, {} from high)",
            range.low, range.high, range.current_from_low, range.current_from_high
        );
    }

    Ok(())
}

fn run_list(config: &TrackerConfig, local: &LocalStore, data: Option<&str>) -> Result<()> {
    let store = load_records(local, data)?;
    if store.is_empty() {
        println!("No records.");
        return Ok(());
    }

    let assessed = assess_records(&store, &config.evaluator());
    println!(
        "{:>5} {:<10} {:>9} {:>4} {:>4}  {:<14} Note",
        "Id", "Date", "Silver", "Bull", "Bear", "Advice"
    );
    println!("{}", "-".repeat(72));
    for (stored, a) in store.records().iter().zip(&assessed) {
        println!(
            "{:>5} {:<10} {:>9} {:>4} {:>4}  {:<14} {}",
            a.id,
            a.date,
            or_dash(&stored.record.silver_price),
            a.evaluation.summary.bullish,
            a.evaluation.summary.bearish,
            a.advice.label,
            stored.record.note
        );
    }
    Ok(())
}

fn run_import(local: &LocalStore, source: &str) -> Result<()> {
    let source: DataSource = source.parse()?;
    let mut store = RecordStore::new();
    let count = store
        .load(&HttpFileProvider::default(), &source)
        .with_context(|| format!("importing {source}"))?;

    if local.exists() {
        warn!(path = %local.path().display(), "replacing existing local store");
    }
    local.save(store.records())?;
    println!("Imported {count} records from {source}");
    println!("Saved to: {}", local.path().display());
    Ok(())
}

fn run_add(local: &LocalStore, args: RecordArgs) -> Result<()> {
    let date = parse_date_or_today(args.date.as_deref())?;
    let cot_change = match args.cot_change.as_deref() {
        Some(raw) if !raw.trim().is_empty() => match CotChange::parse(raw) {
            Some(tag) => Some(tag),
            None => bail!("unknown --cot-change '{raw}'. Valid: REDUCED SHORT, ADDED SHORT"),
        },
        _ => None,
    };

    let record = Record {
        silver_price: args.silver,
        gold_price: args.gold,
        gold_silver_ratio: args.ratio,
        momentum: args.momentum,
        comex_inventory: args.comex,
        comex_eligible: non_empty(args.comex_eligible),
        comex_total: non_empty(args.comex_total),
        cot_commercial: args.cot_commercial,
        cot_change,
        cot_speculator: args.cot_speculator,
        slv_holdings: args.slv,
        pslv_holdings: non_empty(args.pslv),
        monthly_change: non_empty(args.monthly),
        weekly_change: non_empty(args.weekly),
        delivery_window: non_empty(args.delivery_window),
        note: args.note,
        ..Record::new(date)
    };

    let mut store = load_local(local)?;
    let id = store.add(record);
    local.save(store.records())?;
    info!(%id, %date, "record added");
    println!("Added record {id} for {date}");
    Ok(())
}

fn run_delete(local: &LocalStore, id: RecordId) -> Result<()> {
    let mut store = load_local(local)?;
    let removed = store.delete(id)?;
    local.save(store.records())?;
    println!("Deleted record {} ({})", removed.id, removed.record.date);
    Ok(())
}

fn run_export(
    config: &TrackerConfig,
    local: &LocalStore,
    data: Option<&str>,
    out_dir: &Path,
) -> Result<()> {
    let store = load_records(local, data)?;
    if store.is_empty() {
        bail!("no records to export");
    }
    let evaluator = store.evaluator(&config.evaluator());
    let today = chrono::Local::now().date_naive();
    let path = write_export(out_dir, store.records(), &evaluator, today)?;
    println!("Exported {} records to: {}", store.len(), path.display());
    Ok(())
}

fn run_calendar(config: &TrackerConfig, date: NaiveDate) -> Result<()> {
    let evaluator: Evaluator = config.evaluator();
    let calendar = evaluator.calendar();

    println!("Lookahead: {} day(s)", calendar.lookahead_days());
    println!();
    println!("{:<10} {:<8} Event", "Date", "Risk");
    println!("{}", "-".repeat(50));
    let mut any = false;
    for event in calendar.upcoming(date) {
        any = true;
        println!("{:<10} {:<8} {}", event.date, event.risk, event.description);
    }
    if !any {
        println!("(no events on or after {date})");
    }
    println!();

    match calendar.check_window(date) {
        Some(hit) => println!(
            "{date}: {} in {} day(s), delivery window is bearish",
            hit.event.description, hit.days_to
        ),
        None => println!("{date}: outside every delivery window"),
    }
    if let Some(day) = metaltrack_core::report_day(date) {
        println!("Reminder: {}", day.reminder());
    }
    Ok(())
}

fn run_thresholds(config: &TrackerConfig) -> Result<()> {
    let table = config.thresholds;
    println!("{:<20} {:>10} {:>10}  Direction", "Metric", "Bullish", "Bearish");
    println!("{}", "-".repeat(60));
    for metric in Metric::ALL {
        let t = table.get(metric);
        let direction = match metric.direction() {
            metaltrack_core::thresholds::Direction::HigherIsBullish => "higher is bullish",
            metaltrack_core::thresholds::Direction::LowerIsBullish => "lower is bullish",
        };
        println!(
            "{:<20} {:>10} {:>10}  {}",
            metric.label(),
            t.bullish,
            t.bearish,
            direction
        );
    }
    Ok(())
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}

fn marker(signal: Signal) -> &'static str {
    match signal {
        Signal::Bullish => "BULL",
        Signal::Bearish => "BEAR",
        Signal::Neutral => "-",
    }
}
