use anyhow::{Context, Result};
use chrono::Local;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use campaign_view::config::config::Config;
use campaign_view::data::data_analyzer::MetricsSummary;
use campaign_view::data::data_exporter::{DataExporter, ExportFormat};
use campaign_view::data::data_view::DataView;
use campaign_view::data::datatable_loaders::load_rows;
use campaign_view::data::mock_data::{campaign_columns, daily_columns, MockDataGenerator};
use campaign_view::live_feed::{FeedTarget, LiveFeed};
use campaign_view::logging::{default_log_file, init_tracing, LogRingBuffer, LoggingOptions};
use campaign_view::table_display::{display_page, display_summary};

/// Log lines shown under the table in watch mode
const WATCH_LOG_LINES: usize = 5;

#[derive(Parser)]
#[command(
    name = "campaign-view",
    version,
    about = "Filter, sort, paginate and export campaign performance tables"
)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Also write logs to a timestamped file
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print one page of the table
    Show {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Export the filtered and sorted rows (all pages)
    Export {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        view: ViewArgs,
        /// csv or pdf (defaults to the configured format)
        #[arg(short, long)]
        format: Option<String>,
        /// Output directory (defaults to the configured directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Re-render the table as live updates arrive; Ctrl-C stops
    Watch {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        view: ViewArgs,
        /// Update interval in milliseconds (defaults to the configured interval)
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Stop after this many updates
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Manage the config file
    Config {
        /// Write a commented default config file
        #[arg(long)]
        init: bool,
        /// Overwrite an existing file with --init
        #[arg(long)]
        force: bool,
        /// Print the config file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Dataset {
    Campaigns,
    Daily,
}

#[derive(Args)]
struct SourceArgs {
    /// Load rows from a .json or .csv file instead of mock data
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Mock dataset to use when no input file is given
    #[arg(long, value_enum, default_value_t = Dataset::Campaigns)]
    dataset: Dataset,

    /// Seed for mock data (defaults to the configured seed)
    #[arg(long)]
    seed: Option<u64>,

    /// Generate this many random campaigns instead of the reference five
    #[arg(long)]
    campaigns: Option<usize>,

    /// Days of daily metrics
    #[arg(long, default_value_t = 30)]
    days: usize,
}

impl SourceArgs {
    /// KPI cards are shown for the generated daily metrics
    fn shows_summary(&self) -> bool {
        self.input.is_none() && matches!(self.dataset, Dataset::Daily)
    }
}

#[derive(Args)]
struct ViewArgs {
    /// all, active, paused or stopped (anything else shows all)
    #[arg(short, long)]
    status: Option<String>,

    /// Sort field; repeat to toggle direction (--sort roi --sort roi = descending)
    #[arg(long)]
    sort: Vec<String>,

    /// 1-based page number
    #[arg(short, long)]
    page: Option<usize>,

    /// Rows per page (defaults to the configured size)
    #[arg(long)]
    page_size: Option<usize>,

    /// Table title (defaults to the configured title)
    #[arg(short, long)]
    title: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let level = match cli.verbose {
        0 => config.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let log_file = if cli.log_file || config.logging.log_to_file {
        Some(default_log_file()?)
    } else {
        None
    };
    let logs = init_tracing(&LoggingOptions {
        level,
        log_file,
        capture: matches!(cli.command, Command::Watch { .. }),
    })?;

    match cli.command {
        Command::Show { source, view } => {
            let (data_view, _) = build_view(&config, &source, &view)?;
            if source.shows_summary() {
                let summary = MetricsSummary::from_rows(data_view.rows());
                display_summary(&summary, config.display.use_color);
            }
            display_page(&data_view, &data_view.get_view(), config.display.use_color);
        }
        Command::Export {
            source,
            view,
            format,
            out_dir,
        } => {
            let (data_view, _) = build_view(&config, &source, &view)?;
            let format = match format {
                Some(f) => f.parse::<ExportFormat>()?,
                None => config.export.default_format,
            };
            let out_dir = out_dir.unwrap_or_else(|| config.export_dir());

            let document = data_view.export_document();
            let path = DataExporter::export(&document, format, &out_dir)
                .with_context(|| format!("Export to {} failed", out_dir.display()))?;

            let message = format!(
                "Exported {} rows to {} file: {}",
                document.row_count(),
                format,
                path.display()
            );
            if config.display.use_color {
                println!("{}", message.green());
            } else {
                println!("{}", message);
            }
        }
        Command::Watch {
            source,
            view,
            interval_ms,
            ticks,
        } => {
            let (data_view, target) = build_view(&config, &source, &view)?;
            let interval = Duration::from_millis(interval_ms.unwrap_or(config.feed.interval_ms));
            let seed = source.seed.unwrap_or(config.feed.seed);
            let feed = LiveFeed::new(seed, target, interval);
            let options = WatchOptions {
                max_ticks: ticks,
                use_color: config.display.use_color,
                show_summary: source.shows_summary(),
            };
            run_watch(data_view, feed, options, logs).await?;
        }
        Command::Config { init, force, path } => {
            let config_path = match cli.config {
                Some(p) => p,
                None => Config::get_config_path()?,
            };
            if path {
                println!("{}", config_path.display());
            }
            if init {
                Config::init_file(&config_path, force)?;
                println!("Configuration file created at: {}", config_path.display());
            }
            if !init && !path {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

/// Load rows, pick columns and apply the requested filter, sorts and page
fn build_view(
    config: &Config,
    source: &SourceArgs,
    args: &ViewArgs,
) -> Result<(DataView, FeedTarget)> {
    let seed = source.seed.unwrap_or(config.feed.seed);

    let (rows, columns, target) = match (&source.input, source.dataset) {
        (Some(path), _) => {
            let loaded = load_rows(path)?;
            let columns = loaded.columns();
            (loaded.rows, columns, FeedTarget::ActiveRows)
        }
        (None, Dataset::Campaigns) => {
            let mut generator = MockDataGenerator::new(seed);
            let rows = match source.campaigns {
                Some(count) => generator.synthetic_campaigns(count),
                None => generator.campaigns(),
            };
            (rows, campaign_columns(), FeedTarget::ActiveRows)
        }
        (None, Dataset::Daily) => {
            let rows = MockDataGenerator::new(seed)
                .daily_metrics(source.days, Local::now().date_naive());
            (rows, daily_columns(), FeedTarget::LatestRow)
        }
    };

    let title = args
        .title
        .clone()
        .unwrap_or_else(|| config.display.table_title.clone());
    let mut view = DataView::new(title, rows, columns)
        .with_page_size(args.page_size.unwrap_or(config.display.page_size));

    if let Some(status) = &args.status {
        view.set_status_filter(status);
    }
    for field in &args.sort {
        view.set_sort(field);
    }
    // Filter and sort reset the page, so the page goes last
    if let Some(page) = args.page {
        view.set_page(page);
    }

    info!(
        target: "view",
        "Built view '{}' with {} rows and {} columns",
        view.title(),
        view.rows().len(),
        view.columns().len()
    );
    Ok((view, target))
}

struct WatchOptions {
    max_ticks: Option<u64>,
    use_color: bool,
    show_summary: bool,
}

async fn run_watch(
    mut view: DataView,
    mut feed: LiveFeed,
    options: WatchOptions,
    logs: Option<LogRingBuffer>,
) -> Result<()> {
    let mut rows = view.rows().to_vec();
    let mut interval = tokio::time::interval(feed.interval());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    // The first tick fires immediately and shows the initial state
    let mut first = true;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if !first {
                    feed.tick(&mut rows);
                    view.set_rows(rows.clone());
                }
                first = false;
                render_watch(&view, &feed, &options, logs.as_ref())?;

                if options.max_ticks.is_some_and(|max| feed.ticks() >= max) {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                break;
            }
        }
    }

    // Dropping the interval stops the timer
    info!(target: "feed", "Live updates stopped after {} ticks", feed.ticks());
    Ok(())
}

fn render_watch(
    view: &DataView,
    feed: &LiveFeed,
    options: &WatchOptions,
    logs: Option<&LogRingBuffer>,
) -> Result<()> {
    execute!(std::io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    if options.show_summary {
        display_summary(&MetricsSummary::from_rows(view.rows()), options.use_color);
    }
    display_page(view, &view.get_view(), options.use_color);
    println!(
        "Live updates every {} ms (update #{}), Ctrl-C to stop",
        feed.interval().as_millis(),
        feed.ticks()
    );

    if let Some(logs) = logs {
        for entry in logs.get_recent(WATCH_LOG_LINES) {
            println!("{}", entry.format_for_display());
        }
    }
    Ok(())
}
