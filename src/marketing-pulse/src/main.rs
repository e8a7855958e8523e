//! Marketing Pulse: marketing spend versus business outcome dashboard.
//!
//! Reads the google, facebook and tiktok marketing exports plus the business
//! export, and prints KPIs, the daily spend/revenue series, the channel
//! breakdown and the campaign leaderboard for a date range.

mod output;
mod session;
mod sources;

use chrono::NaiveDate;
use clap::Parser;
use output::{OutputFormat, OutputOptions};
use pulse_cache::DatasetCache;
use pulse_core::config::{AppConfig, OrdersScope};
use pulse_core::{PulseError, PulseResult};
use pulse_ingest::Ingestor;
use pulse_reporting::render::render_awaiting_input;
use pulse_reporting::View;
use session::{Command, Session, HELP};
use sources::SourcePaths;
use std::io::{self, BufRead, Write};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "marketing-pulse")]
#[command(about = "Marketing spend and business performance dashboard")]
#[command(version)]
struct Cli {
    /// TOML config file layered under environment overrides
    #[arg(long, env = "MARKETING_PULSE_CONFIG")]
    config: Option<String>,

    /// Google marketing CSV (overrides config)
    #[arg(long, env = "MARKETING_PULSE__INPUTS__GOOGLE")]
    google: Option<String>,

    /// Facebook marketing CSV (overrides config)
    #[arg(long, env = "MARKETING_PULSE__INPUTS__FACEBOOK")]
    facebook: Option<String>,

    /// TikTok marketing CSV (overrides config)
    #[arg(long, env = "MARKETING_PULSE__INPUTS__TIKTOK")]
    tiktok: Option<String>,

    /// Business CSV (overrides config)
    #[arg(long, env = "MARKETING_PULSE__INPUTS__BUSINESS")]
    business: Option<String>,

    /// First day of the range, day-first (03/04/2024 is 3 April) or ISO
    #[arg(long, value_parser = parse_date_arg)]
    start: Option<NaiveDate>,

    /// Last day of the range, inclusive
    #[arg(long, value_parser = parse_date_arg)]
    end: Option<NaiveDate>,

    /// Business rows counted toward total orders: all_time or date_range
    #[arg(long)]
    orders_scope: Option<OrdersScope>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// all, kpis, daily, channels, campaigns or records
    #[arg(long, default_value = "all")]
    view: View,

    /// Show at most this many leaderboard rows (overrides config)
    #[arg(long)]
    leaderboard_limit: Option<usize>,

    /// Read range changes from stdin and recompute after each one
    #[arg(long, default_value_t = false)]
    interactive: bool,

    /// Emit logs as JSON
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    pulse_ingest::dates::parse_day_first(value)
        .ok_or_else(|| format!("'{value}' is not a day-first (DD/MM/YYYY) or ISO date"))
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "marketing_pulse=info,pulse_ingest=info,pulse_cache=info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    // An explicitly named config file must load; otherwise fall back to defaults
    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if cli.config.is_some() => return Err(e.into()),
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        }
    };

    // Apply CLI overrides
    if let Some(path) = cli.google {
        config.inputs.google = path;
    }
    if let Some(path) = cli.facebook {
        config.inputs.facebook = path;
    }
    if let Some(path) = cli.tiktok {
        config.inputs.tiktok = path;
    }
    if let Some(path) = cli.business {
        config.inputs.business = path;
    }
    if let Some(scope) = cli.orders_scope {
        config.reporting.orders_scope = scope;
    }
    if cli.leaderboard_limit.is_some() {
        config.reporting.leaderboard_limit = cli.leaderboard_limit;
    }

    info!(
        google = %config.inputs.google,
        facebook = %config.inputs.facebook,
        tiktok = %config.inputs.tiktok,
        business = %config.inputs.business,
        orders_scope = ?config.reporting.orders_scope,
        "Configuration loaded"
    );

    let mut session = Session::new(
        SourcePaths::from_config(&config.inputs),
        Ingestor::new(config.business.clone()),
        DatasetCache::new(config.cache.max_entries),
    );
    session.start = cli.start;
    session.end = cli.end;
    session.orders_scope = config.reporting.orders_scope;

    let options = OutputOptions {
        format: cli.format,
        view: cli.view,
        leaderboard_limit: config.reporting.leaderboard_limit,
    };

    if cli.interactive {
        return run_interactive(&mut session, &options);
    }

    let out = refresh(&mut session, &options)?;
    print!("{out}");
    Ok(())
}

/// Load (or reuse) the dataset and render the dashboard for the session's
/// current parameters. Missing sources render as the neutral prompt.
fn refresh(session: &mut Session, options: &OutputOptions) -> PulseResult<String> {
    let dataset = match session.load() {
        Ok(dataset) => dataset,
        Err(PulseError::MissingInput { sources }) => {
            info!(missing = ?sources, "Awaiting input");
            return Ok(render_awaiting_input(&sources));
        }
        Err(e) => return Err(e),
    };
    let query = session.query(&dataset)?;
    output::render(&dataset, &query, options)
}

fn run_interactive(session: &mut Session, options: &OutputOptions) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let show = |session: &mut Session, stdout: &mut io::Stdout| -> io::Result<()> {
        match refresh(session, options) {
            Ok(out) => write!(stdout, "{out}")?,
            Err(e) => {
                error!(error = %e, "Dashboard refresh failed");
                writeln!(stdout, "Error: {e}")?;
            }
        }
        Ok(())
    };

    show(session, &mut stdout)?;
    write!(stdout, "> ")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        match line.parse::<Command>() {
            Ok(Command::Help) => write!(stdout, "{HELP}")?,
            Ok(command) => match session.apply(&command) {
                Ok(false) => break,
                Ok(true) => show(session, &mut stdout)?,
                Err(e) => writeln!(stdout, "Error: {e}")?,
            },
            Err(e) => writeln!(stdout, "{e} (try 'help')")?,
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }

    info!("Interactive session ended");
    Ok(())
}
