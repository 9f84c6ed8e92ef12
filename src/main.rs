//! incidents-dash CLI
//!
//! Runs the interactive dashboard by default. The subcommands issue a single
//! API call and print the result, for scripting.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use console::style;
use incidents_dash::logging::{self, LogTarget};
use incidents_dash::{
    AppConfig, DashboardConfig, HttpApi, Incident, IncidentsApi, StalePolicy, DEFAULT_API_URL,
    MIN_QUERY_CHARS, PAGE_SIZE,
};
use indicatif::HumanDuration;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// incidents-dash - Search incidents by address
///
/// Without a subcommand, opens the interactive dashboard: type an address,
/// pick a suggestion, then page through matching incidents.
#[derive(Parser)]
#[command(name = "incidents-dash")]
#[command(version)]
#[command(about = "Terminal dashboard for incident records", long_about = None)]
struct Cli {
    /// Base URL of the incidents API
    #[arg(long, env = "INCIDENTS_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "10", global = true)]
    timeout: u64,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log file for the interactive dashboard
    #[arg(long, default_value = "incidents-dash.log")]
    log_file: PathBuf,

    /// Typing pause before suggestions are requested, in milliseconds
    #[arg(long, default_value = "300")]
    debounce_ms: u64,

    /// Incidents per page
    #[arg(long, default_value_t = PAGE_SIZE as u16, value_parser = clap::value_parser!(u16).range(1..=500))]
    page_size: u16,

    /// Apply responses in arrival order even when a newer request is pending
    #[arg(long)]
    apply_stale: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print address suggestions for a partial query
    Suggest {
        /// At least two characters of an address
        query: String,

        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Print one page of incidents at an address
    List {
        /// Address filter (substring match on the server)
        #[arg(short, long)]
        address: String,

        /// 1-based page number
        #[arg(long, conflicts_with = "skip")]
        page: Option<usize>,

        /// Raw row offset
        #[arg(long)]
        skip: Option<usize>,

        /// Rows per page
        #[arg(short, long, default_value_t = PAGE_SIZE)]
        limit: usize,

        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Print a single incident by its numeric id
    Show {
        id: i64,

        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn app_config(&self) -> AppConfig {
        AppConfig {
            api_url: self.api_url.clone(),
            request_timeout: Duration::from_secs(self.timeout),
            log_file: self.log_file.clone(),
            dashboard: DashboardConfig {
                debounce: Duration::from_millis(self.debounce_ms),
                page_size: self.page_size as usize,
                stale_policy: if self.apply_stale {
                    StalePolicy::Apply
                } else {
                    StalePolicy::Discard
                },
                ..DashboardConfig::default()
            },
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let config = cli.app_config();

    let target = match cli.command {
        None => LogTarget::File(&config.log_file),
        Some(_) => LogTarget::Stderr,
    };
    if let Err(e) = logging::init(target, cli.verbose) {
        eprintln!("{} could not open log: {}", style("Warning:").yellow().bold(), e);
    }
    tracing::debug!(version = incidents_dash::VERSION, "incidents-dash starting up");

    let result = match cli.command {
        None => incidents_dash::tui::run(&config),

        Some(Commands::Suggest { query, output }) => cmd_suggest(&config, &query, output),

        Some(Commands::List {
            address,
            page,
            skip,
            limit,
            output,
        }) => {
            let skip = match page {
                Some(page) => page_skip(page, limit).unwrap_or_else(|| {
                    Cli::command()
                        .error(
                            clap::error::ErrorKind::ValueValidation,
                            format!("page {page} with limit {limit} is past the last addressable row"),
                        )
                        .exit()
                }),
                None => skip.unwrap_or(0),
            };
            cmd_list(&config, &address, skip, limit, output)
        }

        Some(Commands::Show { id, output }) => cmd_show(&config, id, output),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

/// Row offset of a 1-based page, or None when it does not fit in usize
fn page_skip(page: usize, limit: usize) -> Option<usize> {
    page.saturating_sub(1).checked_mul(limit)
}

fn client(config: &AppConfig) -> incidents_dash::Result<HttpApi> {
    HttpApi::new(&config.api_url, config.request_timeout)
}

/// Suggest command implementation
fn cmd_suggest(config: &AppConfig, query: &str, output: OutputFormat) -> incidents_dash::Result<()> {
    if query.chars().count() < MIN_QUERY_CHARS {
        Cli::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("query must be at least {MIN_QUERY_CHARS} characters"),
            )
            .exit();
    }

    let api = client(config)?;
    let start = Instant::now();
    let suggestions = api.suggest_addresses(query)?;

    if output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    println!(
        "{} Addresses matching '{}' ({} in {}):",
        style("→").cyan().bold(),
        style(query).yellow(),
        suggestions.len(),
        HumanDuration(start.elapsed())
    );
    println!();
    for (i, address) in suggestions.iter().enumerate() {
        println!(
            "  {} {}",
            style(format!("{:2}.", i + 1)).dim(),
            style(address).cyan()
        );
    }

    Ok(())
}

/// List command implementation
fn cmd_list(
    config: &AppConfig,
    address: &str,
    skip: usize,
    limit: usize,
    output: OutputFormat,
) -> incidents_dash::Result<()> {
    let api = client(config)?;
    let start = Instant::now();
    let incidents = api.list_incidents(address, skip, limit)?;

    if output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&incidents)?);
        return Ok(());
    }

    if incidents.is_empty() {
        println!("No incidents found.");
        return Ok(());
    }

    println!(
        "{} Incidents {}-{} at '{}' (in {}):",
        style("→").cyan().bold(),
        skip.saturating_add(1),
        skip.saturating_add(incidents.len()),
        style(address).yellow(),
        HumanDuration(start.elapsed())
    );
    println!();

    for incident in &incidents {
        print_incident(incident);
        println!();
    }

    if limit > 0 && incidents.len() == limit {
        println!(
            "  {} more may exist: --skip {}",
            style("…").dim(),
            skip.saturating_add(limit)
        );
    }

    Ok(())
}

/// Show command implementation
fn cmd_show(config: &AppConfig, id: i64, output: OutputFormat) -> incidents_dash::Result<()> {
    let api = client(config)?;
    let incident = api.get_incident(id)?;

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&incident)?),
        OutputFormat::Text => print_incident(&incident),
    }

    Ok(())
}

fn print_incident(incident: &Incident) {
    println!("  {} #{}", style("Incident").bold(), incident.id);
    for (label, value) in incident.fields() {
        println!("    {} {}", style(format!("{label}:")).dim(), value);
    }
}
