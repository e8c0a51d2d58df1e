//! NOTAM Audit CLI

mod config;

use clap::{Args, Parser, Subcommand};
use config::AppConfig;
use notam_core::{classify::RULES, report, Auditor, ClassificationEngine};
use notam_metar::{MetarClient, MetarConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "notam-audit")]
#[command(about = "Flags NOTAM sensor outages contradicted by live METAR data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a NOTAM export and highlight contradicted rows
    Audit {
        /// Path to the NOTAM export (.xls or .xlsx)
        #[arg(short, long)]
        file: PathBuf,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fetch each airport once per run
        #[arg(long)]
        cache: bool,

        /// Maximum METAR requests in flight
        #[arg(long)]
        concurrency: Option<usize>,

        /// Classify only; leave the workbook untouched
        #[arg(long)]
        no_highlight: bool,

        #[command(flatten)]
        metar: MetarArgs,
    },

    /// Classify a single advisory against the live feed
    Classify {
        /// Advisory text, e.g. "WIND U/S"
        #[arg(short, long)]
        text: String,

        /// Airport id, e.g. ABQ or KABQ
        #[arg(short, long)]
        airport: String,

        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        metar: MetarArgs,
    },

    /// List advisory triggers in priority order
    Triggers,
}

/// Overrides for the `metar` config section.
///
/// Precedence is config file, then environment, then flag.
#[derive(Args)]
struct MetarArgs {
    /// METAR data API endpoint
    #[arg(long, env = "METAR_API_URL")]
    api_url: Option<String>,

    /// Region letter prefixed to 3-letter airport ids
    #[arg(long)]
    region_prefix: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Save raw METAR responses to this directory
    #[arg(long)]
    dump_json: Option<PathBuf>,
}

impl MetarArgs {
    fn apply(self, config: &mut MetarConfig) {
        if let Some(url) = self.api_url {
            config.base_url = url;
        }
        if let Some(prefix) = self.region_prefix {
            config.region_prefix = prefix;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if self.dump_json.is_some() {
            config.dump_dir = self.dump_json;
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    match cli.command {
        Commands::Audit {
            file,
            config,
            cache,
            concurrency,
            no_highlight,
            metar,
        } => {
            let mut app_config = load_config(config);
            if cache {
                app_config.audit.cache_per_airport = true;
            }
            if let Some(n) = concurrency {
                app_config.audit.concurrency = n;
            }
            metar.apply(&mut app_config.metar);
            cmd_audit(file, app_config, no_highlight, cli.verbose).await;
        }
        Commands::Classify {
            text,
            airport,
            config,
            metar,
        } => {
            let mut app_config = load_config(config);
            metar.apply(&mut app_config.metar);
            cmd_classify(text, airport, app_config.metar).await;
        }
        Commands::Triggers => {
            cmd_triggers();
        }
    }
}

fn load_config(path: Option<PathBuf>) -> AppConfig {
    match AppConfig::load(path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn metar_client(config: MetarConfig) -> MetarClient {
    match MetarClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create METAR client: {}", e);
            std::process::exit(1);
        }
    }
}

async fn cmd_audit(file: PathBuf, config: AppConfig, no_highlight: bool, verbose: bool) {
    info!("Auditing NOTAM export: {}", file.display());

    if !file.exists() {
        error!("File not found: {}", file.display());
        std::process::exit(1);
    }

    let workbook = match notam_sheet::normalize(&file) {
        Ok(path) => path,
        Err(e) => {
            error!("Failed to prepare workbook: {}", e);
            std::process::exit(1);
        }
    };

    let records = match notam_sheet::read_records(&workbook, &config.sheet) {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to read NOTAMs: {}", e);
            std::process::exit(1);
        }
    };

    let source = Arc::new(metar_client(config.metar));
    let auditor = match Auditor::with_config(config.audit, source) {
        Ok(auditor) => auditor,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!("Checking data...");
    let result = auditor.run(&records).await;
    let flagged = result.contradicted_positions();

    if !flagged.is_empty() && !no_highlight {
        info!("Highlighting rows...");
        if let Err(e) = notam_sheet::highlight_rows(&workbook, &flagged, &config.sheet) {
            error!("Failed to highlight {}: {}", workbook.display(), e);
            std::process::exit(1);
        }
    }

    if verbose && !flagged.is_empty() {
        println!("\nFlagged NOTAMs\n{}", "=".repeat(50));
        print!("{}", report::flagged_listing(&result, &records));
    }

    println!("{}", report::summary_line(&result));
}

async fn cmd_classify(text: String, airport: String, config: MetarConfig) {
    let client = metar_client(config);
    let engine = ClassificationEngine::new();

    let classification = engine.classify_with(&text, &client, &airport).await;

    println!("\nClassification\n{}", "=".repeat(50));
    println!("Advisory: {}", text);
    println!("Airport:  {}", airport);
    println!(
        "Category: {}",
        classification
            .category
            .map(|c| c.name().to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("Verdict:  {}", classification.verdict);
    println!("  {}", classification.explanation);
}

fn cmd_triggers() {
    println!("\nAdvisory Triggers (first match wins)\n{}", "=".repeat(50));

    for (order, rule) in RULES.iter().enumerate() {
        let triggers = rule
            .triggers
            .iter()
            .map(|t| format!("\"{}\"", t))
            .collect::<Vec<_>>()
            .join(" or ");
        println!("\n{}. {}: {}", order + 1, rule.category.name(), triggers);
        println!("   {}", rule.category.description());
    }

    println!("\nAny other advisory text is not applicable.");
}
