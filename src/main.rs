use anyhow::Result;
use clap::{Parser, ValueEnum};
use ovhusage::config::Config;
use ovhusage::ovh::auth::OvhCredentials;
use ovhusage::ovh::client::OvhClient;
use ovhusage::ovh::http::format_ovh_error;
use ovhusage::usage::{
    fetch_current, fetch_forecast, fetch_history, fetch_history_detail, fetch_plans, plans_table,
    usage_table, TableDef, UsageKind,
};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Query OVH Public Cloud usage as flat rows
#[derive(Parser, Debug)]
#[command(name = "ovhusage", version, about, long_about = None)]
struct Args {
    /// Usage table to query
    #[arg(value_enum)]
    table: TableArg,

    /// Public Cloud project ID
    #[arg(short, long)]
    project: Option<String>,

    /// OVH endpoint alias (ovh-eu, ovh-ca, ovh-us) or API root URL
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Fetch a single history period instead of listing all of them
    #[arg(long)]
    usage_id: Option<String>,

    /// Comma-separated columns to output (default: all)
    #[arg(short, long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    output: OutputFormat,

    /// Maximum concurrent history detail fetches
    #[arg(long)]
    concurrency: Option<usize>,

    /// Print the table's columns and exit
    #[arg(long)]
    list_columns: bool,

    /// Remember --project as the default project
    #[arg(long)]
    save_project: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TableArg {
    Current,
    Forecast,
    History,
    Plans,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| anyhow::anyhow!("Failed to open log file {:?}: {}", log_path, e))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("ovhusage started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("ovhusage").join("ovhusage.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".ovhusage").join("ovhusage.log");
    }
    PathBuf::from("ovhusage.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    if args.list_columns {
        match args.table {
            TableArg::Current => print_columns(usage_table(UsageKind::Current)),
            TableArg::Forecast => print_columns(usage_table(UsageKind::Forecast)),
            TableArg::History => print_columns(usage_table(UsageKind::History)),
            TableArg::Plans => print_columns(plans_table()),
        }
        return Ok(());
    }

    let mut config = Config::load();
    let Some(project) = config.effective_project(args.project.as_deref()) else {
        return Err(anyhow::anyhow!(
            "No OVH project configured. Set {} or use --project",
            ovhusage::config::PROJECT_ENV
        ));
    };
    if args.save_project {
        config.set_project(&project)?;
    }

    let endpoint = config.effective_endpoint(args.endpoint.as_deref());
    let client = OvhClient::new(&endpoint, OvhCredentials::from_env())?;

    tracing::info!("Querying {:?} for project {}", args.table, project);

    let rows = match run_query(&args, &config, &client, &project).await {
        Ok(rows) => rows,
        Err(err) => {
            tracing::error!("Query failed: {:#}", err);
            return Err(anyhow::anyhow!(format_ovh_error(&err)));
        }
    };

    tracing::info!("Produced {} rows", rows.len());
    print_rows(&rows, args.output)
}

async fn run_query(
    args: &Args,
    config: &Config,
    client: &OvhClient,
    project: &str,
) -> Result<Vec<Map<String, Value>>> {
    match args.table {
        TableArg::Current => {
            let doc = fetch_current(client, project).await?;
            Ok(vec![usage_table(UsageKind::Current).project(&doc, &args.columns)?])
        }
        TableArg::Forecast => {
            let doc = fetch_forecast(client, project).await?;
            Ok(vec![usage_table(UsageKind::Forecast).project(&doc, &args.columns)?])
        }
        TableArg::Plans => {
            let doc = fetch_plans(client, project).await?;
            Ok(vec![plans_table().project(&doc, &args.columns)?])
        }
        TableArg::History => {
            let table = usage_table(UsageKind::History);

            if let Some(usage_id) = &args.usage_id {
                let doc = fetch_history_detail(client, project, usage_id).await?;
                return Ok(vec![table.project(&doc, &args.columns)?]);
            }

            let concurrency = config.effective_concurrency(args.concurrency);
            let mut rows = Vec::new();
            for entry in fetch_history(client, project, concurrency).await? {
                match entry.detail {
                    Ok(doc) => rows.push(table.project(&doc, &args.columns)?),
                    Err(err) => eprintln!(
                        "Skipping usage history {}: {}",
                        entry.usage_id,
                        format_ovh_error(&err)
                    ),
                }
            }
            Ok(rows)
        }
    }
}

fn print_columns<T>(table: &TableDef<T>) {
    println!("{} - {}", table.name, table.description);
    for column in &table.columns {
        println!(
            "  {:<40} {:<10} {}",
            column.name,
            column.column_type.as_str(),
            column.description
        );
    }
}

fn print_rows(rows: &[Map<String, Value>], format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(rows)?,
        OutputFormat::Yaml => serde_yaml::to_string(rows)?,
    };
    println!("{}", rendered);
    Ok(())
}
