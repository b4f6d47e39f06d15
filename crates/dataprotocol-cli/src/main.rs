//! Data protocol CLI
//!
//! Connects to a running data protocol server over a Unix socket or TCP,
//! performs the handshake and runs one command against the registered
//! providers. Results are printed as pretty JSON on stdout; logs go to
//! stderr.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use dataprotocol_client::{
    CapabilitiesProvider, ClientConfig, ConnectionProvider, DataProtocolClient, FromProvider,
    MetadataProvider, ProviderRegistry, QueryProvider, TaskServicesProvider,
};
use dataprotocol_rpc::{MessageChannel, RpcChannel};
use dataprotocol_types::{
    ConnectionCompleteParams, ConnectionInfo, DataProtocolClientCapabilities, Options,
};
use directories::ProjectDirs;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const CONFIG_FILENAME: &str = "config.json";

#[derive(Parser)]
#[command(name = "dataprotocol")]
#[command(about = "Talk to a data protocol server from the command line")]
#[command(version)]
#[command(after_help = "\
Examples:
  dataprotocol --tcp 127.0.0.1:4444 capabilities
  dataprotocol --socket /tmp/sqltools.sock -o server=localhost -o user=sa databases
  dataprotocol --tcp 127.0.0.1:4444 -o server=localhost query 'select @@version'
")]
struct Cli {
    /// Unix socket the server listens on
    #[arg(long, value_name = "PATH", global = true, conflicts_with = "tcp")]
    socket: Option<PathBuf>,

    /// TCP address the server listens on
    #[arg(long, value_name = "ADDR", global = true)]
    tcp: Option<String>,

    /// Config file (defaults to the user config directory)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Also write logs to a timestamped file next to this path
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    /// Connection option, repeatable
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE", value_parser = parse_option, global = true)]
    options: Vec<(String, Value)>,

    /// Owner URI used for the connection
    #[arg(long, default_value = "dataprotocol://cli", global = true)]
    owner_uri: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handshake and print the provider's capabilities
    Capabilities,

    /// Connect and list databases
    Databases,

    /// Connect and run a query, printing the rows
    Query {
        /// SQL text to execute
        sql: String,
    },

    /// Connect and list schema objects
    Metadata,

    /// List background tasks
    Tasks {
        /// Only tasks that are still running
        #[arg(long)]
        active: bool,
    },
}

/// `key=value`, where the value is parsed as JSON when it is valid JSON
/// (`port=1433`, `encrypt=true`) and kept as a string otherwise.
fn parse_option(raw: &str) -> std::result::Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty option name in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn setup_logging(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dataprotocol={default_level}")));

    fn stderr_layer<S>() -> fmt::Layer<S, fmt::format::DefaultFields, fmt::format::Format, fn() -> std::io::Stderr> {
        fmt::layer().with_writer(std::io::stderr as fn() -> std::io::Stderr).with_target(true)
    }

    let Some(log_file) = log_file else {
        tracing_subscriber::registry()
            .with(stderr_layer())
            .with(filter)
            .init();
        return Ok(None);
    };

    let dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let stem = log_file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataprotocol");
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let filename = format!("{stem}-{timestamp}.log");

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let file_appender = tracing_appender::rolling::never(dir, &filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer())
        .with(filter)
        .init();

    eprintln!("Logging to: {} (and stderr)", dir.join(&filename).display());
    Ok(Some(guard))
}

fn config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        ProjectDirs::from("", "", "dataprotocol").map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    })
}

fn load_config(explicit: Option<PathBuf>) -> Result<ClientConfig> {
    match config_path(explicit) {
        Some(path) => {
            debug!(path = %path.display(), "Loading config");
            ClientConfig::load(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => Ok(ClientConfig::default()),
    }
}

async fn open_channel(cli: &Cli, config: &ClientConfig) -> Result<Arc<dyn MessageChannel>> {
    let channel_config = config.channel_config();
    if let Some(path) = &cli.socket {
        #[cfg(unix)]
        {
            let channel = RpcChannel::connect_unix(path, channel_config)
                .await
                .with_context(|| format!("Failed to connect to {}", path.display()))?;
            return Ok(Arc::new(channel));
        }
        #[cfg(not(unix))]
        bail!("--socket is only supported on Unix, got {}", path.display());
    }
    if let Some(addr) = &cli.tcp {
        let channel = RpcChannel::connect_tcp(addr.as_str(), channel_config)
            .await
            .with_context(|| format!("Failed to connect to {addr}"))?;
        return Ok(Arc::new(channel));
    }
    bail!("either --socket or --tcp is required")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn registered<T: FromProvider>(registry: &ProviderRegistry, what: &str) -> Result<T> {
    registry
        .get::<T>()
        .ok_or_else(|| anyhow!("server did not enable the {what} provider"))
}

fn connection_info(options: &[(String, Value)]) -> ConnectionInfo {
    let mut map = Options::new();
    for (key, value) in options {
        map.insert(key.clone(), value.clone());
    }
    ConnectionInfo { options: map }
}

/// Send `connection/connect` and wait for the matching `connection/complete`.
/// The request only says the server accepted the attempt.
async fn connect(
    connection: &ConnectionProvider,
    owner_uri: &str,
    info: &ConnectionInfo,
    timeout: Duration,
) -> Result<ConnectionCompleteParams> {
    let (tx, rx) = oneshot::channel();
    let tx = Mutex::new(Some(tx));
    let uri = owner_uri.to_string();
    connection.on_connection_complete(move |params: ConnectionCompleteParams| {
        if params.owner_uri != uri {
            return;
        }
        if let Some(tx) = tx.lock().unwrap_or_else(PoisonError::into_inner).take() {
            let _ = tx.send(params);
        }
    });

    if !connection.connect(owner_uri, info).await {
        bail!("server refused to connect {owner_uri}");
    }

    let complete = tokio::time::timeout(timeout, rx)
        .await
        .with_context(|| format!("Timed out waiting for {owner_uri} to connect"))?
        .context("Channel closed before the connection completed")?;
    if let Some(message) = complete.error_message.as_deref().filter(|m| !m.is_empty()) {
        bail!("Connection to {owner_uri} failed: {message}");
    }

    info!(
        owner_uri,
        connection_id = complete.connection_id.as_deref().unwrap_or_default(),
        "Connected"
    );
    Ok(complete)
}

async fn connect_from_cli(
    client: &DataProtocolClient,
    registry: &ProviderRegistry,
    cli: &Cli,
) -> Result<()> {
    if cli.options.is_empty() {
        bail!("no connection options given, pass them with -o KEY=VALUE");
    }
    let connection: ConnectionProvider = registered(registry, "connection")?;
    connect(
        &connection,
        &cli.owner_uri,
        &connection_info(&cli.options),
        client.config().request_timeout(),
    )
    .await?;
    Ok(())
}

async fn run(cli: &Cli, client: &DataProtocolClient, registry: &ProviderRegistry) -> Result<()> {
    match &cli.command {
        Commands::Capabilities => {
            let capabilities: CapabilitiesProvider = registered(registry, "capabilities")?;
            let config = client.config();
            let request = DataProtocolClientCapabilities {
                host_name: config.host_name.clone(),
                host_version: config.host_version.clone(),
            };
            let caps = capabilities
                .get_server_capabilities(&request)
                .await
                .context("capabilities/list failed")?;
            print_json(&caps)
        }
        Commands::Databases => {
            connect_from_cli(client, registry, cli).await?;
            let connection: ConnectionProvider = registered(registry, "connection")?;
            let result = connection.list_databases(&cli.owner_uri).await;
            print_json(&result.database_names)
        }
        Commands::Query { sql } => {
            connect_from_cli(client, registry, cli).await?;
            let query: QueryProvider = registered(registry, "query")?;
            let result = query
                .run_query_and_return(&cli.owner_uri, sql)
                .await
                .context("query failed")?;
            print_json(&result)
        }
        Commands::Metadata => {
            connect_from_cli(client, registry, cli).await?;
            let metadata: MetadataProvider = registered(registry, "metadata")?;
            let result = metadata
                .get_metadata(&cli.owner_uri)
                .await
                .context("metadata/list failed")?;
            print_json(&result.object_metadata)
        }
        Commands::Tasks { active } => {
            let tasks: TaskServicesProvider = registered(registry, "task services")?;
            print_json(&tasks.get_all_tasks(*active).await)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = setup_logging(cli.log_file.as_deref())?;

    let config = load_config(cli.config.clone())?;
    let channel = open_channel(&cli, &config).await?;

    let registry = ProviderRegistry::new();
    let client = DataProtocolClient::new(channel, Arc::new(registry.clone()), config);
    client.start().await.context("Handshake with server failed")?;

    let outcome = run(&cli, &client, &registry).await;
    client.dispose().await;
    outcome
}
