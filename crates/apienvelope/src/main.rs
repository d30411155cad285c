use apienvelope_core::{ApiConfig, Fragment, ResponseKind, Value};
use apienvelope_server::state::register_standard_operations;
use apienvelope_server::{
    ApiServer, AppState, Config as ServerConfig, OperationArgs, ResponseBuilder, StatusCode,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "apienvelope", about = "Enveloped JSON responses")]
struct Cli {
    /// Path to a YAML envelope configuration file
    #[arg(long, global = true, env = "APIENVELOPE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demo API server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: String,
    },
    /// Print the response a builder would produce
    Render {
        /// Response kind (ok, not_found, validation, forbidden, error)
        #[arg(long, conflicts_with_all = ["status", "operation"])]
        kind: Option<ResponseKind>,
        /// Arbitrary HTTP status
        #[arg(long, conflicts_with = "operation")]
        status: Option<u16>,
        /// Named operation (created, accepted, unauthorized)
        #[arg(long)]
        operation: Option<String>,
        /// Message; omit to use the configured default
        #[arg(long)]
        message: Option<String>,
        /// Payload as JSON
        #[arg(long)]
        data: Option<String>,
        /// Extra field as key=value, value parsed as JSON when possible
        #[arg(long = "extra", value_parser = parse_extra)]
        extras: Vec<(String, Value)>,
    },
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { bind } => run_serve(&config, &bind).await,
        Commands::Render {
            kind,
            status,
            operation,
            message,
            data,
            extras,
        } => run_render(
            &config,
            RenderRequest {
                kind,
                status,
                operation,
                message,
                data,
                extras,
            },
        ),
    }
}

fn load_config(path: Option<&Path>) -> miette::Result<ApiConfig> {
    let config = match path {
        Some(path) => ApiConfig::load(path)?,
        None => ApiConfig::from_env()?,
    };
    Ok(config)
}

/// Run the demo API server
async fn run_serve(config: &ApiConfig, bind: &str) -> miette::Result<()> {
    info!("Starting apienvelope demo server");

    let server_config = ServerConfig {
        listen_addr: bind
            .parse()
            .map_err(|e| miette::miette!("Invalid bind address '{}': {}", bind, e))?,
    };

    let server = ApiServer::new(server_config, AppState::new(config));
    server
        .run()
        .await
        .map_err(|e| miette::miette!("API server error: {}", e))?;

    Ok(())
}

struct RenderRequest {
    kind: Option<ResponseKind>,
    status: Option<u16>,
    operation: Option<String>,
    message: Option<String>,
    data: Option<String>,
    extras: Vec<(String, Value)>,
}

/// Print the HTTP status and envelope for a single response
fn run_render(config: &ApiConfig, request: RenderRequest) -> miette::Result<()> {
    let mut responses = ResponseBuilder::new(config);
    register_standard_operations(&mut responses);

    let data = request
        .data
        .as_deref()
        .map(serde_json::from_str::<Value>)
        .transpose()
        .map_err(|e| miette::miette!("Invalid --data JSON: {}", e))?;

    let extras: Vec<Fragment> = request
        .extras
        .into_iter()
        .map(|(key, value)| {
            let mut fragment = Fragment::new();
            fragment.insert(key, value);
            fragment
        })
        .collect();

    let message = request.message.as_deref();

    let response = match (request.operation, request.status) {
        (Some(name), _) => {
            let args = OperationArgs {
                message: request.message.clone(),
                data,
                extras,
            };
            responses.call(&name, args)?
        }
        (None, Some(status)) => {
            let status = StatusCode::from_u16(status)
                .map_err(|e| miette::miette!("Invalid --status {}: {}", status, e))?;
            responses.respond(
                status,
                message,
                data.unwrap_or_else(apienvelope_core::empty_payload),
                extras,
            )
        }
        (None, None) => responses.for_kind(
            request.kind.unwrap_or(ResponseKind::Success),
            message,
            data,
            extras,
        ),
    };

    let body = serde_json::to_string_pretty(response.body())
        .map_err(|e| miette::miette!("Failed to render envelope: {}", e))?;

    println!("HTTP {}", response.status());
    println!("{}", body);

    Ok(())
}

/// Parse `key=value`, keeping the value as a plain string if it is not JSON
fn parse_extra(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;

    if key.is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}
