// # terraform-provider-ns1
//
// This binary is a THIN host for the NS1 provider:
// - all resource logic lives in ns1-provider
// - all lifecycle and diff rules live in ns1-core
//
// It is responsible for:
// 1. Reading provider configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Reading one attribute bag from stdin
// 4. Dispatching one operation and writing the result to stdout
//
// ## Configuration
//
// - `NS1_APIKEY`: API key (required, except for `types`)
// - `NS1_ENDPOINT`: API endpoint (default `https://api.nsone.net/v1/`)
// - `NS1_IGNORE_SSL`: skip TLS certificate verification
// - `NS1_DEBUG`: log request and response bodies (forces debug logging)
// - `NS1_LOG_LEVEL`: log level, logs go to stderr
//
// ## Example
//
// ```bash
// export NS1_APIKEY=your_key
//
// echo '{"config": {"zone": "example.io"}}' | terraform-provider-ns1 create ns1_zone
// echo '{}' | terraform-provider-ns1 import ns1_record --id example.io/www.example.io/A
// ```

mod cli;

use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use ns1_core::{Error, Operation, Provider, ProviderConfig, ResourceData, ResourceRegistry};
use serde_json::Value;
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Command};

/// Exit codes
///
/// - 0: Operation succeeded
/// - 1: Configuration error, nothing was sent to the API
/// - 2: The operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ns1ExitCode {
    Success = 0,
    ConfigError = 1,
    OperationError = 2,
}

impl From<Ns1ExitCode> for ExitCode {
    fn from(code: Ns1ExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl Ns1ExitCode {
    /// Classify an operation failure
    fn for_error(err: &Error) -> Self {
        match err {
            Error::Config(_) => Ns1ExitCode::ConfigError,
            _ => Ns1ExitCode::OperationError,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Listing types makes no API call, so it needs no credentials
    if matches!(cli.command, Command::Types) {
        let output = list_types(&ns1_provider::type_registry());
        if let Err(e) = write_output(io::stdout(), &output, cli.pretty) {
            eprintln!("{:#}", e);
            return Ns1ExitCode::OperationError.into();
        }
        return Ns1ExitCode::Success.into();
    }

    let config = match ProviderConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Ns1ExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(&cli.log_level, config.enable_debug))
        .with_writer(io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return Ns1ExitCode::ConfigError.into();
    }

    debug!("Loaded {:?}", config);

    let provider = match ns1_provider::new_provider(&config) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to build provider: {}", e);
            return Ns1ExitCode::ConfigError.into();
        }
    };

    let data = match read_bag(io::stdin()) {
        Ok(data) => data,
        Err(e) => {
            error!("{:#}", e);
            return Ns1ExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return Ns1ExitCode::OperationError.into();
        }
    };

    let output = match rt.block_on(execute(&provider, cli.command, data)) {
        Ok(output) => output,
        Err(e) => {
            error!("{}", e);
            return Ns1ExitCode::for_error(&e).into();
        }
    };

    if let Err(e) = write_output(io::stdout(), &output, cli.pretty) {
        error!("{:#}", e);
        return Ns1ExitCode::OperationError.into();
    }

    Ns1ExitCode::Success.into()
}

/// Log level from its name, forced to debug when body logging is enabled
fn log_level(name: &str, enable_debug: bool) -> Level {
    let level = match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    if enable_debug && level < Level::DEBUG {
        Level::DEBUG
    } else {
        level
    }
}

/// Read the input attribute bag; empty input is an empty bag
fn read_bag(mut input: impl Read) -> Result<ResourceData> {
    let mut raw = String::new();
    input
        .read_to_string(&mut raw)
        .context("reading attribute bag from stdin")?;

    if raw.trim().is_empty() {
        return Ok(ResourceData::new());
    }
    serde_json::from_str(&raw).context("parsing attribute bag")
}

fn write_output(mut out: impl Write, value: &Value, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Registered type names, as printed by `types`
fn list_types(registry: &ResourceRegistry) -> Value {
    serde_json::json!({
        "resources": registry.list_resources(),
        "data_sources": registry.list_data_sources(),
    })
}

/// Dispatch one command and return what it prints
async fn execute(
    provider: &Provider,
    command: Command,
    mut data: ResourceData,
) -> ns1_core::Result<Value> {
    let (type_name, operation, id) = match command {
        Command::Create(args) => (args.type_name, Operation::Create, args.id),
        Command::Read(args) => (args.type_name, Operation::Read, args.id),
        Command::Update(args) => (args.type_name, Operation::Update, args.id),
        Command::Delete(args) => (args.type_name, Operation::Delete, args.id),
        Command::Import(args) => {
            provider.import(&args.type_name, &args.id, &mut data).await?;
            return Ok(serde_json::to_value(&data)?);
        }
        Command::Plan(args) => {
            if let Some(id) = args.id {
                data.set_id(id);
            }
            let diffs = provider.plan(&args.type_name, &data)?;
            return Ok(serde_json::to_value(diffs)?);
        }
        Command::Data(args) => {
            provider.read_data_source(&args.type_name, &mut data).await?;
            return Ok(serde_json::to_value(&data)?);
        }
        Command::Types => return Ok(list_types(provider.registry())),
    };

    if let Some(id) = id {
        data.set_id(id);
    }
    provider.apply(&type_name, operation, &mut data).await?;
    Ok(serde_json::to_value(&data)?)
}
