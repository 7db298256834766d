//! Hubwire CLI binary.
//!
//! Inspect and produce AMQP wire errors from the command line.
//!
//! # Commands
//!
//! - `encode` - Translate a fault kind and message into a wire error
//! - `decode` - Classify a wire error (or transport exception) as a fault
//! - `outcome` - Resolve a delivery outcome into a fault
//! - `conditions` - List the condition vocabulary

use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hubwire::{
    codec::tables, AmqpError, AmqpException, Condition, ErrorMapper, Fault, FaultKind,
    HubwireError, MapperConfig, Outcome, VERSION,
};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "hubwire")]
#[command(version = VERSION)]
#[command(about = "Hubwire - AMQP wire-error codec for IoT hub transports", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/hubwire/config.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a fault into a wire error (JSON)
    Encode {
        /// Fault kind (e.g. not-found, throttled, timeout)
        kind: String,

        /// Fault message
        message: String,

        /// Gateway id composed into the tracking id
        #[arg(short, long)]
        gateway: Option<String>,

        /// Existing tracking id to carry
        #[arg(long)]
        tracking_id: Option<String>,

        /// Diagnostic trace to include
        #[arg(long, conflicts_with = "capture_trace")]
        trace: Option<String>,

        /// Include the current backtrace as the diagnostic trace
        #[arg(long)]
        capture_trace: bool,

        /// Output as pretty-printed JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Classify a wire error (JSON) as a fault
    Decode {
        /// Wire error JSON (or - for stdin)
        input: Option<String>,

        /// Input file path
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Treat input as a transport exception
        #[arg(long)]
        exception: bool,
    },

    /// Resolve a delivery outcome (JSON) into a fault
    Outcome {
        /// Outcome JSON (or - for stdin)
        input: Option<String>,

        /// Input file path
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// List the condition vocabulary
    Conditions {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = load_config(cli.config)?;
    let mapper = ErrorMapper::with_config(config);

    match cli.command {
        Commands::Encode {
            kind,
            message,
            gateway,
            tracking_id,
            trace,
            capture_trace,
            pretty,
        } => {
            let trace = if capture_trace {
                TraceSource::Capture
            } else {
                trace.map_or(TraceSource::None, TraceSource::Given)
            };
            cmd_encode(&mapper, &kind, message, gateway, tracking_id, trace, pretty)
        }

        Commands::Decode {
            input,
            file,
            exception,
        } => cmd_decode(&mapper, input, file, exception),

        Commands::Outcome { input, file } => cmd_outcome(&mapper, input, file),

        Commands::Conditions { json } => cmd_conditions(json),
    }
}

/// Where `encode` takes its diagnostic trace from
enum TraceSource {
    None,
    Given(String),
    Capture,
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<MapperConfig> {
    let file_config = match path {
        Some(path) => MapperConfig::from_file(path)?,
        None => match MapperConfig::default_path().filter(|p| p.exists()) {
            Some(path) => MapperConfig::from_file(path)?,
            None => MapperConfig::default(),
        },
    };
    Ok(file_config.merge(MapperConfig::from_env()))
}

fn cmd_encode(
    mapper: &ErrorMapper,
    kind: &str,
    message: String,
    gateway: Option<String>,
    tracking_id: Option<String>,
    trace: TraceSource,
    pretty: bool,
) -> anyhow::Result<()> {
    let kind: FaultKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let mut fault = Fault::new(kind, message);
    fault = match trace {
        TraceSource::None => fault,
        TraceSource::Given(trace) => fault.with_trace(trace),
        TraceSource::Capture => fault.with_captured_trace(),
    };
    if let Some(id) = tracking_id {
        fault = fault.with_tracking_id(id);
    }

    let gateway = gateway.or_else(|| mapper.config().gateway_id.clone());
    let include_trace = fault.trace().is_some();
    let error = mapper.to_amqp_error(Some(&fault), gateway.as_deref(), include_trace)?;

    let output = if pretty {
        serde_json::to_string_pretty(&error)?
    } else {
        error.to_json()?
    };
    println!("{output}");
    Ok(())
}

fn cmd_decode(
    mapper: &ErrorMapper,
    input: Option<String>,
    file: Option<PathBuf>,
    exception: bool,
) -> anyhow::Result<()> {
    let content = read_input(input, file)?;

    let fault = if exception {
        let exception: AmqpException = serde_json::from_str(&content)
            .map_err(|e| HubwireError::Wire(e.to_string()))?;
        mapper.from_amqp_exception(Some(&exception))
    } else {
        let error = AmqpError::from_json(&content)
            .map_err(|e| HubwireError::Wire(e.to_string()))?;
        mapper.from_amqp_error(Some(&error))
    };

    println!("{}", serde_json::to_string_pretty(&fault_json(&fault))?);
    Ok(())
}

fn cmd_outcome(
    mapper: &ErrorMapper,
    input: Option<String>,
    file: Option<PathBuf>,
) -> anyhow::Result<()> {
    let content = read_input(input, file)?;
    let outcome = Outcome::from_json(&content)
        .map_err(|e| HubwireError::Wire(e.to_string()))?;

    let fault = mapper.from_outcome(Some(&outcome));
    println!("{}", serde_json::to_string_pretty(&fault_json(&fault))?);
    Ok(())
}

fn cmd_conditions(json_output: bool) -> anyhow::Result<()> {
    if json_output {
        let output = json!({
            "generic": Condition::GENERIC,
            "vendor": Condition::VENDOR,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{:<45} {:<22} {}", "CONDITION", "EXCEPTION", "RECORD");
    println!("{}", "-".repeat(90));
    for condition in Condition::all() {
        let exception = tables::exception_kind(condition).map_or("-", |k| k.as_str());
        let record = tables::error_kind(condition).map_or("-", |k| k.as_str());
        println!("{:<45} {:<22} {}", condition.as_str(), exception, record);
    }
    Ok(())
}

fn fault_json(fault: &Fault) -> Value {
    json!({
        "kind": fault.kind(),
        "message": fault.message(),
        "tracking_id": fault.tracking_id(),
        "transient": fault.is_transient(),
        "canceled": fault.is_canceled(),
        "condition": fault.wire_error().map(|e| e.condition.as_str()),
    })
}

fn read_input(input: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    if let Some(path) = file {
        Ok(std::fs::read_to_string(path)?)
    } else if let Some(s) = input {
        if s == "-" {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        } else {
            Ok(s)
        }
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}
