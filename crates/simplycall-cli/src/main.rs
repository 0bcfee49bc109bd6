//! # simplycall CLI Entry Point
//!
//! Makes a single call against a simplycall HTTP endpoint.
//!
//! ## Usage
//!
//! ```bash
//! # Call a route with no arguments
//! simplycall call http://127.0.0.1:8080 "math zero"
//!
//! # JSON arguments, one per position
//! simplycall call http://127.0.0.1:8080 "math add" 1 2
//!
//! # Send a file as a binary argument
//! simplycall call http://127.0.0.1:8080 "files hash" @photo.jpg
//! ```
//!
//! Logs go to stderr (`RUST_LOG` overrides the default `warn` level) so the
//! result on stdout can be piped.

use anyhow::Result;
use argh::FromArgs;
use simplycall_client::{Client, HttpClientConfig, HttpTransport};
use simplycall_cli::{parse_arg, validate_http_url, write_value};

/// simplycall - typed RPC over HTTP
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Commands {
    Call(CallArgs),
}

/// call a route on a simplycall server
#[derive(FromArgs)]
#[argh(subcommand, name = "call")]
struct CallArgs {
    /// address of the server to call
    ///
    /// Must include the http:// prefix (e.g., http://127.0.0.1:8080).
    #[argh(positional)]
    server_address: String,

    /// route identifier, "<scope> <route>"
    #[argh(positional)]
    id: String,

    /// call arguments: JSON text, or @path for a binary file
    #[argh(positional)]
    args: Vec<String>,

    /// optional request timeout in milliseconds
    #[argh(option, long = "timeout-ms")]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Call(args) => run_call(args).await,
    }
}

/// Executes the `call` subcommand.
///
/// # Output Format
///
/// JSON results are printed compactly, binary results raw. Failures are
/// reported on stderr with a non-zero exit code.
///
/// # Errors
///
/// Returns an error if:
/// - The server address is not an http:// URL
/// - An argument is neither JSON nor a readable `@path`
/// - The call fails, locally or on the server
async fn run_call(args: CallArgs) -> Result<()> {
    validate_http_url(&args.server_address, "server address")?;

    let call_args = args
        .args
        .iter()
        .map(|raw| parse_arg(raw))
        .collect::<Result<Vec<_>>>()?;

    let mut config = HttpClientConfig::new(&args.server_address);
    if let Some(timeout_ms) = args.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }

    tracing::debug!("Calling [{}] at {} with {} arguments", args.id, args.server_address, call_args.len());

    let client: Client<()> = Client::new(HttpTransport::new(config)?);
    let value = client.call((), args.id.as_str(), call_args).await?;

    write_value(&value, &mut std::io::stdout().lock())
}
