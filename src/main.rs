//! negotiate-http - issue one content-negotiated HTTP request from the shell

#![allow(clippy::print_stdout, clippy::print_stderr)] // Printing the response is the binary's job

mod cli;

use anyhow::Context;
use cli::Cli;
use console::style;
use negotiate_http::{
    ClientConfig, ClientError, NegotiatedResponse, NegotiatingClient, ResponseBody,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    std::process::exit(exit_code);
}

/// Main application entry point
async fn run() -> i32 {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    match execute(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{} {err:#}", style("Error:").red().bold());
            err.downcast_ref::<ClientError>()
                .map_or(1, ClientError::exit_code)
        }
    }
}

/// Install the fmt subscriber; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "negotiate_http=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve the configuration: explicit file, default file if present, then overrides
fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let config = match &cli.config {
        Some(path) => ClientConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => match ClientConfig::load() {
            Ok(config) => config,
            Err(ClientError::NoConfig) => ClientConfig::default(),
            Err(err) => return Err(err.into()),
        },
    };

    let config = config.with_env_overrides();
    Ok(match &cli.base_url {
        Some(base_url) => config.with_base_url(base_url.clone()),
        None => config,
    })
}

/// Execute the requested exchange
async fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let options = cli.request_options()?;
    let method = cli.method;
    let path = cli.path.clone();

    let response = NegotiatingClient::scoped(config, |client| {
        Box::pin(async move { client.request(method, &path, options).await })
    })
    .await?;

    print_response(&response);
    Ok(())
}

fn print_response(response: &NegotiatedResponse) {
    let status = if response.is_success() {
        style(response.status).green().bold()
    } else {
        style(response.status).red().bold()
    };
    println!("{} {status}", style("Status:").cyan());

    println!("{}", style("Headers:").cyan());
    for (name, value) in &response.headers {
        println!("  {name}: {}", value.to_str().unwrap_or("<binary>"));
    }

    println!("{}", style("Content:").cyan());
    match &response.body {
        ResponseBody::Json(value) => match serde_json::to_string_pretty(value) {
            Ok(pretty) => println!("{pretty}"),
            Err(_) => println!("{value}"),
        },
        ResponseBody::Text(text) => println!("{text}"),
        ResponseBody::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => println!("{text}"),
            Err(_) => println!("<{} bytes of binary content>", bytes.len()),
        },
    }
}
