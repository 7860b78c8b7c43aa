//! Switchyard host (v1)
//!
//! Wires an application from a TOML file and drives single requests
//! through it from the command line.
//!
//! # Architecture Overview
//!
//! ```text
//!   switchyard.toml ──▶ config::load_config ──▶ host::build_app ──▶ App
//!                                                                  │
//!   METHOD PATH [-H] [--body] ──▶ Request ──▶ App::process_request ┘
//!                                                  │
//!                             Ok(Response) ◀───────┴───────▶ Err(DispatchError)
//!                             stdout, exit 0                 stderr, exit 1
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;

use switchyard::config::load_config;
use switchyard::host::build_app;
use switchyard::observability::logging::init_logging;
use switchyard::{Request, RequestOptions};

#[derive(Parser)]
#[command(name = "switchyard")]
#[command(about = "Dispatch requests through a configured route table", long_about = None)]
struct Cli {
    /// Wiring file.
    #[arg(short, long, global = true, default_value = "switchyard.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the wiring file and list the wired routes
    Check,
    /// Dispatch one request and print the outcome
    Dispatch {
        method: String,
        path: String,
        /// Request header as `name: value`; may repeat
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    init_logging(&config.observability)?;

    tracing::info!(config = %cli.config.display(), "switchyard v0.1.0 starting");
    let app = build_app(&config)?;

    match cli.command {
        Commands::Check => {
            println!("regular routes:");
            for route in app.routes() {
                println!("  {route}");
            }
            println!("error routes:");
            for route in app.error_routes() {
                println!("  {route}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Dispatch {
            method,
            path,
            headers,
            body,
        } => {
            let mut options = RequestOptions {
                method,
                path,
                ..RequestOptions::default()
            };
            for raw in &headers {
                let Some((name, value)) = raw.split_once(':') else {
                    return Err(format!("header {raw:?} is not `name: value`").into());
                };
                options.headers.push((name.trim().to_string(), value.trim().to_string()));
            }
            if let Some(raw) = body {
                options.body = Some(serde_json::from_str::<Value>(&raw)?);
            }

            let request = Request::from(options).with_redaction(config.redaction.clone());
            tracing::debug!(request = %request, "Dispatching");

            match app.process_request(request).await {
                Ok(mut response) => {
                    response.set_redaction(Some(config.redaction.clone()));
                    println!("{response:#}");
                    Ok(ExitCode::SUCCESS)
                }
                Err(error) => {
                    eprintln!("Error: {error}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
