//! mealserver: MCP server for TheMealDB recipes
//!
//! Usage:
//!   mealserver                      # serve over STDIO
//!   mealserver serve --transport http --port 8080
//!   mealserver call get_meal_by_multiple_ingredients --args '{"ingredients":["chicken","rice"]}'

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use mealserver_core::{CatalogResources, MealDbClient, ToolExecutor, meal_tool_registry};
use mealserver_mcp::{McpAdapter, McpServer};

use crate::config::{Config, Transport};

#[derive(Parser)]
#[command(name = "mealserver", version, about = "MCP server exposing TheMealDB recipes")]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level or filter directive, e.g. "debug"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server
    Serve {
        #[arg(long, value_enum)]
        transport: Option<Transport>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// List available tools
    Tools,
    /// Run a single tool and print its output
    Call {
        /// Tool name
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env()?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    let command = cli.command.unwrap_or(Commands::Serve {
        transport: None,
        host: None,
        port: None,
    });
    if let Commands::Serve {
        transport,
        host,
        port,
    } = &command
    {
        if let Some(transport) = transport {
            config.server.transport = *transport;
        }
        if let Some(host) = host {
            config.server.host = host.clone();
        }
        if let Some(port) = port {
            config.server.port = *port;
        }
    }

    init_logging(&config.logging.level);
    config.validate()?;

    match command {
        Commands::Serve { .. } => serve(&config).await,
        Commands::Tools => {
            let registry = meal_tool_registry(Arc::new(MealDbClient::new(&config.mealdb)?), 1);
            for tool in registry.list_tools() {
                println!("{:<36} {}", tool.name, tool.description);
            }
            Ok(())
        }
        Commands::Call { tool, args } => {
            let input: serde_json::Value =
                serde_json::from_str(&args).context("--args must be valid JSON")?;
            let client = Arc::new(MealDbClient::new(&config.mealdb)?);
            let registry = meal_tool_registry(client, config.mealdb.detail_concurrency);
            let output = registry.execute(&tool, input).await?;
            println!("{}", output);
            Ok(())
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

/// Install the stderr subscriber; `RUST_LOG` wins over the configured level
fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn serve(config: &Config) -> Result<()> {
    info!("mealserver v{} starting", env!("CARGO_PKG_VERSION"));
    info!("MealDB base URL: {}", config.mealdb.base_url());

    let client = Arc::new(MealDbClient::new(&config.mealdb)?);
    let tools = Arc::new(meal_tool_registry(
        client.clone(),
        config.mealdb.detail_concurrency,
    ));
    let resources = Arc::new(CatalogResources::new(client));
    let server = McpServer::new(McpAdapter::new(tools, resources));

    match config.server.transport {
        Transport::Stdio => server.serve_stdio().await,
        Transport::Http => {
            let addr = config.server.resolve_addr().await?;
            mealserver_mcp::http::serve_http(Arc::new(server), addr).await
        }
    }
}
