mod codegen;
mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kaname_core::AppConfig;
use tracing_subscriber::EnvFilter;

use crate::commands::config_types::ConfigTypesCommand;
use crate::commands::list::ListCommand;
use crate::commands::migrate::MigrateCommand;
use crate::commands::serve::ServeCommand;
use crate::commands::tinker::TinkerCommand;
use crate::commands::{CommandRegistry, Context};

#[derive(Parser)]
#[command(name = "kaname")]
#[command(about = "Users CRUD backend and console", long_about = None)]
struct Cli {
    /// Configuration directory (one TOML file per section)
    #[arg(short, long, global = true, env = "KANAME_CONFIG_DIR")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        #[arg(short = 'H', long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Interactive shell with the application container loaded
    Tinker,
    /// Apply database migrations and exit
    Migrate,
    /// Generate Rust types from the configuration directory
    #[command(name = "config:types")]
    ConfigTypes {
        /// Directory to read instead of the configuration directory
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Output file
        #[arg(short, long, default_value = codegen::DEFAULT_OUTPUT)]
        out: PathBuf,
    },
    /// List available commands
    List,
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Serve { .. } => "serve",
            Self::Tinker => "tinker",
            Self::Migrate => "migrate",
            Self::ConfigTypes { .. } => "config:types",
            Self::List => "list",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = Context::new(cli.config.unwrap_or_else(AppConfig::default_dir));
    let name = cli.command.name();

    let mut serve = ServeCommand::new(ctx.clone());
    let mut config_types = ConfigTypesCommand::new(ctx.config_dir.clone(), codegen::DEFAULT_OUTPUT.into());
    match cli.command {
        Commands::Serve { host, port } => {
            serve.host = host;
            serve.port = port;
        },
        Commands::ConfigTypes { dir, out } => {
            if let Some(dir) = dir {
                config_types.dir = dir;
            }
            config_types.out = out;
        },
        Commands::Tinker | Commands::Migrate | Commands::List => {},
    }

    let mut registry = CommandRegistry::default();
    registry
        .register(serve)
        .register(TinkerCommand::new(ctx.clone()))
        .register(MigrateCommand::new(ctx))
        .register(config_types);
    let list = ListCommand::new(registry.signatures());
    registry.register(list);

    registry.run(name).await
}
