use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;

/// keycard - cookie based session authentication
#[derive(Parser)]
#[command(name = "keycard")]
#[command(about = "Session token issuing and request authentication", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a user with an email and a password
    Create {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = keycard::config::Config::load(cli.config.clone())?;

    keycard::observability::init_observability(&config.logging.level, &config.logging.format)?;

    // A missing secret must stop the process before anything is served
    config.validate()?;

    match cli.command {
        Commands::Serve { host, port } => cli::server::serve(config, host, port).await,
        Commands::Migrate => cli::migrate::migrate(config).await,
        Commands::User {
            command: UserCommands::Create { email, password },
        } => cli::user::create(config, email, password).await,
    }
}
