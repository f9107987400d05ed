use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docentify::config::Config;
use docentify::server::{self, ServeOptions};

mod commands;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Student-support chatbot for the Docentify platform", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the models once and serve the chatbot over HTTP
    Serve {
        /// Host to bind to (default from config: 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (default from config: 8000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run a single chatbot turn locally
    Ask {
        /// The question, in Portuguese
        message: String,

        /// Email of the asking user (scopes progress and certificate lookups)
        #[arg(short, long)]
        user: String,

        /// Unresolved turns so far in this conversation
        #[arg(short, long, default_value_t = 0)]
        attempts: u32,

        /// Output the reply and next context as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List the intent catalog with its keyword lemmas
    Intents,

    /// Show how a text is normalized before lemma matching
    Lemmas {
        /// Text to normalize
        text: String,
    },
}

fn init_logging(config: &Config) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    init_logging(&config);

    match cli.command {
        Commands::Serve { host, port } => {
            server::execute(&config, ServeOptions::from_config(&config, host, port))?;
        }
        Commands::Ask {
            message,
            user,
            attempts,
            json,
        } => {
            commands::turn::execute(&config, &message, &user, attempts, json)?;
        }
        Commands::Intents => {
            commands::catalog::list_intents();
        }
        Commands::Lemmas { text } => {
            commands::catalog::show_lemmas(&text);
        }
    }

    Ok(())
}
