mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shellmind::config::ShellmindConfig;

#[derive(Parser)]
#[command(name = "shellmind", version, about = "Local history and fact memory for a completion CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the interaction history file
    Init,
    /// Store a prompt and its completion in the history
    Remember {
        input: String,
        output: String,
        /// Label for the interaction
        #[arg(long)]
        name: Option<String>,
        /// Protect the interaction from future pruning
        #[arg(long)]
        favorite: bool,
    },
    /// Print a past completion by reverse index (0 = most recent)
    Recall {
        #[arg(allow_hyphen_values = true)]
        token: String,
    },
    /// List the interaction history, most recent first
    History,
    /// Memorize a fact
    Memorize {
        #[arg(required = true)]
        fact: Vec<String>,
    },
    /// Print every memorized fact
    Facts,
    /// Print the facts relevant to a query
    Retrieve {
        #[arg(required = true)]
        query: Vec<String>,
        /// Skip relevance ranking and print every fact
        #[arg(long)]
        passthrough: bool,
    },
    /// Forget every memorized fact
    ClearFacts,
    /// Read or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print a value, e.g. `relevance.mode`
    Get { key: String },
    /// Write a value to the config file
    Set { key: String, value: String },
    /// Print the config file location
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ShellmindConfig::load()?;

    // Log to stderr so stdout only carries command output.
    let filter =
        EnvFilter::try_new(&config.log.level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Init => cli::history::init(&config)?,
        Command::Remember {
            input,
            output,
            name,
            favorite,
        } => cli::history::remember(&config, &input, &output, name.as_deref(), favorite)?,
        Command::Recall { token } => cli::history::recall(&config, &token)?,
        Command::History => cli::history::history(&config)?,
        Command::Memorize { fact } => cli::facts::memorize(&config, &fact.join(" "))?,
        Command::Facts => cli::facts::list(&config)?,
        Command::Retrieve { query, passthrough } => {
            cli::facts::retrieve(&config, &query.join(" "), passthrough)?
        }
        Command::ClearFacts => cli::facts::clear(&config)?,
        Command::Config { action } => match action {
            ConfigAction::Get { key } => cli::settings::get(&config, &key)?,
            ConfigAction::Set { key, value } => cli::settings::set(&key, &value)?,
            ConfigAction::Path => cli::settings::path(),
        },
    }

    Ok(())
}
