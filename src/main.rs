use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use wellbot::config::{self, WellbotConfig};
use wellbot::dialogue::DialogueController;
use wellbot::gateway;
use wellbot::knowledge::{KnowledgeBase, SymptomIndex};
use wellbot::store::SessionStore;

#[derive(Parser)]
#[command(name = "wellbot")]
#[command(about = "A bilingual wellness chatbot with symptom-based dialogue")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the chat gateway
    Serve {
        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Bind address (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Chat in the terminal
    Chat {
        /// User id for the session
        #[arg(short, long, default_value = "local")]
        user: String,
    },

    /// Validate a knowledge base and print a summary
    Kb {
        /// JSON file (defaults to config, then builtin data)
        #[arg(long, env = "WELLBOT_KB")]
        path: Option<String>,
    },

    /// Show configuration and knowledge base status
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = config::load()?;

    match cli.command {
        Commands::Serve { port, bind } => {
            if let Some(port) = port {
                config.gateway.port = port;
            }
            if let Some(bind) = bind {
                config.gateway.bind = bind;
            }
            gateway::run(config).await
        }
        Commands::Chat { user } => chat(&config, &user).await,
        Commands::Kb { path } => {
            let path = path.or(config.knowledge.path.clone());
            let kb = KnowledgeBase::load_or_builtin(path.as_deref())
                .context("knowledge base failed validation")?;
            let index = SymptomIndex::build(&kb);
            println!("source: {}", path.as_deref().unwrap_or("builtin"));
            println!("conditions: {}", kb.conditions().count());
            println!("topics: {}", kb.topics().count());
            println!("symptom vocabulary: {}", index.vocabulary().len());
            for entry in kb.entries() {
                println!("  {} ({:?})", entry.name, entry.kind);
            }
            Ok(())
        }
        Commands::Status => {
            println!("wellbot v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "gateway: {}:{} (cors: {})",
                config.gateway.bind, config.gateway.port, config.gateway.cors
            );
            println!(
                "knowledge: {}",
                config.knowledge.path.as_deref().unwrap_or("builtin")
            );
            println!(
                "dialogue: max_candidates={}, symptom_list_cap={}",
                config.dialogue.max_candidates, config.dialogue.symptom_list_cap
            );
            Ok(())
        }
    }
}

/// Line-based REPL against a local controller. Empty lines are skipped.
async fn chat(config: &WellbotConfig, user: &str) -> anyhow::Result<()> {
    let kb = KnowledgeBase::load_or_builtin(config.knowledge.path.as_deref())?;
    let controller =
        DialogueController::new(Arc::new(kb), SessionStore::shared()).with_config(&config.dialogue);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(b"> ").await?;
    stdout.flush().await?;
    while let Some(line) = lines.next_line().await? {
        let message = line.trim();
        if !message.is_empty() {
            let turn = controller.handle(user, message);
            stdout.write_all(format!("{}\n\n", turn.reply).as_bytes()).await?;
            if turn.outcome == wellbot::types::TurnOutcome::Farewell {
                break;
            }
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    Ok(())
}
