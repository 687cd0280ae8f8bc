use anyhow::Context;
use clap::{Parser, Subcommand};
use lib::channels::{InboundEvent, InboundKind, InboundMessage};
use lib::nlp::EntitySet;
use lib::responses::Responder;

#[derive(Parser)]
#[command(name = "minds-bot")]
#[command(about = "MINDS Messenger bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file.
    Init {
        /// Config file path (default: MINDS_CONFIG_PATH or ~/.minds/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Run the webhook gateway. Secrets come from PAGE_ACCESS_TOKEN and VERIFY_TOKEN (or the config file).
    Gateway {
        /// Config file path (default: MINDS_CONFIG_PATH or ~/.minds/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default from config or 3000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Dispatch one message or postback locally and print the reply payload JSON.
    Simulate {
        /// Sender id passed to the reply builders.
        #[arg(long, default_value = "local-user")]
        sender: String,

        /// Postback payload, e.g. "cart_add Earl Grey Sunflower Seeds Cookies".
        #[arg(long, conflicts_with = "entities")]
        postback: Option<String>,

        /// NLP entities JSON, e.g. '{"intent":[{"value":"cart_view","confidence":0.9}]}'.
        #[arg(long, required_unless_present = "postback")]
        entities: Option<String>,

        /// Message text accompanying the entities.
        #[arg(long, default_value = "(simulated)")]
        text: String,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("minds-bot {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Gateway { config, port }) => {
            if let Err(e) = run_gateway(config, port).await {
                log::error!("gateway failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Simulate {
            sender,
            postback,
            entities,
            text,
        }) => {
            if let Err(e) = run_simulate(sender, postback, entities, text) {
                log::error!("simulate failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(lib::config::default_config_path);
    let dir = lib::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

async fn run_gateway(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (mut config, path) = lib::config::load_config(config_path)?;
    if let Some(p) = port {
        config.gateway.port = p;
    }
    log::info!(
        "starting gateway on {}:{} (config {})",
        config.gateway.bind,
        config.gateway.port,
        path.display()
    );
    lib::gateway::run_gateway(config).await
}

fn run_simulate(
    sender: String,
    postback: Option<String>,
    entities: Option<String>,
    text: String,
) -> anyhow::Result<()> {
    let kind = match (postback, entities) {
        (Some(payload), _) => InboundKind::Postback(payload),
        (None, Some(json)) => {
            let entities: EntitySet =
                serde_json::from_str(&json).context("parsing --entities JSON")?;
            InboundKind::Message(InboundMessage {
                text: Some(text),
                entities,
            })
        }
        (None, None) => anyhow::bail!("either --postback or --entities is required"),
    };
    let event = InboundEvent {
        sender_id: sender,
        kind,
    };
    let payload = lib::dispatch::dispatch_event(&Responder::default(), &event);
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
