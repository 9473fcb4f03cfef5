use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finassist::{
    api::routes,
    config::Config,
    data::{conversations::builtin_chat_history, ConversationRegistry, FinancialDataset},
    orchestrator::{ChatOrchestrator, IntentResolver, StopReason},
    services::{Transcript, TranscriptEvent},
};

#[derive(Parser)]
#[command(name = "finassist", version, about = "Financial chat assistant")]
struct Cli {
    /// Config file to load instead of ~/.finassist/config
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Answer a single question and exit
    Ask {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Replay a demo conversation to stdout
    Play { id: String },
    /// List the demo conversations
    Demos,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("finassist={}", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let orchestrator = Arc::new(build_orchestrator(&config)?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, orchestrator).await,
        Command::Ask { query } => ask(&config, &orchestrator, &query.join(" ")).await,
        Command::Play { id } => play(&orchestrator, &id).await,
        Command::Demos => {
            for demo in orchestrator.demos() {
                println!(
                    "{:<22} {} ({} turns, {})",
                    demo.id, demo.title, demo.turn_count, demo.duration
                );
            }
            Ok(())
        }
    }
}

fn build_orchestrator(config: &Config) -> anyhow::Result<ChatOrchestrator> {
    let dataset = Arc::new(FinancialDataset::builtin()?);
    let registry = Arc::new(ConversationRegistry::builtin()?);

    let transcript = if config.seed_history {
        Transcript::with_history(builtin_chat_history()?)
    } else {
        Transcript::new()
    };

    tracing::info!(
        "📚 Loaded {} demo conversations, {} vendor bills, {} customer invoices",
        registry.len(),
        dataset.vendor_bills.len(),
        dataset.customer_invoices.len()
    );

    let resolver =
        IntentResolver::new(dataset).with_high_value_threshold(config.high_value_threshold);

    Ok(ChatOrchestrator::new(
        resolver,
        registry,
        config.playback_timing(),
        config.live_latency(),
        transcript,
    ))
}

async fn serve(config: Config, orchestrator: Arc<ChatOrchestrator>) -> anyhow::Result<()> {
    let port = config.server_port;
    let cors_enabled = config.cors_enabled;

    let state = routes::AppState {
        config: Arc::new(RwLock::new(config)),
        orchestrator,
    };
    let app = routes::create_router(state, cors_enabled);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🚀 Server listening on {}", addr);
    tracing::info!("💬 Chat: POST /api/v1/chat");
    tracing::info!("🎬 Demos: GET /api/v1/demos");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn ask(config: &Config, orchestrator: &ChatOrchestrator, query: &str) -> anyhow::Result<()> {
    let turn = orchestrator.submit(&config.default_user_id, query).await?;
    match turn.completed().await {
        Some(message) => {
            println!("{}", message.response);
            Ok(())
        }
        None => anyhow::bail!("no answer was produced"),
    }
}

async fn play(orchestrator: &ChatOrchestrator, id: &str) -> anyhow::Result<()> {
    let mut events = orchestrator.subscribe_transcript().await;
    if !orchestrator.start_demo(id).await {
        anyhow::bail!("unknown demo conversation '{}'", id);
    }
    let mut playback = orchestrator.subscribe_playback().await;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => print_reveal(orchestrator, event).await,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            },
            changed = playback.changed() => {
                if changed.is_err() || playback.borrow_and_update().is_idle() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                orchestrator.stop_demo().await;
                tracing::info!("⏹️ Playback stopped");
                break;
            }
        }
    }

    while let Ok(event) = events.try_recv() {
        print_reveal(orchestrator, event).await;
    }

    match orchestrator.wait_for_idle().await {
        Some(StopReason::Completed) | None => {}
        Some(reason) => eprintln!("({})", reason),
    }
    Ok(())
}

async fn print_reveal(orchestrator: &ChatOrchestrator, event: TranscriptEvent) {
    let TranscriptEvent::Completed { id } = event else {
        return;
    };
    let session = orchestrator.session().lock().await;
    if let Some(message) = session.transcript().get(&id) {
        println!("> {}\n{}\n", message.message, message.response);
    }
}
