use clap::{Parser, Subcommand};
use std::time::Duration;

mod domain;
mod application;
mod infrastructure;

use application::errors::BotError;
use application::messaging::CommandRouter;
use domain::traits::{Bot, ContainerEngine, UpdateSource};
use infrastructure::adapters::TelegramAdapter;
use infrastructure::config::{Config, Credentials};
use infrastructure::docker::DockerEngine;

/// Pause before polling again after the transport fails
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

#[derive(Parser)]
#[command(name = "docker-bot")]
#[command(about = "Manage Docker containers from a Telegram chat", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "docker-bot.yaml")]
    config: String,

    /// Bot token (overrides TOKEN)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Print the default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_bot(&cli.config, cli.token);
        }
        Commands::Version => {
            println!("docker-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

/// Log a startup failure and exit
fn fatal(message: &str, error: impl std::fmt::Display) -> ! {
    tracing::error!(error = %error, "{}", message);
    std::process::exit(1);
}

fn run_bot(config_path: &str, token_override: Option<String>) {
    let config = Config::load(config_path)
        .unwrap_or_else(|e| fatal("Failed to load config", e));

    let mut credentials = Credentials::from_env()
        .unwrap_or_else(|e| fatal("Invalid environment", e));
    if let Some(token) = token_override {
        credentials = credentials.with_token(token);
    }

    let runtime = tokio::runtime::Runtime::new()
        .unwrap_or_else(|e| fatal("Failed to start async runtime", e));

    runtime.block_on(async {
        let mut telegram = TelegramAdapter::new(&credentials.token, &config.telegram.api_base)
            .with_poll_timeout(Duration::from_secs(config.telegram.poll_timeout_secs))
            .with_request_timeout(Duration::from_secs(config.telegram.request_timeout_secs));

        let info = telegram
            .fetch_bot_info()
            .await
            .unwrap_or_else(|e| fatal("Failed to create Telegram bot", e));

        let engine = DockerEngine::connect(config.docker.host.as_deref())
            .unwrap_or_else(|e| fatal("Failed to create Docker client", e))
            .negotiate_version()
            .await;

        if let Err(e) = telegram.register_commands().await {
            tracing::warn!(error = %e, "Failed to register commands");
        }

        tracing::info!(
            bot_username = %info.username,
            allowed_user = credentials.allowed_user,
            "Docker Telegram Bot started"
        );

        let router = CommandRouter::new(telegram.clone(), engine, credentials.allowed_user);

        tokio::select! {
            _ = run_message_loop(&mut telegram, &router) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
            }
        }
    });
}

async fn run_message_loop<S, B, E>(source: &mut S, router: &CommandRouter<B, E>)
where
    S: UpdateSource,
    B: Bot,
    E: ContainerEngine,
{
    tracing::info!("Starting message loop...");

    loop {
        if let Err(e) = poll_once(source, router).await {
            tracing::error!(error = %e, "Failed to get updates");
            tokio::time::sleep(POLL_RETRY_DELAY).await;
        }
    }
}

/// Fetch one batch of updates and handle its messages in arrival order
async fn poll_once<S, B, E>(source: &mut S, router: &CommandRouter<B, E>) -> Result<usize, BotError>
where
    S: UpdateSource,
    B: Bot,
    E: ContainerEngine,
{
    let updates = source.next_updates().await?;
    if !updates.is_empty() {
        tracing::debug!("Received {} updates", updates.len());
    }

    let mut handled = 0;
    for message in updates.into_iter().flatten() {
        router.process(message).await;
        handled += 1;
    }
    Ok(handled)
}

fn init_config() {
    match Config::default().to_yaml() {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to docker-bot.yaml and adjust as needed.");
        }
        Err(e) => fatal("Failed to render default config", e),
    }
}
