//! Change Machine chatbot CLI and REST API entry point.
//!
//! Binary name: `changebot`
//!
//! Parses CLI arguments, loads configuration, wires the webhook client, then
//! dispatches to the command handler or starts the REST API server.

use clap::Parser;
use clap_complete::generate;
use console::style;

use changebot_api::cli::{self, Cli, Commands};
use changebot_api::http;
use changebot_api::state::{AppState, load_config};
use changebot_infra::filesystem::resolve_data_dir;
use changebot_infra::webhook::HttpRefreshClient;
use changebot_observe::tracing_setup::{init_tracing, shutdown_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or tracing
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "changebot", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(cli.log_directive(), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let data_dir = resolve_data_dir();
    let config = load_config(&data_dir, cli.overrides()).await?;

    if let Commands::Refresh = cli.command {
        let refresher = HttpRefreshClient::from_config(&config)?;
        return cli::refresh::run_refresh(&refresher, cli.json, cli.quiet).await;
    }

    if config.endpoint().is_none() {
        if let Commands::Serve { .. } = cli.command {
            anyhow::bail!(
                "chat endpoint URL is not configured; set endpoint_url in {} or CHANGEBOT_ENDPOINT_URL",
                changebot_infra::filesystem::config_path(&data_dir).display()
            );
        }
        println!(
            "  {} Please configure the API endpoint URL (--endpoint, CHANGEBOT_ENDPOINT_URL, or endpoint_url in config.toml).",
            style("!").yellow().bold()
        );
        return Ok(());
    }

    let state = AppState::from_config(config, data_dir)?;

    match cli.command {
        Commands::Chat => {
            cli::chat::loop_runner::run_chat_loop(&state).await?;
        }

        Commands::Ask { text } => {
            cli::ask::run_ask(&state, &text.join(" "), cli.json, cli.quiet).await?;
        }

        Commands::Serve { port, host } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} Change Machine chatbot API listening on {}",
                style("*").bold(),
                style(format!("http://{addr}")).cyan()
            );
            println!("  {}", style("Press Ctrl+C to stop").dim());

            let sessions = state.sessions.clone();
            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    shutdown_signal().await;
                    // Unblock handlers still waiting on the webhook.
                    sessions.shutdown();
                })
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::Refresh | Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
