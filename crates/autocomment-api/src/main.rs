mod cli;
mod http;
mod state;

use anyhow::anyhow;
use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands, LicenseAction};
use state::AppState;

const SESSION_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,autocomment_core=debug,autocomment_api=debug",
        _ => "trace",
    };

    autocomment_observe::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow!("failed to initialize tracing: {e}"))?;

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "acfg", &mut std::io::stdout());
        return Ok(());
    }

    let result = run(cli).await;
    autocomment_observe::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init().await?;
    let owner = cli.owner.as_str();

    match cli.command {
        Commands::Show => cli::config::show(&state, owner, cli.json).await?,

        Commands::Validate => cli::config::validate(&state, owner, cli.json).await?,

        Commands::Licenses { action } => match action.unwrap_or(LicenseAction::List) {
            LicenseAction::List => cli::license::list_licenses(&state, owner, cli.json).await?,
            LicenseAction::Add {
                name,
                key,
                id,
                status,
            } => {
                cli::license::add_license(&state, owner, name, key, id, &status, cli.json).await?
            }
        },

        Commands::Edit => cli::edit::run_editor(&state, owner).await?,

        Commands::Serve { port, host } => {
            if let Some(api_key) = state.api_keys.ensure_key(owner).await? {
                println!();
                println!(
                    "  {} API key generated for '{}' (save this -- it won't be shown again):",
                    console::style("🔑").bold(),
                    owner
                );
                println!();
                println!("  {}", console::style(&api_key).yellow().bold());
                println!();
            }

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} Allocator API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            tracing::info!(%addr, data_dir = %state.data_dir.display(), "serving allocator API");

            let sweeper = {
                let state = state.clone();
                tokio::spawn(async move {
                    let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
                    loop {
                        ticker.tick().await;
                        state.evict_idle_sessions();
                    }
                })
            };
            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            sweeper.abort();

            println!("\n  Server stopped.");
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
