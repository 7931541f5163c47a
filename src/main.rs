//! PetRadar matching server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use petradar::config::Config;
use petradar::gateway::{HandlerState, create_router_with_state};
use petradar::ledger::MatchLedger;
use petradar::pipeline::{InMemoryCandidateSource, MatchPipeline};
use petradar::ranking::MatchRanker;
use petradar::scoring::SimilarityScorer;
use petradar::tasks::TaskRegistry;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const ENV_PORT: &str = "PETRADAR_PORT";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        similarity_threshold = config.similarity_threshold,
        task_workers = config.task_workers,
        "PetRadar matcher starting"
    );

    let registry = Arc::new(TaskRegistry::new(config.task_config()));
    let reaper = registry.start_reaper();
    let ledger = Arc::new(MatchLedger::new());
    let reports = Arc::new(InMemoryCandidateSource::new());
    let ranker = MatchRanker::with_scorer(
        SimilarityScorer::with_config(config.scoring_config()),
        config.ranker_config(),
    );
    let pipeline = Arc::new(
        MatchPipeline::new(ranker, ledger, reports.clone())
            .with_candidate_limit(config.candidate_limit),
    );

    let state = HandlerState::with_pipeline(registry.clone(), reports, pipeline);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(registry))
        .await?;

    if let Some(reaper) = reaper
        && let Err(e) = reaper.await
    {
        tracing::warn!(error = %e, "Task reaper exited abnormally");
    }

    tracing::info!("PetRadar shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var(ENV_PORT)
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal(registry: Arc<TaskRegistry>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }

    registry.shutdown();
    tracing::info!(tracked_tasks = registry.len(), "Task reaper stopped");
}
