use anyhow::Context;
use axum::{routing::get, Router};
use clap::Parser;
use notify::{Event, RecursiveMode, Watcher};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use typedoc_site::{loader, SiteConfig, SiteGenerator};

#[derive(Parser)]
#[command(name = "dev-server")]
#[command(about = "Serve a generated documentation site, regenerating on change")]
struct Args {
    #[arg(short, long, default_value = "dist")]
    dist: PathBuf,

    /// Payload to (re)generate from before serving
    #[arg(long)]
    data: Option<PathBuf>,

    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Regenerate whenever the payload changes (requires --data)
    #[arg(short, long)]
    watch: bool,

    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

fn regenerate(data: &Path, config: Option<&Path>, dist: &Path) -> anyhow::Result<()> {
    let dataset =
        loader::load_path(data).with_context(|| format!("loading {}", data.display()))?;
    let config = SiteConfig::load_or_default(config)?;
    SiteGenerator::new(dataset, config)?.generate(dist)?;
    Ok(())
}

fn watch(data: PathBuf, config: Option<PathBuf>, dist: PathBuf) -> anyhow::Result<impl Watcher> {
    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(tx)?;
    watcher.watch(&data, RecursiveMode::Recursive)?;

    std::thread::spawn(move || {
        for event in rx {
            match event {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    tracing::info!(paths = ?event.paths, "payload changed, regenerating");
                    if let Err(err) = regenerate(&data, config.as_deref(), &dist) {
                        tracing::error!("regeneration failed: {err:#}");
                    }
                }
                Ok(_) => {}
                Err(err) => tracing::warn!(error = %err, "watch error"),
            }
        }
    });
    Ok(watcher)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();

    let _watcher = match &args.data {
        Some(data) => {
            regenerate(data, args.config.as_deref(), &args.dist)?;
            if args.watch {
                Some(watch(data.clone(), args.config.clone(), args.dist.clone())?)
            } else {
                None
            }
        }
        None => {
            if args.watch {
                tracing::warn!("--watch has no effect without --data");
            }
            None
        }
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .fallback_service(ServeDir::new(&args.dist))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!("🚀 Dev server running on http://localhost:{}", args.port);
    tracing::info!("📖 Serving {}", args.dist.display());

    axum::serve(listener, app).await?;
    Ok(())
}
