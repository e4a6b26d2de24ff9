use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use typedoc_site::{loader, SiteConfig, SiteGenerator};

#[derive(Parser)]
#[command(name = "doc-generator")]
#[command(about = "Generate a static documentation site from a docs payload")]
struct Args {
    /// Payload file, or a directory of `*.json` payloads to merge
    #[arg(short, long, default_value = "data.json")]
    data: PathBuf,

    #[arg(short, long, default_value = "dist")]
    output: PathBuf,

    /// Site configuration (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    tracing::info!("🔍 Loading documentation payload from {}", args.data.display());
    let dataset = loader::load_path(&args.data)
        .with_context(|| format!("loading {}", args.data.display()))?;
    let config = SiteConfig::load_or_default(args.config.as_deref())
        .context("loading site configuration")?;

    let generator = SiteGenerator::new(dataset, config).context("preparing templates")?;
    let report = generator
        .generate(&args.output)
        .with_context(|| format!("writing site to {}", args.output.display()))?;

    tracing::info!(
        "📝 {} endpoints, {} types, {} docs",
        report.api,
        report.types,
        report.docs
    );
    tracing::info!("✅ Documentation generated in: {}", args.output.display());
    Ok(())
}
