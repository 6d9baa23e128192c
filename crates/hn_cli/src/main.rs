use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use hn_core::{ReportSource, ViewerConfig};
use hn_view::templates::report_document;
use hn_view::DetailState;
use hn_web::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod build;

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse and export HN AI insight reports", long_about = None)]
pub struct Cli {
    /// JSON viewer configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory or http(s) URL holding the index and report files
    #[arg(long, global = true, default_value = ".")]
    source: String,
    #[arg(long, global = true)]
    page_size: Option<usize>,
    #[arg(long, global = true)]
    index_file: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the index and report pages over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,
    },
    /// Export every page as static HTML
    Build {
        #[arg(long)]
        out: PathBuf,
        /// Reports rendered concurrently
        #[arg(long, default_value_t = 4)]
        jobs: usize,
    },
    /// Print one rendered report to stdout
    Render { file: String },
}

fn load_config(cli: &Cli) -> anyhow::Result<ViewerConfig> {
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    if let Some(index_file) = &cli.index_file {
        config.index_file = index_file.clone();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let source: Arc<dyn ReportSource> =
        hn_sources::create_source(&cli.source, &config.index_file)?;
    let state = AppState::new(source, config)?;
    info!("🎨 Viewer ready (page size {})", state.config.page_size);

    match cli.command {
        Commands::Serve { addr } => hn_web::serve(state, &addr).await?,
        Commands::Build { out, jobs } => {
            let today = chrono::Local::now().date_naive();
            let summary = build::build_site(&state, &out, jobs, today).await?;
            info!(
                "📦 Build finished: {} pages, {} reports",
                summary.pages, summary.reports
            );
        }
        Commands::Render { file } => {
            let detail = state.viewer.load(Some(&file)).await;
            println!(
                "{}",
                report_document(&detail, &state.config, &state.highlight_css)
            );
            if let DetailState::Failed { message, .. } = detail {
                bail!("report {} failed to render: {}", file, message);
            }
        }
    }

    Ok(())
}
