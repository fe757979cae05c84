use anyhow::Result;
use axum::Router;
use clap::Parser;
use leto_core::{BuildOptions, DEFAULT_CORPUS_PATH};
use server::build_app;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Corpus JSON file to index at startup
    #[arg(long, default_value = DEFAULT_CORPUS_PATH)]
    corpus: String,
    /// Tokenizer pool size (defaults to available parallelism)
    #[arg(long)]
    workers: Option<usize>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let opts = args.workers.map(|workers| BuildOptions { workers }).unwrap_or_default();
    let app: Router = build_app(&args.corpus, &opts).await?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, corpus = %args.corpus, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
