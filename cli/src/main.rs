use anyhow::Result;
use clap::{Parser, Subcommand};
use leto_core::{build_index, search, BuildOptions, DEFAULT_CORPUS_PATH, DEFAULT_RESULT_LIMIT};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "leto")]
#[command(about = "Build an in-memory term-frequency index over a corpus and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the corpus and print the best matching documents for a query
    Search {
        /// Corpus JSON file: {"<id>": {"description": "...", "wiki": "..."}}
        #[arg(long, default_value = DEFAULT_CORPUS_PATH)]
        corpus: String,
        /// Maximum number of results
        #[arg(long, default_value_t = DEFAULT_RESULT_LIMIT as i64, allow_negative_numbers = true)]
        limit: i64,
        /// Tokenizer pool size (defaults to available parallelism)
        #[arg(long)]
        workers: Option<usize>,
        /// Query terms, joined with spaces
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Index the corpus and report its size
    Stats {
        #[arg(long, default_value = DEFAULT_CORPUS_PATH)]
        corpus: String,
        #[arg(long)]
        workers: Option<usize>,
    },
}

fn build_options(workers: Option<usize>) -> BuildOptions {
    match workers {
        Some(workers) => BuildOptions { workers },
        None => BuildOptions::default(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { corpus, limit, workers, query } => {
            let index = build_index(&corpus, &build_options(workers)).await?;
            let query = query.join(" ");
            let results = search(&query, &index, limit)?;
            tracing::info!(%query, hits = results.len(), "search complete");
            for res in results {
                println!("{res}");
            }
        }
        Commands::Stats { corpus, workers } => {
            let index = build_index(&corpus, &build_options(workers)).await?;
            println!("documents: {}", index.num_docs());
            println!("terms: {}", index.num_terms());
        }
    }
    Ok(())
}
