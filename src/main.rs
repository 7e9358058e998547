use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lexrag_chunk::load_chunks;
use lexrag_core::bootstrap::{
    build_retriever, create_chat, create_embedder, create_store, load_language_model,
};
use lexrag_core::config::{Config, StoreBackend, resolve_config_path};
use lexrag_core::flows;
use lexrag_index::LexicalEvaluator;

/// Chunk, index and query a directory of regulatory documents.
#[derive(Parser, Debug)]
#[command(name = "lexrag", version, about)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load documents, chunk them and build the embeddings.
    Preprocess {
        /// Clean segment text before regrouping.
        #[arg(long)]
        clean: bool,
        /// Stop after writing the chunk file.
        #[arg(long)]
        no_embed: bool,
    },
    /// Retrieve the passages closest to a query.
    Search {
        query: String,
        #[arg(long)]
        top_k: Option<usize>,
        /// Rerank a larger candidate pool with the configured reranker.
        #[arg(long)]
        rerank: bool,
    },
    /// Answer a question from the retrieved passages.
    Ask {
        question: String,
        #[arg(long)]
        top_k: Option<usize>,
        /// Rerank a larger candidate pool with the configured reranker.
        #[arg(long)]
        rerank: bool,
    },
    /// Print a random sample of chunks for manual review.
    Sample {
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u16).range(1..=100))]
        count: Option<u16>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Draft a factoid question/reference dataset from randomly sampled chunks.
    GenerateDataset {
        output: PathBuf,
        #[arg(short = 'n', long)]
        count: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Score retrieval against a question/reference dataset, with and without reranking.
    Evaluate {
        dataset: PathBuf,
        #[arg(long)]
        top_k: Option<usize>,
        /// Generate answers for samples that have none, scoring `answer_f1` per run.
        #[arg(long)]
        answer: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config.as_deref());
    let mut config = Config::load(&config_path)?;
    if let Command::Preprocess { clean: true, .. } = cli.command {
        config.chunking.clean = true;
    }
    config.validate()?;
    tracing::debug!(path = %config_path.display(), "configuration loaded");

    match cli.command {
        Command::Preprocess { no_embed, .. } => run_preprocess(&config, no_embed).await,
        Command::Search {
            query,
            top_k,
            rerank,
        } => {
            let top_k = top_k.unwrap_or(config.retrieval.top_k);
            run_search(&config, &query, top_k, rerank).await
        }
        Command::Ask {
            question,
            top_k,
            rerank,
        } => {
            let top_k = top_k.unwrap_or(config.retrieval.top_k);
            run_ask(&config, &question, top_k, rerank).await
        }
        Command::Sample { count, seed } => {
            let count = count.map_or(config.retrieval.sample_size, usize::from);
            run_sample(&config, count, seed)
        }
        Command::GenerateDataset {
            output,
            count,
            seed,
        } => {
            let count = count.unwrap_or(config.generation.dataset_size);
            run_generate_dataset(&config, &output, count, seed).await
        }
        Command::Evaluate {
            dataset,
            top_k,
            answer,
        } => {
            let top_k = top_k.unwrap_or(config.retrieval.top_k);
            run_evaluate(&config, &dataset, top_k, answer).await
        }
    }
}

async fn run_preprocess(config: &Config, no_embed: bool) -> anyhow::Result<()> {
    let model = load_language_model(&config.language).await?;
    let embedder = if no_embed {
        None
    } else {
        Some(create_embedder(&config.embedding)?)
    };
    let store = match (&embedder, config.vector_store.backend) {
        (Some(_), StoreBackend::Qdrant) => Some(create_store(&config.vector_store)?),
        _ => None,
    };

    let summary = flows::preprocess(config, &model, embedder.as_deref(), store).await?;
    println!(
        "{} documents -> {} chunks written to {}",
        summary.documents,
        summary.chunks,
        config.data.chunks_path().display()
    );
    if summary.embedded > 0 {
        println!(
            "{} embeddings written to {}",
            summary.embedded,
            config.data.embeddings_path().display()
        );
    }
    if summary.indexed > 0 {
        println!(
            "{} points indexed into collection {}",
            summary.indexed, config.vector_store.collection
        );
    }
    Ok(())
}

async fn open_retriever(config: &Config, rerank: bool) -> anyhow::Result<lexrag_index::Retriever> {
    let embedder = create_embedder(&config.embedding)?;
    let store = create_store(&config.vector_store)?;
    flows::prepare_store(config, Arc::clone(&store)).await?;
    Ok(build_retriever(config, embedder, store, rerank))
}

async fn run_search(config: &Config, query: &str, top_k: usize, rerank: bool) -> anyhow::Result<()> {
    let retriever = open_retriever(config, rerank).await?;
    let passages = flows::search(&retriever, query, top_k).await?;
    print!("{}", flows::render_passages(&passages));
    Ok(())
}

async fn run_ask(config: &Config, question: &str, top_k: usize, rerank: bool) -> anyhow::Result<()> {
    let chat = create_chat(&config.generation)?;
    let retriever = open_retriever(config, rerank).await?;
    let answer = flows::ask(&retriever, chat.as_ref(), question, top_k).await?;
    print!("{}", flows::render_answer(&answer));
    Ok(())
}

fn run_sample(config: &Config, count: usize, seed: Option<u64>) -> anyhow::Result<()> {
    let chunks = load_chunks(&config.data.chunks_path())?;
    let sample = flows::sample_chunks(&chunks, count, seed);
    println!("{} of {} chunks\n", sample.len(), chunks.len());
    print!("{}", flows::render_sample(&sample));
    Ok(())
}

async fn run_generate_dataset(
    config: &Config,
    output: &Path,
    count: usize,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let chunks = load_chunks(&config.data.chunks_path())?;
    let chat = create_chat(&config.generation)?;
    let samples = flows::generate_dataset(&chunks, chat.as_ref(), count, seed).await?;
    flows::save_dataset(output, &samples)?;
    println!("{} questions written to {}", samples.len(), output.display());
    Ok(())
}

async fn run_evaluate(
    config: &Config,
    dataset: &Path,
    top_k: usize,
    answer: bool,
) -> anyhow::Result<()> {
    let samples = flows::load_dataset(dataset)?;
    let chat = if answer {
        Some(create_chat(&config.generation)?)
    } else {
        None
    };
    let retriever = open_retriever(config, true).await?;
    if !retriever.has_reranker() {
        tracing::warn!("no reranker configured, evaluating baseline retrieval only");
    }
    let comparison = flows::evaluate(
        &retriever,
        &LexicalEvaluator::default(),
        chat.as_deref(),
        &samples,
        top_k,
    )
    .await
    .with_context(|| format!("evaluation of {} failed", dataset.display()))?;
    print!("{}", flows::render_comparison(&comparison));
    Ok(())
}

fn init_subscriber() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
