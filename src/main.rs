//! taxon command-line entrypoint.

use anyhow::Context;
use clap::Parser;
use mimalloc::MiMalloc;

use taxon::cli::{Cli, Commands, Mode};
use taxon::config::Config;
use taxon::embedding::{
    QueryEncoder, RerankerConfig, VoyageConfig, VoyageEmbedder, VoyageReranker,
};
use taxon::eval::{Evaluator, batch_terms, default_eval_queries};
use taxon::pipeline::SearchPipeline;
use taxon::report::{build_report, format_eval_header, format_hits, format_preview, write_csv_file};
use taxon::vectordb::{QdrantIndex, verify_dimension};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

type Pipeline = SearchPipeline<VoyageEmbedder, QdrantIndex, VoyageReranker>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mode = cli.mode().unwrap_or_else(|err| err.exit());

    let mut config = Config::from_env()?;
    cli.search.apply(&mut config);
    config.validate()?;

    tracing::info!(
        qdrant_url = %config.qdrant_url,
        collection = %config.collection,
        embed_model = %config.embed_model,
        embedding_dim = config.embedding_dim,
        rerank = config.rerank_enabled,
        server_side_embedding = config.server_side_embedding,
        "taxon starting"
    );

    let pipeline = build_pipeline(&config)?;

    match mode {
        Mode::Free(query) => run_free(&pipeline, &query).await,
        Mode::Command(Commands::Eval) => run_eval(&pipeline).await,
        Mode::Command(Commands::Report {
            out,
            preview,
            batch_size,
        }) => {
            let run = build_report(&pipeline, &batch_terms(), batch_size).await;
            if preview > 0 {
                for entry in &run.queries {
                    print!("{}", format_preview(&entry.query, &entry.rows, preview));
                }
            }
            let written = write_csv_file(&out, run.rows())?;
            println!("\nWrote {} rows to {}", written, out.display());
            if run.failed() > 0 {
                println!("{} of {} terms failed; see logs", run.failed(), run.queries.len());
            }
            Ok(())
        }
        Mode::Command(Commands::Check) => run_check(&pipeline, &config).await,
    }
}

fn build_pipeline(config: &Config) -> anyhow::Result<Pipeline> {
    let index = QdrantIndex::new(
        &config.qdrant_url,
        &config.collection,
        config.vector_name.clone(),
        config.request_timeout(),
    )?;

    let mut pipeline = SearchPipeline::new(config.pipeline_config(), index);

    if !config.server_side_embedding {
        let api_key = config
            .voyage_api_key
            .clone()
            .context("a Voyage API key is required for client-side embedding")?;
        let embedder = VoyageEmbedder::new(VoyageConfig {
            api_key,
            base_url: config.voyage_url.clone(),
            model: config.embed_model.clone(),
            output_dimension: config.embedding_dim,
            timeout: config.request_timeout(),
        })?;
        let encoder =
            QueryEncoder::new(embedder, config.dim_config(), config.query_cache_capacity)?;
        pipeline = pipeline.with_encoder(encoder);
    }

    if config.rerank_enabled {
        let api_key = config
            .voyage_api_key
            .clone()
            .context("a Voyage API key is required for reranking")?;
        let reranker = VoyageReranker::new(
            RerankerConfig::new(api_key, config.voyage_url.clone())
                .with_timeout(config.request_timeout()),
        )?;
        pipeline = pipeline.with_reranker(reranker);
    }

    pipeline.ensure_ready()?;
    Ok(pipeline)
}

async fn run_free(pipeline: &Pipeline, query: &str) -> anyhow::Result<()> {
    let outcome = pipeline.run(query).await?;
    print!("{}", format_hits("Ad-hoc", query, outcome.results()));
    Ok(())
}

async fn run_eval(pipeline: &Pipeline) -> anyhow::Result<()> {
    println!(
        "{}",
        format_eval_header(pipeline.config(), pipeline.num_candidates())
    );

    let run = Evaluator::new(pipeline)
        .evaluate(&default_eval_queries())
        .await;

    for evaluation in &run.queries {
        match &evaluation.outcome {
            Ok(outcome) => print!(
                "{}",
                format_hits("Results", &evaluation.query.query, outcome.results())
            ),
            Err(err) => println!("\n[Results]  '{}'\n  (failed: {})", evaluation.query.query, err),
        }
    }

    println!("\nSummary:");
    println!("{}", run.result);
    Ok(())
}

async fn run_check(pipeline: &Pipeline, config: &Config) -> anyhow::Result<()> {
    let index = pipeline.index();
    index.health_check().await?;

    match verify_dimension(index, config.embedding_dim).await? {
        Some(size) => println!(
            "Collection '{}' OK: vector size {} matches {} ({})",
            config.collection, size, config.embed_model, config.embedding_dim
        ),
        None => println!(
            "Collection '{}' exists but reports no vector size for {}",
            config.collection,
            config.vector_name.as_deref().unwrap_or("the default vector")
        ),
    }
    Ok(())
}
