// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use golden_mile::models::advisory::{DEFAULT_INTENT, DEFAULT_SIZE_SQFT};
use golden_mile::pipeline::MAX_LISTED_RECOMMENDATIONS;
use golden_mile::utils::logging::{
    format_error, format_info, format_step, format_success, format_warning,
};
use golden_mile::{
    Advisor, AdvisoryInputs, Config, CorpusGenerator, DatasetGenerator, EmbeddingClient,
    IndexBuilder, RecommendationQuery, Recommender, Retriever, Trainer, health_without_advisor,
    load_dataset, start_server, write_dataset,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "golden_mile")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Real-estate investment advisor: price model, retrieval and LLM reports", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web front end
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Write the synthetic property dataset as csv
    GenerateData {
        #[arg(long, value_name = "NUM")]
        rows_per_locality: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write the synthetic market-research corpus
    GenerateDocs {
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Train and compare the price models
    Train,

    /// Chunk, embed and index the corpus
    Index {
        #[arg(long)]
        no_progress: bool,
    },

    /// Report on model, dataset, index and LLM readiness
    Check,

    /// List properties that fit a budget using the strict filters
    Recommend {
        /// Budget in crore rupees
        #[arg(short, long)]
        budget: f64,

        #[arg(short, long, default_value_t = DEFAULT_SIZE_SQFT)]
        size: f64,

        #[arg(long)]
        city: Option<String>,

        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        metro: bool,
    },

    /// Search the market corpus by semantic similarity
    Search {
        query: String,

        #[arg(long)]
        city: Option<String>,

        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Run a full advisory and write the pdf and json reports
    Report {
        #[arg(long)]
        city: String,

        #[arg(short, long)]
        budget: f64,

        #[arg(short, long, default_value_t = DEFAULT_SIZE_SQFT)]
        size: f64,

        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        metro: bool,

        #[arg(long, default_value = DEFAULT_INTENT)]
        intent: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    golden_mile::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Golden Mile Real Estate Advisor");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Serve { host, port } => {
            cmd_serve(config, host, port).await?;
        }
        Commands::GenerateData {
            rows_per_locality,
            seed,
            output,
        } => {
            cmd_generate_data(&config, rows_per_locality, seed, output)?;
        }
        Commands::GenerateDocs { output, seed } => {
            cmd_generate_docs(&config, output, seed)?;
        }
        Commands::Train => {
            cmd_train(&config)?;
        }
        Commands::Index { no_progress } => {
            cmd_index(&config, !no_progress, cli.color).await?;
        }
        Commands::Check => {
            cmd_check(&config).await?;
        }
        Commands::Recommend {
            budget,
            size,
            city,
            metro,
        } => {
            cmd_recommend(&config, budget, size, city, metro)?;
        }
        Commands::Search { query, city, k } => {
            cmd_search(&config, &query, city.as_deref(), k).await?;
        }
        Commands::Report {
            city,
            budget,
            size,
            metro,
            intent,
        } => {
            let inputs = AdvisoryInputs {
                city,
                budget_cr: budget,
                size_sqft: size,
                metro,
                intent,
            };
            cmd_report(&config, inputs).await?;
        }
    }

    Ok(())
}

async fn cmd_serve(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate().context("Invalid server settings")?;

    start_server(&config).await.context("Web server failed")?;
    Ok(())
}

fn cmd_generate_data(
    config: &Config,
    rows_per_locality: Option<usize>,
    seed: Option<u64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let rows = rows_per_locality.unwrap_or(config.data.rows_per_locality);
    let seed = seed.unwrap_or(config.data.seed);
    let output = output.unwrap_or_else(|| config.data.dataset_path.clone());

    info!("Generating dataset: {} rows per locality (seed {})", rows, seed);
    let records = DatasetGenerator::new(rows, seed).generate();
    write_dataset(&output, &records).context("Failed to write dataset")?;

    println!(
        "{}",
        format_success(&format!(
            "Wrote {} properties to {}",
            records.len(),
            output.display()
        ))
    );
    Ok(())
}

fn cmd_generate_docs(config: &Config, output: Option<PathBuf>, seed: Option<u64>) -> Result<()> {
    let output = output.unwrap_or_else(|| config.data.corpus_dir.clone());
    let seed = seed.unwrap_or(config.data.seed);

    let written = CorpusGenerator::new(seed)
        .generate(&output)
        .context("Failed to write corpus")?;

    println!(
        "{}",
        format_success(&format!(
            "Wrote {} documents under {}",
            written.len(),
            output.display()
        ))
    );
    Ok(())
}

fn cmd_train(config: &Config) -> Result<()> {
    println!("{}", format_step(1, 3, "Loading dataset"));
    let records = load_dataset(&config.data.dataset_path).context("Failed to load dataset")?;

    println!("{}", format_step(2, 3, "Training candidate models"));
    let outcome = Trainer::new(config.model.test_fraction, config.model.seed)
        .train(&records)
        .context("Training failed")?;

    println!("{}", format_step(3, 3, "Saving models"));
    let comparison_path = config.report.output_dir.join("model_comparison.csv");
    outcome
        .save(
            &config.model.model_dir,
            &config.best_model_path(),
            &comparison_path,
        )
        .context("Failed to save models")?;

    println!("\n{:<24} {:>12} {:>12} {:>8}", "Model", "RMSE", "MAE", "R2");
    println!("{}", "-".repeat(60));
    for model in &outcome.models {
        println!(
            "{:<24} {:>12.2} {:>12.2} {:>8.4}",
            model.name(),
            model.metrics.rmse,
            model.metrics.mae,
            model.metrics.r2
        );
    }

    if let Some(best) = outcome.best() {
        println!(
            "\n{}",
            format_success(&format!(
                "Best model: {} saved to {}",
                best.name(),
                config.best_model_path().display()
            ))
        );
    }
    Ok(())
}

async fn cmd_index(config: &Config, show_progress: bool, colored: bool) -> Result<()> {
    let mut builder = IndexBuilder::new(config.clone());
    if show_progress {
        builder = builder.with_progress(colored);
    }

    let stats = builder
        .build()
        .await
        .context("Indexing failed")?;

    println!(
        "{}",
        format_success(&format!(
            "Indexed {} chunks from {} documents ({} skipped) in {:.2}s",
            stats.chunks_created,
            stats.documents_indexed,
            stats.documents_skipped,
            stats.duration_secs
        ))
    );
    println!(
        "{}",
        format_info(&format!(
            "{:.1} chunks/document, {:.1} chunks/s, dimension {}",
            stats.chunks_per_document(),
            stats.chunks_per_second(),
            stats.embedding_dimension
        ))
    );
    Ok(())
}

async fn cmd_check(config: &Config) -> Result<()> {
    let report = match Advisor::from_config(config) {
        Ok(advisor) => advisor.health().await,
        Err(e) => {
            println!(
                "{}",
                format_warning(&format!("Advisor unavailable, checking components: {}", e))
            );
            health_without_advisor(config, &e).await
        }
    };
    println!("{}", report.format());
    Ok(())
}

fn cmd_recommend(
    config: &Config,
    budget: f64,
    size: f64,
    city: Option<String>,
    metro: bool,
) -> Result<()> {
    let predictor = golden_mile::PricePredictor::load(&config.best_model_path())
        .context("Failed to load price model")?;
    let records = load_dataset(&config.data.dataset_path).context("Failed to load dataset")?;
    let recommender = Recommender::new(
        Arc::new(predictor),
        Arc::new(records),
        config.model.metro_max_km,
    );

    let query = RecommendationQuery::strict(budget, size, city, metro);
    let results = recommender.recommend(&query);

    if results.is_empty() {
        println!(
            "{}",
            format_warning(&format!(
                "No properties fit a budget of {:.2} Cr for {} sqft",
                budget, size
            ))
        );
        return Ok(());
    }

    println!(
        "\n{:<12} {:<18} {:<10} {:>8} {:>10} {:>10}",
        "City", "Locality", "Type", "Metro", "Rs/sqft", "Total Cr"
    );
    println!("{}", "=".repeat(74));
    for rec in &results {
        println!(
            "{:<12} {:<18} {:<10} {:>6.1}km {:>10.0} {:>10.2}",
            rec.city,
            rec.locality,
            rec.property_type,
            rec.distance_to_metro_km,
            rec.predicted_price_per_sqft,
            rec.predicted_total_cr
        );
    }
    Ok(())
}

async fn cmd_search(
    config: &Config,
    query: &str,
    city: Option<&str>,
    k: Option<usize>,
) -> Result<()> {
    info!("Searching for: {}", query);

    let retriever = Retriever::new(
        config.retrieval.clone(),
        EmbeddingClient::new(config.embeddings.clone()),
    );
    let k = k.unwrap_or_else(|| retriever.default_k());

    let results = retriever
        .retrieve(query, city, k)
        .await
        .context("Search failed")?;

    if results.is_empty() {
        println!("\nNo results found for query: \"{}\"\n", query);
        println!("Try:");
        println!("  - Using different search terms");
        println!("  - Removing the city filter");
        println!("  - Running `golden_mile index` first");
        return Ok(());
    }

    println!("\nSearch Results for: \"{}\"\n", query);
    println!("Found {} result(s)\n", results.len());
    println!("{}", "=".repeat(80));

    for (idx, result) in results.iter().enumerate() {
        println!("\n{}. {}", idx + 1, result.format_summary(300));
    }

    println!("{}", "=".repeat(80));
    Ok(())
}

async fn cmd_report(config: &Config, inputs: AdvisoryInputs) -> Result<()> {
    let start = Instant::now();
    let advisor = Advisor::from_config(config).context("Failed to load advisor")?;

    let outcome = match advisor.generate(inputs).await {
        Ok(outcome) => outcome,
        Err(e) => {
            println!("{}", format_error(&e.to_string()));
            return Err(e).context("Advisory generation failed");
        }
    };

    println!("\n{}\n", outcome.analysis);
    println!("{}", "=".repeat(80));
    println!(
        "{}",
        format_info(&format!(
            "{} matching properties ({} listed in the report)",
            outcome.recommendation_count,
            outcome.recommendation_count.min(MAX_LISTED_RECOMMENDATIONS)
        ))
    );
    println!(
        "{}",
        format_success(&format!("PDF written to {}", outcome.pdf_path.display()))
    );
    println!(
        "{}",
        format_success(&format!("Report written to {}", outcome.report_path.display()))
    );
    info!("Advisory complete in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}
