//! Command-line entry point for litscout.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use litscout::models::SearchRequest;
use litscout::UnifiedSearch;

/// Search academic literature across arXiv, OpenAlex, and Semantic Scholar.
#[derive(Debug, Parser)]
#[command(name = "litscout", version, about)]
struct Cli {
    /// Topic to search for
    query: Vec<String>,

    /// First publication year to include (requires --to)
    #[arg(long, value_name = "YEAR")]
    from: Option<i32>,

    /// Last publication year to include (requires --from)
    #[arg(long, value_name = "YEAR")]
    to: Option<i32>,

    /// Maximum number of results
    #[arg(long, short = 'n', default_value_t = 20)]
    max_results: usize,

    /// Emit results as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "litscout=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let query = cli.query.join(" ");

    let mut request = SearchRequest::new(query).max_results(cli.max_results);
    request.start_year = cli.from;
    request.end_year = cli.to;

    let pipeline = UnifiedSearch::new(litscout::config::get_config());

    let response = pipeline.search(&request).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if response.results.is_empty() {
        println!("No results for \"{}\"", response.query);
        return Ok(());
    }

    println!(
        "{} results for \"{}\" (from {})\n",
        response.total_results,
        response.query,
        response.sources.join(", ")
    );

    for (i, paper) in response.results.iter().enumerate() {
        println!("{}. {} ({})", i + 1, paper.title, paper.year);
        if !paper.authors.is_empty() {
            println!("   {}", paper.authors);
        }
        println!(
            "   {} | relevance {:.2} | {} citations",
            paper.source,
            paper.relevance(),
            paper.citation_count
        );
        if !paper.url.is_empty() {
            println!("   {}", paper.url);
        }
        println!();
    }

    Ok(())
}
