mod decode;
mod error;
mod fetch;
mod html;
mod ids;
mod latin;
mod merge;
mod model;
mod settings;
mod sources;
mod stats;
mod store;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use indicatif::HumanDuration;
use tracing::info;

use fetch::HttpFetcher;
use model::Source;
use settings::Settings;

#[derive(Parser)]
#[command(name = "catullus_corpus", about = "Catullus Latin text + English translations corpus builder")]
struct Cli {
    /// Directory for all JSON snapshots (overrides CATULLUS_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical poem ids used to address per-poem pages
    Ids,
    /// Scrape the Latin Library index into the canonical poem list
    Latin,
    /// Scrape translation sources (all four when none are named)
    Scrape {
        /// negenborn, perseus, wikisource, poetryintranslation
        sources: Vec<Source>,
    },
    /// Merge the Latin poems with every translation snapshot
    Combine,
    /// Latin + all sources + combine
    Run,
    /// Translation coverage of the combined corpus
    Stats,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load()?;
    if let Some(dir) = cli.data_dir.as_deref() {
        settings = settings.with_data_dir(dir);
    }
    info!("Data directory: {:?}", settings.data_dir);

    let result = match cli.command {
        Commands::Ids => {
            for id in ids::poem_ids() {
                println!("{}", id);
            }
            Ok(())
        }
        Commands::Latin => {
            let fetcher = HttpFetcher::new(&settings)?;
            latin::run(&fetcher, &settings).map(|_| ())
        }
        Commands::Scrape { sources } => {
            let fetcher = HttpFetcher::new(&settings)?;
            scrape_sources(&fetcher, &settings, &sources)
        }
        Commands::Combine => merge::run(&settings).map(|_| ()),
        Commands::Run => {
            let fetcher = HttpFetcher::new(&settings)?;
            latin::run(&fetcher, &settings)?;
            scrape_sources(&fetcher, &settings, &[])?;
            merge::run(&settings).map(|_| ())
        }
        Commands::Stats => stats::run(&settings),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", HumanDuration(elapsed));
    }

    result
}

fn scrape_sources(
    fetcher: &HttpFetcher,
    settings: &Settings,
    requested: &[Source],
) -> anyhow::Result<()> {
    let selected = if requested.is_empty() {
        Source::ALL.to_vec()
    } else {
        requested.to_vec()
    };
    for source in selected {
        let extractor = sources::extractor_for(source, settings);
        sources::run(extractor.as_ref(), fetcher, settings)?;
    }
    Ok(())
}
