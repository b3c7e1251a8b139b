use anyhow::{Context, Result};
use chrono::Utc;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde::Serialize;
use std::{fs, path::PathBuf, thread, time::Duration};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use match_tracker::{
    batch::{self, Batch},
    config::TrackerConfig,
    export,
    fetcher::HttpFetcher,
    fixture_page, render,
    selection::{self, Selection},
    timestamp::DISPLAY_TZ,
    MatchId, MatchRecord, Status,
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List matches kicking off between yesterday and four days from now
    List {
        /// Read a saved fixtures page instead of fetching the configured sources
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Competition name for the saved page
        #[arg(short, long, default_value = "Saved page")]
        competition: String,
        /// Print JSON instead of labels
        #[arg(long)]
        json: bool,
    },
    /// Show the status of tracked matches
    Track {
        /// Comma-separated match ids, e.g. "Leeds United-vs-Hull City"
        #[arg(short, long, conflicts_with = "link")]
        matches: Option<String>,
        /// A link produced by `share`
        #[arg(short, long)]
        link: Option<String>,
        /// Re-fetch every N seconds
        #[arg(short, long)]
        watch: Option<u64>,
    },
    /// Print a shareable link for a selection
    Share {
        #[arg(short, long)]
        matches: String,
    },
    /// Export every fetched match to CSV
    Export {
        #[arg(short, long)]
        out: PathBuf,
    },
}

#[derive(Serialize)]
struct Candidate<'a> {
    id: MatchId,
    label: String,
    status: Status,
    #[serde(flatten)]
    record: &'a MatchRecord,
}

fn fetch(config: &TrackerConfig, fetcher: &HttpFetcher, source_tz: Tz) -> Result<Batch> {
    let batch = batch::fetch_batch(fetcher, &config.sources, source_tz).context("Failed to fetch matches")?;
    for failure in &batch.failures {
        warn!("{}", failure);
    }
    Ok(batch)
}

fn list(records: &[MatchRecord], json: bool) -> Result<()> {
    let now = Utc::now().with_timezone(&DISPLAY_TZ);
    let picked = selection::candidates(records, now);
    info!("{} of {} matches in the selection window", picked.len(), records.len());

    if json {
        let rows: Vec<Candidate> = picked
            .into_iter()
            .map(|record| Candidate {
                id: record.id(),
                label: selection::label(record),
                status: record.status(),
                record,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for record in picked {
            println!("{}\n    id: {}", selection::label(record), record.id());
        }
    }
    Ok(())
}

fn track(config: &TrackerConfig, selection: &Selection, watch: Option<u64>, source_tz: Tz) -> Result<()> {
    let fetcher = HttpFetcher::new(config)?;
    let competitions = config.competitions();

    let Some(interval) = watch else {
        let batch = fetch(config, &fetcher, source_tz)?;
        print!("{}", render::tracked(&selection::tracked(&batch.records, selection, &competitions)));
        return Ok(());
    };

    let mut last_good: Option<Batch> = None;
    let mut failing = false;
    loop {
        match fetch(config, &fetcher, source_tz) {
            Ok(batch) => {
                if failing {
                    info!("Data source recovered");
                    failing = false;
                }
                last_good = Some(batch);
            }
            Err(e) => {
                failing = true;
                warn!("{:#}; showing last good data", e);
            }
        }
        if let Some(batch) = &last_good {
            println!("--- {} ---", Utc::now().with_timezone(&DISPLAY_TZ).format("%H:%M:%S %Z"));
            print!("{}", render::tracked(&selection::tracked(&batch.records, selection, &competitions)));
        }
        thread::sleep(Duration::from_secs(interval));
    }
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = TrackerConfig::from_env();
    let source_tz = config.source_tz()?;

    match cli.command {
        Commands::List { file: Some(path), competition, json } => {
            let html = fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
            let records = fixture_page::parse_page(&html, &competition, source_tz)?;
            list(&records, json)?;
        }
        Commands::List { file: None, json, .. } => {
            let fetcher = HttpFetcher::new(&config)?;
            let batch = fetch(&config, &fetcher, source_tz)?;
            list(&batch.records, json)?;
        }
        Commands::Track { matches, link, watch } => {
            let selection = match (matches, link) {
                (Some(ids), _) => Selection::from_list(&ids)?,
                (None, Some(link)) => selection::parse_share_query(&link)?,
                (None, None) => anyhow::bail!("Pass --matches or --link"),
            };
            track(&config, &selection, watch, source_tz)?;
        }
        Commands::Share { matches } => {
            let selection = Selection::from_list(&matches)?;
            println!("{}", selection::share_link(&config.share_base_url, &selection));
        }
        Commands::Export { out } => {
            let fetcher = HttpFetcher::new(&config)?;
            let batch = fetch(&config, &fetcher, source_tz)?;
            let file = fs::File::create(&out).with_context(|| format!("Failed to create {:?}", out))?;
            export::write_csv(&batch.records, file)?;
            info!("Wrote {} matches to {:?}", batch.records.len(), out);
        }
    }

    Ok(())
}
