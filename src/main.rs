//! `newznab` command line client
//!
//! Reads indexer settings from the environment, runs one command and prints
//! the result as JSON on stdout. Logs go to stderr.

mod cli;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newznab::{ClientConfig, NewznabClient, SearchRecord, TvId};

use crate::cli::{Command, TvSource, USAGE};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let command = Command::from_args()?;
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = ClientConfig::from_env().context("Failed to load indexer configuration")?;
    let client = NewznabClient::new(config).context("Failed to create indexer client")?;

    run(&client, command).await
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "newznab=info".into());
    let json = std::env::var("NEWZNAB_LOG_JSON").is_ok_and(|v| v == "1" || v == "true");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(client: &NewznabClient, command: Command) -> Result<()> {
    match command {
        Command::Caps => {
            let caps = client.capabilities().await.context("Capabilities request failed")?;
            print_json(&caps)
        }
        Command::Search {
            query,
            search_type,
            categories,
        } => {
            let results = client
                .search_with_query(&categories, &query, &search_type)
                .await
                .with_context(|| format!("Search for {:?} failed", query))?;
            print_json(&results)
        }
        Command::Tv {
            source,
            id,
            season,
            episode,
            categories,
        } => {
            let id = match source {
                TvSource::TvDb => TvId::TvDb(id),
                TvSource::TvRage => TvId::Rage(id),
                TvSource::TvMaze => TvId::TvMaze(id),
            };
            let results = client
                .search_with_tv_id(&categories, id, season, episode)
                .await
                .context("TV search failed")?;
            print_json(&results)
        }
        Command::Imdb { id, categories } => {
            let results = client
                .search_with_imdb(&categories, &id)
                .await
                .with_context(|| format!("Movie search for {} failed", id))?;
            print_json(&results)
        }
        Command::Rss {
            num,
            categories,
            until,
            max_pages,
        } => {
            let results = match until {
                Some(marker) => client
                    .load_rss_until_marker(&categories, num, &marker, max_pages)
                    .await
                    .context("RSS polling failed")?,
                None => client
                    .load_rss_feed(&categories, num)
                    .await
                    .context("RSS request failed")?,
            };
            print_json(&results)
        }
        Command::Details { guid } => {
            let record = client
                .details(&guid)
                .await
                .with_context(|| format!("Details request for {} failed", guid))?;
            print_json(&record)
        }
        Command::Comments { guid } => {
            let mut record = SearchRecord {
                id: guid,
                ..Default::default()
            };
            client
                .populate_comments(&mut record)
                .await
                .with_context(|| format!("Comments request for {} failed", record.id))?;
            print_json(&record.comments)
        }
        Command::Get { guid, output } => {
            let record = SearchRecord {
                id: guid,
                ..Default::default()
            };
            let payload = client
                .download(&record)
                .await
                .with_context(|| format!("Download of {} failed", record.id))?;
            tokio::fs::write(&output, &payload)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            tracing::info!(path = %output.display(), size = payload.len(), "Saved payload");
            Ok(())
        }
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", rendered);
    Ok(())
}
