//! Minimal CLI parsing for the `newznab` binary.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};

use newznab::SearchType;
use newznab::categories::parse_codes;

pub const USAGE: &str = "\
usage: newznab <command> [options]

commands:
  caps
  search <query> [--type T] [--cat A,B]
  tvdb|tvrage|tvmaze <id> <season> <episode> [--cat A,B]
  imdb <id> [--cat A,B]
  rss [--num N] [--cat A,B] [--until GUID] [--max-pages M]
  details <guid>
  comments <guid>
  get <guid> <output file>

configuration comes from NEWZNAB_URL, NEWZNAB_API_KEY, NEWZNAB_USER_ID,
NEWZNAB_INSECURE, NEWZNAB_EXTENDED and NEWZNAB_TIMEOUT_SECS (a .env file is
read if present)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TvSource {
    TvDb,
    TvRage,
    TvMaze,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Caps,
    Search {
        query: String,
        search_type: SearchType,
        categories: Vec<i32>,
    },
    Tv {
        source: TvSource,
        id: i64,
        season: i32,
        episode: i32,
        categories: Vec<i32>,
    },
    Imdb {
        id: String,
        categories: Vec<i32>,
    },
    Rss {
        num: u32,
        categories: Vec<i32>,
        until: Option<String>,
        max_pages: u32,
    },
    Details {
        guid: String,
    },
    Comments {
        guid: String,
    },
    Get {
        guid: String,
        output: PathBuf,
    },
    Help,
}

/// Options shared by several commands
#[derive(Debug, Default)]
struct Flags {
    categories: Vec<i32>,
    search_type: Option<String>,
    num: Option<u32>,
    until: Option<String>,
    max_pages: Option<u32>,
}

impl Command {
    pub fn from_args() -> Result<Self> {
        Self::parse(std::env::args().skip(1))
    }

    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut positional = Vec::new();
        let mut flags = Flags::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let (key, inline) = match arg.split_once('=') {
                Some((k, v)) if k.starts_with("--") => (k.to_string(), Some(v.to_string())),
                _ => (arg.clone(), None),
            };
            let mut value = |name: &str| -> Result<String> {
                inline
                    .clone()
                    .or_else(|| args.next())
                    .ok_or_else(|| anyhow!("{} needs a value", name))
            };

            match key.as_str() {
                "-h" | "--help" => return Ok(Command::Help),
                "--cat" => flags.categories = parse_codes(&value("--cat")?),
                "--type" => flags.search_type = Some(value("--type")?),
                "--num" => flags.num = Some(number(&value("--num")?, "--num")?),
                "--until" => flags.until = Some(value("--until")?),
                "--max-pages" => flags.max_pages = Some(number(&value("--max-pages")?, "--max-pages")?),
                _ if key.starts_with("--") => bail!("unknown option {}", key),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let Some(command) = positional.next() else {
            return Ok(Command::Help);
        };
        let mut next = |what: &str| {
            positional
                .next()
                .ok_or_else(|| anyhow!("{} requires <{}>", command, what))
        };

        let parsed = match command.as_str() {
            "caps" => Command::Caps,
            "search" => Command::Search {
                query: next("query")?,
                search_type: flags
                    .search_type
                    .as_deref()
                    .unwrap_or("search")
                    .parse()
                    .unwrap_or_default(),
                categories: flags.categories,
            },
            "tvdb" | "tvrage" | "tvmaze" => {
                let source = match command.as_str() {
                    "tvdb" => TvSource::TvDb,
                    "tvrage" => TvSource::TvRage,
                    _ => TvSource::TvMaze,
                };
                Command::Tv {
                    source,
                    id: number(&next("id")?, "id")?,
                    season: number(&next("season")?, "season")?,
                    episode: number(&next("episode")?, "episode")?,
                    categories: flags.categories,
                }
            }
            "imdb" => Command::Imdb {
                id: next("id")?,
                categories: flags.categories,
            },
            "rss" => Command::Rss {
                num: flags.num.unwrap_or(100),
                categories: flags.categories,
                until: flags.until,
                max_pages: flags.max_pages.unwrap_or(0),
            },
            "details" => Command::Details { guid: next("guid")? },
            "comments" => Command::Comments { guid: next("guid")? },
            "get" => Command::Get {
                guid: next("guid")?,
                output: PathBuf::from(next("output file")?),
            },
            "help" => Command::Help,
            other => bail!("unknown command {}", other),
        };

        Ok(parsed)
    }
}

fn number<T: std::str::FromStr>(value: &str, name: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .ok()
        .with_context(|| format!("{} must be a number, got {:?}", name, value))
}
