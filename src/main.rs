mod cli;

use anyhow::Context;
use beatsaver::{BeatSaver, Error, RequestOptions, SearchKind, SortOrder};
use clap::ArgMatches;
use log::{debug, warn};
use serde::Serialize;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches();
    let log_level = matches.get_one::<String>("log-level").cloned();
    cli::init_logging(log_level.as_deref());

    if matches.get_flag("version") {
        println!("beatsaver {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let client = BeatSaver::from_env().context("failed to configure client")?;
    let opts = RequestOptions::new().with_progress(|p| debug!("progress {:.0}%", p * 100.0));

    match run(&client, &matches, &opts).await {
        Err(Error::RateLimited(info)) => {
            warn!("rate limited; {} of {} remaining", info.remaining, info.total);
            anyhow::bail!("rate limit exceeded, retry after {}", info.reset_local())
        }
        other => other.map_err(anyhow::Error::from),
    }
}

async fn run(client: &BeatSaver, matches: &ArgMatches, opts: &RequestOptions) -> beatsaver::Result<()> {
    match matches.subcommand() {
        Some(("maps", sub)) => {
            let order = sub
                .get_one::<String>("order")
                .and_then(|s| s.parse::<SortOrder>().ok())
                .unwrap_or(SortOrder::Latest);
            print_json(&client.maps(order, cli::page_arg(sub), opts).await?)
        }
        Some(("search", sub)) => {
            let query = sub.get_one::<String>("query").map(String::as_str).unwrap_or_default();
            let kind = if sub.get_flag("advanced") {
                SearchKind::Advanced
            } else {
                SearchKind::Text
            };
            print_json(&client.search(kind, query, cli::page_arg(sub), opts).await?)
        }
        Some(("map", sub)) => {
            let map = match (sub.get_one::<String>("key"), sub.get_one::<String>("hash")) {
                (Some(key), _) => client.map_by_key(key, opts).await?,
                (None, Some(hash)) => client.map_by_hash(hash, opts).await?,
                (None, None) => None,
            };
            print_json(&map)
        }
        Some(("user", sub)) => {
            let id = sub.get_one::<String>("id").map(String::as_str).unwrap_or_default();
            if sub.get_flag("maps") {
                print_json(&client.user_maps(id, cli::page_arg(sub), opts).await?)
            } else {
                print_json(&client.user(id, opts).await?)
            }
        }
        _ => {
            cli::build_cli()
                .print_help()
                .map_err(|e| Error::Config(e.to_string()))?;
            println!();
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> beatsaver::Result<()> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| Error::Config(format!("failed to serialize output: {}", e)))?;
    println!("{}", out);
    Ok(())
}
