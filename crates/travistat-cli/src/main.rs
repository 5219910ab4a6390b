//! travistat CLI - command-line client for the travistat statistics service.
//!
//! Fetches player, alliance, and region rankings from the daily map dump,
//! caching each day's lists locally so repeated invocations on the same UTC
//! day hit the network at most once. Also manages saved dashboard layouts.

use std::io::{self, Read};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use travistat_core::models::{filter_npc_alliances, filter_npc_players};
use travistat_core::{
    ApiClient, CachedApi, Config, DailyCache, FileStore, LayoutStore, SystemClock,
};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn usage() -> ! {
    eprintln!(
        "Usage: travistat <command> [options]\n\
         \n\
         Commands:\n\
         \x20 players [--limit N] [--refresh]   player ranking\n\
         \x20 alliances [--refresh]             alliance ranking\n\
         \x20 regions [--refresh]               region list\n\
         \x20 history <player>                  a player's day-by-day series\n\
         \x20 layouts                           saved dashboard layouts\n\
         \x20 layout-save <name>                save layout, widgets JSON on stdin\n\
         \x20 layout-load <id>                  activate a layout, print its widgets\n\
         \x20 layout-delete <id>                delete a layout\n\
         \x20 clear-cache                       drop all cached daily lists"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else { usage() };

    let mut config = Config::load().context("Failed to load config")?;
    info!(command = %command, "travistat starting");
    if let Ok(url) = std::env::var("TRAVISTAT_API_URL") {
        config.api_base_url = Some(url);
    }

    let store = Arc::new(
        FileStore::open(config.store_path()?).context("Failed to open backing store")?,
    );
    let clock = Arc::new(SystemClock);
    let cache = Arc::new(DailyCache::new(store.clone(), clock.clone()));
    let api = CachedApi::new(ApiClient::new(config.api_base_url())?, cache);
    let layouts = LayoutStore::new(store, clock);

    let rest = &args[1..];
    match command.as_str() {
        "players" => cmd_players(&api, rest).await,
        "alliances" => cmd_alliances(&api, rest).await,
        "regions" => cmd_regions(&api, rest).await,
        "history" => cmd_history(&api, rest).await,
        "layouts" => cmd_layouts(&layouts),
        "layout-save" => cmd_layout_save(&layouts, rest),
        "layout-load" => cmd_layout_load(&layouts, rest),
        "layout-delete" => cmd_layout_delete(&layouts, rest),
        "clear-cache" => {
            api.invalidate_all();
            println!("Cache cleared");
            Ok(())
        }
        _ => usage(),
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

async fn cmd_players(api: &CachedApi, args: &[String]) -> Result<()> {
    let limit = flag_value(args, "--limit")
        .map(|v| v.parse().context("--limit expects a number"))
        .transpose()?;
    let players = api.players(limit, has_flag(args, "--refresh")).await?;
    let players = filter_npc_players(players);

    println!("{:<6} {:<24} {:<10} {:>9} {:>12}", "#", "Player", "Alliance", "Villages", "Population");
    for (rank, p) in players.iter().enumerate() {
        println!(
            "{:<6} {:<24} {:<10} {:>9} {:>12}",
            rank + 1,
            p.name,
            p.display_alliance(),
            p.villages,
            p.population
        );
    }
    Ok(())
}

async fn cmd_alliances(api: &CachedApi, args: &[String]) -> Result<()> {
    let alliances = api.alliances(has_flag(args, "--refresh")).await?;
    let alliances = filter_npc_alliances(alliances);

    println!("{:<12} {:>8} {:>9} {:>12} {:<16}", "Alliance", "Players", "Villages", "Population", "Top region");
    for a in &alliances {
        println!(
            "{:<12} {:>8} {:>9} {:>12} {:<16}",
            a.alliance,
            a.players.unwrap_or(0),
            a.villages.unwrap_or(0),
            a.population.unwrap_or(0),
            a.top_region.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

async fn cmd_regions(api: &CachedApi, args: &[String]) -> Result<()> {
    let regions = api.regions(has_flag(args, "--refresh")).await?;

    println!("{:<20} {:>9} {:>12}", "Region", "Villages", "Population");
    for r in &regions {
        println!(
            "{:<20} {:>9} {:>12}",
            r.region,
            r.villages.unwrap_or(0),
            r.population.unwrap_or(0)
        );
    }
    Ok(())
}

async fn cmd_history(api: &CachedApi, args: &[String]) -> Result<()> {
    let Some(player) = args.first() else { usage() };
    let history = api.player_history(player).await?;

    println!("{:<12} {:>9} {:>12} {:>8}", "Date", "Villages", "Population", "VP");
    for point in &history {
        println!(
            "{:<12} {:>9} {:>12} {:>8}",
            point.dump_date, point.villages, point.population, point.victory_points
        );
    }
    Ok(())
}

fn cmd_layouts(layouts: &LayoutStore) -> Result<()> {
    let active = layouts.active_layout_id();
    for layout in layouts.list() {
        let marker = if active.as_deref() == Some(layout.id.as_str()) { "*" } else { " " };
        println!(
            "{} {:<28} {:<20} {} widgets",
            marker,
            layout.id,
            layout.name,
            layout.widgets.len()
        );
    }
    Ok(())
}

fn cmd_layout_save(layouts: &LayoutStore, args: &[String]) -> Result<()> {
    let Some(name) = args.first() else { usage() };

    let mut raw = String::new();
    io::stdin()
        .read_to_string(&mut raw)
        .context("Failed to read widgets from stdin")?;
    let widgets: Vec<serde_json::Value> =
        serde_json::from_str(&raw).context("Widgets must be a JSON array")?;

    match layouts.save(name, &widgets)? {
        Some(id) => println!("Saved layout {}", id),
        None => eprintln!("Layout name must not be blank"),
    }
    Ok(())
}

fn cmd_layout_load(layouts: &LayoutStore, args: &[String]) -> Result<()> {
    let Some(id) = args.first() else { usage() };
    match layouts.load(id)? {
        Some(widgets) => println!("{}", serde_json::to_string_pretty(&widgets)?),
        None => eprintln!("No layout with id {}", id),
    }
    Ok(())
}

fn cmd_layout_delete(layouts: &LayoutStore, args: &[String]) -> Result<()> {
    let Some(id) = args.first() else { usage() };
    layouts.delete(id)?;
    println!("Deleted {}", id);
    Ok(())
}
