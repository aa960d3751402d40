use anyhow::Context;
use guess_battle::battle_config::BattleConfig;
use guess_battle::data_processing::atp_api::AtpRankings;
use guess_battle::data_processing::write_ranking_table;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Scrapes every ranking week of the season and saves the cache file
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 3 {
        tracing::error!("Usage: {} [config_file] [cache_file]", args[0]);
        return Ok(());
    }
    let config_file = args.get(1).map_or("config/battle.json5", String::as_str);
    let config = BattleConfig::from_file(config_file)
        .with_context(|| format!("Failed to load {}", config_file))?;
    let cache_file = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.cache_path.clone());

    let weeks = config.weeks(chrono::Local::now().date_naive());
    let fetcher = AtpRankings::new(config.fetch.clone(), config.name_map.clone())
        .context("Failed to create HTTP client")?;
    let table = fetcher.fetch_season(&weeks)?;

    let unranked = table
        .snapshots()
        .iter()
        .filter(|snapshot| snapshot.is_fully_unranked())
        .count();
    if unranked > 0 {
        tracing::warn!("{} of {} weeks came back empty", unranked, table.len());
    }

    if let Some(dir) = cache_file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).context("Could not create cache directory")?;
    }
    write_ranking_table(&table, &cache_file)?;
    tracing::info!("Successfully saved {} weeks of data to {:?}", table.len(), cache_file);
    Ok(())
}
