use anyhow::Context;
use guess_battle::battle_config::BattleConfig;
use guess_battle::data_processing::read_ranking_table;
use guess_battle::series::build_series;
use guess_battle::summary::print_leaderboard;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Scores every guess against the cached rankings and writes the leaderboard
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 4 {
        tracing::error!("Usage: {} [config_file] [rankings_file] [output_dir]", args[0]);
        return Ok(());
    }
    let config_file = args.get(1).map_or("config/battle.json5", String::as_str);
    let config = BattleConfig::from_file(config_file)
        .with_context(|| format!("Failed to load {}", config_file))?;
    let rankings_file = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.cache_path.clone());
    let dir = args
        .get(3)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("../data/output"));

    let table = read_ranking_table(&rankings_file)
        .with_context(|| format!("Failed to read rankings from {:?}", rankings_file))?;
    if table.is_empty() {
        anyhow::bail!("{:?} contains no ranking weeks", rankings_file);
    }

    let series = build_series(&table, &config.predictions, config.trailing_gaps);
    std::fs::create_dir_all(&dir).context("Could not create output directory")?;
    print_leaderboard(&series, &dir)?;
    Ok(())
}
