use crate::data_processing::atp_api::season_weeks;
use crate::domain::{Prediction, PredictionSet};
use crate::error::{BattleError, Result};
use crate::series::TrailingGaps;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Knobs for the rankings page fetcher.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct FetchConfig {
    pub base_url: String,
    pub rank_range: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_base_millis: u64,
    pub max_workers: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.atptour.com/en/rankings/singles".to_owned(),
            rank_range: "0-100".to_owned(),
            connect_timeout_secs: 5,
            timeout_secs: 10,
            max_retries: 2,
            backoff_base_millis: 500,
            max_workers: 10,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36"
                .to_owned(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct ParticipantEntry {
    name: String,
    order: Vec<String>,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("../data/atp_rankings_cache.json")
}

/// The configuration file as written by hand.
#[derive(Deserialize, Debug)]
struct BattleConfigFile {
    season_start: NaiveDate,
    season_end: Option<NaiveDate>,
    name_map: BTreeMap<String, String>,
    participants: Vec<ParticipantEntry>,
    #[serde(default)]
    carry_forward_trailing: bool,
    #[serde(default)]
    fetch: FetchConfig,
    #[serde(default = "default_cache_path")]
    cache_path: PathBuf,
}

/// Validated, immutable description of one guess battle.
#[derive(Debug, Clone)]
pub struct BattleConfig {
    pub season_start: NaiveDate,
    pub season_end: Option<NaiveDate>,
    pub name_map: BTreeMap<String, String>,
    pub predictions: PredictionSet,
    pub trailing_gaps: TrailingGaps,
    pub fetch: FetchConfig,
    pub cache_path: PathBuf,
}

impl BattleConfig {
    pub fn from_file(source: impl AsRef<Path>) -> Result<Self> {
        let source = source.as_ref();
        let text = std::fs::read_to_string(source)?;
        let config = Self::from_json5(&text)?;
        tracing::info!(
            "Loaded {} participants from {:?}",
            config.predictions.len(),
            source
        );
        Ok(config)
    }

    pub fn from_json5(text: &str) -> Result<Self> {
        let file: BattleConfigFile = json5::from_str(text)?;
        file.try_into()
    }

    /// Full names of every player the fetcher looks for.
    pub fn tracked_players(&self) -> BTreeSet<&str> {
        self.name_map.values().map(String::as_str).collect()
    }

    /// Ranking weeks from the season start through `season_end`, or through `today`.
    pub fn weeks(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let end = self.season_end.map_or(today, |end| end.min(today));
        season_weeks(self.season_start, end)
    }
}

impl TryFrom<BattleConfigFile> for BattleConfig {
    type Error = BattleError;

    fn try_from(file: BattleConfigFile) -> Result<Self> {
        if file.season_start.weekday() != Weekday::Mon {
            return Err(BattleError::Config(format!(
                "season_start {} is a {}, rankings are published on Mondays",
                file.season_start,
                file.season_start.weekday()
            )));
        }
        if let Some(end) = file.season_end {
            if end < file.season_start {
                return Err(BattleError::Config(format!(
                    "season_end {} precedes season_start {}",
                    end, file.season_start
                )));
            }
        }

        let predictions = file
            .participants
            .into_iter()
            .map(|entry| Prediction::parse(entry.name, entry.order))
            .collect::<Result<Vec<_>>>()?;
        let predictions = PredictionSet::new(predictions)?;

        let tracked: BTreeSet<&str> = file.name_map.values().map(String::as_str).collect();
        for prediction in &predictions {
            for name in prediction.order() {
                if !tracked.contains(name.as_str()) {
                    tracing::warn!(
                        "{} picked {}, who is not tracked and will never be ranked",
                        prediction.owner(),
                        name
                    );
                }
            }
        }

        let trailing_gaps = if file.carry_forward_trailing {
            TrailingGaps::CarryForward
        } else {
            TrailingGaps::Undefined
        };

        Ok(Self {
            season_start: file.season_start,
            season_end: file.season_end,
            name_map: file.name_map,
            predictions,
            trailing_gaps,
            fetch: file.fetch,
            cache_path: file.cache_path,
        })
    }
}
