use crate::domain::{LeaderboardSummary, ParticipantName, WeekStanding};
use chrono::NaiveDate;
use guess_battle::BattleError;
use guess_battle::battle_config::BattleConfig;
use guess_battle::data_processing::{RankingTable, read_ranking_table};
use guess_battle::series::{ScoreSeries, build_series};
use guess_battle::summary::make_leaderboard;
use std::path::Path;

/// Every series and the leaderboard, computed once at startup and then only read.
pub struct ImmutableBattleDatabase {
    series: Vec<ScoreSeries>,
    summary: LeaderboardSummary,
}

impl ImmutableBattleDatabase {
    pub fn new(
        battle_config: impl AsRef<Path>,
        rankings: impl AsRef<Path>,
    ) -> Result<Self, BattleError> {
        let config = BattleConfig::from_file(battle_config)?;
        let table = read_ranking_table(rankings)?;
        Ok(Self::from_parts(&config, &table))
    }

    pub fn from_parts(config: &BattleConfig, table: &RankingTable) -> Self {
        let series = build_series(table, &config.predictions, config.trailing_gaps);
        let summary = make_leaderboard(&series);
        tracing::info!(
            "Scored {} participants over {} weeks",
            series.len(),
            table.len()
        );
        Self { series, summary }
    }

    pub fn summary(&self) -> &LeaderboardSummary {
        &self.summary
    }

    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.participant.as_str())
    }

    pub fn series_of(&self, participant: &ParticipantName) -> Option<&ScoreSeries> {
        self.series
            .iter()
            .find(|s| s.participant == participant.as_ref())
    }

    pub fn week(&self, date: NaiveDate) -> Option<&WeekStanding> {
        self.summary.weeks.iter().find(|week| week.date == date)
    }
}
