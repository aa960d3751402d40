use crate::data_processing::{write_json, write_slice_to_file};
use crate::error::Result;
use crate::series::ScoreSeries;
use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeekLeader {
    pub date: NaiveDate,
    pub participant: String,
    pub score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    pub holder: String,
    pub weeks: usize,
    pub first_week: NaiveDate,
    pub last_week: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub holder: String,
    pub value: f64,
    pub date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BestAverage {
    pub holder: String,
    pub value: f64,
}

/// Descriptive statistics of one participant's gap-filled series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub participant: String,
    pub weeks_scored: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub weeks_at_first: usize,
    pub best_rank: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub participant: String,
    pub score: Option<f64>,
    pub rank: Option<usize>,
}

/// Every participant's score and rank in one week.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeekStanding {
    pub date: NaiveDate,
    pub leader: Option<String>,
    pub entries: Vec<StandingEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardSummary {
    pub current_leader: Option<WeekLeader>,
    pub longest_streak: Option<Streak>,
    pub global_minimum: Option<Record>,
    pub best_average: Option<BestAverage>,
    pub participants: Vec<ParticipantSummary>,
    pub weeks: Vec<WeekStanding>,
}

/// Gap-filled value of week `week`; series shorter than the shared axis are
/// undefined past their end.
fn filled_at(series: &ScoreSeries, week: usize) -> Option<f64> {
    series.filled.get(week).copied().flatten()
}

/// The lowest score of each week. Exact ties go to whoever is listed first;
/// a week in which nobody has a score has no leader.
pub fn weekly_leaders(series: &[ScoreSeries]) -> Vec<Option<WeekLeader>> {
    let Some(axis) = series.first() else {
        return vec![];
    };
    axis.dates
        .iter()
        .enumerate()
        .map(|(week, &date)| {
            series
                .iter()
                .filter_map(|s| filled_at(s, week).map(|score| (s, score)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(s, score)| WeekLeader {
                    date,
                    participant: s.participant.clone(),
                    score,
                })
        })
        .collect()
}

/// Rank of every participant in every week, indexed `[week][participant]`.
/// Equal scores share the lower rank, so tied leaders are both ranked 1.
pub fn weekly_ranks(series: &[ScoreSeries]) -> Vec<Vec<Option<usize>>> {
    let num_weeks = series.first().map_or(0, ScoreSeries::len);
    (0..num_weeks)
        .map(|week| {
            let scores: Vec<Option<f64>> = series.iter().map(|s| filled_at(s, week)).collect();
            scores
                .iter()
                .map(|&score| {
                    let score = score?;
                    let better = scores.iter().flatten().filter(|&&other| other < score);
                    Some(1 + better.count())
                })
                .collect()
        })
        .collect()
}

/// Finds the longest run of consecutive equal holders, returning the holder,
/// the index where the run starts, and its length. A later run must be
/// strictly longer to replace an earlier one; `None` entries break runs.
pub fn longest_run<'a>(holders: &[Option<&'a str>]) -> Option<(&'a str, usize, usize)> {
    let mut best: Option<(&str, usize, usize)> = None;
    let mut start = 0;
    let runs = holders.iter().chunk_by(|holder| **holder);
    for (holder, run) in &runs {
        let len = run.count();
        if let Some(holder) = holder {
            if best.is_none_or(|(_, _, best_len)| len > best_len) {
                best = Some((holder, start, len));
            }
        }
        start += len;
    }
    best
}

pub fn longest_streak(leaders: &[Option<WeekLeader>]) -> Option<Streak> {
    let holders: Vec<Option<&str>> = leaders
        .iter()
        .map(|leader| leader.as_ref().map(|l| l.participant.as_str()))
        .collect();
    let (holder, start, weeks) = longest_run(&holders)?;
    let first_week = leaders[start].as_ref()?.date;
    let last_week = leaders[start + weeks - 1].as_ref()?.date;
    Some(Streak {
        holder: holder.to_owned(),
        weeks,
        first_week,
        last_week,
    })
}

/// The single lowest score anywhere, scanning participants in order and then
/// weeks in order; the first occurrence wins ties.
pub fn global_minimum(series: &[ScoreSeries]) -> Option<Record> {
    let mut best: Option<Record> = None;
    for s in series {
        for point in s.points() {
            let Some(value) = point.value else { continue };
            if best.as_ref().is_none_or(|b| value < b.value) {
                best = Some(Record {
                    holder: s.participant.clone(),
                    value,
                    date: point.date,
                });
            }
        }
    }
    best
}

fn participant_summary(
    series: &ScoreSeries,
    ranks: impl Iterator<Item = Option<usize>>,
) -> ParticipantSummary {
    let values: Vec<f64> = series.defined_values().collect();
    let ranks: Vec<usize> = ranks.flatten().collect();
    let nonempty = !values.is_empty();
    let std_dev = Statistics::std_dev(values.iter());

    ParticipantSummary {
        participant: series.participant.clone(),
        weeks_scored: values.len(),
        min: nonempty.then(|| Statistics::min(values.iter())),
        max: nonempty.then(|| Statistics::max(values.iter())),
        mean: nonempty.then(|| Statistics::mean(values.iter())),
        std_dev: (values.len() > 1 && std_dev.is_finite()).then_some(std_dev),
        weeks_at_first: ranks.iter().filter(|&&rank| rank == 1).count(),
        best_rank: ranks.iter().copied().min(),
    }
}

/// Aggregates all participants' gap-filled series into the leaderboard.
/// Weeks follow the first series' date axis; `build_series` gives every
/// series the same one.
pub fn make_leaderboard(series: &[ScoreSeries]) -> LeaderboardSummary {
    let leaders = weekly_leaders(series);
    let ranks = weekly_ranks(series);

    let participants: Vec<ParticipantSummary> = series
        .iter()
        .enumerate()
        .map(|(idx, s)| participant_summary(s, ranks.iter().map(|week| week[idx])))
        .collect();

    let best_average = participants
        .iter()
        .filter_map(|p| p.mean.map(|mean| (p, mean)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(p, value)| BestAverage {
            holder: p.participant.clone(),
            value,
        });

    let weeks = leaders
        .iter()
        .zip(&ranks)
        .enumerate()
        .map(|(week, (leader, week_ranks))| WeekStanding {
            date: series[0].dates[week],
            leader: leader.as_ref().map(|l| l.participant.clone()),
            entries: series
                .iter()
                .zip(week_ranks)
                .map(|(s, &rank)| StandingEntry {
                    participant: s.participant.clone(),
                    score: filled_at(s, week),
                    rank,
                })
                .collect(),
        })
        .collect();

    LeaderboardSummary {
        current_leader: leaders.last().cloned().flatten(),
        longest_streak: longest_streak(&leaders),
        global_minimum: global_minimum(series),
        best_average,
        participants,
        weeks,
    }
}

/// Flattens the gap-filled series into `date,<participant>,...` rows,
/// leaving undefined weeks blank.
pub fn series_rows(series: &[ScoreSeries]) -> Vec<Vec<String>> {
    let header = std::iter::once("date".to_owned())
        .chain(series.iter().map(|s| s.participant.clone()))
        .collect();
    let num_weeks = series.first().map_or(0, ScoreSeries::len);
    let body = (0..num_weeks).map(|week| {
        std::iter::once(series[0].dates[week].to_string())
            .chain(
                series
                    .iter()
                    .map(|s| filled_at(s, week).map_or_else(String::new, |v| format!("{:.4}", v))),
            )
            .collect()
    });
    std::iter::once(header).chain(body).collect()
}

fn write_rows(rows: &[Vec<String>], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    tracing::info!("Successfully wrote to {:?}", path);
    Ok(())
}

/// Logs the headline cards and writes `series.csv`, `participants.csv` and
/// `summary.json` into `dir`.
pub fn print_leaderboard(
    series: &[ScoreSeries],
    dir: impl AsRef<Path>,
) -> Result<LeaderboardSummary> {
    let dir = dir.as_ref();
    let summary = make_leaderboard(series);

    match &summary.current_leader {
        Some(l) => tracing::info!("Current leader: {} ({:.4} on {})", l.participant, l.score, l.date),
        None => tracing::info!("Nobody could be scored in the latest week"),
    }
    if let Some(s) = &summary.longest_streak {
        tracing::info!(
            "Longest streak: {} led for {} weeks ({} to {})",
            s.holder,
            s.weeks,
            s.first_week,
            s.last_week
        );
    }
    if let Some(r) = &summary.global_minimum {
        tracing::info!("Closest ever: {} with {:.4} on {}", r.holder, r.value, r.date);
    }
    if let Some(b) = &summary.best_average {
        tracing::info!("Best average: {} with {:.4}", b.holder, b.value);
    }
    for p in &summary.participants {
        tracing::info!(
            "{:>12}: weeks #1 {:3}, best rank {:?}, mean {:?}",
            p.participant,
            p.weeks_at_first,
            p.best_rank,
            p.mean
        );
    }

    write_rows(&series_rows(series), &dir.join("series.csv"))?;
    write_slice_to_file(&summary.participants, dir.join("participants.csv"))?;
    write_json(&summary, dir.join("summary.json"))?;
    Ok(summary)
}
