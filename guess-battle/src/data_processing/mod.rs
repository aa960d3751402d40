pub mod atp_api;

use crate::error::{BattleError, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime};
use serde::Deserializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Persisted stand-in for "not ranked in the tracked range this week".
pub const UNRANKED_SENTINEL: u32 = 150;

/// One week of observed ranks for every tracked player.
/// `None` marks a player who was not found in the rankings that week.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "SnapshotRecord", try_from = "SnapshotRecord")]
pub struct RankSnapshot {
    pub date: NaiveDate,
    pub ranks: BTreeMap<String, Option<u32>>,
}

impl RankSnapshot {
    /// A week in which none of the given players could be found.
    pub fn unranked<S: Into<String>>(date: NaiveDate, players: impl IntoIterator<Item = S>) -> Self {
        Self {
            date,
            ranks: players.into_iter().map(|name| (name.into(), None)).collect(),
        }
    }

    /// Returns the player's rank, or `None` if untracked or unranked.
    pub fn rank_of(&self, player: &str) -> Option<u32> {
        self.ranks.get(player).copied().flatten()
    }

    pub fn set_rank(&mut self, player: impl Into<String>, rank: u32) {
        self.ranks.insert(player.into(), to_rank(rank));
    }

    pub fn is_fully_unranked(&self) -> bool {
        self.ranks.values().all(Option::is_none)
    }
}

fn to_rank(raw: u32) -> Option<u32> {
    (raw < UNRANKED_SENTINEL).then_some(raw)
}

/// The flat `{ <player>: <rank>, ..., "date": <iso-date> }` row of the cache file.
#[derive(Clone, Serialize, Deserialize)]
struct SnapshotRecord {
    #[serde(flatten)]
    ranks: BTreeMap<String, u32>,
    date: NaiveDate,
}

impl From<RankSnapshot> for SnapshotRecord {
    fn from(snapshot: RankSnapshot) -> Self {
        let ranks = snapshot
            .ranks
            .into_iter()
            .map(|(name, rank)| (name, rank.unwrap_or(UNRANKED_SENTINEL)))
            .collect();
        Self {
            ranks,
            date: snapshot.date,
        }
    }
}

impl TryFrom<SnapshotRecord> for RankSnapshot {
    type Error = String;

    fn try_from(record: SnapshotRecord) -> std::result::Result<Self, Self::Error> {
        if let Some((name, _)) = record.ranks.iter().find(|&(_, &rank)| rank == 0) {
            return Err(format!("{} has rank 0 on {}", name, record.date));
        }
        let ranks = record
            .ranks
            .into_iter()
            .map(|(name, rank)| (name, to_rank(rank)))
            .collect();
        Ok(Self {
            date: record.date,
            ranks,
        })
    }
}

/// Weekly snapshots in ascending date order, at most one per date.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RankingTable {
    snapshots: Vec<RankSnapshot>,
}

impl RankingTable {
    pub fn new(mut snapshots: Vec<RankSnapshot>) -> Result<Self> {
        snapshots.sort_by_key(|snapshot| snapshot.date);
        if let Some(pair) = snapshots.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(BattleError::RankingData(format!(
                "week {} appears more than once",
                pair[0].date
            )));
        }
        Ok(Self { snapshots })
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[RankSnapshot] {
        &self.snapshots
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.snapshots.iter().map(|snapshot| snapshot.date).collect()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&RankSnapshot> {
        self.snapshots
            .binary_search_by_key(&date, |snapshot| snapshot.date)
            .ok()
            .map(|idx| &self.snapshots[idx])
    }

    pub fn latest(&self) -> Option<&RankSnapshot> {
        self.snapshots.last()
    }

    /// Every player name appearing in at least one snapshot, sorted.
    pub fn players(&self) -> Vec<String> {
        let mut players: Vec<String> = self
            .snapshots
            .iter()
            .flat_map(|snapshot| snapshot.ranks.keys().cloned())
            .collect();
        players.sort_unstable();
        players.dedup();
        players
    }
}

/// On-disk form of a scraped ranking table.
#[derive(Serialize, Deserialize)]
pub struct RankingCache {
    /// Written as RFC 3339.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub last_updated: DateTime<FixedOffset>,
    pub data: Vec<RankSnapshot>,
}

impl RankingCache {
    pub fn new(table: &RankingTable) -> Self {
        Self {
            last_updated: Local::now().fixed_offset(),
            data: table.snapshots().to_vec(),
        }
    }
}

/// Parses an RFC 3339 timestamp, or an offset-less ISO one taken as local time.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(stamp);
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| BattleError::RankingData(format!("bad timestamp {:?}: {}", raw, e)))?;
    let stamp = match naive.and_local_timezone(Local).earliest() {
        Some(local) => local.fixed_offset(),
        None => naive.and_utc().fixed_offset(),
    };
    Ok(stamp)
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

pub fn write_json<T: Serialize + ?Sized>(value: &T, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path.as_ref(), json)?;
    Ok(())
}

pub fn read_json<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let json = std::fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&json)?)
}

fn write_to_csv<T: Serialize>(values: &[T], path: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for val in values {
        writer.serialize(val)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes rows as JSON or CSV, depending on the file extension.
pub fn write_slice_to_file<T: Serialize>(values: &[T], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => write_json(values, path)?,
        Some("csv") => write_to_csv(values, path)?,
        _ => {
            return Err(BattleError::Config(format!(
                "{:?} has an invalid or missing filename extension",
                path
            )));
        }
    }
    tracing::info!("Successfully wrote to {:?}", path);
    Ok(())
}

/// Reads one rank cell. Blank cells and the sentinel are unranked; anything
/// else must be a positive whole number.
fn parse_csv_rank(field: &str, player: &str, date: NaiveDate) -> Result<Option<u32>> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(None);
    }
    // pandas writes integer columns as floats once a NaN has been seen
    let rank = field.parse::<u32>().ok().or_else(|| {
        field
            .parse::<f64>()
            .ok()
            .filter(|rank| rank.fract() == 0. && *rank >= 0. && *rank <= u32::MAX as f64)
            .map(|rank| rank as u32)
    });
    match rank {
        Some(0) => Err(BattleError::RankingData(format!(
            "{} has rank 0 on {}",
            player, date
        ))),
        Some(rank) => Ok(to_rank(rank)),
        None => Err(BattleError::RankingData(format!(
            "{} has malformed rank {:?} on {}",
            player, field, date
        ))),
    }
}

fn read_table_csv(path: &Path) -> Result<RankingTable> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let date_col = headers
        .iter()
        .position(|header| header == "date")
        .ok_or_else(|| BattleError::RankingData(format!("{:?} has no date column", path)))?;

    let mut snapshots = vec![];
    for record in reader.records() {
        let record = record?;
        let raw_date = record.get(date_col).unwrap_or_default();
        let date = parse_week(raw_date)?;
        let ranks = headers
            .iter()
            .zip(record.iter())
            .enumerate()
            .filter(|&(col, _)| col != date_col)
            .map(|(_, (player, field))| -> Result<(String, Option<u32>)> {
                Ok((player.to_owned(), parse_csv_rank(field, player, date)?))
            })
            .collect::<Result<_>>()?;
        snapshots.push(RankSnapshot { date, ranks });
    }
    RankingTable::new(snapshots)
}

fn write_table_csv(table: &RankingTable, path: &Path) -> Result<()> {
    let players = table.players();
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(std::iter::once("date").chain(players.iter().map(String::as_str)))?;
    for snapshot in table.snapshots() {
        let mut row = vec![snapshot.date.to_string()];
        row.extend(players.iter().map(|player| {
            snapshot
                .rank_of(player)
                .unwrap_or(UNRANKED_SENTINEL)
                .to_string()
        }));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Parses an ISO `YYYY-MM-DD` week identifier.
pub fn parse_week(raw: &str) -> Result<NaiveDate> {
    // Tolerate pandas' "2025-01-06 00:00:00" index format
    let day = raw.trim().split([' ', 'T']).next().unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| BattleError::RankingData(format!("bad week date {:?}: {}", raw, e)))
}

/// Loads a ranking table from a `.json` cache document or a flat `.csv` table.
pub fn read_ranking_table(path: impl AsRef<Path>) -> Result<RankingTable> {
    let path = path.as_ref();
    let table = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let cache: RankingCache = read_json(path)?;
            tracing::info!(
                "Read {} weeks from {:?}, last updated {}",
                cache.data.len(),
                path,
                cache.last_updated
            );
            RankingTable::new(cache.data)?
        }
        Some("csv") => read_table_csv(path)?,
        _ => {
            return Err(BattleError::Config(format!(
                "{:?} is neither a .json nor a .csv ranking table",
                path
            )));
        }
    };
    Ok(table)
}

/// Saves a ranking table as a `.json` cache document or a flat `.csv` table.
pub fn write_ranking_table(table: &RankingTable, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => write_json(&RankingCache::new(table), path)?,
        Some("csv") => write_table_csv(table, path)?,
        _ => {
            return Err(BattleError::Config(format!(
                "{:?} is neither a .json nor a .csv ranking table",
                path
            )));
        }
    }
    tracing::info!("Saved {} weeks of rankings to {:?}", table.len(), path);
    Ok(())
}
