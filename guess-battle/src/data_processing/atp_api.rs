use super::{RankSnapshot, RankingTable};
use crate::battle_config::FetchConfig;
use crate::error::{BattleError, Result};
use chrono::{Days, NaiveDate};
use itertools::Itertools;
use rayon::prelude::*;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use select::document::Document;
use select::node::Node;
use select::predicate::{Class, Name, Predicate};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const RETRY_STATUSES: [StatusCode; 5] = [
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Every ranking Monday from `start` through `end`, one week apart.
pub fn season_weeks(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    (0..)
        .map(|n| nth_week(start, n))
        .take_while(|&week| week <= end)
        .collect()
}

/// Extracts the tracked players' ranks from one rankings page.
/// `name_map` translates the page's short names ("J. Sinner") into full names;
/// players it names but the page doesn't list stay unranked.
pub fn parse_rankings(
    html: &str,
    date: NaiveDate,
    name_map: &BTreeMap<String, String>,
) -> RankSnapshot {
    let mut snapshot = RankSnapshot::unranked(date, name_map.values().cloned());
    let document = Document::from(html);
    let rows = Name("table")
        .and(Class("mega-table"))
        .descendant(Name("tbody"))
        .descendant(Name("tr"));

    for (rank, short_name) in document.find(rows).filter_map(parse_row) {
        if let Some(full_name) = name_map.get(&short_name) {
            tracing::debug!("{}: {} is ranked {}", date, full_name, rank);
            snapshot.set_rank(full_name.clone(), rank);
        }
    }
    snapshot
}

fn parse_row(row: Node) -> Option<(u32, String)> {
    let rank_cell = row.find(Name("td").and(Class("rank"))).next()?;
    let name_cell = row.find(Name("td").and(Class("player"))).next()?;
    // Shared places are printed as "T5"
    let rank = rank_cell
        .text()
        .trim()
        .trim_start_matches('T')
        .parse::<u32>()
        .ok()
        .filter(|&rank| rank > 0)?;
    let short_name = name_cell.find(Class("lastName")).next()?.text();
    Some((rank, short_name.split_whitespace().join(" ")))
}

/// Blocking client for the weekly singles rankings pages.
pub struct AtpRankings {
    client: Client,
    config: FetchConfig,
    name_map: BTreeMap<String, String>,
}

impl AtpRankings {
    pub fn new(config: FetchConfig, name_map: BTreeMap<String, String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            config,
            name_map,
        })
    }

    pub fn week_url(&self, date: NaiveDate) -> String {
        format!(
            "{}?rankDate={date}&dateWeek={date}&rankRange={}",
            self.config.base_url, self.config.rank_range
        )
    }

    /// GETs a page, retrying transient failures up to `max_retries` times.
    fn get_page(&self, url: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            let retries_left = attempt < self.config.max_retries;
            match self.client.get(url).send() {
                Ok(response) if retries_left && RETRY_STATUSES.contains(&response.status()) => {
                    tracing::warn!("{} answered {}, retrying", url, response.status());
                }
                Ok(response) => return Ok(response.error_for_status()?.text()?),
                Err(err) if retries_left && (err.is_timeout() || err.is_connect()) => {
                    tracing::warn!("Request to {} failed: {}, retrying", url, err);
                }
                Err(err) => return Err(err.into()),
            }
            std::thread::sleep(backoff_delay(self.config.backoff_base_millis, attempt));
            attempt += 1;
        }
    }

    pub fn fetch_week(&self, date: NaiveDate) -> Result<RankSnapshot> {
        let html = self.get_page(&self.week_url(date))?;
        Ok(parse_rankings(&html, date, &self.name_map))
    }

    /// Like `fetch_week`, but a failed week comes back with every player unranked.
    pub fn fetch_week_or_unranked(&self, date: NaiveDate) -> RankSnapshot {
        self.fetch_week(date).unwrap_or_else(|err| {
            tracing::warn!("Error fetching {}: {}", date, err);
            RankSnapshot::unranked(date, self.name_map.values().cloned())
        })
    }

    /// Fetches the given weeks in parallel on at most `max_workers` threads.
    pub fn fetch_season(&self, weeks: &[NaiveDate]) -> Result<RankingTable> {
        tracing::info!("Fetching {} weeks of data...", weeks.len());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.max_workers.max(1))
            .build()
            .map_err(|e| BattleError::Config(format!("cannot start fetch workers: {}", e)))?;

        let completed = AtomicUsize::new(0);
        let snapshots = pool.install(|| {
            weeks
                .par_iter()
                .map(|&date| {
                    let snapshot = self.fetch_week_or_unranked(date);
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    tracing::info!("Progress: {}/{} weeks", done, weeks.len());
                    snapshot
                })
                .collect::<Vec<_>>()
        });
        RankingTable::new(snapshots)
    }
}

/// Exponential backoff: `base_millis * 2^attempt`, saturating.
fn backoff_delay(base_millis: u64, attempt: u32) -> Duration {
    let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(base_millis.saturating_mul(factor))
}

/// The `n`th ranking week after `start`.
pub fn nth_week(start: NaiveDate, n: u64) -> NaiveDate {
    start + Days::new(7 * n)
}
