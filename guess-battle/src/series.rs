use crate::data_processing::RankingTable;
use crate::domain::PredictionSet;
use crate::scoring::score;
use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// What happens to missing weeks after the last scored week.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrailingGaps {
    /// Nothing to interpolate towards, so the weeks stay undefined.
    #[default]
    Undefined,
    /// Repeat the last known score, as the old dashboard did.
    CarryForward,
}

/// Fills missing weeks by linear interpolation over the week index.
/// Weeks before the first known value are left undefined, and so are weeks
/// after the last one unless `trailing` says to carry it forward.
pub fn fill_gaps(raw: &[Option<f64>], trailing: TrailingGaps) -> Vec<Option<f64>> {
    let mut filled = raw.to_vec();
    let known: Vec<(usize, f64)> = raw
        .iter()
        .enumerate()
        .filter_map(|(idx, val)| val.map(|v| (idx, v)))
        .collect();

    for (&(lo, lo_val), &(hi, hi_val)) in known.iter().tuple_windows() {
        let span = (hi - lo) as f64;
        for idx in lo + 1..hi {
            let frac = (idx - lo) as f64 / span;
            filled[idx] = Some(lo_val + (hi_val - lo_val) * frac);
        }
    }

    if trailing == TrailingGaps::CarryForward {
        if let Some(&(last, last_val)) = known.last() {
            for val in &mut filled[last + 1..] {
                *val = Some(last_val);
            }
        }
    }
    filled
}

/// One week of a participant's series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    /// The week's own score; `None` if a guessed player was unranked.
    pub raw: Option<f64>,
    /// The gap-filled score; `None` if there was nothing to interpolate from.
    pub value: Option<f64>,
}

/// A participant's weekly scores on the ranking table's date axis.
#[derive(Clone, Debug, Serialize)]
pub struct ScoreSeries {
    pub participant: String,
    pub dates: Vec<NaiveDate>,
    pub raw: Vec<Option<f64>>,
    pub filled: Vec<Option<f64>>,
}

impl ScoreSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = SeriesPoint> + '_ {
        self.dates
            .iter()
            .zip(&self.raw)
            .zip(&self.filled)
            .map(|((&date, &raw), &value)| SeriesPoint { date, raw, value })
    }

    pub fn value_at(&self, date: NaiveDate) -> Option<f64> {
        let idx = self.dates.binary_search(&date).ok()?;
        self.filled[idx]
    }

    /// Gap-filled values that are actually defined.
    pub fn defined_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.filled.iter().flatten().copied()
    }

    /// Weeks that stay undefined even after gap filling.
    pub fn undefined_dates(&self) -> Vec<NaiveDate> {
        self.points()
            .filter(|point| point.value.is_none())
            .map(|point| point.date)
            .collect()
    }
}

/// Scores every participant against every week, in configuration order.
pub fn build_series(
    table: &RankingTable,
    predictions: &PredictionSet,
    trailing: TrailingGaps,
) -> Vec<ScoreSeries> {
    let dates = table.dates();
    predictions
        .iter()
        .map(|prediction| {
            let raw: Vec<_> = table
                .snapshots()
                .iter()
                .map(|snapshot| score(snapshot, prediction))
                .collect();
            let filled = fill_gaps(&raw, trailing);
            let series = ScoreSeries {
                participant: prediction.owner().to_owned(),
                dates: dates.clone(),
                raw,
                filled,
            };

            let undefined = series.undefined_dates();
            if !undefined.is_empty() {
                tracing::warn!(
                    "{} is undefined for {} of {} weeks: {}",
                    series.participant,
                    undefined.len(),
                    series.len(),
                    undefined.iter().join(", ")
                );
            }
            series
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data_processing::RankSnapshot;
    use crate::domain::Prediction;
    use claims::assert_none;
    use quickcheck_macros::quickcheck;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn test_interior_gaps_are_linear() {
        let raw = [Some(1.), None, None, Some(4.), None, Some(2.)];
        let filled = fill_gaps(&raw, TrailingGaps::Undefined);
        assert!(close(filled[1], 2.));
        assert!(close(filled[2], 3.));
        assert!(close(filled[4], 3.));
        assert_eq!(filled[0], Some(1.));
        assert_eq!(filled[5], Some(2.));
    }

    #[test]
    fn test_unanchored_edges_stay_undefined() {
        let raw = [None, Some(1.), None, Some(3.), None];
        let filled = fill_gaps(&raw, TrailingGaps::Undefined);
        assert_none!(filled[0]);
        assert!(close(filled[2], 2.));
        assert_none!(filled[4]);
    }

    #[test]
    fn test_trailing_gaps_can_carry_forward() {
        let raw = [None, Some(1.), None, Some(3.), None, None];
        let filled = fill_gaps(&raw, TrailingGaps::CarryForward);
        assert_none!(filled[0]);
        assert_eq!(&filled[3..], &[Some(3.), Some(3.), Some(3.)]);
    }

    #[test]
    fn test_all_missing_stays_all_undefined() {
        let raw = [None; 4];
        assert_eq!(fill_gaps(&raw, TrailingGaps::Undefined), vec![None; 4]);
        assert_eq!(fill_gaps(&raw, TrailingGaps::CarryForward), vec![None; 4]);
        assert!(fill_gaps(&[], TrailingGaps::Undefined).is_empty());
    }

    #[quickcheck]
    fn filling_a_known_series_changes_nothing(values: Vec<f64>) -> bool {
        let raw: Vec<Option<f64>> = values
            .into_iter()
            .filter(|v| v.is_finite())
            .map(Some)
            .collect();
        fill_gaps(&raw, TrailingGaps::Undefined) == raw
            && fill_gaps(&raw, TrailingGaps::CarryForward) == raw
    }

    #[quickcheck]
    fn filling_is_idempotent(values: Vec<Option<i16>>) -> bool {
        let raw: Vec<Option<f64>> = values.into_iter().map(|v| v.map(f64::from)).collect();
        let once = fill_gaps(&raw, TrailingGaps::Undefined);
        fill_gaps(&once, TrailingGaps::Undefined) == once
    }

    fn players() -> Vec<String> {
        (1..=10).map(|i| format!("P{}", i)).collect()
    }

    #[test]
    fn test_never_ranked_pick_is_undefined_everywhere() {
        let weeks = ["2025-01-06", "2025-01-13", "2025-01-20"];
        let snapshots = weeks
            .iter()
            .map(|day| {
                let date = day.parse().unwrap();
                let mut snapshot = RankSnapshot::unranked(date, players());
                for (rank, name) in (1..).zip(players()) {
                    snapshot.set_rank(name, rank);
                }
                snapshot
            })
            .collect();
        let table = RankingTable::new(snapshots).unwrap();

        let mut ghost = players();
        ghost[9] = "Roger Federer".to_owned();
        let predictions = PredictionSet::new(vec![
            Prediction::parse("Exact", players()).unwrap(),
            Prediction::parse("Ghost", ghost).unwrap(),
        ])
        .unwrap();

        let series = build_series(&table, &predictions, TrailingGaps::CarryForward);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].participant, "Exact");
        assert_eq!(series[0].filled, vec![Some(0.); 3]);

        assert_eq!(series[1].raw, vec![None; 3]);
        assert_eq!(series[1].filled, vec![None; 3]);
        assert_eq!(series[1].undefined_dates().len(), 3);
        assert_eq!(series[1].len(), 3);
        assert_none!(series[1].value_at(table.dates()[0]));
    }
}
