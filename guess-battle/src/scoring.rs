use crate::data_processing::RankSnapshot;
use crate::domain::{Prediction, TOP_N};

/// Distance between a guessed Top-10 and one week of real ranks.
///
/// Each guessed player's actual rank is compared against the position they
/// were guessed at; the result is the Euclidean norm of those differences
/// divided by the list length (a constant scaling, not an RMS). Lower is
/// closer, and 0 needs every guessed player at exactly their guessed rank.
///
/// Returns `None` when any of the ten players is unranked that week: a
/// partially known week is not scored at all.
pub fn score(snapshot: &RankSnapshot, prediction: &Prediction) -> Option<f64> {
    let mut sum_sq = 0.;
    for (guessed, name) in prediction.ranked() {
        let actual = snapshot.rank_of(name)?;
        let diff = actual as f64 - guessed as f64;
        sum_sq += diff * diff;
    }
    Some(sum_sq.sqrt() / TOP_N as f64)
}
