use crate::error::{BattleError, Result};
use serde::Serialize;
use std::collections::HashSet;

/// How many places every prediction must fill.
pub const TOP_N: usize = 10;

/// One participant's guess of the Top-10, best player first.
#[derive(Clone, Debug, Serialize)]
pub struct Prediction {
    owner: String,
    order: [String; TOP_N],
}

impl Prediction {
    /// Validates a guessed order: exactly `TOP_N` distinct, non-blank names.
    pub fn parse(owner: impl Into<String>, order: Vec<String>) -> Result<Self> {
        let owner = owner.into();
        let invalid = |reason: String| BattleError::Prediction {
            owner: owner.clone(),
            reason,
        };

        if owner.trim().is_empty() {
            return Err(invalid("participant name is blank".to_owned()));
        }
        let order: [String; TOP_N] = order.try_into().map_err(|order: Vec<String>| {
            invalid(format!("expected {} names, found {}", TOP_N, order.len()))
        })?;

        let mut seen = HashSet::with_capacity(TOP_N);
        for (idx, name) in order.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(invalid(format!("name at position {} is blank", idx + 1)));
            }
            if !seen.insert(name.as_str()) {
                return Err(invalid(format!("{} appears more than once", name)));
            }
        }

        Ok(Self { owner, order })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn order(&self) -> &[String; TOP_N] {
        &self.order
    }

    /// Pairs each guessed name with its predicted rank, starting at 1.
    pub fn ranked(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.order
            .iter()
            .enumerate()
            .map(|(idx, name)| (idx as u32 + 1, name.as_str()))
    }
}

/// The fixed list of contest entries. Its order decides every tie-break.
#[derive(Clone, Debug, Serialize)]
pub struct PredictionSet {
    predictions: Vec<Prediction>,
}

impl PredictionSet {
    pub fn new(predictions: Vec<Prediction>) -> Result<Self> {
        if predictions.is_empty() {
            return Err(BattleError::Config("no participants configured".to_owned()));
        }
        let mut owners = HashSet::with_capacity(predictions.len());
        for prediction in &predictions {
            if !owners.insert(prediction.owner()) {
                return Err(BattleError::Config(format!(
                    "participant {} is listed more than once",
                    prediction.owner()
                )));
            }
        }
        Ok(Self { predictions })
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Prediction> {
        self.predictions.iter()
    }

    pub fn get(&self, owner: &str) -> Option<&Prediction> {
        self.predictions.iter().find(|p| p.owner() == owner)
    }

    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.predictions.iter().map(Prediction::owner)
    }
}

impl<'a> IntoIterator for &'a PredictionSet {
    type Item = &'a Prediction;
    type IntoIter = std::slice::Iter<'a, Prediction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
