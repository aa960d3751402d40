mod prediction;

pub use prediction::{Prediction, PredictionSet, TOP_N};
