//! Ensemble decision engine for job-posting scam and ghost-listing risk.
//!
//! A [`FeatureBundle`] is validated into [`FeatureSignals`], reduced by the
//! red-flag aggregator and the heuristic and ghost scorers, combined with
//! sub-model scores from an injected [`SubModelProvider`], and sealed into a
//! rounded [`PredictionResult`]. Nothing here keeps state between requests.

pub mod attribution;
pub mod engine;
pub mod envelope;
pub mod features;
pub mod fusion;
pub mod ghost;
pub mod heuristic;
pub mod providers;
pub mod red_flags;
pub mod router;

#[cfg(test)]
mod tests;

pub use attribution::{AttributionMode, FeatureImportance};
pub use engine::{PredictionError, ScoringEngine, ScoringError};
pub use envelope::{PredictionResult, RiskLevel};
pub use features::{
    FeatureBundle, FeatureBundleError, FeatureGroup, FeatureSignals, PredictionRequest,
};
pub use fusion::{FusionEngine, FusionWeights};
pub use providers::{
    PlaceholderProvider, ProviderError, ScorerOutput, ScoringInput, SubModelKind,
    SubModelProvider, SubModelScores,
};
pub use red_flags::RedFlagCounts;
pub use router::scoring_router;
