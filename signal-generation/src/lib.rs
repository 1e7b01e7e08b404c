// Signal Ensemble & Recommendation Engine
// Scores prediction markets for informed-money activity and emits sized trade suggestions

pub mod config;
pub mod correlation;
pub mod ensemble;
pub mod error;
pub mod pipeline;
pub mod signals;
pub mod validators;

pub use config::{create_config_template, load_config, save_config, EngineConfig, SignalParams};
pub use correlation::{CongressMatcher, TradeMatch};
pub use ensemble::{CombinedScore, EnsembleWeights, SignalEnsemble};
pub use error::ScanError;
pub use pipeline::{rank_order, Recommendation, RecommendationPipeline, ScoredMarket};
pub use signals::{
    DirectionSource, ExtractionContext, Polarity, RawSignal, SignalExtractor, SignalKind,
    SignalReading, SignalStrength,
};
pub use validators::{
    ActionableSizeValidator, CompositeValidator, ConfidenceValidator, DirectionalValidator,
    RecommendationValidator,
};
