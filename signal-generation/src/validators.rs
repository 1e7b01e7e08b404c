// Recommendation Validators
// Filters scored markets before they become recommendations

use tracing::debug;

use crate::pipeline::ScoredMarket;

/// Trait for recommendation validators
pub trait RecommendationValidator: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, candidate: &ScoredMarket<'_>) -> bool;
}

/// Rejects exact ties, which have no side to take
pub struct DirectionalValidator;

impl RecommendationValidator for DirectionalValidator {
    fn name(&self) -> &'static str {
        "directional"
    }

    fn validate(&self, candidate: &ScoredMarket<'_>) -> bool {
        candidate.position.is_some()
    }
}

/// Validates that the ensemble is confident enough
pub struct ConfidenceValidator {
    min_confidence: f64,
}

impl ConfidenceValidator {
    pub fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }
}

impl RecommendationValidator for ConfidenceValidator {
    fn name(&self) -> &'static str {
        "confidence"
    }

    fn validate(&self, candidate: &ScoredMarket<'_>) -> bool {
        candidate.score.confidence >= self.min_confidence
    }
}

/// Validates that the sizer suggests a non-zero stake
pub struct ActionableSizeValidator;

impl RecommendationValidator for ActionableSizeValidator {
    fn name(&self) -> &'static str {
        "actionable_size"
    }

    fn validate(&self, candidate: &ScoredMarket<'_>) -> bool {
        candidate
            .sizing
            .as_ref()
            .is_some_and(|sizing| sizing.is_actionable())
    }
}

/// Combines multiple validators with AND logic
pub struct CompositeValidator {
    validators: Vec<Box<dyn RecommendationValidator>>,
}

impl CompositeValidator {
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Direction, confidence floor and size, in that order
    pub fn standard(min_confidence: f64) -> Self {
        Self::new()
            .add_validator(Box::new(DirectionalValidator))
            .add_validator(Box::new(ConfidenceValidator::new(min_confidence)))
            .add_validator(Box::new(ActionableSizeValidator))
    }

    pub fn add_validator(mut self, validator: Box<dyn RecommendationValidator>) -> Self {
        self.validators.push(validator);
        self
    }

    /// Name of the first validator that rejects `candidate`
    pub fn rejection(&self, candidate: &ScoredMarket<'_>) -> Option<&'static str> {
        self.validators
            .iter()
            .find(|v| !v.validate(candidate))
            .map(|v| v.name())
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl Default for CompositeValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommendationValidator for CompositeValidator {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn validate(&self, candidate: &ScoredMarket<'_>) -> bool {
        match self.rejection(candidate) {
            Some(name) => {
                debug!(
                    market_id = %candidate.market.id,
                    validator = name,
                    confidence = candidate.score.confidence,
                    "Market filtered"
                );
                false
            }
            None => true,
        }
    }
}
