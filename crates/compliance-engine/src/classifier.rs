//! Document type classification by weighted pattern coverage

use regex::Regex;
use serde::{Deserialize, Serialize};
use shared_types::DocumentType;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::ConfigError;
use crate::patterns::compile_pattern;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub document_type: DocumentType,
    pub confidence: f64,
}

impl Classification {
    pub fn unknown() -> Self {
        Self {
            document_type: DocumentType::Other,
            confidence: 0.0,
        }
    }
}

struct CompiledType {
    document_type: DocumentType,
    patterns: Vec<(Regex, f64)>,
    total_weight: f64,
}

pub struct TypeClassifier {
    types: Vec<CompiledType>,
    threshold: f64,
}

impl TypeClassifier {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        let mut types = Vec::with_capacity(config.type_patterns.len());
        for set in &config.type_patterns {
            let patterns = set
                .patterns
                .iter()
                .map(|p| Ok((compile_pattern("type_patterns", &p.pattern)?, p.weight)))
                .collect::<Result<Vec<_>, ConfigError>>()?;
            let total_weight = patterns.iter().map(|(_, w)| w).sum();
            types.push(CompiledType {
                document_type: set.document_type,
                patterns,
                total_weight,
            });
        }

        Ok(Self {
            types,
            threshold: config.type_confidence_threshold,
        })
    }

    /// Score every type by the weighted share of its patterns found in
    /// `text`. The best score wins (earlier type on ties) if it reaches the
    /// threshold; otherwise the result is `Other` with confidence 0.
    pub fn classify(&self, text: &str) -> Classification {
        let mut best = Classification::unknown();

        for compiled in &self.types {
            if compiled.total_weight <= 0.0 {
                continue;
            }
            let matched: f64 = compiled
                .patterns
                .iter()
                .filter(|(re, _)| re.is_match(text))
                .map(|(_, w)| w)
                .sum();
            let score = matched / compiled.total_weight;
            if score > best.confidence {
                best = Classification {
                    document_type: compiled.document_type,
                    confidence: score,
                };
            }
        }

        if best.confidence >= self.threshold && best.confidence > 0.0 {
            debug!(
                "Classified as {} ({:.2})",
                best.document_type, best.confidence
            );
            best
        } else {
            debug!("No type reached threshold (best {:.2})", best.confidence);
            Classification::unknown()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TypePatternSet, WeightedPattern};
    use pretty_assertions::assert_eq;

    fn classifier() -> TypeClassifier {
        TypeClassifier::new(&EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_articles_of_association() {
        let text = "ARTICLES OF ASSOCIATION\nThe share capital of the company is AED 100,000.\n\
                    General meetings shall be held annually. Dividends may be declared.";
        let result = classifier().classify(text);
        assert_eq!(result.document_type, DocumentType::ArticlesOfAssociation);
        // 4 of 7 patterns
        assert!((result.confidence - 4.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_below_threshold_is_other() {
        let result = classifier().classify("Minutes of the quarterly staff picnic. Salary reviews.");
        assert_eq!(result, Classification::unknown());
    }

    #[test]
    fn test_empty_text_is_other() {
        assert_eq!(classifier().classify(""), Classification::unknown());
    }

    #[test]
    fn test_tie_keeps_earlier_type() {
        let config = EngineConfig {
            type_patterns: vec![
                TypePatternSet {
                    document_type: DocumentType::BusinessPlan,
                    patterns: vec![WeightedPattern {
                        pattern: "plan".into(),
                        weight: 1.0,
                    }],
                },
                TypePatternSet {
                    document_type: DocumentType::ComplianceManual,
                    patterns: vec![WeightedPattern {
                        pattern: "plan".into(),
                        weight: 1.0,
                    }],
                },
            ],
            ..Default::default()
        };
        let result = TypeClassifier::new(&config).unwrap().classify("the plan");
        assert_eq!(result.document_type, DocumentType::BusinessPlan);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_weights_shift_score() {
        let config = EngineConfig {
            type_patterns: vec![TypePatternSet {
                document_type: DocumentType::BusinessPlan,
                patterns: vec![
                    WeightedPattern {
                        pattern: "business plan".into(),
                        weight: 3.0,
                    },
                    WeightedPattern {
                        pattern: "market".into(),
                        weight: 1.0,
                    },
                ],
            }],
            ..Default::default()
        };
        let result = TypeClassifier::new(&config)
            .unwrap()
            .classify("Business Plan 2025");
        assert_eq!(result.confidence, 0.75);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let mut config = EngineConfig::default();
        config.type_patterns[0].patterns[0].pattern = "[unclosed".into();
        assert!(matches!(
            TypeClassifier::new(&config),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }
}
