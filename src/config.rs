use std::path::PathBuf;

use crate::services::profile::{AggregationMode, DEFAULT_RECENT_WEIGHT};
use crate::services::recommender::{
    RecommenderConfig, DEFAULT_CURRENT_DIFFICULTY, DEFAULT_MAX_RECOMMENDATIONS,
    DEFAULT_SIMILARITY_WEIGHT,
};
use crate::services::similarity::DEFAULT_SIMILARITY_THRESHOLD;

/// Library-facing settings; built from [`Config`] or by hand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineSettings {
    pub aggregation: AggregationMode,
    pub recommender: RecommenderConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub profiles_path: PathBuf,
    pub question_bank_path: PathBuf,
    pub aggregation: AggregationMode,
    pub max_recommendations: usize,
    pub similarity_threshold: f64,
    pub similarity_weight: f64,
    pub default_current_difficulty: u8,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let log_level = parsed("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let profiles_path = parsed("PROFILES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/learner_profiles.json"));
        let question_bank_path = parsed("QUESTION_BANK_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/questions.json"));

        let recent_weight = parsed("RECENT_WEIGHT")
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(DEFAULT_RECENT_WEIGHT);
        let aggregation = match parsed("PROFILE_AGGREGATION").as_deref() {
            Some("weighted") => AggregationMode::weighted(recent_weight),
            _ => AggregationMode::PerCall,
        };

        let max_recommendations = parsed("MAX_RECOMMENDATIONS")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_RECOMMENDATIONS);
        let similarity_threshold = parsed("SIMILARITY_THRESHOLD")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 1.0))
            .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD);
        let similarity_weight = parsed("SIMILARITY_WEIGHT")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 1.0))
            .unwrap_or(DEFAULT_SIMILARITY_WEIGHT);
        let default_current_difficulty = parsed("DEFAULT_CURRENT_DIFFICULTY")
            .and_then(|v| v.parse::<u8>().ok())
            .filter(|v| (1..=5).contains(v))
            .unwrap_or(DEFAULT_CURRENT_DIFFICULTY);

        Self {
            log_level,
            profiles_path,
            question_bank_path,
            aggregation,
            max_recommendations,
            similarity_threshold,
            similarity_weight,
            default_current_difficulty,
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            aggregation: self.aggregation,
            recommender: RecommenderConfig {
                default_max_results: self.max_recommendations,
                default_current_difficulty: self.default_current_difficulty,
                similarity_threshold: self.similarity_threshold,
                similarity_weight: self.similarity_weight,
            },
        }
    }
}
