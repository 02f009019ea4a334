use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{
    DifficultyTier, LearnerProfile, Question, Recommendation, RecommendationKind, MAX_DIFFICULTY,
    MIN_DIFFICULTY,
};
use crate::services::similarity::{jaccard, keyword_set, DEFAULT_SIMILARITY_THRESHOLD};

pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 3;
pub const DEFAULT_CURRENT_DIFFICULTY: u8 = 3;
pub const DEFAULT_SIMILARITY_WEIGHT: f64 = 0.3;

const CHALLENGE_MIN_ACCURACY: f64 = 0.85;
const CHALLENGE_MAX_PACE: f64 = 25.0;
const MODERATE_MIN_ACCURACY: f64 = 0.7;
const MODERATE_MAX_PACE: f64 = 35.0;
const PRACTICE_MIN_ACCURACY: f64 = 0.5;

pub fn classify_tier(accuracy: f64, pace: f64) -> DifficultyTier {
    if accuracy >= CHALLENGE_MIN_ACCURACY && pace < CHALLENGE_MAX_PACE {
        DifficultyTier::Challenge
    } else if accuracy >= MODERATE_MIN_ACCURACY && pace < MODERATE_MAX_PACE {
        DifficultyTier::Moderate
    } else if accuracy >= PRACTICE_MIN_ACCURACY {
        DifficultyTier::Practice
    } else {
        DifficultyTier::Remedial
    }
}

/// Inclusive difficulty range a tier aims for, plus the preferred level inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyBand {
    pub low: u8,
    pub high: u8,
    pub target: u8,
}

impl DifficultyBand {
    pub fn for_tier(tier: DifficultyTier, current: u8) -> Self {
        let current = current.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
        let easier = current.saturating_sub(1).max(MIN_DIFFICULTY);

        match tier {
            DifficultyTier::Challenge => Self::exact((current + 1).min(MAX_DIFFICULTY)),
            DifficultyTier::Moderate => Self::exact(current),
            DifficultyTier::Practice => Self {
                low: easier,
                high: current,
                target: current,
            },
            DifficultyTier::Remedial => Self::exact(easier),
        }
    }

    fn exact(level: u8) -> Self {
        Self {
            low: level,
            high: level,
            target: level,
        }
    }

    /// Steps outside the band; 0 inside it.
    pub fn distance(&self, difficulty: u8) -> u8 {
        if difficulty < self.low {
            self.low - difficulty
        } else if difficulty > self.high {
            difficulty - self.high
        } else {
            0
        }
    }

    pub fn contains(&self, difficulty: u8) -> bool {
        self.distance(difficulty) == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommenderConfig {
    pub default_max_results: usize,
    pub default_current_difficulty: u8,
    pub similarity_threshold: f64,
    /// Share of the blended score that comes from text similarity.
    pub similarity_weight: f64,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            default_max_results: DEFAULT_MAX_RECOMMENDATIONS,
            default_current_difficulty: DEFAULT_CURRENT_DIFFICULTY,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            similarity_weight: DEFAULT_SIMILARITY_WEIGHT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendRequest {
    pub max_results: Option<usize>,
    pub current_difficulty: Option<u8>,
    /// Text of recently seen material; enables similarity ranking.
    pub context_text: Option<String>,
    /// Question ids that must not be recommended, e.g. already answered ones.
    pub exclude: HashSet<String>,
}

impl RecommendRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn current_difficulty(mut self, difficulty: u8) -> Self {
        self.current_difficulty = Some(difficulty);
        self
    }

    pub fn context_text(mut self, text: impl Into<String>) -> Self {
        self.context_text = Some(text.into());
        self
    }

    pub fn exclude<I, S>(mut self, question_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(question_ids.into_iter().map(Into::into));
        self
    }
}

struct Candidate<'a> {
    question: &'a Question,
    distance: u8,
    target_gap: u8,
    similarity: f64,
}

impl Candidate<'_> {
    fn fit(&self) -> f64 {
        1.0 / (1.0 + f64::from(self.distance))
    }
}

/// Ranks bank questions for a learner. Holds no per-student state.
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    config: RecommenderConfig,
}

impl Recommender {
    pub fn new(config: RecommenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn recommend(
        &self,
        student_id: &str,
        profile: &LearnerProfile,
        bank: &[Question],
        request: &RecommendRequest,
    ) -> Vec<Recommendation> {
        let max_results = request.max_results.unwrap_or(self.config.default_max_results);
        if bank.is_empty() || max_results == 0 {
            return Vec::new();
        }

        let tier = classify_tier(profile.accuracy, profile.pace);
        let current = request
            .current_difficulty
            .unwrap_or(self.config.default_current_difficulty);
        let band = DifficultyBand::for_tier(tier, current);

        let context = request
            .context_text
            .as_deref()
            .map(keyword_set)
            .filter(|keywords| !keywords.is_empty());

        let mut candidates: Vec<Candidate<'_>> = bank
            .iter()
            .filter(|q| !request.exclude.contains(&q.question_id))
            .map(|question| Candidate {
                question,
                distance: band.distance(question.difficulty),
                target_gap: question.difficulty.abs_diff(band.target),
                similarity: context
                    .as_ref()
                    .map_or(0.0, |ctx| jaccard(ctx, &keyword_set(&question.text))),
            })
            .collect();

        // Widen the band one step at a time until it holds a candidate.
        let Some(allowed) = candidates.iter().map(|c| c.distance).min() else {
            return Vec::new();
        };

        candidates.sort_by(by_fit_then_similarity);
        let (pool, rest): (Vec<_>, Vec<_>) =
            candidates.into_iter().partition(|c| c.distance <= allowed);

        let kind = RecommendationKind::from(tier);
        let has_context = context.is_some();
        let mut recommendations: Vec<Recommendation> = pool
            .iter()
            .take(max_results)
            .map(|c| Recommendation {
                kind,
                question_id: c.question.question_id.clone(),
                score: Some(self.blended_score(c, has_context)),
                widened: c.distance > 0,
            })
            .collect();

        let mut similar_ids: HashSet<&str> = HashSet::new();
        if recommendations.len() < max_results && has_context {
            let mut similar: Vec<&Candidate<'_>> = rest
                .iter()
                .filter(|c| c.similarity >= self.config.similarity_threshold)
                .collect();
            similar.sort_by(|a, b| {
                b.similarity
                    .partial_cmp(&a.similarity)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| by_fit_then_similarity(a, b))
            });
            similar.truncate(max_results - recommendations.len());

            similar_ids.extend(similar.iter().map(|c| c.question.question_id.as_str()));
            recommendations.extend(similar.into_iter().map(|c| Recommendation {
                kind: RecommendationKind::Similar,
                question_id: c.question.question_id.clone(),
                score: Some(c.similarity),
                widened: false,
            }));
        }

        // Any slots still open go to the nearest remaining questions.
        let remaining = max_results - recommendations.len();
        let filled = rest
            .iter()
            .filter(|c| !similar_ids.contains(c.question.question_id.as_str()))
            .take(remaining)
            .map(|c| Recommendation {
                kind,
                question_id: c.question.question_id.clone(),
                score: Some(self.blended_score(c, has_context)),
                widened: true,
            });
        recommendations.extend(filled);

        tracing::debug!(
            student_id,
            ?tier,
            band_low = band.low,
            band_high = band.high,
            widened_by = allowed,
            returned = recommendations.len(),
            widened = recommendations.iter().filter(|r| r.widened).count(),
            "recommendations ranked"
        );

        recommendations
    }

    fn blended_score(&self, candidate: &Candidate<'_>, has_context: bool) -> f64 {
        if !has_context {
            return candidate.fit();
        }
        let w = self.config.similarity_weight.clamp(0.0, 1.0);
        (1.0 - w) * candidate.fit() + w * candidate.similarity
    }
}

fn by_fit_then_similarity(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    a.distance
        .cmp(&b.distance)
        .then(a.target_gap.cmp(&b.target_gap))
        .then_with(|| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.question.question_id.cmp(&b.question.question_id))
}

/// Recommendations with default settings and no text context.
pub fn recommend(
    student_id: &str,
    profile: &LearnerProfile,
    bank: &[Question],
    max_results: usize,
) -> Vec<Recommendation> {
    Recommender::default().recommend(
        student_id,
        profile,
        bank,
        &RecommendRequest::new().max_results(max_results),
    )
}
