use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AnswerEvent, LearnerProfile, RawAnswerEvent};
use crate::persistence::ProfileRepository;
use crate::services::session::SessionMetrics;

pub const DEFAULT_RECENT_WEIGHT: f64 = 0.7;

/// How a new batch of answers is folded into the stored profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AggregationMode {
    /// The profile reflects the latest batch only.
    #[default]
    PerCall,
    /// Exponential blend; the newest batch carries `recent_weight`.
    Weighted { recent_weight: f64 },
}

impl AggregationMode {
    pub fn weighted(recent_weight: f64) -> Self {
        let w = if recent_weight.is_finite() { recent_weight } else { DEFAULT_RECENT_WEIGHT };
        Self::Weighted {
            recent_weight: w.clamp(f64::EPSILON, 1.0),
        }
    }
}

/// Owns the per-student profiles and writes every change through to the repository.
pub struct ProfileStore<R: ProfileRepository> {
    repository: R,
    profiles: HashMap<String, LearnerProfile>,
    mode: AggregationMode,
}

impl<R: ProfileRepository> ProfileStore<R> {
    pub fn open(repository: R, mode: AggregationMode) -> EngineResult<Self> {
        let profiles = repository.load_all()?;
        tracing::info!(profiles = profiles.len(), ?mode, "profile store opened");
        Ok(Self {
            repository,
            profiles,
            mode,
        })
    }

    pub fn get(&self, student_id: &str) -> Option<&LearnerProfile> {
        self.profiles.get(student_id)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn profiles(&self) -> impl Iterator<Item = &LearnerProfile> {
        self.profiles.values()
    }

    pub fn update(&mut self, student_id: &str, events: &[AnswerEvent]) -> EngineResult<LearnerProfile> {
        self.update_at(student_id, events, Utc::now())
    }

    /// Validates a `question_id -> raw event` map and applies it as one batch.
    pub fn update_raw(
        &mut self,
        student_id: &str,
        answers: &BTreeMap<String, RawAnswerEvent>,
    ) -> EngineResult<LearnerProfile> {
        let events = answers
            .iter()
            .map(|(question_id, raw)| raw.clone().into_event(question_id))
            .collect::<EngineResult<Vec<_>>>()?;
        self.update(student_id, &events)
    }

    pub fn update_at(
        &mut self,
        student_id: &str,
        events: &[AnswerEvent],
        now: DateTime<Utc>,
    ) -> EngineResult<LearnerProfile> {
        ensure_unique_questions(events)?;

        let batch = SessionMetrics::from_events(events);
        let previous = self.profiles.get(student_id);
        let (accuracy, pace, engagement) = fold_metrics(previous, &batch, self.mode);

        let profile = LearnerProfile {
            student_id: student_id.to_string(),
            accuracy,
            pace,
            engagement,
            quiz_count: previous.map_or(0, |p| p.quiz_count).saturating_add(1),
            last_updated: now,
        };

        if let Err(err) = self.repository.save(student_id, &profile) {
            tracing::warn!(student_id, error = %err, "failed to persist profile");
            return Err(err.into());
        }

        tracing::debug!(
            student_id,
            events = batch.total,
            accuracy,
            engagement,
            pace,
            quiz_count = profile.quiz_count,
            "profile updated"
        );

        self.profiles.insert(student_id.to_string(), profile.clone());
        Ok(profile)
    }
}

fn ensure_unique_questions(events: &[AnswerEvent]) -> EngineResult<()> {
    let mut seen = HashSet::with_capacity(events.len());
    for event in events {
        if !seen.insert(event.question_id.as_str()) {
            return Err(EngineError::MalformedEvent {
                question_id: event.question_id.clone(),
                reason: "question answered more than once in one batch".to_string(),
            });
        }
        if !event.response_time_seconds.is_finite() || event.response_time_seconds < 0.0 {
            return Err(EngineError::MalformedEvent {
                question_id: event.question_id.clone(),
                reason: "response_time must be a finite, non-negative number".to_string(),
            });
        }
    }
    Ok(())
}

fn fold_metrics(
    previous: Option<&LearnerProfile>,
    batch: &SessionMetrics,
    mode: AggregationMode,
) -> (f64, f64, f64) {
    let current = (batch.accuracy, batch.pace, batch.engagement);

    let (recent_weight, prev) = match (mode, previous) {
        (AggregationMode::Weighted { recent_weight }, Some(prev)) if prev.quiz_count > 0 => {
            (recent_weight, prev)
        }
        _ => return current,
    };

    if batch.is_empty() {
        return (prev.accuracy, prev.pace, prev.engagement);
    }

    let blend = |old: f64, new: f64| old * (1.0 - recent_weight) + new * recent_weight;
    (
        blend(prev.accuracy, batch.accuracy).clamp(0.0, 1.0),
        blend(prev.pace, batch.pace).max(0.0),
        blend(prev.engagement, batch.engagement).clamp(0.0, 1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::InMemoryProfileRepository;
    use chrono::TimeZone;

    fn quiz() -> Vec<AnswerEvent> {
        vec![
            AnswerEvent::answered("q1", "correct", true, 25.0),
            AnswerEvent::answered("q2", "wrong", false, 30.0),
            AnswerEvent::skipped("q3", 5.0),
        ]
    }

    #[test]
    fn test_unknown_student_is_none() {
        let store = ProfileStore::open(InMemoryProfileRepository::new(), AggregationMode::PerCall).unwrap();
        assert!(store.get("nobody").is_none());
    }

    #[test]
    fn test_update_per_call() {
        let repo = InMemoryProfileRepository::new();
        let mut store = ProfileStore::open(&repo, AggregationMode::PerCall).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap();

        let profile = store.update_at("s1", &quiz(), now).unwrap();
        assert!((profile.accuracy - 1.0 / 3.0).abs() < 1e-9);
        assert!((profile.engagement - 2.0 / 3.0).abs() < 1e-9);
        assert!((profile.pace - 20.0).abs() < 1e-9);
        assert_eq!(profile.quiz_count, 1);
        assert_eq!(profile.last_updated, now);

        let perfect = vec![AnswerEvent::answered("q9", "ok", true, 10.0)];
        let profile = store.update("s1", &perfect).unwrap();
        assert_eq!(profile.accuracy, 1.0);
        assert_eq!(profile.quiz_count, 2);
        assert_eq!(repo.load("s1").unwrap().unwrap(), profile);
    }

    #[test]
    fn test_update_weighted() {
        let mut store =
            ProfileStore::open(InMemoryProfileRepository::new(), AggregationMode::weighted(0.7)).unwrap();

        let first = store.update("s1", &quiz()).unwrap();
        assert!((first.accuracy - 1.0 / 3.0).abs() < 1e-9);

        let perfect = vec![AnswerEvent::answered("q4", "ok", true, 10.0)];
        let second = store.update("s1", &perfect).unwrap();
        let expected = (1.0 / 3.0) * 0.3 + 1.0 * 0.7;
        assert!((second.accuracy - expected).abs() < 1e-9);
        assert!((second.pace - (20.0 * 0.3 + 10.0 * 0.7)).abs() < 1e-9);
    }

    #[test]
    fn test_empty_batch_convention() {
        let mut store = ProfileStore::open(InMemoryProfileRepository::new(), AggregationMode::PerCall).unwrap();
        let profile = store.update("s1", &[]).unwrap();
        assert_eq!(profile.accuracy, 0.0);
        assert_eq!(profile.engagement, 1.0);
        assert_eq!(profile.pace, 0.0);
        assert_eq!(profile.quiz_count, 1);
    }

    #[test]
    fn test_weighted_empty_batch_keeps_metrics() {
        let mut store =
            ProfileStore::open(InMemoryProfileRepository::new(), AggregationMode::weighted(0.7)).unwrap();
        let before = store.update("s1", &quiz()).unwrap();
        let after = store.update("s1", &[]).unwrap();
        assert_eq!(after.accuracy, before.accuracy);
        assert_eq!(after.engagement, before.engagement);
        assert_eq!(after.quiz_count, 2);
    }

    #[test]
    fn test_duplicate_question_rejected() {
        let mut store = ProfileStore::open(InMemoryProfileRepository::new(), AggregationMode::PerCall).unwrap();
        let events = vec![
            AnswerEvent::answered("q1", "a", true, 3.0),
            AnswerEvent::answered("q1", "b", false, 4.0),
        ];
        assert!(matches!(
            store.update("s1", &events),
            Err(EngineError::MalformedEvent { .. })
        ));
        assert!(store.get("s1").is_none());
    }

    #[test]
    fn test_update_raw_missing_field() {
        let mut store = ProfileStore::open(InMemoryProfileRepository::new(), AggregationMode::PerCall).unwrap();
        let mut answers = BTreeMap::new();
        answers.insert(
            "q1".to_string(),
            RawAnswerEvent {
                answer: Some("4".into()),
                correct: Some(true),
                skipped: None,
                response_time: Some(8.0),
            },
        );
        let err = store.update_raw("s1", &answers).unwrap_err();
        assert!(err.to_string().contains("skipped"));
    }

    #[test]
    fn test_weighted_clamps_weight() {
        assert_eq!(AggregationMode::weighted(3.0), AggregationMode::Weighted { recent_weight: 1.0 });
        assert_eq!(
            AggregationMode::weighted(f64::NAN),
            AggregationMode::Weighted { recent_weight: DEFAULT_RECENT_WEIGHT }
        );
    }

    #[test]
    fn test_default_mode_is_per_call() {
        assert_eq!(AggregationMode::default(), AggregationMode::PerCall);
    }
}
