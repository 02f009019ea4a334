use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::EngineError;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;

/// One attempt at one question, already validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEvent {
    pub question_id: String,
    pub answer_text: String,
    pub correct: bool,
    pub skipped: bool,
    pub response_time_seconds: f64,
}

impl AnswerEvent {
    pub fn answered(question_id: impl Into<String>, answer_text: impl Into<String>, correct: bool, seconds: f64) -> Self {
        Self {
            question_id: question_id.into(),
            answer_text: answer_text.into(),
            correct,
            skipped: false,
            response_time_seconds: seconds,
        }
    }

    pub fn skipped(question_id: impl Into<String>, seconds: f64) -> Self {
        Self {
            question_id: question_id.into(),
            answer_text: String::new(),
            correct: false,
            skipped: true,
            response_time_seconds: seconds,
        }
    }
}

/// Answer event as it arrives from a quiz front end, keyed by question id.
///
/// Every field is optional so that a missing field can be reported instead of
/// silently defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAnswerEvent {
    #[serde(default, alias = "answer_text")]
    pub answer: Option<String>,
    #[serde(default)]
    pub correct: Option<bool>,
    #[serde(default)]
    pub skipped: Option<bool>,
    #[serde(default, alias = "response_time_seconds")]
    pub response_time: Option<f64>,
}

impl RawAnswerEvent {
    pub fn into_event(self, question_id: &str) -> Result<AnswerEvent, EngineError> {
        let malformed = |reason: &str| EngineError::MalformedEvent {
            question_id: question_id.to_string(),
            reason: reason.to_string(),
        };

        let correct = self.correct.ok_or_else(|| malformed("missing field `correct`"))?;
        let skipped = self.skipped.ok_or_else(|| malformed("missing field `skipped`"))?;
        let response_time = self
            .response_time
            .ok_or_else(|| malformed("missing field `response_time`"))?;

        if !response_time.is_finite() || response_time < 0.0 {
            return Err(malformed("response_time must be a finite, non-negative number"));
        }
        if question_id.trim().is_empty() {
            return Err(malformed("question id is empty"));
        }

        Ok(AnswerEvent {
            question_id: question_id.to_string(),
            answer_text: self.answer.unwrap_or_default(),
            correct,
            skipped,
            response_time_seconds: response_time,
        })
    }
}

/// Stored profile. On disk the student id may be absent, in which case the
/// repository fills it from the map key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerProfile {
    #[serde(default)]
    pub student_id: String,
    pub accuracy: f64,
    /// Mean response time per question, in seconds.
    pub pace: f64,
    pub engagement: f64,
    pub quiz_count: u32,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub last_updated: DateTime<Utc>,
}

/// Accepts RFC 3339 and offset-less ISO 8601 timestamps; the latter are read as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{raw}`")))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: String,
    pub topic: String,
    pub difficulty: u8,
    pub text: String,
    #[serde(default)]
    pub hint: String,
}

impl Question {
    pub fn new(
        question_id: impl Into<String>,
        topic: impl Into<String>,
        difficulty: u8,
        text: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            topic: topic.into(),
            difficulty,
            text: text.into(),
            hint: hint.into(),
        }
    }
}

/// Difficulty tier derived from a learner's accuracy and pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Challenge,
    Moderate,
    Practice,
    Remedial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Challenge,
    Moderate,
    Practice,
    Remedial,
    Similar,
}

impl From<DifficultyTier> for RecommendationKind {
    fn from(tier: DifficultyTier) -> Self {
        match tier {
            DifficultyTier::Challenge => Self::Challenge,
            DifficultyTier::Moderate => Self::Moderate,
            DifficultyTier::Practice => Self::Practice,
            DifficultyTier::Remedial => Self::Remedial,
        }
    }
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Challenge => "challenge",
            Self::Moderate => "moderate",
            Self::Practice => "practice",
            Self::Remedial => "remedial",
            Self::Similar => "similar",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub question_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Set on tier-typed rows whose question lies outside the tier's difficulty band.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub widened: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_event_converts() {
        let raw: RawAnswerEvent = serde_json::from_str(
            r#"{"answer": "3/4", "correct": true, "skipped": false, "response_time": 12.5}"#,
        )
        .unwrap();
        let event = raw.into_event("q1").unwrap();
        assert_eq!(event.question_id, "q1");
        assert_eq!(event.answer_text, "3/4");
        assert!(event.correct);
        assert!((event.response_time_seconds - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_raw_event_missing_field_is_malformed() {
        let raw: RawAnswerEvent =
            serde_json::from_str(r#"{"answer": "x", "correct": true, "skipped": false}"#).unwrap();
        let err = raw.into_event("q7").unwrap_err();
        match err {
            EngineError::MalformedEvent { question_id, reason } => {
                assert_eq!(question_id, "q7");
                assert!(reason.contains("response_time"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_raw_event_negative_time_rejected() {
        let raw = RawAnswerEvent {
            answer: None,
            correct: Some(false),
            skipped: Some(true),
            response_time: Some(-1.0),
        };
        assert!(raw.into_event("q1").is_err());
    }

    #[test]
    fn test_recommendation_serializes_type_field() {
        let rec = Recommendation {
            kind: RecommendationKind::Challenge,
            question_id: "q4".into(),
            score: None,
            widened: false,
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "challenge");
        assert!(json.get("score").is_none());
        assert!(json.get("widened").is_none());

        let widened = Recommendation { widened: true, ..rec };
        assert_eq!(serde_json::to_value(&widened).unwrap()["widened"], true);
    }

    #[test]
    fn test_profile_without_id_and_offset() {
        let profile: LearnerProfile = serde_json::from_str(
            r#"{"accuracy": 0.75, "pace": 25.5, "engagement": 0.9, "quiz_count": 3,
                "last_updated": "2024-05-01T10:20:30.123456"}"#,
        )
        .unwrap();
        assert!(profile.student_id.is_empty());
        assert_eq!(
            profile.last_updated.to_rfc3339(),
            "2024-05-01T10:20:30.123456+00:00"
        );
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let offset = parse_timestamp("2024-05-01T12:20:30+02:00").unwrap();
        let naive = parse_timestamp("2024-05-01T10:20:30").unwrap();
        assert_eq!(offset, naive);
        assert_eq!(parse_timestamp("2024-05-01 10:20:30"), Some(naive));
        assert!(parse_timestamp("yesterday").is_none());
    }
}
