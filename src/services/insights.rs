use serde::{Deserialize, Serialize};

use crate::models::LearnerProfile;

const PLAN_WEEKS: u32 = 4;
const MAX_FOCUS_AREAS: usize = 3;

/// Topics to revisit, picked from the overall accuracy band.
pub fn weak_topics(profile: Option<&LearnerProfile>) -> Vec<&'static str> {
    let Some(profile) = profile else {
        return vec!["fractions", "algebra"];
    };

    if profile.accuracy < 0.6 {
        vec!["fractions", "basic arithmetic"]
    } else if profile.accuracy < 0.8 {
        vec!["algebra", "geometry"]
    } else {
        vec!["advanced algebra", "calculus"]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningVelocity {
    InsufficientData,
    FastImprovement,
    SteadyImprovement,
    Stable,
    NeedsAttention,
}

/// Least-squares slope of `values` against their index; `None` under two points.
pub fn trend_slope(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let denom = n * sum_x2 - sum_x * sum_x;
    if denom.abs() < f64::EPSILON {
        return None;
    }
    Some((n * sum_xy - sum_x * sum_y) / denom)
}

pub fn learning_velocity(accuracy_history: &[f64]) -> LearningVelocity {
    match trend_slope(accuracy_history) {
        None => LearningVelocity::InsufficientData,
        Some(slope) if slope > 0.05 => LearningVelocity::FastImprovement,
        Some(slope) if slope > 0.02 => LearningVelocity::SteadyImprovement,
        Some(slope) if slope > -0.02 => LearningVelocity::Stable,
        Some(_) => LearningVelocity::NeedsAttention,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub duration_weeks: u32,
    pub sessions_per_week: u32,
    pub session_duration_minutes: u32,
    pub focus_areas: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn study_plan(profile: &LearnerProfile, weak_topics: &[&str]) -> StudyPlan {
    let mut plan = StudyPlan {
        duration_weeks: PLAN_WEEKS,
        sessions_per_week: 3,
        session_duration_minutes: 30,
        focus_areas: weak_topics
            .iter()
            .take(MAX_FOCUS_AREAS)
            .map(|t| t.to_string())
            .collect(),
        recommendations: Vec::new(),
    };
    let mut advise = |text: &str| plan.recommendations.push(text.to_string());

    if profile.accuracy < 0.5 {
        advise("Focus on fundamental concepts");
        advise("Use visual aids and manipulatives");
    } else if profile.accuracy < 0.7 {
        advise("Practice mixed problem sets");
        advise("Review mistakes and understand errors");
    } else {
        advise("Challenge yourself with advanced problems");
        advise("Explore real-world applications");
    }

    if profile.engagement < 0.7 {
        advise("Try interactive learning tools");
        advise("Set small, achievable goals");
    }

    if profile.pace > 35.0 {
        advise("Practice timed exercises to improve speed");
    } else if profile.pace < 15.0 {
        advise("Slow down and double-check your work");
    }

    if profile.accuracy < 0.5 {
        plan.session_duration_minutes = 45;
        plan.sessions_per_week = 4;
    } else if profile.accuracy >= 0.7 {
        plan.session_duration_minutes = 25;
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(accuracy: f64, pace: f64, engagement: f64) -> LearnerProfile {
        LearnerProfile {
            student_id: "s1".into(),
            accuracy,
            pace,
            engagement,
            quiz_count: 2,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_weak_topics_bands() {
        assert_eq!(weak_topics(None), vec!["fractions", "algebra"]);
        assert_eq!(weak_topics(Some(&profile(0.4, 20.0, 1.0))), vec!["fractions", "basic arithmetic"]);
        assert_eq!(weak_topics(Some(&profile(0.7, 20.0, 1.0))), vec!["algebra", "geometry"]);
        assert_eq!(weak_topics(Some(&profile(0.9, 20.0, 1.0))), vec!["advanced algebra", "calculus"]);
    }

    #[test]
    fn test_velocity() {
        assert_eq!(learning_velocity(&[0.5]), LearningVelocity::InsufficientData);
        assert_eq!(learning_velocity(&[0.4, 0.5, 0.6]), LearningVelocity::FastImprovement);
        assert_eq!(learning_velocity(&[0.5, 0.53, 0.56]), LearningVelocity::SteadyImprovement);
        assert_eq!(learning_velocity(&[0.7, 0.7, 0.7]), LearningVelocity::Stable);
        assert_eq!(learning_velocity(&[0.9, 0.7, 0.5]), LearningVelocity::NeedsAttention);
    }

    #[test]
    fn test_struggling_plan() {
        let plan = study_plan(&profile(0.3, 40.0, 0.5), &["fractions", "basic arithmetic"]);
        assert_eq!(plan.session_duration_minutes, 45);
        assert_eq!(plan.sessions_per_week, 4);
        assert_eq!(plan.focus_areas, vec!["fractions", "basic arithmetic"]);
        assert_eq!(plan.recommendations.len(), 5);
        assert!(plan
            .recommendations
            .iter()
            .any(|r| r.contains("timed exercises")));
    }

    #[test]
    fn test_advanced_plan() {
        let plan = study_plan(&profile(0.9, 10.0, 0.95), &["a", "b", "c", "d"]);
        assert_eq!(plan.session_duration_minutes, 25);
        assert_eq!(plan.sessions_per_week, 3);
        assert_eq!(plan.focus_areas.len(), 3);
        assert_eq!(
            plan.recommendations.last().map(String::as_str),
            Some("Slow down and double-check your work")
        );
    }
}
