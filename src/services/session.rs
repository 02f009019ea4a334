use serde::{Deserialize, Serialize};

use crate::models::AnswerEvent;

/// Metrics of a single batch of answer events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub total: usize,
    pub correct: usize,
    pub skipped: usize,
    pub accuracy: f64,
    pub engagement: f64,
    pub pace: f64,
}

impl SessionMetrics {
    /// An empty batch has accuracy 0, engagement 1 (nothing was skipped) and pace 0.
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a AnswerEvent>,
    {
        let mut total = 0_usize;
        let mut correct = 0_usize;
        let mut skipped = 0_usize;
        let mut time_sum = 0.0_f64;

        for event in events {
            total += 1;
            if event.correct {
                correct += 1;
            }
            if event.skipped {
                skipped += 1;
            }
            time_sum += event.response_time_seconds;
        }

        if total == 0 {
            return Self {
                total,
                correct,
                skipped,
                accuracy: 0.0,
                engagement: 1.0,
                pace: 0.0,
            };
        }

        let n = total as f64;
        Self {
            total,
            correct,
            skipped,
            accuracy: (correct as f64 / n).clamp(0.0, 1.0),
            engagement: (1.0 - skipped as f64 / n).clamp(0.0, 1.0),
            pace: time_sum / n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
