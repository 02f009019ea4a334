#![allow(dead_code)]

use chrono::{TimeZone, Utc};

use adaptive_quiz::models::{AnswerEvent, LearnerProfile, Question};

pub fn sample_bank() -> Vec<Question> {
    vec![
        Question::new("q1", "fractions", 1, "What is 1/2 + 1/4?", "Find a common denominator"),
        Question::new("q2", "fractions", 2, "Simplify the fraction 6/8", "Divide by the greatest common factor"),
        Question::new("q3", "algebra", 2, "Solve for x: x + 5 = 12", "Subtract 5 from both sides"),
        Question::new("q4", "algebra", 3, "Solve for x: 3x - 4 = 11", "Add 4, then divide by 3"),
        Question::new("q5", "geometry", 3, "Find the area of a rectangle 4 by 7", "Multiply length by width"),
        Question::new("q6", "geometry", 4, "Find the area of a triangle with base 10 and height 6", "Half of base times height"),
        Question::new("q7", "algebra", 4, "Solve the system x + y = 10 and x - y = 2", "Add the equations"),
        Question::new("q8", "algebra", 5, "Factor the quadratic x^2 - 5x + 6", "Find two numbers that multiply to 6"),
    ]
}

pub fn profile(student_id: &str, accuracy: f64, pace: f64, engagement: f64) -> LearnerProfile {
    LearnerProfile {
        student_id: student_id.to_string(),
        accuracy,
        pace,
        engagement,
        quiz_count: 3,
        last_updated: Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap(),
    }
}

/// q1 correct, q2 wrong, q3 skipped.
pub fn mixed_quiz() -> Vec<AnswerEvent> {
    vec![
        AnswerEvent::answered("q1", "3/4", true, 25.0),
        AnswerEvent::answered("q2", "2/3", false, 30.0),
        AnswerEvent::skipped("q3", 5.0),
    ]
}
