use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

const NUMERIC_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    #[default]
    Text,
    Numeric,
    Fraction,
}

/// Compares a learner's answer with the expected one.
///
/// Both sides are trimmed and lowercased. Numeric and fraction answers compare by
/// value within 0.01 and fall back to text equality when either side does not parse.
pub fn check_answer(user_answer: &str, expected: &str, kind: AnswerKind) -> bool {
    let user = user_answer.trim().to_lowercase();
    let expected = expected.trim().to_lowercase();
    if user.is_empty() || expected.is_empty() {
        return false;
    }

    let by_value = match kind {
        AnswerKind::Text => None,
        AnswerKind::Numeric => user
            .parse::<f64>()
            .ok()
            .zip(expected.parse::<f64>().ok()),
        AnswerKind::Fraction => parse_fraction(&user).ok().zip(parse_fraction(&expected).ok()),
    };

    match by_value {
        Some((a, b)) => (a - b).abs() < NUMERIC_TOLERANCE,
        None => user == expected,
    }
}

/// Parses `"3/4"` style fractions or plain numbers.
pub fn parse_fraction(input: &str) -> EngineResult<f64> {
    let input = input.trim();
    let invalid = || EngineError::InvalidAnswerFormat(input.to_string());

    if let Some((num, den)) = input.split_once('/') {
        let num: f64 = num.trim().parse().map_err(|_| invalid())?;
        let den: f64 = den.trim().parse().map_err(|_| invalid())?;
        if den == 0.0 {
            return Err(invalid());
        }
        return Ok(num / den);
    }

    input.parse::<f64>().map_err(|_| invalid())
}
