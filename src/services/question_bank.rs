use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::models::{Question, MAX_DIFFICULTY, MIN_DIFFICULTY};

/// Ordered collection of questions with unique ids and difficulties in 1..=5.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
    index: HashMap<String, usize>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> EngineResult<Self> {
        let mut index = HashMap::with_capacity(questions.len());

        for (pos, question) in questions.iter().enumerate() {
            if question.question_id.trim().is_empty() {
                return Err(EngineError::InvalidQuestion {
                    question_id: question.question_id.clone(),
                    reason: "empty question id".to_string(),
                });
            }
            if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&question.difficulty) {
                return Err(EngineError::InvalidQuestion {
                    question_id: question.question_id.clone(),
                    reason: format!(
                        "difficulty {} outside {MIN_DIFFICULTY}..={MAX_DIFFICULTY}",
                        question.difficulty
                    ),
                });
            }
            if index.insert(question.question_id.clone(), pos).is_some() {
                return Err(EngineError::DuplicateQuestion(question.question_id.clone()));
            }
        }

        Ok(Self { questions, index })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, question_id: &str) -> Option<&Question> {
        self.index.get(question_id).map(|&pos| &self.questions[pos])
    }

    pub fn by_topic<'a>(&'a self, topic: &'a str) -> impl Iterator<Item = &'a Question> + 'a {
        self.questions
            .iter()
            .filter(move |q| q.topic.eq_ignore_ascii_case(topic))
    }

    pub fn by_difficulty(&self, difficulty: u8) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.difficulty == difficulty)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_order() {
        let bank = QuestionBank::new(vec![
            Question::new("q2", "algebra", 3, "Solve 2x = 8", "Divide both sides"),
            Question::new("q1", "fractions", 1, "Add 1/2 and 1/4", "Common denominator"),
        ])
        .unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.questions()[0].question_id, "q2");
        assert_eq!(bank.get("q1").unwrap().topic, "fractions");
        assert!(bank.get("q9").is_none());
        assert_eq!(bank.by_topic("Algebra").count(), 1);
        assert_eq!(bank.by_difficulty(1).count(), 1);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = QuestionBank::new(vec![
            Question::new("q1", "algebra", 2, "a", ""),
            Question::new("q1", "algebra", 3, "b", ""),
        ])
        .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateQuestion(id) if id == "q1"));
    }

    #[test]
    fn test_difficulty_out_of_range() {
        assert!(QuestionBank::new(vec![Question::new("q1", "algebra", 0, "a", "")]).is_err());
        assert!(QuestionBank::new(vec![Question::new("q1", "algebra", 6, "a", "")]).is_err());
    }

    #[test]
    fn test_empty_bank() {
        let bank = QuestionBank::new(Vec::new()).unwrap();
        assert!(bank.is_empty());
    }
}
