pub mod grading;
pub mod insights;
pub mod keywords;
pub mod profile;
pub mod question_bank;
pub mod recommender;
pub mod session;
pub mod similarity;

pub use grading::{check_answer, parse_fraction, AnswerKind};
pub use insights::{learning_velocity, study_plan, weak_topics, LearningVelocity, StudyPlan};
pub use keywords::extract_keywords;
pub use profile::{AggregationMode, ProfileStore};
pub use question_bank::QuestionBank;
pub use recommender::{classify_tier, DifficultyBand, RecommendRequest, Recommender, RecommenderConfig};
pub use session::SessionMetrics;
pub use similarity::{find_similar, find_similar_questions, similarity, SimilarMatch};
