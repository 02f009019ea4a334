//! # adaptive-quiz
//!
//! Learner profiling and next-question recommendation for quiz sessions.
//!
//! - [`services::profile`] folds answer batches into per-student profiles
//!   (accuracy, pace, engagement) and writes them through a [`persistence`] repository
//! - [`services::recommender`] maps a profile to a difficulty tier and ranks bank
//!   questions by difficulty fit and keyword similarity
//! - [`services::keywords`] / [`services::similarity`] provide the text heuristics
//! - [`services::insights`] and [`services::grading`] are small helpers used around a quiz
//!
//! ```rust
//! use adaptive_quiz::models::{AnswerEvent, Question};
//! use adaptive_quiz::persistence::InMemoryProfileRepository;
//! use adaptive_quiz::services::{AggregationMode, ProfileStore, RecommendRequest, Recommender};
//!
//! let mut store = ProfileStore::open(InMemoryProfileRepository::new(), AggregationMode::PerCall).unwrap();
//! let profile = store
//!     .update("s1", &[AnswerEvent::answered("q1", "4", true, 12.0)])
//!     .unwrap();
//!
//! let bank = vec![Question::new("q2", "algebra", 4, "Solve 3x + 1 = 10", "Subtract first")];
//! let recs = Recommender::default().recommend("s1", &profile, &bank, &RecommendRequest::new());
//! assert_eq!(recs[0].question_id, "q2");
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod persistence;
pub mod services;

pub use config::{Config, EngineSettings};
pub use error::{EngineError, EngineResult};
pub use models::{AnswerEvent, LearnerProfile, Question, RawAnswerEvent, Recommendation, RecommendationKind};
