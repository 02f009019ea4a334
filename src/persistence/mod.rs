//! Profile persistence
//!
//! The profile store talks to its backing storage only through
//! [`ProfileRepository`]. Two implementations ship with the crate:
//!
//! - [`InMemoryProfileRepository`] for tests and embedding
//! - [`JsonFileProfileRepository`] which keeps every profile in one JSON object
//!   keyed by student id, rewritten on each save (last write wins)
//!
//! Writers are assumed to be serialized by the caller.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileProfileRepository;
pub use memory::InMemoryProfileRepository;

use std::collections::HashMap;

use thiserror::Error;

use crate::models::LearnerProfile;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("profile store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("profile serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("profile store is corrupt: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait ProfileRepository {
    fn load_all(&self) -> StoreResult<HashMap<String, LearnerProfile>>;

    fn load(&self, student_id: &str) -> StoreResult<Option<LearnerProfile>>;

    fn save(&self, student_id: &str, profile: &LearnerProfile) -> StoreResult<()>;
}

impl<R: ProfileRepository + ?Sized> ProfileRepository for &R {
    fn load_all(&self) -> StoreResult<HashMap<String, LearnerProfile>> {
        (**self).load_all()
    }

    fn load(&self, student_id: &str) -> StoreResult<Option<LearnerProfile>> {
        (**self).load(student_id)
    }

    fn save(&self, student_id: &str, profile: &LearnerProfile) -> StoreResult<()> {
        (**self).save(student_id, profile)
    }
}
