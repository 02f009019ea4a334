use std::collections::HashMap;

use parking_lot::RwLock;

use crate::models::LearnerProfile;
use crate::persistence::{ProfileRepository, StoreResult};

#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<String, LearnerProfile>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: impl IntoIterator<Item = LearnerProfile>) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|p| (p.student_id.clone(), p))
            .collect();
        Self {
            profiles: RwLock::new(profiles),
        }
    }

    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }
}

impl ProfileRepository for InMemoryProfileRepository {
    fn load_all(&self) -> StoreResult<HashMap<String, LearnerProfile>> {
        Ok(self.profiles.read().clone())
    }

    fn load(&self, student_id: &str) -> StoreResult<Option<LearnerProfile>> {
        Ok(self.profiles.read().get(student_id).cloned())
    }

    fn save(&self, student_id: &str, profile: &LearnerProfile) -> StoreResult<()> {
        self.profiles
            .write()
            .insert(student_id.to_string(), profile.clone());
        Ok(())
    }
}
