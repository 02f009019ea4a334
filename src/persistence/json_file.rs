use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::models::LearnerProfile;
use crate::persistence::{ProfileRepository, StoreError, StoreResult};

/// Profiles stored as one pretty-printed JSON object, `{ student_id: profile }`.
///
/// Saves rewrite the whole file through a sibling temp file and a rename, so a
/// crash mid-write leaves the previous version in place.
#[derive(Debug)]
pub struct JsonFileProfileRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileProfileRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> StoreResult<BTreeMap<String, LearnerProfile>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let mut profiles: BTreeMap<String, LearnerProfile> = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", self.path.display())))?;

        // Older files key profiles by student without repeating the id inside.
        for (student_id, profile) in profiles.iter_mut() {
            if profile.student_id.is_empty() {
                profile.student_id.clone_from(student_id);
            }
        }
        Ok(profiles)
    }

    fn write_map(&self, profiles: &BTreeMap<String, LearnerProfile>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        {
            let file = fs::File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, profiles)?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl ProfileRepository for JsonFileProfileRepository {
    fn load_all(&self) -> StoreResult<HashMap<String, LearnerProfile>> {
        Ok(self.read_map()?.into_iter().collect())
    }

    fn load(&self, student_id: &str) -> StoreResult<Option<LearnerProfile>> {
        Ok(self.read_map()?.remove(student_id))
    }

    fn save(&self, student_id: &str, profile: &LearnerProfile) -> StoreResult<()> {
        let _guard = self.write_lock.lock();
        let mut profiles = self.read_map()?;
        profiles.insert(student_id.to_string(), profile.clone());
        self.write_map(&profiles)?;
        tracing::debug!(student_id, path = %self.path.display(), "profile written");
        Ok(())
    }
}
