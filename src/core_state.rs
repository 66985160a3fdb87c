//! Shared application state for whatever transport hosts the clinical core.
//!
//! Growth tables are immutable and handed out as `Arc` clones; the learning
//! store is reached by opening a fresh connection per request.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::config;
use crate::db;
use crate::growth::{GrowthError, GrowthReference};
use crate::learning::{LearningConfig, PracticeLearning};

pub struct CoreState {
    /// Swapped wholesale on reload; readers keep the `Arc` they cloned.
    growth: RwLock<Arc<GrowthReference>>,
    learning: PracticeLearning,
    db_path: PathBuf,
}

impl CoreState {
    /// Bundled growth tables, default thresholds, database in the data dir.
    pub fn new() -> Self {
        Self::with_config(config::database_path(), LearningConfig::default())
    }

    pub fn with_config(db_path: PathBuf, learning: LearningConfig) -> Self {
        Self {
            growth: RwLock::new(Arc::new(GrowthReference::bundled())),
            learning: PracticeLearning::new(learning),
            db_path,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a database connection to the learning store.
    ///
    /// Creates the parent directory on first use; migrations run on open.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::DataDir(format!("{}: {e}", parent.display())))?;
        }
        db::open_database(&self.db_path).map_err(CoreError::Database)
    }

    pub fn growth_reference(&self) -> Result<Arc<GrowthReference>, CoreError> {
        let guard = self.growth.read().map_err(|_| CoreError::LockPoisoned)?;
        Ok(Arc::clone(&guard))
    }

    /// Replace the growth tables with the ones in a JSON file.
    ///
    /// On error the current tables stay in place.
    pub fn reload_growth_reference(&self, path: &Path) -> Result<(), CoreError> {
        let reference = GrowthReference::load(path)?;
        let mut guard = self.growth.write().map_err(|_| CoreError::LockPoisoned)?;
        *guard = Arc::new(reference);
        tracing::info!(path = %path.display(), "Growth reference reloaded");
        Ok(())
    }

    pub fn learning(&self) -> &PracticeLearning {
        &self.learning
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
    #[error("Growth reference error: {0}")]
    Growth(#[from] GrowthError),
    #[error("Cannot create data directory {0}")]
    DataDir(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionData, AnonymizedContext, MeasurementKind, Sex};

    fn temp_state(dir: &tempfile::TempDir) -> CoreState {
        CoreState::with_config(
            dir.path().join("nested").join("practice.db"),
            LearningConfig::default(),
        )
    }

    #[test]
    fn open_db_creates_directory_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let state = temp_state(&dir);
        let conn = state.open_db().unwrap();
        assert_eq!(db::sqlite::count_tables(&conn).unwrap(), 4);
        assert!(state.db_path().exists());
    }

    #[test]
    fn learning_goes_through_state_connection() {
        let dir = tempfile::tempdir().unwrap();
        let state = temp_state(&dir);
        let conn = state.open_db().unwrap();
        let ctx = AnonymizedContext {
            consultation_type: Some("postnatale".into()),
            ..Default::default()
        };
        let action = ActionData::Advice { topic: "allaitement".into(), text: None };
        for _ in 0..3 {
            state.learning().record_observation(&conn, "u1", &ctx, &action).unwrap();
        }
        let suggestions = state.learning().suggest(&conn, "u1", &ctx).unwrap();
        assert_eq!(suggestions.len(), 1);
    }

    #[test]
    fn growth_reference_shared_between_readers() {
        let state = CoreState::default();
        let a = state.growth_reference().unwrap();
        let b = state.growth_reference().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.table(Sex::Female, MeasurementKind::Weight).is_ok());
    }

    #[test]
    fn reload_keeps_tables_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = temp_state(&dir);
        let before = state.growth_reference().unwrap();

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{\"not\": \"tables\"}").unwrap();
        assert!(matches!(
            state.reload_growth_reference(&bad).unwrap_err(),
            CoreError::Growth(_)
        ));
        assert!(Arc::ptr_eq(&before, &state.growth_reference().unwrap()));

        let good = dir.path().join("good.json");
        std::fs::write(&good, GrowthReference::bundled().to_json().unwrap()).unwrap();
        state.reload_growth_reference(&good).unwrap();
        assert!(!Arc::ptr_eq(&before, &state.growth_reference().unwrap()));
    }
}
