//! In-progress questionnaire persistence.
//!
//! A draft is whatever the user has answered so far, unvalidated. Nothing in the engines reads
//! or writes drafts; front ends use a [`DraftStore`] to resume an interrupted intake.

use crate::error::{TriageError, TriageResult};
use crate::questionnaire::Questionnaire;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub trait DraftStore {
    fn load(&self) -> TriageResult<Option<Questionnaire>>;
    fn save(&self, draft: &Questionnaire) -> TriageResult<()>;
    fn clear(&self) -> TriageResult<()>;
}

#[derive(Debug, Default)]
pub struct InMemoryDraftStore {
    draft: Mutex<Option<Questionnaire>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Questionnaire>> {
        // A poisoned lock still holds a usable draft.
        self.draft.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DraftStore for InMemoryDraftStore {
    fn load(&self) -> TriageResult<Option<Questionnaire>> {
        Ok(self.slot().clone())
    }

    fn save(&self, draft: &Questionnaire) -> TriageResult<()> {
        *self.slot() = Some(draft.clone());
        Ok(())
    }

    fn clear(&self) -> TriageResult<()> {
        *self.slot() = None;
        Ok(())
    }
}

/// Draft kept as a JSON file.
#[derive(Clone, Debug)]
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self) -> TriageResult<Option<Questionnaire>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TriageError::FileRead(e)),
        };
        Ok(Some(Questionnaire::from_json_slice(&bytes)?))
    }

    fn save(&self, draft: &Questionnaire) -> TriageResult<()> {
        let json = serde_json::to_string_pretty(draft)
            .map_err(|e| TriageError::InvalidInput(format!("failed to serialise draft: {e}")))?;
        std::fs::write(&self.path, json).map_err(TriageError::FileWrite)?;
        tracing::debug!("saved draft to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> TriageResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TriageError::FileWrite(e)),
        }
    }
}
