//! Where the active rubric lives.
//!
//! Same contract as [`crate::chart_store`]: a custom rubric when one is set,
//! otherwise the built-in rubric, handed out as an `Arc` snapshot.

use std::sync::{Arc, PoisonError, RwLock};

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::StoreResult;
use crate::persist;
use crate::rubric::{self, Rubric};

/// File name of the stored custom rubric inside the data directory.
pub const RUBRIC_FILE: &str = "rubric.json";

/// Holds the active rubric.
pub trait RubricStore: Send + Sync {
    /// The custom rubric if set, otherwise the built-in rubric.
    fn active_rubric(&self) -> Arc<Rubric>;

    /// Replace the custom rubric.
    fn set_custom_rubric(&self, rubric: Rubric) -> StoreResult<()>;

    /// Drop the custom rubric.
    fn reset(&self) -> StoreResult<()>;
}

/// In-process rubric store.
#[derive(Debug, Default)]
pub struct MemoryRubricStore {
    custom: RwLock<Option<Arc<Rubric>>>,
}

impl MemoryRubricStore {
    /// A store with no custom rubric.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RubricStore for MemoryRubricStore {
    fn active_rubric(&self) -> Arc<Rubric> {
        self.custom
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_else(rubric::default_rubric)
    }

    fn set_custom_rubric(&self, rubric: Rubric) -> StoreResult<()> {
        *self.custom.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(rubric));
        Ok(())
    }

    fn reset(&self) -> StoreResult<()> {
        *self.custom.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Rubric store backed by a JSON file. A corrupt file is logged and ignored.
#[derive(Debug, Clone)]
pub struct FileRubricStore {
    path: Utf8PathBuf,
}

impl FileRubricStore {
    /// Store the rubric at `path`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the rubric as [`RUBRIC_FILE`] inside `data_dir`.
    pub fn in_dir(data_dir: &Utf8Path) -> Self {
        Self::new(data_dir.join(RUBRIC_FILE))
    }

    /// Backing file path.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl RubricStore for FileRubricStore {
    fn active_rubric(&self) -> Arc<Rubric> {
        match persist::read_json::<Rubric>(&self.path) {
            Ok(Some(rubric)) => Arc::new(rubric),
            Ok(None) => rubric::default_rubric(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring stored rubric, using built-in rubric");
                rubric::default_rubric()
            }
        }
    }

    #[tracing::instrument(skip(self, rubric), fields(path = %self.path, categories = rubric.categories.len()))]
    fn set_custom_rubric(&self, rubric: Rubric) -> StoreResult<()> {
        persist::write_json(&self.path, &rubric)?;
        tracing::info!("custom rubric saved");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(path = %self.path))]
    fn reset(&self) -> StoreResult<()> {
        persist::remove(&self.path)?;
        tracing::info!("custom rubric removed");
        Ok(())
    }
}
