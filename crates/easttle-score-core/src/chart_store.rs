//! Where the active conversion chart lives.
//!
//! The active chart is the custom chart when one has been set, otherwise the
//! built-in chart. Callers take an `Arc` snapshot with
//! [`ChartStore::active_chart`] and run lookups against it, so a chart being
//! replaced mid-lookup is never observed half-written.

use std::sync::{Arc, PoisonError, RwLock};

use camino::{Utf8Path, Utf8PathBuf};

use crate::chart::{self, ScaleConversion, ScoringChart};
use crate::error::StoreResult;
use crate::persist;

/// File name of the stored custom chart inside the data directory.
pub const CHART_FILE: &str = "scoring-chart.json";

/// Holds the active scoring chart.
pub trait ChartStore: Send + Sync {
    /// The custom chart if set, otherwise the built-in chart.
    fn active_chart(&self) -> Arc<ScoringChart>;

    /// Replace the custom chart.
    fn set_custom_chart(&self, chart: ScoringChart) -> StoreResult<()>;

    /// Drop the custom chart and fall back to the built-in one.
    fn reset(&self) -> StoreResult<()>;
}

/// Convert a total raw score against the store's active chart.
#[tracing::instrument(skip(store))]
pub fn convert(total_score: u32, store: &dyn ChartStore) -> ScaleConversion {
    store.active_chart().lookup(total_score)
}

/// In-process chart store.
#[derive(Debug, Default)]
pub struct MemoryChartStore {
    custom: RwLock<Option<Arc<ScoringChart>>>,
}

impl MemoryChartStore {
    /// A store with no custom chart.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChartStore for MemoryChartStore {
    fn active_chart(&self) -> Arc<ScoringChart> {
        self.custom
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_else(chart::default_chart)
    }

    fn set_custom_chart(&self, chart: ScoringChart) -> StoreResult<()> {
        *self.custom.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(chart));
        tracing::debug!("custom chart set");
        Ok(())
    }

    fn reset(&self) -> StoreResult<()> {
        *self.custom.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Chart store backed by a JSON file.
///
/// A missing file means no custom chart. An unreadable or corrupt file is
/// logged and ignored.
#[derive(Debug, Clone)]
pub struct FileChartStore {
    path: Utf8PathBuf,
}

impl FileChartStore {
    /// Store the chart at `path`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the chart as [`CHART_FILE`] inside `data_dir`.
    pub fn in_dir(data_dir: &Utf8Path) -> Self {
        Self::new(data_dir.join(CHART_FILE))
    }

    /// Backing file path.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl ChartStore for FileChartStore {
    fn active_chart(&self) -> Arc<ScoringChart> {
        match persist::read_json::<ScoringChart>(&self.path) {
            Ok(Some(chart)) => Arc::new(chart),
            Ok(None) => chart::default_chart(),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring stored chart, using built-in chart");
                chart::default_chart()
            }
        }
    }

    #[tracing::instrument(skip(self, chart), fields(path = %self.path, rows = chart.entries().len()))]
    fn set_custom_chart(&self, chart: ScoringChart) -> StoreResult<()> {
        persist::write_json(&self.path, &chart)?;
        tracing::info!("custom chart saved");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(path = %self.path))]
    fn reset(&self) -> StoreResult<()> {
        persist::remove(&self.path)?;
        tracing::info!("custom chart removed");
        Ok(())
    }
}
