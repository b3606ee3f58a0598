use std::path::PathBuf;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::filter::{default_selection, FilterSelection};
use crate::data::loader::{LoadStatus, TableCache};
use crate::data::model::{CellValue, Table, CITY};
use crate::data::views::RenderPass;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Chart tabs in the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    CityAnalysis,
    PriceRelationship,
    CuisineDistribution,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Owns the loaded table for the current data path.
    pub cache: TableCache,

    /// Table currently shown (empty when nothing could be loaded).
    pub table: Arc<Table>,

    /// Status of the last load, `None` after an unexpected failure.
    pub load_status: Option<LoadStatus>,

    /// Distinct cities in encounter order; the filter's options.
    pub city_options: Vec<CellValue>,

    /// Cities picked in the side panel.
    pub selection: FilterSelection,

    /// Views derived from the current table and selection (cached).
    pub pass: RenderPass,

    /// City colours shared by the charts.
    pub color_map: ColorMap,

    pub active_tab: Tab,

    /// Error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let cache = TableCache::new(config.data_path.clone());
        let mut state = Self {
            config,
            cache,
            table: Arc::new(Table::empty()),
            load_status: None,
            city_options: Vec::new(),
            selection: FilterSelection::new(),
            pass: RenderPass::default(),
            color_map: ColorMap::new(&[]),
            active_tab: Tab::default(),
            status_message: None,
        };
        state.sync_with_disk();
        state
    }

    /// Ask the cache for the table; ingest it if it was (re)read from disk.
    pub fn sync_with_disk(&mut self) {
        match self.cache.load() {
            Ok(loaded) => {
                if !loaded.from_cache {
                    self.status_message = None;
                    self.load_status = Some(loaded.status);
                    self.set_table(loaded.table);
                }
            }
            Err(e) => {
                let message = format!("Error: {e:#}");
                if self.status_message.as_ref() == Some(&message) {
                    return;
                }
                log::error!("Failed to load {}: {e:#}", self.cache.path().display());
                self.status_message = Some(message);
                self.load_status = None;
                self.set_table(Arc::new(Table::empty()));
            }
        }
    }

    /// Re-read the current file even if it looks unchanged.
    pub fn reload(&mut self) {
        self.cache.invalidate();
        self.sync_with_disk();
    }

    /// Switch to another CSV file.
    pub fn open_path(&mut self, path: PathBuf) {
        log::info!("Opening {}", path.display());
        self.cache.open(path);
        self.selection.clear();
        self.sync_with_disk();
    }

    /// Ingest a newly loaded table, keep the still-valid selection and
    /// rebuild the colour map.
    pub fn set_table(&mut self, table: Arc<Table>) {
        self.city_options = table.unique_values(CITY);
        self.color_map = ColorMap::new(&self.city_options);

        self.selection.retain_available(&self.city_options);
        if self.selection.is_empty() {
            self.selection = default_selection(&self.city_options, self.config.default_city_count);
        }

        self.table = table;
        self.refilter();
    }

    /// Recompute the render pass after a filter change.
    pub fn refilter(&mut self) {
        self.pass = RenderPass::build(&self.table, &self.selection, &self.config.limits());
    }

    /// Toggle a single city in the filter.
    pub fn toggle_city(&mut self, city: &CellValue) {
        self.selection.toggle(city);
        self.refilter();
    }

    /// Select every city.
    pub fn select_all(&mut self) {
        self.selection = self.city_options.iter().cloned().collect();
        self.refilter();
    }

    /// Clear the selection, which shows every row.
    pub fn select_none(&mut self) {
        self.selection.clear();
        self.refilter();
    }

    /// Restore the startup selection.
    pub fn select_defaults(&mut self) {
        self.selection = default_selection(&self.city_options, self.config.default_city_count);
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn state_for(csv: &str) -> (NamedTempFile, AppState) {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "{}", csv).unwrap();
        let config = DashboardConfig {
            data_path: tmp.path().to_path_buf(),
            ..DashboardConfig::default()
        };
        (tmp, AppState::new(config))
    }

    #[test]
    fn test_startup_selects_first_two_cities() {
        let (_tmp, state) = state_for("City,Rating\nParis,4\nRome,3\nOslo,5\nParis,2\n");
        assert_eq!(state.load_status, Some(LoadStatus::Loaded { rows: 4 }));
        assert_eq!(state.selection.len(), 2);
        assert!(state.selection.contains(&CellValue::from("Paris")));
        assert!(state.selection.contains(&CellValue::from("Rome")));
        assert_eq!(state.pass.row_count, 3);
    }

    #[test]
    fn test_select_none_shows_everything() {
        let (_tmp, mut state) = state_for("City,Rating\nParis,4\nRome,3\nOslo,5\n");
        state.select_none();
        assert_eq!(state.pass.row_count, 3);

        state.toggle_city(&CellValue::from("Oslo"));
        assert_eq!(state.pass.row_count, 1);
    }

    #[test]
    fn test_missing_file_state() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig {
            data_path: dir.path().join("missing.csv"),
            ..DashboardConfig::default()
        };
        let state = AppState::new(config);

        assert!(state.table.is_empty());
        assert!(matches!(state.load_status, Some(LoadStatus::Missing(_))));
        assert!(state.status_message.is_none());
        assert!(state.city_options.is_empty());
    }

    #[test]
    fn test_malformed_file_reports_error() {
        let (_tmp, state) = state_for("City,Rating\nParis,4,extra\n");
        assert!(state.table.is_empty());
        assert!(state.load_status.is_none());
        assert!(state.status_message.is_some());
    }
}
