//! Per-page dashboard state: the loaded dataset, the active region, and the
//! search / filter / column / page state derived from it.
//!
//! All transitions happen on discrete events from the UI loop. Loads are
//! tracked by [`RequestId`]: only the completion of the most recently issued
//! request is applied, older ones are discarded.

use crate::core::columns::ColumnVisibility;
use crate::core::error::LoadError;
use crate::core::filter::{FilterEngine, FilterPredicate};
use crate::core::notification::{Notification, Notifications};
use crate::core::pagination::Pagination;
use crate::core::types::{DataSource, Dataset, RequestId, Row};
use std::ops::Range;
use tracing::{debug, info, warn};

/// What happened to a completed load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The dataset was replaced
    Applied,
    /// The load failed and the error was surfaced
    Failed,
    /// A newer request was issued meanwhile; nothing changed
    Stale,
}

/// Rows of the current page plus where they sit in the filtered set
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    pub rows: Vec<&'a Row>,
    pub range: Range<usize>,
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    source: DataSource,
    dataset: Dataset,
    active_tab: Option<String>,
    search_term: String,
    predicates: Vec<FilterPredicate>,
    columns: ColumnVisibility,
    pagination: Pagination,
    loading: bool,
    latest_request: Option<RequestId>,
    notifications: Notifications,
}

impl DashboardState {
    pub fn new(source: DataSource, page_size: usize, notifications: Notifications) -> Self {
        Self {
            source,
            dataset: Dataset::new(),
            active_tab: None,
            search_term: String::new(),
            predicates: Vec::new(),
            columns: ColumnVisibility::new(),
            pagination: Pagination::new(page_size),
            loading: false,
            latest_request: None,
            notifications,
        }
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.active_tab.as_deref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn predicates(&self) -> &[FilterPredicate] {
        &self.predicates
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_requested(&self) -> bool {
        self.latest_request.is_some()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    /// Issue a new request id and raise the loading flag
    pub fn begin_load(&mut self) -> RequestId {
        let id = self
            .latest_request
            .map(|id| id.next())
            .unwrap_or_else(|| RequestId::new(1));
        self.latest_request = Some(id);
        self.loading = true;
        debug!("{} load {} started", self.source, id);
        id
    }

    /// Apply the result of request `id` unless a newer request superseded it.
    pub fn complete_load(&mut self, id: RequestId, result: Result<Dataset, LoadError>) -> LoadOutcome {
        if self.latest_request != Some(id) {
            debug!("{} load {} discarded as stale", self.source, id);
            return LoadOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(dataset) => {
                info!(
                    "Loaded {} records from {} across {} regions",
                    dataset.total_records(),
                    self.source.title(),
                    dataset.region_count()
                );
                self.replace_dataset(dataset);
                LoadOutcome::Applied
            }
            Err(err) => {
                warn!("Error loading {} data: {}", self.source.title(), err);
                if matches!(err, LoadError::MalformedResponse(_)) {
                    self.dataset = Dataset::new();
                    self.pagination.first();
                }
                self.notifications
                    .push(Notification::error(err.user_message(self.source.title())));
                LoadOutcome::Failed
            }
        }
    }

    fn replace_dataset(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        if let Some(first) = self.dataset.first_region() {
            self.active_tab = Some(first.to_string());
        }
        self.seed_active_columns();
        let total = self.filtered_rows().len();
        self.pagination.clamp(total);
    }

    fn seed_active_columns(&mut self) {
        if let Some(tab) = &self.active_tab {
            let sample = self.dataset.rows(tab).first();
            self.columns.seed(tab, sample);
        }
    }

    /// Switch region. Search and filters are cleared; the region's columns are
    /// seeded if it has never been seeded.
    pub fn select_tab(&mut self, tab: &str) {
        self.active_tab = Some(tab.to_string());
        self.search_term.clear();
        self.predicates.clear();
        self.pagination.first();
        self.seed_active_columns();
    }

    pub fn next_tab(&mut self) {
        self.step_tab(1);
    }

    pub fn prev_tab(&mut self) {
        self.step_tab(-1);
    }

    fn step_tab(&mut self, delta: isize) {
        let names = self.dataset.region_names();
        if names.is_empty() {
            return;
        }
        let len = names.len() as isize;
        let current = self
            .active_tab
            .as_deref()
            .and_then(|t| self.dataset.position(t))
            .unwrap_or(0) as isize;
        let target = names[(current + delta).rem_euclid(len) as usize].to_string();
        self.select_tab(&target);
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.pagination.first();
    }

    pub fn apply_filters(&mut self, predicates: Vec<FilterPredicate>) {
        self.predicates = predicates;
        self.pagination.first();
    }

    pub fn clear_filters(&mut self) {
        self.apply_filters(Vec::new());
    }

    pub fn set_visible_columns(&mut self, columns: Vec<String>) {
        if let Some(tab) = &self.active_tab {
            self.columns.set_visible(tab, columns);
        }
    }

    pub fn toggle_column(&mut self, column: &str) {
        let natural = self.all_columns();
        if let Some(tab) = &self.active_tab {
            self.columns.toggle(tab, column, &natural);
        }
    }

    pub fn show_all_columns(&mut self) {
        let natural = self.all_columns();
        if let Some(tab) = &self.active_tab {
            self.columns.show_all(tab, &natural);
        }
    }

    /// Rows of the active region; empty for an unknown or unset region
    pub fn active_rows(&self) -> &[Row] {
        self.active_tab
            .as_deref()
            .map(|t| self.dataset.rows(t))
            .unwrap_or(&[])
    }

    /// Columns of the active region as given by its first row
    pub fn all_columns(&self) -> Vec<String> {
        self.active_rows()
            .first()
            .map(|r| r.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn visible_columns(&self) -> &[String] {
        self.active_tab
            .as_deref()
            .map(|t| self.columns.visible(t))
            .unwrap_or(&[])
    }

    pub fn filtered_rows(&self) -> Vec<&Row> {
        FilterEngine::apply(self.active_rows(), &self.search_term, &self.predicates)
    }

    pub fn next_page(&mut self) {
        let total = self.filtered_rows().len();
        self.pagination.next(total);
    }

    pub fn prev_page(&mut self) {
        self.pagination.prev();
    }

    pub fn first_page(&mut self) {
        self.pagination.first();
    }

    pub fn last_page(&mut self) {
        let total = self.filtered_rows().len();
        self.pagination.last(total);
    }

    pub fn cycle_page_size(&mut self) {
        self.pagination.cycle_page_size();
    }

    pub fn current_page(&self) -> PageView<'_> {
        let filtered = self.filtered_rows();
        let total = filtered.len();
        let mut pagination = self.pagination;
        pagination.clamp(total);
        let range = pagination.range(total);

        PageView {
            rows: filtered[range.clone()].to_vec(),
            range,
            total,
            page: pagination.page(),
            page_count: pagination.page_count(total),
        }
    }
}
