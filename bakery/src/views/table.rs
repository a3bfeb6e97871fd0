use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::csv::{CsvRow, to_csv};
use super::debounce::SearchDebouncer;
use crate::errors::Result;
use crate::model::{Identified, ModelId};
use crate::services::ResourceService;
use crate::stores::{BulkDeleteOutcome, FilterPatch, ResourceStore, SortDirection};

/// Single-column sort with no "unsorted" state once a column is picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    /// Clicking the active column flips it; any other column starts ascending.
    /// The returned patch also sends the table back to page 1.
    pub fn toggle(&mut self, column: &str) -> FilterPatch {
        if self.column.as_deref() == Some(column) {
            self.direction = self.direction.flipped();
        } else {
            self.column = Some(column.to_string());
            self.direction = SortDirection::Asc;
        }
        FilterPatch::new().sort(column, self.direction).page(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<ModelId>,
}

impl Selection {
    pub fn toggle(&mut self, id: ModelId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Selects every row of the page, or clears them if all already are.
    pub fn toggle_page(&mut self, page_ids: &[ModelId]) {
        if !page_ids.is_empty() && page_ids.iter().all(|id| self.ids.contains(id)) {
            for id in page_ids {
                self.ids.remove(id);
            }
        } else {
            self.ids.extend(page_ids.iter().copied());
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn retain(&mut self, keep: impl Fn(ModelId) -> bool) {
        self.ids.retain(|id| keep(*id));
    }

    pub fn contains(&self, id: ModelId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> Vec<ModelId> {
        self.ids.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// View-side state of an admin table on top of a [`ResourceStore`]: sort
/// header, debounced search box, page buttons, row selection.
pub struct TableController<S: ResourceService> {
    store: Arc<ResourceStore<S>>,
    sort: Mutex<SortState>,
    selection: Mutex<Selection>,
    debouncer: SearchDebouncer,
}

impl<S: ResourceService> TableController<S> {
    pub fn new(store: Arc<ResourceStore<S>>, search_debounce: Duration) -> Self {
        Self {
            store,
            sort: Mutex::new(SortState::default()),
            selection: Mutex::new(Selection::default()),
            debouncer: SearchDebouncer::new(search_debounce),
        }
    }

    pub fn store(&self) -> &Arc<ResourceStore<S>> {
        &self.store
    }

    pub async fn sort_state(&self) -> SortState {
        self.sort.lock().await.clone()
    }

    pub async fn selection(&self) -> Selection {
        self.selection.lock().await.clone()
    }

    pub async fn sort_by(&self, column: &str) -> Result<bool> {
        let patch = self.sort.lock().await.toggle(column);
        self.selection.lock().await.clear();
        self.store.set_filter(patch).await
    }

    pub async fn go_to_page(&self, page: u32) -> Result<bool> {
        self.selection.lock().await.clear();
        self.store.set_filter(FilterPatch::new().page(page)).await
    }

    /// Called on every keystroke. Only the last one in a quiet window reaches
    /// the store; the others return `Ok(false)` without touching the filter.
    pub async fn on_search_input(&self, term: &str) -> Result<bool> {
        let Some(term) = self.debouncer.settle(term.trim().to_string()).await else {
            return Ok(false);
        };
        if self.store.filter().await.search_term == term {
            return Ok(false);
        }
        self.selection.lock().await.clear();
        self.store
            .set_filter(FilterPatch::new().search(term).page(1))
            .await
    }

    pub async fn toggle_row(&self, id: ModelId) {
        self.selection.lock().await.toggle(id);
    }

    pub async fn toggle_page_selection(&self) {
        let page_ids: Vec<ModelId> = self.store.items().await.iter().map(|i| i.id()).collect();
        self.selection.lock().await.toggle_page(&page_ids);
    }

    pub async fn delete_selected(&self) -> Result<BulkDeleteOutcome> {
        let ids = self.selection.lock().await.ids();
        let outcome = self.store.bulk_delete(&ids).await?;

        let mut selection = self.selection.lock().await;
        if outcome.is_success() {
            selection.clear();
        } else {
            let remaining: BTreeSet<ModelId> =
                self.store.items().await.iter().map(|i| i.id()).collect();
            selection.retain(|id| remaining.contains(&id));
        }
        Ok(outcome)
    }
}

impl<S> TableController<S>
where
    S: ResourceService,
    S::Item: CsvRow,
{
    /// The page currently on screen as CSV.
    pub async fn export_csv(&self) -> String {
        to_csv(&self.store.items().await)
    }
}
