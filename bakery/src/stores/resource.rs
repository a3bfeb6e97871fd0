use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use transport::{Notifier, SessionHandle};

use super::filter::{FilterPatch, ListFilter};
use crate::errors::{Error, Result};
use crate::model::{Identified, ModelId};
use crate::services::ResourceService;

/// What a list view renders.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub total_pages: u32,
    pub filter: ListFilter,
    pub loading: bool,
    pub submitting: bool,
    pub error: Option<String>,
}

impl<T> ListState<T> {
    fn new(filter: ListFilter) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            total_pages: 0,
            filter,
            loading: false,
            submitting: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkDeleteOutcome {
    AllSucceeded(usize),
    Partial {
        succeeded: usize,
        failed: usize,
        total: usize,
    },
    AllFailed(usize),
}

impl BulkDeleteOutcome {
    fn from_counts(succeeded: usize, failed: usize) -> Self {
        let total = succeeded + failed;
        match (succeeded, failed) {
            (_, 0) => BulkDeleteOutcome::AllSucceeded(total),
            (0, _) => BulkDeleteOutcome::AllFailed(total),
            _ => BulkDeleteOutcome::Partial {
                succeeded,
                failed,
                total,
            },
        }
    }

    pub fn succeeded(&self) -> usize {
        match *self {
            BulkDeleteOutcome::AllSucceeded(n) => n,
            BulkDeleteOutcome::Partial { succeeded, .. } => succeeded,
            BulkDeleteOutcome::AllFailed(_) => 0,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BulkDeleteOutcome::AllSucceeded(_))
    }
}

/// Failures a user cannot fix by retrying: the row is still referenced.
fn is_in_use(error: &Error) -> bool {
    match error {
        Error::Api(api) => {
            api.code().as_deref() == Some("23503")
                || api.status() == Some(http::StatusCode::CONFLICT)
        }
        _ => false,
    }
}

/// Single source of truth for one resource's current page.
///
/// Loading is explicit: [`ResourceStore::set_filter`] merges and then reloads
/// in the same call. Each load takes a generation number and a reply that
/// arrives after a newer load started is dropped.
pub struct ResourceStore<S: ResourceService> {
    service: Arc<S>,
    session: SessionHandle,
    notifier: Arc<dyn Notifier>,
    state: RwLock<ListState<S::Item>>,
    generation: AtomicU64,
}

impl<S: ResourceService> ResourceStore<S> {
    pub fn new(service: Arc<S>, session: SessionHandle, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service,
            session,
            notifier,
            state: RwLock::new(ListState::new(ListFilter::default())),
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_filter(mut self, filter: ListFilter) -> Self {
        self.state = RwLock::new(ListState::new(filter));
        self
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    pub async fn snapshot(&self) -> ListState<S::Item> {
        self.state.read().await.clone()
    }

    pub async fn items(&self) -> Vec<S::Item> {
        self.state.read().await.items.clone()
    }

    pub async fn filter(&self) -> ListFilter {
        self.state.read().await.filter.clone()
    }

    /// Fetches the page for the current filter. `Ok(false)` means a newer
    /// load superseded this one and its reply was discarded.
    pub async fn load(&self) -> Result<bool> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let filter = {
            let mut state = self.state.write().await;
            state.loading = true;
            state.filter.clone()
        };

        let result = self.service.list(&filter).await;

        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(
                resource = self.service.resource(),
                generation,
                "Discarding stale list response"
            );
            return Ok(false);
        }
        state.loading = false;
        match result {
            Ok(page) => {
                state.items = page.data;
                state.total = page.total;
                state.total_pages = page.total_pages;
                state.error = None;
                Ok(true)
            }
            Err(e) => {
                if !e.is_cancelled() {
                    state.error = Some(e.to_string());
                }
                Err(e)
            }
        }
    }

    /// Merges `patch` into the filter, then reloads.
    pub async fn set_filter(&self, patch: FilterPatch) -> Result<bool> {
        self.state.write().await.filter.merge(patch);
        self.load().await
    }

    fn require_session(&self) -> Result<()> {
        if self.session.is_authenticated() {
            return Ok(());
        }
        let error = Error::MissingSession;
        self.notifier.error(&error.to_string());
        Err(error)
    }

    async fn set_submitting(&self, submitting: bool) {
        self.state.write().await.submitting = submitting;
    }

    /// Reload after a mutation; the mutation already succeeded or failed on
    /// its own, so a failed refresh is only logged.
    async fn refresh(&self) {
        if let Err(e) = self.load().await {
            if !e.is_cancelled() {
                tracing::warn!(resource = self.service.resource(), error = %e, "Reload after mutation failed");
            }
        }
    }

    pub async fn create(&self, draft: &S::Draft) -> Result<S::Item> {
        self.require_session()?;
        self.set_submitting(true).await;
        let result = self.service.create(draft).await;
        self.set_submitting(false).await;

        let created = result?;
        self.state.write().await.items.insert(0, created.clone());
        self.notifier.success("Created successfully");
        self.refresh().await;
        Ok(created)
    }

    pub async fn update(&self, id: ModelId, patch: &S::Patch) -> Result<S::Item> {
        self.require_session()?;
        {
            let mut state = self.state.write().await;
            state.submitting = true;
            if let Some(item) = state.items.iter_mut().find(|item| item.id() == id) {
                self.service.apply_patch(item, patch);
            }
        }
        let result = self.service.update(id, patch).await;
        self.set_submitting(false).await;

        match result {
            Ok(updated) => {
                {
                    let mut state = self.state.write().await;
                    if let Some(item) = state.items.iter_mut().find(|item| item.id() == id) {
                        *item = updated.clone();
                    }
                }
                self.notifier.success("Updated successfully");
                self.refresh().await;
                Ok(updated)
            }
            Err(e) => {
                self.refresh().await;
                Err(e)
            }
        }
    }

    pub async fn delete(&self, id: ModelId) -> Result<()> {
        self.state.write().await.items.retain(|item| item.id() != id);
        let result = self.service.delete(id).await;
        if result.is_ok() {
            self.notifier.success("Deleted successfully");
        }
        self.refresh().await;
        result
    }

    /// One bulk call first; if the server refuses it, deletes one by one and
    /// reports how many went through.
    pub async fn bulk_delete(&self, ids: &[ModelId]) -> Result<BulkDeleteOutcome> {
        if ids.is_empty() {
            return Ok(BulkDeleteOutcome::AllSucceeded(0));
        }
        let resource = self.service.resource();

        let deleted: Vec<ModelId> = match self.service.delete_many(ids).await {
            Ok(()) => ids.to_vec(),
            Err(e) if e.is_cancelled() => return Err(e),
            Err(e) => {
                tracing::warn!(resource, error = %e, count = ids.len(), "Bulk delete failed, deleting one by one");
                let mut deleted = Vec::with_capacity(ids.len());
                let mut in_use = 0;
                for &id in ids {
                    match self.service.delete(id).await {
                        Ok(()) => deleted.push(id),
                        Err(e) if e.is_cancelled() => {
                            tracing::info!(resource, deleted = deleted.len(), "Bulk delete cancelled");
                            self.forget(&deleted).await;
                            return Err(e);
                        }
                        Err(e) => {
                            if is_in_use(&e) {
                                in_use += 1;
                            }
                            tracing::warn!(resource, id, error = %e, "Delete failed");
                        }
                    }
                }
                if in_use > 0 {
                    self.notifier.error(&format!(
                        "{in_use} of the selected {resource} are still referenced by other records"
                    ));
                }
                deleted
            }
        };

        let outcome = BulkDeleteOutcome::from_counts(deleted.len(), ids.len() - deleted.len());
        match outcome {
            BulkDeleteOutcome::AllSucceeded(n) => {
                self.notifier.success(&format!("Deleted {n} {resource}"));
            }
            BulkDeleteOutcome::Partial {
                succeeded, total, ..
            } => {
                self.notifier
                    .error(&format!("Deleted {succeeded} of {total} {resource}"));
            }
            BulkDeleteOutcome::AllFailed(n) => {
                self.notifier
                    .error(&format!("Could not delete any of the {n} selected {resource}"));
            }
        }
        tracing::info!(resource, ?outcome, "Bulk delete finished");

        self.forget(&deleted).await;
        self.refresh().await;
        Ok(outcome)
    }

    /// Drops rows the server has already deleted.
    async fn forget(&self, deleted: &[ModelId]) {
        if deleted.is_empty() {
            return;
        }
        self.state
            .write()
            .await
            .items
            .retain(|item| !deleted.contains(&item.id()));
    }
}
