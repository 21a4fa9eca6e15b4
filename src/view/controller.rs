//! Per-screen state for the item detail view.
//!
//! The controller publishes a [`ViewSnapshot`] through a watch channel.
//! A presentation layer subscribes and re-renders on every change; user
//! actions come back through [`ViewController::toggle_save`].

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

use crate::core::{AggregateError, Aggregator, CancellationToken};
use crate::domain::DetailView;
use crate::library::{LibraryEntry, LibraryError, LibraryStore};

/// Errors from user actions on the view
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("No item is loaded")]
    NotLoaded,

    #[error("Library update failed: {0}")]
    Store(#[from] LibraryError),
}

/// Lifecycle of the screen
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// No item requested yet, or the screen was deactivated
    Idle,
    Loading,
    Loaded(Box<DetailView>),
    NotFound,
}

/// What the presentation layer renders
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    /// Item the screen is showing (or loading)
    pub item_id: Option<String>,
    pub state: ViewState,
    pub is_saved: bool,
}

impl ViewSnapshot {
    fn idle() -> Self {
        Self {
            item_id: None,
            state: ViewState::Idle,
            is_saved: false,
        }
    }

    fn loading(id: &str) -> Self {
        Self {
            item_id: Some(id.to_string()),
            state: ViewState::Loading,
            is_saved: false,
        }
    }

    /// The loaded view, if any
    pub fn view(&self) -> Option<&DetailView> {
        match &self.state {
            ViewState::Loaded(view) => Some(view),
            _ => None,
        }
    }
}

/// Drives one detail screen
pub struct ViewController {
    aggregator: Arc<Aggregator>,
    library: Arc<dyn LibraryStore>,
    snapshot: watch::Sender<ViewSnapshot>,
    /// Token of the current load; replaced on every activation
    session: Mutex<CancellationToken>,
}

impl ViewController {
    pub fn new(aggregator: Arc<Aggregator>, library: Arc<dyn LibraryStore>) -> Self {
        let (snapshot, _) = watch::channel(ViewSnapshot::idle());
        Self {
            aggregator,
            library,
            snapshot,
            session: Mutex::new(CancellationToken::new()),
        }
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.snapshot.subscribe()
    }

    /// Current state
    pub fn snapshot(&self) -> ViewSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn is_saved(&self) -> bool {
        self.snapshot.borrow().is_saved
    }

    fn lock_session(&self) -> MutexGuard<'_, CancellationToken> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Show an item, discarding whatever the screen showed before
    #[instrument(skip(self))]
    pub async fn activate(&self, id: &str) {
        let token = {
            let mut current = self.lock_session();
            current.cancel();
            *current = CancellationToken::new();
            self.snapshot.send_replace(ViewSnapshot::loading(id));
            current.clone()
        };

        let outcome = self.aggregator.load_detail(id).await;

        let _session = self.lock_session();
        if token.is_cancelled() {
            debug!("Load superseded, discarding result");
            return;
        }

        let snapshot = match outcome {
            Ok(view) => ViewSnapshot {
                item_id: Some(id.to_string()),
                is_saved: view.is_saved,
                state: ViewState::Loaded(Box::new(view)),
            },
            Err(AggregateError::NotFound(_)) => ViewSnapshot {
                item_id: Some(id.to_string()),
                state: ViewState::NotFound,
                is_saved: false,
            },
        };
        self.snapshot.send_replace(snapshot);
    }

    /// Leave the screen; an in-flight load is discarded
    pub fn deactivate(&self) {
        let current = self.lock_session();
        current.cancel();
        self.snapshot.send_replace(ViewSnapshot::idle());
    }

    /// Save or unsave the loaded item; returns the new saved flag
    ///
    /// The flag only changes after the library write succeeded.
    #[instrument(skip(self))]
    pub async fn toggle_save(&self) -> Result<bool, ViewError> {
        let (view, was_saved) = {
            let snapshot = self.snapshot.borrow();
            match snapshot.view() {
                Some(view) => (view.clone(), snapshot.is_saved),
                None => return Err(ViewError::NotLoaded),
            }
        };

        if was_saved {
            self.library.remove(view.id()).await?;
        } else {
            self.library.add(LibraryEntry::from_view(&view)).await?;
        }

        let now_saved = !was_saved;
        info!(id = view.id(), saved = now_saved, "Library updated");

        let _session = self.lock_session();
        self.snapshot.send_if_modified(|snapshot| {
            if snapshot.item_id.as_deref() != Some(view.id()) {
                return false;
            }
            let fresh = match &snapshot.state {
                ViewState::Loaded(loaded) => loaded.with_saved(now_saved),
                _ => return false,
            };
            snapshot.state = ViewState::Loaded(Box::new(fresh));
            snapshot.is_saved = now_saved;
            true
        });

        Ok(now_saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::MemoryLibraryStore;

    #[test]
    fn test_initial_snapshot_is_idle() {
        let library: Arc<dyn LibraryStore> = Arc::new(MemoryLibraryStore::new());
        let gateway = Arc::new(crate::adapters::MangaDexGateway::new(&Default::default()).unwrap());
        let aggregator = Arc::new(Aggregator::new(gateway, library.clone(), "https://assets"));
        let controller = ViewController::new(aggregator, library);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state, ViewState::Idle);
        assert!(snapshot.view().is_none());
        assert!(!controller.is_saved());
    }
}
