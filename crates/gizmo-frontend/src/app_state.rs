//! Shared application state

use std::sync::Arc;

use parking_lot::Mutex;

use gizmo_core::{SelectionStore, SharedGizmoRelay, StreamSubscription};

use crate::config::ConfigManager;

/// State shared between the panels and the app shell.
pub struct AppState {
    /// Source of truth for the object list and the selection.
    pub store: SelectionStore,
    /// The process-wide relay, kept for disposal on shutdown.
    pub relay: Option<SharedGizmoRelay>,
    /// Handle for the drag-event log subscription.
    pub drag_log: Option<StreamSubscription>,
    /// Persisted preferences.
    pub config: ConfigManager,
}

impl AppState {
    pub fn new(store: SelectionStore, config: ConfigManager) -> Self {
        Self {
            store,
            relay: None,
            drag_log: None,
            config,
        }
    }
}

pub type SharedAppState = Arc<Mutex<AppState>>;
