//! Navigator implementations for hosts without a browser router.

use std::sync::Mutex;

use printshop_core::{NavigationKind, Navigator};

/// Records every navigation in order and logs it.
///
/// Used by the CLI and by headless embeddings that apply navigations
/// themselves.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    visits: Mutex<Vec<(String, NavigationKind)>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<(String, NavigationKind)> {
        self.visits
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<(String, NavigationKind)> {
        self.visits().pop()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, to: &str, kind: NavigationKind) {
        tracing::info!(to, ?kind, "navigate");
        match self.visits.lock() {
            Ok(mut visits) => visits.push((to.to_string(), kind)),
            Err(_) => tracing::error!(to, "navigation history lock poisoned"),
        }
    }
}
