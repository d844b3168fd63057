//! Navigation port.
//!
//! Redirects are the only side effect of the access-control layer, so the
//! host (browser shell, desktop webview, CLI) is reached through this trait.

/// How a navigation is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// Client-side route change; in-memory state survives.
    Soft,
    /// Full reload of the entry point; all in-memory state is discarded.
    Hard,
}

/// Performs navigations on behalf of the access-control layer.
///
/// Implementations must be cheap and must not block: they are invoked from
/// guard evaluation and from the denial countdown task.
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: &str, kind: NavigationKind);

    /// Client-side route change.
    fn push(&self, to: &str) {
        self.navigate(to, NavigationKind::Soft);
    }

    /// Full-page navigation.
    fn hard_redirect(&self, to: &str) {
        self.navigate(to, NavigationKind::Hard);
    }
}
