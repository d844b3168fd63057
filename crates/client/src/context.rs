//! The single object guards are constructed from.

use std::sync::Arc;

use printshop_auth::RoutePolicy;
use printshop_core::Navigator;
use tokio::runtime::Handle;

use crate::session::SessionStore;

/// Session store, route policy, navigator and the runtime denial countdowns
/// are scheduled on, shared by every guard.
///
/// Cheap to clone.
#[derive(Clone)]
pub struct AuthContext {
    store: SessionStore,
    policy: Arc<RoutePolicy>,
    navigator: Arc<dyn Navigator>,
    runtime: Option<Handle>,
}

impl core::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthContext")
            .field("store", &self.store)
            .field("roles", &self.policy.iter().count())
            .field("runtime", &self.runtime.is_some())
            .finish_non_exhaustive()
    }
}

impl AuthContext {
    /// Build a context, capturing the current Tokio runtime if there is one.
    ///
    /// Synchronous hosts created outside a runtime must supply one through
    /// [`AuthContext::with_runtime`]; without it denial redirects are not
    /// scheduled at all.
    pub fn new(store: SessionStore, policy: Arc<RoutePolicy>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            policy,
            navigator,
            runtime: Handle::try_current().ok(),
        }
    }

    /// Schedule denial countdowns on `runtime`.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Context over the built-in route policy.
    pub fn with_builtin_policy(store: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        Self::new(store, Arc::new(RoutePolicy::builtin().clone()), navigator)
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn policy(&self) -> &RoutePolicy {
        &self.policy
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub fn runtime(&self) -> Option<&Handle> {
        self.runtime.as_ref()
    }

    /// Sign out through this context's navigator.
    pub fn logout(&self) {
        self.store.logout(self.navigator.as_ref());
    }
}
