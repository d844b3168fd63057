//! Imperative entry point for shared layouts: guard whatever path is current.

use printshop_auth::User;

use crate::context::AuthContext;
use crate::guard::{DeniedNotice, GuardState, Requirement, RouteGuard, View};

/// What a layout needs from the guard.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardHandle {
    /// True until the layout may render something for the current path.
    pub loading: bool,
    /// The signed-in user, only once access is permitted.
    pub user: Option<User>,
}

/// Path-based guard bound to one layout instance.
#[derive(Debug)]
pub struct RouteGuardHook {
    guard: RouteGuard,
    path: Option<String>,
}

/// Create the guard for a layout. Call [`RouteGuardHook::on_route_change`]
/// on mount and on every navigation.
pub fn use_route_guard(ctx: &AuthContext) -> RouteGuardHook {
    RouteGuardHook {
        guard: RouteGuard::new(ctx.clone()),
        path: None,
    }
}

impl RouteGuardHook {
    /// Evaluate `path` if it differs from the last evaluated one.
    pub fn on_route_change(&mut self, path: &str) -> GuardHandle {
        if self.path.as_deref() != Some(path) {
            self.path = Some(path.to_string());
            self.guard.evaluate(Requirement::Route(path));
        }
        self.handle()
    }

    pub fn handle(&self) -> GuardHandle {
        match self.guard.state() {
            GuardState::Permitted { user } => GuardHandle {
                loading: false,
                user: user.clone(),
            },
            GuardState::Denied { .. } => GuardHandle {
                loading: false,
                user: None,
            },
            // A pending login redirect renders nothing, like a check in flight.
            GuardState::Checking | GuardState::SignedOut => GuardHandle {
                loading: true,
                user: None,
            },
        }
    }

    /// Denial notice for the current path with the time left on the
    /// countdown, if denied.
    pub fn notice(&self) -> Option<DeniedNotice> {
        self.guard.notice()
    }

    pub fn view<F>(&self, render: F) -> View
    where
        F: FnOnce(Option<&User>) -> String,
    {
        self.guard.view(render)
    }

    pub fn state(&self) -> &GuardState {
        self.guard.state()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Layout unmounted: cancel any pending redirect.
    pub fn unmount(&mut self) {
        self.guard.reset();
        self.path = None;
    }
}
