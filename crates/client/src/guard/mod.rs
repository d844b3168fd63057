//! Route guarding.
//!
//! One decision function ([`decide`]) and one state machine ([`RouteGuard`])
//! sit behind both entry points: the page wrapper ([`with_role_guard`]) and
//! the layout hook ([`use_route_guard`]).
//!
//! ```text
//! Checking ──► Permitted
//!     │
//!     ├──────► Denied        (notice + delayed soft redirect to the landing route)
//!     │
//!     └──────► SignedOut     (immediate hard redirect to /login, no notice)
//! ```

pub mod countdown;
pub mod hook;
pub mod view;
pub mod wrapper;

use std::time::Duration;

use tokio::runtime::Handle;

use printshop_auth::routes::{LOGIN, is_public};
use printshop_auth::{Role, User};

use crate::context::AuthContext;

pub use countdown::DenialCountdown;
pub use hook::{GuardHandle, RouteGuardHook, use_route_guard};
pub use view::{DeniedNotice, View};
pub use wrapper::{Page, RoleGuarded, with_role_guard};

/// Grace period between showing a denial and leaving the page.
pub const DENIAL_REDIRECT_DELAY: Duration = Duration::from_secs(3);

/// What a guard checks the current user against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement<'a> {
    /// The user's role must be one of these; an empty list admits any
    /// signed-in user.
    AnyRole(&'a [Role]),
    /// The user's role must be allowed to open this path by the route
    /// policy. Public paths need no session at all.
    Route(&'a str),
}

/// State of one guard evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardState {
    Checking,
    /// `user` is `None` only for public paths visited while signed out.
    Permitted { user: Option<User> },
    Denied { user: User, redirect_to: String },
    /// Not signed in: sent to the login page instead of being denied.
    SignedOut,
}

impl GuardState {
    pub fn is_checking(&self) -> bool {
        matches!(self, GuardState::Checking)
    }

    pub fn is_permitted(&self) -> bool {
        matches!(self, GuardState::Permitted { .. })
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, GuardState::Denied { .. })
    }
}

/// Decide the outcome for `requirement` from the current session.
///
/// Pure apart from storage reads; side effects are applied by [`RouteGuard`].
pub fn decide(ctx: &AuthContext, requirement: Requirement<'_>) -> GuardState {
    if let Requirement::Route(path) = requirement {
        if is_public(path) {
            // Only a complete session counts; a lone user record is signed out.
            return GuardState::Permitted {
                user: ctx.store().session().map(|s| s.user),
            };
        }
    }

    if !ctx.store().is_authenticated() {
        return GuardState::SignedOut;
    }
    // Storage can change between the two reads.
    let Some(user) = ctx.store().current_user() else {
        return GuardState::SignedOut;
    };

    let permitted = match requirement {
        Requirement::AnyRole(roles) => roles.is_empty() || roles.contains(&user.role),
        Requirement::Route(path) => ctx.policy().has_access(Some(user.role), path),
    };

    if permitted {
        GuardState::Permitted { user: Some(user) }
    } else {
        let redirect_to = ctx.policy().redirect_url(Some(user.role));
        GuardState::Denied { user, redirect_to }
    }
}

/// Guard state machine shared by the wrapper and the hook.
///
/// Owns the denial countdown: re-evaluating, resetting or dropping the guard
/// cancels any redirect still pending.
#[derive(Debug)]
pub struct RouteGuard {
    ctx: AuthContext,
    state: GuardState,
    countdown: Option<DenialCountdown>,
}

impl RouteGuard {
    pub fn new(ctx: AuthContext) -> Self {
        Self {
            ctx,
            state: GuardState::Checking,
            countdown: None,
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn countdown(&self) -> Option<&DenialCountdown> {
        self.countdown.as_ref()
    }

    /// Time left before a denied user is sent on, or `None` when not denied.
    ///
    /// A denial whose countdown could not be scheduled reports the full delay.
    pub fn redirect_remaining(&self) -> Option<Duration> {
        if !self.state.is_denied() {
            return None;
        }
        Some(
            self.countdown
                .as_ref()
                .map_or(DENIAL_REDIRECT_DELAY, DenialCountdown::remaining),
        )
    }

    /// Notice for the current state, if denied.
    pub fn notice(&self) -> Option<DeniedNotice> {
        match (&self.state, self.redirect_remaining()) {
            (GuardState::Denied { redirect_to, .. }, Some(remaining)) => {
                Some(DeniedNotice::new(redirect_to.clone(), remaining))
            }
            _ => None,
        }
    }

    /// Back to `Checking`, cancelling any pending redirect.
    pub fn reset(&mut self) {
        if let Some(countdown) = self.countdown.take() {
            countdown.cancel();
        }
        self.state = GuardState::Checking;
    }

    /// Run one evaluation and apply its navigation.
    pub fn evaluate(&mut self, requirement: Requirement<'_>) -> &GuardState {
        self.reset();

        let state = decide(&self.ctx, requirement);
        match &state {
            GuardState::SignedOut => {
                tracing::debug!(?requirement, "not signed in; redirecting to login");
                self.ctx.navigator().hard_redirect(LOGIN);
            }
            GuardState::Denied { user, redirect_to } => {
                tracing::debug!(?requirement, role = %user.role, to = %redirect_to, "access denied");
                let runtime = self.ctx.runtime().cloned().or_else(|| Handle::try_current().ok());
                match runtime {
                    Some(runtime) => {
                        self.countdown = Some(DenialCountdown::start(
                            &runtime,
                            DENIAL_REDIRECT_DELAY,
                            redirect_to.clone(),
                            self.ctx.navigator().clone(),
                        ));
                    }
                    None => tracing::error!(
                        to = %redirect_to,
                        "no async runtime in the auth context; denial redirect not scheduled"
                    ),
                }
            }
            GuardState::Permitted { .. } => {
                tracing::debug!(?requirement, "access permitted");
            }
            GuardState::Checking => {}
        }

        self.state = state;
        &self.state
    }

    /// View for the current state; `render` is only called when permitted.
    pub fn view<F>(&self, render: F) -> View
    where
        F: FnOnce(Option<&User>) -> String,
    {
        match &self.state {
            GuardState::Checking => View::Loading,
            GuardState::SignedOut => View::RedirectingToLogin,
            GuardState::Denied { .. } => match self.notice() {
                Some(notice) => View::AccessDenied(notice),
                None => View::Loading,
            },
            GuardState::Permitted { user } => View::Content(render(user.as_ref())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use printshop_core::{NavigationKind, UserId};

    use super::*;
    use crate::navigation::HistoryNavigator;
    use crate::session::SessionStore;
    use crate::storage::MemoryStorage;

    fn context() -> (AuthContext, Arc<HistoryNavigator>) {
        let navigator = Arc::new(HistoryNavigator::new());
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        (AuthContext::with_builtin_policy(store, navigator.clone()), navigator)
    }

    fn sign_in(ctx: &AuthContext, role: Role) -> User {
        let user = User::new(UserId::new("u-1").unwrap(), "Esi", "esi@example.com", role);
        ctx.store().login("tok", &user).unwrap();
        user
    }

    #[test]
    fn public_paths_skip_authentication() {
        let (ctx, navigator) = context();
        for path in ["/login", "/signup", "/forgot-password", "/reset-password", "/verify-email"] {
            assert_eq!(decide(&ctx, Requirement::Route(path)), GuardState::Permitted { user: None });
        }
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn public_path_ignores_user_record_without_token() {
        let (ctx, _) = context();
        let user = User::new(UserId::new("u-2").unwrap(), "Kofi", "kofi@example.com", Role::Admin);
        let user_json = serde_json::to_string(&user).unwrap();
        // Only the user record; the token slot stays empty.
        ctx.store().login_raw("", &user_json).unwrap();

        assert!(!ctx.store().is_authenticated());
        assert_eq!(
            decide(&ctx, Requirement::Route("/login")),
            GuardState::Permitted { user: None }
        );
    }

    #[test]
    fn public_path_exposes_complete_session() {
        let (ctx, _) = context();
        let user = sign_in(&ctx, Role::Staff);
        assert_eq!(
            decide(&ctx, Requirement::Route("/login")),
            GuardState::Permitted { user: Some(user) }
        );
    }

    #[test]
    fn denial_without_runtime_never_redirects_early() {
        let (ctx, navigator) = context();
        sign_in(&ctx, Role::Customer);
        let mut guard = RouteGuard::new(ctx);

        assert!(guard.evaluate(Requirement::AnyRole(&[Role::Admin])).is_denied());
        assert!(guard.countdown().is_none());
        assert!(navigator.visits().is_empty());
        assert!(matches!(guard.view(|_| String::new()), View::AccessDenied(_)));
    }

    #[test]
    fn signed_out_is_not_a_denial() {
        let (ctx, _) = context();
        assert_eq!(decide(&ctx, Requirement::Route("/orders")), GuardState::SignedOut);
        assert_eq!(decide(&ctx, Requirement::AnyRole(&[])), GuardState::SignedOut);
    }

    #[test]
    fn empty_role_list_admits_any_signed_in_user() {
        let (ctx, _) = context();
        let user = sign_in(&ctx, Role::Customer);
        assert_eq!(
            decide(&ctx, Requirement::AnyRole(&[])),
            GuardState::Permitted { user: Some(user) }
        );
    }

    #[test]
    fn role_list_checks_membership() {
        let (ctx, _) = context();
        sign_in(&ctx, Role::StockManager);

        assert!(decide(&ctx, Requirement::AnyRole(&[Role::Admin, Role::StockManager])).is_permitted());

        let state = decide(&ctx, Requirement::AnyRole(&[Role::Admin]));
        let GuardState::Denied { redirect_to, .. } = state else {
            panic!("expected Denied, got {state:?}");
        };
        assert_eq!(redirect_to, "/dashboard/stock-manager");
    }

    #[test]
    fn route_requirement_uses_the_policy() {
        let (ctx, _) = context();
        sign_in(&ctx, Role::DeliveryPerson);

        assert!(decide(&ctx, Requirement::Route("/delivery/map")).is_permitted());

        let state = decide(&ctx, Requirement::Route("/finance"));
        assert!(state.is_denied());
        let GuardState::Denied { redirect_to, .. } = state else { unreachable!() };
        assert_eq!(redirect_to, "/delivery");
    }

    #[test]
    fn signed_out_evaluation_hard_redirects_once() {
        let (ctx, navigator) = context();
        let mut guard = RouteGuard::new(ctx);

        assert!(guard.state().is_checking());
        assert_eq!(guard.evaluate(Requirement::Route("/orders")), &GuardState::SignedOut);
        assert_eq!(navigator.visits(), vec![("/login".to_string(), NavigationKind::Hard)]);
        assert!(guard.countdown().is_none());
        assert_eq!(guard.view(|_| String::new()), View::RedirectingToLogin);
    }

    #[tokio::test(start_paused = true)]
    async fn denial_never_renders_page_content() {
        let (ctx, navigator) = context();
        sign_in(&ctx, Role::Customer);
        let mut guard = RouteGuard::new(ctx);

        guard.evaluate(Requirement::Route("/finance"));
        let view = guard.view(|_| panic!("protected content rendered while denied"));

        let View::AccessDenied(notice) = view else {
            panic!("expected AccessDenied, got {view:?}");
        };
        assert_eq!(notice.title, "Access Denied");
        assert_eq!(notice.redirect_to, "/dashboard/customer");
        assert_eq!(notice.redirect_in_secs, 3);
        assert!(navigator.visits().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn re_evaluation_cancels_pending_redirect() {
        let (ctx, navigator) = context();
        sign_in(&ctx, Role::Customer);
        let mut guard = RouteGuard::new(ctx);

        guard.evaluate(Requirement::Route("/finance"));
        tokio::time::sleep(Duration::from_secs(1)).await;
        guard.evaluate(Requirement::Route("/my-orders"));
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(guard.state().is_permitted());
        assert!(navigator.visits().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_guard_cancels_pending_redirect() {
        let (ctx, navigator) = context();
        sign_in(&ctx, Role::Employee);
        let mut guard = RouteGuard::new(ctx);

        guard.evaluate(Requirement::Route("/payroll"));
        drop(guard);
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(navigator.visits().is_empty());
    }
}
