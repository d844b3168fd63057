//! Declarative entry point: wrap a page so it only renders for allowed roles.

use printshop_auth::{Role, User};

use crate::context::AuthContext;
use crate::guard::{Requirement, RouteGuard, View};

/// A page that renders for a signed-in user.
pub trait Page {
    fn render(&self, user: &User) -> String;
}

impl<F> Page for F
where
    F: Fn(&User) -> String,
{
    fn render(&self, user: &User) -> String {
        self(user)
    }
}

/// Wrap `page` so that only `allowed_roles` may see it.
///
/// An empty list admits any signed-in user.
pub fn with_role_guard<P: Page>(ctx: &AuthContext, page: P, allowed_roles: &[Role]) -> RoleGuarded<P> {
    RoleGuarded {
        page,
        allowed_roles: allowed_roles.to_vec(),
        guard: RouteGuard::new(ctx.clone()),
    }
}

/// A page behind a role check.
#[derive(Debug)]
pub struct RoleGuarded<P> {
    page: P,
    allowed_roles: Vec<Role>,
    guard: RouteGuard,
}

impl<P: Page> RoleGuarded<P> {
    /// Evaluate access (mount or fresh navigation) and return the view.
    pub fn mount(&mut self) -> View {
        self.guard.evaluate(Requirement::AnyRole(&self.allowed_roles));
        self.view()
    }

    /// Current view without re-evaluating.
    pub fn view(&self) -> View {
        let page = &self.page;
        self.guard.view(|user| match user {
            Some(user) => page.render(user),
            // A role requirement is never satisfied without a session.
            None => String::new(),
        })
    }

    /// Leave the page, cancelling any pending denial redirect.
    pub fn unmount(&mut self) {
        self.guard.reset();
    }
}
