//! Access evaluation over a [`RoutePolicy`].
//!
//! - No IO
//! - No panics
//! - Fails closed: a missing or unknown role never gets access

use serde::Serialize;

use crate::routes::LOGIN;
use crate::{Role, RoutePolicy};

/// Outcome of a single access check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub permitted: bool,

    /// Where a denied caller should be sent. `None` when permitted.
    pub redirect_target: Option<String>,

    /// Human-readable reason for the decision.
    pub reason: String,
}

impl RoutePolicy {
    /// Whether `role` may open `route`.
    ///
    /// Exact membership only: a sub-path of an allowed route is denied unless
    /// it is listed itself.
    pub fn has_access(&self, role: Option<Role>, route: &str) -> bool {
        role.and_then(|r| self.rule(r))
            .is_some_and(|rule| rule.allows(route))
    }

    /// Landing route for `role`, or the login route when there is no role.
    pub fn redirect_url(&self, role: Option<Role>) -> String {
        role.and_then(|r| self.rule(r))
            .map(|rule| rule.default_route.clone())
            .unwrap_or_else(|| LOGIN.to_string())
    }

    /// Explain the decision [`RoutePolicy::has_access`] would make.
    pub fn explain(&self, role: Option<Role>, route: &str) -> AccessDecision {
        let Some(role) = role else {
            return AccessDecision {
                permitted: false,
                redirect_target: Some(LOGIN.to_string()),
                reason: "no recognised role; access fails closed".to_string(),
            };
        };

        let Some(rule) = self.rule(role) else {
            return AccessDecision {
                permitted: false,
                redirect_target: Some(LOGIN.to_string()),
                reason: format!("role '{role}' has no route rule; access fails closed"),
            };
        };

        if rule.allows(route) {
            AccessDecision {
                permitted: true,
                redirect_target: None,
                reason: format!("route '{route}' is in the allow-list of role '{role}'"),
            }
        } else {
            AccessDecision {
                permitted: false,
                redirect_target: Some(rule.default_route.clone()),
                reason: format!(
                    "route '{route}' is not in the allow-list of role '{role}'; landing route is '{}'",
                    rule.default_route
                ),
            }
        }
    }
}

/// [`RoutePolicy::has_access`] against the built-in policy.
pub fn has_access(role: Option<Role>, route: &str) -> bool {
    RoutePolicy::builtin().has_access(role, route)
}

/// [`RoutePolicy::redirect_url`] against the built-in policy.
pub fn redirect_url(role: Option<Role>) -> String {
    RoutePolicy::builtin().redirect_url(role)
}

/// [`RoutePolicy::explain`] against the built-in policy.
pub fn explain_access(role: Option<Role>, route: &str) -> AccessDecision {
    RoutePolicy::builtin().explain(role, route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    fn any_route() -> impl Strategy<Value = String> {
        prop_oneof![
            prop::sample::select(vec![
                "/orders", "/orders/123", "/orders/", "/finance", "/reports", "/delivery",
                "/dashboard/customer", "/login", "/", "",
            ])
            .prop_map(str::to_string),
            "/[a-z]{1,12}(/[a-z0-9]{1,6})?",
        ]
    }

    #[test]
    fn delivery_person_cannot_open_finance() {
        assert!(!has_access(Some(Role::DeliveryPerson), "/finance"));
        assert_eq!(redirect_url(Some(Role::DeliveryPerson)), "/delivery");
    }

    #[test]
    fn admin_can_open_reports() {
        assert!(has_access(Some(Role::Admin), "/reports"));
    }

    #[test]
    fn customer_lands_on_customer_dashboard() {
        assert!(!has_access(Some(Role::Customer), "/finance"));
        assert_eq!(redirect_url(Some(Role::Customer)), "/dashboard/customer");
    }

    #[test]
    fn sub_paths_do_not_inherit_access() {
        assert!(has_access(Some(Role::Admin), "/orders"));
        assert!(!has_access(Some(Role::Admin), "/orders/123"));
        assert!(!has_access(Some(Role::Admin), "/orders/"));
        assert!(!has_access(Some(Role::Admin), "/orders?page=2"));
    }

    #[test]
    fn unknown_role_strings_fail_closed() {
        for raw in [None, Some(""), Some("Janitor"), Some("admin")] {
            let role = Role::parse(raw);
            assert!(!has_access(role, "/orders"));
            assert_eq!(redirect_url(role), "/login");
        }
    }

    #[test]
    fn explain_reports_denial_target_and_reason() {
        let decision = explain_access(Some(Role::DeliveryPerson), "/finance");
        assert!(!decision.permitted);
        assert_eq!(decision.redirect_target.as_deref(), Some("/delivery"));
        assert!(decision.reason.contains("Delivery_Person"));

        let decision = explain_access(Some(Role::Admin), "/reports");
        assert!(decision.permitted);
        assert_eq!(decision.redirect_target, None);

        let decision = explain_access(None, "/reports");
        assert!(!decision.permitted);
        assert_eq!(decision.redirect_target.as_deref(), Some("/login"));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a role's landing route is always one it may open, so a
        /// denial redirect can never lead into another denial.
        #[test]
        fn redirect_target_is_always_permitted(role in any_role()) {
            let target = redirect_url(Some(role));
            prop_assert!(has_access(Some(role), &target));
        }

        /// Property: without a role nothing is reachable and the landing
        /// route is the login page.
        #[test]
        fn missing_role_denies_every_route(route in any_route()) {
            prop_assert!(!has_access(None, &route));
            prop_assert_eq!(redirect_url(None), "/login");
        }

        /// Property: `explain` and `has_access` never disagree.
        #[test]
        fn explain_agrees_with_has_access(role in prop::option::of(any_role()), route in any_route()) {
            let decision = explain_access(role, &route);
            prop_assert_eq!(decision.permitted, has_access(role, &route));
            prop_assert_eq!(decision.redirect_target.is_none(), decision.permitted);
        }
    }
}
