//! Static role → route policy.
//!
//! Every role carries its own allow-list plus a landing route. The table is
//! validated once when it is built and is read-only afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Role;

/// Routes a single role may open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRule {
    pub allowed_routes: BTreeSet<String>,
    pub default_route: String,
}

impl RouteRule {
    pub fn new<I, S>(default_route: &str, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut allowed_routes: BTreeSet<String> = allowed.into_iter().map(Into::into).collect();
        allowed_routes.insert(default_route.to_string());
        Self {
            allowed_routes,
            default_route: default_route.to_string(),
        }
    }

    pub fn allows(&self, route: &str) -> bool {
        self.allowed_routes.contains(route)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("role '{0}' has no route rule")]
    MissingRole(Role),

    #[error("default route '{route}' of role '{role}' is not in its allowed routes")]
    DefaultRouteNotAllowed { role: Role, route: String },

    #[error("route '{route}' of role '{role}' must be an absolute path")]
    RelativeRoute { role: Role, route: String },

    #[error("failed to parse route policy: {0}")]
    Parse(String),

    #[error("failed to read route policy from {path}: {message}")]
    Io { path: String, message: String },
}

/// Role → route table.
///
/// Invariants (checked by [`RoutePolicy::new`]):
/// - every [`Role`] has a rule;
/// - each rule's default route is one of its allowed routes;
/// - every route is an absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoutePolicy {
    rules: BTreeMap<Role, RouteRule>,
}

static BUILTIN: LazyLock<RoutePolicy> = LazyLock::new(builtin_policy);

impl RoutePolicy {
    pub fn new(rules: BTreeMap<Role, RouteRule>) -> Result<Self, PolicyError> {
        for role in Role::ALL {
            let rule = rules.get(&role).ok_or(PolicyError::MissingRole(role))?;

            if let Some(route) = rule.allowed_routes.iter().find(|r| !r.starts_with('/')) {
                return Err(PolicyError::RelativeRoute {
                    role,
                    route: route.clone(),
                });
            }
            if !rule.allows(&rule.default_route) {
                return Err(PolicyError::DefaultRouteNotAllowed {
                    role,
                    route: rule.default_route.clone(),
                });
            }
        }
        Ok(Self { rules })
    }

    /// The policy compiled into the client.
    pub fn builtin() -> &'static RoutePolicy {
        &BUILTIN
    }

    /// Parse and validate a JSON policy keyed by role name:
    ///
    /// ```json
    /// { "Admin": { "allowedRoutes": ["/reports"], "defaultRoute": "/dashboard/admin" } }
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, PolicyError> {
        let rules: BTreeMap<Role, RouteRule> =
            serde_json::from_str(json).map_err(|e| PolicyError::Parse(e.to_string()))?;
        Self::new(rules)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| PolicyError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    pub fn rule(&self, role: Role) -> Option<&RouteRule> {
        self.rules.get(&role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &RouteRule)> {
        self.rules.iter().map(|(role, rule)| (*role, rule))
    }

    /// Roles whose allow-list contains `route`, in declaration order.
    pub fn roles_allowing(&self, route: &str) -> Vec<Role> {
        self.iter()
            .filter(|(_, rule)| rule.allows(route))
            .map(|(role, _)| role)
            .collect()
    }
}

fn builtin_policy() -> RoutePolicy {
    let rules: BTreeMap<Role, RouteRule> = [
        (
            Role::Admin,
            RouteRule::new(
                "/dashboard/admin",
                [
                    "/orders",
                    "/orders/new",
                    "/materials",
                    "/customers",
                    "/suppliers",
                    "/employees",
                    "/attendance",
                    "/payroll",
                    "/delivery",
                    "/finance",
                    "/reports",
                    "/users",
                    "/settings",
                    "/profile",
                ],
            ),
        ),
        (
            Role::GeneralManager,
            RouteRule::new(
                "/dashboard/general-manager",
                [
                    "/orders",
                    "/orders/new",
                    "/materials",
                    "/customers",
                    "/suppliers",
                    "/employees",
                    "/finance",
                    "/reports",
                    "/profile",
                ],
            ),
        ),
        (
            Role::OrderManager,
            RouteRule::new(
                "/dashboard/order-manager",
                ["/orders", "/orders/new", "/customers", "/delivery", "/reports", "/profile"],
            ),
        ),
        (
            Role::StockManager,
            RouteRule::new(
                "/dashboard/stock-manager",
                ["/materials", "/suppliers", "/reports", "/profile"],
            ),
        ),
        (
            Role::HrManager,
            RouteRule::new(
                "/dashboard/hr-manager",
                ["/employees", "/attendance", "/payroll", "/profile"],
            ),
        ),
        (
            Role::DeliveryPerson,
            RouteRule::new("/delivery", ["/delivery/map", "/profile"]),
        ),
        (
            Role::Staff,
            RouteRule::new("/dashboard/staff", ["/orders", "/materials", "/attendance", "/profile"]),
        ),
        (
            Role::Employee,
            RouteRule::new("/dashboard/employee", ["/attendance", "/profile"]),
        ),
        (
            Role::Customer,
            RouteRule::new("/dashboard/customer", ["/my-orders", "/orders/new", "/profile"]),
        ),
    ]
    .into_iter()
    .collect();

    RoutePolicy { rules }
}
