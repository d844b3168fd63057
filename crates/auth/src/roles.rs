use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role identifier used for RBAC.
///
/// The set is closed: every role has its own explicit route allow-list and
/// there is no hierarchy between them. The serialized names are the exact
/// strings the backend puts in the login payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Admin,
    #[serde(rename = "General_Manager")]
    GeneralManager,
    #[serde(rename = "Order_Manager")]
    OrderManager,
    #[serde(rename = "Stock_Manager")]
    StockManager,
    #[serde(rename = "HR_Manager")]
    HrManager,
    #[serde(rename = "Delivery_Person")]
    DeliveryPerson,
    Staff,
    Employee,
    Customer,
}

/// A role string that does not name any [`Role`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Admin,
        Role::GeneralManager,
        Role::OrderManager,
        Role::StockManager,
        Role::HrManager,
        Role::DeliveryPerson,
        Role::Staff,
        Role::Employee,
        Role::Customer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::GeneralManager => "General_Manager",
            Role::OrderManager => "Order_Manager",
            Role::StockManager => "Stock_Manager",
            Role::HrManager => "HR_Manager",
            Role::DeliveryPerson => "Delivery_Person",
            Role::Staff => "Staff",
            Role::Employee => "Employee",
            Role::Customer => "Customer",
        }
    }

    /// Parse an optional raw role string.
    ///
    /// Missing, empty and unknown values all collapse to `None`, which the
    /// evaluator treats as "no access".
    pub fn parse(raw: Option<&str>) -> Option<Role> {
        raw.and_then(|s| s.parse().ok())
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
