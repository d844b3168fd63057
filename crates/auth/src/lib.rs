//! `printshop-auth` — pure role/route authorization (no storage, no UI).
//!
//! Answers two questions for the client: may this role open this route, and
//! where should this role land when it may not.

pub mod access;
pub mod policy;
pub mod roles;
pub mod routes;
pub mod user;

pub use access::{AccessDecision, explain_access, has_access, redirect_url};
pub use policy::{PolicyError, RoutePolicy, RouteRule};
pub use roles::{Role, UnknownRole};
pub use user::User;
