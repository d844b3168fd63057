//! `printshop-core` — shared building blocks for the PrintShop client.
//!
//! This crate contains **pure** primitives (no storage, no timers, no UI).

pub mod error;
pub mod id;
pub mod navigation;

pub use error::DomainError;
pub use id::UserId;
pub use navigation::{NavigationKind, Navigator};
