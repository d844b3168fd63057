//! `printshop-client`
//!
//! **Responsibility:** client-side access control for the PrintShop app.
//!
//! This crate provides:
//! - Session persistence (token + user) with fail-closed reads
//! - Route guarding for pages (role list) and layouts (path policy)
//! - Delayed, cancellable redirects after a denial
//!
//! The backend stays the authority on tokens; this layer only decides what
//! the client shows.

pub mod config;
pub mod context;
pub mod file_storage;
pub mod guard;
pub mod navigation;
pub mod session;
pub mod storage;

pub use config::ClientConfig;
pub use context::AuthContext;
pub use file_storage::FileStorage;
pub use guard::{
    DENIAL_REDIRECT_DELAY, DeniedNotice, GuardHandle, GuardState, Page, Requirement, RoleGuarded,
    RouteGuard, RouteGuardHook, View, use_route_guard, with_role_guard,
};
pub use navigation::HistoryNavigator;
pub use session::{Session, SessionStore};
pub use storage::{MemoryStorage, SessionStorage, StorageError, UnavailableStorage};
