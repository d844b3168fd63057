//! Persisted identity: who is using this client right now.
//!
//! Every read goes through this store so that storage failures, corrupt
//! payloads and unknown roles are classified in one place: all of them read
//! as "no session".

use std::sync::Arc;

use printshop_auth::routes::LOGIN;
use printshop_auth::{Role, User};
use printshop_core::Navigator;

use crate::storage::{SessionStorage, StorageError};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
/// Cached copy of the user's role, for display only.
pub const ROLE_KEY: &str = "role";
/// Cached display name, for display only.
pub const NAME_KEY: &str = "name";

const SESSION_KEYS: [&str; 4] = [TOKEN_KEY, USER_KEY, ROLE_KEY, NAME_KEY];

/// A complete session: both halves present and readable.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl core::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Persist a successful login.
    pub fn login(&self, token: &str, user: &User) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(user)?;
        self.persist(token, &user_json, Some(user.role.as_str()), Some(user.display_name()))
    }

    /// Persist a login response verbatim.
    ///
    /// The payload is not validated here; a malformed user simply reads back
    /// as "no session".
    pub fn login_raw(&self, token: &str, user_json: &str) -> Result<(), StorageError> {
        let parsed = serde_json::from_str::<User>(user_json).ok();
        let role = parsed.as_ref().map(|u| u.role.as_str());
        let name = parsed.as_ref().map(|u| u.display_name());
        self.persist(token, user_json, role, name)
    }

    fn persist(
        &self,
        token: &str,
        user_json: &str,
        role: Option<&str>,
        name: Option<&str>,
    ) -> Result<(), StorageError> {
        let mut items = vec![(TOKEN_KEY, token), (USER_KEY, user_json)];
        items.extend(role.map(|r| (ROLE_KEY, r)));
        items.extend(name.map(|n| (NAME_KEY, n)));

        // Drop cached fields from an earlier session before writing.
        self.storage.remove_items(&[ROLE_KEY, NAME_KEY])?;
        self.storage.set_items(&items)?;

        tracing::info!(role = role.unwrap_or("<unparsed>"), "session stored");
        Ok(())
    }

    /// Read a key, collapsing every failure and empty value into `None`.
    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(Some(value)) if !value.trim().is_empty() => Some(value),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "session storage read failed; treating as signed out");
                None
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        self.read(TOKEN_KEY)
    }

    /// The signed-in user, if a readable one is stored.
    ///
    /// Never fails: unavailable storage, a missing record, malformed JSON and
    /// an unknown role all yield `None`.
    pub fn current_user(&self) -> Option<User> {
        let raw = self.read(USER_KEY)?;
        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "stored user record is unreadable; treating as signed out");
                None
            }
        }
    }

    /// Non-empty token and a readable user.
    ///
    /// Implies `current_user().is_some()` for the same storage contents.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() && self.current_user().is_some()
    }

    /// Both halves of the session, or nothing.
    pub fn session(&self) -> Option<Session> {
        let token = self.token()?;
        let user = self.current_user()?;
        Some(Session { token, user })
    }

    /// Cached role written at login. Display only: authorization always uses
    /// the role inside the stored user record.
    pub fn cached_role(&self) -> Option<Role> {
        Role::parse(self.read(ROLE_KEY).as_deref())
    }

    pub fn cached_name(&self) -> Option<String> {
        self.read(NAME_KEY)
    }

    /// Remove every session key in one batch.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_items(&SESSION_KEYS)
    }

    /// Sign out and reload the login entry point.
    ///
    /// The hard navigation discards any in-memory state still referencing the
    /// old session. Storage failures are logged; the redirect always happens.
    pub fn logout(&self, navigator: &dyn Navigator) {
        match self.clear() {
            Ok(()) => tracing::info!("session cleared"),
            Err(e) => tracing::warn!(error = %e, "failed to clear session storage"),
        }
        navigator.hard_redirect(LOGIN);
    }
}
