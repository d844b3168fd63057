//! Client configuration from the environment.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use printshop_auth::RoutePolicy;
use printshop_core::Navigator;

use crate::context::AuthContext;
use crate::file_storage::FileStorage;
use crate::session::SessionStore;

pub const SESSION_FILE_ENV: &str = "PRINTSHOP_SESSION_FILE";
pub const ROUTE_POLICY_ENV: &str = "PRINTSHOP_ROUTE_POLICY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Where the session is persisted.
    pub session_file: PathBuf,
    /// JSON route policy; the built-in policy when `None`.
    pub policy_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let session_file = match std::env::var_os(SESSION_FILE_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => FileStorage::default_path()?,
        };
        let policy_file = std::env::var_os(ROUTE_POLICY_ENV)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            session_file,
            policy_file,
        })
    }

    /// Load and validate the route policy. Runs once at start-up.
    pub fn load_policy(&self) -> anyhow::Result<RoutePolicy> {
        match &self.policy_file {
            Some(path) => RoutePolicy::from_json_file(path)
                .with_context(|| format!("invalid route policy at {}", path.display())),
            None => Ok(RoutePolicy::builtin().clone()),
        }
    }

    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(Arc::new(FileStorage::new(&self.session_file)))
    }

    pub fn build_context(&self, navigator: Arc<dyn Navigator>) -> anyhow::Result<AuthContext> {
        let policy = self.load_policy()?;
        tracing::debug!(session_file = %self.session_file.display(), custom_policy = self.policy_file.is_some(), "client configured");
        Ok(AuthContext::new(self.session_store(), Arc::new(policy), navigator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::HistoryNavigator;

    #[test]
    fn builtin_policy_when_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            session_file: dir.path().join("session.json"),
            policy_file: None,
        };
        assert_eq!(&config.load_policy().unwrap(), RoutePolicy::builtin());
    }

    #[test]
    fn invalid_policy_file_fails_start_up() {
        let dir = tempfile::tempdir().unwrap();
        let policy = dir.path().join("policy.json");
        std::fs::write(
            &policy,
            r#"{ "Admin": { "allowedRoutes": ["/reports"], "defaultRoute": "/reports" } }"#,
        )
        .unwrap();

        let config = ClientConfig {
            session_file: dir.path().join("session.json"),
            policy_file: Some(policy),
        };
        let err = config
            .build_context(Arc::new(HistoryNavigator::new()))
            .unwrap_err();
        assert!(format!("{err:#}").contains("has no route rule"));
    }

    #[test]
    fn custom_policy_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let policy = dir.path().join("policy.json");
        let mut custom = serde_json::to_value(RoutePolicy::builtin()).unwrap();
        custom["Staff"]["allowedRoutes"]
            .as_array_mut()
            .unwrap()
            .push(serde_json::json!("/reports"));
        std::fs::write(&policy, custom.to_string()).unwrap();

        let config = ClientConfig {
            session_file: dir.path().join("session.json"),
            policy_file: Some(policy),
        };
        let ctx = config.build_context(Arc::new(HistoryNavigator::new())).unwrap();
        assert!(ctx.policy().has_access(Some(printshop_auth::Role::Staff), "/reports"));
        assert!(!RoutePolicy::builtin().has_access(Some(printshop_auth::Role::Staff), "/reports"));
    }
}
