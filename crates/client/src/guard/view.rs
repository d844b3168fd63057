//! What a guarded page shows for each guard state.

use std::time::Duration;

use serde::Serialize;

/// Notice shown to a signed-in user who may not open the requested page.
///
/// Carries no data from the protected page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeniedNotice {
    pub title: String,
    pub message: String,
    pub redirect_to: String,
    pub redirect_in_secs: u64,
}

impl DeniedNotice {
    /// `remaining` is rounded up to whole seconds for display.
    pub fn new(redirect_to: impl Into<String>, remaining: Duration) -> Self {
        let redirect_in_secs = remaining.as_millis().div_ceil(1000) as u64;
        Self {
            title: "Access Denied".to_string(),
            message: format!(
                "You do not have permission to view this page. Redirecting in {redirect_in_secs} seconds..."
            ),
            redirect_to: redirect_to.into(),
            redirect_in_secs,
        }
    }
}

/// Rendered output of a guarded page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum View {
    /// Access check in progress.
    Loading,
    /// Signed out; a hard redirect to the login page is under way.
    RedirectingToLogin,
    /// Signed in but not allowed here.
    AccessDenied(DeniedNotice),
    /// The page itself.
    Content(String),
}
