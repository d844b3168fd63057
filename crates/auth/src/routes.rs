//! Route paths known to the access-control layer.

pub const LOGIN: &str = "/login";
pub const SIGNUP: &str = "/signup";
pub const FORGOT_PASSWORD: &str = "/forgot-password";
pub const RESET_PASSWORD: &str = "/reset-password";
pub const VERIFY_EMAIL: &str = "/verify-email";

/// Paths that never require a session.
pub const PUBLIC_PATHS: [&str; 5] = [LOGIN, SIGNUP, FORGOT_PASSWORD, RESET_PASSWORD, VERIFY_EMAIL];

/// Whether `path` is reachable without signing in.
///
/// Exact match, like the role allow-lists.
pub fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}
