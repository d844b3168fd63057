//! Delayed redirect shown after an access denial.

use std::sync::Arc;
use std::time::Duration;

use printshop_core::Navigator;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Pending soft navigation to a denied user's landing route.
///
/// Dropping the countdown cancels it, so a redirect can never fire after the
/// guard that started it has moved on or been unmounted.
#[derive(Debug)]
pub struct DenialCountdown {
    target: String,
    runtime: Handle,
    deadline: Instant,
    handle: Option<JoinHandle<()>>,
}

impl DenialCountdown {
    /// Schedule the redirect on `runtime`, `delay` from now.
    ///
    /// Does not need to be called from within the runtime.
    pub fn start(runtime: &Handle, delay: Duration, target: String, navigator: Arc<dyn Navigator>) -> Self {
        let deadline = {
            let _enter = runtime.enter();
            Instant::now() + delay
        };

        let to = target.clone();
        let handle = runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            tracing::debug!(to = %to, "denial countdown elapsed");
            navigator.push(&to);
        });

        Self {
            target,
            runtime: runtime.clone(),
            deadline,
            handle: Some(handle),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Time left before the redirect; zero once it has fired.
    pub fn remaining(&self) -> Duration {
        let _enter = self.runtime.enter();
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Whether the redirect has already been performed.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    pub fn cancel(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                tracing::debug!(to = %self.target, "denial countdown cancelled");
            }
            handle.abort();
        }
    }
}

impl Drop for DenialCountdown {
    fn drop(&mut self) {
        self.abort();
    }
}
