use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Outcome of a single page interaction step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("element not found")]
    NotFound,

    #[error("timed out waiting for element")]
    Timeout,

    #[error("{0}")]
    Other(String),
}

pub type StepResult = std::result::Result<(), DriverError>;

/// The page-interaction surface the flows are written against.
///
/// The production implementation drives Chrome ([`crate::BrowserSession`]);
/// tests drive the flows with a scripted fake. All element ids are matched
/// exactly against the DOM `id` attribute.
#[async_trait]
pub trait PortalDriver: Send + Sync {
    /// Navigate the page to a URL.
    async fn goto(&self, url: &str) -> StepResult;

    /// Wait up to `timeout` for an element to be present.
    async fn wait_for(&self, id: &str, timeout: Duration) -> StepResult;

    /// Wait up to `timeout` for an element to be present and enabled.
    async fn wait_clickable(&self, id: &str, timeout: Duration) -> StepResult;

    /// Locate an element immediately (no wait), clear it, and type `value`.
    async fn fill(&self, id: &str, value: &str) -> StepResult;

    /// Locate an element immediately and click it.
    async fn click(&self, id: &str) -> StepResult;

    /// Tear the session down. Must be safe to call on every exit path;
    /// implementations swallow their own teardown errors.
    async fn close(&self);
}
