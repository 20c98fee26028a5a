//! The page-rendering capability.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::RenderError;

/// A single stateful browsing context.
///
/// Implementations are driven strictly sequentially: one navigation at a time.
/// Calls are best-effort and never retried by the caller.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Navigates to `url`.
    async fn open(&self, url: &str) -> Result<(), RenderError>;

    /// Pauses for `duration` to let the current page settle.
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Asks the page to load more content by scrolling to the bottom.
    async fn scroll_to_bottom(&self) -> Result<(), RenderError>;

    /// Returns a size proxy for the rendered page (content height in pixels).
    async fn measure_page_extent(&self) -> Result<u64, RenderError>;

    /// Returns the current rendered DOM serialized as HTML.
    async fn rendered_markup(&self) -> Result<String, RenderError>;

    /// Releases the browsing context.
    async fn close(&self) -> Result<(), RenderError>;
}
