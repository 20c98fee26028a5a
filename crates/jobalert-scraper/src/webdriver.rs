//! [`Renderer`] backed by a headless Chrome session over WebDriver.

use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use serde_json::{json, Value};

use crate::error::RenderError;
use crate::render::Renderer;

const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";
const EXTENT_SCRIPT: &str = "return document.body.scrollHeight;";

pub struct WebDriverRenderer {
    client: Client,
}

impl WebDriverRenderer {
    /// Starts a new headless browser session at the given WebDriver endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Session`] if the WebDriver server refuses or
    /// cannot create the session.
    pub async fn connect(webdriver_url: &str) -> Result<Self, RenderError> {
        let mut capabilities = serde_json::Map::new();
        capabilities.insert(
            "goog:chromeOptions".to_string(),
            json!({
                "args": [
                    "--headless",
                    "--no-sandbox",
                    "--disable-dev-shm-usage",
                    "--window-size=1920,1080"
                ]
            }),
        );

        let client = ClientBuilder::native()
            .capabilities(capabilities)
            .connect(webdriver_url)
            .await?;
        tracing::info!(webdriver_url, "browser session started");
        Ok(Self { client })
    }
}

#[async_trait]
impl Renderer for WebDriverRenderer {
    async fn open(&self, url: &str) -> Result<(), RenderError> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn scroll_to_bottom(&self) -> Result<(), RenderError> {
        self.client.execute(SCROLL_SCRIPT, vec![]).await?;
        Ok(())
    }

    async fn measure_page_extent(&self) -> Result<u64, RenderError> {
        let value = self.client.execute(EXTENT_SCRIPT, vec![]).await?;
        extent_from_value(&value)
    }

    async fn rendered_markup(&self) -> Result<String, RenderError> {
        Ok(self.client.source().await?)
    }

    async fn close(&self) -> Result<(), RenderError> {
        self.client.clone().close().await?;
        tracing::info!("browser session closed");
        Ok(())
    }
}

/// Browsers may report the height as an integer or a float.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn extent_from_value(value: &Value) -> Result<u64, RenderError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 => Ok(f.round() as u64),
        _ => Err(RenderError::UnexpectedExtent(value.to_string())),
    }
}
