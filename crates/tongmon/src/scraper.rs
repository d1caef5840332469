use std::time::Duration;

use chrono::Utc;
use futures::future;
use reqwest::Client;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};

use crate::clan::parser::parse_clan_detail;
use crate::clan::types::ClanDetailExtractedData;
use crate::shop::parser::parse_shop_catalog;
use crate::shop::types::ShopCatalog;

/// Fragment the client serves instead of page content once the session
/// cookie has expired.
const LOGIN_FORM_MARKER: &str = "id=\"login-form\"";

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid session cookie: {0}")]
    InvalidSession(String),
    #[error("The client served the login page; the session has expired")]
    SessionExpired,
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    base_url: String,
}

impl WebScraper {
    /// A scraper without a session. Works only for snapshots the client
    /// serves unauthenticated; most deployments need [`Self::with_session`].
    pub fn new() -> Result<Self, ScraperError> {
        Self::build(HeaderMap::new())
    }

    /// A scraper that sends the given session cookie with every request.
    pub fn with_session(session_cookie: &str) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(session_cookie)
            .map_err(|_| ScraperError::InvalidSession(session_cookie.to_string()))?;
        headers.insert(COOKIE, value);
        Self::build(headers)
    }

    fn build(headers: HeaderMap) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: crate::BASE_URL.to_string(),
        })
    }

    pub async fn fetch_clan_detail(&self) -> Result<ClanDetailExtractedData, ScraperError> {
        let url = format!("{}/clan/detail", self.base_url);
        log::info!("Fetching clan detail page...");
        let html = self.get_html(&url).await?;
        Ok(parse_clan_detail(&html, Utc::now()))
    }

    pub async fn fetch_shop_catalog(&self) -> Result<ShopCatalog, ScraperError> {
        let url = format!("{}/clan/shop", self.base_url);
        log::info!("Fetching guild shop page...");
        let html = self.get_html(&url).await?;
        Ok(parse_shop_catalog(&html))
    }

    /// Fetches both pages concurrently; the two requests are independent.
    pub async fn fetch_clan_with_shop(
        &self,
    ) -> Result<(ClanDetailExtractedData, ShopCatalog), ScraperError> {
        let (clan, shop) =
            future::join(self.fetch_clan_detail(), self.fetch_shop_catalog()).await;
        Ok((clan?, shop?))
    }

    async fn get_html(&self, url: &str) -> Result<String, ScraperError> {
        let html = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .error_for_status()?
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?;

        if html.contains(LOGIN_FORM_MARKER) {
            return Err(ScraperError::SessionExpired);
        }

        Ok(html)
    }
}
