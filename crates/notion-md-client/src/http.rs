use std::time::Duration;

use async_trait::async_trait;
use notion_md_config::{NotionConfig, MAX_PAGE_SIZE, DEFAULT_NOTION_VERSION};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{parse_children_page, parse_page, Block, BlockSource, NotionError, Page};

/// Client for the parts of the Notion REST API the publishing and review
/// workflows use.
pub struct NotionClient {
    api_key: Option<String>,
    base_url: String,
    version: String,
    page_size: u32,
    client: reqwest::Client,
}

impl NotionClient {
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        Self {
            api_key,
            base_url: trim_base(base_url.as_deref().unwrap_or("https://api.notion.com")),
            version: DEFAULT_NOTION_VERSION.into(),
            page_size: MAX_PAGE_SIZE,
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from the `[notion]` config section.
    pub fn from_config(cfg: &NotionConfig) -> Result<Self, NotionError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("notion-md/", env!("CARGO_PKG_VERSION")));
        if cfg.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(cfg.timeout_secs));
        }
        Ok(Self {
            api_key: cfg.resolve_api_key(),
            base_url: trim_base(&cfg.base_url),
            version: cfg.version.clone(),
            page_size: cfg.effective_page_size(),
            client: builder.build()?,
        })
    }

    /// Override the number of children requested per page (clamped to 1–100).
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    fn key(&self) -> Result<&str, NotionError> {
        self.api_key.as_deref().ok_or(NotionError::MissingApiKey)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, NotionError> {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(self.key()?)
            .header("Notion-Version", &self.version)
            .query(query)
            .send()
            .await?;
        read_json(resp).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, NotionError> {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(self.key()?)
            .header("Notion-Version", &self.version)
            .json(body)
            .send()
            .await?;
        read_json(resp).await
    }

    /// Retrieve a page and extract its title.
    pub async fn retrieve_page(&self, page_id: &str) -> Result<Page, NotionError> {
        debug!(page_id, "retrieving page");
        let v = self.get(&format!("/v1/pages/{page_id}"), &[]).await?;
        parse_page(&v)
    }

    /// `true` when the page can be retrieved with the configured token.
    /// Any failure counts as "does not exist".
    pub async fn page_exists(&self, page_id: &str) -> bool {
        match self.retrieve_page(page_id).await {
            Ok(_) => true,
            Err(e) => {
                warn!(page_id, error = %e, "page not found or not accessible");
                false
            }
        }
    }

    /// The page title, or `None` when the page has none or cannot be read.
    pub async fn page_title(&self, page_id: &str) -> Option<String> {
        match self.retrieve_page(page_id).await {
            Ok(page) => page.title,
            Err(e) => {
                warn!(page_id, error = %e, "could not read page title");
                None
            }
        }
    }

    /// Attach a plain-text comment to a block.
    pub async fn create_comment(&self, block_id: &str, text: &str) -> Result<(), NotionError> {
        debug!(block_id, "creating comment");
        let body = json!({
            "parent": { "block_id": block_id },
            "rich_text": [{ "type": "text", "text": { "content": text } }],
        });
        self.post("/v1/comments", &body).await?;
        Ok(())
    }
}

#[async_trait]
impl BlockSource for NotionClient {
    async fn list_children(&self, block_id: &str) -> Result<Vec<Block>, NotionError> {
        let path = format!("/v1/blocks/{block_id}/children");
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            debug!(block_id, cursor = cursor.as_deref().unwrap_or("-"), "listing block children");
            let mut query = vec![("page_size", self.page_size.to_string())];
            if let Some(c) = cursor.take() {
                query.push(("start_cursor", c));
            }
            let page = parse_children_page(&self.get(&path, &query).await?)?;
            blocks.extend(page.blocks);
            cursor = page.next_cursor;
            if cursor.is_none() {
                break;
            }
        }
        debug!(block_id, count = blocks.len(), "listed block children");
        Ok(blocks)
    }
}

async fn read_json(resp: reqwest::Response) -> Result<Value, NotionError> {
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        return Err(NotionError::from_response(status.as_u16(), &text));
    }
    serde_json::from_str(&text).map_err(|e| NotionError::Decode(format!("invalid JSON: {e}")))
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let c = NotionClient::new(None, Some("http://localhost:1234/".into()));
        assert_eq!(c.base_url, "http://localhost:1234");
    }

    #[test]
    fn page_size_override_is_clamped() {
        let c = NotionClient::new(None, None).with_page_size(1000);
        assert_eq!(c.page_size, 100);
        let c = NotionClient::new(None, None).with_page_size(0);
        assert_eq!(c.page_size, 1);
    }

    #[test]
    fn from_config_uses_section_values() {
        let cfg = NotionConfig {
            api_key: Some("secret_x".into()),
            base_url: "http://127.0.0.1:8080/".into(),
            page_size: 10,
            ..NotionConfig::default()
        };
        let c = NotionClient::from_config(&cfg).unwrap();
        assert_eq!(c.api_key.as_deref(), Some("secret_x"));
        assert_eq!(c.base_url, "http://127.0.0.1:8080");
        assert_eq!(c.page_size, 10);
        assert_eq!(c.version, DEFAULT_NOTION_VERSION);
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        // Port 9 (discard) is never contacted: the key check comes first.
        let c = NotionClient::new(None, Some("http://127.0.0.1:9".into()));
        assert!(matches!(c.list_children("root").await, Err(NotionError::MissingApiKey)));
        assert!(matches!(c.retrieve_page("p").await, Err(NotionError::MissingApiKey)));
        assert!(matches!(c.create_comment("b", "hi").await, Err(NotionError::MissingApiKey)));
        assert!(!c.page_exists("p").await);
        assert_eq!(c.page_title("p").await, None);
    }
}
