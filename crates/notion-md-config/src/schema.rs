use serde::{Deserialize, Serialize};

/// Notion API version sent in the `Notion-Version` header.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Largest `page_size` the block-children endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notion: NotionConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

fn default_api_key_env() -> Option<String> {
    Some("NOTION_API_KEY".into())
}
fn default_base_url() -> String {
    "https://api.notion.com".into()
}
fn default_version() -> String {
    DEFAULT_NOTION_VERSION.into()
}
fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Environment variable that holds the integration token (read at runtime)
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,
    /// Explicit integration token; prefer api_key_env in config files to
    /// avoid secrets in version-controlled files
    #[serde(default)]
    pub api_key: Option<String>,
    /// API root.  Overridden in tests to point at a local server.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Value of the `Notion-Version` header
    #[serde(default = "default_version")]
    pub version: String,
    /// Children requested per page when listing blocks (1–100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Per-request timeout in seconds (0 = no limit)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            api_key: None,
            base_url: default_base_url(),
            version: default_version(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl NotionConfig {
    /// Resolve the integration token: explicit key first, then the
    /// configured environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(k) = &self.api_key {
            return Some(k.clone());
        }
        if let Some(env) = &self.api_key_env {
            return std::env::var(env).ok().filter(|k| !k.is_empty());
        }
        None
    }

    /// `page_size` clamped to what the API accepts.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

/// How rich-text runs are turned into Markdown text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RichTextStyle {
    /// Concatenate the plain text of every run
    #[default]
    Plain,
    /// Render bold, italic, code, strikethrough, underline and links
    Markdown,
}

impl std::fmt::Display for RichTextStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RichTextStyle::Plain => write!(f, "plain"),
            RichTextStyle::Markdown => write!(f, "markdown"),
        }
    }
}

/// Marker used for numbered list items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Numbering {
    /// Every item is written as `1.` and the Markdown renderer numbers them
    #[default]
    Literal,
    /// Items are numbered `1.`, `2.`, ... within each run of consecutive items
    Sequential,
}

impl std::fmt::Display for Numbering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Numbering::Literal => write!(f, "literal"),
            Numbering::Sequential => write!(f, "sequential"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub rich_text: RichTextStyle,
    #[serde(default)]
    pub numbering: Numbering,
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
