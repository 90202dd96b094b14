//! Notion block trees to Markdown.
mod rich_text;
mod markdown;
mod extract;

pub use rich_text::format_rich_text;
pub use markdown::{MarkdownRenderer, RenderOptions};
pub use extract::{extract_text, BlockText};
