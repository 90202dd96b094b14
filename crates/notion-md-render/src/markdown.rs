//! Block tree to Markdown.
//!
//! Children are fetched depth-first in document order and flattened into a
//! single line list.  Spacing state (`prev`) is local to each nesting level:
//! a blank line separates two contributing siblings when their types differ
//! or when both are paragraphs; consecutive list items, quotes, headings of
//! the same level and dividers stay compact.  A nested subtree is trimmed of
//! surrounding blank lines and set off from its parent by one blank line.
//!
//! The traversal keeps an explicit stack of levels, so document depth is
//! limited by memory rather than by the call stack.
use notion_md_client::{Block, BlockKind, BlockSource, BlockType, NotionError, RichText};
use notion_md_config::{Numbering, RenderConfig, RichTextStyle};
use tracing::debug;

use crate::format_rich_text;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub rich_text: RichTextStyle,
    pub numbering: Numbering,
}

impl From<&RenderConfig> for RenderOptions {
    fn from(cfg: &RenderConfig) -> Self {
        Self {
            rich_text: cfg.rich_text,
            numbering: cfg.numbering,
        }
    }
}

/// Renders the block tree below a page or block id as Markdown.
pub struct MarkdownRenderer<'a> {
    source: &'a dyn BlockSource,
    options: RenderOptions,
}

impl<'a> MarkdownRenderer<'a> {
    pub fn new(source: &'a dyn BlockSource) -> Self {
        Self {
            source,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Render every descendant of `block_id`.  Any fetch failure aborts the
    /// whole render.
    pub async fn render(&self, block_id: &str) -> Result<String, NotionError> {
        debug!(block_id, "rendering block tree");
        let mut stack = vec![Level::new(self.source.list_children(block_id).await?)];
        let mut output = Vec::new();

        while let Some(top) = stack.last_mut() {
            match top.blocks.next() {
                Some(block) => {
                    top.push_block(&block, &self.options);
                    if block.has_children {
                        debug!(block_id = %block.id, depth = stack.len(), "descending into children");
                        let children = self.source.list_children(&block.id).await?;
                        stack.push(Level::new(children));
                    }
                }
                None => {
                    let finished = stack.pop().map(|l| l.lines).unwrap_or_default();
                    match stack.last_mut() {
                        Some(parent) => parent.push_nested(finished),
                        None => output = finished,
                    }
                }
            }
        }

        Ok(output.join("\n"))
    }
}

/// Output and spacing state for one nesting level.
struct Level {
    blocks: std::vec::IntoIter<Block>,
    lines: Vec<String>,
    prev: Option<BlockType>,
    /// Number of the last numbered item at this level.
    ordinal: usize,
}

impl Level {
    fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks: blocks.into_iter(),
            lines: Vec::new(),
            prev: None,
            ordinal: 0,
        }
    }

    fn push_block(&mut self, block: &Block, options: &RenderOptions) {
        let ty = block.block_type();
        let ordinal = if self.prev == Some(BlockType::NumberedListItem) {
            self.ordinal + 1
        } else {
            1
        };
        let Some(rendered) = block_lines(&block.kind, options, ordinal) else {
            return;
        };

        if needs_separator(self.prev, ty) {
            self.lines.push(String::new());
        }
        self.lines.extend(rendered);
        self.prev = Some(ty);
        if ty == BlockType::NumberedListItem {
            self.ordinal = ordinal;
        }
    }

    /// Append a finished child level.  Blank lines at either end of the
    /// child are dropped; `prev` is left untouched.
    fn push_nested(&mut self, mut child: Vec<String>) {
        trim_blank_edges(&mut child);
        if child.is_empty() {
            return;
        }
        let ends_with_content = self.lines.last().is_some_and(|l| !l.is_empty());
        if self.prev.is_some() && ends_with_content {
            self.lines.push(String::new());
        }
        self.lines.append(&mut child);
    }
}

/// Remove blank lines from both ends of `lines`.  Entries may hold several
/// physical lines (soft breaks, code bodies), so newlines at the outer edges
/// of the first and last entries count as blank lines too.
fn trim_blank_edges(lines: &mut Vec<String>) {
    while let Some(last) = lines.last_mut() {
        let kept = last.trim_end_matches('\n').len();
        last.truncate(kept);
        if !last.is_empty() {
            break;
        }
        lines.pop();
    }

    let mut start = 0;
    while let Some(first) = lines.get_mut(start) {
        let cut = first.len() - first.trim_start_matches('\n').len();
        first.replace_range(..cut, "");
        if !first.is_empty() {
            break;
        }
        start += 1;
    }
    lines.drain(..start);
}

fn needs_separator(prev: Option<BlockType>, cur: BlockType) -> bool {
    match prev {
        None => false,
        Some(p) => p != cur || cur == BlockType::Paragraph,
    }
}

/// The Markdown lines for one block, or `None` when it contributes nothing
/// (empty text or an unsupported type).
fn block_lines(kind: &BlockKind, options: &RenderOptions, ordinal: usize) -> Option<Vec<String>> {
    let style = options.rich_text;
    let line = match kind {
        BlockKind::Paragraph(rt) => styled(rt, style)?,
        BlockKind::Heading1(rt) => format!("# {}", styled(rt, style)?),
        BlockKind::Heading2(rt) => format!("## {}", styled(rt, style)?),
        BlockKind::Heading3(rt) => format!("### {}", styled(rt, style)?),
        BlockKind::BulletedListItem(rt) => format!("- {}", styled(rt, style)?),
        BlockKind::NumberedListItem(rt) => {
            let n = match options.numbering {
                Numbering::Literal => 1,
                Numbering::Sequential => ordinal,
            };
            format!("{n}. {}", styled(rt, style)?)
        }
        BlockKind::Quote(rt) => format!("> {}", styled(rt, style)?),
        BlockKind::Divider => "---".to_string(),
        BlockKind::Image(img) => {
            let caption = format_rich_text(&img.caption, style);
            let alt = if caption.is_empty() { "Image" } else { caption.as_str() };
            format!("![{alt}]({})", img.url())
        }
        BlockKind::Code { language, text } => {
            let body = RichText::join_plain(text);
            if body.is_empty() {
                return None;
            }
            return Some(vec![format!("```{language}"), body, "```".to_string()]);
        }
        BlockKind::Unsupported(name) => {
            debug!(block_type = %name, "skipping unsupported block");
            return None;
        }
    };
    Some(vec![line])
}

fn styled(runs: &[RichText], style: RichTextStyle) -> Option<String> {
    let t = format_rich_text(runs, style);
    (!t.is_empty()).then_some(t)
}
