use notion_md_client::{BlockKind, BlockSource, NotionError, RichText};
use serde::Serialize;
use tracing::debug;

/// Plain text of one block, keyed by the block id so review comments can be
/// attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockText {
    pub id: String,
    pub text: String,
}

/// Collect the plain text of every paragraph, heading, list item and quote
/// below `block_id`, depth-first in document order.  Blocks with empty text
/// are left out; children follow their parent.
pub async fn extract_text(
    source: &dyn BlockSource,
    block_id: &str,
) -> Result<Vec<BlockText>, NotionError> {
    debug!(block_id, "extracting review text");
    let mut out = Vec::new();
    let mut stack = vec![source.list_children(block_id).await?.into_iter()];

    while let Some(top) = stack.last_mut() {
        let Some(block) = top.next() else {
            stack.pop();
            continue;
        };
        if let Some(text) = review_text(&block.kind) {
            out.push(BlockText { id: block.id.clone(), text });
        }
        if block.has_children {
            stack.push(source.list_children(&block.id).await?.into_iter());
        }
    }

    Ok(out)
}

fn review_text(kind: &BlockKind) -> Option<String> {
    let runs = match kind {
        BlockKind::Paragraph(rt)
        | BlockKind::Heading1(rt)
        | BlockKind::Heading2(rt)
        | BlockKind::Heading3(rt)
        | BlockKind::BulletedListItem(rt)
        | BlockKind::NumberedListItem(rt)
        | BlockKind::Quote(rt) => rt,
        BlockKind::Image(_)
        | BlockKind::Divider
        | BlockKind::Code { .. }
        | BlockKind::Unsupported(_) => return None,
    };
    let text = RichText::join_plain(runs);
    (!text.is_empty()).then_some(text)
}
