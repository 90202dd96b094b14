//! Decoding of Notion API JSON payloads into the block model.
use serde_json::Value;

use crate::{Annotations, Block, BlockKind, Image, ImageSource, NotionError, Page, RichText};

/// One page of a `GET /v1/blocks/{id}/children` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildrenPage {
    pub blocks: Vec<Block>,
    /// Cursor for the following page; `None` on the last page.
    pub next_cursor: Option<String>,
}

/// Decode a block-children list response.
pub fn parse_children_page(v: &Value) -> Result<ChildrenPage, NotionError> {
    let results = v["results"]
        .as_array()
        .ok_or_else(|| NotionError::Decode("children response has no 'results' array".into()))?;
    let blocks = results.iter().map(parse_block).collect::<Result<Vec<_>, _>>()?;

    let has_more = v["has_more"].as_bool().unwrap_or(false);
    let next_cursor = if has_more {
        let cursor = v["next_cursor"].as_str().ok_or_else(|| {
            NotionError::Decode("children response has 'has_more' but no 'next_cursor'".into())
        })?;
        Some(cursor.to_string())
    } else {
        None
    };

    Ok(ChildrenPage { blocks, next_cursor })
}

/// Decode one block object.  Unknown block types become
/// [`BlockKind::Unsupported`]; only a missing `id` is an error.
pub fn parse_block(v: &Value) -> Result<Block, NotionError> {
    let id = v["id"]
        .as_str()
        .ok_or_else(|| NotionError::Decode("block object has no 'id'".into()))?
        .to_string();
    let block_type = v["type"].as_str().unwrap_or("");
    let body = &v[block_type];

    let kind = match block_type {
        "paragraph" => BlockKind::Paragraph(parse_rich_text(&body["rich_text"])),
        "heading_1" => BlockKind::Heading1(parse_rich_text(&body["rich_text"])),
        "heading_2" => BlockKind::Heading2(parse_rich_text(&body["rich_text"])),
        "heading_3" => BlockKind::Heading3(parse_rich_text(&body["rich_text"])),
        "bulleted_list_item" => BlockKind::BulletedListItem(parse_rich_text(&body["rich_text"])),
        "numbered_list_item" => BlockKind::NumberedListItem(parse_rich_text(&body["rich_text"])),
        "quote" => BlockKind::Quote(parse_rich_text(&body["rich_text"])),
        "image" => BlockKind::Image(parse_image(body)),
        "divider" => BlockKind::Divider,
        "code" => BlockKind::Code {
            language: body["language"].as_str().unwrap_or("").to_string(),
            text: parse_rich_text(&body["rich_text"]),
        },
        other => BlockKind::Unsupported(other.to_string()),
    };

    Ok(Block {
        id,
        kind,
        has_children: v["has_children"].as_bool().unwrap_or(false),
    })
}

/// Decode a rich-text array.  A missing or non-array value is empty.
fn parse_rich_text(v: &Value) -> Vec<RichText> {
    let Some(runs) = v.as_array() else {
        return Vec::new();
    };
    runs.iter()
        .map(|rt| {
            let a = &rt["annotations"];
            let flag = |name: &str| a[name].as_bool().unwrap_or(false);
            RichText {
                plain_text: rt["plain_text"].as_str().unwrap_or("").to_string(),
                href: rt["href"].as_str().map(str::to_string),
                annotations: Annotations {
                    bold: flag("bold"),
                    italic: flag("italic"),
                    strikethrough: flag("strikethrough"),
                    underline: flag("underline"),
                    code: flag("code"),
                },
            }
        })
        .collect()
}

fn parse_image(body: &Value) -> Image {
    let source = if let Some(url) = body["file"]["url"].as_str() {
        Some(ImageSource::Hosted(url.to_string()))
    } else {
        body["external"]["url"]
            .as_str()
            .map(|url| ImageSource::External(url.to_string()))
    };
    Image {
        source,
        caption: parse_rich_text(&body["caption"]),
    }
}

/// Decode a page object, extracting its title.
///
/// The title comes from the property keyed `title`, falling back to the
/// first property whose `type` is `title` (database rows name it freely).
pub fn parse_page(v: &Value) -> Result<Page, NotionError> {
    let id = v["id"]
        .as_str()
        .ok_or_else(|| NotionError::Decode("page object has no 'id'".into()))?
        .to_string();

    let props = &v["properties"];
    let title_prop = if props["title"]["title"].is_array() {
        Some(&props["title"])
    } else {
        props
            .as_object()
            .and_then(|m| m.values().find(|p| p["type"].as_str() == Some("title")))
    };
    let title = title_prop
        .map(|p| RichText::join_plain(&parse_rich_text(&p["title"])))
        .filter(|t| !t.is_empty());

    Ok(Page { id, title })
}
