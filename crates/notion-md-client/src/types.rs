use serde::{Deserialize, Serialize};

/// Formatting flags carried by a rich-text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub code: bool,
}

/// One text run of a block's formatted content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub annotations: Annotations,
}

impl RichText {
    /// An unformatted run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
            ..Default::default()
        }
    }

    /// Concatenated plain text of a sequence of runs.
    pub fn join_plain(runs: &[RichText]) -> String {
        runs.iter().map(|r| r.plain_text.as_str()).collect()
    }
}

/// Where an image's bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Uploaded to Notion (`file.url`, a signed, expiring URL)
    Hosted(String),
    /// Linked from elsewhere (`external.url`)
    External(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    /// `None` when the block carries neither a hosted nor an external URL.
    pub source: Option<ImageSource>,
    pub caption: Vec<RichText>,
}

impl Image {
    /// The image URL, or an empty string for a malformed block.
    pub fn url(&self) -> &str {
        match &self.source {
            Some(ImageSource::Hosted(u)) | Some(ImageSource::External(u)) => u,
            None => "",
        }
    }
}

/// Block content, one variant per handled block type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph(Vec<RichText>),
    Heading1(Vec<RichText>),
    Heading2(Vec<RichText>),
    Heading3(Vec<RichText>),
    BulletedListItem(Vec<RichText>),
    NumberedListItem(Vec<RichText>),
    Quote(Vec<RichText>),
    Image(Image),
    Divider,
    Code { language: String, text: Vec<RichText> },
    /// Any other Notion block type; holds the wire type name.
    Unsupported(String),
}

/// Payload-free tag of a [`BlockKind`], used for spacing decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletedListItem,
    NumberedListItem,
    Quote,
    Image,
    Divider,
    Code,
    Unsupported,
}

impl BlockKind {
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockKind::Paragraph(_) => BlockType::Paragraph,
            BlockKind::Heading1(_) => BlockType::Heading1,
            BlockKind::Heading2(_) => BlockType::Heading2,
            BlockKind::Heading3(_) => BlockType::Heading3,
            BlockKind::BulletedListItem(_) => BlockType::BulletedListItem,
            BlockKind::NumberedListItem(_) => BlockType::NumberedListItem,
            BlockKind::Quote(_) => BlockType::Quote,
            BlockKind::Image(_) => BlockType::Image,
            BlockKind::Divider => BlockType::Divider,
            BlockKind::Code { .. } => BlockType::Code,
            BlockKind::Unsupported(_) => BlockType::Unsupported,
        }
    }

    /// Rich text of text-bearing blocks (including code); `None` for
    /// images, dividers and unsupported blocks.
    pub fn rich_text(&self) -> Option<&[RichText]> {
        match self {
            BlockKind::Paragraph(t)
            | BlockKind::Heading1(t)
            | BlockKind::Heading2(t)
            | BlockKind::Heading3(t)
            | BlockKind::BulletedListItem(t)
            | BlockKind::NumberedListItem(t)
            | BlockKind::Quote(t)
            | BlockKind::Code { text: t, .. } => Some(t),
            BlockKind::Image(_) | BlockKind::Divider | BlockKind::Unsupported(_) => None,
        }
    }
}

/// A read-only snapshot of one Notion block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: String,
    pub kind: BlockKind,
    pub has_children: bool,
}

impl Block {
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
            has_children: false,
        }
    }

    /// Mark the block as owning children.
    pub fn with_children(mut self) -> Self {
        self.has_children = true;
        self
    }

    pub fn block_type(&self) -> BlockType {
        self.kind.block_type()
    }
}

/// A Notion page as far as the publishing workflow needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub id: String,
    pub title: Option<String>,
}
