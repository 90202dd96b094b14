//! Offline block source backed by a file of raw Notion payloads.
//!
//! The file maps block ids to the `results` arrays the API would return for
//! them, so a captured document can be rendered without network access.
//! YAML is the canonical format; JSON files parse too.
//!
//! ```yaml
//! blocks:
//!   root-page-id:
//!     - id: b1
//!       type: heading_1
//!       heading_1: { rich_text: [ { plain_text: "Title" } ] }
//!     - id: b2
//!       type: toggle
//!       has_children: true
//!       toggle: { rich_text: [] }
//!   b2:
//!     - id: b3
//!       type: paragraph
//!       paragraph: { rich_text: [ { plain_text: "Hidden text" } ] }
//! ```
use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::{parse_block, Block, BlockSource, NotionError, StaticSource};

#[derive(Debug, Deserialize)]
struct FixtureFile {
    blocks: BTreeMap<String, Vec<serde_json::Value>>,
}

pub struct FixtureSource {
    inner: StaticSource,
}

impl FixtureSource {
    /// Load a fixture from `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, NotionError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| NotionError::Fixture(format!("reading {}: {e}", path.display())))?;
        debug!(path = %path.display(), "loading block fixture");
        Self::load(&text)
    }

    /// Load a fixture from a YAML (or JSON) string.
    pub fn load(text: &str) -> Result<Self, NotionError> {
        let file: FixtureFile =
            serde_yaml::from_str(text).map_err(|e| NotionError::Fixture(e.to_string()))?;
        let mut inner = StaticSource::new();
        for (parent, raw) in file.blocks {
            let blocks = raw
                .iter()
                .map(parse_block)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| NotionError::Fixture(format!("children of '{parent}': {e}")))?;
            inner.insert(parent, blocks);
        }
        Ok(Self { inner })
    }
}

#[async_trait]
impl BlockSource for FixtureSource {
    async fn list_children(&self, block_id: &str) -> Result<Vec<Block>, NotionError> {
        self.inner.list_children(block_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockKind, BlockType, RichText};

    const YAML: &str = r#"
blocks:
  root:
    - id: b1
      type: heading_1
      heading_1: { rich_text: [ { plain_text: "Title" } ] }
    - id: b2
      type: toggle
      has_children: true
      toggle: { rich_text: [] }
  b2:
    - id: b3
      type: paragraph
      paragraph: { rich_text: [ { plain_text: "Hidden text" } ] }
"#;

    #[tokio::test]
    async fn yaml_fixture_decodes_blocks() {
        let src = FixtureSource::load(YAML).unwrap();
        let root = src.list_children("root").await.unwrap();
        assert_eq!(root.len(), 2);
        assert_eq!(root[0].kind, BlockKind::Heading1(vec![RichText::plain("Title")]));
        assert_eq!(root[1].block_type(), BlockType::Unsupported);
        assert!(root[1].has_children);

        let nested = src.list_children("b2").await.unwrap();
        assert_eq!(nested[0].id, "b3");
    }

    #[tokio::test]
    async fn json_fixture_is_accepted() {
        let json = r#"{"blocks": {"root": [{"id": "d", "type": "divider", "divider": {}}]}}"#;
        let src = FixtureSource::load(json).unwrap();
        let root = src.list_children("root").await.unwrap();
        assert_eq!(root[0].kind, BlockKind::Divider);
    }

    #[tokio::test]
    async fn missing_entry_is_not_found() {
        let src = FixtureSource::load(YAML).unwrap();
        assert!(matches!(src.list_children("b1").await, Err(NotionError::NotFound(_))));
    }

    #[test]
    fn block_without_id_names_parent() {
        let bad = "blocks:\n  root:\n    - type: divider\n";
        match FixtureSource::load(bad) {
            Err(NotionError::Fixture(msg)) => assert!(msg.contains("root"), "{msg}"),
            other => panic!("unexpected: {:?}", other.err()),
        }
    }

    #[test]
    fn from_file_reads_disk() {
        use std::io::Write;
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{YAML}").unwrap();
        assert!(FixtureSource::from_file(f.path()).is_ok());
        assert!(matches!(
            FixtureSource::from_file("/tmp/notion_md_no_such_fixture.yaml"),
            Err(NotionError::Fixture(_))
        ));
    }
}
