use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{Block, NotionError};

/// Anything that can list the children of a block.
///
/// Implementations return *all* children in document order; paging, if the
/// backend has any, is driven inside the implementation.
#[async_trait]
pub trait BlockSource: Send + Sync {
    async fn list_children(&self, block_id: &str) -> Result<Vec<Block>, NotionError>;
}

/// In-memory block tree.  Unknown ids yield [`NotionError::NotFound`].
///
/// Every `list_children` call is recorded so tests can assert on fetch
/// order.
#[derive(Debug, Default)]
pub struct StaticSource {
    children: HashMap<String, Vec<Block>>,
    failing: HashSet<String>,
    fetched: Mutex<Vec<String>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the ordered children of `parent`.
    pub fn with_children(mut self, parent: impl Into<String>, blocks: Vec<Block>) -> Self {
        self.children.insert(parent.into(), blocks);
        self
    }

    /// Make fetches of `block_id` fail with a 403 API error.
    pub fn with_failure(mut self, block_id: impl Into<String>) -> Self {
        self.failing.insert(block_id.into());
        self
    }

    /// Ids passed to `list_children`, in call order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().map(|f| f.clone()).unwrap_or_default()
    }

    pub(crate) fn insert(&mut self, parent: String, blocks: Vec<Block>) {
        self.children.insert(parent, blocks);
    }
}

#[async_trait]
impl BlockSource for StaticSource {
    async fn list_children(&self, block_id: &str) -> Result<Vec<Block>, NotionError> {
        if let Ok(mut f) = self.fetched.lock() {
            f.push(block_id.to_string());
        }
        if self.failing.contains(block_id) {
            return Err(NotionError::Api {
                status: 403,
                code: "restricted_resource".into(),
                message: format!("no access to block {block_id}"),
            });
        }
        self.children
            .get(block_id)
            .cloned()
            .ok_or_else(|| NotionError::NotFound(block_id.to_string()))
    }
}
