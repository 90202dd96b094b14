//! Notion content access: the block data model, the [`BlockSource`] seam the
//! renderer fetches through, and its HTTP, fixture and in-memory
//! implementations.
mod error;
mod types;
mod wire;
mod source;
mod http;
mod fixture;
mod page_id;

pub use error::NotionError;
pub use types::*;
pub use wire::{parse_block, parse_children_page, parse_page, ChildrenPage};
pub use source::{BlockSource, StaticSource};
pub use http::NotionClient;
pub use fixture::FixtureSource;
pub use page_id::page_id_from_url;
