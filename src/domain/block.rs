//! Block values: the unit of document content delivered by the remote API
//!
//! The tree only needs a small capability surface from a block ([`BlockValue`]).
//! [`Block`] is the concrete value decoded from the API's JSON: the common fields are
//! typed, the per-type body is kept as an opaque JSON map.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::domain::error::DomainError;

/// What the tree needs from a block value.
pub trait BlockValue: Sized {
    /// Remote identity, empty if the block was never persisted.
    fn id(&self) -> &str;

    /// Type tag, e.g. `paragraph`.
    fn type_tag(&self) -> &str;

    fn has_children(&self) -> bool;

    /// Nested children currently held by the block itself.
    fn children(&self) -> &[Self];

    /// Move the nested children out of the block, leaving it without children.
    fn take_children(&mut self) -> Vec<Self>;

    /// Reattach nested children.
    fn set_children(&mut self, children: Vec<Self>);

    /// Payload for the root sentinel. Must tolerate being empty.
    fn placeholder() -> Self;
}

/// Every block kind known to the remote API.
///
/// Tags the API adds later decode to [`BlockType::Unsupported`], which keeps the wire tag
/// so the block is written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletedListItem,
    NumberedListItem,
    ToDo,
    Toggle,
    ChildPage,
    ChildDatabase,
    Embed,
    Image,
    Audio,
    Video,
    File,
    Pdf,
    Bookmark,
    Code,
    Divider,
    Callout,
    Quote,
    TableOfContents,
    Equation,
    Breadcrumb,
    Column,
    ColumnList,
    LinkPreview,
    LinkToPage,
    SyncedBlock,
    Table,
    TableRow,
    Template,
    Unsupported(String),
}

impl BlockType {
    /// Wire tag of the block type.
    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Heading1 => "heading_1",
            BlockType::Heading2 => "heading_2",
            BlockType::Heading3 => "heading_3",
            BlockType::BulletedListItem => "bulleted_list_item",
            BlockType::NumberedListItem => "numbered_list_item",
            BlockType::ToDo => "to_do",
            BlockType::Toggle => "toggle",
            BlockType::ChildPage => "child_page",
            BlockType::ChildDatabase => "child_database",
            BlockType::Embed => "embed",
            BlockType::Image => "image",
            BlockType::Audio => "audio",
            BlockType::Video => "video",
            BlockType::File => "file",
            BlockType::Pdf => "pdf",
            BlockType::Bookmark => "bookmark",
            BlockType::Code => "code",
            BlockType::Divider => "divider",
            BlockType::Callout => "callout",
            BlockType::Quote => "quote",
            BlockType::TableOfContents => "table_of_contents",
            BlockType::Equation => "equation",
            BlockType::Breadcrumb => "breadcrumb",
            BlockType::Column => "column",
            BlockType::ColumnList => "column_list",
            BlockType::LinkPreview => "link_preview",
            BlockType::LinkToPage => "link_to_page",
            BlockType::SyncedBlock => "synced_block",
            BlockType::Table => "table",
            BlockType::TableRow => "table_row",
            BlockType::Template => "template",
            BlockType::Unsupported(tag) => tag,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, BlockType::Unsupported(_))
    }
}

impl From<&str> for BlockType {
    fn from(tag: &str) -> Self {
        match tag {
            "paragraph" => BlockType::Paragraph,
            "heading_1" => BlockType::Heading1,
            "heading_2" => BlockType::Heading2,
            "heading_3" => BlockType::Heading3,
            "bulleted_list_item" => BlockType::BulletedListItem,
            "numbered_list_item" => BlockType::NumberedListItem,
            "to_do" => BlockType::ToDo,
            "toggle" => BlockType::Toggle,
            "child_page" => BlockType::ChildPage,
            "child_database" => BlockType::ChildDatabase,
            "embed" => BlockType::Embed,
            "image" => BlockType::Image,
            "audio" => BlockType::Audio,
            "video" => BlockType::Video,
            "file" => BlockType::File,
            "pdf" => BlockType::Pdf,
            "bookmark" => BlockType::Bookmark,
            "code" => BlockType::Code,
            "divider" => BlockType::Divider,
            "callout" => BlockType::Callout,
            "quote" => BlockType::Quote,
            "table_of_contents" => BlockType::TableOfContents,
            "equation" => BlockType::Equation,
            "breadcrumb" => BlockType::Breadcrumb,
            "column" => BlockType::Column,
            "column_list" => BlockType::ColumnList,
            "link_preview" => BlockType::LinkPreview,
            "link_to_page" => BlockType::LinkToPage,
            "synced_block" => BlockType::SyncedBlock,
            "table" => BlockType::Table,
            "table_row" => BlockType::TableRow,
            "template" => BlockType::Template,
            other => BlockType::Unsupported(other.to_string()),
        }
    }
}

impl From<String> for BlockType {
    fn from(tag: String) -> Self {
        BlockType::from(tag.as_str())
    }
}

impl From<BlockType> for String {
    fn from(block_type: BlockType) -> Self {
        block_type.as_str().to_string()
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A block as returned by (or sent to) the remote API.
///
/// On the wire the type-specific body sits under a key named after the type,
/// and nested children live inside that body:
///
/// ```json
/// {"id": "...", "type": "toggle", "has_children": true,
///  "toggle": {"rich_text": [], "children": [ ... ]}}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    /// Empty for blocks not yet persisted
    pub id: String,
    pub block_type: BlockType,
    pub has_children: bool,
    pub children: Vec<Block>,
    /// Type-specific body without `children`
    pub payload: Map<String, Value>,
    /// Remaining top-level fields (`object`, `parent`, `created_time`, ...), kept verbatim
    pub extra: Map<String, Value>,
}

impl Block {
    pub fn new(block_type: BlockType) -> Self {
        Self {
            id: String::new(),
            block_type,
            has_children: false,
            children: Vec::new(),
            payload: Map::new(),
            extra: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        BlockValue::set_children(&mut self, children);
        self
    }

    pub fn with_payload(mut self, key: impl Into<String>, value: Value) -> Self {
        self.payload.insert(key.into(), value);
        self
    }
}

impl BlockValue for Block {
    fn id(&self) -> &str {
        &self.id
    }

    fn type_tag(&self) -> &str {
        self.block_type.as_str()
    }

    fn has_children(&self) -> bool {
        self.has_children
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn take_children(&mut self) -> Vec<Self> {
        std::mem::take(&mut self.children)
    }

    fn set_children(&mut self, children: Vec<Self>) {
        self.has_children = !children.is_empty();
        self.children = children;
    }

    fn placeholder() -> Self {
        Block::new(BlockType::Paragraph)
    }
}

/// Wire shape used for decoding.
#[derive(Deserialize)]
struct RawBlock {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type")]
    block_type: BlockType,
    #[serde(default)]
    has_children: Option<bool>,
    /// Some producers put children at the top level
    #[serde(default)]
    children: Option<Vec<Block>>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl TryFrom<RawBlock> for Block {
    type Error = DomainError;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        let RawBlock {
            id,
            block_type,
            has_children,
            children,
            mut rest,
        } = raw;

        let mut payload = match rest.remove(block_type.as_str()) {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(DomainError::invalid_block(format!(
                    "body of {} block must be an object, got: {}",
                    block_type, other
                )))
            }
        };

        let children = match payload.remove("children") {
            None | Some(Value::Null) => children.unwrap_or_default(),
            Some(value) => serde_json::from_value::<Vec<Block>>(value).map_err(|e| {
                DomainError::invalid_block(format!("children of {} block: {}", block_type, e))
            })?,
        };

        Ok(Block {
            id: id.unwrap_or_default(),
            block_type,
            has_children: has_children.unwrap_or(!children.is_empty()),
            children,
            payload,
            extra: rest,
        })
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.id.is_empty() {
            map.serialize_entry("id", &self.id)?;
        }
        map.serialize_entry("type", &self.block_type)?;
        map.serialize_entry("has_children", &self.has_children)?;
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(
            self.block_type.as_str(),
            &Body {
                payload: &self.payload,
                children: &self.children,
            },
        )?;
        map.end()
    }
}

/// Type-specific body with the children folded back in.
struct Body<'a> {
    payload: &'a Map<String, Value>,
    children: &'a [Block],
}

impl Serialize for Body<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.payload {
            map.serialize_entry(key, value)?;
        }
        if !self.children.is_empty() {
            map.serialize_entry("children", self.children)?;
        }
        map.end()
    }
}
