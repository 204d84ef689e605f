//! Block document service
//!
//! Loads block lists as delivered by the remote API, turns them into block trees
//! and writes the flattened write-back representation.

use std::path::Path;
use std::sync::Arc;

use generational_arena::Index;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Block, BlockTree, DomainError, Node, NodeId};
use crate::infrastructure::traits::FileSystem;

/// Shape figures of a block tree. The root sentinel is not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub nodes: usize,
    /// Block levels below the root sentinel
    pub depth: usize,
    pub leaves: usize,
    /// Nodes carrying a locally generated id
    pub temporary_ids: usize,
}

impl TreeStats {
    pub fn from_tree(tree: &BlockTree<Block>) -> Self {
        let blocks: Vec<_> = tree.iter().filter(|node| !node.is_root()).collect();
        Self {
            nodes: blocks.len(),
            depth: tree.depth().saturating_sub(1),
            leaves: tree.leaves().len(),
            temporary_ids: blocks.iter().filter(|n| n.id().is_temporary()).count(),
        }
    }
}

/// Service for reading, converting and writing block documents.
pub struct DocumentService {
    fs: Arc<dyn FileSystem>,
}

impl DocumentService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read a block list from `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<Block>> {
        let content = self
            .fs
            .read_to_string(path)
            .with_read_context(path)?;
        Self::parse_blocks(&content, &path.display().to_string())
    }

    /// Read a block list from `path` and build its tree.
    pub fn build(&self, path: &Path) -> ApplicationResult<BlockTree<Block>> {
        let blocks = self.load(path)?;
        debug!("build: {} top-level blocks", blocks.len());
        Ok(BlockTree::from_blocks(blocks))
    }

    /// Write blocks as JSON to `path`.
    #[instrument(level = "debug", skip(self, blocks))]
    pub fn save(&self, path: &Path, blocks: &[Block], pretty: bool) -> ApplicationResult<()> {
        let json = Self::to_json(blocks, pretty)?;
        self.fs
            .write(path, &json)
            .with_write_context(path)
    }

    /// Parse a JSON array of blocks, or a paginated list response (`{"results": [...]}`).
    pub fn parse_blocks(content: &str, context: &str) -> ApplicationResult<Vec<Block>> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| ApplicationError::json(context, e))?;

        let list = match value {
            Value::Array(_) => value,
            Value::Object(mut object) => match object.remove("results") {
                Some(results @ Value::Array(_)) => results,
                _ => {
                    return Err(DomainError::invalid_block(format!(
                        "{}: expected an array of blocks or a list response with `results`",
                        context
                    ))
                    .into())
                }
            },
            _ => {
                return Err(DomainError::invalid_block(format!(
                    "{}: expected an array of blocks",
                    context
                ))
                .into())
            }
        };

        serde_json::from_value(list).map_err(|e| ApplicationError::json(context, e))
    }

    pub fn to_json(blocks: &[Block], pretty: bool) -> ApplicationResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(blocks)
        } else {
            serde_json::to_string(blocks)
        };
        json.map_err(|e| ApplicationError::json("block output", e))
    }

    /// Node to start from: the root sentinel, or the node carrying `from`.
    pub fn start_node(tree: &BlockTree<Block>, from: Option<&NodeId>) -> ApplicationResult<Index> {
        match from {
            Some(id) => tree
                .find(id)
                .ok_or_else(|| DomainError::UnknownNode(id.clone()).into()),
            None => tree
                .root()
                .ok_or_else(|| DomainError::UnknownNode(NodeId::root()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BlockType;

    #[test]
    fn given_list_response_when_parsing_then_reads_results() {
        let content = r#"{"object": "list", "results": [{"type": "divider", "id": "d"}],
                          "has_more": false, "next_cursor": null}"#;

        let blocks = DocumentService::parse_blocks(content, "test").unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_type, BlockType::Divider);
    }

    #[test]
    fn given_scalar_json_when_parsing_then_errors() {
        let result = DocumentService::parse_blocks("42", "test");
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::InvalidBlock { .. }))
        ));
    }

    #[test]
    fn given_broken_json_when_parsing_then_json_error() {
        let result = DocumentService::parse_blocks("[{", "broken.json");
        let err = result.unwrap_err();
        assert!(matches!(err, ApplicationError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn given_tree_when_computing_stats_then_excludes_root() {
        let tree = BlockTree::from_blocks(vec![
            Block::new(BlockType::Toggle)
                .with_id("t")
                .with_children(vec![Block::new(BlockType::Paragraph)]),
            Block::new(BlockType::Divider).with_id("d"),
        ]);

        let stats = TreeStats::from_tree(&tree);

        assert_eq!(
            stats,
            TreeStats {
                nodes: 3,
                depth: 2,
                leaves: 2,
                temporary_ids: 1,
            }
        );
    }

    #[test]
    fn given_unknown_start_id_then_unknown_node_error() {
        let tree = BlockTree::from_blocks(vec![Block::new(BlockType::Divider).with_id("d")]);

        let err = DocumentService::start_node(&tree, Some(&NodeId::new("missing"))).unwrap_err();

        assert!(err.to_string().contains("missing"));
        assert!(DocumentService::start_node(&tree, Some(&NodeId::new("d"))).is_ok());
        assert_eq!(DocumentService::start_node(&tree, None).unwrap(), tree.root().unwrap());
    }
}
