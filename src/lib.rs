//! Navigable tree model for block-structured documents.
//!
//! A flat, ordered list of blocks as returned by a block API (each block possibly
//! carrying nested children) is turned into a [`domain::BlockTree`] with
//! parent/sibling/child links, and flattened back into nested blocks for write-back.
//!
//! ```
//! use blocktree::domain::{Block, BlockTree, BlockType, Node};
//!
//! let tree = BlockTree::from_blocks(vec![
//!     Block::new(BlockType::Toggle)
//!         .with_id("toggle-id")
//!         .with_children(vec![Block::new(BlockType::Paragraph).with_id("child-id")]),
//! ]);
//!
//! let toggle = tree.root_node().unwrap().first_child().unwrap();
//! assert_eq!(toggle.first_child().unwrap().id().as_str(), "child-id");
//! assert_eq!(tree.to_blocks()[0].children.len(), 1);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
