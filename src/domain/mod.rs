//! Domain layer: block values, the block tree and its traversal
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod block;
pub mod builder;
pub mod error;
pub mod ids;
pub mod node;
pub mod tree_traits;
pub mod walk;

pub use arena::{BlockTree, NodeRef, TreeNode};
pub use block::{Block, BlockType, BlockValue};
pub use builder::{build_tree, flatten};
pub use error::DomainError;
pub use ids::{new_tmp_identifier, NodeId, ROOT_NODE_ID, TMP_ID_PREFIX};
pub use node::{Node, Siblings};
pub use tree_traits::TreeNodeConvert;
pub use walk::{print_tree, render_tree, try_walk, walk};
