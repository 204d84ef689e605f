//! Conversion of block trees into `termtree` trees for the unicode tree view

use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::BlockTree;
use crate::domain::block::BlockValue;
use crate::domain::node::Node;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

/// Label of a node in the unicode view, e.g. `paragraph [child1-id]`.
pub fn node_label<N: Node>(node: &N, show_ids: bool) -> String {
    if show_ids {
        format!("{} [{}]", node.node_type(), node.id())
    } else {
        node.node_type().to_string()
    }
}

/// Recursively build a `termtree` tree below `node`.
pub fn to_termtree<N: Node>(node: &N, show_ids: bool) -> Tree<String> {
    let leaves: Vec<_> = node
        .children()
        .map(|child| to_termtree(&child, show_ids))
        .collect();

    Tree::new(node_label(node, show_ids)).with_leaves(leaves)
}

impl<B: BlockValue> TreeNodeConvert for BlockTree<B> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        match self.root_node() {
            Some(root) => to_termtree(&root, true),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
