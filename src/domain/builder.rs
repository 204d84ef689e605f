//! Conversion between nested block lists and block trees.

use generational_arena::Index;
use tracing::{debug, instrument, warn};

use crate::domain::arena::{BlockTree, NodeRef};
use crate::domain::block::BlockValue;
use crate::domain::node::Node;

/// Build nodes for `blocks` under `parent`, recursing into nested children.
///
/// Without a parent (or with an unknown one) a root sentinel is created first.
/// Siblings are chained in input order and appended after any children the parent
/// already has. Returns the parent.
///
/// Nested children are moved out of each block whose `has_children` flag is set;
/// blocks without the flag keep whatever they carry.
#[instrument(level = "debug", skip(tree, blocks), fields(blocks = blocks.len()))]
pub fn build_tree<B: BlockValue>(
    tree: &mut BlockTree<B>,
    blocks: Vec<B>,
    parent: Option<Index>,
) -> Index {
    let parent = match parent {
        Some(idx) if tree.get(idx).is_some() => idx,
        Some(_) => {
            warn!("build_tree: unknown parent, building under a new root");
            tree.insert_sentinel()
        }
        None => tree.insert_sentinel(),
    };

    let mut first = None;
    let mut prev = tree.get(parent).and_then(|node| node.last_child);

    for mut block in blocks {
        let nested =
            (block.has_children() && !block.children().is_empty()).then(|| block.take_children());
        let idx = tree.alloc(block, Some(parent));

        if let Some(children) = nested {
            build_tree(tree, children, Some(idx));
        }

        if let Some(p) = prev {
            if let Some(prev_node) = tree.get_mut(p) {
                prev_node.next = Some(idx);
            }
            if let Some(node) = tree.get_mut(idx) {
                node.prev = Some(p);
            }
        }
        if first.is_none() {
            first = Some(idx);
        }
        prev = Some(idx);
    }

    if let (Some(first), Some(node)) = (first, tree.get_mut(parent)) {
        if node.first_child.is_none() {
            node.first_child = Some(first);
        }
        node.last_child = prev;
    }

    parent
}

/// Flatten the tree starting at `idx` into nested blocks.
///
/// On a root (a node without parent) the root's children are emitted; the root
/// itself never is. On any other node, that node and its following siblings are
/// emitted. Each block gets its subtree reattached through `set_children`.
#[instrument(level = "debug", skip(tree))]
pub fn flatten<B: BlockValue + Clone>(tree: &BlockTree<B>, idx: Index) -> Vec<B> {
    let Some(node) = tree.node(idx) else {
        debug!("flatten: unknown node");
        return Vec::new();
    };

    let start = if node.is_root() {
        node.first_child()
    } else {
        Some(node)
    };

    start.map(flatten_siblings).unwrap_or_default()
}

fn flatten_siblings<B: BlockValue + Clone>(start: NodeRef<'_, B>) -> Vec<B> {
    start
        .following_siblings()
        .map(|node| {
            let mut block = node.block().clone();
            if let Some(child) = node.first_child() {
                block.set_children(flatten_siblings(child));
            }
            block
        })
        .collect()
}

/// Consume the tree and move its blocks out, nested, starting at the root's children.
#[instrument(level = "debug", skip(tree))]
pub fn into_blocks<B: BlockValue>(mut tree: BlockTree<B>) -> Vec<B> {
    let first = tree
        .root()
        .and_then(|root| tree.get(root))
        .and_then(|root| root.first_child);
    drain_siblings(&mut tree, first)
}

fn drain_siblings<B: BlockValue>(tree: &mut BlockTree<B>, start: Option<Index>) -> Vec<B> {
    let mut blocks = Vec::new();
    let mut cursor = start;
    while let Some(idx) = cursor {
        let Some(node) = tree.take(idx) else {
            break;
        };
        cursor = node.next;

        let mut block = node.block;
        if node.first_child.is_some() {
            let children = drain_siblings(tree, node.first_child);
            block.set_children(children);
        }
        blocks.push(block);
    }
    blocks
}
