//! Arena-backed block tree with intrusive parent/sibling/child links
//!
//! Nodes live in a generational arena and refer to each other by [`Index`].
//! The arena owns every node; `first_child`/`last_child` are the logical owning
//! edges, `parent`/`prev`/`next` are back references. Stale indices behave like
//! absent nodes.

use std::fmt;
use std::ptr;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, warn};

use crate::domain::block::BlockValue;
use crate::domain::builder;
use crate::domain::node::Node;
use crate::domain::NodeId;

/// One element of the document tree, wrapping exactly one block value.
#[derive(Debug, Clone)]
pub struct TreeNode<B> {
    pub(crate) block: B,
    pub(crate) id: NodeId,
    pub(crate) parent: Option<Index>,
    pub(crate) prev: Option<Index>,
    pub(crate) next: Option<Index>,
    pub(crate) first_child: Option<Index>,
    pub(crate) last_child: Option<Index>,
}

impl<B> TreeNode<B> {
    pub(crate) fn new(block: B, id: NodeId, parent: Option<Index>) -> Self {
        Self {
            block,
            id,
            parent,
            prev: None,
            next: None,
            first_child: None,
            last_child: None,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn block(&self) -> &B {
        &self.block
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn prev_sibling(&self) -> Option<Index> {
        self.prev
    }

    pub fn next_sibling(&self) -> Option<Index> {
        self.next
    }

    pub fn first_child(&self) -> Option<Index> {
        self.first_child
    }

    pub fn last_child(&self) -> Option<Index> {
        self.last_child
    }
}

/// Block tree: arena storage plus the root sentinel, if one was built.
#[derive(Debug, Clone)]
pub struct BlockTree<B> {
    arena: Arena<TreeNode<B>>,
    root: Option<Index>,
}

impl<B: BlockValue> Default for BlockTree<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: BlockValue> BlockTree<B> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Build a tree from a flat, ordered block list under a fresh root sentinel.
    pub fn from_blocks(blocks: Vec<B>) -> Self {
        let mut tree = Self::new();
        builder::build_tree(&mut tree, blocks, None);
        tree
    }

    /// Flatten a clone of the whole tree back into nested blocks.
    pub fn to_blocks(&self) -> Vec<B>
    where
        B: Clone,
    {
        self.root
            .map(|root| builder::flatten(self, root))
            .unwrap_or_default()
    }

    /// Consume the tree and return its blocks, nested, in document order.
    pub fn into_blocks(self) -> Vec<B> {
        builder::into_blocks(self)
    }

    /// Root sentinel, None until a tree was built without an explicit parent.
    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn root_node(&self) -> Option<NodeRef<'_, B>> {
        self.root.and_then(|idx| self.node(idx))
    }

    /// Number of nodes held by the arena, attached or not.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn get(&self, idx: Index) -> Option<&TreeNode<B>> {
        self.arena.get(idx)
    }

    pub(crate) fn get_mut(&mut self, idx: Index) -> Option<&mut TreeNode<B>> {
        self.arena.get_mut(idx)
    }

    pub(crate) fn take(&mut self, idx: Index) -> Option<TreeNode<B>> {
        if self.root == Some(idx) {
            self.root = None;
        }
        self.arena.remove(idx)
    }

    /// Navigable view of a node.
    pub fn node(&self, idx: Index) -> Option<NodeRef<'_, B>> {
        self.arena.get(idx).map(|node| NodeRef {
            tree: self,
            index: idx,
            node,
        })
    }

    pub fn block(&self, idx: Index) -> Option<&B> {
        self.arena.get(idx).map(|node| &node.block)
    }

    /// Mutable access to the wrapped block. The node id stays as assigned at creation.
    pub fn block_mut(&mut self, idx: Index) -> Option<&mut B> {
        self.arena.get_mut(idx).map(|node| &mut node.block)
    }

    /// Materialize a detached node for `block`.
    ///
    /// The id is the block's id, or a temporary id if the block has none.
    #[instrument(level = "trace", skip(self, block))]
    pub fn insert_node(&mut self, block: B) -> Index {
        self.alloc(block, None)
    }

    /// Allocate a node recording `parent` without linking it into the parent's chain.
    pub(crate) fn alloc(&mut self, block: B, parent: Option<Index>) -> Index {
        let id = NodeId::from_block_id(block.id());
        self.arena.insert(TreeNode::new(block, id, parent))
    }

    /// Create the root sentinel wrapping a placeholder block.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_sentinel(&mut self) -> Index {
        let idx = self
            .arena
            .insert(TreeNode::new(B::placeholder(), NodeId::root(), None));
        if self.root.is_none() {
            self.root = Some(idx);
        }
        idx
    }

    /// First node carrying `id`, if any.
    pub fn find(&self, id: &NodeId) -> Option<Index> {
        self.arena
            .iter()
            .find(|(_, node)| &node.id == id)
            .map(|(idx, _)| idx)
    }

    /// Insert `child` as the new last child of `parent`.
    ///
    /// A child still attached elsewhere is detached from its old parent first.
    /// Unknown indices and appending a node to itself are no-ops.
    #[instrument(level = "trace", skip(self))]
    pub fn append_child(&mut self, parent: Index, child: Index) {
        if !self.arena.contains(parent) || !self.arena.contains(child) {
            debug!("append_child: unknown node, ignoring");
            return;
        }
        if parent == child {
            warn!("append_child: cannot append a node to itself, ignoring");
            return;
        }
        debug_assert!(
            !self.is_ancestor(child, parent),
            "append_child: child is an ancestor of parent"
        );

        if let Some(old_parent) = self.arena[child].parent {
            debug!("append_child: detaching child from previous parent");
            self.unlink(old_parent, child);
        }

        let old_last = self.arena[parent].last_child;
        {
            let node = &mut self.arena[child];
            node.parent = Some(parent);
            node.prev = old_last;
            node.next = None;
        }
        match old_last {
            Some(last) => self.arena[last].next = Some(child),
            None => self.arena[parent].first_child = Some(child),
        }
        self.arena[parent].last_child = Some(child);
    }

    /// Unlink `child` from `parent`'s child chain and clear its parent/sibling links.
    ///
    /// No-op if `child` is not currently a child of `parent`. The child's own
    /// subtree stays linked, and the node stays in the arena.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_child(&mut self, parent: Index, child: Index) {
        let recorded_parent = self.arena.get(child).and_then(|node| node.parent);
        if recorded_parent != Some(parent) || !self.arena.contains(parent) {
            debug!("remove_child: node is not a child of the receiver, ignoring");
            return;
        }
        self.unlink(parent, child);
    }

    /// Detach every child of `parent`. Their subtrees are left intact.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_children(&mut self, parent: Index) {
        let Some(first) = self.arena.get(parent).and_then(|node| node.first_child) else {
            return;
        };

        let mut cursor = Some(first);
        while let Some(idx) = cursor {
            let node = &mut self.arena[idx];
            cursor = node.next;
            node.parent = None;
            node.prev = None;
            node.next = None;
        }

        let node = &mut self.arena[parent];
        node.first_child = None;
        node.last_child = None;
    }

    /// Detach `idx` and free it together with its whole subtree.
    ///
    /// Returns the number of freed nodes, 0 for an unknown index.
    #[instrument(level = "debug", skip(self))]
    pub fn discard(&mut self, idx: Index) -> usize {
        let Some(parent) = self.arena.get(idx).map(|node| node.parent) else {
            return 0;
        };
        if let Some(parent) = parent {
            self.unlink(parent, idx);
        }

        let mut freed = 0;
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.take(current) {
                let mut child = node.first_child;
                while let Some(c) = child {
                    stack.push(c);
                    child = self.arena.get(c).and_then(|n| n.next);
                }
                freed += 1;
            }
        }
        freed
    }

    /// Splice `child` out of `parent`'s chain. Caller guarantees the relation holds.
    fn unlink(&mut self, parent: Index, child: Index) {
        let (prev, next) = {
            let node = &self.arena[child];
            (node.prev, node.next)
        };

        match prev {
            Some(p) => self.arena[p].next = next,
            None => {
                if let Some(node) = self.arena.get_mut(parent) {
                    node.first_child = next;
                }
            }
        }
        match next {
            Some(n) => self.arena[n].prev = prev,
            None => {
                if let Some(node) = self.arena.get_mut(parent) {
                    node.last_child = prev;
                }
            }
        }

        let node = &mut self.arena[child];
        node.parent = None;
        node.prev = None;
        node.next = None;
    }

    fn is_ancestor(&self, candidate: Index, of: Index) -> bool {
        let mut cursor = self.arena.get(of).and_then(|node| node.parent);
        while let Some(idx) = cursor {
            if idx == candidate {
                return true;
            }
            cursor = self.arena.get(idx).and_then(|node| node.parent);
        }
        false
    }

    /// Pre-order traversal from the root sentinel.
    pub fn iter(&self) -> TreeIterator<'_, B> {
        TreeIterator::new(self)
    }

    /// Post-order traversal from the root sentinel.
    pub fn iter_postorder(&self) -> PostOrderIterator<'_, B> {
        PostOrderIterator::new(self)
    }

    /// Number of levels below and including the root sentinel; 0 without a root.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.root_node()
            .map(|root| Self::calculate_depth(&root))
            .unwrap_or(0)
    }

    fn calculate_depth(node: &NodeRef<'_, B>) -> usize {
        1 + node
            .children()
            .map(|child| Self::calculate_depth(&child))
            .max()
            .unwrap_or(0)
    }

    /// Ids of all childless block nodes reachable from the root, in document order.
    ///
    /// An empty root sentinel is not a leaf.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|node| !node.is_root() && node.first_child().is_none())
            .map(|node| node.id().clone())
            .collect()
    }
}

/// Borrowed cursor on one node of a [`BlockTree`].
pub struct NodeRef<'a, B> {
    tree: &'a BlockTree<B>,
    index: Index,
    node: &'a TreeNode<B>,
}

impl<'a, B> NodeRef<'a, B> {
    pub fn index(&self) -> Index {
        self.index
    }

    pub fn block(&self) -> &'a B {
        &self.node.block
    }

    pub fn tree(&self) -> &'a BlockTree<B> {
        self.tree
    }

    fn relative(&self, idx: Option<Index>) -> Option<Self> {
        let index = idx?;
        self.tree.arena.get(index).map(|node| NodeRef {
            tree: self.tree,
            index,
            node,
        })
    }
}

impl<B> Clone for NodeRef<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for NodeRef<'_, B> {}

impl<B> PartialEq for NodeRef<'_, B> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl<B> Eq for NodeRef<'_, B> {}

impl<B: BlockValue> fmt::Debug for NodeRef<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.node.id)
            .field("type", &self.node.block.type_tag())
            .finish()
    }
}

impl<B: BlockValue> Node for NodeRef<'_, B> {
    fn id(&self) -> &NodeId {
        &self.node.id
    }

    fn node_type(&self) -> &str {
        self.node.block.type_tag()
    }

    fn parent(&self) -> Option<Self> {
        self.relative(self.node.parent)
    }

    fn prev_sibling(&self) -> Option<Self> {
        self.relative(self.node.prev)
    }

    fn next_sibling(&self) -> Option<Self> {
        self.relative(self.node.next)
    }

    fn first_child(&self) -> Option<Self> {
        self.relative(self.node.first_child)
    }

    fn last_child(&self) -> Option<Self> {
        self.relative(self.node.last_child)
    }
}

pub struct TreeIterator<'a, B> {
    tree: &'a BlockTree<B>,
    stack: Vec<Index>,
}

impl<'a, B: BlockValue> TreeIterator<'a, B> {
    fn new(tree: &'a BlockTree<B>) -> Self {
        Self {
            tree,
            stack: tree.root().into_iter().collect(),
        }
    }
}

impl<'a, B: BlockValue> Iterator for TreeIterator<'a, B> {
    type Item = NodeRef<'a, B>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.node(current) {
                // Push children in reverse order for left-to-right traversal
                let children: Vec<Index> = node.children().map(|c| c.index()).collect();
                self.stack.extend(children.into_iter().rev());
                return Some(node);
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a, B> {
    tree: &'a BlockTree<B>,
    stack: Vec<(Index, bool)>,
}

impl<'a, B: BlockValue> PostOrderIterator<'a, B> {
    fn new(tree: &'a BlockTree<B>) -> Self {
        Self {
            tree,
            stack: tree.root().map(|root| (root, false)).into_iter().collect(),
        }
    }
}

impl<'a, B: BlockValue> Iterator for PostOrderIterator<'a, B> {
    type Item = NodeRef<'a, B>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.node(current) {
                if visited {
                    return Some(node);
                }
                self.stack.push((current, true));
                let children: Vec<Index> = node.children().map(|c| c.index()).collect();
                self.stack
                    .extend(children.into_iter().rev().map(|child| (child, false)));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::block::{Block, BlockType};

    fn paragraph(id: &str) -> Block {
        Block::new(BlockType::Paragraph).with_id(id)
    }

    fn ids(tree: &BlockTree<Block>, parent: Index) -> Vec<String> {
        tree.node(parent)
            .unwrap()
            .children()
            .map(|c| c.id().to_string())
            .collect()
    }

    #[test]
    fn given_detached_nodes_when_appending_then_links_chain() {
        let mut tree = BlockTree::new();
        let parent = tree.insert_node(paragraph("p"));
        let a = tree.insert_node(paragraph("a"));
        let b = tree.insert_node(paragraph("b"));

        tree.append_child(parent, a);
        tree.append_child(parent, b);

        assert_eq!(ids(&tree, parent), vec!["a", "b"]);
        let node_a = tree.get(a).unwrap();
        assert_eq!(node_a.parent(), Some(parent));
        assert_eq!(node_a.next_sibling(), Some(b));
        assert_eq!(node_a.prev_sibling(), None);
        assert_eq!(tree.get(b).unwrap().prev_sibling(), Some(a));
        assert_eq!(tree.get(parent).unwrap().first_child(), Some(a));
        assert_eq!(tree.get(parent).unwrap().last_child(), Some(b));
    }

    #[test]
    fn given_node_when_appending_to_itself_then_noop() {
        let mut tree = BlockTree::new();
        let a = tree.insert_node(paragraph("a"));

        tree.append_child(a, a);

        assert_eq!(tree.node(a).unwrap().child_count(), 0);
        assert_eq!(tree.get(a).unwrap().parent(), None);
    }

    #[test]
    fn given_middle_child_when_removing_then_neighbours_spliced() {
        let mut tree = BlockTree::new();
        let parent = tree.insert_node(paragraph("p"));
        let children: Vec<Index> = ["a", "b", "c"]
            .iter()
            .map(|id| tree.insert_node(paragraph(id)))
            .collect();
        for &c in &children {
            tree.append_child(parent, c);
        }

        tree.remove_child(parent, children[1]);

        assert_eq!(ids(&tree, parent), vec!["a", "c"]);
        assert_eq!(tree.get(children[0]).unwrap().next_sibling(), Some(children[2]));
        assert_eq!(tree.get(children[2]).unwrap().prev_sibling(), Some(children[0]));
    }

    #[test]
    fn given_only_child_when_removing_then_parent_empty() {
        let mut tree = BlockTree::new();
        let parent = tree.insert_node(paragraph("p"));
        let a = tree.insert_node(paragraph("a"));
        tree.append_child(parent, a);

        tree.remove_child(parent, a);

        let node = tree.get(parent).unwrap();
        assert_eq!(node.first_child(), None);
        assert_eq!(node.last_child(), None);
    }

    #[test]
    fn given_subtree_when_discarding_then_frees_all_nodes() {
        let mut tree = BlockTree::from_blocks(vec![
            paragraph("a").with_children(vec![paragraph("a1"), paragraph("a2")]),
            paragraph("b"),
        ]);
        let a = tree.find(&NodeId::new("a")).unwrap();
        let before = tree.len();

        let freed = tree.discard(a);

        assert_eq!(freed, 3);
        assert_eq!(tree.len(), before - 3);
        assert!(tree.node(a).is_none());
        assert!(tree.find(&NodeId::new("a1")).is_none());
        let root = tree.root_node().unwrap();
        assert_eq!(root.child_count(), 1);
        assert_eq!(root.first_child().unwrap().id(), &NodeId::new("b"));
    }

    #[test]
    fn given_stale_index_when_mutating_then_noop() {
        let mut tree = BlockTree::new();
        let parent = tree.insert_node(paragraph("p"));
        let gone = tree.insert_node(paragraph("gone"));
        tree.discard(gone);

        tree.append_child(parent, gone);
        tree.remove_child(parent, gone);

        assert_eq!(tree.node(parent).unwrap().child_count(), 0);
        assert_eq!(tree.discard(gone), 0);
    }

    #[test]
    fn given_tree_when_iterating_then_preorder_and_postorder() {
        let tree = BlockTree::from_blocks(vec![
            paragraph("a").with_children(vec![paragraph("a1")]),
            paragraph("b"),
        ]);

        let pre: Vec<String> = tree.iter().skip(1).map(|n| n.id().to_string()).collect();
        let post: Vec<String> = tree
            .iter_postorder()
            .map(|n| n.id().to_string())
            .collect();

        assert_eq!(pre, vec!["a", "a1", "b"]);
        assert_eq!(post[..3], ["a1", "a", "b"]);
        assert_eq!(post[3], crate::domain::ROOT_NODE_ID);
    }

    #[test]
    fn given_tree_when_measuring_then_depth_and_leaves() {
        let tree = BlockTree::from_blocks(vec![
            paragraph("a").with_children(vec![paragraph("a1")]),
            paragraph("b"),
        ]);

        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaves(), vec![NodeId::new("a1"), NodeId::new("b")]);
    }

    #[test]
    fn given_empty_tree_then_depth_zero_and_no_leaves() {
        let tree: BlockTree<Block> = BlockTree::new();
        assert_eq!(tree.depth(), 0);
        assert!(tree.leaves().is_empty());

        let built: BlockTree<Block> = BlockTree::from_blocks(Vec::new());
        assert_eq!(built.depth(), 1);
        assert!(built.leaves().is_empty());
    }
}
