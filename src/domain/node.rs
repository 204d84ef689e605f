//! Node capability: navigation over a block tree, independent of how nodes are stored

use crate::domain::NodeId;

/// Navigation surface of a tree node.
///
/// Every relation returns `None` when it does not exist. Walkers and printers are
/// written against this trait only.
pub trait Node: Sized {
    fn id(&self) -> &NodeId;

    fn node_type(&self) -> &str;

    fn parent(&self) -> Option<Self>;

    fn prev_sibling(&self) -> Option<Self>;

    fn next_sibling(&self) -> Option<Self>;

    fn first_child(&self) -> Option<Self>;

    fn last_child(&self) -> Option<Self>;

    /// Number of direct children, counted along the sibling chain.
    fn child_count(&self) -> usize {
        self.children().count()
    }

    /// Direct children in sibling order.
    fn children(&self) -> Siblings<Self> {
        Siblings {
            next: self.first_child(),
        }
    }

    /// This node and every sibling after it.
    fn following_siblings(self) -> Siblings<Self> {
        Siblings { next: Some(self) }
    }

    fn is_root(&self) -> bool {
        self.parent().is_none()
    }
}

/// Iterator along a `next_sibling` chain.
pub struct Siblings<N> {
    next: Option<N>,
}

impl<N: Node> Iterator for Siblings<N> {
    type Item = N;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.next_sibling();
        Some(current)
    }
}
