//! Depth-first traversal and text dumps over any [`Node`] implementation

use std::fmt::Write;
use std::ops::ControlFlow;

use crate::domain::node::Node;

/// Visit `node`, then every descendant, pre-order in sibling order.
pub fn walk<N: Node>(node: &N, visit: &mut impl FnMut(&N)) {
    visit(node);
    for child in node.children() {
        walk(&child, visit);
    }
}

/// Pre-order walk that stops as soon as `visit` breaks.
///
/// Returns the break value, or `Continue(())` once every node has been visited.
pub fn try_walk<N: Node, T>(
    node: &N,
    visit: &mut impl FnMut(&N) -> ControlFlow<T>,
) -> ControlFlow<T> {
    visit(node)?;
    for child in node.children() {
        try_walk(&child, visit)?;
    }
    ControlFlow::Continue(())
}

/// One line per node, `<indent>- [id] type`, two spaces of indent per level.
pub fn render_tree<N: Node>(node: &N, depth: usize) -> String {
    let mut out = String::new();
    walk_depth(node, depth, &mut |n, level| {
        // writing into a String cannot fail
        let _ = writeln!(out, "{}- [{}] {}", indent(level), n.id(), n.node_type());
    });
    out
}

/// Print [`render_tree`] to stdout.
pub fn print_tree<N: Node>(node: &N, depth: usize) {
    print!("{}", render_tree(node, depth));
}

fn walk_depth<N: Node>(node: &N, depth: usize, visit: &mut impl FnMut(&N, usize)) {
    visit(node, depth);
    for child in node.children() {
        walk_depth(&child, depth + 1, visit);
    }
}

fn indent(level: usize) -> String {
    format!(" {}", "  ".repeat(level))
}
