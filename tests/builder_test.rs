//! Tests for building block trees from block lists and flattening them back

use rstest::rstest;

use blocktree::domain::{build_tree, flatten, Block, BlockTree, BlockType, Node, NodeId, NodeRef};
use blocktree::util::testing;

fn block(block_type: BlockType, id: &str) -> Block {
    Block::new(block_type).with_id(id)
}

fn paragraph_with_two_children() -> Vec<Block> {
    vec![block(BlockType::Paragraph, "paragraph-id").with_children(vec![
        block(BlockType::Paragraph, "child1-id"),
        block(BlockType::Paragraph, "child2-id"),
    ])]
}

fn nested_document() -> Vec<Block> {
    vec![
        block(BlockType::Heading1, "h1"),
        block(BlockType::Toggle, "toggle").with_children(vec![
            block(BlockType::Paragraph, "t1"),
            block(BlockType::BulletedListItem, "t2").with_children(vec![
                block(BlockType::ToDo, "t2-a"),
                block(BlockType::ToDo, "t2-b"),
                block(BlockType::ToDo, "t2-c"),
            ]),
        ]),
        block(BlockType::Divider, "div"),
        Block::new(BlockType::Paragraph),
    ]
}

fn ids<'a>(nodes: impl Iterator<Item = NodeRef<'a, Block>>) -> Vec<String> {
    nodes.map(|n| n.id().to_string()).collect()
}

#[test]
fn given_paragraph_with_two_children_when_building_then_links_match() {
    testing::init_test_setup();
    // Arrange
    let blocks = paragraph_with_two_children();

    // Act
    let tree = BlockTree::from_blocks(blocks.clone());

    // Assert
    let root = tree.root_node().unwrap();
    assert_eq!(root.child_count(), 1);
    let paragraph = root.first_child().unwrap();
    assert_eq!(paragraph.id(), &NodeId::new("paragraph-id"));
    assert_eq!(paragraph.parent().unwrap(), root);

    let child1 = paragraph.first_child().unwrap();
    let child2 = paragraph.last_child().unwrap();
    assert_eq!(child1.id(), &NodeId::new("child1-id"));
    assert_eq!(child2.id(), &NodeId::new("child2-id"));
    assert_eq!(child1.next_sibling().unwrap(), child2);
    assert_eq!(child2.prev_sibling().unwrap(), child1);
    assert!(child1.prev_sibling().is_none());
    assert!(child2.next_sibling().is_none());
    assert_eq!(child1.parent().unwrap(), paragraph);
    assert_eq!(child2.parent().unwrap(), paragraph);

    assert_eq!(flatten(&tree, root.index()), blocks);
}

#[test]
fn given_empty_list_when_flattening_then_empty() {
    let mut tree: BlockTree<Block> = BlockTree::new();

    let root = build_tree(&mut tree, Vec::new(), None);

    assert!(flatten(&tree, root).is_empty());
    assert!(tree.to_blocks().is_empty());
}

#[rstest]
#[case::single_leaf(vec![block(BlockType::Paragraph, "p")])]
#[case::paragraph_with_children(paragraph_with_two_children())]
#[case::nested_document(nested_document())]
#[case::unpersisted_blocks(vec![
    Block::new(BlockType::Quote).with_children(vec![Block::new(BlockType::Paragraph)]),
    Block::new(BlockType::Divider),
])]
fn given_block_list_when_building_and_flattening_then_restored(#[case] blocks: Vec<Block>) {
    let tree = BlockTree::from_blocks(blocks.clone());

    assert_eq!(tree.to_blocks(), blocks);
    assert_eq!(tree.into_blocks(), blocks);
}

#[test]
fn given_nested_document_when_building_then_siblings_follow_input_order() {
    let tree = BlockTree::from_blocks(nested_document());
    let root = tree.root_node().unwrap();

    let top: Vec<String> = ids(root.children());
    assert_eq!(top[..3], ["h1", "toggle", "div"]);
    assert!(NodeId::new(&top[3]).is_temporary());

    let list_item = tree.node(tree.find(&NodeId::new("t2")).unwrap()).unwrap();
    assert_eq!(ids(list_item.children()), vec!["t2-a", "t2-b", "t2-c"]);
}

#[test]
fn given_nested_document_then_child_counts_agree_in_both_directions() {
    let tree = BlockTree::from_blocks(nested_document());

    for node in tree.iter() {
        let forward = node.child_count();
        let mut backward = 0;
        let mut cursor = node.last_child();
        while let Some(child) = cursor {
            backward += 1;
            cursor = child.prev_sibling();
        }
        assert_eq!(forward, backward, "node {}", node.id());
        assert_eq!(node.first_child().is_none(), node.last_child().is_none());
    }
}

#[test]
fn given_nested_document_then_links_are_symmetric() {
    let tree = BlockTree::from_blocks(nested_document());

    for node in tree.iter() {
        if let Some(next) = node.next_sibling() {
            assert_eq!(next.prev_sibling().unwrap(), node);
        }
        if let Some(prev) = node.prev_sibling() {
            assert_eq!(prev.next_sibling().unwrap(), node);
        }
        for child in node.children() {
            assert_eq!(child.parent().unwrap(), node);
        }
        if let Some(parent) = node.parent() {
            assert!(parent.children().any(|c| c == node));
        }
    }
}

#[test]
fn given_explicit_parent_when_building_then_subtree_attached_below_it() {
    // Arrange
    let mut tree = BlockTree::from_blocks(paragraph_with_two_children());
    let child2 = tree.find(&NodeId::new("child2-id")).unwrap();

    // Act
    build_tree(
        &mut tree,
        vec![block(BlockType::Paragraph, "late").with_children(vec![block(BlockType::Code, "c")])],
        Some(child2),
    );

    // Assert
    let node = tree.node(child2).unwrap();
    assert_eq!(ids(node.children()), vec!["late"]);
    assert_eq!(node.first_child().unwrap().first_child().unwrap().id(), &NodeId::new("c"));
    assert_eq!(tree.root().unwrap(), tree.root_node().unwrap().index());
    assert!(tree.to_blocks()[0].children[1].has_children);
}

#[test]
fn given_subtree_when_flattening_from_first_child_then_emits_all_siblings() {
    let tree = BlockTree::from_blocks(nested_document());
    let t1 = tree.find(&NodeId::new("t1")).unwrap();

    let blocks = flatten(&tree, t1);

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].id, "t1");
    assert_eq!(blocks[1].id, "t2");
    assert_eq!(blocks[1].children.len(), 3);
}
