//! Linking the two halves of every split
//!
//! For each internal node, the leaves under its left half are searched
//! against the leaves under its right half for a pair whose partition bounds
//! share an edge. The first such pair wins, scanning left leaves in the outer
//! loop and right leaves in the inner loop, both in left-to-right order. That
//! choice is arbitrary but fixed: corridor draws follow connection order, so
//! changing it changes every layout.
//!
//! A split whose halves have no adjacent leaf pair gets no connection; that
//! part of the map may end up unreachable. This is not treated as an error.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::partition::PartitionNode;
use super::rect::{Adjacency, Rect};

/// One side of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafRef {
    /// Id of the leaf's room
    pub room_id: usize,
    /// Partition bounds of the leaf
    pub bounds: Rect,
    /// Carved room rectangle
    pub room: Rect,
}

impl LeafRef {
    /// Reference a carved leaf; `None` if the leaf has no room yet.
    pub fn of(leaf: &PartitionNode) -> Option<Self> {
        leaf.room.map(|room| Self {
            room_id: room.id,
            bounds: leaf.bounds,
            room: room.rect,
        })
    }

    pub fn center(&self) -> (i32, i32) {
        self.room.center()
    }
}

/// A pair of edge-adjacent leaves, one from each half of a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Leaf from the left (or top) half
    pub left: LeafRef,
    /// Leaf from the right (or bottom) half
    pub right: LeafRef,
    /// Which edges of the bounds touch
    pub adjacency: Adjacency,
}

impl Connection {
    /// Room centres of both sides, for drawing link lines
    pub fn centers(&self) -> ((i32, i32), (i32, i32)) {
        (self.left.center(), self.right.center())
    }
}

/// First edge-adjacent `(left, right)` leaf pair across two subtrees.
pub fn find_link<'a>(
    left: &'a PartitionNode,
    right: &'a PartitionNode,
) -> Option<(&'a PartitionNode, &'a PartitionNode, Adjacency)> {
    let right_leaves = right.leaves();
    left.leaves().into_iter().find_map(|l| {
        right_leaves
            .iter()
            .find_map(|&r| l.bounds.adjacency(&r.bounds).map(|adj| (l, r, adj)))
    })
}

/// Connections of every internal node of a carved tree, in
/// [`internal_nodes`](PartitionNode::internal_nodes) order.
pub fn connect(tree: &PartitionNode) -> Vec<Connection> {
    tree.internal_nodes()
        .into_iter()
        .filter_map(|node| {
            let split = node.split()?;
            let Some((l, r, adjacency)) = find_link(&split.left, &split.right) else {
                debug!(bounds = ?node.bounds, depth = node.depth, "no adjacent leaves across split");
                return None;
            };
            Some(Connection {
                left: LeafRef::of(l)?,
                right: LeafRef::of(r)?,
                adjacency,
            })
        })
        .collect()
}
