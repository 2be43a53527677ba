//! Binary space partition of the map
//!
//! The map rectangle is subdivided with an explicit stack. Each popped region
//! is either left as a leaf or cut in two, and both halves are pushed back for
//! the same treatment. A region stays whole when:
//! - both sides are below `2 * min_room_size`, or
//! - its smaller side is below [`HARD_FLOOR`], or
//! - the split draw fails and the region is at least `min_depth` deep.
//!
//! Cuts land near the middle, jittered so that both halves keep at least
//! `min_room_size` cells along the cut axis.

use bsp_rng::Mwc;
use tracing::trace;

use crate::config::GenerationConfig;
use crate::consts::{
    ASPECT_LIMIT, ASPECT_SPLIT_BOOST, BIAS_HORIZONTAL, BIAS_VERTICAL, HARD_FLOOR,
};

use super::rect::{Axis, Rect};
use super::room::Room;

/// A region of the partition tree
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionNode {
    /// Region covered by this node
    pub bounds: Rect,
    /// Distance from the root (root = 0)
    pub depth: u32,
    /// Room carved inside a leaf; always `None` on internal nodes
    pub room: Option<Room>,
    children: Option<Box<Split>>,
}

/// The two halves of a divided region
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    /// Axis whose extent was divided: `Horizontal` (a vertical cut line)
    /// gives a left/right pair, `Vertical` (a horizontal cut line) a
    /// top/bottom pair
    pub divided_axis: Axis,
    /// Left or top half
    pub left: PartitionNode,
    /// Right or bottom half
    pub right: PartitionNode,
}

impl PartitionNode {
    /// Create a leaf covering `bounds`
    pub fn leaf(bounds: Rect, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            room: None,
            children: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// The split below this node, if any
    pub fn split(&self) -> Option<&Split> {
        self.children.as_deref()
    }

    /// Divide this leaf along `axis`, `offset` cells from its start.
    ///
    /// Returns the new halves. Does nothing and returns `None` if the node
    /// already has children.
    pub fn divide(&mut self, axis: Axis, offset: i32) -> Option<&mut Split> {
        if self.children.is_some() {
            return None;
        }
        let (a, b) = self.bounds.split_at(axis, offset);
        let depth = self.depth + 1;
        let split = self.children.insert(Box::new(Split {
            divided_axis: axis,
            left: PartitionNode::leaf(a, depth),
            right: PartitionNode::leaf(b, depth),
        }));
        Some(split)
    }

    /// Leaves of this subtree, left to right (top to bottom).
    pub fn leaves(&self) -> Vec<&PartitionNode> {
        let mut leaves = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node.split() {
                Some(split) => {
                    stack.push(&split.right);
                    stack.push(&split.left);
                }
                None => leaves.push(node),
            }
        }
        leaves
    }

    /// Mutable leaves of this subtree, in the same order as [`leaves`](Self::leaves).
    pub fn leaves_mut(&mut self) -> Vec<&mut PartitionNode> {
        let mut leaves = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.is_leaf() {
                leaves.push(node);
                continue;
            }
            if let Some(split) = node.children.as_deref_mut() {
                let Split { left, right, .. } = split;
                stack.push(right);
                stack.push(left);
            }
        }
        leaves
    }

    /// Nodes with children: root first, right subtrees before left ones.
    pub fn internal_nodes(&self) -> Vec<&PartitionNode> {
        let mut nodes = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(split) = node.split() {
                nodes.push(node);
                stack.push(&split.left);
                stack.push(&split.right);
            }
        }
        nodes
    }

    /// Bounds of every node in the subtree, parents before children.
    /// Meant for debug overlays.
    pub fn regions(&self) -> Vec<Rect> {
        let mut regions = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            regions.push(node.bounds);
            if let Some(split) = node.split() {
                stack.push(&split.right);
                stack.push(&split.left);
            }
        }
        regions
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Depth of the deepest leaf
    pub fn max_depth(&self) -> u32 {
        self.leaves()
            .iter()
            .map(|leaf| leaf.depth)
            .max()
            .unwrap_or(self.depth)
    }
}

/// `2 * n`, widened so huge sizes cannot overflow
fn twice(n: i32) -> i64 {
    2 * i64::from(n)
}

/// `a` is more than [`ASPECT_LIMIT`] times `b`
fn stretched(a: i32, b: i32) -> bool {
    f64::from(a) > ASPECT_LIMIT * f64::from(b)
}

/// Split probability for a `w` x `h` region; stretched regions are favoured.
pub fn effective_split_chance(w: i32, h: i32, base: f64) -> f64 {
    if stretched(w, h) || stretched(h, w) {
        base * ASPECT_SPLIT_BOOST
    } else {
        base
    }
}

/// Axis bias for a `w` x `h` region: above 0.5 means cut vertically
/// (left/right halves), otherwise horizontally.
///
/// Draws from `rng` only when neither shape rule decides.
pub fn split_bias(w: i32, h: i32, min_room_size: i32, rng: &mut Mwc) -> f64 {
    let twice = twice(min_room_size);
    if f64::from(w) >= ASPECT_LIMIT * f64::from(h) || i64::from(h) < twice {
        BIAS_VERTICAL
    } else if stretched(h, w) || i64::from(w) < twice {
        BIAS_HORIZONTAL
    } else {
        rng.next()
    }
}

/// Offset of the cut along a side of length `side`: the midpoint plus a
/// jitter of at most `(side - 2 * min_room_size) / 2` either way.
pub fn split_offset(side: i32, min_room_size: i32, rng: &mut Mwc) -> i32 {
    let slack = (i64::from(side) - twice(min_room_size)) as f64;
    let jitter = ((rng.next() * 2.0 - 1.0) * slack / 2.0) as i32;
    side / 2 + jitter
}

/// Decide whether `node` is divided, and which axis's extent is cut.
fn choose_split(node: &PartitionNode, config: &GenerationConfig, rng: &mut Mwc) -> Option<Axis> {
    let Rect { width: w, height: h, .. } = node.bounds;
    let twice = twice(config.min_room_size);

    if i64::from(w) < twice && i64::from(h) < twice {
        return None;
    }
    if w.min(h) < HARD_FLOOR {
        return None;
    }

    let chance = effective_split_chance(w, h, config.split_chance);
    let drawn = rng.chance(chance);
    if !drawn && node.depth >= config.min_depth {
        return None;
    }

    let vertical_cut = split_bias(w, h, config.min_room_size, rng) > 0.5;
    if vertical_cut {
        // Left/right halves: the width is divided
        Some(Axis::Horizontal)
    } else {
        Some(Axis::Vertical)
    }
}

/// Build the partition tree for `bounds`.
///
/// Nodes are processed last-in first-out with the right half pushed last,
/// so right subtrees are settled before left ones; the draw order (and so
/// the layout for a given seed) depends on it.
pub fn build_tree(bounds: Rect, config: &GenerationConfig, rng: &mut Mwc) -> PartitionNode {
    let mut root = PartitionNode::leaf(bounds, 0);
    let mut stack = vec![&mut root];

    while let Some(node) = stack.pop() {
        let Some(divided_axis) = choose_split(node, config, rng) else {
            continue;
        };
        let offset = split_offset(node.bounds.extent(divided_axis), config.min_room_size, rng);
        trace!(bounds = ?node.bounds, depth = node.depth, %divided_axis, offset, "split region");

        if let Some(split) = node.divide(divided_axis, offset) {
            let Split { left, right, .. } = split;
            stack.push(left);
            stack.push(right);
        }
    }

    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config(min_room_size: i32, min_depth: u32, split_chance: f64) -> GenerationConfig {
        GenerationConfig::new(40, 30, min_room_size, min_depth, split_chance)
    }

    #[test]
    fn test_small_region_never_split() {
        let mut rng = Mwc::new(1);
        let tree = build_tree(Rect::new(0, 0, 11, 11), &config(6, 10, 1.0), &mut rng);
        assert!(tree.is_leaf());
        // The size rule decides before any draw
        assert_eq!(rng.call_count(), 0);
    }

    #[test]
    fn test_hard_floor_stops_thin_regions() {
        let mut rng = Mwc::new(1);
        let tree = build_tree(Rect::new(0, 0, 200, 4), &config(5, 10, 1.0), &mut rng);
        assert!(tree.is_leaf());
        assert_eq!(rng.call_count(), 0);
    }

    #[test]
    fn test_zero_chance_at_min_depth_zero_stays_whole() {
        let mut rng = Mwc::new(1);
        let tree = build_tree(Rect::new(0, 0, 40, 30), &config(6, 0, 0.0), &mut rng);
        assert!(tree.is_leaf());
        // The split draw is consumed even though it cannot succeed
        assert_eq!(rng.call_count(), 1);
    }

    #[test]
    fn test_min_depth_forces_splits() {
        let mut rng = Mwc::new(3);
        let tree = build_tree(Rect::new(0, 0, 200, 200), &config(6, 3, 0.0), &mut rng);
        // Every leaf reached depth 3: the zero chance stops splitting right there
        for leaf in tree.leaves() {
            assert_eq!(leaf.depth, 3);
        }
        assert_eq!(tree.leaf_count(), 8);
    }

    #[test]
    fn test_example_tree_shape() {
        let mut rng = Mwc::new(1);
        let tree = build_tree(Rect::new(0, 0, 40, 30), &config(6, 2, 1.0), &mut rng);
        let leaves = tree.leaves();
        assert_eq!(leaves.len(), 19);
        assert_eq!(leaves[0].bounds, Rect::new(0, 0, 6, 9));
        assert_eq!(leaves[18].bounds, Rect::new(30, 22, 10, 8));
        assert_eq!(rng.call_count(), 43);
    }

    #[test]
    fn test_split_bias_shape_rules() {
        let mut rng = Mwc::new(1);
        // Wide region: vertical cut, no draw
        assert_eq!(split_bias(50, 20, 6, &mut rng), BIAS_VERTICAL);
        // Too short to cut horizontally
        assert_eq!(split_bias(20, 11, 6, &mut rng), BIAS_VERTICAL);
        // Tall region
        assert_eq!(split_bias(20, 51, 6, &mut rng), BIAS_HORIZONTAL);
        // Too narrow to cut vertically
        assert_eq!(split_bias(11, 20, 6, &mut rng), BIAS_HORIZONTAL);
        assert_eq!(rng.call_count(), 0);

        // Square-ish: random
        let bias = split_bias(30, 30, 6, &mut rng);
        assert!((0.0..1.0).contains(&bias));
        assert_eq!(rng.call_count(), 1);
    }

    #[test]
    fn test_vertical_cut_gives_left_right_halves() {
        let mut rng = Mwc::new(5);
        let tree = build_tree(Rect::new(0, 0, 60, 20), &config(6, 1, 0.0), &mut rng);
        let split = tree.split().unwrap();
        assert_eq!(split.divided_axis, Axis::Horizontal);
        assert_eq!(split.left.bounds.height, 20);
        assert_eq!(split.right.bounds.x, split.left.bounds.width);

        let mut rng = Mwc::new(5);
        let tree = build_tree(Rect::new(0, 0, 20, 60), &config(6, 1, 0.0), &mut rng);
        let split = tree.split().unwrap();
        assert_eq!(split.divided_axis, Axis::Vertical);
        assert_eq!(split.left.bounds.width, 20);
        assert_eq!(split.right.bounds.y, split.left.bounds.height);
    }

    #[test]
    fn test_huge_room_size_stops_without_overflow() {
        let mut rng = Mwc::new(1);
        let tree = build_tree(Rect::new(0, 0, 40, 30), &config(i32::MAX, 4, 1.0), &mut rng);
        assert!(tree.is_leaf());
        assert_eq!(rng.call_count(), 0);

        assert_eq!(split_bias(50, 20, i32::MAX, &mut rng), BIAS_VERTICAL);
        assert_eq!(split_bias(20, 20, i32::MAX, &mut rng), BIAS_VERTICAL);
        let offset = split_offset(40, i32::MAX, &mut rng);
        assert!(offset.abs() < i32::MAX);
    }

    #[test]
    fn test_effective_split_chance() {
        assert_eq!(effective_split_chance(30, 30, 0.5), 0.5);
        assert!((effective_split_chance(100, 30, 0.5) - 0.85).abs() < 1e-12);
        assert!((effective_split_chance(30, 100, 0.5) - 0.85).abs() < 1e-12);
        // Exactly 2.5x is not stretched for the chance rule
        assert_eq!(effective_split_chance(25, 10, 0.5), 0.5);
    }

    #[test]
    fn test_divide_only_once() {
        let mut node = PartitionNode::leaf(Rect::new(0, 0, 20, 10), 0);
        assert!(node.divide(Axis::Horizontal, 8).is_some());
        assert!(node.divide(Axis::Vertical, 3).is_none());

        let split = node.split().unwrap();
        assert_eq!(split.left.bounds, Rect::new(0, 0, 8, 10));
        assert_eq!(split.right.bounds, Rect::new(8, 0, 12, 10));
        assert_eq!(split.left.depth, 1);
    }

    #[test]
    fn test_leaves_order_and_regions() {
        let mut root = PartitionNode::leaf(Rect::new(0, 0, 20, 20), 0);
        if let Some(split) = root.divide(Axis::Horizontal, 10) {
            split.right.divide(Axis::Vertical, 10);
        }
        let leaves: Vec<_> = root.leaves().iter().map(|l| l.bounds).collect();
        assert_eq!(
            leaves,
            vec![
                Rect::new(0, 0, 10, 20),
                Rect::new(10, 0, 10, 10),
                Rect::new(10, 10, 10, 10),
            ]
        );
        assert_eq!(root.regions().len(), 5);
        let internal: Vec<_> = root.internal_nodes().iter().map(|n| n.bounds).collect();
        assert_eq!(internal, vec![Rect::new(0, 0, 20, 20), Rect::new(10, 0, 10, 20)]);
        assert_eq!(root.regions()[0], Rect::new(0, 0, 20, 20));
        assert_eq!(root.max_depth(), 2);

        let ids: Vec<_> = root.leaves_mut().iter().map(|l| l.bounds).collect();
        assert_eq!(ids, leaves);
    }

    proptest! {
        #[test]
        fn prop_split_offset_keeps_min_extent(seed in any::<u32>(), min in 5i32..15, extra in 0i32..200) {
            let side = 2 * min + extra;
            let mut rng = Mwc::new(seed);
            let offset = split_offset(side, min, &mut rng);
            prop_assert!(offset >= min, "left half {offset} < {min}");
            prop_assert!(side - offset >= min, "right half {} < {min}", side - offset);
        }

        #[test]
        fn prop_children_tile_parent(seed in any::<u32>(), w in 12i32..160, h in 12i32..120) {
            let mut rng = Mwc::new(seed);
            let tree = build_tree(Rect::new(0, 0, w, h), &GenerationConfig::new(w, h, 6, 2, 0.5), &mut rng);
            let mut stack = vec![&tree];
            while let Some(node) = stack.pop() {
                if let Some(split) = node.split() {
                    let (a, b) = (split.left.bounds, split.right.bounds);
                    prop_assert!(a.is_valid() && b.is_valid());
                    prop_assert_eq!(a.area() + b.area(), node.bounds.area());
                    prop_assert!(a.adjacency(&b).is_some());
                    prop_assert!(a.extent(split.divided_axis) >= 6 && b.extent(split.divided_axis) >= 6);
                    prop_assert_eq!(split.left.depth, node.depth + 1);
                    stack.push(&split.left);
                    stack.push(&split.right);
                }
            }
        }
    }
}
