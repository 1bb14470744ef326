//! Balanced k-d tree over obstacle centers
//!
//! Nodes store no split axis: a node at depth `d` splits on axis `d % DIM`,
//! and the axis is threaded through every recursive call. The tree is never
//! edited after construction; when the obstacle set changes it is dropped and
//! rebuilt from scratch.

use crate::sim::obstacle::Obstacle;
use crate::{Point, distance, next_axis};

/// One node of a [`KdTree`], owning a copy of its obstacle and both subtrees
#[derive(Debug, Clone, PartialEq)]
pub struct KdNode {
    pub obstacle: Obstacle,
    pub left: Option<Box<KdNode>>,
    pub right: Option<Box<KdNode>>,
}

impl KdNode {
    fn leaf(obstacle: Obstacle) -> Self {
        Self {
            obstacle,
            left: None,
            right: None,
        }
    }

    pub fn left(&self) -> Option<&KdNode> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&KdNode> {
        self.right.as_deref()
    }
}

/// Spatial index over a snapshot of obstacles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KdTree {
    root: Option<Box<KdNode>>,
    /// Largest obstacle radius in the tree, 0.0 when empty
    max_radius: f64,
}

impl KdTree {
    /// The empty tree
    pub fn empty() -> Self {
        Self {
            root: None,
            max_radius: 0.0,
        }
    }

    /// Build a balanced tree from `obstacles`, starting on axis 0.
    ///
    /// Partitioning sorts a private copy, so the caller's order is untouched.
    pub fn build(obstacles: &[Obstacle]) -> Self {
        let mut scratch = obstacles.to_vec();
        let max_radius = obstacles.iter().map(|o| o.radius).fold(0.0, f64::max);
        Self {
            root: build_node(&mut scratch, 0),
            max_radius,
        }
    }

    /// Free every node. Children are released before their parent.
    pub fn clear(&mut self) {
        self.root = None;
        self.max_radius = 0.0;
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    pub fn root(&self) -> Option<&KdNode> {
        self.root.as_deref()
    }

    /// Number of nodes (one per indexed obstacle)
    pub fn len(&self) -> usize {
        fn count(node: Option<&KdNode>) -> usize {
            node.map_or(0, |n| 1 + count(n.left()) + count(n.right()))
        }
        count(self.root())
    }

    /// Number of levels; 0 for the empty tree
    pub fn depth(&self) -> usize {
        fn levels(node: Option<&KdNode>) -> usize {
            node.map_or(0, |n| 1 + levels(n.left()).max(levels(n.right())))
        }
        levels(self.root())
    }

    /// Copies of all indexed obstacles in pre-order
    pub fn obstacles(&self) -> Vec<Obstacle> {
        fn collect(node: Option<&KdNode>, out: &mut Vec<Obstacle>) {
            if let Some(n) = node {
                out.push(n.obstacle);
                collect(n.left(), out);
                collect(n.right(), out);
            }
        }
        let mut out = Vec::new();
        collect(self.root(), &mut out);
        out
    }

    /// All obstacles whose center lies strictly within `radius` of `point`,
    /// in traversal order
    pub fn range_query(&self, point: Point, radius: f64) -> Vec<Obstacle> {
        let mut out = Vec::new();
        self.range_query_into(point, radius, &mut out);
        out
    }

    /// Append matches of a ball query to `out`.
    ///
    /// Returns the number of distance evaluations performed.
    pub fn range_query_into(&self, point: Point, radius: f64, out: &mut Vec<Obstacle>) -> usize {
        query_node(self.root(), point, radius, 0, out)
    }

    /// Splitting lines of every node clipped to its cell, in pre-order.
    ///
    /// `lower` and `upper` are opposite corners of the root cell.
    pub fn partition_segments(&self, lower: Point, upper: Point) -> Vec<(Point, Point)> {
        let mut out = Vec::with_capacity(self.len());
        segments_node(self.root(), lower, upper, 0, &mut out);
        out
    }
}

fn build_node(obstacles: &mut [Obstacle], axis: usize) -> Option<Box<KdNode>> {
    match obstacles.len() {
        0 => None,
        1 => Some(Box::new(KdNode::leaf(obstacles[0]))),
        n => {
            // Stable sort keeps equal keys in input order, so rebuilds are repeatable
            obstacles.sort_by(|a, b| a.center[axis].total_cmp(&b.center[axis]));
            let m = (n - 1) / 2;
            let (left, rest) = obstacles.split_at_mut(m);
            let (median, right) = rest.split_at_mut(1);
            let next = next_axis(axis);
            Some(Box::new(KdNode {
                obstacle: median[0],
                left: build_node(left, next),
                right: build_node(right, next),
            }))
        }
    }
}

fn query_node(
    node: Option<&KdNode>,
    point: Point,
    radius: f64,
    axis: usize,
    out: &mut Vec<Obstacle>,
) -> usize {
    let Some(node) = node else {
        return 0;
    };

    let center = node.obstacle.center;
    let mut tests = 1;
    if distance(point, center) < radius {
        out.push(node.obstacle);
    }

    let next = next_axis(axis);
    if point[axis] <= center[axis] + radius {
        tests += query_node(node.left(), point, radius, next, out);
    }
    if point[axis] >= center[axis] - radius {
        tests += query_node(node.right(), point, radius, next, out);
    }
    tests
}

fn segments_node(
    node: Option<&KdNode>,
    lower: Point,
    upper: Point,
    axis: usize,
    out: &mut Vec<(Point, Point)>,
) {
    let Some(node) = node else {
        return;
    };

    let next = next_axis(axis);
    let split = node.obstacle.center[axis];

    let mut from = Point::ZERO;
    from[axis] = split;
    from[next] = lower[next];
    let mut to = Point::ZERO;
    to[axis] = split;
    to[next] = upper[next];
    out.push((from, to));

    let mut left_upper = upper;
    left_upper[axis] = split;
    let mut right_lower = lower;
    right_lower[axis] = split;

    segments_node(node.left(), lower, left_upper, next, out);
    segments_node(node.right(), right_lower, upper, next, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::{Color, ObstacleStore};
    use proptest::prelude::*;

    fn at(x: f64, y: f64) -> Obstacle {
        Obstacle::new(Point::new(x, y), 0.05, 1.0, Color::BLACK)
    }

    fn key(o: &Obstacle) -> (u64, u64) {
        (o.center.x.to_bits(), o.center.y.to_bits())
    }

    fn sorted_keys(obstacles: &[Obstacle]) -> Vec<(u64, u64)> {
        let mut keys: Vec<_> = obstacles.iter().map(key).collect();
        keys.sort_unstable();
        keys
    }

    /// Check the separating hyperplane property below `node`, returning the
    /// centers of the whole subtree.
    fn check_invariant(node: Option<&KdNode>, axis: usize) -> Vec<Point> {
        let Some(n) = node else {
            return Vec::new();
        };
        let split = n.obstacle.center[axis];
        let left = check_invariant(n.left(), next_axis(axis));
        let right = check_invariant(n.right(), next_axis(axis));
        for p in &left {
            assert!(p[axis] <= split, "left {p:?} exceeds split {split} on axis {axis}");
        }
        for p in &right {
            assert!(p[axis] >= split, "right {p:?} below split {split} on axis {axis}");
        }
        let mut all = left;
        all.push(n.obstacle.center);
        all.extend(right);
        all
    }

    fn brute_force(obstacles: &[Obstacle], point: Point, radius: f64) -> Vec<Obstacle> {
        obstacles
            .iter()
            .filter(|o| distance(point, o.center) < radius)
            .copied()
            .collect()
    }

    #[test]
    fn test_empty_build_and_query() {
        let tree = KdTree::build(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.depth(), 0);
        let mut out = Vec::new();
        assert_eq!(tree.range_query_into(Point::ZERO, 10.0, &mut out), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_single_obstacle() {
        let tree = KdTree::build(&[at(0.2, 0.3)]);
        let root = tree.root().expect("root");
        assert_eq!(root.obstacle.center, Point::new(0.2, 0.3));
        assert!(root.left.is_none() && root.right.is_none());
    }

    #[test]
    fn test_median_is_floor_of_midpoint() {
        // Four points on x: sorted indices 0..3, median floor(3/2) = 1
        let tree = KdTree::build(&[at(3.0, 0.0), at(0.0, 0.0), at(2.0, 0.0), at(1.0, 0.0)]);
        let root = tree.root().expect("root");
        assert_eq!(root.obstacle.center.x, 1.0);
        assert_eq!(root.left().expect("left").obstacle.center.x, 0.0);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_second_level_splits_on_y() {
        let tree = KdTree::build(&[
            at(0.0, 5.0),
            at(1.0, 0.0),
            at(2.0, 0.0),
            at(3.0, 9.0),
            at(4.0, 1.0),
        ]);
        let root = tree.root().expect("root");
        assert_eq!(root.obstacle.center.x, 2.0);
        // Right half {(3,9), (4,1)} sorted on y -> median (4,1), (3,9) on the right.
        let right = root.right().expect("right");
        assert_eq!(right.obstacle.center, Point::new(4.0, 1.0));
        assert_eq!(right.right().expect("rr").obstacle.center, Point::new(3.0, 9.0));
        check_invariant(tree.root(), 0);
    }

    #[test]
    fn test_ties_satisfy_invariant() {
        let obstacles: Vec<_> = (0..9).map(|i| at(0.5, (i % 3) as f64)).collect();
        let tree = KdTree::build(&obstacles);
        let all = check_invariant(tree.root(), 0);
        assert_eq!(all.len(), 9);
    }

    #[test]
    fn test_build_leaves_store_order() {
        let mut store = ObstacleStore::new();
        for (x, y) in [(0.9, 0.1), (-0.4, 0.3), (0.2, -0.8), (-0.1, 0.0)] {
            store.insert(at(x, y));
        }
        let before = store.as_slice().to_vec();
        let _tree = KdTree::build(store.as_slice());
        assert_eq!(store.as_slice(), before.as_slice());
    }

    #[test]
    fn test_tree_is_snapshot_of_store() {
        let mut store = ObstacleStore::new();
        store.insert(at(0.0, 0.0));
        let tree = KdTree::build(store.as_slice());
        store.get_mut(0).center = Point::new(5.0, 5.0);
        assert_eq!(tree.root().expect("root").obstacle.center, Point::ZERO);
    }

    #[test]
    fn test_max_radius_tracks_largest_obstacle() {
        let mut big = at(0.3, 0.3);
        big.radius = 0.2;
        let tree = KdTree::build(&[at(0.0, 0.0), big, at(-0.4, 0.1)]);
        assert_eq!(tree.max_radius(), 0.2);
        assert_eq!(KdTree::build(&[]).max_radius(), 0.0);
    }

    #[test]
    fn test_query_uses_strict_distance() {
        let tree = KdTree::build(&[at(0.5, 0.0)]);
        assert!(tree.range_query(Point::ZERO, 0.5).is_empty());
        assert_eq!(tree.range_query(Point::ZERO, 0.500001).len(), 1);
    }

    #[test]
    fn test_query_prunes_far_subtrees() {
        let obstacles: Vec<_> = (0..64)
            .map(|i| at((i % 8) as f64, (i / 8) as f64))
            .collect();
        let tree = KdTree::build(&obstacles);
        let mut out = Vec::new();
        let tests = tree.range_query_into(Point::new(0.0, 0.0), 0.5, &mut out);
        assert_eq!(out.len(), 1);
        assert!(tests < obstacles.len(), "visited {tests} nodes");
    }

    #[test]
    fn test_clear_empties_tree() {
        let mut tree = KdTree::build(&[at(0.0, 0.0), at(1.0, 1.0)]);
        assert_eq!(tree.len(), 2);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.max_radius(), 0.0);
        assert!(tree.range_query(Point::ZERO, 5.0).is_empty());
    }

    #[test]
    fn test_partition_segments_clip_to_cells() {
        let tree = KdTree::build(&[at(0.0, 0.0), at(0.5, 0.5), at(-0.5, -0.25)]);
        let segs = tree.partition_segments(Point::splat(-1.0), Point::splat(1.0));
        assert_eq!(segs.len(), 3);
        // Root splits on x at 0.0 across the full height
        assert_eq!(segs[0], (Point::new(0.0, -1.0), Point::new(0.0, 1.0)));
        // Left child splits on y within x in [-1, 0]
        assert_eq!(segs[1], (Point::new(-1.0, -0.25), Point::new(0.0, -0.25)));
        // Right child splits on y within x in [0, 1]
        assert_eq!(segs[2], (Point::new(0.0, 0.5), Point::new(1.0, 0.5)));
    }

    fn obstacle_set() -> impl Strategy<Value = Vec<Obstacle>> {
        prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 0..80)
            .prop_map(|pts| pts.into_iter().map(|(x, y)| at(x, y)).collect())
    }

    proptest! {
        #[test]
        fn prop_build_preserves_multiset(obstacles in obstacle_set()) {
            let tree = KdTree::build(&obstacles);
            prop_assert_eq!(tree.len(), obstacles.len());
            prop_assert_eq!(sorted_keys(&tree.obstacles()), sorted_keys(&obstacles));
        }

        #[test]
        fn prop_separating_hyperplane(obstacles in obstacle_set()) {
            let tree = KdTree::build(&obstacles);
            let all = check_invariant(tree.root(), 0);
            prop_assert_eq!(all.len(), obstacles.len());
        }

        #[test]
        fn prop_query_matches_brute_force(
            obstacles in obstacle_set(),
            qx in -1.2f64..1.2,
            qy in -1.2f64..1.2,
            radius in 0.0f64..0.8,
        ) {
            let tree = KdTree::build(&obstacles);
            let point = Point::new(qx, qy);
            let found = tree.range_query(point, radius);
            for o in &found {
                prop_assert!(distance(point, o.center) < radius);
            }
            prop_assert_eq!(
                sorted_keys(&found),
                sorted_keys(&brute_force(&obstacles, point, radius))
            );
        }

        #[test]
        fn prop_rebuild_is_deterministic(obstacles in obstacle_set()) {
            prop_assert_eq!(KdTree::build(&obstacles), KdTree::build(&obstacles));
        }
    }
}
