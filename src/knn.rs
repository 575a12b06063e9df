//! A k-d tree nearest-neighbor index over 3D coordinates.
//!
//! The tree is built by recursive median partitioning, and searched with the usual k-d pruning
//! rule: always descend into the half-space containing the query point first, then only descend
//! the other half if it could still hold a point closer than the current k-th best. The shape of
//! both routines follows a generic k-d tree/best-set split seen elsewhere in the example pack;
//! this version specializes it to `f64` triples, which is all [PointCloud](crate::PointCloud)
//! coordinates ever are.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

type Position = [f64; 3];

#[derive(Clone, Copy, Debug, PartialEq)]
struct Neighbor {
    distance: f64,
    index: usize,
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor {
    // Orders by distance first, so a max-heap of `Neighbor` pops the farthest point; ties break
    // by index, so the heap pops the higher index first and the lower one survives.
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
            .then(self.index.cmp(&other.index))
    }
}

fn distance(a: &Position, b: &Position) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// A k-d tree over 3D coordinates, supporting k-nearest-neighbor queries.
///
/// # Examples
///
/// ```
/// use lidar_cloud::knn::KdTree;
///
/// let positions = vec![[0., 0., 0.], [1., 0., 0.], [5., 0., 0.]];
/// let tree = KdTree::new(&positions);
/// let nearest = tree.k_nearest_excluding(0, &positions[0], 1);
/// assert_eq!(vec![1], nearest);
/// ```
#[derive(Debug)]
pub struct KdTree {
    nodes: Vec<(Position, usize)>,
}

impl KdTree {
    /// Builds a tree over `positions`.
    pub fn new(positions: &[Position]) -> KdTree {
        let mut nodes: Vec<(Position, usize)> = positions
            .iter()
            .copied()
            .enumerate()
            .map(|(index, position)| (position, index))
            .collect();
        build(0, &mut nodes);
        KdTree { nodes }
    }

    /// Returns the (up to) `k` nearest points to `position`, nearest first.
    ///
    /// The point at `exclude` (if any point has that exact index) is never returned; this is how
    /// self-exclusion works when querying with one of the tree's own points.
    pub fn k_nearest_excluding(&self, exclude: usize, position: &Position, k: usize) -> Vec<usize> {
        if k == 0 || self.nodes.is_empty() {
            return Vec::new();
        }
        let mut heap: BinaryHeap<Neighbor> = BinaryHeap::with_capacity(k + 1);
        search(&self.nodes, position, 0, exclude, k, &mut heap);
        let mut found: Vec<Neighbor> = heap.into_vec();
        found.sort();
        found.into_iter().map(|n| n.index).collect()
    }

    /// Returns the `k` nearest points to `position`, without excluding any index.
    pub fn k_nearest(&self, position: &Position, k: usize) -> Vec<usize> {
        self.k_nearest_excluding(usize::MAX, position, k)
    }

    /// The number of points indexed by this tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if this tree indexes no points.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn build(dim: usize, nodes: &mut [(Position, usize)]) {
    if nodes.len() < 2 {
        return;
    }
    let middle = nodes.len() / 2;
    partition(middle, dim, nodes);
    let next_dim = (dim + 1) % 3;
    build(next_dim, &mut nodes[..middle]);
    build(next_dim, &mut nodes[middle + 1..]);
}

fn partition(target: usize, dim: usize, nodes: &mut [(Position, usize)]) {
    let mut lower = 0;
    let mut upper = nodes.len() - 1;
    loop {
        let pivot_index = (upper - lower) / 2 + lower;
        let pivot = nodes[pivot_index].0[dim];
        nodes.swap(pivot_index, upper);
        let mut store = lower;
        for i in lower..upper {
            if nodes[i].0[dim] < pivot {
                nodes.swap(store, i);
                store += 1;
            }
        }
        nodes.swap(store, upper);
        match target.cmp(&store) {
            Ordering::Equal => return,
            Ordering::Less => upper = store - 1,
            Ordering::Greater => lower = store + 1,
        }
    }
}

fn search(
    nodes: &[(Position, usize)],
    position: &Position,
    dim: usize,
    exclude: usize,
    k: usize,
    heap: &mut BinaryHeap<Neighbor>,
) {
    if nodes.len() < 8 {
        for &(point, index) in nodes {
            consider(point, index, position, exclude, k, heap);
        }
        return;
    }

    let middle = nodes.len() / 2;
    let (point, index) = nodes[middle];
    consider(point, index, position, exclude, k, heap);

    let next_dim = (dim + 1) % 3;
    let is_left = position[dim] < point[dim];
    let (near, far) = if is_left {
        (&nodes[..middle], &nodes[middle + 1..])
    } else {
        (&nodes[middle + 1..], &nodes[..middle])
    };
    search(near, position, next_dim, exclude, k, heap);

    let plane_distance = {
        let d = position[dim] - point[dim];
        d * d
    };
    if heap.len() < k || plane_distance < heap.peek().map(|n| n.distance).unwrap_or(f64::INFINITY) {
        search(far, position, next_dim, exclude, k, heap);
    }
}

fn consider(
    point: Position,
    index: usize,
    position: &Position,
    exclude: usize,
    k: usize,
    heap: &mut BinaryHeap<Neighbor>,
) {
    if index == exclude {
        return;
    }
    let d = distance(&point, position);
    let candidate = Neighbor { distance: d, index };
    if heap.len() < k {
        heap.push(candidate);
    } else if let Some(worst) = heap.peek() {
        if candidate < *worst {
            heap.pop();
            heap.push(candidate);
        }
    }
}

/// Computes the `k` nearest neighbors of every point in `positions`, in parallel.
///
/// Returns one index list per input point, nearest first, excluding the point itself.
///
/// # Examples
///
/// ```
/// use lidar_cloud::knn::neighbors;
///
/// let positions = vec![[0., 0., 0.], [1., 0., 0.], [10., 0., 0.]];
/// let result = neighbors(&positions, 1);
/// assert_eq!(vec![1], result[0]);
/// ```
pub fn neighbors(positions: &[Position], k: usize) -> Vec<Vec<usize>> {
    use rayon::prelude::*;

    let tree = KdTree::new(positions);
    (0..positions.len())
        .into_par_iter()
        .map(|i| tree.k_nearest_excluding(i, &positions[i], k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Vec<Position> {
        (0..20).map(|i| [i as f64, 0., 0.]).collect()
    }

    #[test]
    fn excludes_the_query_point() {
        let positions = line();
        let tree = KdTree::new(&positions);
        let nearest = tree.k_nearest_excluding(5, &positions[5], 2);
        assert_eq!(vec![4, 6], nearest);
    }

    #[test]
    fn breaks_distance_ties_by_index() {
        let positions = vec![[0., 0., 0.], [1., 0., 0.], [-1., 0., 0.]];
        let tree = KdTree::new(&positions);
        let nearest = tree.k_nearest_excluding(0, &positions[0], 1);
        assert_eq!(vec![1], nearest);
    }

    #[test]
    fn parallel_neighbors_matches_serial() {
        let positions = line();
        let tree = KdTree::new(&positions);
        let parallel = neighbors(&positions, 3);
        for i in 0..positions.len() {
            assert_eq!(tree.k_nearest_excluding(i, &positions[i], 3), parallel[i]);
        }
    }

    #[test]
    fn returns_fewer_than_k_when_not_enough_points() {
        let positions = vec![[0., 0., 0.], [1., 0., 0.]];
        let tree = KdTree::new(&positions);
        let nearest = tree.k_nearest_excluding(0, &positions[0], 5);
        assert_eq!(vec![1], nearest);
    }
}
