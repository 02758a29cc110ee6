//! Nearest-point lookup over a fixed set of vertex positions.
//!
//! A k-d tree with median splits on the longest axis. Queries return the
//! closest point by squared distance; ties go to the lowest index, so the
//! result matches a linear scan exactly.

use glam::Vec3;

/// Maximum points per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 8;

enum Node {
    Branch {
        axis: usize,
        split: f32,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        indices: Vec<u32>,
    },
}

/// Spatial index over borrowed points.
pub struct PointIndex<'a> {
    points: &'a [Vec3],
    root: Option<Node>,
}

impl<'a> PointIndex<'a> {
    /// Build an index over `points`.
    pub fn new(points: &'a [Vec3]) -> Self {
        let root = if points.is_empty() {
            None
        } else {
            Some(Self::build(points, (0..points.len() as u32).collect()))
        };
        Self { points, root }
    }

    fn build(points: &[Vec3], mut indices: Vec<u32>) -> Node {
        if indices.len() <= LEAF_MAX_SIZE {
            return Node::Leaf { indices };
        }

        let (min, max) = indices.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), &i| {
                let p = points[i as usize];
                (min.min(p), max.max(p))
            },
        );
        let extent = max - min;
        let axis = if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        };

        indices.sort_unstable_by(|&a, &b| {
            points[a as usize][axis].total_cmp(&points[b as usize][axis])
        });

        // Left holds coordinates <= split, right holds coordinates >= split.
        let mid = indices.len() / 2;
        let split = points[indices[mid] as usize][axis];
        let right = indices.split_off(mid);

        Node::Branch {
            axis,
            split,
            left: Box::new(Self::build(points, indices)),
            right: Box::new(Self::build(points, right)),
        }
    }

    /// Index of the point closest to `query`, lowest index on ties.
    pub fn nearest(&self, query: Vec3) -> Option<usize> {
        let root = self.root.as_ref()?;
        let mut best = None;
        self.search(root, query, &mut best);
        best.map(|(_, i)| i as usize)
    }

    fn search(&self, node: &Node, query: Vec3, best: &mut Option<(f32, u32)>) {
        match node {
            Node::Leaf { indices } => {
                for &i in indices {
                    let d = self.points[i as usize].distance_squared(query);
                    let closer = match *best {
                        None => true,
                        Some((best_d, best_i)) => d < best_d || (d == best_d && i < best_i),
                    };
                    if closer {
                        *best = Some((d, i));
                    }
                }
            }
            Node::Branch {
                axis,
                split,
                left,
                right,
            } => {
                let diff = query[*axis] - split;
                let (near, far) = if diff < 0.0 {
                    (left, right)
                } else {
                    (right, left)
                };

                self.search(near, query, best);
                // Equal distances must still be visited for the index tie-break.
                if best.map_or(true, |(best_d, _)| diff * diff <= best_d) {
                    self.search(far, query, best);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_nearest(points: &[Vec3], query: Vec3) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, p) in points.iter().enumerate() {
            let d = p.distance_squared(query);
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Deterministic points on a coarse lattice, so many distances tie.
    fn lattice_points(count: usize) -> Vec<Vec3> {
        let mut state: u32 = 12345;
        let mut next = move || {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            ((state >> 16) % 9) as f32 * 0.25
        };
        (0..count).map(|_| Vec3::new(next(), next(), next())).collect()
    }

    #[test]
    fn test_empty_index() {
        let index = PointIndex::new(&[]);
        assert_eq!(index.nearest(Vec3::ZERO), None);
    }

    #[test]
    fn test_matches_linear_scan() {
        let points = lattice_points(500);
        let queries = lattice_points(700);
        let index = PointIndex::new(&points);

        for query in queries.iter().skip(500) {
            let shifted = *query + Vec3::new(0.1, -0.05, 0.02);
            assert_eq!(index.nearest(*query), linear_nearest(&points, *query));
            assert_eq!(index.nearest(shifted), linear_nearest(&points, shifted));
        }
    }

    #[test]
    fn test_duplicate_points_pick_lowest_index() {
        let mut points = vec![Vec3::ONE; 20];
        points.push(Vec3::ZERO);
        points.extend(vec![Vec3::ONE; 20]);
        let index = PointIndex::new(&points);

        assert_eq!(index.nearest(Vec3::splat(0.9)), Some(0));
        assert_eq!(index.nearest(Vec3::splat(-0.1)), Some(20));
    }
}
