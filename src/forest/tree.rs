//! Single isolation tree: random recursive partitioning over row indices of a
//! shared matrix view. Trees serialize with the frozen bundle.

use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Euler–Mascheroni constant for the harmonic-number approximation.
const EULER_GAMMA: f64 = 0.577_215_664_9;

/// Expected path length of an unsuccessful BST search over `n` rows,
/// `c(n) = 2H(n-1) - 2(n-1)/n` with `H(k) ≈ ln(k) + γ`.
pub fn average_path_length(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let m = (n - 1) as f64;
    2.0 * (m.ln() + EULER_GAMMA) - 2.0 * m / n as f64
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationTree {
    root: Node,
}

impl IsolationTree {
    /// Grow a tree over `rows` (indices into `data`), splitting until a row
    /// is isolated, the rows are identical, or `max_depth` is reached.
    pub fn fit(data: ArrayView2<'_, f64>, rows: &[usize], max_depth: usize, rng: &mut StdRng) -> Self {
        Self {
            root: build_node(data, rows, 0, max_depth, rng),
        }
    }

    /// Depth at which `sample` lands in a leaf, plus the unterminated-branch
    /// correction `c(leaf size)`.
    pub fn path_length(&self, sample: ArrayView1<'_, f64>) -> f64 {
        let mut node = &self.root;
        let mut depth = 0usize;
        loop {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    depth += 1;
                    node = if sample[*feature] < *threshold {
                        &**left
                    } else {
                        &**right
                    };
                }
                Node::Leaf { size } => return depth as f64 + average_path_length(*size),
            }
        }
    }
}

fn build_node(
    data: ArrayView2<'_, f64>,
    rows: &[usize],
    depth: usize,
    max_depth: usize,
    rng: &mut StdRng,
) -> Node {
    if rows.len() <= 1 || depth >= max_depth {
        return Node::Leaf { size: rows.len() };
    }

    // Candidate features: non-constant within this node (a constant column
    // admits no split interval).
    let mut candidates: Vec<(usize, f64, f64)> = Vec::new();
    for j in 0..data.ncols() {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &i in rows {
            let v = data[[i, j]];
            min = min.min(v);
            max = max.max(v);
        }
        if max - min > f64::EPSILON {
            candidates.push((j, min, max));
        }
    }
    if candidates.is_empty() {
        // all rows identical
        return Node::Leaf { size: rows.len() };
    }

    let (feature, min, max) = candidates[rng.gen_range(0..candidates.len())];
    let threshold = rng.gen_range(min..max);
    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
        .iter()
        .copied()
        .partition(|&i| data[[i, feature]] < threshold);
    if left_rows.is_empty() || right_rows.is_empty() {
        return Node::Leaf { size: rows.len() };
    }

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_node(data, &left_rows, depth + 1, max_depth, rng)),
        right: Box::new(build_node(data, &right_rows, depth + 1, max_depth, rng)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;

    #[test]
    fn outlier_isolates_in_fewer_splits() {
        let data = array![
            [1.0, 2.0],
            [1.1, 2.1],
            [0.9, 1.9],
            [1.2, 2.2],
            [10.0, 20.0],
        ];
        let rows: Vec<usize> = (0..5).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let tree = IsolationTree::fit(data.view(), &rows, 10, &mut rng);
        let outlier = tree.path_length(data.row(4));
        let normal = tree.path_length(data.row(0));
        assert!(outlier <= normal, "outlier {outlier} vs normal {normal}");
    }

    #[test]
    fn identical_rows_leaf_out() {
        let data = array![[3.0, 3.0], [3.0, 3.0], [3.0, 3.0]];
        let rows: Vec<usize> = (0..3).collect();
        let mut rng = StdRng::seed_from_u64(1);
        let tree = IsolationTree::fit(data.view(), &rows, 10, &mut rng);
        // no split possible: depth 0 leaf of size 3
        assert_eq!(tree.path_length(data.row(0)), average_path_length(3));
    }

    #[test]
    fn average_path_length_reference_points() {
        assert_eq!(average_path_length(0), 0.0);
        assert_eq!(average_path_length(1), 0.0);
        let c2 = average_path_length(2);
        assert!((c2 - (2.0 * EULER_GAMMA - 1.0)).abs() < 1e-12);
        let c10 = average_path_length(10);
        assert!(c10 > 2.0 && c10 < 4.0);
    }
}
