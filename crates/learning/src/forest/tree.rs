//! CART regression tree splitting on variance reduction

use rand::Rng;
use rand::seq::SliceRandom;

/// Growth limits shared by every tree in a forest
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub max_features: usize,
    pub min_samples_leaf: usize,
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Best split found for a node
struct Split {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Fitted regression tree
#[derive(Debug, Clone)]
pub(crate) struct RegressionTree {
    root: Node,
}

impl RegressionTree {
    /// Grow a tree on the rows selected by `indices` (repeats allowed)
    pub fn fit<R: Rng>(
        features: &[Vec<f64>],
        targets: &[f64],
        indices: Vec<usize>,
        params: TreeParams,
        rng: &mut R,
    ) -> Self {
        let n_features = features.first().map(Vec::len).unwrap_or(0);
        let root = grow(features, targets, indices, 0, n_features, &params, rng);
        Self { root }
    }

    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = row.get(*feature).copied().unwrap_or(0.0);
                    node = if x <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Number of leaves (for diagnostics)
    pub fn n_leaves(&self) -> usize {
        fn count(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Split { left, right, .. } => count(left) + count(right),
            }
        }
        count(&self.root)
    }
}

fn mean(targets: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().map(|&i| targets[i]).sum::<f64>() / indices.len() as f64
}

/// Sum of squared deviations from the mean, from running sums
fn sse(sum: f64, sum_sq: f64, n: f64) -> f64 {
    (sum_sq - sum * sum / n).max(0.0)
}

fn grow<R: Rng>(
    features: &[Vec<f64>],
    targets: &[f64],
    indices: Vec<usize>,
    depth: usize,
    n_features: usize,
    params: &TreeParams,
    rng: &mut R,
) -> Node {
    let value = mean(targets, &indices);

    let depth_exhausted = params.max_depth.is_some_and(|max| depth >= max);
    if depth_exhausted || indices.len() < 2 * params.min_samples_leaf || n_features == 0 {
        return Node::Leaf { value };
    }

    let Some(split) = best_split(features, targets, &indices, n_features, params, rng) else {
        return Node::Leaf { value };
    };

    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .into_iter()
        .partition(|&i| features[i][split.feature] <= split.threshold);

    Node::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: Box::new(grow(features, targets, left, depth + 1, n_features, params, rng)),
        right: Box::new(grow(features, targets, right, depth + 1, n_features, params, rng)),
    }
}

fn best_split<R: Rng>(
    features: &[Vec<f64>],
    targets: &[f64],
    indices: &[usize],
    n_features: usize,
    params: &TreeParams,
    rng: &mut R,
) -> Option<Split> {
    let n = indices.len();
    let min_leaf = params.min_samples_leaf;

    let total_sum: f64 = indices.iter().map(|&i| targets[i]).sum();
    let total_sq: f64 = indices.iter().map(|&i| targets[i] * targets[i]).sum();
    let parent_sse = sse(total_sum, total_sq, n as f64);
    if parent_sse <= 1e-12 {
        return None;
    }

    // Random feature subset per split
    let mut candidates: Vec<usize> = (0..n_features).collect();
    candidates.shuffle(rng);
    candidates.truncate(params.max_features.clamp(1, n_features));

    let mut best: Option<Split> = None;
    let mut sorted = indices.to_vec();

    for feature in candidates {
        sorted.sort_by(|&a, &b| features[a][feature].total_cmp(&features[b][feature]));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;

        for k in 0..n - 1 {
            let y = targets[sorted[k]];
            left_sum += y;
            left_sq += y * y;

            let n_left = k + 1;
            let n_right = n - n_left;
            if n_left < min_leaf || n_right < min_leaf {
                continue;
            }

            let x = features[sorted[k]][feature];
            let x_next = features[sorted[k + 1]][feature];
            // Only split between distinct values
            if x_next <= x {
                continue;
            }

            let children = sse(left_sum, left_sq, n_left as f64)
                + sse(total_sum - left_sum, total_sq - left_sq, n_right as f64);
            let gain = parent_sse - children;

            if gain > 1e-12 && best.as_ref().is_none_or(|b| gain > b.gain) {
                best = Some(Split {
                    feature,
                    threshold: (x + x_next) / 2.0,
                    gain,
                });
            }
        }
    }

    best
}
