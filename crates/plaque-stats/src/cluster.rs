//! Similarity clustering of intensity histograms
//!
//! Series with samples are normalized to probability vectors, compared by
//! Euclidean distance and merged bottom-up with Ward linkage. Series with
//! no samples are excluded up front and listed separately, never turned
//! into all-zero vectors.
//!
//! # Ward linkage
//!
//! Starting from singletons, the pair of clusters with the smallest Ward
//! distance is merged until one cluster remains. After merging `a` and `b`
//! the distance to every other cluster `k` is updated with the
//! Lance-Williams formula
//!
//! ```text
//! d(ab, k) = sqrt(((na + nk) d(a,k)^2 + (nb + nk) d(b,k)^2 - nk d(a,b)^2) / (na + nb + nk))
//! ```
//!
//! Cluster ids follow the usual convention: leaves are `0..n`, the cluster
//! formed by merge `i` is `n + i`. Candidate merges whose distances differ
//! by at most [`TIE_EPSILON`] are ordered by the sum of the two cluster
//! ids, then by the smaller id.

use crate::error::{StatsError, StatsResult};
use crate::histogram::HistogramSet;
use plaque_core::SeriesKey;
use serde::Serialize;
use std::cmp::Ordering;

/// Distances closer than this are treated as equal when choosing a merge
pub const TIE_EPSILON: f64 = 1e-12;

/// A histogram scaled to sum to 1
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedHistogram {
    key: SeriesKey,
    probs: Vec<f64>,
}

impl NormalizedHistogram {
    /// Normalize raw counts; `None` when the counts sum to zero.
    pub fn from_counts(key: SeriesKey, counts: &[u64]) -> Option<Self> {
        let total: u64 = counts.iter().sum();
        if total == 0 {
            return None;
        }
        let total = total as f64;
        Some(Self {
            key,
            probs: counts.iter().map(|&c| c as f64 / total).collect(),
        })
    }

    /// Series this vector belongs to.
    pub fn key(&self) -> SeriesKey {
        self.key
    }

    /// Probability per bin.
    pub fn values(&self) -> &[f64] {
        &self.probs
    }

    /// Sum of entries (1 up to rounding).
    pub fn sum(&self) -> f64 {
        self.probs.iter().sum()
    }

    /// Euclidean distance to another vector of the same length.
    pub fn distance(&self, other: &NormalizedHistogram) -> f64 {
        self.probs
            .iter()
            .zip(&other.probs)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

/// Series split into those that take part in clustering and those without data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterInput {
    /// Normalized series, in series order
    pub included: Vec<NormalizedHistogram>,
    /// Series with zero samples
    pub excluded: Vec<SeriesKey>,
}

impl ClusterInput {
    /// Normalize every series of a histogram set.
    pub fn from_set(set: &HistogramSet) -> Self {
        let mut input = Self::default();
        for (key, hist) in set.iter() {
            match NormalizedHistogram::from_counts(key, hist.counts()) {
                Some(n) => input.included.push(n),
                None => input.excluded.push(key),
            }
        }
        input
    }
}

/// Distance between two series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairDistance {
    pub a: SeriesKey,
    pub b: SeriesKey,
    pub distance: f64,
}

/// Symmetric matrix of pairwise Euclidean distances
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMatrix {
    labels: Vec<SeriesKey>,
    values: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    /// Compute all pairwise distances.
    pub fn from_histograms(histograms: &[NormalizedHistogram]) -> Self {
        let n = histograms.len();
        let mut values = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in i + 1..n {
                let d = histograms[i].distance(&histograms[j]);
                values[i][j] = d;
                values[j][i] = d;
            }
        }
        Self {
            labels: histograms.iter().map(NormalizedHistogram::key).collect(),
            values,
        }
    }

    /// Build from explicit labels and a full square matrix.
    ///
    /// # Errors
    ///
    /// Fails unless the matrix is square, matches the labels, is symmetric
    /// and has a zero diagonal.
    pub fn from_values(labels: Vec<SeriesKey>, values: Vec<Vec<f64>>) -> StatsResult<Self> {
        let n = labels.len();
        if values.len() != n || values.iter().any(|row| row.len() != n) {
            return Err(StatsError::InvalidParameters(format!(
                "distance matrix must be {}x{}",
                n, n
            )));
        }
        let dm = Self { labels, values };
        if !dm.is_symmetric(TIE_EPSILON) {
            return Err(StatsError::InvalidParameters(
                "distance matrix must be symmetric with a zero diagonal".to_string(),
            ));
        }
        Ok(dm)
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the matrix is 0x0.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Series in row order.
    pub fn labels(&self) -> &[SeriesKey] {
        &self.labels
    }

    /// Distance between rows `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Whether `d(i,j) == d(j,i)` and `d(i,i) == 0` within `tol`.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let n = self.len();
        (0..n).all(|i| {
            self.values[i][i].abs() <= tol
                && (i + 1..n).all(|j| (self.values[i][j] - self.values[j][i]).abs() <= tol)
        })
    }

    /// The `n` closest pairs, nearest first.
    pub fn most_similar_pairs(&self, n: usize) -> Vec<PairDistance> {
        let mut pairs = self.pairs();
        pairs.sort_by(|x, y| x.distance.total_cmp(&y.distance));
        pairs.truncate(n);
        pairs
    }

    /// The `n` farthest pairs, farthest first.
    pub fn most_distinct_pairs(&self, n: usize) -> Vec<PairDistance> {
        let mut pairs = self.pairs();
        pairs.sort_by(|x, y| y.distance.total_cmp(&x.distance));
        pairs.truncate(n);
        pairs
    }

    // Upper triangle in row order; sorts above are stable
    fn pairs(&self) -> Vec<PairDistance> {
        let n = self.len();
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in i + 1..n {
                pairs.push(PairDistance {
                    a: self.labels[i],
                    b: self.labels[j],
                    distance: self.values[i][j],
                });
            }
        }
        pairs
    }
}

/// One merge step of a dendrogram
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Merge {
    /// Smaller cluster id
    pub left: usize,
    /// Larger cluster id
    pub right: usize,
    /// Ward distance at which the clusters merged
    pub height: f64,
    /// Number of leaves in the merged cluster
    pub size: usize,
}

/// Binary merge tree over series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dendrogram {
    /// Leaf series; leaf `i` has cluster id `i`
    pub leaves: Vec<SeriesKey>,
    /// Merges in the order they happened
    pub merges: Vec<Merge>,
}

/// Node of a dendrogram tree
#[derive(Debug, Clone, PartialEq)]
pub enum DendrogramNode {
    Leaf(usize),
    Branch {
        left: Box<DendrogramNode>,
        right: Box<DendrogramNode>,
        height: f64,
        size: usize,
    },
}

impl Dendrogram {
    /// Build the tree; `None` if there are no leaves.
    pub fn tree(&self) -> Option<DendrogramNode> {
        let mut nodes: Vec<Option<DendrogramNode>> =
            (0..self.leaves.len()).map(|i| Some(DendrogramNode::Leaf(i))).collect();
        for m in &self.merges {
            let left = nodes.get_mut(m.left).and_then(Option::take)?;
            let right = nodes.get_mut(m.right).and_then(Option::take)?;
            nodes.push(Some(DendrogramNode::Branch {
                left: Box::new(left),
                right: Box::new(right),
                height: m.height,
                size: m.size,
            }));
        }
        nodes.pop().flatten()
    }

    /// Leaf indices left to right, as drawn under the tree.
    pub fn leaf_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.leaves.len());
        let mut stack: Vec<DendrogramNode> = self.tree().into_iter().collect();
        while let Some(node) = stack.pop() {
            match node {
                DendrogramNode::Leaf(i) => order.push(i),
                DendrogramNode::Branch { left, right, .. } => {
                    stack.push(*right);
                    stack.push(*left);
                }
            }
        }
        order
    }

    /// Height of the final merge (0 for fewer than two leaves).
    pub fn root_height(&self) -> f64 {
        self.merges.last().map_or(0.0, |m| m.height)
    }
}

/// Ward-linkage hierarchical clustering over a distance matrix.
///
/// # Errors
///
/// Returns [`StatsError::InvalidParameters`] for an empty matrix.
pub fn ward_linkage(dm: &DistanceMatrix) -> StatsResult<Dendrogram> {
    let n = dm.len();
    if n == 0 {
        return Err(StatsError::InvalidParameters(
            "no series to cluster".to_string(),
        ));
    }

    // Slot i holds one active cluster; merged clusters reuse the lower slot
    let mut dist: Vec<Vec<f64>> = dm.values.clone();
    let mut ids: Vec<usize> = (0..n).collect();
    let mut sizes: Vec<usize> = vec![1; n];
    let mut active: Vec<bool> = vec![true; n];
    let mut merges = Vec::with_capacity(n - 1);

    for step in 0..n - 1 {
        let mut best: Option<(usize, usize)> = None;
        for i in (0..n).filter(|&i| active[i]) {
            for j in (i + 1..n).filter(|&j| active[j]) {
                let better = match best {
                    None => true,
                    Some((bi, bj)) => {
                        compare_candidates(dist[i][j], (ids[i], ids[j]), dist[bi][bj], (ids[bi], ids[bj]))
                            == Ordering::Less
                    }
                };
                if better {
                    best = Some((i, j));
                }
            }
        }
        let Some((a, b)) = best else {
            break;
        };

        let dab = dist[a][b];
        let (na, nb) = (sizes[a] as f64, sizes[b] as f64);
        for k in (0..n).filter(|&k| active[k] && k != a && k != b) {
            let nk = sizes[k] as f64;
            let dak = dist[a][k];
            let dbk = dist[b][k];
            let d2 = ((na + nk) * dak * dak + (nb + nk) * dbk * dbk - nk * dab * dab)
                / (na + nb + nk);
            let d = d2.max(0.0).sqrt();
            dist[a][k] = d;
            dist[k][a] = d;
        }

        merges.push(Merge {
            left: ids[a].min(ids[b]),
            right: ids[a].max(ids[b]),
            height: dab,
            size: sizes[a] + sizes[b],
        });
        sizes[a] += sizes[b];
        ids[a] = n + step;
        active[b] = false;
    }

    Ok(Dendrogram {
        leaves: dm.labels.clone(),
        merges,
    })
}

fn compare_candidates(d1: f64, ids1: (usize, usize), d2: f64, ids2: (usize, usize)) -> Ordering {
    if (d1 - d2).abs() > TIE_EPSILON {
        return d1.total_cmp(&d2);
    }
    let key = |(x, y): (usize, usize)| (x + y, x.min(y));
    key(ids1).cmp(&key(ids2))
}

/// Everything the clustering step produces for a stack
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterResult {
    /// Normalized inputs and excluded series
    pub input: ClusterInput,
    /// Pairwise distances over included series
    pub distances: DistanceMatrix,
    /// Merge tree; `None` when no series has data
    pub dendrogram: Option<Dendrogram>,
}

/// Normalize, measure and cluster every series of a histogram set.
pub fn cluster_histograms(set: &HistogramSet) -> StatsResult<ClusterResult> {
    let input = ClusterInput::from_set(set);
    let distances = DistanceMatrix::from_histograms(&input.included);
    let dendrogram = if distances.is_empty() {
        None
    } else {
        Some(ward_linkage(&distances)?)
    };
    Ok(ClusterResult {
        input,
        distances,
        dendrogram,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Histogram;
    use plaque_core::TissueCategory;

    fn key(i: usize) -> SeriesKey {
        SeriesKey::Tissue(TissueCategory::ALL[i])
    }

    fn matrix(values: Vec<Vec<f64>>) -> DistanceMatrix {
        let labels = (0..values.len()).map(key).collect();
        DistanceMatrix::from_values(labels, values).unwrap()
    }

    #[test]
    fn test_normalize() {
        let n = NormalizedHistogram::from_counts(key(0), &[1, 3, 0, 4]).unwrap();
        assert!((n.sum() - 1.0).abs() < 1e-12);
        assert_eq!(n.values()[1], 0.375);
        assert!(NormalizedHistogram::from_counts(key(0), &[0, 0]).is_none());
    }

    #[test]
    fn test_cluster_input_excludes_empty() {
        let mut full = Histogram::new();
        full.add_values(&[3, 4]);
        let set: HistogramSet = [(key(0), full), (key(1), Histogram::new())].into_iter().collect();
        let input = ClusterInput::from_set(&set);
        assert_eq!(input.included.len(), 1);
        assert_eq!(input.excluded, vec![key(1)]);
    }

    #[test]
    fn test_ward_three_points_on_a_line() {
        // Points at 0, 1 and 3 on a line
        let dm = matrix(vec![
            vec![0.0, 1.0, 3.0],
            vec![1.0, 0.0, 2.0],
            vec![3.0, 2.0, 0.0],
        ]);
        let dendro = ward_linkage(&dm).unwrap();
        assert_eq!(dendro.merges.len(), 2);
        assert_eq!((dendro.merges[0].left, dendro.merges[0].right), (0, 1));
        assert!((dendro.merges[0].height - 1.0).abs() < 1e-12);
        // d({0,1}, 2) = sqrt((2*9 + 2*4 - 1) / 3) = sqrt(25/3)
        assert_eq!((dendro.merges[1].left, dendro.merges[1].right), (2, 3));
        assert!((dendro.merges[1].height - (25.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(dendro.merges[1].size, 3);
        assert_eq!(dendro.leaf_order(), vec![2, 0, 1]);
    }

    #[test]
    fn test_ward_tie_prefers_lower_ids() {
        // All pairs equidistant: (0,1) has the lowest id sum
        let dm = matrix(vec![
            vec![0.0, 1.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0, 1.0],
            vec![1.0, 1.0, 0.0, 1.0],
            vec![1.0, 1.0, 1.0, 0.0],
        ]);
        let dendro = ward_linkage(&dm).unwrap();
        assert_eq!((dendro.merges[0].left, dendro.merges[0].right), (0, 1));
        assert_eq!((dendro.merges[1].left, dendro.merges[1].right), (2, 3));
        assert_eq!(dendro.merges[2].size, 4);
    }

    #[test]
    fn test_single_leaf() {
        let dm = matrix(vec![vec![0.0]]);
        let dendro = ward_linkage(&dm).unwrap();
        assert!(dendro.merges.is_empty());
        assert_eq!(dendro.tree(), Some(DendrogramNode::Leaf(0)));
        assert_eq!(dendro.root_height(), 0.0);
        assert!(ward_linkage(&matrix(vec![])).is_err());
    }

    #[test]
    fn test_from_values_validates() {
        let labels = vec![key(0), key(1)];
        assert!(DistanceMatrix::from_values(labels.clone(), vec![vec![0.0, 1.0], vec![2.0, 0.0]]).is_err());
        assert!(DistanceMatrix::from_values(labels.clone(), vec![vec![0.0, 1.0]]).is_err());
        assert!(DistanceMatrix::from_values(labels, vec![vec![0.0, 1.0], vec![1.0, 0.0]]).is_ok());
    }

    #[test]
    fn test_pairs() {
        let dm = matrix(vec![
            vec![0.0, 0.5, 0.2],
            vec![0.5, 0.0, 0.9],
            vec![0.2, 0.9, 0.0],
        ]);
        let near = dm.most_similar_pairs(2);
        assert_eq!((near[0].a, near[0].b), (key(0), key(2)));
        assert_eq!((near[1].a, near[1].b), (key(0), key(1)));
        let far = dm.most_distinct_pairs(1);
        assert_eq!((far[0].a, far[0].b, far[0].distance), (key(1), key(2), 0.9));
        assert_eq!(dm.most_similar_pairs(10).len(), 3);
    }
}
