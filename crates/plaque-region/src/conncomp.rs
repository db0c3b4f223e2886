//! Connected component analysis
//!
//! This module labels the connected components of a binary field with a
//! two-pass scan backed by an array Union-Find (disjoint set) structure.
//!
//! Pass 1 visits pixels in raster order and gives each foreground pixel the
//! smallest provisional label among its already-visited neighbors (W, NW,
//! N, NE for 8-way; W, N for 4-way), recording an equivalence between all
//! distinct labels seen. Pass 2 resolves every provisional label to its
//! root, renumbers roots densely as `1..=K` in order of first raster
//! appearance, and accumulates area, centroid and bounding box.

use crate::error::RegionResult;
use plaque_core::{BinaryField, Field, LabelMap, Rect, Region};

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    FourWay,
    /// 8-way connectivity (includes diagonals)
    #[default]
    EightWay,
}

/// Array-backed disjoint set over provisional labels
///
/// Index 0 is reserved for background. The root of a set is always its
/// smallest member, so roots follow the order labels were created in.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    /// Create an empty structure holding only the background label.
    pub fn new() -> Self {
        Self { parent: vec![0] }
    }

    /// Allocate a fresh label in its own set.
    pub fn make_set(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    /// Number of labels allocated, excluding background.
    pub fn len(&self) -> usize {
        self.parent.len() - 1
    }

    /// Whether no label has been allocated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Root of `label`'s set, compressing the path on the way.
    pub fn find(&mut self, label: u32) -> u32 {
        let mut root = label;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        let mut cur = label;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    /// Merge the sets of `a` and `b`; the smaller root wins.
    pub fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi as usize] = lo;
        }
    }
}

impl Default for UnionFind {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of labeling one binary field
///
/// Regions are stored in label order: `regions[i].label == i + 1`.
#[derive(Debug, Clone)]
pub struct Labeling {
    /// Label grid, 0 = background
    pub label_map: LabelMap,
    /// Per-label statistics
    pub regions: Vec<Region>,
}

impl Labeling {
    /// Number of regions (K).
    pub fn num_regions(&self) -> usize {
        self.regions.len()
    }

    /// Statistics for one label.
    pub fn region(&self, label: u32) -> Option<&Region> {
        label
            .checked_sub(1)
            .and_then(|i| self.regions.get(i as usize))
    }

    /// Sum of region areas, equal to the foreground pixel count.
    pub fn total_area(&self) -> u64 {
        self.regions.iter().map(|r| r.area).sum()
    }

    /// `(width, height)` of the labeled field.
    pub fn dimensions(&self) -> (u32, u32) {
        self.label_map.dimensions()
    }
}

/// Label the connected components of a binary field.
///
/// A field without foreground yields zero regions. Pixels outside the field
/// are background and never connect anything.
pub fn label_components(field: &BinaryField, connectivity: ConnectivityType) -> RegionResult<Labeling> {
    let (w, h) = field.dimensions();
    let width = w as usize;
    let mut provisional = vec![0u32; field.len()];
    let mut uf = UnionFind::new();
    let mut neighbors: Vec<u32> = Vec::with_capacity(4);

    // Pass 1
    for y in 0..h as usize {
        let row = field.row(y as u32);
        for x in 0..width {
            if !row[x] {
                continue;
            }

            neighbors.clear();
            let idx = y * width + x;
            if x > 0 {
                neighbors.push(provisional[idx - 1]);
            }
            if y > 0 {
                let up = idx - width;
                neighbors.push(provisional[up]);
                if connectivity == ConnectivityType::EightWay {
                    if x > 0 {
                        neighbors.push(provisional[up - 1]);
                    }
                    if x + 1 < width {
                        neighbors.push(provisional[up + 1]);
                    }
                }
            }
            neighbors.retain(|&l| l != 0);

            provisional[idx] = match neighbors.iter().copied().min() {
                None => uf.make_set(),
                Some(min) => {
                    for &l in &neighbors {
                        if l != min {
                            uf.union(min, l);
                        }
                    }
                    min
                }
            };
        }
    }

    // Pass 2
    let mut dense = vec![0u32; uf.len() + 1];
    let mut accums: Vec<Accum> = Vec::new();
    for (idx, label) in provisional.iter_mut().enumerate() {
        if *label == 0 {
            continue;
        }
        let root = uf.find(*label) as usize;
        if dense[root] == 0 {
            accums.push(Accum::default());
            dense[root] = accums.len() as u32;
        }
        *label = dense[root];

        let (x, y) = ((idx % width) as u32, (idx / width) as u32);
        accums[*label as usize - 1].add(x, y);
    }

    let num_labels = accums.len() as u32;
    let label_map = LabelMap::new(Field::from_vec(w, h, provisional)?, num_labels)?;
    let regions = accums
        .iter()
        .enumerate()
        .map(|(i, acc)| acc.finish(i as u32 + 1))
        .collect();

    Ok(Labeling { label_map, regions })
}

/// Running per-label statistics for pass 2
#[derive(Debug, Clone, Copy)]
struct Accum {
    count: u64,
    sum_x: u64,
    sum_y: u64,
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl Default for Accum {
    fn default() -> Self {
        Self {
            count: 0,
            sum_x: 0,
            sum_y: 0,
            min_x: u32::MAX,
            min_y: u32::MAX,
            max_x: 0,
            max_y: 0,
        }
    }
}

impl Accum {
    fn add(&mut self, x: u32, y: u32) {
        self.count += 1;
        self.sum_x += x as u64;
        self.sum_y += y as u64;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn finish(&self, label: u32) -> Region {
        Region {
            label,
            area: self.count,
            centroid_row: self.sum_y as f64 / self.count as f64,
            centroid_col: self.sum_x as f64 / self.count as f64,
            bounds: Rect::from_inclusive(self.min_x, self.min_y, self.max_x, self.max_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(w: u32, h: u32, pixels: &[(u32, u32)]) -> BinaryField {
        BinaryField::from_points(w, h, pixels).unwrap()
    }

    #[test]
    fn test_union_find_smaller_root_wins() {
        let mut uf = UnionFind::new();
        let a = uf.make_set();
        let b = uf.make_set();
        let c = uf.make_set();
        uf.union(c, b);
        uf.union(b, a);
        assert_eq!(uf.find(c), a);
        assert_eq!(uf.find(b), a);
        assert_eq!(uf.len(), 3);
    }

    #[test]
    fn test_empty_field() {
        let labeling = label_components(&BinaryField::new(4, 3).unwrap(), ConnectivityType::EightWay).unwrap();
        assert_eq!(labeling.num_regions(), 0);
        assert_eq!(labeling.label_map.num_labels(), 0);
    }

    #[test]
    fn test_diagonal_connectivity() {
        let f = field(3, 3, &[(0, 0), (1, 1)]);
        let eight = label_components(&f, ConnectivityType::EightWay).unwrap();
        assert_eq!(eight.num_regions(), 1);
        assert_eq!(eight.regions[0].area, 2);

        let four = label_components(&f, ConnectivityType::FourWay).unwrap();
        assert_eq!(four.num_regions(), 2);
    }

    #[test]
    fn test_u_shape_merges() {
        // Two arms that only join on the bottom row
        let f = field(
            3,
            3,
            &[(0, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2)],
        );
        let labeling = label_components(&f, ConnectivityType::EightWay).unwrap();
        assert_eq!(labeling.num_regions(), 1);
        assert_eq!(labeling.regions[0].area, 7);
        assert_eq!(labeling.label_map.label_at(2, 0), Some(1));
    }

    #[test]
    fn test_dense_labels_in_raster_order() {
        let f = field(6, 3, &[(5, 0), (0, 1), (0, 2), (3, 2)]);
        let labeling = label_components(&f, ConnectivityType::EightWay).unwrap();
        assert_eq!(labeling.num_regions(), 3);
        assert_eq!(labeling.label_map.label_at(5, 0), Some(1));
        assert_eq!(labeling.label_map.label_at(0, 1), Some(2));
        assert_eq!(labeling.label_map.label_at(3, 2), Some(3));
        assert_eq!(labeling.region(2).map(|r| r.area), Some(2));
        assert!(labeling.region(0).is_none());
        assert!(labeling.region(4).is_none());
    }

    #[test]
    fn test_region_stats() {
        let f = field(5, 4, &[(1, 1), (2, 1), (3, 1), (1, 2)]);
        let labeling = label_components(&f, ConnectivityType::EightWay).unwrap();
        let r = &labeling.regions[0];
        assert_eq!(r.area, 4);
        assert_eq!(r.bounds, Rect::new(1, 1, 3, 2));
        assert!((r.centroid_row - 1.25).abs() < 1e-12);
        assert!((r.centroid_col - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_border_pixels_do_not_wrap() {
        // Last column of row 0 and first column of row 1 are adjacent in memory only
        let f = field(3, 2, &[(2, 0), (0, 1)]);
        let labeling = label_components(&f, ConnectivityType::EightWay).unwrap();
        assert_eq!(labeling.num_regions(), 2);
    }
}
