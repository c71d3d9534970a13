//! Cluster analysis and win detection
//!
//! The puzzle is solved when every color forms a tight group and all groups
//! are well separated. What "tight" and "separated" mean is a [`WinRules`]
//! policy so rule revisions can be swapped and tested without touching the
//! physics.
//!
//! Cost per call is one sort per color (O(n log n)) plus O(k^2) centroid
//! pairs for `k` colors.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::Dot;

/// Identifies which revision of the rules a policy follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RulesVersion {
    /// First release: one radius cap, percentile-relative outliers
    Classic,
    /// Size-adaptive radius and outlier budget
    #[default]
    Adaptive,
    /// Adaptive plus spread, hard cap and minimum group size checks
    Strict,
}

/// Distance an outlier is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutlierReference {
    /// Beyond the group's effective radius
    EffectiveRadius,
    /// Beyond the size-dependent maximum radius
    MaxRadius,
}

/// Thresholds that define a solved board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinRules {
    pub version: RulesVersion,

    /// Percentile of member distances used as the group radius
    pub radius_percentile: f64,
    /// Groups up to this size use `small_group_max_radius`
    pub small_group_size: usize,
    pub small_group_max_radius: f64,
    /// Radius cap for larger groups
    pub max_cluster_radius: f64,

    pub outlier_reference: OutlierReference,
    /// Groups smaller than this tolerate no outliers
    pub tiny_group_size: usize,
    /// Budget floor once a group is past `tiny_group_size`
    pub min_outliers: usize,
    /// Budget as a share of the group size
    pub outlier_fraction: f64,
    pub max_outliers: Option<usize>,

    /// Clearance required between two groups beyond their radii
    pub min_gap: f64,

    /// Smallest group that can count as clustered
    pub min_group_size: usize,
    /// Minimum diagonal of the centroids' bounding box
    pub min_centroid_spread: Option<f64>,
    /// No member may sit farther than effective radius plus this
    pub hard_cap_allowance: Option<f64>,
}

impl Default for WinRules {
    fn default() -> Self {
        Self::adaptive()
    }
}

impl WinRules {
    pub fn classic() -> Self {
        Self {
            version: RulesVersion::Classic,
            radius_percentile: 0.9,
            small_group_size: 0,
            small_group_max_radius: 60.0,
            max_cluster_radius: 60.0,
            outlier_reference: OutlierReference::EffectiveRadius,
            tiny_group_size: 0,
            min_outliers: 1,
            outlier_fraction: 0.1,
            max_outliers: None,
            min_gap: 40.0,
            min_group_size: 1,
            min_centroid_spread: None,
            hard_cap_allowance: None,
        }
    }

    pub fn adaptive() -> Self {
        Self {
            version: RulesVersion::Adaptive,
            radius_percentile: 0.9,
            small_group_size: 6,
            small_group_max_radius: 45.0,
            max_cluster_radius: 60.0,
            outlier_reference: OutlierReference::MaxRadius,
            tiny_group_size: 5,
            min_outliers: 1,
            outlier_fraction: 0.05,
            max_outliers: Some(3),
            min_gap: 40.0,
            min_group_size: 1,
            min_centroid_spread: None,
            hard_cap_allowance: None,
        }
    }

    pub fn strict() -> Self {
        Self {
            version: RulesVersion::Strict,
            min_group_size: 3,
            min_centroid_spread: Some(80.0),
            hard_cap_allowance: Some(12.0),
            ..Self::adaptive()
        }
    }

    pub fn for_version(version: RulesVersion) -> Self {
        match version {
            RulesVersion::Classic => Self::classic(),
            RulesVersion::Adaptive => Self::adaptive(),
            RulesVersion::Strict => Self::strict(),
        }
    }

    /// Largest radius a group of `size` may have
    pub fn max_radius_for(&self, size: usize) -> f64 {
        if size <= self.small_group_size {
            self.small_group_max_radius
        } else {
            self.max_cluster_radius
        }
    }

    /// Outliers a group of `size` may carry and still count as clustered
    pub fn outlier_budget(&self, size: usize) -> usize {
        if size < self.tiny_group_size {
            return 0;
        }
        let scaled = (size as f64 * self.outlier_fraction).floor() as usize;
        let budget = scaled.max(self.min_outliers);
        match self.max_outliers {
            Some(cap) => budget.min(cap),
            None => budget,
        }
    }
}

/// Per-color statistics for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterStat {
    pub color: usize,
    pub centroid: DVec2,
    /// Percentile radius, capped at the size-dependent maximum
    pub radius: f64,
    /// Distance of the farthest member
    pub max_distance: f64,
    pub outliers: usize,
    pub size: usize,
}

impl ClusterStat {
    fn empty(color: usize) -> Self {
        Self {
            color,
            centroid: DVec2::ZERO,
            radius: 0.0,
            max_distance: 0.0,
            outliers: 0,
            size: 0,
        }
    }
}

/// Nearest-rank percentile of an unsorted sample; 0 for an empty one
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted[percentile_index(sorted.len(), p)]
}

fn percentile_index(len: usize, p: f64) -> usize {
    let idx = (p * (len - 1) as f64).floor();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(len - 1)
    }
}

/// Group dots by color and summarize each group
///
/// Dots whose color is outside `0..color_count` are skipped. Colors with no
/// dots get a zero-size entry so the result always has `color_count` items.
pub fn cluster_stats(dots: &[Dot], color_count: usize, rules: &WinRules) -> Vec<ClusterStat> {
    let mut groups: Vec<Vec<DVec2>> = vec![Vec::new(); color_count];
    for dot in dots {
        match groups.get_mut(dot.color) {
            Some(group) => group.push(dot.pos),
            None => log::debug!("Skipping dot {:?} with color {}", dot.id, dot.color),
        }
    }

    groups
        .iter()
        .enumerate()
        .map(|(color, members)| group_stat(color, members, rules))
        .collect()
}

fn group_stat(color: usize, members: &[DVec2], rules: &WinRules) -> ClusterStat {
    if members.is_empty() {
        return ClusterStat::empty(color);
    }

    let size = members.len();
    let centroid = members.iter().copied().sum::<DVec2>() / size as f64;

    let mut dists: Vec<f64> = members.iter().map(|p| p.distance(centroid)).collect();
    dists.sort_by(f64::total_cmp);

    let r_pct = dists[percentile_index(size, rules.radius_percentile)];
    let max_r = rules.max_radius_for(size);
    let radius = r_pct.min(max_r);

    let limit = match rules.outlier_reference {
        OutlierReference::EffectiveRadius => radius,
        OutlierReference::MaxRadius => max_r,
    };
    let outliers = dists.iter().filter(|&&d| d > limit).count();

    ClusterStat {
        color,
        centroid,
        radius,
        max_distance: dists[size - 1],
        outliers,
        size,
    }
}

/// Solved check with the canonical rules
pub fn is_solved(dots: &[Dot], color_count: usize) -> bool {
    is_solved_with(dots, color_count, &WinRules::default())
}

/// Solved check with an explicit policy
pub fn is_solved_with(dots: &[Dot], color_count: usize, rules: &WinRules) -> bool {
    if dots.is_empty() || color_count == 0 {
        return false;
    }

    let stats = cluster_stats(dots, color_count, rules);

    for c in &stats {
        if c.size == 0 || c.size < rules.min_group_size {
            log::debug!("Color {} too small to cluster ({} dots)", c.color, c.size);
            return false;
        }
        if c.outliers > rules.outlier_budget(c.size) {
            log::debug!("Color {} has {} outliers", c.color, c.outliers);
            return false;
        }
        if let Some(allowance) = rules.hard_cap_allowance {
            if c.max_distance > c.radius + allowance {
                log::debug!("Color {} has a straggler at {:.1}", c.color, c.max_distance);
                return false;
            }
        }
    }

    for (i, a) in stats.iter().enumerate() {
        for b in &stats[i + 1..] {
            if a.centroid.distance(b.centroid) < a.radius + b.radius + rules.min_gap {
                return false;
            }
        }
    }

    if let Some(min_spread) = rules.min_centroid_spread {
        if centroid_spread(&stats) < min_spread {
            return false;
        }
    }

    true
}

/// Diagonal of the bounding box around all centroids
fn centroid_spread(stats: &[ClusterStat]) -> f64 {
    let mut min = DVec2::splat(f64::INFINITY);
    let mut max = DVec2::splat(f64::NEG_INFINITY);
    for c in stats {
        min = min.min(c.centroid);
        max = max.max(c.centroid);
    }
    if stats.is_empty() {
        0.0
    } else {
        (max - min).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `n` dots evenly spaced on a circle of `r` around `(cx, cy)`
    fn ring(first_id: u32, color: usize, cx: f64, cy: f64, n: usize, r: f64) -> Vec<Dot> {
        (0..n)
            .map(|k| {
                let theta = std::f64::consts::TAU * k as f64 / n as f64;
                Dot::at_rest(
                    first_id + k as u32,
                    color,
                    cx + r * theta.cos(),
                    cy + r * theta.sin(),
                )
            })
            .collect()
    }

    fn two_clusters(second: (f64, f64)) -> Vec<Dot> {
        let mut dots = ring(0, 0, 100.0, 100.0, 4, 3.0);
        dots.extend(ring(4, 1, second.0, second.1, 4, 3.0));
        dots
    }

    #[test]
    fn test_separated_clusters_win() {
        assert!(is_solved(&two_clusters((500.0, 500.0)), 2));
    }

    #[test]
    fn test_overlapping_clusters_lose() {
        assert!(!is_solved(&two_clusters((110.0, 110.0)), 2));
    }

    #[test]
    fn test_all_versions_agree_on_clear_cases() {
        for version in [RulesVersion::Classic, RulesVersion::Adaptive, RulesVersion::Strict] {
            let rules = WinRules::for_version(version);
            assert!(is_solved_with(&two_clusters((500.0, 500.0)), 2, &rules));
            assert!(!is_solved_with(&two_clusters((110.0, 110.0)), 2, &rules));
        }
    }

    fn group_with_outliers(outliers: &[(f64, f64)], tight: usize) -> Vec<Dot> {
        let mut dots = ring(0, 0, 100.0, 100.0, tight, 4.0);
        for (k, &(x, y)) in outliers.iter().enumerate() {
            dots.push(Dot::at_rest(100 + k as u32, 0, x, y));
        }
        dots.extend(ring(200, 1, 600.0, 500.0, 20, 4.0));
        dots
    }

    #[test]
    fn test_single_outlier_tolerated() {
        let dots = group_with_outliers(&[(400.0, 100.0)], 19);
        let stats = cluster_stats(&dots, 2, &WinRules::default());
        assert_eq!(stats[0].size, 20);
        assert_eq!(stats[0].outliers, 1);
        assert_eq!(WinRules::default().outlier_budget(20), 1);
        assert!(is_solved(&dots, 2));
    }

    #[test]
    fn test_second_outlier_rejected() {
        let added = group_with_outliers(&[(400.0, 100.0), (100.0, 400.0)], 19);
        assert!(!is_solved(&added, 2));

        let replaced = group_with_outliers(&[(400.0, 100.0), (100.0, 400.0)], 18);
        assert!(!is_solved(&replaced, 2));
    }

    #[test]
    fn test_strict_rejects_straggler() {
        let dots = group_with_outliers(&[(400.0, 100.0)], 19);
        assert!(!is_solved_with(&dots, 2, &WinRules::strict()));
    }

    #[test]
    fn test_strict_min_group_size() {
        let mut dots = ring(0, 0, 100.0, 100.0, 2, 3.0);
        dots.extend(ring(2, 1, 500.0, 500.0, 2, 3.0));
        assert!(is_solved(&dots, 2));
        assert!(!is_solved_with(&dots, 2, &WinRules::strict()));
    }

    #[test]
    fn test_strict_min_spread() {
        let rules = WinRules {
            min_gap: 0.0,
            ..WinRules::strict()
        };
        let mut dots = ring(0, 0, 100.0, 100.0, 4, 3.0);
        dots.extend(ring(4, 1, 150.0, 100.0, 4, 3.0));
        assert!(is_solved_with(&dots, 2, &WinRules { min_centroid_spread: None, ..rules }));
        assert!(!is_solved_with(&dots, 2, &rules));
    }

    #[test]
    fn test_small_group_radius_cap() {
        let rules = WinRules::default();
        assert_eq!(rules.max_radius_for(4), 45.0);
        assert_eq!(rules.max_radius_for(6), 45.0);
        assert_eq!(rules.max_radius_for(7), 60.0);
    }

    #[test]
    fn test_outlier_budget() {
        let rules = WinRules::default();
        assert_eq!(rules.outlier_budget(3), 0);
        assert_eq!(rules.outlier_budget(4), 0);
        assert_eq!(rules.outlier_budget(5), 1);
        assert_eq!(rules.outlier_budget(20), 1);
        assert_eq!(rules.outlier_budget(40), 2);
        assert_eq!(rules.outlier_budget(200), 3);

        let classic = WinRules::classic();
        assert_eq!(classic.outlier_budget(3), 1);
        assert_eq!(classic.outlier_budget(20), 2);
    }

    #[test]
    fn test_tiny_group_zero_tolerance() {
        // Four dots, one of them 50 units out: past the 45 cap
        let mut dots = vec![
            Dot::at_rest(0, 0, 100.0, 100.0),
            Dot::at_rest(1, 0, 102.0, 100.0),
            Dot::at_rest(2, 0, 100.0, 102.0),
            Dot::at_rest(3, 0, 166.0, 100.0),
        ];
        dots.extend(ring(4, 1, 600.0, 500.0, 4, 3.0));
        let stats = cluster_stats(&dots, 2, &WinRules::default());
        assert_eq!(stats[0].outliers, 1);
        assert!(!is_solved(&dots, 2));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(!is_solved(&[], 2));
        assert!(!is_solved(&two_clusters((500.0, 500.0)), 0));
    }

    #[test]
    fn test_missing_color_not_solved() {
        assert!(!is_solved(&two_clusters((500.0, 500.0)), 3));
    }

    #[test]
    fn test_out_of_range_color_skipped() {
        let mut dots = two_clusters((500.0, 500.0));
        dots.push(Dot::at_rest(99, 7, 300.0, 300.0));

        let stats = cluster_stats(&dots, 2, &WinRules::default());
        assert_eq!(stats.iter().map(|c| c.size).sum::<usize>(), 8);
        assert!(is_solved(&dots, 2));
    }

    #[test]
    fn test_cluster_stat_values() {
        let dots = ring(0, 0, 200.0, 300.0, 8, 10.0);
        let stats = cluster_stats(&dots, 1, &WinRules::default());
        let c = stats[0];

        assert!((c.centroid - DVec2::new(200.0, 300.0)).length() < 1e-9);
        assert!((c.radius - 10.0).abs() < 1e-9);
        assert!((c.max_distance - 10.0).abs() < 1e-9);
        assert_eq!(c.outliers, 0);
        assert_eq!(c.size, 8);
    }

    #[test]
    fn test_percentile() {
        assert_eq!(percentile(&[], 0.9), 0.0);
        assert_eq!(percentile(&[5.0], 0.9), 5.0);
        // floor(0.9 * 9) = 8
        let values: Vec<f64> = (0..10).rev().map(f64::from).collect();
        assert_eq!(percentile(&values, 0.9), 8.0);
        assert_eq!(percentile(&values, 0.0), 0.0);
        assert_eq!(percentile(&values, 1.0), 9.0);
    }
}
