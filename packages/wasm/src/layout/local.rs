//! Deterministic local cluster layout.
//!
//! Used whenever the remote layout service is disabled, slow, or failing.
//!
//! # Algorithm Overview
//!
//! 1. **Cluster radius:** each cluster gets `base_radius + radius_per_member * count`.
//! 2. **Cluster centers:** a single cluster sits at the viewport center. Two or
//!    more are placed on a ring around the viewport center, each taking an arc
//!    proportional to its diameter. The ring radius is the larger of a fixed
//!    fraction of the viewport and the smallest radius at which every pair of
//!    cluster circles is at least `cluster_gap` apart.
//! 3. **Containment:** if that ring pushes a cluster circle past the viewport
//!    edge, the centers are pulled toward the viewport center until every
//!    circle fits. Cluster radii are left alone, so crowded viewports trade
//!    the gap (and eventually overlap) for visibility.
//! 4. **Members:** a lone member sits on its cluster center; otherwise member
//!    `i` of `N` sits on the cluster circle at angle `i / N * 2π`.
//!
//! Positions depend only on the cluster data and the viewport size, so two runs
//! on the same input produce identical coordinates.

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::cluster::{ClusterData, Point};

/// Configuration for the local layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalLayoutConfig {
    /// Radius of an empty cluster circle (default: 20.0).
    pub base_radius: f64,
    /// Radius added per member (default: 4.0).
    pub radius_per_member: f64,
    /// Minimum clearance between neighboring cluster circles (default: 40.0).
    pub cluster_gap: f64,
    /// Minimum ring radius as a fraction of the smaller viewport side (default: 0.3).
    pub viewport_spread: f64,
}

impl Default for LocalLayoutConfig {
    fn default() -> Self {
        Self {
            base_radius: 20.0,
            radius_per_member: 4.0,
            cluster_gap: 40.0,
            viewport_spread: 0.3,
        }
    }
}

impl LocalLayoutConfig {
    /// Layout radius of a cluster with `count` members.
    #[inline]
    pub fn cluster_radius(&self, count: usize) -> f64 {
        self.base_radius + self.radius_per_member * count as f64
    }
}

/// Position every cluster and node of `data` inside a `width` x `height` viewport.
///
/// Returns a positioned copy; the input is left untouched.
pub fn compute_local_layout(
    data: &ClusterData,
    width: f64,
    height: f64,
    config: &LocalLayoutConfig,
) -> ClusterData {
    let mut positioned = data.clone();
    if positioned.clusters.is_empty() {
        return positioned;
    }

    let radii: Vec<f64> = positioned
        .clusters
        .iter()
        .map(|c| config.cluster_radius(c.count))
        .collect();
    let centers = place_cluster_centers(&radii, width, height, config);

    for (cluster, &center) in positioned.clusters.iter_mut().zip(&centers) {
        cluster.position = Some(center);
    }

    for (slot, cluster) in data.clusters.iter().enumerate() {
        let members: Vec<usize> = positioned
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.cluster == cluster.name)
            .map(|(i, _)| i)
            .collect();
        place_members(&mut positioned, &members, centers[slot], radii[slot]);
    }

    positioned
}

/// Compute cluster centers for clusters of the given radii.
fn place_cluster_centers(
    radii: &[f64],
    width: f64,
    height: f64,
    config: &LocalLayoutConfig,
) -> Vec<Point> {
    let center = Point::new(width / 2.0, height / 2.0);
    if radii.len() == 1 {
        return vec![center];
    }

    // Each cluster owns an arc proportional to its diameter plus the gap.
    let shares: Vec<f64> = radii.iter().map(|r| 2.0 * r + config.cluster_gap).collect();
    let total: f64 = shares.iter().sum();

    let mut angles = Vec::with_capacity(shares.len());
    let mut consumed = 0.0;
    for share in &shares {
        angles.push(-FRAC_PI_2 + (consumed + share / 2.0) / total * TAU);
        consumed += share;
    }

    // Smallest ring radius keeping every pair of circles apart:
    // chord = 2R·sin(Δ/2) >= r_i + r_j + gap
    let mut ring = config.viewport_spread * width.min(height).max(0.0);
    for i in 0..radii.len() {
        for j in (i + 1)..radii.len() {
            let delta = angular_distance(angles[i], angles[j]);
            let needed = (radii[i] + radii[j] + config.cluster_gap) / (2.0 * (delta / 2.0).sin());
            ring = ring.max(needed);
        }
    }

    let offsets: Vec<Point> = angles
        .iter()
        .map(|a| Point::new(ring * a.cos(), ring * a.sin()))
        .collect();
    let scale = containment_scale(&offsets, radii, width, height);

    offsets
        .iter()
        .map(|o| Point::new(center.x + o.x * scale, center.y + o.y * scale))
        .collect()
}

/// Largest factor in `[0, 1]` by which the center offsets can be scaled so
/// every circle stays inside the viewport.
fn containment_scale(offsets: &[Point], radii: &[f64], width: f64, height: f64) -> f64 {
    let mut scale: f64 = 1.0;
    for (offset, &radius) in offsets.iter().zip(radii) {
        let room_x = (width / 2.0 - radius).max(0.0);
        let room_y = (height / 2.0 - radius).max(0.0);
        if offset.x.abs() > room_x {
            scale = scale.min(room_x / offset.x.abs());
        }
        if offset.y.abs() > room_y {
            scale = scale.min(room_y / offset.y.abs());
        }
    }
    scale
}

/// Angle between two directions, in `[0, π]`.
fn angular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}

/// Place the nodes at `members` on the circle of `radius` around `center`.
fn place_members(data: &mut ClusterData, members: &[usize], center: Point, radius: f64) {
    let n = members.len();

    if n == 1 {
        data.nodes[members[0]].position = Some(center);
        return;
    }

    for (i, &node) in members.iter().enumerate() {
        let theta = i as f64 / n as f64 * TAU;
        data.nodes[node].position = Some(Point::new(
            center.x + radius * theta.cos(),
            center.y + radius * theta.sin(),
        ));
    }
}
