// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Force-directed layout (spring embedder)
//!
//! Paths act as springs whose rest length is the path distance rescaled into a
//! fixed band of the canvas width; every pair of trees repels. A cooling
//! temperature bounds how far a tree moves per step. Trees without paths are
//! pinned to fixed slots around the canvas, and a final pass pushes apart any
//! pair closer than the requested minimum distance.
//!
//! All randomness comes from the caller's RNG, so a seeded RNG gives a
//! reproducible layout.

use crate::graph::ForestGraph;
use crate::types::{Position, TreeId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Per-iteration temperature decay
const COOLING: f64 = 0.98;
/// Floor for pair distances, keeps forces finite for coincident trees
const MIN_SEPARATION: f64 = 0.01;
/// Repulsion strength relative to the larger canvas side
const REPULSION: f64 = 2.0;
/// Fraction of the canvas kept free on each side
const MARGIN: f64 = 0.05;
/// Pull-back factor for trees outside the margin
const BOUNDARY_PULL: f64 = 0.5;
/// Initial positions are drawn from this inset
const SPAWN_INSET: f64 = 0.1;
/// Spring rest lengths are rescaled into this band of the canvas width
const REST_LENGTH_BAND: (f64, f64) = (0.15, 0.7);
/// Upper bound on overlap-resolution passes
const OVERLAP_PASSES: usize = 50;

/// Canvas and simulation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Simulation steps
    pub iterations: usize,
    /// Smallest allowed distance between two trees after resolution
    pub min_distance: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            iterations: 400,
            min_distance: 20.0,
        }
    }
}

impl LayoutParams {
    fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x.max(MARGIN * self.width).min((1.0 - MARGIN) * self.width),
            y.max(MARGIN * self.height).min((1.0 - MARGIN) * self.height),
        )
    }

    /// Corner slots first, then edge midpoints
    fn isolated_slots(&self) -> [(f64, f64); 8] {
        let (w, h) = (self.width, self.height);
        [
            (0.15 * w, 0.15 * h),
            (0.85 * w, 0.15 * h),
            (0.15 * w, 0.85 * h),
            (0.85 * w, 0.85 * h),
            (0.5 * w, 0.15 * h),
            (0.85 * w, 0.5 * h),
            (0.5 * w, 0.85 * h),
            (0.15 * w, 0.5 * h),
        ]
    }
}

/// Lay out the whole forest
pub fn layout_forest<R: Rng>(
    graph: &ForestGraph,
    params: &LayoutParams,
    rng: &mut R,
) -> HashMap<TreeId, Position> {
    force_layout(&graph.tree_ids(), &graph.edges(), params, rng)
}

/// Compute a position for every node
///
/// `edges` holds `(a, b, distance)` triples; each unordered pair is used once
/// and edges naming nodes outside `nodes` are ignored. The result has exactly
/// one entry per distinct node id, inside the canvas.
pub fn force_layout<R: Rng>(
    nodes: &[TreeId],
    edges: &[(TreeId, TreeId, f64)],
    params: &LayoutParams,
    rng: &mut R,
) -> HashMap<TreeId, Position> {
    let mut index: HashMap<TreeId, usize> = HashMap::new();
    let mut order: Vec<TreeId> = Vec::new();
    for &id in nodes {
        index.entry(id).or_insert_with(|| {
            order.push(id);
            order.len() - 1
        });
    }
    let n = order.len();
    if n == 0 {
        return HashMap::new();
    }

    let (w, h) = (params.width, params.height);
    let mut pos: Vec<(f64, f64)> = (0..n)
        .map(|_| {
            (
                uniform(rng, SPAWN_INSET * w, (1.0 - SPAWN_INSET) * w),
                uniform(rng, SPAWN_INSET * h, (1.0 - SPAWN_INSET) * h),
            )
        })
        .collect();

    let springs = build_springs(&index, edges, w);

    let mut connected = vec![false; n];
    for &(i, j, _) in &springs {
        connected[i] = true;
        connected[j] = true;
    }
    let mut pinned: Vec<Option<(f64, f64)>> = vec![None; n];
    let mut slots = params.isolated_slots().into_iter();
    for i in (0..n).filter(|&i| !connected[i]) {
        let spot = match slots.next() {
            Some(slot) => slot,
            None => (
                uniform(rng, SPAWN_INSET * w, (1.0 - SPAWN_INSET) * w),
                uniform(rng, SPAWN_INSET * h, (1.0 - SPAWN_INSET) * h),
            ),
        };
        pinned[i] = Some(spot);
        pos[i] = spot;
    }

    let repulsion = REPULSION * w.max(h);
    let mut temperature = w.max(h);

    for _ in 0..params.iterations {
        temperature *= COOLING;
        let mut force = vec![(0.0_f64, 0.0_f64); n];

        for &(i, j, rest) in &springs {
            let (dx, dy) = (pos[j].0 - pos[i].0, pos[j].1 - pos[i].1);
            let d = dx.hypot(dy).max(MIN_SEPARATION);
            let k = (d - rest) / d;
            force[i].0 += k * dx;
            force[i].1 += k * dy;
            force[j].0 -= k * dx;
            force[j].1 -= k * dy;
        }

        for i in 0..n {
            for j in (i + 1)..n {
                let (dx, dy) = (pos[j].0 - pos[i].0, pos[j].1 - pos[i].1);
                let d = dx.hypot(dy).max(MIN_SEPARATION);
                let k = repulsion / (d * d);
                let (fx, fy) = (k * dx / d, k * dy / d);
                force[i].0 -= fx;
                force[i].1 -= fy;
                force[j].0 += fx;
                force[j].1 += fy;
            }
        }

        for (f, &(x, y)) in force.iter_mut().zip(&pos) {
            f.0 += boundary_push(x, w);
            f.1 += boundary_push(y, h);
        }

        for i in 0..n {
            if let Some(spot) = pinned[i] {
                pos[i] = spot;
                continue;
            }
            let (mut fx, mut fy) = force[i];
            let magnitude = fx.hypot(fy);
            if magnitude > temperature {
                fx *= temperature / magnitude;
                fy *= temperature / magnitude;
            }
            pos[i] = params.clamp(pos[i].0 + fx, pos[i].1 + fy);
        }
    }

    let passes = resolve_overlaps(&mut pos, params);
    debug!(
        nodes = n,
        springs = springs.len(),
        pinned = pinned.iter().filter(|p| p.is_some()).count(),
        overlap_passes = passes,
        "force layout finished"
    );

    order
        .into_iter()
        .zip(pos)
        .map(|(id, (x, y))| (id, Position::new(x, y)))
        .collect()
}

/// Deduplicated springs as `(i, j, rest length)` over node indices
fn build_springs(
    index: &HashMap<TreeId, usize>,
    edges: &[(TreeId, TreeId, f64)],
    width: f64,
) -> Vec<(usize, usize, f64)> {
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut springs: Vec<(usize, usize, f64)> = Vec::new();
    for &(a, b, weight) in edges {
        let (Some(&i), Some(&j)) = (index.get(&a), index.get(&b)) else {
            continue;
        };
        if i == j || !seen.insert((i.min(j), i.max(j))) {
            continue;
        }
        springs.push((i, j, weight));
    }

    if springs.is_empty() {
        return springs;
    }

    let lightest = springs.iter().map(|s| s.2).fold(f64::INFINITY, f64::min);
    let heaviest = springs.iter().map(|s| s.2).fold(f64::NEG_INFINITY, f64::max);
    let range = (heaviest - lightest).max(1.0);
    let (low, high) = (REST_LENGTH_BAND.0 * width, REST_LENGTH_BAND.1 * width);
    for spring in &mut springs {
        spring.2 = low + (spring.2 - lightest) * (high - low) / range;
    }
    springs
}

/// Inward force for a coordinate that has crossed the margin
fn boundary_push(value: f64, extent: f64) -> f64 {
    let (low, high) = (MARGIN * extent, (1.0 - MARGIN) * extent);
    if value < low {
        (low - value) * BOUNDARY_PULL
    } else if value > high {
        -(value - high) * BOUNDARY_PULL
    } else {
        0.0
    }
}

/// Push apart pairs closer than `min_distance`; returns the passes used
fn resolve_overlaps(pos: &mut [(f64, f64)], params: &LayoutParams) -> usize {
    let n = pos.len();
    for pass in 1..=OVERLAP_PASSES {
        let mut overlapping = false;
        for i in 0..n {
            for j in (i + 1)..n {
                let (x1, y1) = pos[i];
                let (x2, y2) = pos[j];
                let d = (x2 - x1).hypot(y2 - y1);
                if d >= params.min_distance {
                    continue;
                }
                overlapping = true;
                let angle = (y2 - y1).atan2(x2 - x1);
                let push = (params.min_distance - d) / 2.0;
                let (cos, sin) = (angle.cos(), angle.sin());
                pos[i] = params.clamp(x1 - push * cos, y1 - push * sin);
                pos[j] = params.clamp(x2 + push * cos, y2 + push * sin);
            }
        }
        if !overlapping {
            return pass;
        }
    }
    OVERLAP_PASSES
}

/// Uniform sample from `[low, high)`, or `low` for an empty range
fn uniform<R: Rng>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn params(size: f64, iterations: usize, min_distance: f64) -> LayoutParams {
        LayoutParams {
            width: size,
            height: size,
            iterations,
            min_distance,
        }
    }

    fn distance(layout: &HashMap<TreeId, Position>, a: TreeId, b: TreeId) -> f64 {
        layout[&a].distance_to(&layout[&b])
    }

    #[test]
    fn test_empty_input() {
        let layout = force_layout(&[], &[], &LayoutParams::default(), &mut rng());
        assert!(layout.is_empty());
    }

    #[test]
    fn test_line_of_three_respects_canvas_and_spacing() {
        let nodes = [1, 2, 3];
        let edges = [(1, 2, 1.0), (2, 1, 1.0), (2, 3, 1.0)];
        let layout = force_layout(&nodes, &edges, &params(100.0, 100, 10.0), &mut rng());

        let keys: HashSet<TreeId> = layout.keys().copied().collect();
        assert_eq!(keys, nodes.iter().copied().collect());
        for p in layout.values() {
            assert!((0.0..=100.0).contains(&p.x));
            assert!((0.0..=100.0).contains(&p.y));
        }
        for (a, b) in [(1, 2), (1, 3), (2, 3)] {
            assert!(distance(&layout, a, b) >= 10.0 - 1e-9);
        }
    }

    #[test]
    fn test_isolated_trees_take_corner_slots() {
        let layout = force_layout(&[3, 4, 5], &[], &params(100.0, 50, 20.0), &mut rng());

        let near = |p: Position, x: f64, y: f64| (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9;
        assert!(near(layout[&3], 15.0, 15.0));
        assert!(near(layout[&4], 85.0, 15.0));
        assert!(near(layout[&5], 15.0, 85.0));
    }

    #[test]
    fn test_isolated_trees_beyond_slots_stay_on_canvas() {
        let nodes: Vec<TreeId> = (1..=12).collect();
        let layout = force_layout(&nodes, &[], &params(400.0, 20, 5.0), &mut rng());

        assert_eq!(layout.len(), 12);
        for p in layout.values() {
            assert!((0.0..=400.0).contains(&p.x));
            assert!((0.0..=400.0).contains(&p.y));
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let nodes = [1, 2, 3, 4];
        let edges = [(1, 2, 3.0), (2, 3, 8.0), (3, 1, 5.0)];
        let p = params(200.0, 80, 15.0);

        let first = force_layout(&nodes, &edges, &p, &mut SmallRng::seed_from_u64(7));
        let second = force_layout(&nodes, &edges, &p, &mut SmallRng::seed_from_u64(7));
        assert_eq!(first, second);
    }

    #[test]
    fn test_heavier_path_is_drawn_longer() {
        let nodes = [1, 2, 3];
        let edges = [(1, 2, 1.0), (2, 3, 10.0)];
        let layout = force_layout(&nodes, &edges, &params(1000.0, 400, 20.0), &mut rng());

        assert!(distance(&layout, 2, 3) > distance(&layout, 1, 2));
    }

    #[test]
    fn test_edges_to_unknown_nodes_are_ignored() {
        let edges = [(1, 2, 4.0), (2, 9, 4.0)];
        let layout = force_layout(&[1, 2], &edges, &LayoutParams::default(), &mut rng());

        assert_eq!(layout.len(), 2);
        assert!(!layout.contains_key(&9));
    }

    #[test]
    fn test_rest_lengths_fill_the_band() {
        let index: HashMap<TreeId, usize> = [(1, 0), (2, 1), (3, 2)].into_iter().collect();
        let springs = build_springs(&index, &[(1, 2, 2.0), (2, 3, 6.0), (3, 2, 6.0)], 100.0);

        assert_eq!(springs.len(), 2);
        assert!((springs[0].2 - 15.0).abs() < 1e-9);
        assert!((springs[1].2 - 70.0).abs() < 1e-9);
    }
}
