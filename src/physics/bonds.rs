// src/physics/bonds.rs
// Distance-only bond inference. A topology-free heuristic: no radii table,
// no valence check. Swap this module out for a chemistry-aware policy if one
// is ever needed; nothing else depends on how bonds were chosen.

use rayon::prelude::*;
use serde::Serialize;

use crate::model::Atom;
use crate::utils::geometry::calculate_distance;

/// Pairs closer than this (Å) are treated as duplicate/overlapping sites.
pub const MIN_PAIR_DISTANCE: f64 = 0.1;

const MIN_WEIGHT: f64 = 0.3;
const AVG_WEIGHT: f64 = 0.7;
const THRESHOLD_FLOOR: f64 = 1.0;
const THRESHOLD_CEIL: f64 = 50.0;
const THRESHOLD_MARGIN: f64 = 1.2;

/// Unordered atom pair, stored with `i < j`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub distance: f64,
}

/// All pairs at or above [`MIN_PAIR_DISTANCE`], ordered by `(i, j)`.
pub fn pair_distances(atoms: &[Atom]) -> Vec<Bond> {
    let n = atoms.len();
    (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            (i + 1..n).map(move |j| Bond {
                i,
                j,
                distance: calculate_distance(atoms[i].cartesian, atoms[j].cartesian),
            })
        })
        .filter(|b| b.distance >= MIN_PAIR_DISTANCE)
        .collect()
}

/// `clamp(0.3 * d_min + 0.7 * d_avg, 1, 50) * 1.2`; `None` without pairs.
pub fn bond_threshold(pairs: &[Bond]) -> Option<f64> {
    if pairs.is_empty() {
        return None;
    }
    let d_min = pairs.iter().map(|b| b.distance).fold(f64::INFINITY, f64::min);
    let d_avg = pairs.iter().map(|b| b.distance).sum::<f64>() / pairs.len() as f64;
    let blended = MIN_WEIGHT * d_min + AVG_WEIGHT * d_avg;
    Some(blended.clamp(THRESHOLD_FLOOR, THRESHOLD_CEIL) * THRESHOLD_MARGIN)
}

/// Every pair strictly closer than the adaptive threshold.
pub fn infer_bonds(atoms: &[Atom]) -> Vec<Bond> {
    let pairs = pair_distances(atoms);
    let Some(threshold) = bond_threshold(&pairs) else {
        return Vec::new();
    };

    let bonds: Vec<Bond> = pairs.into_iter().filter(|b| b.distance < threshold).collect();
    log::debug!(
        "Bond threshold {:.3} Å -> {} bonds over {} atoms",
        threshold,
        bonds.len(),
        atoms.len()
    );
    bonds
}
