// src/physics/bounds.rs

use serde::Serialize;

use crate::model::Atom;

/// Axis-aligned extent of the atoms plus their centroid.
///
/// `center` is the mean atom position, not the box midpoint, so a lopsided
/// structure stays visually balanced when the camera looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StructureBounds {
    pub min: [f64; 3],
    pub max: [f64; 3],
    pub center: [f64; 3],
    pub size: [f64; 3],
}

impl StructureBounds {
    /// Used for an empty atom set so nothing downstream divides by zero.
    pub const FALLBACK: StructureBounds = StructureBounds {
        min: [-5.0, -5.0, -5.0],
        max: [5.0, 5.0, 5.0],
        center: [0.0, 0.0, 0.0],
        size: [10.0, 10.0, 10.0],
    };

    pub fn max_extent(&self) -> f64 {
        self.size.iter().copied().fold(0.0, f64::max)
    }

    pub fn min_extent(&self) -> f64 {
        self.size.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn mean_extent(&self) -> f64 {
        self.size.iter().sum::<f64>() / 3.0
    }

    pub fn box_volume(&self) -> f64 {
        self.size.iter().product()
    }
}

/// Single pass over the Cartesian positions.
pub fn compute_bounds(atoms: &[Atom]) -> StructureBounds {
    if atoms.is_empty() {
        return StructureBounds::FALLBACK;
    }

    let mut min = [f64::MAX; 3];
    let mut max = [f64::MIN; 3];
    let mut sum = [0.0; 3];
    for atom in atoms {
        for k in 0..3 {
            let v = atom.cartesian[k];
            min[k] = min[k].min(v);
            max[k] = max[k].max(v);
            sum[k] += v;
        }
    }

    let n = atoms.len() as f64;
    // Rounding in the mean can leave it a hair outside a flat axis
    let center = [0, 1, 2].map(|k| (sum[k] / n).clamp(min[k], max[k]));
    StructureBounds {
        min,
        max,
        center,
        size: [0, 1, 2].map(|k| max[k] - min[k]),
    }
}

/// Descriptive statistics consumed by the framing heuristics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureCharacteristics {
    pub atom_count: usize,
    /// Atoms per Å³ of bounding box (box volume floored at 1 Å³).
    pub packing_density: f64,
    pub distinct_elements: usize,
    /// Distinct element symbols in first-appearance order.
    pub elements: Vec<String>,
    /// Longest over shortest box side, each side floored at 1 Å.
    pub aspect_ratio: f64,
}

pub fn analyze_characteristics(atoms: &[Atom]) -> StructureCharacteristics {
    let bounds = compute_bounds(atoms);

    let mut elements: Vec<String> = Vec::new();
    for atom in atoms {
        if !elements.iter().any(|e| *e == atom.element) {
            elements.push(atom.element.clone());
        }
    }

    let packing_density = atoms.len() as f64 / bounds.box_volume().max(1.0);
    let aspect_ratio = bounds.max_extent().max(1.0) / bounds.min_extent().max(1.0);

    StructureCharacteristics {
        atom_count: atoms.len(),
        packing_density,
        distinct_elements: elements.len(),
        elements,
        aspect_ratio,
    }
}
