// src/rendering/polyhedra.rs
// Coordination polyhedra: one convex hull per coordination shell.

use rayon::prelude::*;
use serde::Serialize;

use crate::model::Structure;
use crate::physics::coordination::{self, geometry_label, CoordinationShell, PolyhedraConfig};
use crate::utils::hull::{self, HullResult, Triangle};

/// A coordination polyhedron around a central atom.
///
/// The hull is built over `[center, neighbors...]`, so triangle indices are
/// 0 for the centre and `k + 1` for `neighbors[k]`. For a regular shell the
/// centre is interior and never appears in a face.
#[derive(Debug, Clone, Serialize)]
pub struct CoordinationPolyhedron {
    pub center_index: usize,
    pub element: String,
    pub center: [f64; 3],
    pub neighbors: Vec<[f64; 3]>,
    pub geometry_label: String,
    pub faces: Vec<Triangle>,
}

/// Shells to draw: explicit groups win; otherwise auto-detection for the
/// configured centre elements.
pub fn coordination_shells(
    structure: &Structure,
    config: &PolyhedraConfig,
) -> Vec<CoordinationShell> {
    if structure.coordination_groups().is_empty() {
        coordination::auto_shells(structure, config)
    } else {
        coordination::explicit_shells(structure)
    }
}

/// Hull one shell. `None` when the points are degenerate.
pub fn build_polyhedron(
    structure: &Structure,
    shell: &CoordinationShell,
) -> Option<CoordinationPolyhedron> {
    let mut points = Vec::with_capacity(shell.neighbors.len() + 1);
    points.push(shell.center);
    points.extend_from_slice(&shell.neighbors);

    match hull::build(&points) {
        HullResult::Faces(faces) => Some(CoordinationPolyhedron {
            center_index: shell.center_index,
            element: structure.atoms()[shell.center_index].element.clone(),
            center: shell.center,
            neighbors: shell.neighbors.clone(),
            geometry_label: geometry_label(shell.center, &shell.neighbors),
            faces,
        }),
        HullResult::Degenerate => {
            log::warn!(
                "Skipping polyhedron around atom {} (CN {}): degenerate geometry",
                shell.center_index,
                shell.coordination_number()
            );
            None
        }
    }
}

/// Build every polyhedron for the structure. Groups are independent, so
/// they are hulled in parallel; output keeps the shell order.
pub fn build_polyhedra(
    structure: &Structure,
    config: &PolyhedraConfig,
) -> Vec<CoordinationPolyhedron> {
    let shells = coordination_shells(structure, config);
    let polyhedra: Vec<CoordinationPolyhedron> = shells
        .par_iter()
        .filter_map(|shell| build_polyhedron(structure, shell))
        .collect();

    log::debug!("Built {} of {} coordination polyhedra", polyhedra.len(), shells.len());
    polyhedra
}
