// src/physics/coordination.rs
// Coordination shells: which atoms (or periodic images of atoms) surround a
// given centre, and a descriptive label for the resulting geometry.

use serde::{Deserialize, Serialize};

use crate::model::Structure;
use crate::physics::bonds::MIN_PAIR_DISTANCE;
use crate::utils::geometry::{calculate_angle, calculate_distance};

/// Angles wider than this count as "opposite" neighbours (trans pairs).
const TRANS_ANGLE: f64 = 150.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolyhedraConfig {
    /// Centre elements to auto-detect polyhedra for when the source gives
    /// no explicit groups. Empty means none.
    pub elements: Vec<String>,
    /// Shell cut-off as a fraction above the nearest-neighbour distance.
    pub shell_tolerance: f64,
    pub min_cn: usize,
    pub max_cn: usize,
}

impl Default for PolyhedraConfig {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            shell_tolerance: 0.15,
            min_cn: 4,
            max_cn: 12,
        }
    }
}

/// A centre atom and the Cartesian positions of its neighbours.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoordinationShell {
    pub center_index: usize,
    pub center: [f64; 3],
    /// Atom index of each neighbour (periodic images share the index).
    pub neighbor_indices: Vec<usize>,
    pub neighbors: Vec<[f64; 3]>,
}

impl CoordinationShell {
    pub fn coordination_number(&self) -> usize {
        self.neighbors.len()
    }
}

/// Shells for the groups the structure source supplied, positions taken
/// straight from the atoms (no periodic images).
pub fn explicit_shells(structure: &Structure) -> Vec<CoordinationShell> {
    let atoms = structure.atoms();
    structure
        .coordination_groups()
        .iter()
        .map(|g| CoordinationShell {
            center_index: g.center_index,
            center: atoms[g.center_index].cartesian,
            neighbor_indices: g.neighbor_indices.clone(),
            neighbors: g.neighbor_indices.iter().map(|&j| atoms[j].cartesian).collect(),
        })
        .collect()
}

/// Nearest-neighbour shell of atom `center_index`, searching the 27 cells
/// around the origin cell so atoms on a cell face still see a full shell.
pub fn find_shell(
    structure: &Structure,
    center_index: usize,
    shell_tolerance: f64,
) -> CoordinationShell {
    let atoms = structure.atoms();
    let lattice = structure.lattice();
    let center = atoms[center_index].cartesian;

    let mut candidates: Vec<(f64, usize, [f64; 3])> = Vec::new();
    for (j, atom) in atoms.iter().enumerate() {
        for a in -1..=1 {
            for b in -1..=1 {
                for c in -1..=1 {
                    let shift = [a as f64, b as f64, c as f64];
                    let p = [0, 1, 2].map(|k| {
                        atom.cartesian[k]
                            + shift[0] * lattice[0][k]
                            + shift[1] * lattice[1][k]
                            + shift[2] * lattice[2][k]
                    });
                    let d = calculate_distance(center, p);
                    if d >= MIN_PAIR_DISTANCE {
                        candidates.push((d, j, p));
                    }
                }
            }
        }
    }

    candidates.sort_by(|x, y| x.0.total_cmp(&y.0));
    let cutoff = candidates
        .first()
        .map_or(0.0, |(d_nn, _, _)| d_nn * (1.0 + shell_tolerance.max(0.0)));
    let shell: Vec<_> = candidates.into_iter().take_while(|(d, _, _)| *d <= cutoff).collect();

    CoordinationShell {
        center_index,
        center,
        neighbor_indices: shell.iter().map(|(_, j, _)| *j).collect(),
        neighbors: shell.iter().map(|(_, _, p)| *p).collect(),
    }
}

/// Shells for every atom whose element is listed in `config.elements`,
/// keeping only coordination numbers in `[min_cn, max_cn]`.
pub fn auto_shells(structure: &Structure, config: &PolyhedraConfig) -> Vec<CoordinationShell> {
    structure
        .atoms()
        .iter()
        .enumerate()
        .filter(|(_, atom)| config.elements.contains(&atom.element))
        .map(|(i, _)| find_shell(structure, i, config.shell_tolerance))
        .filter(|s| (config.min_cn..=config.max_cn).contains(&s.coordination_number()))
        .collect()
}

/// Number of neighbour pairs that sit roughly opposite each other.
fn trans_pairs(center: [f64; 3], neighbors: &[[f64; 3]]) -> usize {
    let mut count = 0;
    for i in 0..neighbors.len() {
        for j in (i + 1)..neighbors.len() {
            if calculate_angle(neighbors[i], center, neighbors[j]) > TRANS_ANGLE {
                count += 1;
            }
        }
    }
    count
}

/// Informational geometry name. Never consulted by the hull builder.
pub fn geometry_label(center: [f64; 3], neighbors: &[[f64; 3]]) -> String {
    let trans = trans_pairs(center, neighbors);
    let label = match (neighbors.len(), trans) {
        (2, 1) => "linear",
        (2, _) => "bent",
        (3, _) => {
            let mut sum = 0.0;
            for i in 0..3 {
                sum += calculate_angle(neighbors[i], center, neighbors[(i + 1) % 3]);
            }
            if (sum - 360.0).abs() < 5.0 {
                "trigonal planar"
            } else {
                "trigonal pyramidal"
            }
        }
        (4, t) if t >= 2 => "square planar",
        (4, _) => "tetrahedral",
        (5, 1) => "trigonal bipyramidal",
        (5, t) if t >= 2 => "square pyramidal",
        (6, 3) => "octahedral",
        (6, 0) => "trigonal prismatic",
        (8, 4) => "cubic",
        (8, 0) => "square antiprismatic",
        (12, 6) => "cuboctahedral",
        (12, _) => "anticuboctahedral",
        (n, _) => return format!("CN-{}", n),
    };
    label.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CoordinationGroup, Site};

    fn site(el: &str, f: [f64; 3]) -> Site {
        Site {
            element: el.to_string(),
            fractional: f,
        }
    }

    fn rock_salt(a: f64) -> Structure {
        let lattice = [[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]];
        Structure::new(
            lattice,
            vec![
                site("Na", [0.0, 0.0, 0.0]),
                site("Na", [0.5, 0.5, 0.0]),
                site("Na", [0.5, 0.0, 0.5]),
                site("Na", [0.0, 0.5, 0.5]),
                site("Cl", [0.0, 0.0, 0.5]),
                site("Cl", [0.5, 0.5, 0.5]),
                site("Cl", [0.5, 0.0, 0.0]),
                site("Cl", [0.0, 0.5, 0.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_corner_atom_sees_full_octahedron() {
        let s = rock_salt(5.59);
        let shell = find_shell(&s, 0, 0.15);
        assert_eq!(shell.coordination_number(), 6);
        for (&j, p) in shell.neighbor_indices.iter().zip(&shell.neighbors) {
            assert_eq!(s.atoms()[j].element, "Cl");
            assert!((calculate_distance(shell.center, *p) - 2.795).abs() < 1e-9);
        }
        assert_eq!(geometry_label(shell.center, &shell.neighbors), "octahedral");
    }

    #[test]
    fn test_auto_shells_respect_config() {
        let s = rock_salt(5.59);
        let config = PolyhedraConfig {
            elements: vec!["Na".to_string()],
            ..Default::default()
        };
        let shells = auto_shells(&s, &config);
        assert_eq!(shells.len(), 4);
        assert!(shells.iter().all(|sh| sh.coordination_number() == 6));

        let strict = PolyhedraConfig {
            max_cn: 5,
            ..config
        };
        assert!(auto_shells(&s, &strict).is_empty());
        assert!(auto_shells(&s, &PolyhedraConfig::default()).is_empty());
    }

    #[test]
    fn test_explicit_shells() {
        let s = rock_salt(5.59)
            .with_coordination_groups(vec![CoordinationGroup {
                center_index: 5,
                neighbor_indices: vec![1, 2, 3],
            }])
            .unwrap();
        let shells = explicit_shells(&s);
        assert_eq!(shells.len(), 1);
        assert_eq!(shells[0].center, s.atoms()[5].cartesian);
        assert_eq!(shells[0].neighbors[2], s.atoms()[3].cartesian);
    }

    #[test]
    fn test_labels() {
        let o = [0.0, 0.0, 0.0];
        let tetra = [
            [1.0, 1.0, 1.0],
            [1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
        ];
        assert_eq!(geometry_label(o, &tetra), "tetrahedral");

        let square = [[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, -1.0, 0.0]];
        assert_eq!(geometry_label(o, &square), "square planar");

        assert_eq!(geometry_label(o, &[[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0]]), "linear");
        assert_eq!(geometry_label(o, &[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]), "bent");

        let trigonal = [[1.0, 0.0, 0.0], [-0.5, 0.866, 0.0], [-0.5, -0.866, 0.0]];
        assert_eq!(geometry_label(o, &trigonal), "trigonal planar");

        let tbp = [
            [1.0, 0.0, 0.0],
            [-0.5, 0.866, 0.0],
            [-0.5, -0.866, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ];
        assert_eq!(geometry_label(o, &tbp), "trigonal bipyramidal");

        let mut cube = Vec::new();
        for i in 0..8 {
            cube.push([
                if i & 1 == 0 { -1.0 } else { 1.0 },
                if i & 2 == 0 { -1.0 } else { 1.0 },
                if i & 4 == 0 { -1.0 } else { 1.0 },
            ]);
        }
        assert_eq!(geometry_label(o, &cube), "cubic");
        assert_eq!(geometry_label(o, &cube[..7]), "CN-7");
    }
}
