// src/model/structure.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::linalg::{frac_to_cart, lattice_determinant, lattice_volume, Lattice};

/// Below this |det| (Å³) a lattice is treated as singular.
const MIN_CELL_VOLUME: f64 = 1e-6;

// --- Errors ---

/// A structure that cannot be loaded. The whole load is rejected; no atom is
/// ever patched with a substitute position.
#[derive(Debug, Clone, PartialEq)]
pub enum StructureError {
    MalformedLattice { rows: usize, detail: String },
    InvalidLatticeParameters,
    SingularLattice,
    MissingElement { site: usize },
    MissingFractional { site: usize },
    MalformedFractional { site: usize, len: usize },
    NonFinite { site: usize },
    CoordinationIndex { group: usize, index: usize },
    InvalidSupercell { nx: u32, ny: u32, nz: u32 },
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StructureError::MalformedLattice { rows, detail } => {
                write!(f, "Lattice must be 3x3, got {} rows ({})", rows, detail)
            }
            StructureError::InvalidLatticeParameters => {
                write!(f, "Cell parameters do not describe a valid cell")
            }
            StructureError::SingularLattice => write!(f, "Lattice matrix is singular"),
            StructureError::MissingElement { site } => {
                write!(f, "Site {} has no element symbol", site)
            }
            StructureError::MissingFractional { site } => {
                write!(f, "Site {} has no fractional coordinates", site)
            }
            StructureError::MalformedFractional { site, len } => write!(
                f,
                "Site {} fractional coordinates need 3 components, got {}",
                site, len
            ),
            StructureError::NonFinite { site } => {
                write!(f, "Site {} has non-finite coordinates", site)
            }
            StructureError::CoordinationIndex { group, index } => write!(
                f,
                "Coordination group {} references missing atom {}",
                group, index
            ),
            StructureError::InvalidSupercell { nx, ny, nz } => {
                write!(
                    f,
                    "Supercell {}x{}x{} needs at least 1 on every axis \
                     and a representable atom count",
                    nx, ny, nz
                )
            }
        }
    }
}

impl std::error::Error for StructureError {}

// --- Data ---

/// `cartesian` is always `fractional · lattice` of the owning structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub element: String,
    pub fractional: [f64; 3],
    pub cartesian: [f64; 3],
}

/// Input site before the Cartesian position is derived.
#[derive(Clone, Debug, PartialEq)]
pub struct Site {
    pub element: String,
    pub fractional: [f64; 3],
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinationGroup {
    pub center_index: usize,
    pub neighbor_indices: Vec<usize>,
}

/// An immutable, validated crystal structure.
#[derive(Clone, Debug, Serialize)]
pub struct Structure {
    lattice: Lattice,
    atoms: Vec<Atom>,
    formula: String,
    coordination_groups: Vec<CoordinationGroup>,
}

impl Structure {
    pub fn new(lattice: Lattice, sites: Vec<Site>) -> Result<Self, StructureError> {
        if lattice.iter().flatten().any(|v| !v.is_finite()) {
            return Err(StructureError::MalformedLattice {
                rows: 3,
                detail: "non-finite entry".to_string(),
            });
        }
        if lattice_determinant(&lattice).abs() < MIN_CELL_VOLUME {
            return Err(StructureError::SingularLattice);
        }

        let mut atoms = Vec::with_capacity(sites.len());
        for (i, site) in sites.into_iter().enumerate() {
            if site.fractional.iter().any(|v| !v.is_finite()) {
                return Err(StructureError::NonFinite { site: i });
            }
            atoms.push(Atom {
                cartesian: frac_to_cart(site.fractional, &lattice),
                element: site.element,
                fractional: site.fractional,
            });
        }

        let formula = reduced_formula(&atoms);
        Ok(Self {
            lattice,
            atoms,
            formula,
            coordination_groups: Vec::new(),
        })
    }

    /// Attach pre-identified coordination groups, checking every index.
    pub fn with_coordination_groups(
        mut self,
        groups: Vec<CoordinationGroup>,
    ) -> Result<Self, StructureError> {
        let n = self.atoms.len();
        for (g, group) in groups.iter().enumerate() {
            let bad = std::iter::once(group.center_index)
                .chain(group.neighbor_indices.iter().copied())
                .find(|&idx| idx >= n);
            if let Some(index) = bad {
                return Err(StructureError::CoordinationIndex { group: g, index });
            }
        }
        self.coordination_groups = groups;
        Ok(self)
    }

    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = formula.into();
        self
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn coordination_groups(&self) -> &[CoordinationGroup] {
        &self.coordination_groups
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Cell volume in Å³.
    pub fn volume(&self) -> f64 {
        lattice_volume(&self.lattice)
    }

    /// Replicate the cell `nx × ny × nz` times. Fractional coordinates are
    /// re-expressed in the enlarged cell. Explicit coordination groups refer
    /// to the old indices and are not carried over.
    ///
    /// Fails on a zero axis or when the atom count would overflow `usize`.
    pub fn supercell(&self, nx: u32, ny: u32, nz: u32) -> Result<Structure, StructureError> {
        let invalid = StructureError::InvalidSupercell { nx, ny, nz };
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(invalid);
        }
        let capacity = (nx as usize)
            .checked_mul(ny as usize)
            .and_then(|c| c.checked_mul(nz as usize))
            .and_then(|c| c.checked_mul(self.atoms.len()))
            .ok_or(invalid)?;
        let n = [nx as f64, ny as f64, nz as f64];
        let mut lattice = self.lattice;
        for (row, scale) in lattice.iter_mut().zip(n) {
            for v in row.iter_mut() {
                *v *= scale;
            }
        }

        let mut sites = Vec::with_capacity(capacity);
        // An empty cell replicates to an empty cell; skip the image loops
        let images = if self.is_empty() { 0 } else { nx };
        for x in 0..images {
            for y in 0..ny {
                for z in 0..nz {
                    let shift = [x as f64, y as f64, z as f64];
                    for atom in &self.atoms {
                        let f = atom.fractional;
                        sites.push(Site {
                            element: atom.element.clone(),
                            fractional: [
                                (f[0] + shift[0]) / n[0],
                                (f[1] + shift[1]) / n[1],
                                (f[2] + shift[2]) / n[2],
                            ],
                        });
                    }
                }
            }
        }

        let formula = format!("{} ({}x{}x{} Supercell)", self.formula, nx, ny, nz);
        Ok(Structure::new(lattice, sites)?.with_formula(formula))
    }
}

/// "Na4Cl4" -> "NaCl", elements in first-appearance order.
pub fn reduced_formula(atoms: &[Atom]) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for atom in atoms {
        match counts.iter_mut().find(|(el, _)| *el == atom.element) {
            Some((_, c)) => *c += 1,
            None => counts.push((atom.element.as_str(), 1)),
        }
    }
    let divisor = counts.iter().fold(0, |g, &(_, c)| gcd(g, c)).max(1);

    let mut formula = String::new();
    for (el, c) in counts {
        formula.push_str(el);
        if c / divisor > 1 {
            formula.push_str(&(c / divisor).to_string());
        }
    }
    formula
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(el: &str, f: [f64; 3]) -> Site {
        Site {
            element: el.to_string(),
            fractional: f,
        }
    }

    fn cubic(a: f64) -> Lattice {
        [[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]]
    }

    #[test]
    fn test_cartesian_is_derived() {
        let s = Structure::new(cubic(4.0), vec![site("Fe", [0.5, 0.25, 0.0])]).unwrap();
        assert_eq!(s.atoms()[0].cartesian, [2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_singular_lattice_rejected() {
        let flat = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]];
        let err = Structure::new(flat, vec![site("O", [0.0; 3])]).unwrap_err();
        assert_eq!(err, StructureError::SingularLattice);
    }

    #[test]
    fn test_non_finite_site_rejected() {
        let err = Structure::new(
            cubic(3.0),
            vec![site("O", [0.0; 3]), site("O", [f64::NAN, 0.0, 0.0])],
        )
        .unwrap_err();
        assert_eq!(err, StructureError::NonFinite { site: 1 });
    }

    #[test]
    fn test_coordination_index_checked() {
        let s = Structure::new(cubic(3.0), vec![site("O", [0.0; 3]), site("Ti", [0.5; 3])]).unwrap();
        let bad = vec![CoordinationGroup {
            center_index: 1,
            neighbor_indices: vec![0, 5],
        }];
        let err = s.with_coordination_groups(bad).unwrap_err();
        assert_eq!(err, StructureError::CoordinationIndex { group: 0, index: 5 });
    }

    #[test]
    fn test_reduced_formula() {
        let s = Structure::new(
            cubic(5.0),
            vec![
                site("Na", [0.0; 3]),
                site("Na", [0.5, 0.5, 0.0]),
                site("Cl", [0.5, 0.0, 0.0]),
                site("Cl", [0.0, 0.5, 0.0]),
            ],
        )
        .unwrap();
        assert_eq!(s.formula(), "NaCl");

        let t = Structure::new(
            cubic(5.0),
            vec![site("Ti", [0.0; 3]), site("O", [0.5; 3]), site("O", [0.25; 3])],
        )
        .unwrap();
        assert_eq!(t.formula(), "TiO2");
    }

    #[test]
    fn test_supercell() {
        let s = Structure::new(cubic(2.0), vec![site("Cu", [0.5, 0.5, 0.5])]).unwrap();
        let big = s.supercell(2, 1, 3).unwrap();
        assert_eq!(big.atoms().len(), 6);
        assert!((big.volume() - 6.0 * s.volume()).abs() < 1e-9);
        assert!(big.formula().contains("2x1x3"));

        // Cartesian image positions are unit translations of the source atom
        let last = big.atoms().last().unwrap();
        assert!((last.cartesian[0] - 3.0).abs() < 1e-12);
        assert!((last.cartesian[1] - 1.0).abs() < 1e-12);
        assert!((last.cartesian[2] - 5.0).abs() < 1e-12);

        assert!(s.supercell(0, 1, 1).is_err());
    }

    #[test]
    fn test_huge_supercell_does_not_overflow() {
        let empty = Structure::new(cubic(1.0), vec![]).unwrap();
        let big = empty.supercell(70000, 70000, 1).unwrap();
        assert!(big.is_empty());
        assert!((big.volume() - 4.9e9).abs() < 1.0);

        let one = Structure::new(cubic(1.0), vec![site("Cu", [0.0; 3])]).unwrap();
        let err = one.supercell(u32::MAX, u32::MAX, u32::MAX).unwrap_err();
        assert_eq!(
            err,
            StructureError::InvalidSupercell {
                nx: u32::MAX,
                ny: u32::MAX,
                nz: u32::MAX
            }
        );
    }
}
