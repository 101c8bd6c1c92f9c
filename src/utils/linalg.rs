// src/utils/linalg.rs

use nalgebra::{Matrix3, Vector3};

pub type Lattice = [[f64; 3]; 3];

/// Lattice rows as a matrix: row `d` is basis vector `d` (a, b, c).
pub fn lattice_matrix(lattice: &Lattice) -> Matrix3<f64> {
  Matrix3::from_row_slice(&[
    lattice[0][0],
    lattice[0][1],
    lattice[0][2],
    lattice[1][0],
    lattice[1][1],
    lattice[1][2],
    lattice[2][0],
    lattice[2][1],
    lattice[2][2],
  ])
}

/// Convert fractional coordinates to Cartesian using the lattice matrix
///
/// # Arguments
/// * `frac` - Fractional coordinates [x, y, z], conventionally in [0, 1)
/// * `lattice` - Lattice vectors as rows [[ax, ay, az], [bx, by, bz], [cx, cy, cz]]
///
/// # Formula
/// ```text
/// cart[k] = Σ_d frac[d] * lattice[d][k]     (row vector times lattice)
/// ```
pub fn frac_to_cart(frac: [f64; 3], lattice: &Lattice) -> [f64; 3] {
  let cart = lattice_matrix(lattice).transpose() * Vector3::from(frac);
  [cart.x, cart.y, cart.z]
}

/// Inverse of [`frac_to_cart`]. `None` if the lattice is singular.
pub fn cart_to_frac(cart: [f64; 3], lattice: &Lattice) -> Option<[f64; 3]> {
  let inv = lattice_matrix(lattice).transpose().try_inverse()?;
  let frac = inv * Vector3::from(cart);
  Some([frac.x, frac.y, frac.z])
}

pub fn lattice_determinant(lattice: &Lattice) -> f64 {
  lattice_matrix(lattice).determinant()
}

/// Cell volume in Å³.
pub fn lattice_volume(lattice: &Lattice) -> f64 {
  lattice_determinant(lattice).abs()
}

/// Standard crystallographic setting: `a` along x, `b` in the xy-plane,
/// `c` completing a right-handed cell. Angles in degrees.
///
/// Returns `None` for non-positive lengths or an angle set that does not
/// span a cell.
pub fn lattice_from_parameters(
  a: f64,
  b: f64,
  c: f64,
  alpha: f64,
  beta: f64,
  gamma: f64,
) -> Option<Lattice> {
  if !(a > 0.0 && b > 0.0 && c > 0.0) {
    return None;
  }
  let (ca, cb) = (alpha.to_radians().cos(), beta.to_radians().cos());
  let (sg, cg) = gamma.to_radians().sin_cos();
  if sg.abs() < 1e-12 {
    return None;
  }

  let cx = c * cb;
  let cy = c * (ca - cb * cg) / sg;
  let cz_sq = c * c - cx * cx - cy * cy;
  if !(cz_sq > 0.0) {
    return None;
  }

  Some([
    [a, 0.0, 0.0],
    [b * cg, b * sg, 0.0],
    [cx, cy, cz_sq.sqrt()],
  ])
}

/// The 8 cell corners, index = x + 2y + 4z over fractional {0,1}³.
pub fn cell_corners(lattice: &Lattice) -> [[f64; 3]; 8] {
  let mut corners = [[0.0; 3]; 8];
  for (i, corner) in corners.iter_mut().enumerate() {
    let f = [(i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64];
    *corner = frac_to_cart(f, lattice);
  }
  corners
}

/// Corner index pairs of the 12 parallelepiped edges.
pub const CELL_EDGES: [(usize, usize); 12] = [
  (0, 1),
  (0, 2),
  (0, 4),
  (1, 3),
  (1, 5),
  (2, 3),
  (2, 6),
  (4, 5),
  (4, 6),
  (7, 6),
  (7, 5),
  (7, 3),
];
