// src/rendering/scene.rs

use serde::Serialize;

use crate::config::Config;
use crate::model::elements::element_style;
use crate::model::Structure;
use crate::physics::bonds::{infer_bonds, Bond};
use crate::physics::bounds::{analyze_characteristics, compute_bounds, StructureBounds};
use crate::rendering::camera::{frame_with, Camera, CameraMode};
use crate::rendering::polyhedra::{build_polyhedra, CoordinationPolyhedron};
use crate::rendering::primitives::{Primitive, SegmentRole};
use crate::utils::linalg::{cell_corners, CELL_EDGES};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
  pub width: f64,
  pub height: f64,
}

impl Viewport {
  pub fn new(width: f64, height: f64) -> Self {
    Self { width, height }
  }

  /// Width over height; 1.0 for a zero or invalid height.
  pub fn aspect(&self) -> f64 {
    if self.height > 0.0 && self.width.is_finite() && self.height.is_finite() {
      self.width / self.height
    } else {
      1.0
    }
  }
}

impl Default for Viewport {
  fn default() -> Self {
    Self::new(800.0, 600.0)
  }
}

/// Everything the render surface needs for one frame. Rebuilt wholesale on
/// every recompute.
#[derive(Debug, Clone, Serialize)]
pub struct Scene {
  pub formula: String,
  pub primitives: Vec<Primitive>,
  pub camera: Camera,
  pub camera_mode: CameraMode,
  pub bounds: StructureBounds,
  pub bonds: Vec<Bond>,
  pub polyhedra: Vec<CoordinationPolyhedron>,
}

impl Scene {
  pub fn markers(&self) -> impl Iterator<Item = &Primitive> {
    self.primitives.iter().filter(|p| p.is_marker())
  }

  pub fn segments(&self, role: SegmentRole) -> impl Iterator<Item = &Primitive> {
    self.primitives.iter().filter(move |p| p.segment_role() == Some(role))
  }

  pub fn meshes(&self) -> impl Iterator<Item = &Primitive> {
    self.primitives.iter().filter(|p| p.is_mesh())
  }
}

/// Pure function of (structure, parameters, viewport, camera mode).
///
/// The camera is framed only in `Auto` mode; a `UserHeld` pose is passed
/// through untouched. Primitive order: atom markers grouped by element,
/// bonds, the 12 cell edges, polyhedron meshes.
pub fn calculate_scene(
  structure: Option<&Structure>,
  config: &Config,
  viewport: Viewport,
  camera_mode: CameraMode,
) -> Scene {
  let params = config.display.sanitized();
  let style = &config.style;
  let scale = params.scale_factor;

  let atoms = structure.map(|s| s.atoms()).unwrap_or(&[]);
  let bounds = compute_bounds(atoms);
  let camera = match camera_mode {
    CameraMode::Auto => {
      let characteristics = analyze_characteristics(atoms);
      frame_with(&config.framing, &bounds, &characteristics, viewport.aspect())
    }
    CameraMode::UserHeld(held) => held,
  };

  let mut scene = Scene {
    formula: structure.map(|s| s.formula().to_string()).unwrap_or_default(),
    primitives: Vec::new(),
    camera,
    camera_mode,
    bounds,
    bonds: Vec::new(),
    polyhedra: Vec::new(),
  };

  let structure = match structure {
    Some(s) => s,
    None => return scene,
  };

  // --- 1. Atom markers, grouped by element in first-appearance order ---
  if params.show_atoms {
    let mut order: Vec<&str> = Vec::new();
    for atom in atoms {
      if !order.contains(&atom.element.as_str()) {
        order.push(&atom.element);
      }
    }
    for element in order {
      let radius = element_style(element).radius * style.atom_scale * scale;
      let color = style.color_for(element);
      for (i, atom) in atoms.iter().enumerate().filter(|(_, a)| a.element == element) {
        scene
          .primitives
          .push(Primitive::marker(atom.cartesian, radius, color, element, i));
      }
    }
  }

  // --- 2. Bonds ---
  scene.bonds = infer_bonds(atoms);
  if params.show_bonds {
    for bond in &scene.bonds {
      scene.primitives.push(Primitive::segment(
        atoms[bond.i].cartesian,
        atoms[bond.j].cartesian,
        style.bond_radius * scale,
        style.bond_color,
        SegmentRole::Bond,
      ));
    }
  }

  // --- 3. Unit cell ---
  if params.show_unit_cell {
    let corners = cell_corners(structure.lattice());
    for (a, b) in CELL_EDGES {
      scene.primitives.push(Primitive::segment(
        corners[a],
        corners[b],
        style.cell_edge_radius * scale,
        style.cell_edge_color,
        SegmentRole::CellEdge,
      ));
    }
  }

  // --- 4. Coordination polyhedra ---
  if params.show_polyhedra {
    scene.polyhedra = build_polyhedra(structure, &config.polyhedra);
    for poly in &scene.polyhedra {
      scene.primitives.push(Primitive::mesh(
        &poly.faces,
        style.color_for(&poly.element),
        params.polyhedron_opacity,
        poly.center_index,
      ));
    }
  }

  log::debug!(
    "Scene {}: {} primitives, {} bonds, {} polyhedra, camera distance {:.2}",
    scene.formula,
    scene.primitives.len(),
    scene.bonds.len(),
    scene.polyhedra.len(),
    scene.camera.distance()
  );
  scene
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Site;
  use crate::utils::geometry::calculate_distance;

  const A: f64 = 5.59;

  fn site(el: &str, f: [f64; 3]) -> Site {
    Site {
      element: el.to_string(),
      fractional: f,
    }
  }

  fn nacl() -> Structure {
    Structure::new(
      [[A, 0.0, 0.0], [0.0, A, 0.0], [0.0, 0.0, A]],
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

  fn na_polyhedra_config() -> Config {
    let mut config = Config::default();
    config.polyhedra.elements = vec!["Na".to_string()];
    config
  }

  #[test]
  fn test_nacl_scenario() {
    let s = nacl();
    let scene = calculate_scene(Some(&s), &na_polyhedra_config(), Viewport::default(), CameraMode::Auto);

    assert_eq!(scene.formula, "NaCl");
    assert_eq!(s.atoms()[5].cartesian, [2.795, 2.795, 2.795]);
    for k in 0..3 {
      assert!((scene.bounds.center[k] - 1.3975).abs() < 1e-9);
    }
    assert_eq!(scene.camera.look_at, scene.bounds.center);

    let atoms = s.atoms();
    let na_cl_nn = scene
      .bonds
      .iter()
      .filter(|b| atoms[b.i].element != atoms[b.j].element)
      .filter(|b| (b.distance - 2.795).abs() < 1e-6)
      .count();
    assert!(na_cl_nn >= 6);
    assert_eq!(na_cl_nn, 12);
    // 12 nearest-neighbour pairs plus 12 face diagonals sit below the threshold
    assert_eq!(scene.bonds.len(), 24);

    assert_eq!(scene.polyhedra.len(), 4);
    for poly in &scene.polyhedra {
      assert_eq!(poly.element, "Na");
      assert_eq!(poly.faces.len(), 8);
      assert_eq!(poly.geometry_label, "octahedral");
      for n in &poly.neighbors {
        assert!((calculate_distance(poly.center, *n) - 2.795).abs() < 1e-9);
      }
    }

    assert_eq!(scene.markers().count(), 8);
    assert_eq!(scene.segments(SegmentRole::Bond).count(), 24);
    assert_eq!(scene.segments(SegmentRole::CellEdge).count(), 12);
    assert_eq!(scene.meshes().count(), 4);
  }

  #[test]
  fn test_primitive_order() {
    let s = Structure::new(
      [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]],
      vec![
        site("O", [0.0, 0.0, 0.0]),
        site("Ti", [0.5, 0.5, 0.5]),
        site("O", [0.5, 0.0, 0.0]),
        site("Sr", [0.0, 0.5, 0.0]),
        site("Ti", [0.0, 0.0, 0.5]),
      ],
    )
    .unwrap();
    let mut config = Config::default();
    config.polyhedra.elements = vec!["Ti".to_string()];
    config.polyhedra.min_cn = 1;
    let scene = calculate_scene(Some(&s), &config, Viewport::default(), CameraMode::Auto);

    let rank = |p: &Primitive| match p {
      Primitive::Marker { .. } => 0,
      Primitive::Segment {
        role: SegmentRole::Bond,
        ..
      } => 1,
      Primitive::Segment {
        role: SegmentRole::CellEdge,
        ..
      } => 2,
      Primitive::Mesh { .. } => 3,
    };
    let ranks: Vec<i32> = scene.primitives.iter().map(rank).collect();
    let mut sorted = ranks.clone();
    sorted.sort();
    assert_eq!(ranks, sorted);

    let marker_elements: Vec<&str> = scene
      .primitives
      .iter()
      .filter_map(|p| match p {
        Primitive::Marker { element, .. } => Some(element.as_str()),
        _ => None,
      })
      .collect();
    assert_eq!(marker_elements, vec!["O", "O", "Ti", "Ti", "Sr"]);
  }

  #[test]
  fn test_toggles_and_scale() {
    let s = nacl();
    let mut config = na_polyhedra_config();
    config.display.show_bonds = false;
    config.display.show_polyhedra = false;
    config.display.scale_factor = 2.0;
    config.display.polyhedron_opacity = 3.0;
    let scene = calculate_scene(Some(&s), &config, Viewport::default(), CameraMode::Auto);

    assert_eq!(scene.segments(SegmentRole::Bond).count(), 0);
    assert_eq!(scene.meshes().count(), 0);
    assert!(scene.polyhedra.is_empty());
    // Bonds are still reported even when not drawn
    assert_eq!(scene.bonds.len(), 24);

    let na_radius = element_style("Na").radius * config.style.atom_scale * 2.0;
    match &scene.primitives[0] {
      Primitive::Marker { radius, element, .. } => {
        assert_eq!(element, "Na");
        assert!((radius - na_radius).abs() < 1e-12);
      }
      other => panic!("expected marker first, got {:?}", other),
    }

    config.display.show_polyhedra = true;
    let scene = calculate_scene(Some(&s), &config, Viewport::default(), CameraMode::Auto);
    for mesh in scene.meshes() {
      if let Primitive::Mesh { opacity, .. } = mesh {
        assert_eq!(*opacity, 1.0);
      }
    }
  }

  #[test]
  fn test_user_held_camera_passes_through() {
    let held = Camera {
      eye: [10.0, -3.0, 4.0],
      look_at: [0.5, 0.5, 0.5],
      up: [0.0, 1.0, 0.0],
    };
    let s = nacl();
    let scene = calculate_scene(
      Some(&s),
      &Config::default(),
      Viewport::new(1920.0, 300.0),
      CameraMode::UserHeld(held),
    );
    assert_eq!(scene.camera, held);
    assert_eq!(scene.camera_mode, CameraMode::UserHeld(held));
  }

  #[test]
  fn test_no_structure() {
    let scene = calculate_scene(None, &Config::default(), Viewport::default(), CameraMode::Auto);
    assert!(scene.primitives.is_empty());
    assert!(scene.bonds.is_empty());
    assert_eq!(scene.bounds, StructureBounds::FALLBACK);
    assert_eq!(scene.camera.look_at, [0.0, 0.0, 0.0]);
    assert!(scene.camera.distance() >= 2.0);
  }

  #[test]
  fn test_viewport_aspect() {
    assert_eq!(Viewport::new(800.0, 400.0).aspect(), 2.0);
    assert_eq!(Viewport::new(800.0, 0.0).aspect(), 1.0);
    assert_eq!(Viewport::new(f64::NAN, 10.0).aspect(), 1.0);
  }
}
