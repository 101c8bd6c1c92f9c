// src/rendering/camera.rs
// Automatic camera framing. The pose is a pure function of the bounds and a
// handful of structure statistics; nothing here remembers a previous pose.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::model::{element_class, ElementClass};
use crate::physics::bounds::{StructureBounds, StructureCharacteristics};
use crate::utils::geometry::{to_point, to_vector, Point3};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
  pub eye: Point3,
  pub look_at: Point3,
  pub up: Point3,
}

impl Camera {
  pub fn distance(&self) -> f64 {
    (to_vector(self.eye) - to_vector(self.look_at)).norm()
  }
}

/// Who owns the pose. A `UserHeld` camera is only replaced on an explicit
/// reset or when a new structure is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum CameraMode {
  #[default]
  Auto,
  UserHeld(Camera),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
  pub base_coefficient: f64,
  pub min_distance: f64,
}

impl Default for FramingConfig {
  fn default() -> Self {
    Self {
      base_coefficient: 2.5,
      min_distance: 2.0,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
  SingleElement,
  /// Alkali/alkaline-earth metal with a halogen or chalcogen (NaCl, MgO...)
  BinaryIonic,
  Binary,
  /// Three or more elements.
  Complex,
}

pub fn classify_archetype(elements: &[String]) -> Archetype {
  match elements {
    [] | [_] => Archetype::SingleElement,
    [a, b] => {
      let is_cation =
        |c: ElementClass| matches!(c, ElementClass::AlkaliMetal | ElementClass::AlkalineEarth);
      let is_anion =
        |c: ElementClass| matches!(c, ElementClass::Halogen | ElementClass::Chalcogen);
      let (ca, cb) = (element_class(a), element_class(b));
      if (is_cation(ca) && is_anion(cb)) || (is_cation(cb) && is_anion(ca)) {
        Archetype::BinaryIonic
      } else {
        Archetype::Binary
      }
    }
    _ => Archetype::Complex,
  }
}

fn archetype_factor(archetype: Archetype) -> f64 {
  match archetype {
    Archetype::SingleElement => 1.0,
    Archetype::BinaryIonic => 0.9,
    Archetype::Binary => 1.0,
    Archetype::Complex => 1.1,
  }
}

// Small cells get pulled in hard so they fill the frame
fn atom_count_factor(n: usize) -> f64 {
  match n {
    0..=2 => 0.6,
    3..=8 => 0.75,
    9..=32 => 0.9,
    33..=100 => 1.0,
    _ => 1.1,
  }
}

fn density_factor(density: f64) -> f64 {
  if density > 0.1 {
    1.05
  } else if density < 0.01 {
    0.95
  } else {
    1.0
  }
}

fn elongation_factor(aspect_ratio: f64) -> f64 {
  if aspect_ratio > 3.0 {
    1.2
  } else if aspect_ratio > 1.5 {
    1.1
  } else {
    1.0
  }
}

fn viewport_factor(viewport_aspect: f64) -> f64 {
  let r = if viewport_aspect.is_finite() && viewport_aspect > 0.0 {
    viewport_aspect
  } else {
    1.0
  };
  if r > 2.0 || r < 0.5 {
    1.15
  } else if r > 1.6 || r < 0.625 {
    1.05
  } else {
    1.0
  }
}

/// Product of the base coefficient and every framing heuristic.
pub fn distance_coefficient(
  config: &FramingConfig,
  characteristics: &StructureCharacteristics,
  viewport_aspect: f64,
) -> f64 {
  config.base_coefficient
    * archetype_factor(classify_archetype(&characteristics.elements))
    * atom_count_factor(characteristics.atom_count)
    * density_factor(characteristics.packing_density)
    * elongation_factor(characteristics.aspect_ratio)
    * viewport_factor(viewport_aspect)
}

pub fn frame(
  bounds: &StructureBounds,
  characteristics: &StructureCharacteristics,
  viewport_aspect: f64,
) -> Camera {
  frame_with(&FramingConfig::default(), bounds, characteristics, viewport_aspect)
}

/// Isotropic pose: the eye sits on the (1,1,1) diagonal from the centroid.
pub fn frame_with(
  config: &FramingConfig,
  bounds: &StructureBounds,
  characteristics: &StructureCharacteristics,
  viewport_aspect: f64,
) -> Camera {
  let effective_size = 0.6 * bounds.max_extent() + 0.4 * bounds.mean_extent();
  let coefficient = distance_coefficient(config, characteristics, viewport_aspect);
  let distance = (effective_size * coefficient).max(config.min_distance);

  let center = to_vector(bounds.center);
  let offset = Vector3::repeat(distance / 3f64.sqrt());
  Camera {
    eye: to_point(&(center + offset)),
    look_at: bounds.center,
    up: [0.0, 0.0, 1.0],
  }
}
