// src/config.rs

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::model::elements::{element_style, Rgb};
use crate::physics::coordination::PolyhedraConfig;
use crate::rendering::camera::FramingConfig;

// --- DisplayParams ---

/// Caller-facing toggles. Changing any of these triggers a recompute but
/// never a reframe of a user-held camera.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayParams {
  /// Uniform marker/line size multiplier.
  pub scale_factor: f64,
  pub show_atoms: bool,
  pub show_bonds: bool,
  pub show_unit_cell: bool,
  pub show_polyhedra: bool,
  pub polyhedron_opacity: f64,
}

impl Default for DisplayParams {
  fn default() -> Self {
    Self {
      scale_factor: 1.0,
      show_atoms: true,
      show_bonds: true,
      show_unit_cell: true,
      show_polyhedra: true,
      polyhedron_opacity: 0.5,
    }
  }
}

impl DisplayParams {
  /// Opacity clamped into [0, 1]; a non-positive or non-finite scale becomes 1.
  pub fn sanitized(&self) -> Self {
    let scale_factor = if self.scale_factor.is_finite() && self.scale_factor > 0.0 {
      self.scale_factor
    } else {
      1.0
    };
    let polyhedron_opacity = if self.polyhedron_opacity.is_nan() {
      1.0
    } else {
      self.polyhedron_opacity.clamp(0.0, 1.0)
    };
    Self {
      scale_factor,
      polyhedron_opacity,
      ..self.clone()
    }
  }
}

// --- RenderStyle ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
  /// Marker radius as a fraction of the covalent radius.
  pub atom_scale: f64,
  pub bond_radius: f64,
  pub bond_color: Rgb,
  pub cell_edge_radius: f64,
  pub cell_edge_color: Rgb,
  pub element_colors: HashMap<String, Rgb>,
}

impl Default for RenderStyle {
  fn default() -> Self {
    Self {
      atom_scale: 0.4,
      bond_radius: 0.12,
      bond_color: (0.5, 0.5, 0.5),
      cell_edge_radius: 0.03,
      cell_edge_color: (0.2, 0.2, 0.2),
      element_colors: HashMap::new(),
    }
  }
}

impl RenderStyle {
  /// User override first, then the element table.
  pub fn color_for(&self, element: &str) -> Rgb {
    self
      .element_colors
      .get(element)
      .copied()
      .unwrap_or_else(|| element_style(element).color)
  }
}

// --- Main Config Struct ---

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
  pub display: DisplayParams,
  pub style: RenderStyle,
  pub polyhedra: PolyhedraConfig,
  pub framing: FramingConfig,
}

impl Config {
  /// Loads config from standard OS location (e.g., ~/.config/crystal-scene/settings.json)
  pub fn load() -> (Self, String) {
    Self::load_from(&Self::get_path())
  }

  /// Saves config to standard OS location
  pub fn save(&self) -> String {
    self.save_to(&Self::get_path())
  }

  /// Never fails: a missing or unreadable file yields the defaults, and the
  /// message says why.
  pub fn load_from(path: &Path) -> (Self, String) {
    if path.exists() {
      match File::open(path) {
        Ok(file) => {
          let reader = BufReader::new(file);
          match serde_json::from_reader(reader) {
            Ok(cfg) => (cfg, format!("Config loaded from {:?}", path)),
            Err(e) => (Self::default(), format!("Error parsing config: {}", e)),
          }
        }
        Err(e) => (Self::default(), format!("Error opening config: {}", e)),
      }
    } else {
      (
        Self::default(),
        "No config found. Using defaults.".to_string(),
      )
    }
  }

  pub fn save_to(&self, path: &Path) -> String {
    if let Some(parent) = path.parent() {
      let _ = fs::create_dir_all(parent);
    }

    match File::create(path) {
      Ok(file) => {
        let writer = BufWriter::new(file);
        match serde_json::to_writer_pretty(writer, self) {
          Ok(_) => format!("Config saved to {:?}", path),
          Err(e) => format!("Failed to save config: {}", e),
        }
      }
      Err(e) => format!("Could not create config file: {}", e),
    }
  }

  pub fn get_path() -> PathBuf {
    if let Some(proj) = ProjectDirs::from("com", "example", "crystal-scene") {
      proj.config_dir().join("settings.json")
    } else {
      PathBuf::from("settings.json")
    }
  }
}
