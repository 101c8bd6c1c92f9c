//! Crystal structure scene construction: Cartesian atom positions, bond
//! inference, coordination polyhedra via a 3-D convex hull and automatic
//! camera framing, emitted as backend-agnostic drawables.

pub mod config;
pub mod io;
pub mod model;
pub mod physics;
pub mod rendering;
pub mod state;
pub mod utils;

pub use config::{Config, DisplayParams};
pub use model::{Atom, Structure, StructureError};
pub use rendering::{calculate_scene, Camera, CameraMode, Scene, Viewport};
pub use state::ViewState;
