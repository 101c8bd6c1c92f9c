pub mod camera;
pub mod polyhedra;
pub mod primitives;
pub mod scene;

// Re-export the entry points the controller needs
pub use camera::{Camera, CameraMode};
pub use scene::{calculate_scene, Scene, Viewport};
