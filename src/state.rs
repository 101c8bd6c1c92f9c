// src/state.rs
// Controller-side state between recomputes. Every event handler rebuilds the
// whole scene; the only thing carried over is who owns the camera.

use crate::config::{Config, DisplayParams};
use crate::model::Structure;
use crate::rendering::camera::{Camera, CameraMode};
use crate::rendering::scene::{calculate_scene, Scene, Viewport};

pub struct ViewState {
    pub structure: Option<Structure>,
    pub config: Config,
    pub viewport: Viewport,
    pub camera_mode: CameraMode,
}

impl ViewState {
    pub fn new(config: Config) -> Self {
        Self {
            structure: None,
            config,
            viewport: Viewport::default(),
            camera_mode: CameraMode::Auto,
        }
    }

    /// Recompute with the current inputs. Reframes only in `Auto` mode.
    pub fn scene(&self) -> Scene {
        calculate_scene(self.structure.as_ref(), &self.config, self.viewport, self.camera_mode)
    }

    /// A new structure always reframes, even over a user-held camera.
    pub fn load_structure(&mut self, structure: Structure) -> Scene {
        log::info!(
            "Loaded {} ({} atoms)",
            structure.formula(),
            structure.atoms().len()
        );
        self.structure = Some(structure);
        self.camera_mode = CameraMode::Auto;
        self.scene()
    }

    pub fn set_params(&mut self, params: DisplayParams) -> Scene {
        self.config.display = params.sanitized();
        self.scene()
    }

    pub fn resize(&mut self, viewport: Viewport) -> Scene {
        self.viewport = viewport;
        self.scene()
    }

    /// The caller orbited/panned/zoomed; keep that pose until a reset.
    pub fn user_moved_camera(&mut self, camera: Camera) -> Scene {
        self.camera_mode = CameraMode::UserHeld(camera);
        self.scene()
    }

    pub fn reset_view(&mut self) -> Scene {
        self.camera_mode = CameraMode::Auto;
        self.scene()
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Site;

    fn cubic(el: &str, a: f64) -> Structure {
        Structure::new(
            [[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]],
            vec![
                Site {
                    element: el.to_string(),
                    fractional: [0.0, 0.0, 0.0],
                },
                Site {
                    element: el.to_string(),
                    fractional: [0.5, 0.5, 0.5],
                },
            ],
        )
        .unwrap()
    }

    fn held() -> Camera {
        Camera {
            eye: [20.0, 0.0, 0.0],
            look_at: [0.0, 0.0, 0.0],
            up: [0.0, 0.0, 1.0],
        }
    }

    #[test]
    fn test_auto_mode_reframes_on_resize() {
        let mut state = ViewState::default();
        let first = state.load_structure(cubic("Fe", 2.87));
        let wide = state.resize(Viewport::new(3000.0, 500.0));
        assert_eq!(wide.camera_mode, CameraMode::Auto);
        assert!(wide.camera.distance() > first.camera.distance());
    }

    #[test]
    fn test_user_pose_survives_params_and_resize() {
        let mut state = ViewState::default();
        state.load_structure(cubic("Fe", 2.87));
        let scene = state.user_moved_camera(held());
        assert_eq!(scene.camera, held());

        let scene = state.resize(Viewport::new(300.0, 1200.0));
        assert_eq!(scene.camera, held());

        let params = DisplayParams {
            scale_factor: 3.0,
            show_bonds: false,
            ..Default::default()
        };
        let scene = state.set_params(params);
        assert_eq!(scene.camera, held());
        assert_eq!(state.scene().camera, held());
    }

    #[test]
    fn test_reset_and_load_reframe() {
        let mut state = ViewState::default();
        let auto = state.load_structure(cubic("Fe", 2.87));
        state.user_moved_camera(held());

        let reset = state.reset_view();
        assert_eq!(reset.camera_mode, CameraMode::Auto);
        assert_eq!(reset.camera, auto.camera);

        state.user_moved_camera(held());
        let reloaded = state.load_structure(cubic("Cu", 3.61));
        assert_eq!(state.camera_mode, CameraMode::Auto);
        assert_ne!(reloaded.camera, held());
        assert_eq!(reloaded.camera.look_at, reloaded.bounds.center);
    }

    #[test]
    fn test_params_are_sanitized() {
        let mut state = ViewState::default();
        state.set_params(DisplayParams {
            polyhedron_opacity: -1.0,
            ..Default::default()
        });
        assert_eq!(state.config.display.polyhedron_opacity, 0.0);
    }
}
