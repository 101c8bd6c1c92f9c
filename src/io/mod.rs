// src/io/mod.rs
pub mod json;

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::model::{Structure, StructureError};
use crate::rendering::scene::Scene;

#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Json(serde_json::Error),
    Structure(StructureError),
    UnsupportedFormat(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "I/O error: {}", e),
            LoadError::Json(e) => write!(f, "Invalid structure JSON: {}", e),
            LoadError::Structure(e) => write!(f, "Malformed structure: {}", e),
            LoadError::UnsupportedFormat(ext) => {
                write!(f, "Unsupported structure format '{}'", ext)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Json(e) => Some(e),
            LoadError::Structure(e) => Some(e),
            LoadError::UnsupportedFormat(_) => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Json(e)
    }
}

impl From<StructureError> for LoadError {
    fn from(e: StructureError) -> Self {
        LoadError::Structure(e)
    }
}

/// Load a structure, picking the reader from the file extension. Files
/// without an extension are read as JSON.
pub fn load_structure(path: impl AsRef<Path>) -> Result<Structure, LoadError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "json" | "" => json::parse(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

/// Pretty JSON of the scene to `out`.
pub fn write_scene<W: Write>(out: W, scene: &Scene) -> io::Result<()> {
    let mut writer = BufWriter::new(out);
    serde_json::to_writer_pretty(&mut writer, scene)?;
    writeln!(writer)?;
    writer.flush()
}

pub fn save_scene(path: impl AsRef<Path>, scene: &Scene) -> io::Result<()> {
    write_scene(File::create(path)?, scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::rendering::camera::CameraMode;
    use crate::rendering::scene::{calculate_scene, Viewport};
    use std::error::Error;

    #[test]
    fn test_unsupported_extension() {
        let err = load_structure("structure.cif").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ref e) if e == "cif"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_structure("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_load_and_write_scene() {
        let dir = std::env::temp_dir().join(format!("crystal-scene-io-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("cu.json");
        std::fs::write(
            &input,
            r#"{ "lattice": [[3.61, 0, 0], [0, 3.61, 0], [0, 0, 3.61]],
                 "sites": [{ "element": "Cu", "fractional": [0, 0, 0] },
                           { "element": "Cu", "fractional": [0.5, 0.5, 0] }] }"#,
        )
        .unwrap();

        let s = load_structure(&input).unwrap();
        let scene = calculate_scene(Some(&s), &Config::default(), Viewport::default(), CameraMode::Auto);

        let mut buf = Vec::new();
        write_scene(&mut buf, &scene).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["formula"], "Cu");
        assert_eq!(value["primitives"][0]["kind"], "marker");
        assert_eq!(value["camera_mode"], "Auto");

        let out = dir.join("scene.json");
        save_scene(&out, &scene).unwrap();
        assert!(std::fs::metadata(&out).unwrap().len() > 0);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
