// src/rendering/primitives.rs
// Backend-agnostic drawables handed to the render surface.

use serde::Serialize;

use crate::model::elements::Rgb;
use crate::utils::hull::Triangle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentRole {
    Bond,
    CellEdge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// One per atom.
    Marker {
        position: [f64; 3],
        radius: f64,
        color: Rgb,
        element: String,
        atom_index: usize,
    },
    Segment {
        start: [f64; 3],
        end: [f64; 3],
        radius: f64,
        color: Rgb,
        role: SegmentRole,
    },
    /// One coordination polyhedron, uniform colour and opacity.
    Mesh {
        triangles: Vec<[[f64; 3]; 3]>,
        color: Rgb,
        opacity: f64,
        center_index: usize,
    },
}

impl Primitive {
    pub fn marker(
        position: [f64; 3],
        radius: f64,
        color: Rgb,
        element: &str,
        atom_index: usize,
    ) -> Self {
        Primitive::Marker {
            position,
            radius,
            color,
            element: element.to_string(),
            atom_index,
        }
    }

    pub fn segment(
        start: [f64; 3],
        end: [f64; 3],
        radius: f64,
        color: Rgb,
        role: SegmentRole,
    ) -> Self {
        Primitive::Segment {
            start,
            end,
            radius,
            color,
            role,
        }
    }

    pub fn mesh(faces: &[Triangle], color: Rgb, opacity: f64, center_index: usize) -> Self {
        Primitive::Mesh {
            triangles: faces.iter().map(|f| f.vertices).collect(),
            color,
            opacity,
            center_index,
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Primitive::Marker { .. })
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self, Primitive::Mesh { .. })
    }

    pub fn segment_role(&self) -> Option<SegmentRole> {
        match self {
            Primitive::Segment { role, .. } => Some(*role),
            _ => None,
        }
    }
}
