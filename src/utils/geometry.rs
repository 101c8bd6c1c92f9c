// src/utils/geometry.rs

use nalgebra::Vector3;

pub type Point3 = [f64; 3];

#[inline]
pub fn to_vector(p: Point3) -> Vector3<f64> {
    Vector3::new(p[0], p[1], p[2])
}

#[inline]
pub fn to_point(v: &Vector3<f64>) -> Point3 {
    [v.x, v.y, v.z]
}

/// Distance between two points (Angstroms)
pub fn calculate_distance(p1: Point3, p2: Point3) -> f64 {
    (to_vector(p1) - to_vector(p2)).norm()
}

/// Angle P1-CENTER-P3 in degrees. Zero-length arms give 0.
pub fn calculate_angle(p1: Point3, center: Point3, p3: Point3) -> f64 {
    let v1 = to_vector(p1) - to_vector(center);
    let v2 = to_vector(p3) - to_vector(center);
    let denom = v1.norm() * v2.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (v1.dot(&v2) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}
