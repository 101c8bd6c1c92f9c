//src/model/mod.rs
pub mod elements;
pub mod structure;

// Re-exports for cleaner imports
pub use elements::{element_class, element_style, ElementClass, ElementStyle};
pub use structure::{Atom, CoordinationGroup, Site, Structure, StructureError};
