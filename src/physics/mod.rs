pub mod bonds;
pub mod bounds;
pub mod coordination;

pub use bonds::{infer_bonds, Bond};
pub use bounds::{
    analyze_characteristics, compute_bounds, StructureBounds, StructureCharacteristics,
};
pub use coordination::{geometry_label, CoordinationShell, PolyhedraConfig};
