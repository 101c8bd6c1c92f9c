// src/model/elements.rs
// Static element styling: covalent radius (Å) and CPK colour per symbol,
// plus a coarse chemical class used by the framing heuristics.

pub type Rgb = (f64, f64, f64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    pub radius: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementClass {
    AlkaliMetal,
    AlkalineEarth,
    Halogen,
    Chalcogen,
    Other,
}

/// Used for any symbol missing from [`ELEMENT_TABLE`]. Hot pink so it stands out.
pub const DEFAULT_STYLE: ElementStyle = ElementStyle {
    radius: 1.00,
    color: (1.00, 0.08, 0.58),
};

const fn style(radius: f64, r: f64, g: f64, b: f64) -> ElementStyle {
    ElementStyle {
        radius,
        color: (r, g, b),
    }
}

pub static ELEMENT_TABLE: &[(&str, ElementStyle)] = &[
    // --- Period 1 ---
    ("H", style(0.37, 1.00, 1.00, 1.00)),
    ("He", style(0.32, 0.85, 1.00, 1.00)),
    // --- Period 2 ---
    ("Li", style(1.34, 0.80, 0.50, 1.00)),
    ("Be", style(0.90, 0.76, 1.00, 0.00)),
    ("B", style(0.82, 1.00, 0.70, 0.70)),
    ("C", style(0.77, 0.20, 0.20, 0.20)),
    ("N", style(0.75, 0.19, 0.31, 0.97)),
    ("O", style(0.73, 1.00, 0.05, 0.05)),
    ("F", style(0.71, 0.56, 0.88, 0.31)),
    ("Ne", style(0.69, 0.70, 0.89, 0.96)),
    // --- Period 3 ---
    ("Na", style(1.54, 0.67, 0.36, 0.95)),
    ("Mg", style(1.30, 0.54, 1.00, 0.00)),
    ("Al", style(1.18, 0.75, 0.65, 0.65)),
    ("Si", style(1.11, 0.94, 0.78, 0.63)),
    ("P", style(1.06, 1.00, 0.50, 0.00)),
    ("S", style(1.02, 1.00, 1.00, 0.19)),
    ("Cl", style(0.99, 0.12, 0.94, 0.12)),
    ("Ar", style(0.97, 0.50, 0.82, 0.89)),
    // --- Period 4 ---
    ("K", style(1.96, 0.56, 0.25, 0.83)),
    ("Ca", style(1.74, 0.24, 1.00, 0.00)),
    ("Sc", style(1.44, 0.90, 0.90, 0.90)),
    ("Ti", style(1.36, 0.75, 0.76, 0.78)),
    ("V", style(1.25, 0.65, 0.65, 0.67)),
    ("Cr", style(1.27, 0.54, 0.60, 0.78)),
    ("Mn", style(1.39, 0.61, 0.48, 0.78)),
    ("Fe", style(1.25, 0.88, 0.40, 0.20)),
    ("Co", style(1.26, 0.94, 0.56, 0.63)),
    ("Ni", style(1.21, 0.31, 0.82, 0.31)),
    ("Cu", style(1.38, 0.78, 0.50, 0.20)),
    ("Zn", style(1.31, 0.49, 0.50, 0.69)),
    ("Ga", style(1.26, 0.76, 0.56, 0.56)),
    ("Ge", style(1.22, 0.40, 0.56, 0.56)),
    ("As", style(1.19, 0.74, 0.50, 0.89)),
    ("Se", style(1.16, 1.00, 0.63, 0.00)),
    ("Br", style(1.14, 0.65, 0.16, 0.16)),
    ("Kr", style(1.10, 0.36, 0.72, 0.82)),
    // --- Period 5 (selected) ---
    ("Rb", style(2.11, 0.44, 0.18, 0.69)),
    ("Sr", style(1.92, 0.00, 1.00, 0.00)),
    ("Zr", style(1.48, 0.58, 0.88, 0.88)),
    ("Mo", style(1.45, 0.33, 0.71, 0.71)),
    ("Ag", style(1.53, 0.75, 0.75, 0.75)),
    ("Sn", style(1.41, 0.40, 0.50, 0.50)),
    ("Te", style(1.35, 0.83, 0.48, 0.00)),
    ("I", style(1.33, 0.58, 0.00, 0.58)),
    // --- Period 6 (selected) ---
    ("Cs", style(2.25, 0.34, 0.09, 0.56)),
    ("Ba", style(1.98, 0.00, 0.79, 0.00)),
    ("W", style(1.46, 0.13, 0.58, 0.84)),
    ("Pt", style(1.36, 0.82, 0.82, 0.88)),
    ("Au", style(1.44, 1.00, 0.82, 0.14)),
    ("Pb", style(1.47, 0.34, 0.35, 0.38)),
];

/// Strip charge/label decorations: "Fe2+" -> "Fe", "na1" -> "Na".
/// A second letter is kept only when it is lowercase.
pub fn base_symbol(label: &str) -> String {
    let mut chars = label.trim().chars();
    let mut symbol = String::with_capacity(2);
    if let Some(first) = chars.next().filter(|c| c.is_ascii_alphabetic()) {
        symbol.push(first.to_ascii_uppercase());
        if let Some(second) = chars.next().filter(|c| c.is_ascii_lowercase()) {
            symbol.push(second);
        }
    }
    symbol
}

/// Radius and colour for `symbol`, [`DEFAULT_STYLE`] when unknown.
pub fn element_style(symbol: &str) -> ElementStyle {
    ELEMENT_TABLE
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, st)| *st)
        .unwrap_or(DEFAULT_STYLE)
}

pub fn element_class(symbol: &str) -> ElementClass {
    match symbol {
        "Li" | "Na" | "K" | "Rb" | "Cs" | "Fr" => ElementClass::AlkaliMetal,
        "Be" | "Mg" | "Ca" | "Sr" | "Ba" | "Ra" => ElementClass::AlkalineEarth,
        "F" | "Cl" | "Br" | "I" | "At" => ElementClass::Halogen,
        "O" | "S" | "Se" | "Te" => ElementClass::Chalcogen,
        _ => ElementClass::Other,
    }
}
