// src/io/json.rs
// Structure Source JSON. Accepts the plain shape
//   { "lattice": [[..],[..],[..]], "sites": [{ "element", "fractional" }] }
// as well as the pymatgen-style dump (lattice object with "matrix" or cell
// parameters, sites with "species"/"coords").

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::LoadError;
use crate::model::elements::base_symbol;
use crate::model::{CoordinationGroup, Site, Structure, StructureError};
use crate::utils::linalg::{lattice_from_parameters, Lattice};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLattice {
    Rows(Vec<Vec<f64>>),
    Matrix {
        matrix: Vec<Vec<f64>>,
    },
    Parameters {
        a: f64,
        b: f64,
        c: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
    },
}

#[derive(Debug, Deserialize)]
struct RawSpecies {
    element: String,
    #[serde(default = "full_occupancy")]
    occu: f64,
}

fn full_occupancy() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
struct RawSite {
    #[serde(default)]
    element: Option<String>,
    #[serde(default)]
    species: Vec<RawSpecies>,
    #[serde(default, alias = "coords")]
    fractional: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct RawStructure {
    lattice: RawLattice,
    sites: Vec<RawSite>,
    #[serde(default)]
    formula: Option<String>,
    #[serde(default)]
    coordination_groups: Vec<CoordinationGroup>,
}

pub fn parse(path: &Path) -> Result<Structure, LoadError> {
    let file = File::open(path)?;
    let raw: RawStructure = serde_json::from_reader(BufReader::new(file))?;
    Ok(build(raw)?)
}

pub fn parse_str(text: &str) -> Result<Structure, LoadError> {
    let raw: RawStructure = serde_json::from_str(text)?;
    Ok(build(raw)?)
}

fn build(raw: RawStructure) -> Result<Structure, StructureError> {
    let lattice = match raw.lattice {
        RawLattice::Rows(rows) | RawLattice::Matrix { matrix: rows } => lattice_rows(&rows)?,
        RawLattice::Parameters {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        } => lattice_from_parameters(a, b, c, alpha, beta, gamma)
            .ok_or(StructureError::InvalidLatticeParameters)?,
    };

    let sites = raw
        .sites
        .into_iter()
        .enumerate()
        .map(|(i, s)| site(i, s))
        .collect::<Result<Vec<_>, _>>()?;

    let mut structure =
        Structure::new(lattice, sites)?.with_coordination_groups(raw.coordination_groups)?;
    if let Some(formula) = raw.formula.filter(|f| !f.trim().is_empty()) {
        structure = structure.with_formula(formula);
    }
    Ok(structure)
}

fn lattice_rows(rows: &[Vec<f64>]) -> Result<Lattice, StructureError> {
    if rows.len() != 3 {
        return Err(StructureError::MalformedLattice {
            rows: rows.len(),
            detail: "expected 3 rows".to_string(),
        });
    }
    let mut lattice = [[0.0; 3]; 3];
    for (i, row) in rows.iter().enumerate() {
        if row.len() != 3 {
            return Err(StructureError::MalformedLattice {
                rows: rows.len(),
                detail: format!("row {} has {} components", i, row.len()),
            });
        }
        lattice[i].copy_from_slice(row);
    }
    Ok(lattice)
}

fn site(index: usize, raw: RawSite) -> Result<Site, StructureError> {
    // Disordered sites: draw the majority species
    let label = raw.element.or_else(|| {
        raw.species
            .into_iter()
            .max_by(|x, y| x.occu.total_cmp(&y.occu))
            .map(|s| s.element)
    });
    let element = label
        .map(|l| base_symbol(&l))
        .filter(|e| !e.is_empty())
        .ok_or(StructureError::MissingElement { site: index })?;

    let coords = raw
        .fractional
        .ok_or(StructureError::MissingFractional { site: index })?;
    let fractional: [f64; 3] = coords
        .as_slice()
        .try_into()
        .map_err(|_| StructureError::MalformedFractional {
            site: index,
            len: coords.len(),
        })?;

    Ok(Site {
        element,
        fractional,
    })
}
