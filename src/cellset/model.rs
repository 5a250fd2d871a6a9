//! Typed cellset model.
//!
//! The server answers a query with a loosely typed JSON document:
//!
//! ```json
//! {
//!   "Cube": { "Name": "Sales", "Dimensions": [{ "Name": "Year" }, { "Name": "Region" }] },
//!   "Axes": [
//!     { "Ordinal": 0, "Cardinality": 2, "Tuples": [
//!         { "Members": [{ "Name": "2024", "UniqueName": "[Year].[2024]" }] },
//!         { "Members": [{ "Name": "2025", "UniqueName": "[Year].[2025]" }] } ] }
//!   ],
//!   "Cells": [{ "Ordinal": 0, "Value": 100.0 }, { "Ordinal": 1, "Value": 80.0 }]
//! }
//! ```
//!
//! It is checked once here and converted into [`Cellset`]; the decoder
//! never looks at raw JSON.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::{CellsetError, CellsetResult};
use crate::mdx::names::element_name_from_unique_name;

// =============================================================================
// Model
// =============================================================================

/// A validated cellset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cellset {
    /// Cube dimension names in cube order. Empty when the response did not
    /// carry the cube.
    pub dimensions: Vec<String>,
    pub axes: Vec<CellsetAxis>,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellsetAxis {
    pub cardinality: usize,
    pub tuples: Vec<CellsetTuple>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellsetTuple {
    pub members: Vec<CellsetMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellsetMember {
    pub unique_name: String,
    pub name: String,
}

/// One cell. `properties` holds the complete cell object as received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub ordinal: Option<usize>,
    pub value: Value,
    pub properties: Map<String, Value>,
}

impl CellsetAxis {
    /// An axis whose cardinality is the number of tuples given.
    pub fn new(tuples: Vec<CellsetTuple>) -> Self {
        Self {
            cardinality: tuples.len(),
            tuples,
        }
    }
}

impl CellsetTuple {
    /// A tuple from member unique names; plain names are derived.
    pub fn of<I, S>(unique_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            members: unique_names
                .into_iter()
                .map(|u| CellsetMember::new(u.as_ref()))
                .collect(),
        }
    }
}

impl CellsetMember {
    pub fn new(unique_name: &str) -> Self {
        Self {
            unique_name: unique_name.to_string(),
            name: element_name_from_unique_name(unique_name),
        }
    }
}

impl Cell {
    pub fn new(ordinal: Option<usize>, value: Value) -> Self {
        let mut properties = Map::new();
        if let Some(ordinal) = ordinal {
            properties.insert("Ordinal".into(), Value::from(ordinal));
        }
        properties.insert("Value".into(), value.clone());
        Self {
            ordinal,
            value,
            properties,
        }
    }
}

// =============================================================================
// JSON Boundary
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawCellset {
    #[serde(default)]
    cube: Option<RawCube>,
    #[serde(default)]
    axes: Option<Vec<RawAxis>>,
    #[serde(default)]
    cells: Option<Vec<Value>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawCube {
    #[serde(default)]
    dimensions: Vec<RawNamed>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawNamed {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawAxis {
    #[serde(default)]
    cardinality: Option<Value>,
    #[serde(default)]
    tuples: Option<Vec<RawTuple>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawTuple {
    #[serde(default)]
    members: Vec<RawMember>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawMember {
    #[serde(default)]
    unique_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    element: Option<RawElement>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawElement {
    #[serde(default)]
    unique_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl Cellset {
    pub fn from_json_str(json: &str) -> CellsetResult<Self> {
        let raw: RawCellset = serde_json::from_str(json)?;
        convert_cellset(raw)
    }

    pub fn from_value(value: Value) -> CellsetResult<Self> {
        let raw: RawCellset = serde_json::from_value(value)?;
        convert_cellset(raw)
    }
}

fn convert_cellset(raw: RawCellset) -> CellsetResult<Cellset> {
    let axes = raw
        .axes
        .ok_or_else(|| CellsetError::malformed("missing 'Axes'"))?;
    let cells = raw
        .cells
        .ok_or_else(|| CellsetError::malformed("missing 'Cells'"))?;

    Ok(Cellset {
        dimensions: raw
            .cube
            .map(|c| c.dimensions.into_iter().map(|d| d.name).collect())
            .unwrap_or_default(),
        axes: axes
            .into_iter()
            .enumerate()
            .map(|(i, axis)| convert_axis(i, axis))
            .collect::<CellsetResult<_>>()?,
        cells: cells
            .into_iter()
            .enumerate()
            .map(|(i, cell)| convert_cell(i, cell))
            .collect::<CellsetResult<_>>()?,
    })
}

fn convert_axis(index: usize, raw: RawAxis) -> CellsetResult<CellsetAxis> {
    let cardinality = raw
        .cardinality
        .ok_or_else(|| CellsetError::malformed(format!("axis {} has no 'Cardinality'", index)))?;
    let cardinality = as_index(&cardinality).ok_or_else(|| {
        CellsetError::malformed(format!(
            "axis {} cardinality {} is not a non-negative integer",
            index, cardinality
        ))
    })?;

    let tuples = raw
        .tuples
        .unwrap_or_default()
        .into_iter()
        .map(|t| {
            t.members
                .into_iter()
                .map(|m| convert_member(index, m))
                .collect::<CellsetResult<Vec<_>>>()
                .map(|members| CellsetTuple { members })
        })
        .collect::<CellsetResult<_>>()?;

    Ok(CellsetAxis {
        cardinality,
        tuples,
    })
}

/// A nested `Element` wins over the member's own names.
fn convert_member(axis: usize, raw: RawMember) -> CellsetResult<CellsetMember> {
    let (unique_name, name) = match raw.element {
        Some(element) => (
            element.unique_name.or(raw.unique_name),
            element.name.or(raw.name),
        ),
        None => (raw.unique_name, raw.name),
    };
    let unique_name = unique_name.ok_or_else(|| {
        CellsetError::malformed(format!("member on axis {} has no 'UniqueName'", axis))
    })?;
    let name = name.unwrap_or_else(|| element_name_from_unique_name(&unique_name));
    Ok(CellsetMember { unique_name, name })
}

fn convert_cell(position: usize, raw: Value) -> CellsetResult<Cell> {
    let Value::Object(properties) = raw else {
        return Err(CellsetError::malformed(format!(
            "cell {} is not an object",
            position
        )));
    };

    let ordinal = match properties.get("Ordinal") {
        None | Some(Value::Null) => None,
        Some(v) => Some(as_index(v).ok_or_else(|| {
            CellsetError::malformed(format!("cell {} has invalid ordinal {}", position, v))
        })?),
    };

    Ok(Cell {
        ordinal,
        value: properties.get("Value").cloned().unwrap_or(Value::Null),
        properties,
    })
}

/// Non-negative integers, including integral floats such as `3.0`.
fn as_index(value: &Value) -> Option<usize> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(n) = number.as_u64() {
        return usize::try_from(n).ok();
    }
    let f = number.as_f64()?;
    if f >= 0.0 && f.fract() == 0.0 && f <= usize::MAX as f64 {
        Some(f as usize)
    } else {
        None
    }
}
