//! Cellset decoding - map every cell to its coordinate key.
//!
//! For each cell the ordinal is split into one tuple index per axis, the
//! members of those tuples become the cell's coordinates, and the
//! coordinates are put into cube-dimension order and joined with `|`:
//!
//! ```text
//! ordinal 1, cardinalities [2, 1], axis 0 tuples [E2, E3]
//!   axis 0: 1 % 2       = 1  -> [Dim1].[E3]
//!   axis 1: (1 / 2) % 1 = 0  -> [Dim2].[E1]
//!   key: "[Dim1].[E3]|[Dim2].[E1]"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use super::error::{CellsetError, CellsetResult};
use super::model::{Cell, Cellset, CellsetAxis};
use super::radix::tuple_indices;
use crate::mdx::names::{element_name_from_unique_name, normalize};

// =============================================================================
// Options
// =============================================================================

/// What to do with a coordinate whose dimension is not in the cube order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinatePolicy {
    /// Drop it and record it in [`DecodedContent::dropped`].
    #[default]
    Lenient,
    /// Fail with [`CellsetError::UnmatchedCoordinate`].
    Strict,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOptions {
    /// Decode at most this many cells. `None` and `Some(0)` mean all.
    pub top: Option<usize>,
    /// Keep full unique names in keys; otherwise bare element names.
    pub elements_unique_names: bool,
    /// Store only the cell value; otherwise the whole cell object.
    pub skip_cell_properties: bool,
    pub coordinate_policy: CoordinatePolicy,
    /// Overrides the dimension order carried by the cellset.
    pub dimension_order: Option<Vec<String>>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            top: None,
            elements_unique_names: true,
            skip_cell_properties: true,
            coordinate_policy: CoordinatePolicy::Lenient,
            dimension_order: None,
        }
    }
}

impl DecodeOptions {
    pub fn top(mut self, top: usize) -> Self {
        self.top = Some(top);
        self
    }

    pub fn element_names(mut self) -> Self {
        self.elements_unique_names = false;
        self
    }

    pub fn with_cell_properties(mut self) -> Self {
        self.skip_cell_properties = false;
        self
    }

    pub fn strict(mut self) -> Self {
        self.coordinate_policy = CoordinatePolicy::Strict;
        self
    }

    pub fn dimension_order<I, S>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimension_order = Some(dimensions.into_iter().map(Into::into).collect());
        self
    }
}

// =============================================================================
// Output
// =============================================================================

/// Either a bare value or the complete cell object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellContent {
    Value(Value),
    Cell(Map<String, Value>),
}

impl CellContent {
    pub fn value(&self) -> Option<&Value> {
        match self {
            CellContent::Value(v) => Some(v),
            CellContent::Cell(cell) => cell.get("Value"),
        }
    }
}

/// A coordinate left out of a key under [`CoordinatePolicy::Lenient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedCoordinate {
    pub ordinal: usize,
    pub coordinate: String,
}

/// Decoded cells keyed by their joined coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodedContent {
    pub entries: BTreeMap<String, CellContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<DroppedCoordinate>,
    /// Cells whose key was already taken by an earlier cell and replaced it.
    #[serde(skip_serializing_if = "is_zero")]
    pub overwritten: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl DecodedContent {
    pub fn get(&self, key: &str) -> Option<&CellContent> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CellContent)> {
        self.entries.iter()
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Parse and decode a cellset JSON document.
pub fn decode_json(json: &str, options: &DecodeOptions) -> CellsetResult<DecodedContent> {
    decode(&Cellset::from_json_str(json)?, options)
}

/// Decode every cell of `cellset`. Fails as a whole on the first bad cell.
pub fn decode(cellset: &Cellset, options: &DecodeOptions) -> CellsetResult<DecodedContent> {
    let dimensions = match &options.dimension_order {
        Some(order) => order.as_slice(),
        None if !cellset.dimensions.is_empty() => cellset.dimensions.as_slice(),
        None => {
            return Err(CellsetError::malformed(
                "no cube dimension order in the cellset or the options",
            ))
        }
    };

    // Axes without tuples take no part in addressing.
    let axes: Vec<&CellsetAxis> = cellset
        .axes
        .iter()
        .filter(|axis| !axis.tuples.is_empty())
        .collect();
    let cardinalities: Vec<usize> = axes.iter().map(|axis| axis.cardinality).collect();

    let limit = match options.top {
        Some(top) if top > 0 => top.min(cellset.cells.len()),
        _ => cellset.cells.len(),
    };

    let mut content = DecodedContent::default();
    for (position, cell) in cellset.cells.iter().take(limit).enumerate() {
        let ordinal = cell.ordinal.unwrap_or(position);
        let coordinates = cell_coordinates(ordinal, &axes, &cardinalities)?;
        let (sorted, unmatched) = sort_coordinates(dimensions, coordinates);

        for coordinate in unmatched {
            match options.coordinate_policy {
                CoordinatePolicy::Strict => {
                    return Err(CellsetError::UnmatchedCoordinate {
                        ordinal,
                        coordinate,
                    })
                }
                CoordinatePolicy::Lenient => {
                    content.dropped.push(DroppedCoordinate {
                        ordinal,
                        coordinate,
                    });
                }
            }
        }

        let key = if options.elements_unique_names {
            sorted.join("|")
        } else {
            sorted
                .iter()
                .map(|c| element_name_from_unique_name(c))
                .collect::<Vec<_>>()
                .join("|")
        };
        trace!(ordinal, key = %key, "decoded cell");
        if content
            .entries
            .insert(key, cell_content(cell, options))
            .is_some()
        {
            content.overwritten += 1;
        }
    }

    if let Some(first) = content.dropped.first() {
        warn!(
            dropped = content.dropped.len(),
            overwritten = content.overwritten,
            first = %first.coordinate,
            "coordinates matched no cube dimension and were left out of cell keys"
        );
    } else if content.overwritten > 0 {
        warn!(
            overwritten = content.overwritten,
            "cells shared a key and later cells replaced earlier ones"
        );
    }
    debug!(
        cells = content.entries.len(),
        axes = axes.len(),
        "decoded cellset"
    );

    Ok(content)
}

/// Member unique names of the tuples addressed by `ordinal`, in axis order.
fn cell_coordinates(
    ordinal: usize,
    axes: &[&CellsetAxis],
    cardinalities: &[usize],
) -> CellsetResult<Vec<String>> {
    let indices = tuple_indices(ordinal, cardinalities)?;

    let mut coordinates = Vec::new();
    for (axis_index, (axis, index)) in axes.iter().zip(indices).enumerate() {
        let tuple = axis
            .tuples
            .get(index)
            .ok_or(CellsetError::IndexOutOfRange {
                axis: axis_index,
                index,
                available: axis.tuples.len(),
            })?;
        coordinates.extend(tuple.members.iter().map(|m| m.unique_name.clone()));
    }
    Ok(coordinates)
}

/// Put coordinates into `dimensions` order.
///
/// Each dimension, bracketed or bare, takes the first coordinate starting
/// with `[Dimension].`;
/// coordinates no dimension takes are returned second.
pub fn sort_coordinates(
    dimensions: &[String],
    coordinates: Vec<String>,
) -> (Vec<String>, Vec<String>) {
    let mut remaining: Vec<Option<String>> = coordinates.into_iter().map(Some).collect();
    let mut sorted = Vec::with_capacity(dimensions.len());

    for dimension in dimensions {
        let prefix = format!("{}.", normalize(dimension));
        let found = remaining
            .iter_mut()
            .find(|c| c.as_deref().is_some_and(|c| c.starts_with(&prefix)));
        if let Some(slot) = found {
            if let Some(coordinate) = slot.take() {
                sorted.push(coordinate);
            }
        }
    }

    (sorted, remaining.into_iter().flatten().collect())
}

fn cell_content(cell: &Cell, options: &DecodeOptions) -> CellContent {
    if options.skip_cell_properties {
        CellContent::Value(cell.value.clone())
    } else {
        CellContent::Cell(cell.properties.clone())
    }
}
