//! Mixed-radix ordinal arithmetic.
//!
//! Cells are laid out with axis 0 varying fastest. For cardinalities
//! `c0, c1, ..., cn` the tuple index on axis `i` is
//! `(ordinal / (c0 * ... * c(i-1))) % ci`.

use super::error::{CellsetError, CellsetResult};

/// Number of cells addressed by the given axis cardinalities.
///
/// No axes address exactly one cell. A zero cardinality or a product that
/// does not fit in `usize` is malformed.
pub fn cell_count(cardinalities: &[usize]) -> CellsetResult<usize> {
    cardinalities
        .iter()
        .enumerate()
        .try_fold(1usize, |acc, (axis, &cardinality)| {
            if cardinality == 0 {
                return Err(CellsetError::malformed(format!(
                    "axis {} has cardinality 0",
                    axis
                )));
            }
            acc.checked_mul(cardinality).ok_or_else(|| {
                CellsetError::malformed("product of axis cardinalities overflows")
            })
        })
}

/// Split a cell ordinal into one tuple index per axis.
pub fn tuple_indices(ordinal: usize, cardinalities: &[usize]) -> CellsetResult<Vec<usize>> {
    let total = cell_count(cardinalities)?;
    if ordinal >= total {
        return Err(CellsetError::malformed(format!(
            "cell ordinal {} is outside the {} cells addressed by the axes",
            ordinal, total
        )));
    }

    let mut stride = 1usize;
    Ok(cardinalities
        .iter()
        .map(|&cardinality| {
            let index = (ordinal / stride) % cardinality;
            stride *= cardinality;
            index
        })
        .collect())
}

/// Inverse of [`tuple_indices`].
pub fn ordinal_of(indices: &[usize], cardinalities: &[usize]) -> CellsetResult<usize> {
    if indices.len() != cardinalities.len() {
        return Err(CellsetError::malformed(format!(
            "{} tuple indices for {} axes",
            indices.len(),
            cardinalities.len()
        )));
    }
    cell_count(cardinalities)?;

    let mut ordinal = 0usize;
    let mut stride = 1usize;
    for (axis, (&index, &cardinality)) in indices.iter().zip(cardinalities).enumerate() {
        if index >= cardinality {
            return Err(CellsetError::IndexOutOfRange {
                axis,
                index,
                available: cardinality,
            });
        }
        ordinal += index * stride;
        stride *= cardinality;
    }
    Ok(ordinal)
}
