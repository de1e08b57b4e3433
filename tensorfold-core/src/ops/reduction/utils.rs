//! Utility functions for reduction operations.

use crate::error::TensorFoldError;
use crate::tensor::Layout;

/// Validates the axes provided for a reduction.
///
/// Every axis must be in `0..rank` and appear at most once. An empty slice
/// means "reduce nothing".
///
/// # Returns
/// The axes sorted in increasing order, or `InvalidAxis` / `DuplicateAxis`.
pub(crate) fn process_reduction_axes(rank: usize, axes: &[usize]) -> Result<Vec<usize>, TensorFoldError> {
    let mut seen = vec![false; rank];
    for &axis in axes {
        if axis >= rank {
            return Err(TensorFoldError::InvalidAxis { axis, rank });
        }
        if seen[axis] {
            return Err(TensorFoldError::DuplicateAxis { axis });
        }
        seen[axis] = true;
    }
    let mut processed_axes = axes.to_vec();
    processed_axes.sort_unstable();
    Ok(processed_axes)
}

/// Calculates the output shape after a reduction.
///
/// # Arguments
/// * `input_shape`: The shape of the original tensor.
/// * `axes`: The validated axes to reduce.
/// * `keep_dims`: If true, reduced dimensions are kept with size 1.
pub fn reduced_shape(input_shape: &[usize], axes: &[usize], keep_dims: bool) -> Vec<usize> {
    input_shape
        .iter()
        .enumerate()
        .filter_map(|(i, &extent)| {
            if !axes.contains(&i) {
                Some(extent)
            } else if keep_dims {
                Some(1)
            } else {
                None
            }
        })
        .collect()
}

/// Shape and strides of the non-reduced axes, in input order.
pub(crate) fn shapes_without_reduction_axes(layout: &Layout, axes: &[usize]) -> (Vec<usize>, Vec<isize>) {
    layout
        .shape
        .iter()
        .zip(&layout.strides)
        .enumerate()
        .filter(|(i, _)| !axes.contains(i))
        .map(|(_, (&extent, &stride))| (extent, stride))
        .unzip()
}
