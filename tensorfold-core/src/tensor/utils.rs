use crate::error::TensorFoldError;

/// Calculates the row-major strides for a given shape.
/// Strides represent the number of elements to skip in the flattened data array
/// to move one step along each dimension.
///
/// Example:
/// shape = [2, 3] -> strides = [3, 1]
/// shape = [2, 2, 2] -> strides = [4, 2, 1]
pub fn calculate_strides(shape: &[usize]) -> Vec<isize> {
    if shape.is_empty() {
        return vec![];
    }
    let rank = shape.len();
    let mut strides = vec![1isize; rank];
    // Saturating: only shapes with a zero extent can get here with a product
    // past isize::MAX, and their strides are never followed.
    for i in (0..rank - 1).rev() {
        let extent = isize::try_from(shape[i + 1]).unwrap_or(isize::MAX);
        strides[i] = strides[i + 1].saturating_mul(extent);
    }
    strides
}

/// Number of elements described by `shape`. The empty shape (a scalar) holds one.
///
/// Saturates at `usize::MAX`; use [`checked_numel`] for shapes that have not
/// been validated.
pub fn numel(shape: &[usize]) -> usize {
    checked_numel(shape).unwrap_or(usize::MAX)
}

/// Number of elements described by `shape`, or `None` if it exceeds
/// `isize::MAX`, the most elements any buffer can hold.
pub fn checked_numel(shape: &[usize]) -> Option<usize> {
    if shape.contains(&0) {
        return Some(0);
    }
    shape
        .iter()
        .try_fold(1usize, |acc, &extent| acc.checked_mul(extent))
        .filter(|&n| n <= isize::MAX as usize)
}

/// Validates permutation axes.
pub fn validate_permutation(rank: usize, dims: &[usize]) -> Result<(), TensorFoldError> {
    if dims.len() != rank {
        return Err(TensorFoldError::RankMismatch {
            expected: rank,
            actual: dims.len(),
        });
    }
    let mut seen = vec![false; rank];
    for &axis in dims {
        if axis >= rank {
            return Err(TensorFoldError::InvalidAxis { axis, rank });
        }
        if seen[axis] {
            return Err(TensorFoldError::InvalidPermutation {
                dims: dims.to_vec(),
                rank,
            });
        }
        seen[axis] = true;
    }
    Ok(())
}

/// Returns the permutation that undoes `dims`.
pub fn inverse_permutation(dims: &[usize]) -> Vec<usize> {
    let mut inverse = vec![0; dims.len()];
    for (i, &axis) in dims.iter().enumerate() {
        inverse[axis] = i;
    }
    inverse
}
