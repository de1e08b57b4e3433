use crate::error::TensorFoldError;
use crate::tensor::iter_utils::NdOffsets;
use crate::tensor::utils::{calculate_strides, checked_numel, validate_permutation};
use crate::tensor::{Layout, Tensor, TensorView};
use crate::types::Element;

// View operations only rewrite the layout. The storage slice is shared.
impl<'a, T: Element> TensorView<'a, T> {
    /// Reorders the dimensions: dimension `i` of the result is dimension
    /// `dims[i]` of `self`.
    pub fn permute(&self, dims: &[usize]) -> Result<Self, TensorFoldError> {
        validate_permutation(self.rank(), dims)?;
        let shape = dims.iter().map(|&axis| self.layout.shape[axis]).collect();
        let strides = dims.iter().map(|&axis| self.layout.strides[axis]).collect();
        Ok(Self {
            data: self.data,
            layout: Layout {
                shape,
                strides,
                offset: self.layout.offset,
            },
        })
    }

    /// Swaps two dimensions.
    pub fn transpose(&self, dim1: usize, dim2: usize) -> Result<Self, TensorFoldError> {
        let rank = self.rank();
        for axis in [dim1, dim2] {
            if axis >= rank {
                return Err(TensorFoldError::InvalidAxis { axis, rank });
            }
        }
        let mut dims: Vec<usize> = (0..rank).collect();
        dims.swap(dim1, dim2);
        self.permute(&dims)
    }

    /// Broadcasts the view to `target_shape` by giving repeated dimensions a
    /// stride of 0. Dimensions are aligned from the right; new leading
    /// dimensions may be added.
    pub fn expand(&self, target_shape: &[usize]) -> Result<Self, TensorFoldError> {
        let rank = self.rank();
        let target_rank = target_shape.len();
        let broadcast_error = || TensorFoldError::BroadcastError {
            shape: self.layout.shape.clone(),
            target: target_shape.to_vec(),
        };
        if target_rank < rank || checked_numel(target_shape).is_none() {
            return Err(broadcast_error());
        }

        let leading = target_rank - rank;
        let mut strides = vec![0isize; target_rank];
        for i in 0..rank {
            let extent = self.layout.shape[i];
            let target = target_shape[leading + i];
            if extent == target {
                strides[leading + i] = self.layout.strides[i];
            } else if extent == 1 {
                strides[leading + i] = 0;
            } else {
                return Err(broadcast_error());
            }
        }

        Ok(Self {
            data: self.data,
            layout: Layout {
                shape: target_shape.to_vec(),
                strides,
                offset: self.layout.offset,
            },
        })
    }

    /// Restricts `axis` to the elements `start..start + len`.
    pub fn narrow(&self, axis: usize, start: usize, len: usize) -> Result<Self, TensorFoldError> {
        let rank = self.rank();
        if axis >= rank {
            return Err(TensorFoldError::InvalidAxis { axis, rank });
        }
        let extent = self.layout.shape[axis];
        if start.checked_add(len).map_or(true, |end| end > extent) {
            return Err(TensorFoldError::SliceError {
                message: format!(
                    "range {}..{} is out of bounds for axis {} of extent {}",
                    start,
                    start.saturating_add(len),
                    axis,
                    extent
                ),
            });
        }

        let mut layout = self.layout.clone();
        if len > 0 {
            let offset = layout.offset as isize + start as isize * layout.strides[axis];
            layout.offset = offset as usize;
        }
        layout.shape[axis] = len;
        Self::with_layout(self.data, layout)
    }

    /// Reverses the order of the elements along `axis` (negative stride).
    pub fn flip(&self, axis: usize) -> Result<Self, TensorFoldError> {
        let rank = self.rank();
        if axis >= rank {
            return Err(TensorFoldError::InvalidAxis { axis, rank });
        }
        let mut layout = self.layout.clone();
        let extent = layout.shape[axis];
        if extent > 1 {
            let offset = layout.offset as isize + (extent as isize - 1) * layout.strides[axis];
            layout.offset = offset as usize;
        }
        layout.strides[axis] = -layout.strides[axis];
        Self::with_layout(self.data, layout)
    }

    /// Reads the element at the given coordinates.
    pub fn get(&self, coords: &[usize]) -> Result<T, TensorFoldError> {
        if coords.len() != self.rank() {
            return Err(TensorFoldError::RankMismatch {
                expected: self.rank(),
                actual: coords.len(),
            });
        }
        let mut loc = self.layout.offset as isize;
        for ((&coord, &extent), &stride) in coords
            .iter()
            .zip(&self.layout.shape)
            .zip(&self.layout.strides)
        {
            if coord >= extent {
                return Err(TensorFoldError::SliceError {
                    message: format!("index {:?} is out of bounds for shape {:?}", coords, self.shape()),
                });
            }
            loc += coord as isize * stride;
        }
        Ok(self.data[loc as usize])
    }

    /// Copies the logical contents into a new row-major tensor.
    pub fn to_contiguous(&self) -> Tensor<T> {
        let base = self.layout.offset as isize;
        let data: Vec<T> = NdOffsets::new(&self.layout.shape, &self.layout.strides)
            .map(|off| self.data[(base + off) as usize])
            .collect();
        Tensor {
            shape: self.layout.shape.clone(),
            strides: calculate_strides(&self.layout.shape),
            data,
        }
    }
}

#[cfg(test)]
#[path = "view_methods_test.rs"]
mod tests;
