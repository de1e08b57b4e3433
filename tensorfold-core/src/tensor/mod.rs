// src/tensor/mod.rs

use crate::error::TensorFoldError;
use crate::types::Element;

pub mod iter_utils;
pub mod layout;
pub mod utils;
mod view_methods;

pub use layout::Layout;

use utils::{calculate_strides, checked_numel, numel};

/// Borrowed, read-only view of a strided tensor.
///
/// A view pairs a storage slice with a [`Layout`]. Construction checks that
/// every element the layout can reach lies inside the slice, so the reduction
/// kernels can index the storage without further bounds reasoning.
#[derive(Debug, Clone)]
pub struct TensorView<'a, T> {
    pub(crate) data: &'a [T],
    pub(crate) layout: Layout,
}

impl<'a, T: Element> TensorView<'a, T> {
    /// Creates a row-major view over `data`.
    ///
    /// # Errors
    /// Returns `TensorFoldError::TensorCreationError` if the length of `data`
    /// does not match the number of elements of `shape`, including shapes whose
    /// element count overflows.
    pub fn contiguous(data: &'a [T], shape: Vec<usize>) -> Result<Self, TensorFoldError> {
        if checked_numel(&shape) != Some(data.len()) {
            return Err(TensorFoldError::TensorCreationError {
                data_len: data.len(),
                shape,
            });
        }
        let strides = calculate_strides(&shape);
        Ok(Self {
            data,
            layout: Layout {
                shape,
                strides,
                offset: 0,
            },
        })
    }

    /// Creates a view with explicit strides and starting offset.
    ///
    /// # Errors
    /// * `RankMismatch` if `shape` and `strides` differ in length.
    /// * `LayoutOverflow` if the layout's offsets do not fit in `isize`.
    /// * `StorageOutOfBounds` if some element would fall outside `data`.
    pub fn from_parts(
        data: &'a [T],
        shape: Vec<usize>,
        strides: Vec<isize>,
        offset: usize,
    ) -> Result<Self, TensorFoldError> {
        let layout = Layout::new(shape, strides, offset)?;
        Self::with_layout(data, layout)
    }

    pub(crate) fn with_layout(data: &'a [T], layout: Layout) -> Result<Self, TensorFoldError> {
        if let Some((low, high)) = layout.offset_bounds() {
            // Saturation keeps an out-of-range offset out of range.
            let base = isize::try_from(layout.offset).unwrap_or(isize::MAX);
            let min_offset = base.saturating_add(low);
            let max_offset = base.saturating_add(high);
            if min_offset < 0 || max_offset as usize >= data.len() {
                return Err(TensorFoldError::StorageOutOfBounds {
                    min_offset,
                    max_offset,
                    storage_len: data.len(),
                });
            }
        }
        Ok(Self { data, layout })
    }

    pub fn shape(&self) -> &[usize] {
        &self.layout.shape
    }

    pub fn strides(&self) -> &[isize] {
        &self.layout.strides
    }

    pub fn offset(&self) -> usize {
        self.layout.offset
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    pub fn numel(&self) -> usize {
        self.layout.size()
    }

    /// The whole underlying storage, including elements the view does not reach.
    pub fn storage(&self) -> &'a [T] {
        self.data
    }
}

/// Owned, row-major tensor. Reductions write their results into one.
///
/// A tensor created with [`Tensor::empty`] only carries its shape; the
/// reduction dispatcher allocates the storage right before filling it.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T> {
    pub(crate) shape: Vec<usize>,
    pub(crate) strides: Vec<isize>,
    pub(crate) data: Vec<T>,
}

impl<T: Element> Tensor<T> {
    /// Creates a new tensor from row-major data.
    ///
    /// # Errors
    /// Returns `TensorFoldError::TensorCreationError` if the length of `data`
    /// does not match the number of elements of `shape`.
    pub fn new(data: Vec<T>, shape: Vec<usize>) -> Result<Self, TensorFoldError> {
        if checked_numel(&shape) != Some(data.len()) {
            return Err(TensorFoldError::TensorCreationError {
                data_len: data.len(),
                shape,
            });
        }
        let strides = calculate_strides(&shape);
        Ok(Self { shape, strides, data })
    }

    /// Creates a tensor of the given shape without storage.
    pub fn empty(shape: Vec<usize>) -> Self {
        let strides = calculate_strides(&shape);
        Self {
            shape,
            strides,
            data: Vec::new(),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    pub fn numel(&self) -> usize {
        numel(&self.shape)
    }

    /// True once storage for every element has been set.
    pub fn is_allocated(&self) -> bool {
        self.data.len() == self.numel()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Replaces the storage. `data` must hold exactly `numel()` elements.
    pub(crate) fn set_data(&mut self, data: Vec<T>) {
        debug_assert_eq!(data.len(), self.numel());
        self.data = data;
    }

    /// Borrows the tensor as a row-major view.
    ///
    /// # Errors
    /// Returns `TensorFoldError::TensorCreationError` if the tensor has no storage yet.
    pub fn view(&self) -> Result<TensorView<'_, T>, TensorFoldError> {
        TensorView::contiguous(&self.data, self.shape.clone())
    }
}
