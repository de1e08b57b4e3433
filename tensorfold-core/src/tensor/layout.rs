use crate::error::TensorFoldError;
use crate::tensor::utils::{checked_numel, numel};

/// Shape, strides and starting offset of a tensor inside its storage.
///
/// Strides are counted in elements and may be zero (broadcast) or negative
/// (flipped views). `shape.len() == strides.len()` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub(crate) shape: Vec<usize>,
    pub(crate) strides: Vec<isize>,
    pub(crate) offset: usize,
}

impl Layout {
    /// Creates a layout.
    ///
    /// # Errors
    /// * `RankMismatch` if shape and strides differ in length.
    /// * `LayoutOverflow` if the element count exceeds `isize::MAX` or an
    ///   element offset relative to `offset` does not fit in `isize`.
    pub fn new(shape: Vec<usize>, strides: Vec<isize>, offset: usize) -> Result<Self, TensorFoldError> {
        if shape.len() != strides.len() {
            return Err(TensorFoldError::RankMismatch {
                expected: shape.len(),
                actual: strides.len(),
            });
        }
        let layout = Self { shape, strides, offset };
        let overflows = match checked_numel(&layout.shape) {
            None => true,
            Some(0) => false,
            Some(_) => layout.span_bounds().is_none(),
        };
        if overflows {
            return Err(TensorFoldError::LayoutOverflow {
                shape: layout.shape,
                strides: layout.strides,
            });
        }
        Ok(layout)
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Number of logical elements.
    pub fn size(&self) -> usize {
        numel(&self.shape)
    }

    /// True if the strides are the row-major strides of the shape.
    /// Extent-1 dimensions may carry any stride.
    pub fn is_row_contiguous(&self) -> bool {
        let mut expected = 1isize;
        for (&extent, &stride) in self.shape.iter().zip(&self.strides).rev() {
            if extent == 1 {
                continue;
            }
            if stride != expected {
                return false;
            }
            expected *= extent as isize;
        }
        true
    }

    /// True if the elements occupy exactly `size()` adjacent memory slots, in
    /// any dimension order, with positive strides.
    pub fn is_dense(&self) -> bool {
        let mut dims: Vec<(usize, isize)> = self
            .shape
            .iter()
            .copied()
            .zip(self.strides.iter().copied())
            .filter(|&(extent, _)| extent != 1)
            .collect();
        if dims.iter().any(|&(extent, stride)| extent == 0 || stride <= 0) {
            return false;
        }
        dims.sort_unstable_by_key(|&(_, stride)| stride);
        let mut expected = 1isize;
        for (extent, stride) in dims {
            if stride != expected {
                return false;
            }
            expected *= extent as isize;
        }
        true
    }

    /// Lowest and highest offsets, relative to `offset`, reached by any element.
    /// Returns `None` for layouts without elements.
    pub fn offset_bounds(&self) -> Option<(isize, isize)> {
        if self.size() == 0 {
            return None;
        }
        self.span_bounds()
    }

    /// Offset bounds of a non-empty layout, `None` on overflow. Every layout
    /// that passed `new` has bounds that fit.
    fn span_bounds(&self) -> Option<(isize, isize)> {
        let mut low = 0isize;
        let mut high = 0isize;
        for (&extent, &stride) in self.shape.iter().zip(&self.strides) {
            let steps = isize::try_from(extent).ok()?.checked_sub(1)?;
            let span = steps.checked_mul(stride)?;
            if span < 0 {
                low = low.checked_add(span)?;
            } else {
                high = high.checked_add(span)?;
            }
        }
        Some((low, high))
    }
}
